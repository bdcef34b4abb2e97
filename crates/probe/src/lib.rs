//! Library surface of the `jobber-probe` binary.
//!
//! The probe exercises a separately maintained Jobber MCP server by
//! spawning it fresh for every tool call and checking each response.

pub mod cli;
pub mod config;
pub mod report;
pub mod runner;
