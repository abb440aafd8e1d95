//! Subprocess plumbing for the control tool and parsers for its output.

pub mod executor;
pub mod parser;
