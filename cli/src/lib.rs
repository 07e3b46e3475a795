//! Command-line front end over the content gateway.
//!
//! Every command prints pretty JSON on stdout; logs go to stderr (and to a
//! rolling file when `--log-file` is given).

pub mod cli;
pub mod commands;
pub mod utils;
