//! User-facing surfaces. Just the command line for now.

pub mod cli;
