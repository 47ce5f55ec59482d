//! Library half of the `winui-migrate` binary: configuration discovery and
//! merging, kept here so it can be tested without spawning the CLI.

pub mod config;
