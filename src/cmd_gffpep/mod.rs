//! Subcommand modules for the `gffpep` binary.

pub mod extract;
