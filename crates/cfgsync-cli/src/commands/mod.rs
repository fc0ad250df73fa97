//! Command implementations for the cfgsync CLI
//!
//! Each command module handles the CLI interface and delegates to the
//! cfgsync library for the actual work.

pub mod keys;
pub mod run;
pub mod update;
