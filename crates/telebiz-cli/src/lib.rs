//! Telebiz CLI library.
//!
//! Argument definitions and command handlers for the `telebiz` binary.

pub mod cli;
pub mod commands;
