//! Command-line interface module

pub mod commands;
