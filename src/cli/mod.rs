//! Command-line interface: argument parsing, dispatch, and rendering.

pub mod args;
pub mod commands;
pub mod render;
