//! File processing pipeline.
//!
//! This module connects I/O to the converter:
//! - Read the whole input into lines (the scan needs the first two up front)
//! - Run the [`Converter`](crate::convert::Converter) once over all lines
//! - Write the Markdown lines to any `Write` implementation
//!
//! The main entry point is [`convert_file`]; [`convert_str`] is a convenience
//! wrapper for in-memory sources.

pub mod pipeline;

pub use pipeline::{convert_file, convert_str};
