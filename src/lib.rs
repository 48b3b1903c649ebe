//! code2md - Turn annotated C sources into Markdown
//!
//! Block comments become prose and the code between them becomes fenced code
//! blocks, re-indented from brace depth and stripped of boilerplate.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod process;
pub mod rules;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use convert::{convert, ConversionOptions, Converter};
pub use error::Result;
pub use process::{convert_file, convert_str};
