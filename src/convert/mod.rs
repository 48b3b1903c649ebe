//! Annotated source to Markdown conversion.
//!
//! This module contains the line scanner and the small pieces of state it threads:
//! - [`converter`]: The [`Converter`] state machine (header priming, per-line steps, finalization)
//! - [`state`]: [`ConversionState`] carried between lines and the derived [`Mode`]
//! - [`output`]: Deferred blank lines ([`BlankBuffer`]) and the [`OutputDocument`]
//!
//! Block comments become prose, the second line of a leading comment becomes a
//! level-3 heading, and comment lines starting with `Example` become level-4
//! headings. Code between comments is fenced, re-indented from brace depth, and
//! stripped of includes, the entry-point wrapper, and scope-only braces.

pub mod converter;
pub mod output;
pub mod state;

pub use converter::{convert, ConversionOptions, Converter, Opening};
pub use output::{BlankBuffer, OutputDocument};
pub use state::{ConversionState, Mode};
