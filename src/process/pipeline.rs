//! Conversion pipeline
//!
//! Reads every line of the input, runs the [`Converter`] over them, and writes
//! the resulting Markdown with one `\n` per line.

use std::io::{BufRead, Write};

use anyhow::Context;
use log::debug;

use crate::config::Config;
use crate::convert::Converter;
use crate::Result;

/// Convert an annotated source read from `input` and write Markdown to `output`
///
/// `source_name` is only used in log and error messages.
pub fn convert_file<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    config: &Config,
    source_name: &str,
) -> Result<()> {
    let lines = input
        .lines()
        .collect::<std::io::Result<Vec<String>>>()
        .with_context(|| format!("failed to read lines of {source_name}"))?;
    let line_count = lines.len();

    let converter = Converter::new(config.options()?);
    let markdown = converter
        .convert(lines)
        .with_context(|| format!("cannot convert {source_name}"))?;

    debug!(
        "{source_name}: {line_count} source lines -> {} markdown lines",
        markdown.len()
    );

    for line in &markdown {
        writeln!(output, "{line}")?;
    }
    output.flush()?;
    Ok(())
}

/// Convert an in-memory source to a Markdown string
pub fn convert_str(source: &str, config: &Config) -> Result<String> {
    let mut output = Vec::new();
    convert_file(source.as_bytes(), &mut output, config, "<string>")?;
    Ok(String::from_utf8(output)?)
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor};

    use super::*;

    #[test]
    fn test_convert_file_writes_terminated_lines() {
        let input = "/*\nDoc\n*/\nint x = 1;\n";
        let mut output = Vec::new();
        convert_file(
            BufReader::new(Cursor::new(input)),
            &mut output,
            &Config::default(),
            "doc.c",
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "### Doc\n\n```\nint x = 1;\n```\n\n"
        );
    }

    #[test]
    fn test_crlf_input() {
        let markdown = convert_str("/*\r\nDoc\r\n*/\r\nint x = 1;\r\n", &Config::default()).unwrap();
        assert_eq!(markdown, "### Doc\n\n```\nint x = 1;\n```\n\n");
    }

    #[test]
    fn test_short_input_names_source() {
        let mut output = Vec::new();
        let err = convert_file(
            "/*\n".as_bytes(),
            &mut output,
            &Config::default(),
            "tiny.c",
        )
        .unwrap_err();
        assert!(err.to_string().contains("tiny.c"));
        assert!(output.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let bytes: &[u8] = b"/*\n\xff\xfe\n*/\n";
        let mut output = Vec::new();
        assert!(convert_file(bytes, &mut output, &Config::default(), "bad.c").is_err());
    }
}
