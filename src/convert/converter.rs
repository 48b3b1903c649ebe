/// `Converter` - single-pass scanner from annotated source to Markdown
///
/// Block comments become prose, everything else becomes fenced code with
/// indentation recomputed from brace depth. The scanner only looks at line
/// shapes (one brace per line, comments on their own lines); it does not
/// parse the language.
use anyhow::bail;
use log::{debug, trace};

use super::output::OutputDocument;
use super::state::ConversionState;
use crate::config::Config;
use crate::error::Result;
use crate::rules::LineRules;

/// Knobs for one conversion
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Keep the entry-point wrapper lines instead of eliding them
    pub keep_entry_point: bool,
    /// Markers recognized on each line
    pub rules: LineRules,
}

impl ConversionOptions {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            keep_entry_point: config.keep_entry_point,
            rules: LineRules::new(config)?,
        })
    }
}

/// How a file starts, as decided from its second line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opening {
    /// Block comment whose second line is the title
    Comment,
    /// Code, with the first line turned into an opening fence
    Code,
}

/// Line-by-line converter
#[derive(Debug, Clone)]
pub struct Converter {
    options: ConversionOptions,
}

impl Converter {
    #[must_use]
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert a whole file
    ///
    /// Fails only when the input is too short to decide how the header starts.
    pub fn convert(&self, mut lines: Vec<String>) -> Result<Vec<String>> {
        let opening = self.prime_header(&mut lines)?;

        let mut state = ConversionState {
            code_block_open: opening == Opening::Code,
            ..ConversionState::new()
        };
        let mut doc = OutputDocument::new();
        for line in &lines {
            let (next, emitted) = self.step(state, line);
            state = next;
            doc.extend(emitted);
        }
        self.finish(&state, &mut doc);

        Ok(doc.into_lines())
    }

    /// Rewrite the first lines according to how the file opens
    ///
    /// A second line that is not a single-line comment means the file opens
    /// with a block comment, whose second line is the title and becomes a
    /// level-3 heading. Otherwise the file opens in code and the first line is
    /// replaced by an opening fence, which leaves a code block open.
    pub fn prime_header(&self, lines: &mut [String]) -> Result<Opening> {
        let rules = &self.options.rules;
        if lines.len() < 2 {
            bail!(
                "input has {} line(s); at least two are needed to detect the header",
                lines.len()
            );
        }

        if rules.is_line_comment(&lines[1]) {
            debug!("file opens with code");
            lines[0] = rules.fence_open().to_string();
            Ok(Opening::Code)
        } else {
            debug!("file opens with a block comment");
            lines[1] = format!("### {}", lines[1].trim());
            Ok(Opening::Comment)
        }
    }

    /// Process one raw input line
    ///
    /// Returns the updated state and the Markdown lines this input line
    /// produced (possibly none, possibly earlier deferred blanks).
    #[must_use]
    pub fn step(&self, mut state: ConversionState, raw: &str) -> (ConversionState, Vec<String>) {
        let rules = &self.options.rules;
        let index = state.line_index;
        state.line_index += 1;

        let line = raw.trim();
        let mut emitted = Vec::new();

        if !self.options.keep_entry_point && rules.is_entry_point(line) {
            trace!("line {}: entry-point boilerplate dropped", index + 1);
            return (state, emitted);
        }

        if state.skip_blank_run {
            if line.is_empty() || rules.is_include(line) {
                return (state, emitted);
            }
            state.skip_blank_run = false;
        }

        if rules.closes_comment(line) {
            trace!("line {}: {} -> code", index + 1, state.mode());
            state.in_comment = false;
            state.code_block_open = true;
            state.skip_blank_run = true;
            state.blanks.clear();
            state.indent_depth = 0;
            emitted.push(String::new());
            emitted.push(rules.fence_open().to_string());
        } else if state.in_comment {
            if rules.is_example(line) {
                emitted.push(format!("#### {line}"));
                emitted.push(String::new());
            } else {
                emitted.push(line.to_string());
            }
        } else if rules.opens_comment(line) {
            trace!("line {}: {} -> comment", index + 1, state.mode());
            state.in_comment = true;
            state.code_block_open = false;
            if index != 0 {
                emitted.push(rules.fence_close().to_string());
                emitted.push(String::new());
            }
        } else {
            self.code_line(&mut state, index, line, &mut emitted);
        }

        (state, emitted)
    }

    /// Code branch of [`step`](Self::step): brace bookkeeping and indentation
    fn code_line(
        &self,
        state: &mut ConversionState,
        index: usize,
        line: &str,
        emitted: &mut Vec<String>,
    ) {
        let rules = &self.options.rules;

        // An elided close is confirmed by the very next non-blank code line
        if state.pending_brace_skip && !line.is_empty() {
            state.pending_brace_skip = false;
            if line == "{" {
                debug!("line {}: scope-only block opener elided", index + 1);
                return;
            }
        }

        if LineRules::closes_block(line) && !state.in_switch {
            if state.indent_depth == 0 {
                debug!("line {}: unmatched closing brace elided", index + 1);
                state.pending_brace_skip = true;
                return;
            }
            state.indent_depth -= 1;
        }

        if state.in_switch {
            if LineRules::is_label(line) {
                state.switch_extra = 1;
            } else if line.ends_with('}') {
                state.in_switch = false;
                state.switch_extra = 0;
            }
        }

        let rendered = if line.is_empty() {
            String::new()
        } else {
            let extra = if LineRules::is_label(line) {
                0
            } else {
                state.switch_extra
            };
            format!("{}{line}", rules.indent(state.indent_depth + extra))
        };

        if rules.starts_switch(line) {
            state.in_switch = true;
        } else if LineRules::opens_block(line) {
            state.indent_depth += 1;
        }

        if rendered.is_empty() {
            state.blanks.push();
        } else {
            state.blanks.flush_into(emitted);
            emitted.push(rendered);
        }
    }

    /// Close the code block the scan left open, if any
    ///
    /// A file ending with a comment terminator still gets its (empty) block
    /// closed; a file ending inside an unterminated comment has none open.
    pub fn finish(&self, state: &ConversionState, doc: &mut OutputDocument) {
        if state.code_block_open {
            let rules = &self.options.rules;
            doc.push(rules.fence_close());
            doc.push(String::new());
        } else {
            debug!("no code block open at end of input");
        }
    }
}

/// Convert source lines to Markdown lines
pub fn convert(lines: Vec<String>, options: &ConversionOptions) -> Result<Vec<String>> {
    Converter::new(options.clone()).convert(lines)
}
