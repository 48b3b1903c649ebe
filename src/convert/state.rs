/// Scanner state threaded through a conversion
use std::fmt;

use super::output::BlankBuffer;

/// Coarse scanner mode, derived from [`ConversionState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Inside a block comment: lines are prose
    Comment,
    /// Plain code
    Code,
    /// Code inside a multi-way branch (`switch`) construct
    Switch,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Comment => write!(f, "comment"),
            Mode::Code => write!(f, "code"),
            Mode::Switch => write!(f, "switch"),
        }
    }
}

/// Everything the scanner carries from one line to the next
///
/// The state is passed into [`Converter::step`](super::Converter::step) by
/// value and handed back with the lines that step emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionState {
    /// Index of the next input line
    pub line_index: usize,
    /// Inside a block comment
    pub in_comment: bool,
    /// A code fence has been opened and not yet closed
    pub code_block_open: bool,
    /// Brace nesting level of the current code block, never negative
    pub indent_depth: usize,
    /// Inside a multi-way branch construct
    pub in_switch: bool,
    /// Extra indent level (0 or 1) for statements under a clause label
    pub switch_extra: usize,
    /// A closing brace was elided; the next bare `{` goes with it
    pub pending_brace_skip: bool,
    /// A comment just closed; drop blank and include lines until real code
    pub skip_blank_run: bool,
    /// Blank code lines waiting for a non-blank line
    pub blanks: BlankBuffer,
}

impl ConversionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.in_comment {
            Mode::Comment
        } else if self.in_switch {
            Mode::Switch
        } else {
            Mode::Code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = ConversionState::new();
        assert_eq!(state.mode(), Mode::Code);
        assert_eq!(state.indent_depth, 0);
        assert!(!state.code_block_open);
        assert!(state.blanks.is_empty());
    }

    #[test]
    fn test_comment_takes_precedence_over_switch() {
        let state = ConversionState {
            in_comment: true,
            in_switch: true,
            ..Default::default()
        };
        assert_eq!(state.mode(), Mode::Comment);
        assert_eq!(state.mode().to_string(), "comment");
    }

    #[test]
    fn test_switch_mode() {
        let state = ConversionState {
            in_switch: true,
            ..Default::default()
        };
        assert_eq!(state.mode(), Mode::Switch);
    }
}
