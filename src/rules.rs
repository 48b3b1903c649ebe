/// Line classification rules for annotated sources
///
/// Every marker the converter reacts to comes from [`Config`] and is matched
/// against the *trimmed* line. Markers that need word boundaries are compiled
/// into regexes once, when the rules are built.
use regex::Regex;

use crate::config::Config;
use crate::error::Result;

/// Matchers and rendering fragments derived from a [`Config`]
#[derive(Debug, Clone)]
pub struct LineRules {
    entry_point_open: String,
    entry_point_close: String,
    include_re: Regex,
    comment_open: String,
    comment_close: String,
    line_comment: String,
    example_prefix: String,
    switch_re: Regex,
    indent_unit: String,
    fence: String,
    fence_open: String,
}

impl LineRules {
    /// Build the rules for a configuration
    ///
    /// The configuration is expected to have passed [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self> {
        let include_re = Regex::new(&format!("^{}", regex::escape(&config.include_prefix)))?;
        let switch_re = Regex::new(&format!(r"^{}\b", regex::escape(&config.switch_keyword)))?;

        Ok(Self {
            entry_point_open: config.entry_point_open.clone(),
            entry_point_close: config.entry_point_close.clone(),
            include_re,
            comment_open: config.comment_open.clone(),
            comment_close: config.comment_close.clone(),
            line_comment: config.line_comment.clone(),
            example_prefix: config.example_prefix.clone(),
            switch_re,
            indent_unit: " ".repeat(config.indent_width),
            fence: config.fence.clone(),
            fence_open: format!("{}{}", config.fence, config.fence_info),
        })
    }

    /// Entry-point wrapper opening or its trivial termination
    #[must_use]
    pub fn is_entry_point(&self, line: &str) -> bool {
        line == self.entry_point_open || line == self.entry_point_close
    }

    #[must_use]
    pub fn is_include(&self, line: &str) -> bool {
        self.include_re.is_match(line)
    }

    #[must_use]
    pub fn opens_comment(&self, line: &str) -> bool {
        line.starts_with(&self.comment_open)
    }

    #[must_use]
    pub fn closes_comment(&self, line: &str) -> bool {
        line.ends_with(&self.comment_close)
    }

    /// Raw (untrimmed) line starts with the single-line comment marker
    #[must_use]
    pub fn is_line_comment(&self, raw: &str) -> bool {
        raw.starts_with(&self.line_comment)
    }

    #[must_use]
    pub fn is_example(&self, line: &str) -> bool {
        line.starts_with(&self.example_prefix)
    }

    /// Start of a multi-way branch construct (`switch (x) {`)
    #[must_use]
    pub fn starts_switch(&self, line: &str) -> bool {
        self.switch_re.is_match(line)
    }

    /// Clause label inside a multi-way branch (`case 1:`, `default:`)
    #[must_use]
    pub fn is_label(line: &str) -> bool {
        line.ends_with(':')
    }

    #[must_use]
    pub fn opens_block(line: &str) -> bool {
        line.ends_with('{')
    }

    #[must_use]
    pub fn closes_block(line: &str) -> bool {
        line.starts_with('}')
    }

    /// Leading whitespace for `levels` indent levels
    #[must_use]
    pub fn indent(&self, levels: usize) -> String {
        self.indent_unit.repeat(levels)
    }

    /// Fence that opens a code block (with the info string, if any)
    #[must_use]
    pub fn fence_open(&self) -> &str {
        &self.fence_open
    }

    /// Fence that closes a code block
    #[must_use]
    pub fn fence_close(&self) -> &str {
        &self.fence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> LineRules {
        LineRules::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_entry_point_lines() {
        let rules = rules();
        assert!(rules.is_entry_point("int main(void) {"));
        assert!(rules.is_entry_point("return 0;"));
        assert!(!rules.is_entry_point("int main(int argc, char **argv) {"));
        assert!(!rules.is_entry_point("return 1;"));
    }

    #[test]
    fn test_include_lines() {
        let rules = rules();
        assert!(rules.is_include("#include <stdio.h>"));
        assert!(rules.is_include("#include\"local.h\""));
        assert!(!rules.is_include("#define EPSILON 0.00001"));
        assert!(!rules.is_include("x = 1; #include"));
    }

    #[test]
    fn test_comment_markers() {
        let rules = rules();
        assert!(rules.opens_comment("/*"));
        assert!(rules.opens_comment("/* leading text"));
        assert!(rules.closes_comment("*/"));
        assert!(rules.closes_comment("trailing text */"));
        assert!(!rules.closes_comment("*/ x = 1;"));
    }

    #[test]
    fn test_line_comment_uses_raw_line() {
        let rules = rules();
        assert!(rules.is_line_comment("// header"));
        assert!(!rules.is_line_comment("    // indented"));
    }

    #[test]
    fn test_switch_start_needs_word_boundary() {
        let rules = rules();
        assert!(rules.starts_switch("switch (x) {"));
        assert!(rules.starts_switch("switch(x) {"));
        assert!(!rules.starts_switch("switched = 1;"));
        assert!(!rules.starts_switch("int switch_count = 0;"));
    }

    #[test]
    fn test_block_shapes() {
        assert!(LineRules::opens_block("if (x) {"));
        assert!(!LineRules::opens_block("{}"));
        assert!(LineRules::closes_block("}"));
        assert!(LineRules::closes_block("} else {"));
        assert!(LineRules::is_label("case 1:"));
        assert!(LineRules::is_label("default:"));
    }

    #[test]
    fn test_custom_markers_are_escaped() {
        let config = Config {
            include_prefix: "#import".to_string(),
            switch_keyword: "sw.itch".to_string(),
            ..Default::default()
        };
        let rules = LineRules::new(&config).unwrap();
        assert!(rules.is_include("#import <Foundation/Foundation.h>"));
        assert!(!rules.is_include("#include <stdio.h>"));
        assert!(rules.starts_switch("sw.itch (x) {"));
        assert!(!rules.starts_switch("swXitch (x) {"));
    }

    #[test]
    fn test_indent_and_fences() {
        let config = Config {
            indent_width: 2,
            fence_info: "c".to_string(),
            ..Default::default()
        };
        let rules = LineRules::new(&config).unwrap();
        assert_eq!(rules.indent(0), "");
        assert_eq!(rules.indent(3), "      ");
        assert_eq!(rules.fence_open(), "```c");
        assert_eq!(rules.fence_close(), "```");
    }
}
