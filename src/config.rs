//! Configuration management for code2md.
//!
//! This module provides the [`Config`] struct which controls the textual markers
//! the converter recognizes and how the Markdown is rendered.
//! Configuration can be loaded from:
//! - TOML files (`code2md.toml`)
//! - CLI arguments (which override file settings)
//!
//! Config files are auto-discovered by searching parent directories from the file
//! being converted up to the filesystem root, plus the user's home directory.

use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::convert::ConversionOptions;
use crate::error::Result;

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["code2md.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    // Fallback for Windows
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

// Serde default functions
fn default_entry_point_open() -> String {
    "int main(void) {".to_string()
}
fn default_entry_point_close() -> String {
    "return 0;".to_string()
}
fn default_include_prefix() -> String {
    "#include".to_string()
}
fn default_comment_open() -> String {
    "/*".to_string()
}
fn default_comment_close() -> String {
    "*/".to_string()
}
fn default_line_comment() -> String {
    "//".to_string()
}
fn default_example_prefix() -> String {
    "Example".to_string()
}
fn default_switch_keyword() -> String {
    "switch".to_string()
}
fn default_indent_width() -> usize {
    4
}
fn default_fence() -> String {
    "```".to_string()
}

/// Main configuration struct for code2md
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Keep the entry-point wrapper and its trivial return (default: false)
    #[serde(default)]
    pub keep_entry_point: bool,

    /// Entry-point opening line, matched after trimming (default: `int main(void) {`)
    #[serde(default = "default_entry_point_open")]
    pub entry_point_open: String,

    /// Entry-point termination line, matched after trimming (default: `return 0;`)
    #[serde(default = "default_entry_point_close")]
    pub entry_point_close: String,

    /// Prefix of include lines dropped at the start of a code block (default: `#include`)
    #[serde(default = "default_include_prefix")]
    pub include_prefix: String,

    /// Block comment opener (default: `/*`)
    #[serde(default = "default_comment_open")]
    pub comment_open: String,

    /// Block comment terminator (default: `*/`)
    #[serde(default = "default_comment_close")]
    pub comment_close: String,

    /// Single-line comment marker, only used to decide how the header is primed
    /// (default: `//`)
    #[serde(default = "default_line_comment")]
    pub line_comment: String,

    /// Comment lines starting with this word become level-4 headings (default: `Example`)
    #[serde(default = "default_example_prefix")]
    pub example_prefix: String,

    /// Keyword that opens a multi-way branch (default: `switch`)
    #[serde(default = "default_switch_keyword")]
    pub switch_keyword: String,

    /// Number of spaces per indent level (default: 4)
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    /// Code fence delimiter (default: three backticks)
    #[serde(default = "default_fence")]
    pub fence: String,

    /// Info string appended to opening fences, e.g. `c` (default: none)
    #[serde(default)]
    pub fence_info: String,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
struct PartialConfig {
    pub keep_entry_point: Option<bool>,
    pub entry_point_open: Option<String>,
    pub entry_point_close: Option<String>,
    pub include_prefix: Option<String>,
    pub comment_open: Option<String>,
    pub comment_close: Option<String>,
    pub line_comment: Option<String>,
    pub example_prefix: Option<String>,
    pub switch_keyword: Option<String>,
    pub indent_width: Option<usize>,
    pub fence: Option<String>,
    pub fence_info: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keep_entry_point: false,
            entry_point_open: default_entry_point_open(),
            entry_point_close: default_entry_point_close(),
            include_prefix: default_include_prefix(),
            comment_open: default_comment_open(),
            comment_close: default_comment_close(),
            line_comment: default_line_comment(),
            example_prefix: default_example_prefix(),
            switch_keyword: default_switch_keyword(),
            indent_width: default_indent_width(),
            fence: default_fence(),
            fence_info: String::new(),
        }
    }
}

impl Config {
    /// Maximum reasonable indent width
    const MAX_INDENT_WIDTH: usize = 16;
    /// Minimum fence length accepted by CommonMark
    const MIN_FENCE_LEN: usize = 3;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.indent_width == 0 {
            return Some("indent_width must be at least 1".to_string());
        }
        if self.indent_width > Self::MAX_INDENT_WIDTH {
            return Some(format!(
                "indent_width {} exceeds maximum of {}",
                self.indent_width,
                Self::MAX_INDENT_WIDTH
            ));
        }

        let markers = [
            ("entry_point_open", &self.entry_point_open),
            ("entry_point_close", &self.entry_point_close),
            ("include_prefix", &self.include_prefix),
            ("comment_open", &self.comment_open),
            ("comment_close", &self.comment_close),
            ("line_comment", &self.line_comment),
            ("example_prefix", &self.example_prefix),
            ("switch_keyword", &self.switch_keyword),
        ];
        for (name, value) in markers {
            if value.trim().is_empty() {
                return Some(format!("{name} must not be empty"));
            }
            if value.trim() != value.as_str() {
                return Some(format!("{name} must not have surrounding whitespace"));
            }
        }

        if self.comment_open == self.comment_close {
            return Some("comment_open and comment_close must differ".to_string());
        }

        let fence_char = self.fence.chars().next();
        let uniform = fence_char
            .is_some_and(|c| (c == '`' || c == '~') && self.fence.chars().all(|f| f == c));
        if !uniform || self.fence.chars().count() < Self::MIN_FENCE_LEN {
            return Some(format!(
                "fence {:?} must be at least {} backticks or tildes",
                self.fence,
                Self::MIN_FENCE_LEN
            ));
        }
        if self.fence_info.chars().any(char::is_whitespace) {
            return Some(format!(
                "fence_info {:?} must be a single word",
                self.fence_info
            ));
        }
        None
    }

    /// Build the converter options described by this configuration
    pub fn options(&self) -> Result<ConversionOptions> {
        ConversionOptions::from_config(self)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.keep_entry_point {
            self.keep_entry_point = v;
        }
        if let Some(v) = &partial.entry_point_open {
            self.entry_point_open.clone_from(v);
        }
        if let Some(v) = &partial.entry_point_close {
            self.entry_point_close.clone_from(v);
        }
        if let Some(v) = &partial.include_prefix {
            self.include_prefix.clone_from(v);
        }
        if let Some(v) = &partial.comment_open {
            self.comment_open.clone_from(v);
        }
        if let Some(v) = &partial.comment_close {
            self.comment_close.clone_from(v);
        }
        if let Some(v) = &partial.line_comment {
            self.line_comment.clone_from(v);
        }
        if let Some(v) = &partial.example_prefix {
            self.example_prefix.clone_from(v);
        }
        if let Some(v) = &partial.switch_keyword {
            self.switch_keyword.clone_from(v);
        }
        if let Some(v) = partial.indent_width {
            self.indent_width = v;
        }
        if let Some(v) = &partial.fence {
            self.fence.clone_from(v);
        }
        if let Some(v) = &partial.fence_info {
            self.fence_info.clone_from(v);
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home directory config.
    /// Returns list of config file paths in order of priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Home directory config has the lowest priority
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            std::env::current_dir().ok()
        };

        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // Root first, so closer directories override
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Returns default config if no files found.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let config_files = Self::discover_config_files(start_path);

        let mut config = Self::default();
        for path in &config_files {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => warn!("failed to parse {}: {e}", path.display()),
                },
                Err(e) => warn!("failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}
