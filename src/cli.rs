//! Command-line interface for code2md.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Source file or directory to convert (`-` reads stdin)
    pub input: PathBuf,

    /// Keep the entry-point wrapper (set by `-k` or by any second positional argument)
    pub keep_entry_point: bool,

    /// Write the Markdown to a different file instead of rewriting the input
    pub output: Option<PathBuf>,

    /// Write the Markdown to stdout instead of rewriting the input
    pub stdout: bool,

    /// Number of spaces per indent level
    pub indent_width: Option<usize>,

    /// Info string for opening code fences
    pub fence_info: Option<String>,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Recursive directory processing
    pub recursive: bool,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Source file extensions in addition to the defaults
    pub extensions: Vec<String>,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Silent mode (warnings and errors only)
    pub silent: bool,

    /// Enable debug output
    pub debug: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("code2md")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert annotated C sources (code interleaved with block comments) into Markdown")
        .after_help(
            "The input file is rewritten in place unless --stdout or --output is given.\n\
             Any second positional argument keeps the `int main(void) {` wrapper.",
        )
        .arg(
            Arg::new("input")
                .help("Source file or directory to convert (`-` reads stdin)")
                .value_name("PATH")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("keep-entry-point-arg")
                .help("Any value keeps the entry-point wrapper")
                .value_name("KEEP_ENTRY_POINT")
                .required(false),
        )
        .arg(
            Arg::new("keep-entry-point")
                .short('k')
                .long("keep-entry-point")
                .help("Keep the entry-point wrapper and its trivial return")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Write Markdown to FILE instead of rewriting the input")
                .value_name("FILE")
                .conflicts_with("stdout")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .help("Write Markdown to stdout instead of rewriting the input")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("indent-width")
                .short('i')
                .long("indent-width")
                .help("Number of spaces per indent level [default: 4]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("fence-info")
                .long("fence-info")
                .help("Info string for opening code fences, e.g. `c` [default: none]")
                .value_name("TAG"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Config file path (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Descend into subdirectories when PATH is a directory")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/dirs matching glob pattern (repeatable)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("extension")
                .short('x')
                .long("extension")
                .help("Additional source extension for directory scans (repeatable)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Only report warnings and errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("debug"),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        input: matches
            .get_one::<PathBuf>("input")
            .cloned()
            .unwrap_or_default(),
        keep_entry_point: matches.get_flag("keep-entry-point")
            || matches.contains_id("keep-entry-point-arg"),
        output: matches.get_one::<PathBuf>("output").cloned(),
        stdout: matches.get_flag("stdout"),
        indent_width: matches.get_one::<usize>("indent-width").copied(),
        fence_info: matches.get_one::<String>("fence-info").cloned(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        extensions: matches
            .get_many::<String>("extension")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        jobs: matches.get_one::<usize>("jobs").copied(),
        silent: matches.get_flag("silent"),
        debug: matches.get_flag("debug"),
    }
}
