//! code2md - Turn annotated C sources into Markdown

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::{self, BufReader, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{bail, Context};
use code2md::error::IoContext;
use code2md::process::convert_file;
use code2md::{parse_args, CliArgs, Config, Result};
use glob::Pattern;
use log::{debug, error, info, warn, LevelFilter};
use rayon::prelude::*;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Extensions picked up when the input is a directory
const SOURCE_EXTENSIONS: &[&str] = &["c", "h", "cc", "cpp", "cxx", "hh", "hpp"];

/// Files larger than this are skipped (100 MB)
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

fn main() -> Result<()> {
    let args = parse_args();
    init_logger(&args)?;

    if args.input.as_os_str() == "-" {
        let config = build_config(&args, None)?;
        return process_stdin(&config);
    }

    if args.input.is_file() {
        let config = build_config(&args, Some(args.input.as_path()))?;
        return process_single_file(&args.input, &config, &args);
    }

    if !args.input.is_dir() {
        bail!("{} is neither a file nor a directory", args.input.display());
    }
    if args.output.is_some() {
        bail!(
            "--output needs a single input file, but {} is a directory",
            args.input.display()
        );
    }

    // An explicit config file applies to every file; otherwise each file
    // discovers its own
    let base_config = if args.config.is_some() {
        Some(build_config(&args, None)?)
    } else {
        None
    };

    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                warn!("failed to configure thread pool: {e}");
            }
        }
    }

    let files = collect_files(&args);
    if files.is_empty() {
        info!("No source files found in {}", args.input.display());
        return Ok(());
    }

    let failures = if args.stdout || args.jobs == Some(1) {
        process_files_sequential(&files, base_config.as_ref(), &args)
    } else {
        process_files_parallel(&files, base_config.as_ref(), &args)
    };

    if failures > 0 {
        bail!("{failures} of {} files failed to convert", files.len());
    }
    Ok(())
}

/// Route `log` output to stderr at the verbosity requested on the command line
fn init_logger(args: &CliArgs) -> Result<()> {
    let level = if args.debug {
        LevelFilter::Debug
    } else if args.silent {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    let log_config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    TermLogger::init(level, log_config, TerminalMode::Stderr, ColorChoice::Auto)?;
    Ok(())
}

/// Build configuration from CLI args and config files
///
/// If `for_path` is provided and no explicit config file is specified,
/// config files are discovered from its parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        debug!("Using explicit config file: {}", config_path.display());
        Config::from_toml_file(config_path)
            .with_context(|| format!("failed to load config {}", config_path.display()))?
    } else {
        let start = for_path.map_or_else(
            || std::env::current_dir().unwrap_or_default(),
            Path::to_path_buf,
        );
        let discovered = Config::discover_config_files(&start);
        if discovered.is_empty() {
            debug!("No config files discovered for {}", start.display());
        } else {
            debug!("Discovered config files for {}:", start.display());
            for f in &discovered {
                debug!("  - {}", f.display());
            }
        }
        Config::from_discovered_files(&start)
    };

    // CLI arguments override config files
    if args.keep_entry_point {
        config.keep_entry_point = true;
    }
    if let Some(indent_width) = args.indent_width {
        config.indent_width = indent_width;
    }
    if let Some(fence_info) = &args.fence_info {
        config.fence_info.clone_from(fence_info);
    }

    log_config_debug(&config);

    if let Some(error) = config.validate() {
        bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

fn log_config_debug(config: &Config) {
    debug!("Configuration:");
    debug!("  keep_entry_point: {}", config.keep_entry_point);
    debug!("  entry_point_open: {:?}", config.entry_point_open);
    debug!("  entry_point_close: {:?}", config.entry_point_close);
    debug!("  include_prefix: {:?}", config.include_prefix);
    debug!(
        "  comments: {:?} ... {:?}, line comment {:?}",
        config.comment_open, config.comment_close, config.line_comment
    );
    debug!("  example_prefix: {:?}", config.example_prefix);
    debug!("  switch_keyword: {:?}", config.switch_keyword);
    debug!("  indent_width: {}", config.indent_width);
    debug!("  fence: {:?} info {:?}", config.fence, config.fence_info);
}

/// Collect the source files below the input directory
fn collect_files(args: &CliArgs) -> Vec<PathBuf> {
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("ignoring invalid exclude pattern {p:?}: {e}");
                None
            }
        })
        .collect();

    let keep = |path: &Path| {
        path.is_file()
            && is_source_file(path, &args.extensions)
            && !is_excluded(path, &exclude_patterns)
    };

    let mut files: Vec<PathBuf> = if args.recursive {
        // max_depth guards against pathological trees; symlink loops surface
        // as walk errors and are skipped
        WalkDir::new(&args.input)
            .follow_links(true)
            .max_depth(256)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .map(walkdir::DirEntry::into_path)
            .filter(|path| keep(path))
            .collect()
    } else {
        match std::fs::read_dir(&args.input) {
            Ok(entries) => entries
                .filter_map(std::result::Result::ok)
                .map(|entry| entry.path())
                .filter(|path| keep(path))
                .collect(),
            Err(e) => {
                warn!("cannot read directory {}: {e}", args.input.display());
                Vec::new()
            }
        }
    };

    files.sort();
    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    for pattern in patterns {
        // Full path
        if pattern.matches(&path_str) {
            return true;
        }

        // File name only
        if let Some(file_name) = path.file_name() {
            if pattern.matches(&file_name.to_string_lossy()) {
                return true;
            }
        }

        // Any directory component
        for component in path.components() {
            if let std::path::Component::Normal(c) = component {
                if pattern.matches(&c.to_string_lossy()) {
                    return true;
                }
            }
        }
    }

    false
}

/// Check if a file has a known source extension (defaults plus `custom_extensions`)
fn is_source_file(path: &Path, custom_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
                || custom_extensions.iter().any(|custom| {
                    let custom_ext = custom.strip_prefix('.').unwrap_or(custom);
                    ext == custom_ext
                })
        })
}

/// Resolve the config for one file of a batch
fn config_for(path: &Path, base_config: Option<&Config>, args: &CliArgs) -> Result<Config> {
    match base_config {
        Some(config) => Ok(config.clone()),
        None => build_config(args, Some(path)),
    }
}

/// Process files one after another; returns the number of failures
fn process_files_sequential(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> usize {
    let mut failures = 0;
    for path in files {
        let result = config_for(path, base_config, args)
            .and_then(|config| process_single_file(path, &config, args));
        if let Err(e) = result {
            failures += 1;
            error!("Error converting {}: {e:#}", path.display());
        }
    }
    failures
}

/// Process files in parallel using Rayon; returns the number of failures
fn process_files_parallel(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
) -> usize {
    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        let result = config_for(path, base_config, args)
            .and_then(|config| process_single_file(path, &config, args));

        match result {
            Ok(()) => {
                success_count.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                error!("Error converting {}: {e:#}", path.display());
            }
        }
    });

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    if errors == 0 {
        info!("Converted {success} files successfully.");
    } else {
        info!("Converted {success} files, {errors} errors.");
    }
    errors
}

/// Convert a single file and write the result where the arguments ask
fn process_single_file(path: &Path, config: &Config, args: &CliArgs) -> Result<()> {
    // Check the size before reading anything
    let metadata = std::fs::metadata(path).for_path("inspect", path)?;
    let file_size = metadata.len();
    if file_size > DEFAULT_MAX_FILE_SIZE {
        warn!(
            "Skipping {} ({} MB exceeds limit of {} MB)",
            path.display(),
            file_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
        return Ok(());
    }

    let contents = std::fs::read(path).for_path("read", path)?;

    if !args.stdout {
        info!("Converting: {}", path.display());
    }

    let reader = BufReader::new(Cursor::new(&contents));
    let mut output = Vec::new();
    convert_file(reader, &mut output, config, &path.display().to_string())?;

    if args.stdout {
        io::stdout().lock().write_all(&output)?;
    } else if let Some(target) = &args.output {
        std::fs::write(target, &output).for_path("write", target)?;
    } else {
        replace_file(path, &output)?;
    }

    Ok(())
}

/// Rewrite `path` with `contents` via a sibling temporary file
///
/// The original is only replaced once the new contents are fully written.
fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).for_path("create a temporary file in", dir)?;
    tmp.write_all(contents).for_path("write", path)?;
    if let Ok(metadata) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .for_path("copy permissions of", path)?;
    }
    tmp.persist(path)
        .map_err(|e| e.error)
        .for_path("replace", path)?;
    Ok(())
}

/// Convert stdin to stdout
fn process_stdin(config: &Config) -> Result<()> {
    let mut contents = Vec::new();
    io::stdin()
        .read_to_end(&mut contents)
        .context("failed to read stdin")?;

    let size = u64::try_from(contents.len()).unwrap_or(u64::MAX);
    if size > DEFAULT_MAX_FILE_SIZE {
        bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    let reader = BufReader::new(Cursor::new(&contents));
    let mut stdout = io::stdout().lock();
    convert_file(reader, &mut stdout, config, "stdin")?;
    Ok(())
}
