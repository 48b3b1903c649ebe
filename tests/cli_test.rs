//! End-to-end tests of the `code2md` binary

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;

const SOURCE: &str = "/*\nDoc\n*/\nint main(void) {\n    int a = 1;\n    return 0;\n}\n";
const MARKDOWN: &str = "### Doc\n\n```\nint a = 1;\n```\n\n";
const MARKDOWN_WITH_MAIN: &str =
    "### Doc\n\n```\nint main(void) {\n    int a = 1;\n    return 0;\n}\n```\n\n";

fn code2md(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_code2md"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run code2md")
}

#[test]
fn test_rewrites_file_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.c");
    fs::write(&path, SOURCE).unwrap();

    let output = code2md(dir.path(), &["doc.c"]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(fs::read_to_string(&path).unwrap(), MARKDOWN);
}

#[test]
fn test_second_argument_keeps_entry_point() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.c");
    fs::write(&path, SOURCE).unwrap();

    let output = code2md(dir.path(), &["doc.c", "1"]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(fs::read_to_string(&path).unwrap(), MARKDOWN_WITH_MAIN);
}

#[test]
fn test_stdout_leaves_input_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.c");
    fs::write(&path, SOURCE).unwrap();

    let output = code2md(dir.path(), &["--stdout", "doc.c"]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8(output.stdout).unwrap(), MARKDOWN);
    assert_eq!(fs::read_to_string(&path).unwrap(), SOURCE);
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("doc.c"), SOURCE).unwrap();

    let output = code2md(dir.path(), &["-o", "doc.md", "doc.c"]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        fs::read_to_string(dir.path().join("doc.md")).unwrap(),
        MARKDOWN
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("doc.c")).unwrap(),
        SOURCE
    );
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = code2md(dir.path(), &["missing.c"]);
    assert!(!output.status.success());
}

#[test]
fn test_too_short_input_fails_and_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.c");
    fs::write(&path, "int x;\n").unwrap();

    let output = code2md(dir.path(), &["tiny.c"]);
    assert!(!output.status.success());
    assert_eq!(fs::read_to_string(&path).unwrap(), "int x;\n");
}

#[test]
fn test_stdin_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_code2md"))
        .current_dir(dir.path())
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(SOURCE.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8(output.stdout).unwrap(), MARKDOWN);
}

#[test]
fn test_recursive_directory_with_exclude() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    let nested = src.join("nested");
    let skipped = src.join("vendor");
    fs::create_dir_all(&nested).unwrap();
    fs::create_dir_all(&skipped).unwrap();
    fs::write(src.join("a.c"), SOURCE).unwrap();
    fs::write(nested.join("b.c"), SOURCE).unwrap();
    fs::write(skipped.join("c.c"), SOURCE).unwrap();
    fs::write(src.join("notes.txt"), SOURCE).unwrap();

    let output = code2md(dir.path(), &["-r", "-e", "vendor", "-j", "1", "src"]);
    assert!(output.status.success(), "{output:?}");

    assert_eq!(fs::read_to_string(src.join("a.c")).unwrap(), MARKDOWN);
    assert_eq!(fs::read_to_string(nested.join("b.c")).unwrap(), MARKDOWN);
    assert_eq!(fs::read_to_string(skipped.join("c.c")).unwrap(), SOURCE);
    assert_eq!(fs::read_to_string(src.join("notes.txt")).unwrap(), SOURCE);
}

#[test]
fn test_directory_without_recursion_stays_shallow() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("src/nested");
    fs::create_dir_all(&nested).unwrap();
    fs::write(dir.path().join("src/a.c"), SOURCE).unwrap();
    fs::write(nested.join("b.c"), SOURCE).unwrap();

    let output = code2md(dir.path(), &["src"]);
    assert!(output.status.success(), "{output:?}");

    assert_eq!(
        fs::read_to_string(dir.path().join("src/a.c")).unwrap(),
        MARKDOWN
    );
    assert_eq!(fs::read_to_string(nested.join("b.c")).unwrap(), SOURCE);
}

#[test]
fn test_config_file_flag() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("doc.c"), SOURCE).unwrap();
    fs::write(dir.path().join("custom.toml"), "fence_info = \"c\"\n").unwrap();

    let output = code2md(dir.path(), &["-c", "custom.toml", "-s", "doc.c"]);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "### Doc\n\n```c\nint a = 1;\n```\n\n"
    );
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("doc.c"), SOURCE).unwrap();

    let output = code2md(dir.path(), &["-i", "0", "-s", "doc.c"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
