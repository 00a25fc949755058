//! Lint Allowance Enforcement
//!
//! Production sources of the `movos-*` crates may not carry
//! `#[allow(dead_code)]` or `#[allow(unused...)]`. Code after the first
//! `#[cfg(test)]` line of a file is exempt.

use std::fs;
use std::path::{Path, PathBuf};

const BANNED_LINTS: [&str; 2] = ["dead_code", "unused"];

/// A lint allowance found in production code
#[derive(Debug)]
struct AllowanceViolation {
    file_path: String,
    line_number: usize,
    context: String,
}

/// Returns whether `line` is an allow attribute naming a banned lint.
fn is_banned_allowance(line: &str) -> bool {
    let trimmed = line.trim();
    (trimmed.starts_with("#[allow(") || trimmed.starts_with("#![allow("))
        && BANNED_LINTS.iter().any(|lint| trimmed.contains(lint))
}

/// Production lines of `content`: everything before the first test module.
fn production_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .map(|(index, line)| (index + 1, line))
}

fn find_sources(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            find_sources(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    Ok(())
}

fn check_workspace(root: &Path) -> std::io::Result<(usize, Vec<AllowanceViolation>)> {
    let mut files = Vec::new();
    for entry in fs::read_dir(root)? {
        let crate_dir = entry?.path();
        let is_movos_crate = crate_dir
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with("movos-"));
        let src = crate_dir.join("src");
        if is_movos_crate && src.is_dir() {
            find_sources(&src, &mut files)?;
        }
    }

    let mut violations = Vec::new();
    for file in &files {
        let content = fs::read_to_string(file)?;
        for (line_number, line) in production_lines(&content) {
            if is_banned_allowance(line) {
                violations.push(AllowanceViolation {
                    file_path: file.to_string_lossy().into_owned(),
                    line_number,
                    context: line.trim().to_string(),
                });
            }
        }
    }
    Ok((files.len(), violations))
}
