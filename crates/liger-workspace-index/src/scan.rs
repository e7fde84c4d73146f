//! Directory walking for the three scan tiers, per spec.md §4.G.

use liger_parser::extract_symbols;
use liger_symbol::SymbolInfo;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MAX_PROJECT_DEPTH: usize = 10;
const MAX_LIB_DEPTH: usize = 3;
const MAX_STDLIB_DEPTH: usize = 2;

const STDLIB_DENYLIST: &[&str] = &["spec", "compiler", ".git"];

/// Scan `root` recursively for `.cr` files, excluding hidden directories,
/// `bin/`, and (since this is the project pass) `lib/`. Capped at
/// [`MAX_PROJECT_DEPTH`].
pub fn scan_project(root: &Path) -> Vec<(PathBuf, Vec<SymbolInfo>)> {
    walk(root, MAX_PROJECT_DEPTH, |name| name == "bin" || name == "lib" || is_hidden(name))
}

/// Scan every `<root>/lib/*/src` directory to [`MAX_LIB_DEPTH`].
pub fn scan_lib(root: &Path) -> Vec<(PathBuf, Vec<SymbolInfo>)> {
    let lib_dir = root.join("lib");
    let Ok(entries) = std::fs::read_dir(&lib_dir) else { return Vec::new() };

    let mut out = Vec::new();
    for entry in entries.flatten() {
        let src = entry.path().join("src");
        if src.is_dir() {
            out.extend(walk(&src, MAX_LIB_DEPTH, is_hidden));
        }
    }
    out
}

/// Scan a stdlib root to [`MAX_STDLIB_DEPTH`], skipping internal
/// directories not useful for symbol lookup.
pub fn scan_stdlib(root: &Path) -> Vec<(PathBuf, Vec<SymbolInfo>)> {
    walk(root, MAX_STDLIB_DEPTH, |name| is_hidden(name) || STDLIB_DENYLIST.contains(&name))
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn walk(
    root: &Path,
    max_depth: usize,
    exclude_dir: impl Fn(&str) -> bool,
) -> Vec<(PathBuf, Vec<SymbolInfo>)> {
    let mut out = Vec::new();
    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|entry| {
            if entry.file_type().is_dir() {
                let name = entry.file_name().to_string_lossy();
                entry.depth() == 0 || !exclude_dir(&name)
            } else {
                true
            }
        });

    for entry in walker.flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("cr") {
            continue;
        }
        let Ok(text) = std::fs::read_to_string(path) else {
            eprintln!("[liger] skipping unreadable file: {}", path.display());
            continue;
        };
        let symbols = extract_symbols(&text, path);
        out.push((path.to_path_buf(), symbols));
    }
    out
}
