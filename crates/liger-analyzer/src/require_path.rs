//! `require "..."` line parsing and resolution, shared by goto-definition
//! step 1 and hover step 1 (spec.md §4.F).
//!
//! spec.md defers the actual resolution rule to "§4.H require-path
//! resolution", but §4.H itself only documents URI translation, main-file
//! discovery, and the oracle calls — it never actually spells out how a
//! `require` string maps to a file. The classification (relative / shard /
//! stdlib-or-unknown) that both goto-definition and hover need is recorded
//! here; see DESIGN.md for the resolution rule this module was built to.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref REQUIRE: Regex =
        Regex::new(r#"^\s*require\s+"([^"]*)""#).unwrap_or_else(|_| unreachable!());
}

/// A parsed `require "..."` line: the quoted path text and its UTF-16
/// column span (covering the quotes themselves, so a cursor anywhere
/// between and including them counts as "within the quoted path").
pub struct RequireLine {
    pub path: String,
    quote_start: u32,
    quote_end: u32,
}

/// How a `require` path was classified during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// `./foo` or `../foo`, resolved relative to the requiring file.
    Relative,
    /// A bare path matching a shard under `<root>/lib/<name>/src/`.
    Shard,
    /// Neither of the above; may be a stdlib path or simply unresolved.
    StdlibOrUnknown,
}

/// Parse `line` as a `require "..."` statement, if it is one.
pub fn parse(line: &str) -> Option<RequireLine> {
    let caps = REQUIRE.captures(line)?;
    let m = caps.get(1)?;
    let quote_start = utf16_col(line, m.start() - 1);
    let quote_end = utf16_col(line, m.end() + 1);
    Some(RequireLine { path: m.as_str().to_string(), quote_start, quote_end })
}

fn utf16_col(line: &str, byte_offset: usize) -> u32 {
    line[..byte_offset].chars().map(|c| c.len_utf16() as u32).sum()
}

impl RequireLine {
    /// True iff `character` (a 0-based UTF-16 column) falls within the
    /// quoted path, inclusive of the surrounding quotes.
    pub fn contains(&self, character: u32) -> bool {
        character >= self.quote_start && character <= self.quote_end
    }
}

/// Resolve a `require` path written in `file`, relative to workspace `root`
/// and the given stdlib search roots (typically the compiler oracle's
/// `CRYSTAL_PATH` entries, falling back to `liger_workspace_index::STDLIB_FALLBACKS`).
///
/// Classification follows hover step 1's three buckets: a `./`/`../`-prefixed
/// path is always `Relative` (whether or not it resolves); otherwise a path
/// whose first segment names a directory under `<root>/lib/` is `Shard`;
/// anything else is `StdlibOrUnknown`.
pub fn resolve(path: &str, file: &Path, root: &Path, stdlib_roots: &[PathBuf]) -> (Option<PathBuf>, Kind) {
    if let Some(rel) = path.strip_prefix("./").or_else(|| path.strip_prefix("../")) {
        let _ = rel;
        let base = file.parent().unwrap_or(root);
        let candidate = with_cr_extension(base.join(path));
        return (candidate.is_file().then_some(candidate), Kind::Relative);
    }

    let first_segment = path.split('/').next().unwrap_or(path);
    let shard_src = root.join("lib").join(first_segment).join("src");
    if shard_src.is_dir() {
        let candidate = with_cr_extension(shard_src.join(path));
        return (candidate.is_file().then_some(candidate), Kind::Shard);
    }

    for stdlib_root in stdlib_roots {
        let candidate = with_cr_extension(stdlib_root.join(path));
        if candidate.is_file() {
            return (Some(candidate), Kind::StdlibOrUnknown);
        }
    }
    (None, Kind::StdlibOrUnknown)
}

fn with_cr_extension(mut p: PathBuf) -> PathBuf {
    if p.extension().is_none() {
        p.set_extension("cr");
    }
    p
}

/// Render the require-hover markdown for `path`, classified as `kind` and
/// resolved (or not) to `resolved`.
pub fn render_hover(path: &str, resolved: &Option<PathBuf>, kind: Kind) -> String {
    let classification = match kind {
        Kind::Relative => "relative",
        Kind::Shard => "shard",
        Kind::StdlibOrUnknown => "stdlib or unknown",
    };
    match resolved {
        Some(p) => format!("**require** `{path}`\n\nResolves to `{}` ({classification}).", p.display()),
        None => format!("**require** `{path}`\n\nUnresolved ({classification})."),
    }
}
