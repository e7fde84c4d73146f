//! The compiler oracle: main-file discovery and `crystal tool` subprocess
//! calls, used as the last-resort fallback tier in the semantic analyzer.
//!
//! Per spec.md §4.H this crate never invents semantics of its own — it only
//! shells out to the real `crystal` binary and parses its output.

use crate::subprocess::{OsSubprocess, Subprocess};
use regex::Regex;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lazy_static::lazy_static;
use parking_lot::RwLock;
use thiserror::Error;

lazy_static! {
    static ref IMPLEMENTATIONS_LINE: Regex =
        Regex::new(r"^\s*-?\s*(.+\.cr):(\d+):(\d+)").unwrap_or_else(|_| unreachable!());
}

const MAIN_FILE_CACHE_TTL: Duration = Duration::from_secs(5);

/// A failure reaching or interpreting the `crystal` compiler.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The subprocess could not be started or waited on.
    #[error("subprocess failure: {0}")]
    Subprocess(#[from] crate::subprocess::SubprocessError),
    /// The compiler ran but reported a usage or compile error.
    #[error("crystal reported an error: {0}")]
    CompilerError(String),
}

/// One location reported by `crystal tool implementations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementationLocation {
    /// Absolute path to the file containing the implementation.
    pub file: PathBuf,
    /// 1-based line number, as reported by the compiler.
    pub line: u32,
    /// 1-based column number, as reported by the compiler.
    pub column: u32,
}

struct MainFileCache {
    value: Option<PathBuf>,
    computed_at: Instant,
}

/// Bridges the analyzer to the Crystal compiler's `tool implementations`
/// and `tool context` subcommands, plus `shard.yml`-based main-file
/// discovery and `CRYSTAL_PATH` stdlib-root detection.
pub struct CompilerOracle<S: Subprocess = OsSubprocess> {
    subprocess: S,
    main_file_cache: RwLock<Option<MainFileCache>>,
    last_written_hash: RwLock<std::collections::HashMap<PathBuf, u64>>,
}

impl Default for CompilerOracle<OsSubprocess> {
    fn default() -> Self {
        Self::new(OsSubprocess)
    }
}

impl<S: Subprocess> CompilerOracle<S> {
    /// A new oracle backed by `subprocess`.
    pub fn new(subprocess: S) -> Self {
        Self {
            subprocess,
            main_file_cache: RwLock::new(None),
            last_written_hash: RwLock::new(std::collections::HashMap::new()),
        }
    }

    /// The project's entry-point file: `shard.yml`'s `targets.*.main` if
    /// present, else the first of `src/<root-basename>.cr`, `src/main.cr`,
    /// `main.cr` under `root` that exists. Cached for five seconds, since
    /// this rarely changes and every semantic request would otherwise
    /// re-read `shard.yml`.
    pub fn main_file(&self, root: &Path) -> Option<PathBuf> {
        if let Some(cache) = self.main_file_cache.read().as_ref() {
            if cache.computed_at.elapsed() < MAIN_FILE_CACHE_TTL {
                return cache.value.clone();
            }
        }
        let value = self.discover_main_file(root);
        *self.main_file_cache.write() = Some(MainFileCache { value: value.clone(), computed_at: Instant::now() });
        value
    }

    fn discover_main_file(&self, root: &Path) -> Option<PathBuf> {
        if let Some(main) = self.main_file_from_shard_yml(root) {
            return Some(main);
        }
        let basename = root.file_name().and_then(|n| n.to_str()).unwrap_or("main");
        for candidate in [
            root.join("src").join(format!("{basename}.cr")),
            root.join("src").join("main.cr"),
            root.join("main.cr"),
        ] {
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }

    fn main_file_from_shard_yml(&self, root: &Path) -> Option<PathBuf> {
        let text = std::fs::read_to_string(root.join("shard.yml")).ok()?;
        // `targets:` blocks look like:
        //   targets:
        //     my_app:
        //       main: src/my_app.cr
        let mut in_targets = false;
        for line in text.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("targets:") {
                in_targets = true;
                continue;
            }
            if in_targets {
                if let Some(rest) = trimmed.strip_prefix("main:") {
                    let value = rest.trim().trim_matches(['"', '\'']);
                    let candidate = root.join(value);
                    if candidate.is_file() {
                        return Some(candidate);
                    }
                }
                if !line.starts_with(' ') && !line.starts_with('\t') && !trimmed.starts_with("main:") {
                    in_targets = false;
                }
            }
        }
        None
    }

    /// Ensure the compiler sees `text` for `file` before the next subprocess
    /// call: writes to disk only if `text`'s hash differs from the hash
    /// recorded for the last write to this path, so unchanged buffers don't
    /// incur a redundant write on every semantic request.
    pub fn sync_before_call(&self, file: &Path, text: &str) -> std::io::Result<()> {
        let hash = content_hash(text);
        if self.last_written_hash.read().get(file) == Some(&hash) {
            return Ok(());
        }
        std::fs::write(file, text)?;
        self.last_written_hash.write().insert(file.to_path_buf(), hash);
        Ok(())
    }

    /// Run `crystal tool implementations -c <file>:<line>:<column> [main]`
    /// and parse the reported locations.
    pub fn implementations(
        &self,
        file: &Path,
        line: u32,
        column: u32,
        main: Option<&Path>,
    ) -> Result<Vec<ImplementationLocation>, OracleError> {
        let cursor = format!("{}:{line}:{column}", file.display());
        let mut args = vec!["tool".to_string(), "implementations".to_string(), "-c".to_string(), cursor];
        if let Some(main) = main {
            args.push(main.display().to_string());
        }
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self.subprocess.run("crystal", &arg_refs)?;
        if !output.success() && output.stdout.trim().is_empty() {
            return Err(OracleError::CompilerError(output.stderr));
        }

        let mut out = Vec::new();
        for cap in IMPLEMENTATIONS_LINE.captures_iter(&output.stdout) {
            let (Ok(line), Ok(column)) = (cap[2].parse(), cap[3].parse()) else { continue };
            out.push(ImplementationLocation { file: PathBuf::from(&cap[1]), line, column });
        }
        Ok(out)
    }

    /// Run `crystal tool context -c <file>:<line>:<column> [main]` and
    /// return its textual context report, or `None` if the compiler
    /// reported no usable context.
    pub fn context(&self, file: &Path, line: u32, column: u32, main: Option<&Path>) -> Option<String> {
        let cursor = format!("{}:{line}:{column}", file.display());
        let mut args = vec!["tool".to_string(), "context".to_string(), "-c".to_string(), cursor];
        if let Some(main) = main {
            args.push(main.display().to_string());
        }
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self.subprocess.run("crystal", &arg_refs).ok()?;

        let lower = output.stdout.to_lowercase();
        if lower.contains("error") || lower.contains("usage:") || lower.contains("no context") {
            return None;
        }
        if output.stdout.trim().is_empty() {
            return None;
        }
        Some(output.stdout)
    }

    /// Directories on `CRYSTAL_PATH` that look like a Crystal stdlib root
    /// (contain `prelude.cr` or `object.cr`).
    pub fn crystal_path_roots(&self) -> Vec<PathBuf> {
        let Ok(raw) = std::env::var("CRYSTAL_PATH") else { return Vec::new() };
        std::env::split_paths(&raw)
            .filter(|p| p.join("prelude.cr").is_file() || p.join("object.cr").is_file())
            .collect()
    }
}

/// Shared-ownership handle, for wiring one oracle into multiple consumers
/// (the analyzer and the workspace index's stdlib-root injection) without
/// duplicating subprocess state.
pub type SharedOracle<S = OsSubprocess> = Arc<CompilerOracle<S>>;

fn content_hash(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}
