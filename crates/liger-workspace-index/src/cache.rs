//! The three symbol caches and the scan-scheduling policy, per spec.md §4.G.

use liger_parser::extract_symbols;
use liger_symbol::SymbolInfo;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::scan;

const RESCAN_DEBOUNCE: Duration = Duration::from_secs(5);

/// Roots that may hold a Crystal standard library, tried in order when the
/// compiler oracle cannot supply `CRYSTAL_PATH`.
pub const STDLIB_FALLBACKS: &[&str] =
    &["/usr/share/crystal/src", "/usr/local/share/crystal/src", "/opt/crystal/src"];

/// Recursive symbol index over the project, its `lib/` shard dependencies,
/// and the Crystal standard library.
///
/// All three caches key on absolute file path. Interior mutability is via
/// `parking_lot::RwLock`; the single-threaded dispatch loop never contends
/// on these locks, but holding the index behind shared references (rather
/// than requiring `&mut self` on every query) keeps the analyzer's call
/// sites simple.
pub struct WorkspaceIndex {
    root: PathBuf,
    workspace_cache: RwLock<HashMap<PathBuf, Vec<SymbolInfo>>>,
    lib_cache: RwLock<HashMap<PathBuf, Vec<SymbolInfo>>>,
    stdlib_cache: RwLock<HashMap<PathBuf, Vec<SymbolInfo>>>,
    last_scan: RwLock<Option<Instant>>,
    lib_scanned: RwLock<bool>,
    stdlib_scanned: RwLock<bool>,
}

impl WorkspaceIndex {
    /// An index rooted at `root`, with all caches empty and unscanned.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            workspace_cache: RwLock::new(HashMap::new()),
            lib_cache: RwLock::new(HashMap::new()),
            stdlib_cache: RwLock::new(HashMap::new()),
            last_scan: RwLock::new(None),
            lib_scanned: RwLock::new(false),
            stdlib_scanned: RwLock::new(false),
        }
    }

    /// The workspace root this index scans.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the project and (once) the lib tier if the debounce window has
    /// elapsed since the last completed scan.
    pub fn scan_if_needed(&self) {
        let due = match *self.last_scan.read() {
            Some(last) => last.elapsed() >= RESCAN_DEBOUNCE,
            None => true,
        };
        if due {
            self.force_scan();
        }
    }

    /// Unconditionally rescan the project tier (and the lib tier, once).
    pub fn force_scan(&self) {
        let project = scan::scan_project(&self.root);
        {
            let mut cache = self.workspace_cache.write();
            cache.clear();
            cache.extend(project);
        }

        if !*self.lib_scanned.read() {
            let lib = scan::scan_lib(&self.root);
            self.lib_cache.write().extend(lib);
            *self.lib_scanned.write() = true;
        }

        *self.last_scan.write() = Some(Instant::now());
    }

    /// Scan the stdlib tier once, using `stdlib_root` if one is supplied
    /// (typically discovered via the compiler oracle's `CRYSTAL_PATH`), or
    /// the first existing entry in [`STDLIB_FALLBACKS`] otherwise.
    pub fn scan_stdlib_if_needed(&self, stdlib_root: Option<&Path>) {
        if *self.stdlib_scanned.read() {
            return;
        }
        let root = stdlib_root.map(Path::to_path_buf).or_else(|| {
            STDLIB_FALLBACKS.iter().map(PathBuf::from).find(|p| p.is_dir())
        });
        if let Some(root) = root {
            let stdlib = scan::scan_stdlib(&root);
            self.stdlib_cache.write().extend(stdlib);
        }
        *self.stdlib_scanned.write() = true;
    }

    /// Invalidate the debounce timestamp (forcing the next `scan_if_needed`
    /// to rescan) and, for a `.cr` path, immediately re-extract and replace
    /// that one file's cache entry.
    pub fn update_source(&self, file: &Path, text: &str) {
        *self.last_scan.write() = None;
        if file.extension().and_then(|e| e.to_str()) == Some("cr") {
            let symbols = extract_symbols(text, file);
            self.workspace_cache.write().insert(file.to_path_buf(), symbols);
        }
    }

    /// True iff the stdlib tier has been scanned (successfully or not).
    pub fn stdlib_scanned(&self) -> bool {
        *self.stdlib_scanned.read()
    }

    /// Iterate every cached symbol across all three tiers.
    pub(crate) fn all_symbols(&self) -> Vec<SymbolInfo> {
        let mut out = Vec::new();
        for cache in [&self.workspace_cache, &self.lib_cache, &self.stdlib_cache] {
            for symbols in cache.read().values() {
                out.extend(symbols.iter().cloned());
            }
        }
        out
    }

    /// Symbols cached for one specific file, across all three tiers.
    pub(crate) fn symbols_in_file(&self, file: &Path) -> Vec<SymbolInfo> {
        for cache in [&self.workspace_cache, &self.lib_cache, &self.stdlib_cache] {
            if let Some(symbols) = cache.read().get(file) {
                return symbols.clone();
            }
        }
        Vec::new()
    }

    /// Every file path currently cached, across all three tiers, after
    /// ensuring the project tier is up to date.
    ///
    /// Used by whole-workspace operations (`find_references`) that need to
    /// scan raw file text rather than extracted symbols.
    pub fn indexed_files(&self) -> Vec<PathBuf> {
        self.scan_if_needed();
        let mut out = Vec::new();
        for cache in [&self.workspace_cache, &self.lib_cache, &self.stdlib_cache] {
            out.extend(cache.read().keys().cloned());
        }
        out
    }

    /// Every symbol across all tiers whose simple name contains `query`
    /// (case-insensitive substring); an empty `query` matches everything.
    ///
    /// Backs `workspace/symbol` and completion's bare-prefix workspace-symbol
    /// augmentation.
    pub fn search_symbols(&self, query: &str) -> Vec<SymbolInfo> {
        self.scan_if_needed();
        let needle = query.to_lowercase();
        self.all_symbols()
            .into_iter()
            .filter(|s| needle.is_empty() || s.simple_name().to_lowercase().contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liger_tdd_support::must;
    use std::fs;

    #[test]
    fn force_scan_populates_workspace_cache() {
        let dir = must(tempfile::tempdir());
        must(fs::write(dir.path().join("a.cr"), "class A\nend\n"));
        let index = WorkspaceIndex::new(dir.path());
        index.force_scan();
        assert!(!index.all_symbols().is_empty());
    }

    #[test]
    fn scan_if_needed_is_a_noop_within_the_debounce_window() {
        let dir = must(tempfile::tempdir());
        let index = WorkspaceIndex::new(dir.path());
        index.force_scan();
        must(fs::write(dir.path().join("b.cr"), "class B\nend\n"));
        index.scan_if_needed();
        assert!(index.all_symbols().iter().all(|s| s.name != "B"));
    }

    #[test]
    fn update_source_forces_the_next_scan_and_refreshes_the_file_immediately() {
        let dir = must(tempfile::tempdir());
        let index = WorkspaceIndex::new(dir.path());
        index.force_scan();

        let file = dir.path().join("live.cr");
        index.update_source(&file, "class Live\nend\n");
        assert!(index.symbols_in_file(&file).iter().any(|s| s.name == "Live"));
    }

    #[test]
    fn lib_tier_is_scanned_only_once() {
        let dir = must(tempfile::tempdir());
        let shard_src = dir.path().join("lib").join("shard").join("src");
        must(fs::create_dir_all(&shard_src));
        must(fs::write(shard_src.join("shard.cr"), "module Shard\nend\n"));

        let index = WorkspaceIndex::new(dir.path());
        index.force_scan();
        assert!(index.all_symbols().iter().any(|s| s.name == "Shard"));

        must(fs::write(shard_src.join("extra.cr"), "module Extra\nend\n"));
        index.force_scan();
        assert!(index.all_symbols().iter().all(|s| s.name != "Extra"));
    }
}
