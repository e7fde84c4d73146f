//! URI ↔ filesystem path translation.
//!
//! Per spec.md §4.H this is deliberately manual rather than delegated to a
//! general-purpose URL parser: the `file://` scheme is stripped, the
//! remainder is percent-decoded, and a leading slash in front of a
//! drive-letter path (`/C:/...`) is dropped. All `\\`/`/` separator
//! normalization for the whole crate funnels through this module, per
//! REDESIGN FLAGS in spec.md §9.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

const FILE_PREFIX: &str = "file://";

/// Convert a `file://` URI to a filesystem path.
///
/// Returns `None` if `uri` does not use the `file://` scheme.
pub fn uri_to_path(uri: &str) -> Option<PathBuf> {
    let rest = uri.strip_prefix(FILE_PREFIX)?;
    let decoded = percent_decode(rest);

    // A drive-letter path arrives as "/C:/Users/..."; drop the leading
    // slash so it reads as a native Windows path. POSIX paths are already
    // correctly rooted at "/...".
    let decoded = if is_drive_letter_path(&decoded) {
        decoded.trim_start_matches('/').to_string()
    } else {
        decoded
    };

    let native = if MAIN_SEPARATOR == '\\' { decoded.replace('/', "\\") } else { decoded };

    Some(PathBuf::from(native))
}

/// Convert a filesystem path to a `file://` URI.
///
/// The inverse of [`uri_to_path`]: forward slashes are used regardless of
/// platform, and `:` is percent-encoded as `%3A` so drive letters survive
/// round-tripping through URI-unsafe characters.
pub fn path_to_uri(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let as_forward_slash = path.to_string_lossy().replace('\\', "/");
    let encoded = percent_encode(&as_forward_slash);

    if is_drive_letter_path(&format!("/{encoded}")) || is_drive_letter_path(&encoded) {
        format!("{FILE_PREFIX}/{encoded}")
    } else if encoded.starts_with('/') {
        format!("{FILE_PREFIX}{encoded}")
    } else {
        format!("{FILE_PREFIX}/{encoded}")
    }
}

fn is_drive_letter_path(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() > 2
        && bytes[0] == b'/'
        && bytes[1].is_ascii_alphabetic()
        && (bytes[2] == b':' || (bytes.len() > 3 && bytes[2] == b'%' && &s[2..5] == "%3A"))
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(hex) = u8::from_str_radix(&s[i + 1..i + 3], 16) {
                out.push(hex);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b':' => out.push_str("%3A"),
            b' ' => out.push_str("%20"),
            b'%' => out.push_str("%25"),
            _ => out.push(b as char),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use liger_tdd_support::must_some;

    #[test]
    fn posix_uri_round_trips_to_path() {
        let path = uri_to_path("file:///tmp/test.cr");
        assert_eq!(path, Some(PathBuf::from("/tmp/test.cr")));
    }

    #[test]
    fn non_file_uri_returns_none() {
        assert!(uri_to_path("https://example.com").is_none());
    }

    #[test]
    fn percent_encoded_spaces_are_decoded() {
        let path = uri_to_path("file:///tmp/a%20b/test.cr");
        assert_eq!(path, Some(PathBuf::from("/tmp/a b/test.cr")));
    }

    #[test]
    fn path_to_uri_encodes_spaces() {
        let uri = path_to_uri("/tmp/a b/test.cr");
        assert_eq!(uri, "file:///tmp/a%20b/test.cr");
    }

    #[test]
    fn drive_letter_path_loses_leading_slash() {
        let path = uri_to_path("file:///C:/Users/test.cr");
        let text = must_some(path).to_string_lossy().into_owned();
        assert!(text.starts_with("C:"));
        assert!(!text.starts_with("/C:"));
    }

    #[test]
    fn posix_path_to_uri_keeps_leading_slash() {
        assert_eq!(path_to_uri("/tmp/test.cr"), "file:///tmp/test.cr");
    }
}
