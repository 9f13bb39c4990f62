//! Materialized path handling.
//!
//! A folder path always starts and ends with `/`, and `/` alone is the root.
//! Input is never rejected here: missing slashes are added and `/` is stripped
//! from names.

use pathvault_entity::folder::ROOT_PATH;

/// A full path split into its last segment and the containing folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPath {
    /// Last segment. Empty for the root.
    pub file_name: String,
    /// Containing folder, normalized.
    pub folder_path: String,
}

impl DecodedPath {
    /// Whether the path denotes the implicit root folder.
    pub fn is_root(&self) -> bool {
        self.file_name.trim().is_empty() && self.folder_path == ROOT_PATH
    }
}

/// Split a full path into `(fileName, folderPath)`.
///
/// A single trailing slash is ignored, so `/docs/` and `/docs` both name
/// `docs` in `/`. `/` decodes to an empty name in `/`.
pub fn decode_path(full_path: &str) -> DecodedPath {
    let trimmed = full_path.strip_suffix('/').unwrap_or(full_path);
    let (parent, file_name) = match trimmed.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", trimmed),
    };
    DecodedPath {
        file_name: file_name.to_string(),
        folder_path: normalize_folder_path(parent),
    }
}

/// Ensure a folder path starts and ends with `/`.
pub fn normalize_folder_path(folder_path: &str) -> String {
    let mut normalized = String::with_capacity(folder_path.len() + 2);
    if !folder_path.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(folder_path);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Remove every `/` from an entry name. Other characters, whitespace
/// included, are kept.
pub fn sanitize_name(name: &str) -> String {
    name.replace('/', "")
}

/// The `folderPath` carried by the children of `name` inside `folder_path`.
pub fn child_path(folder_path: &str, name: &str) -> String {
    format!("{folder_path}{name}/")
}

/// Prefix a relative path with `/`.
pub fn absolute(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(path: &str) -> (String, String) {
        let d = decode_path(path);
        (d.file_name, d.folder_path)
    }

    #[test]
    fn test_decode_file_and_folder_paths() {
        assert_eq!(decoded("/docs/a.txt"), ("a.txt".into(), "/docs/".into()));
        assert_eq!(decoded("/docs/sub/"), ("sub".into(), "/docs/".into()));
        assert_eq!(decoded("/docs"), ("docs".into(), "/".into()));
        assert_eq!(decoded("a.txt"), ("a.txt".into(), "/".into()));
        assert_eq!(decoded("docs/a.txt"), ("a.txt".into(), "/docs/".into()));
    }

    #[test]
    fn test_root_decodes_to_empty_name() {
        let root = decode_path("/");
        assert_eq!(root.file_name, "");
        assert_eq!(root.folder_path, "/");
        assert!(root.is_root());
        assert!(!decode_path("/docs/").is_root());
    }

    #[test]
    fn test_normalize_folder_path() {
        assert_eq!(normalize_folder_path(""), "/");
        assert_eq!(normalize_folder_path("/"), "/");
        assert_eq!(normalize_folder_path("docs"), "/docs/");
        assert_eq!(normalize_folder_path("/docs/sub"), "/docs/sub/");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("/reports/"), "reports");
        assert_eq!(sanitize_name(" a/b "), " ab ");
        assert_eq!(sanitize_name("q1 / q2.txt"), "q1  q2.txt");
        assert_eq!(sanitize_name("//"), "");
    }

    #[test]
    fn test_child_path_and_absolute() {
        assert_eq!(child_path("/", "docs"), "/docs/");
        assert_eq!(child_path("/docs/", "sub"), "/docs/sub/");
        assert_eq!(absolute("docs/a.txt"), "/docs/a.txt");
        assert_eq!(absolute("/a"), "/a");
    }
}
