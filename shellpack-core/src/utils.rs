//! Shared path and string helpers.

use std::path::{Component, Path};

/// Render a relative path with `/` separators regardless of platform
/// (e.g., `icons\logo.svg` -> `icons/logo.svg`).
pub fn to_posix_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Escape the five XML special characters.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Check whether the file name of `path` ends with any of `suffixes`
/// (e.g., `extension.d.ts` ends with `.ts`).
pub fn file_name_ends_with(path: &Path, suffixes: &[&str]) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .is_some_and(|name| suffixes.iter().any(|s| name.ends_with(s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_posix_path() {
        assert_eq!(to_posix_path(Path::new("icons/logo.svg")), "icons/logo.svg");
        assert_eq!(to_posix_path(Path::new("a.txt")), "a.txt");
        assert_eq!(to_posix_path(Path::new("./a/b")), "a/b");
        assert_eq!(to_posix_path(Path::new("")), "");
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("plain.svg"), "plain.svg");
        assert_eq!(xml_escape("a&b<c>.txt"), "a&amp;b&lt;c&gt;.txt");
        assert_eq!(xml_escape(r#""'"#), "&quot;&apos;");
    }

    #[test]
    fn test_file_name_ends_with() {
        let ts = [".ts", ".mts", ".cts"];
        assert!(file_name_ends_with(Path::new("src/extension.ts"), &ts));
        assert!(file_name_ends_with(Path::new("types.d.ts"), &ts));
        assert!(file_name_ends_with(Path::new("lib/mod.mts"), &ts));
        assert!(!file_name_ends_with(Path::new("stylesheet.css"), &ts));
        assert!(!file_name_ends_with(Path::new("tsconfig"), &ts));
    }
}
