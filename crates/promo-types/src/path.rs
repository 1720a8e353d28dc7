//! Flat key paths.
//!
//! A path names a node below a root object by joining the keys on the way
//! down with `//`. The empty path denotes the root object itself.

/// Separator between path segments.
pub const SEPARATOR: &str = "//";

/// Join segments into a path.
pub fn join<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = String::new();
    for segment in segments {
        if !path.is_empty() {
            path.push_str(SEPARATOR);
        }
        path.push_str(segment.as_ref());
    }
    path
}

/// Split a path into its segments. The empty path has no segments.
pub fn split(path: &str) -> Vec<&str> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split(SEPARATOR).collect()
}

/// Extend `path` with one more key.
pub fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}{SEPARATOR}{key}")
    }
}

/// Everything before the last separator.
///
/// A path without a separator is returned unchanged, so a top-level key is
/// its own parent. Use [`parent_or_root`] when a top-level key should map to
/// the root path instead.
pub fn parent(path: &str) -> &str {
    match path.rsplit_once(SEPARATOR) {
        Some((head, _)) => head,
        None => path,
    }
}

/// Everything before the last separator, or the empty root path.
pub fn parent_or_root(path: &str) -> &str {
    match path.rsplit_once(SEPARATOR) {
        Some((head, _)) => head,
        None => "",
    }
}

/// The last segment of a path.
pub fn leaf(path: &str) -> &str {
    match path.rsplit_once(SEPARATOR) {
        Some((_, tail)) => tail,
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_and_split() {
        assert_eq!(join(["resources", "limits", "cpu"]), "resources//limits//cpu");
        assert_eq!(join(Vec::<String>::new()), "");
        assert_eq!(split("resources//limits//cpu"), vec!["resources", "limits", "cpu"]);
        assert!(split("").is_empty());
        assert_eq!(split("replicas"), vec!["replicas"]);
    }

    #[test]
    fn child_of_root_has_no_separator() {
        assert_eq!(child("", "replicas"), "replicas");
        assert_eq!(child("resources", "cpu"), "resources//cpu");
    }

    #[test]
    fn parent_of_nested_path() {
        assert_eq!(parent("resources//cpu"), "resources");
        assert_eq!(parent("a//b//c"), "a//b");
        assert_eq!(parent_or_root("a//b//c"), "a//b");
    }

    #[test]
    fn parent_of_top_level_key_is_itself() {
        assert_eq!(parent("replicas"), "replicas");
        assert_eq!(parent(""), "");
    }

    #[test]
    fn parent_or_root_of_top_level_key_is_root() {
        assert_eq!(parent_or_root("replicas"), "");
        assert_eq!(parent_or_root(""), "");
    }

    #[test]
    fn leaf_segment() {
        assert_eq!(leaf("image//image_name"), "image_name");
        assert_eq!(leaf("replicas"), "replicas");
    }
}
