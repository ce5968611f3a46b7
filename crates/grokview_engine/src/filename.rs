use std::collections::HashSet;

use sha2::{Digest, Sha256};

/// Stable content id for an entry: the first 8 bytes of SHA-256(entry name) as hex.
pub fn entry_id(entry_name: &str) -> String {
    short_hash(entry_name)
}

/// Returns `candidate`, or `{candidate}-{n}` with the smallest `n` not in `taken`.
pub(crate) fn unique_id(candidate: String, taken: &HashSet<String>) -> String {
    if !taken.contains(&candidate) {
        return candidate;
    }
    (1..)
        .map(|n| format!("{candidate}-{n}"))
        .find(|id| !taken.contains(id))
        .unwrap_or(candidate)
}

/// Names for `(stem, extension)` pairs inside one export, in order. The first
/// occurrence keeps `{stem}.{extension}`; later collisions get `{stem}_{n}.{extension}`.
pub fn dedupe_entry_names<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<String> {
    let mut used = HashSet::new();
    let mut names = Vec::new();
    for (stem, extension) in items {
        let mut name = join_name(stem, extension);
        let mut counter = 1;
        while used.contains(&name) {
            name = join_name(&format!("{stem}_{counter}"), extension);
            counter += 1;
        }
        used.insert(name.clone());
        names.push(name);
    }
    names
}

/// Appends `.{extension}` unless `name` already ends with it (case-insensitive).
pub fn with_extension(name: &str, extension: &str) -> String {
    let suffix = format!(".{extension}");
    if extension.is_empty() || name.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase()) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}

/// Replaces characters that are invalid in file names on common platforms.
pub fn sanitize_file_name(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&[' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

fn join_name(stem: &str, extension: &str) -> String {
    if extension.is_empty() {
        stem.to_string()
    } else {
        format!("{stem}.{extension}")
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_is_stable_and_short() {
        let id = entry_id("images/cat.jpg");
        assert_eq!(id.len(), 16);
        assert_eq!(id, entry_id("images/cat.jpg"));
        assert_ne!(id, entry_id("images/dog.jpg"));
    }

    #[test]
    fn unique_id_appends_counter() {
        let taken: HashSet<String> = ["a".to_string(), "a-1".to_string()].into();
        assert_eq!(unique_id("b".into(), &taken), "b");
        assert_eq!(unique_id("a".into(), &taken), "a-2");
    }

    #[test]
    fn colliding_names_get_counter_suffix_in_order() {
        let names = dedupe_entry_names([("x", "png"), ("y", "png"), ("x", "png"), ("x", "png")]);
        assert_eq!(names, vec!["x.png", "y.png", "x_1.png", "x_2.png"]);
    }

    #[test]
    fn suffixed_name_does_not_collide_with_existing_one() {
        let names = dedupe_entry_names([("x_1", "png"), ("x", "png"), ("x", "png")]);
        assert_eq!(names, vec!["x_1.png", "x.png", "x_2.png"]);
    }

    #[test]
    fn extension_is_appended_once() {
        assert_eq!(with_extension("photo", "jpg"), "photo.jpg");
        assert_eq!(with_extension("photo.JPG", "jpg"), "photo.JPG");
        assert_eq!(with_extension("photo", ""), "photo");
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("a:b/c?.zip"), "a_b_c_.zip");
        assert_eq!(sanitize_file_name(" .. "), "untitled");
    }
}
