//! Extension allow-set
//!
//! Extensions are stored lower-cased without a leading dot. An empty set
//! accepts every path.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// Set of accepted file extensions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet {
    exts: BTreeSet<String>,
}

impl ExtensionSet {
    /// Set that accepts every extension
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list such as `"pdf, .PNG,jpg"`
    pub fn parse(raw: &str) -> Self {
        raw.split(',').collect()
    }

    pub fn is_empty(&self) -> bool {
        self.exts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exts.len()
    }

    /// Membership test for an already-extracted extension (case-insensitive)
    pub fn contains(&self, ext: &str) -> bool {
        self.exts.contains(&normalize(ext))
    }

    /// Whether `path` passes this filter
    pub fn allows(&self, path: &Path) -> bool {
        if self.exts.is_empty() {
            return true;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.contains(ext),
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.exts.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let exts = iter
            .into_iter()
            .map(|e| normalize(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        Self { exts }
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exts.is_empty() {
            return f.write_str("*");
        }
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(","))
    }
}

fn normalize(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    match ext.strip_prefix('.') {
        Some(stripped) => stripped.to_string(),
        None => ext,
    }
}

/// Returns true if `path`'s extension is in `exts`, or if `exts` is empty
pub fn allowed(path: &Path, exts: &ExtensionSet) -> bool {
    exts.allows(path)
}
