use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// A validated path inside the vault.
///
/// Paths are '/'-separated, case-sensitive, and relative to the vault root
/// (no leading slash). The empty path is the root itself and is valid only
/// as a listing target, never as a blob address.
///
/// Validation rejects empty segments, `.` and `..` segments, and leading or
/// trailing slashes, so a `VaultPath` can be passed to the remote store
/// verbatim.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VaultPath(String);

impl VaultPath {
    /// The vault root (empty path).
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Validate and wrap a path string.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        if path.is_empty() {
            return Ok(Self(path));
        }
        if path.starts_with('/') {
            return Err(TypeError::invalid_path(path, "leading slash"));
        }
        if path.ends_with('/') {
            return Err(TypeError::invalid_path(path, "trailing slash"));
        }
        for segment in path.split('/') {
            if segment.is_empty() {
                return Err(TypeError::invalid_path(path.clone(), "empty segment"));
            }
            if segment == "." || segment == ".." {
                return Err(TypeError::invalid_path(path.clone(), "relative segment"));
            }
        }
        Ok(Self(path))
    }

    /// The path as a string slice. The root is the empty string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the path's segments. The root has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// The final segment, i.e. the file or directory name.
    pub fn name(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            self.0.rsplit('/').next()
        }
    }

    /// The containing directory. The root has no parent; a top-level
    /// entry's parent is the root.
    pub fn parent(&self) -> Option<VaultPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rsplit_once('/') {
            Some((parent, _)) => Some(Self(parent.to_string())),
            None => Some(Self::root()),
        }
    }

    /// Append one validated segment.
    pub fn join(&self, segment: &str) -> Result<VaultPath, TypeError> {
        if segment.is_empty() || segment.contains('/') {
            return Err(TypeError::invalid_path(segment, "not a single segment"));
        }
        if segment == "." || segment == ".." {
            return Err(TypeError::invalid_path(segment, "relative segment"));
        }
        if self.is_root() {
            Ok(Self(segment.to_string()))
        } else {
            Ok(Self(format!("{}/{}", self.0, segment)))
        }
    }

    /// Segment-wise prefix test. Every path starts with the root;
    /// `a/bc` does NOT start with `a/b`.
    pub fn starts_with(&self, prefix: &VaultPath) -> bool {
        if prefix.is_root() {
            return true;
        }
        match self.0.strip_prefix(&prefix.0) {
            Some("") => true,
            Some(rest) => rest.starts_with('/'),
            None => false,
        }
    }

    /// Replace the `old` prefix with `new`, preserving the suffix.
    ///
    /// This is the per-descendant path computation for subtree moves:
    /// `a/b/x.md`.rebase(`a/b`, `a/c`) is `a/c/x.md`.
    pub fn rebase(&self, old: &VaultPath, new: &VaultPath) -> Result<VaultPath, TypeError> {
        if !self.starts_with(old) {
            return Err(TypeError::invalid_path(
                self.0.clone(),
                format!("not under {:?}", old.as_str()),
            ));
        }
        let suffix = &self.0[old.0.len()..];
        let suffix = suffix.strip_prefix('/').unwrap_or(suffix);
        if suffix.is_empty() {
            return Ok(new.clone());
        }
        if new.is_root() {
            Self::new(suffix)
        } else {
            Self::new(format!("{}/{}", new.0, suffix))
        }
    }
}

impl fmt::Debug for VaultPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VaultPath({:?})", self.0)
    }
}

impl fmt::Display for VaultPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "/")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl TryFrom<&str> for VaultPath {
    type Error = TypeError;

    fn try_from(s: &str) -> Result<Self, TypeError> {
        Self::new(s)
    }
}

impl Serialize for VaultPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for VaultPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}
