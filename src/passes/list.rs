//! Pass names and ordered pass lists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a pass, as the pass-manager method that schedules it
/// (for example `add_loop_unroll_pass`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassName(String);

impl PassName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name can be emitted as a method call in the pass file.
    pub fn is_identifier(&self) -> bool {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
    }
}

impl fmt::Display for PassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PassName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PassName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for PassName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered sequence of passes. Duplicates are allowed and order matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassList(Vec<PassName>);

impl PassList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PassName> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[PassName] {
        &self.0
    }

    pub fn push(&mut self, pass: PassName) {
        self.0.push(pass);
    }

    /// Whether `self` can be obtained from `other` by deleting elements.
    pub fn is_subsequence_of(&self, other: &PassList) -> bool {
        let mut rest = other.iter();
        self.iter().all(|pass| rest.any(|candidate| candidate == pass))
    }

    /// Multi-line rendering for the progress log, one indented pass per line.
    pub fn display_block(&self) -> DisplayBlock<'_> {
        DisplayBlock(self)
    }
}

impl From<Vec<PassName>> for PassList {
    fn from(passes: Vec<PassName>) -> Self {
        Self(passes)
    }
}

impl<S: AsRef<str>> FromIterator<S> for PassList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| PassName::new(s.as_ref())).collect())
    }
}

impl Extend<PassName> for PassList {
    fn extend<I: IntoIterator<Item = PassName>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a PassList {
    type Item = &'a PassName;
    type IntoIter = std::slice::Iter<'a, PassName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, pass) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(pass.as_str())?;
        }
        f.write_str("]")
    }
}

/// See [`PassList::display_block`].
pub struct DisplayBlock<'a>(&'a PassList);

impl fmt::Display for DisplayBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("  (empty)");
        }
        for (i, pass) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "  {}", pass)?;
        }
        Ok(())
    }
}
