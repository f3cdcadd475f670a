//! Element locator descriptors

use std::borrow::Cow;
use std::fmt;

/// A query expression resolved against a page each time it is used.
///
/// Child and index refinements use the chained selector syntax
/// (`parent >> nth=0 >> child`), so the whole descriptor stays a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    selector: Cow<'static, str>,
}

impl Locator {
    pub const fn css(selector: &'static str) -> Self {
        Self {
            selector: Cow::Borrowed(selector),
        }
    }

    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: Cow::Owned(selector.into()),
        }
    }

    /// The `index`-th match (zero based)
    pub fn nth(&self, index: usize) -> Self {
        Self::new(format!("{} >> nth={}", self.selector, index))
    }

    /// `child` scoped inside this locator's matches
    pub fn locator(&self, child: &str) -> Self {
        Self::new(format!("{} >> {}", self.selector, child))
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.selector)
    }
}
