//! Mixin types for structures.
//!
//! - `LineMixin` is a generic wrapper that attaches the source line number to a value.
//! - `LineMixinExt` provides extension methods to create `LineMixin` instances.

/// A generic wrapper that attaches the source line number to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineMixin<T> {
    /// Wrapped content value
    content: T,
    /// Line number in the source, starts with 1.
    line: usize,
}

impl<T> LineMixin<T> {
    /// Instances a new `LineMixin`
    pub const fn new(content: T, line: usize) -> Self {
        Self { content, line }
    }

    /// Returns the wrapped content.
    pub const fn content(&self) -> &T {
        &self.content
    }

    /// Leans the content out of the wrapper.
    pub fn into_content(self) -> T {
        self.content
    }

    /// Returns the line number, starts with 1.
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Maps the content of the wrapper.
    pub fn map<U, F>(self, f: F) -> LineMixin<U>
    where
        F: FnOnce(T) -> U,
    {
        LineMixin::new(f(self.content), self.line)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for LineMixin<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at line {}", self.content, self.line)
    }
}

impl<T: std::error::Error + 'static> std::error::Error for LineMixin<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.content)
    }
}

/// Extension methods for attaching a line number to any value.
pub trait LineMixinExt: Sized {
    /// Wraps `self` with the line number.
    fn at_line(self, line: usize) -> LineMixin<Self> {
        LineMixin::new(self, line)
    }
}

impl<T> LineMixinExt for T {}
