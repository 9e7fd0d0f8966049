//! Byte spans into the original template source.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// A half-open byte range `[position, position + length)` into the source
/// text a tree was parsed from.
///
/// Offsets are absolute, never per-line. Every AST node carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Location {
    pub position: usize,
    pub length: usize,
}

impl Location {
    pub fn new(position: usize, length: usize) -> Self {
        Self { position, length }
    }

    /// Build a location from a start and an exclusive end offset.
    ///
    /// An `end` before `start` collapses to a zero-length span at `start`.
    pub fn span(start: usize, end: usize) -> Self {
        Self {
            position: start,
            length: end.saturating_sub(start),
        }
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.position + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.position..self.end()
    }

    /// True when `other` lies entirely within this span (bounds inclusive).
    pub fn contains(&self, other: &Location) -> bool {
        other.position >= self.position && other.end() <= self.end()
    }

    /// True when the two spans share at least one byte.
    pub fn overlaps(&self, other: &Location) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.position < other.end()
            && other.position < self.end()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}; {})", self.position, self.length)
    }
}

impl From<Location> for Range<usize> {
    fn from(location: Location) -> Self {
        location.range()
    }
}

/// Anything that knows where it came from in the source.
pub trait Located {
    fn location(&self) -> Location;
}

impl Located for Location {
    fn location(&self) -> Location {
        *self
    }
}
