//! Two-dimensional caret coordinates and their translation under edits.

use std::cmp::Ordering;
use std::fmt;

/// A column/row location inside a buffer, both zero-based.
///
/// Positions order by row first, then by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Column (character index within the line)
    pub x: usize,
    /// Row (line index)
    pub y: usize,
}

impl Position {
    /// Create a position from a column and a row.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The start of every buffer.
    pub const fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Position reached after typing `text` at this position.
    ///
    /// Every `\n` moves to column 0 of the next row, any other character
    /// moves one column to the right.
    pub fn advance(&self, text: &str) -> Self {
        let mut pos = *self;
        for ch in text.chars() {
            if ch == '\n' {
                pos.y += 1;
                pos.x = 0;
            } else {
                pos.x += 1;
            }
        }
        pos
    }

    /// Return `self` and `other` as `(start, end)` with `start <= end`.
    pub fn ordered(self, other: Self) -> (Self, Self) {
        if self <= other {
            (self, other)
        } else {
            (other, self)
        }
    }

    /// Where this position ends up once `[before, after)` has been inserted.
    ///
    /// Positions before the insertion point are untouched. Positions on the
    /// insertion row are carried along to the row the insertion ended on.
    pub fn shifted_by_insert(self, before: Position, after: Position) -> Self {
        if self < before {
            return self;
        }
        if self.y == before.y {
            Position::new(after.x + (self.x - before.x), after.y)
        } else {
            Position::new(self.x, self.y + (after.y - before.y))
        }
    }

    /// Where this position ends up once the span between `start` and `end`
    /// has been deleted.
    ///
    /// Positions inside the deleted span collapse onto its start.
    pub fn shifted_by_delete(self, start: Position, end: Position) -> Self {
        let (start, end) = start.ordered(end);
        if self <= start {
            return self;
        }
        if self < end {
            return start;
        }
        if self.y == end.y {
            Position::new(start.x + (self.x - end.x), start.y)
        } else {
            Position::new(self.x, self.y - (end.y - start.y))
        }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.y + 1, self.x + 1)
    }
}
