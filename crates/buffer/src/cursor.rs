//! Multiple cursors and the region anchored to them.
//!
//! Cursors live in slots with stable indices. A slot can be hidden instead of
//! removed so that callers holding an index keep pointing at the same cursor.
//! There is always at least one visible cursor.

use crate::{Lines, Position};

/// Snapshot of all cursor slots, see [`Cursors::save_excursion`].
pub type Excursion = Vec<Option<Position>>;

/// Ordered set of insertion points plus an optional region anchor per cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursors {
    /// Cursor slots, `None` for hidden ones
    slots: Vec<Option<Position>>,
    /// Region anchor per slot, parallel to `slots`
    anchors: Vec<Option<Position>>,
    /// Whether the region is being extended
    region_active: bool,
}

impl Cursors {
    /// One cursor at the start of the buffer.
    pub fn new() -> Self {
        Self {
            slots: vec![Some(Position::origin())],
            anchors: vec![None],
            region_active: false,
        }
    }

    /// Collapse to a single cursor at `(0, 0)` and forget the region.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Number of slots, hidden ones included.
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Number of visible cursors.
    pub fn visible_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Cursor in slot `i`, `None` when out of range or hidden.
    pub fn at(&self, i: usize) -> Option<Position> {
        self.slots.get(i).copied().flatten()
    }

    /// Move the cursor in slot `i`. Returns false for missing or hidden slots.
    pub fn set(&mut self, i: usize, pos: Position) -> bool {
        match self.slots.get_mut(i) {
            Some(Some(slot)) => {
                *slot = pos;
                true
            }
            _ => false,
        }
    }

    /// First visible cursor.
    pub fn first(&self) -> Position {
        self.positions().next().unwrap_or_default()
    }

    /// Visible cursors in slot order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Whether slot `i` exists and is hidden.
    pub fn is_hidden(&self, i: usize) -> bool {
        matches!(self.slots.get(i), Some(None))
    }

    /// Hide the cursor in slot `i`, keeping the slot.
    ///
    /// Refuses to hide the last visible cursor.
    pub fn hide(&mut self, i: usize) -> bool {
        if self.at(i).is_none() || self.visible_count() < 2 {
            return false;
        }
        self.slots[i] = None;
        self.anchors[i] = None;
        true
    }

    fn contains(&self, pos: Position) -> bool {
        self.positions().any(|p| p == pos)
    }

    /// Add a cursor after all others. Returns false if one is already there.
    pub fn add_back(&mut self, pos: Position) -> bool {
        if self.contains(pos) {
            return false;
        }
        self.slots.push(Some(pos));
        self.anchors.push(self.new_anchor(pos));
        true
    }

    /// Add a cursor before all others. Returns false if one is already there.
    pub fn add_front(&mut self, pos: Position) -> bool {
        if self.contains(pos) {
            return false;
        }
        self.slots.insert(0, Some(pos));
        self.anchors.insert(0, self.new_anchor(pos));
        true
    }

    /// New cursors join an active region with an empty span.
    fn new_anchor(&self, pos: Position) -> Option<Position> {
        self.region_active.then_some(pos)
    }

    /// Remove slot `i`.
    ///
    /// Returns false when `i` is out of range or the slot holds the last
    /// visible cursor.
    pub fn remove(&mut self, i: usize) -> bool {
        if i >= self.slots.len() {
            return false;
        }
        if self.slots[i].is_some() && self.visible_count() < 2 {
            return false;
        }
        self.slots.remove(i);
        self.anchors.remove(i);
        true
    }

    /// Drop every cursor except the first visible one.
    pub fn clear_all_but_first(&mut self) {
        let Some(first) = self.slots.iter().position(Option::is_some) else {
            return;
        };
        let anchor = self.anchors[first];
        self.slots = vec![self.slots[first]];
        self.anchors = vec![anchor];
    }

    /// Whether any visible cursor is on line `y`.
    pub fn has_cursor_on(&self, y: usize) -> bool {
        self.positions().any(|p| p.y == y)
    }

    /// Snapshot every slot.
    pub fn save_excursion(&self) -> Excursion {
        self.slots.clone()
    }

    /// Restore slots from a snapshot.
    ///
    /// Snapshots without any visible cursor are ignored. The region anchors
    /// are dropped when the number of slots changes.
    pub fn restore_excursion(&mut self, saved: &[Option<Position>]) {
        if saved.iter().all(Option::is_none) {
            return;
        }
        if saved.len() != self.slots.len() {
            self.anchors = vec![None; saved.len()];
            self.region_active = false;
        }
        self.slots = saved.to_vec();
    }

    /// Carry every cursor except slot `skip` over an insertion of `[before, after)`.
    pub fn shift_after_insert(&mut self, skip: usize, before: Position, after: Position) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if i == skip {
                continue;
            }
            if let Some(pos) = slot {
                *pos = pos.shifted_by_insert(before, after);
            }
        }
        for anchor in self.anchors.iter_mut().flatten() {
            *anchor = anchor.shifted_by_insert(before, after);
        }
    }

    /// Carry every cursor except slot `skip` over a deletion of `[start, end)`.
    pub fn shift_after_delete(&mut self, skip: usize, start: Position, end: Position) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if i == skip {
                continue;
            }
            if let Some(pos) = slot {
                *pos = pos.shifted_by_delete(start, end);
            }
        }
        for anchor in self.anchors.iter_mut().flatten() {
            *anchor = anchor.shifted_by_delete(start, end);
        }
    }

    // ========================================================================
    // Region
    // ========================================================================

    /// Anchor the region at the current cursor positions.
    pub fn start_region(&mut self) {
        self.anchors = self.slots.clone();
        self.region_active = true;
    }

    /// Stop extending the region. The anchors stay readable.
    pub fn stop_region(&mut self) {
        self.region_active = false;
    }

    /// Stop the region and forget its anchors.
    pub fn clear_region(&mut self) {
        self.region_active = false;
        self.anchors = vec![None; self.slots.len()];
    }

    pub fn is_region_active(&self) -> bool {
        self.region_active
    }

    /// Region anchor of slot `i`.
    pub fn anchor(&self, i: usize) -> Option<Position> {
        self.anchors.get(i).copied().flatten()
    }

    /// Ordered `(start, end)` span between anchor and cursor, per visible
    /// cursor that has an anchor.
    pub fn region_spans(&self) -> Vec<(Position, Position)> {
        self.slots
            .iter()
            .zip(&self.anchors)
            .filter_map(|(&slot, &anchor)| Some(anchor?.ordered(slot?)))
            .collect()
    }

    /// Whether `pos` falls inside the active region.
    pub fn is_inside(&self, pos: Position) -> bool {
        self.region_active
            && self
                .region_spans()
                .iter()
                .any(|(start, end)| *start <= pos && pos < *end)
    }

    // ========================================================================
    // Motions
    // ========================================================================

    fn for_each_visible(&mut self, mut f: impl FnMut(&mut Position)) {
        for pos in self.slots.iter_mut().flatten() {
            f(pos);
        }
        self.hide_duplicates();
    }

    /// Hide cursors that landed on the same spot as an earlier one.
    pub fn hide_duplicates(&mut self) {
        for i in 1..self.slots.len() {
            let Some(pos) = self.slots[i] else {
                continue;
            };
            if self.slots[..i].contains(&Some(pos)) {
                self.slots[i] = None;
                self.anchors[i] = None;
            }
        }
    }

    /// One character left, wrapping to the end of the previous line.
    pub fn left(&mut self, lines: &Lines) {
        self.for_each_visible(|pos| {
            if pos.x > 0 {
                pos.x -= 1;
            } else if pos.y > 0 {
                pos.y -= 1;
                pos.x = lines.line_len(pos.y);
            }
        });
    }

    /// One character right, wrapping to the start of the next line.
    pub fn right(&mut self, lines: &Lines) {
        let last = lines.len() - 1;
        self.for_each_visible(|pos| {
            if pos.x < lines.line_len(pos.y) {
                pos.x += 1;
            } else if pos.y < last {
                pos.y += 1;
                pos.x = 0;
            }
        });
    }

    pub fn up(&mut self, lines: &Lines) {
        self.for_each_visible(|pos| {
            if pos.y > 0 {
                pos.y -= 1;
                pos.x = pos.x.min(lines.line_len(pos.y));
            }
        });
    }

    pub fn down(&mut self, lines: &Lines) {
        let last = lines.len() - 1;
        self.for_each_visible(|pos| {
            if pos.y < last {
                pos.y += 1;
                pos.x = pos.x.min(lines.line_len(pos.y));
            }
        });
    }

    pub fn home(&mut self) {
        self.for_each_visible(|pos| pos.x = 0);
    }

    pub fn line_end(&mut self, lines: &Lines) {
        self.for_each_visible(|pos| pos.x = lines.line_len(pos.y));
    }

    pub fn buffer_start(&mut self) {
        self.for_each_visible(|pos| *pos = Position::origin());
    }

    pub fn buffer_end(&mut self, lines: &Lines) {
        let end = lines.end_position();
        self.for_each_visible(|pos| *pos = end);
    }

    /// Move `rows` lines down, to the start of the line.
    pub fn page_down(&mut self, lines: &Lines, rows: usize) {
        let last = lines.len() - 1;
        self.for_each_visible(|pos| {
            pos.y = (pos.y + rows).min(last);
            pos.x = 0;
        });
    }

    /// Move `rows` lines up, to the start of the line.
    pub fn page_up(&mut self, rows: usize) {
        self.for_each_visible(|pos| {
            pos.y = pos.y.saturating_sub(rows);
            pos.x = 0;
        });
    }

    /// Move to the next empty line that follows a non-empty one.
    pub fn next_para(&mut self, lines: &Lines) {
        let count = lines.len();
        self.for_each_visible(|pos| {
            let mut prev_len = lines.line_len(pos.y);
            let mut y = pos.y + 1;
            while y < count {
                let len = lines.line_len(y);
                if len == 0 && prev_len != 0 {
                    break;
                }
                prev_len = len;
                y += 1;
            }
            pos.y = y.min(count - 1);
            pos.x = 0;
        });
    }

    /// Move to the previous empty line that precedes a non-empty one.
    pub fn previous_para(&mut self, lines: &Lines) {
        self.for_each_visible(|pos| {
            let mut prev_len = lines.line_len(pos.y);
            let mut y = pos.y;
            while y > 0 {
                y -= 1;
                let len = lines.line_len(y);
                if len == 0 && prev_len != 0 {
                    break;
                }
                prev_len = len;
            }
            pos.y = y;
            pos.x = 0;
        });
    }

    /// Jump past the current word. `word` is the set of word characters.
    pub fn next_word(&mut self, lines: &Lines, word: &str) {
        let last = lines.len() - 1;
        self.for_each_visible(|pos| {
            let Some(line) = lines.line(pos.y) else {
                return;
            };
            if pos.x >= line.len() {
                if pos.y < last {
                    pos.y += 1;
                    pos.x = 0;
                }
            } else {
                pos.x = line.find_first_not_of(word, pos.x + 1);
            }
        });
    }

    /// Jump back to the previous word boundary.
    pub fn previous_word(&mut self, lines: &Lines, word: &str) {
        self.for_each_visible(|pos| {
            if pos.x == 0 {
                if pos.y > 0 {
                    pos.y -= 1;
                    pos.x = lines.line_len(pos.y);
                }
            } else if let Some(line) = lines.line(pos.y) {
                pos.x = line.find_last_not_of(word, pos.x - 1);
            }
        });
    }
}

impl Default for Cursors {
    fn default() -> Self {
        Self::new()
    }
}
