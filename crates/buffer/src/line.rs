//! A single mutable line of text.
//!
//! Columns are character indices. Every method treats an out-of-range index
//! as either "append" or "nothing to do" and never panics on it.

use std::fmt;

/// One line of a buffer, without its trailing newline.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Line {
    text: String,
}

impl Line {
    /// Create an empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of characters in the line.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Line contents.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Character at column `idx`.
    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.text.chars().nth(idx)
    }

    pub fn append(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn append_char(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub fn prepend(&mut self, text: &str) {
        self.insert(text, 0);
    }

    pub fn prepend_char(&mut self, ch: char) {
        self.insert_char(ch, 0);
    }

    /// Insert `text` at column `idx`, appending when `idx` is past the end.
    pub fn insert(&mut self, text: &str, idx: usize) {
        let offset = self.byte_offset(idx);
        self.text.insert_str(offset, text);
    }

    /// Insert `ch` at column `idx`, appending when `idx` is past the end.
    pub fn insert_char(&mut self, ch: char, idx: usize) {
        let offset = self.byte_offset(idx);
        self.text.insert(offset, ch);
    }

    /// Remove `count` characters starting at column `idx` and return them.
    ///
    /// Returns an empty string and leaves the line unchanged when
    /// `[idx, idx + count)` does not fit inside the line.
    pub fn erase(&mut self, idx: usize, count: usize) -> String {
        let len = self.len();
        if idx >= len || count > len - idx {
            return String::new();
        }
        let start = self.byte_offset(idx);
        let end = self.byte_offset(idx + count);
        self.text.drain(start..end).collect()
    }

    /// Text between columns `start` and `end`, clamped to the line.
    pub fn slice(&self, start: usize, end: usize) -> &str {
        let end = end.max(start);
        &self.text[self.byte_offset(start)..self.byte_offset(end)]
    }

    /// Cut the line at column `idx`, keeping the head and returning the tail.
    pub fn split_off(&mut self, idx: usize) -> Line {
        let offset = self.byte_offset(idx);
        Line {
            text: self.text.split_off(offset),
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Screen rows needed to show this line wrapped at `width` columns.
    ///
    /// An empty line still occupies one row.
    pub fn num_lines_needed(&self, width: usize) -> usize {
        let len = self.len();
        if len == 0 || width == 0 {
            return 1;
        }
        len.div_ceil(width)
    }

    /// First column at or after `pos` whose character is not in `set`.
    ///
    /// Returns `len()` when there is none.
    pub fn find_first_not_of(&self, set: &str, pos: usize) -> usize {
        self.text
            .chars()
            .enumerate()
            .skip(pos)
            .find(|(_, ch)| !set.contains(*ch))
            .map(|(idx, _)| idx)
            .unwrap_or_else(|| self.len())
    }

    /// Last column at or before `pos` whose character is not in `set`.
    ///
    /// Returns 0 when there is none.
    pub fn find_last_not_of(&self, set: &str, pos: usize) -> usize {
        self.text
            .chars()
            .enumerate()
            .take(pos.saturating_add(1))
            .filter(|(_, ch)| !set.contains(*ch))
            .last()
            .map(|(idx, _)| idx)
            .unwrap_or(0)
    }

    /// Byte offset of column `idx`, or the end of the text when past it.
    fn byte_offset(&self, idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(idx)
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len())
    }
}

impl From<&str> for Line {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Self { text }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORD: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

    #[test]
    fn test_line_editing() {
        let mut line = Line::new();
        // An empty line still needs a row
        assert_eq!(line.num_lines_needed(5), 1);
        assert!(line.is_empty());
        assert_eq!(line.len(), 0);

        line.append_char('l');
        line.append("o !");
        assert_eq!(line.as_str(), "lo !");
        line.prepend_char('l');
        line.prepend("He");
        assert_eq!(line.as_str(), "Hello !");
        line.insert("Worlk", 6);
        assert_eq!(line.as_str(), "Hello Worlk!");
        assert_eq!(line.erase(10, 1), "k");
        assert_eq!(line.as_str(), "Hello Worl!");
        line.insert_char('d', 10);
        assert_eq!(line.as_str(), "Hello World!");
        assert_eq!(line.len(), 12);
        assert_eq!(line.char_at(6), Some('W'));
        assert_eq!(line.char_at(12), None);
        assert_eq!(line.num_lines_needed(6), 2);
        assert_eq!(line.num_lines_needed(5), 3);

        line.clear();
        assert!(line.is_empty());
    }

    #[test]
    fn test_insert_past_end_appends() {
        let mut line = Line::from("abc");
        line.insert_char('d', 100);
        line.insert("ef", 4);
        assert_eq!(line.as_str(), "abcdef");
    }

    #[test]
    fn test_erase_invalid_range_is_noop() {
        let mut line = Line::from("abc");
        assert_eq!(line.erase(3, 1), "");
        assert_eq!(line.erase(1, 5), "");
        assert_eq!(line.erase(10, 0), "");
        assert_eq!(line.erase(1, usize::MAX), "");
        assert_eq!(line.erase(usize::MAX, usize::MAX), "");
        assert_eq!(line.as_str(), "abc");
        assert_eq!(line.erase(0, 3), "abc");
        assert!(line.is_empty());
        assert_eq!(line.erase(0, 1), "");
    }

    #[test]
    fn test_multibyte_columns() {
        let mut line = Line::from("héllo");
        assert_eq!(line.len(), 5);
        assert_eq!(line.erase(1, 1), "é");
        line.insert_char('ü', 1);
        assert_eq!(line.as_str(), "hüllo");
        assert_eq!(line.slice(1, 3), "ül");
    }

    #[test]
    fn test_split_off() {
        let mut line = Line::from("Hello World");
        let tail = line.split_off(5);
        assert_eq!(line.as_str(), "Hello");
        assert_eq!(tail.as_str(), " World");

        let tail = line.split_off(99);
        assert_eq!(line.as_str(), "Hello");
        assert!(tail.is_empty());
    }

    #[test]
    fn test_find_not_of() {
        let line = Line::from("Hello World!");
        let set = "abcdefghABCDEFGH";
        assert_eq!(line.find_first_not_of(set, 0), 2);
        assert_eq!(line.find_first_not_of(set, line.len()), line.len());
        assert_eq!(line.find_last_not_of(set, line.len()), line.len() - 1);
        assert_eq!(line.find_last_not_of(set, 0), 0);
        assert_eq!(line.find_last_not_of("HelorWd !", line.len()), 0);
    }

    #[test]
    fn test_word_boundaries() {
        let line = Line::from("the quick brown fox jumps");
        assert_eq!(line.find_first_not_of(WORD, 0), 3);
        assert_eq!(line.find_first_not_of(WORD, 4), 9);
        assert_eq!(line.find_first_not_of(WORD, 10), 15);
        assert_eq!(line.find_first_not_of(WORD, 20), line.len());

        assert_eq!(line.find_last_not_of(WORD, 14), 9);
        assert_eq!(line.find_last_not_of(WORD, 8), 3);
        assert_eq!(line.find_last_not_of(WORD, 2), 0);
    }

    #[test]
    fn test_empty_line_scans() {
        let line = Line::new();
        assert_eq!(line.find_first_not_of(WORD, 0), 0);
        assert_eq!(line.find_last_not_of(WORD, 0), 0);
        assert_eq!(line.num_lines_needed(80), 1);
    }
}
