//! Line-based text buffer engine for teditor.
//!
//! Provides the mutable line store with captured undo/redo history, 2D
//! positions with edit translation, and a multi-cursor set with region
//! tracking and motions.

mod cursor;
mod history;
mod line;
mod lines;
mod position;

pub use cursor::{Cursors, Excursion};
pub use history::{History, Operation};
pub use line::Line;
pub use lines::Lines;
pub use position::Position;

/// Characters that make up a word for word motions by default.
pub const DEFAULT_WORD_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";
