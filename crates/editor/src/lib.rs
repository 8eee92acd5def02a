//! Editing layer of teditor.
//!
//! [`Buffer`] drives a [`teditor_buffer::Lines`] with multiple cursors and
//! command-level undo, [`EditorCommand`] turns key events into commands and
//! [`EditorContext`] executes them against the open buffers.

mod buffer;
mod context;
mod keyboard;

pub use buffer::{Buffer, LineEnding, UNTITLED};
pub use context::{EditorContext, ViewSize};
pub use keyboard::EditorCommand;
