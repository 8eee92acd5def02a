//! Drawing of the current buffer and the status line.
//!
//! Long lines wrap at the view width. `top` is the first buffer line shown.

use ratatui::{
    buffer::Buffer as Cells,
    layout::Rect,
    style::{Color, Modifier, Style},
    Frame,
};

use teditor_buffer::Position;
use teditor_editor::{Buffer, EditorContext};

const STATUS_BG: Color = Color::DarkGray;
const REGION_BG: Color = Color::Blue;

/// Split the screen into the text area and the status line below it.
pub fn layout(area: Rect) -> (Rect, Rect) {
    let text_height = area.height.saturating_sub(1);
    let text = Rect::new(area.x, area.y, area.width, text_height);
    let status = Rect::new(area.x, area.y + text_height, area.width, area.height - text_height);
    (text, status)
}

/// Render the whole screen.
pub fn render(frame: &mut Frame<'_>, ctx: &EditorContext, top: usize) {
    let (text_area, status_area) = layout(frame.area());
    let cells = frame.buffer_mut();
    render_text(cells, text_area, ctx.buffer(), top);
    render_status(cells, status_area, ctx);
}

/// First line to show so that the first cursor stays visible.
pub fn scroll_top(buffer: &Buffer, top: usize, width: u16, height: u16) -> usize {
    let lines = buffer.lines();
    let cursor = buffer.cursors().first().y;
    if cursor < top {
        return cursor;
    }

    let width = width as usize;
    let height = (height as usize).max(1);
    let mut top = top;
    let rows = |from: usize| -> usize {
        (from..=cursor)
            .filter_map(|y| lines.line(y))
            .map(|line| line.num_lines_needed(width))
            .sum()
    };
    while top < cursor && rows(top) > height {
        top += 1;
    }
    top
}

/// Screen cell of column `x` in a line wrapped over `rows` rows.
fn wrapped_cell(x: usize, width: usize, rows: usize) -> (usize, usize) {
    let row = x / width;
    if row >= rows {
        // Caret right after a line that fills its last row exactly
        (width - 1, rows - 1)
    } else {
        (x % width, row)
    }
}

fn render_text(cells: &mut Cells, area: Rect, buffer: &Buffer, top: usize) {
    let width = area.width as usize;
    let height = area.height as usize;
    if width == 0 || height == 0 {
        return;
    }
    let cursors = buffer.cursors();
    let cursor_style = Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD);
    let region_style = Style::default().bg(REGION_BG);

    let mut screen_row = 0;
    for (y, line) in buffer.lines().iter().enumerate().skip(top) {
        if screen_row >= height {
            break;
        }
        let rows = line.num_lines_needed(width);

        for (x, ch) in line.as_str().chars().enumerate() {
            let (col, row) = wrapped_cell(x, width, rows);
            if screen_row + row >= height {
                break;
            }
            let style = if cursors.is_inside(Position::new(x, y)) {
                region_style
            } else {
                Style::default()
            };
            cells[(area.x + col as u16, area.y + (screen_row + row) as u16)]
                .set_char(ch)
                .set_style(style);
        }

        if cursors.has_cursor_on(y) {
            for pos in cursors.positions().filter(|pos| pos.y == y) {
                let (col, row) = wrapped_cell(pos.x, width, rows);
                if screen_row + row < height {
                    cells[(area.x + col as u16, area.y + (screen_row + row) as u16)]
                        .set_style(cursor_style);
                }
            }
        }
        screen_row += rows;
    }
}

/// Status line text for the current buffer.
pub fn status_text(ctx: &EditorContext) -> String {
    let buffer = ctx.buffer();
    let cursor = buffer.cursors().first();
    let mut text = format!(
        " {}{}  {}",
        buffer.name(),
        if buffer.is_modified() { "*" } else { "" },
        cursor
    );

    let count = buffer.cursors().visible_count();
    if count > 1 {
        text.push_str(&format!("  {} cursors", count));
    }
    if buffer.cursors().is_region_active() {
        let chars: usize = buffer
            .region_text()
            .iter()
            .map(|region| region.chars().count())
            .sum();
        text.push_str(&format!("  region: {} chars", chars));
    }
    if let Some((message, _)) = ctx.status_message() {
        text.push_str("  ");
        text.push_str(message);
    }
    text
}

fn render_status(cells: &mut Cells, area: Rect, ctx: &EditorContext) {
    if area.height == 0 {
        return;
    }
    let is_error = matches!(ctx.status_message(), Some((_, true)));
    let style = Style::default().bg(STATUS_BG).fg(if is_error {
        Color::Red
    } else {
        Color::White
    });

    // Fill entire line with background color
    for x in area.left()..area.right() {
        cells[(x, area.top())].set_char(' ').set_style(style);
    }

    let mut x = area.left();
    for ch in status_text(ctx).chars() {
        if x >= area.right() {
            break;
        }
        cells[(x, area.top())].set_char(ch);
        x += 1;
    }
}
