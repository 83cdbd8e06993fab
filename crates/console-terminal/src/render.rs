//! Frame composition: output rows, the input row and the notice overlay.
//!
//! Layout invariants:
//! * Output occupies rows `0..height-1`; the input line is always the last row.
//! * The input row scrolls horizontally so the caret stays visible.
//! * A pending notice is drawn last, centred, and hides the caret.

use crate::surface::TerminalSurface;
use crate::writer::Writer;
use console_core::{InputLine, Notice, Rgb};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ACK_HINT: &str = "[ OK ]";

pub struct FrameView<'a> {
    pub surface: &'a TerminalSurface,
    pub input: &'a InputLine,
    pub notice: Option<&'a Notice>,
    pub foreground: Rgb,
    pub width: u16,
    pub height: u16,
}

impl FrameView<'_> {
    /// Rows available to output (everything above the input row).
    pub fn output_rows(&self) -> u16 {
        self.height.saturating_sub(1)
    }
}

pub fn render_frame(view: &FrameView<'_>) -> Writer {
    let mut w = Writer::new();
    if view.width == 0 || view.height == 0 {
        return w;
    }
    w.show_cursor(false);
    draw_output(&mut w, view);
    let caret = draw_input(&mut w, view);
    match view.notice {
        Some(notice) => draw_notice(&mut w, notice, view.width, view.height),
        None => {
            w.move_to(caret, view.height - 1);
            w.show_cursor(true);
        }
    }
    w
}

fn draw_output(w: &mut Writer, view: &FrameView<'_>) {
    let out_rows = view.output_rows();
    let rows = view.surface.visible_rows(view.width, out_rows);
    for y in 0..out_rows {
        w.move_to(0, y);
        w.clear_line();
        if let Some(row) = rows.get(usize::from(y)) {
            for (text, color) in &row.segments {
                w.fg(*color);
                w.print(text.as_str());
            }
            w.reset();
        }
    }
}

// Returns the caret column on screen.
fn draw_input(w: &mut Writer, view: &FrameView<'_>) -> u16 {
    let y = view.height - 1;
    let width = usize::from(view.width);
    let caret_col = view.input.caret_column();
    let offset = caret_col.saturating_sub(width.saturating_sub(1));

    // A wide grapheme straddling `offset` is skipped whole, so the first
    // drawn column can sit past `offset`.
    let mut visible = String::new();
    let mut col = 0usize;
    let mut first_col = None;
    for g in view.input.as_str().graphemes(true) {
        let gw = g.width();
        if col < offset {
            col += gw;
            continue;
        }
        let first = *first_col.get_or_insert(col);
        if col - first + gw > width {
            break;
        }
        visible.push_str(g);
        col += gw;
    }
    let first_col = first_col.unwrap_or(col);

    w.move_to(0, y);
    w.clear_line();
    w.fg(view.foreground);
    if view.input.is_selected() {
        w.reverse();
    }
    w.print(visible);
    w.reset();
    u16::try_from(caret_col.saturating_sub(first_col)).unwrap_or(view.width.saturating_sub(1))
}

fn truncate_to_width(s: &str, max: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for g in s.graphemes(true) {
        let gw = g.width();
        if used + gw > max {
            break;
        }
        out.push_str(g);
        used += gw;
    }
    out
}

fn draw_notice(w: &mut Writer, notice: &Notice, width: u16, height: u16) {
    let screen_w = usize::from(width);
    if screen_w < 4 || height < 5 {
        return;
    }
    let content = notice
        .message
        .width()
        .max(notice.title.width() + 2)
        .max(ACK_HINT.width());
    let inner = content.min(screen_w - 4);
    let box_w = inner + 4;
    let x = u16::try_from((screen_w - box_w) / 2).unwrap_or(0);
    let top = (height - 5) / 2;

    let title = truncate_to_width(&format!(" {} ", notice.title), inner);
    let title_pad = box_w - 2 - title.width();
    let message = truncate_to_width(&notice.message, inner);
    let hint_left = (inner - ACK_HINT.width().min(inner)) / 2;

    let lines = [
        format!("┌{title}{}┐", "─".repeat(title_pad)),
        format!("│ {message}{} │", " ".repeat(inner - message.width())),
        format!("│ {} │", " ".repeat(inner)),
        format!(
            "│ {}{}{} │",
            " ".repeat(hint_left),
            truncate_to_width(ACK_HINT, inner),
            " ".repeat(inner - hint_left - ACK_HINT.width().min(inner))
        ),
        format!("└{}┘", "─".repeat(box_w - 2)),
    ];
    for (i, line) in lines.into_iter().enumerate() {
        w.move_to(x, top + i as u16);
        w.reverse();
        w.print(line);
        w.reset();
    }
}
