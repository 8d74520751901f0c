//! Hanging indentation for the code editor: every line is offset by the width
//! of its own leading whitespace so wrapped rows line up under the code.

use std::sync::Arc;

use eframe::egui::{
    self,
    epaint::text::PlacedRow,
    text::{Galley, LayoutJob, TextFormat},
    vec2,
};

pub const TAB_SIZE: usize = 2;
pub const BASE_PADDING: f32 = 4.0;

/// Inserted by the Tab key in place of a `'\t'`.
pub const INDENT_UNIT: &str = "  ";

/// Column reached by the leading whitespace of `line`; tabs advance to the next
/// multiple of `tab_size`.
pub fn leading_columns(line: &str, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    let mut column = 0;
    for ch in line.chars() {
        match ch {
            '\t' => column += tab_size - column % tab_size,
            '\n' | '\r' => break,
            c if c.is_whitespace() => column += 1,
            _ => break,
        }
    }
    column
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineIndent {
    pub text_indent: f32,
    pub padding_left: f32,
}

impl LineIndent {
    pub fn for_line(line: &str, tab_size: usize, char_width: f32) -> Self {
        let offset = leading_columns(line, tab_size) as f32 * char_width;
        Self {
            text_indent: -offset,
            padding_left: BASE_PADDING + offset,
        }
    }

    pub fn first_row_start(&self) -> f32 {
        self.padding_left + self.text_indent
    }

    pub fn continuation_start(&self) -> f32 {
        self.padding_left
    }

    /// Width each row of this line may occupy before it is shifted into place.
    pub fn row_width(&self, wrap_width: f32, char_width: f32) -> f32 {
        (wrap_width - self.padding_left).max(char_width)
    }
}

/// Replaces the selected char range `start..end` with [`INDENT_UNIT`] and
/// returns the cursor position after the insertion.
pub fn insert_indent_unit(text: &mut String, start: usize, end: usize) -> usize {
    let (start, end) = (start.min(end), start.max(end));
    let byte_at = |index: usize| {
        text.char_indices()
            .nth(index)
            .map_or(text.len(), |(byte, _)| byte)
    };
    let range = byte_at(start)..byte_at(end);
    text.replace_range(range, INDENT_UNIT);
    start + INDENT_UNIT.chars().count()
}

fn line_job(line: &str, font_id: egui::FontId, color: egui::Color32, max_width: f32) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.append(line, 0.0, TextFormat::simple(font_id, color));
    job.wrap.max_width = max_width;
    job
}

/// Lays out `text` one line at a time so that every wrapped row of a line starts
/// at that line's `padding_left`, while its first row starts at the base padding.
pub fn layout_galley(
    ui: &egui::Ui,
    text: &str,
    font_id: egui::FontId,
    color: egui::Color32,
    char_width: f32,
    wrap_width: f32,
) -> Arc<Galley> {
    let painter = ui.painter();
    let pixels_per_point = ui.ctx().pixels_per_point();

    let mut indents = Vec::new();
    let mut line_galleys = Vec::new();
    for line in text.split('\n') {
        let indent = LineIndent::for_line(line, TAB_SIZE, char_width);
        line_galleys.push(painter.layout_job(line_job(
            line,
            font_id.clone(),
            color,
            indent.row_width(wrap_width, char_width),
        )));
        indents.push(indent);
    }

    let whole = line_job(text, font_id, color, wrap_width);
    let mut galley = Galley::concat(Arc::new(whole), &line_galleys, pixels_per_point);
    hang_rows(&mut galley, &indents, pixels_per_point);
    Arc::new(galley)
}

fn hang_rows(galley: &mut Galley, indents: &[LineIndent], pixels_per_point: f32) {
    let mut line = 0;
    let mut first_row = true;
    for placed in &mut galley.rows {
        let Some(indent) = indents.get(line) else {
            break;
        };
        let dx = if first_row {
            indent.first_row_start()
        } else {
            indent.continuation_start()
        };
        shift_row(placed, (dx * pixels_per_point).round() / pixels_per_point);

        galley.rect |= placed.rect();
        galley.mesh_bounds |= placed.visuals.mesh_bounds.translate(placed.pos.to_vec2());

        first_row = placed.ends_with_newline;
        if placed.ends_with_newline {
            line += 1;
        }
    }
}

fn shift_row(placed: &mut PlacedRow, dx: f32) {
    if dx == 0.0 {
        return;
    }
    let row = Arc::make_mut(&mut placed.row);
    for glyph in &mut row.glyphs {
        glyph.pos.x += dx;
    }
    row.size.x += dx;
    row.visuals.mesh.translate(vec2(dx, 0.0));
    row.visuals.mesh_bounds = row.visuals.mesh_bounds.translate(vec2(dx, 0.0));
}
