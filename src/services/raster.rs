// src/services/raster.rs
//
// Paints the preview document into a bitmap, the way a browser would render
// the preview card before it is captured for the PDF.

use image::{imageops, Rgb, RgbImage, RgbaImage};
use rusttype::{point, Font, Scale};

use crate::{common::fonts::FontSet, models::preview::PreviewDocument};

/// Logical width of the preview card, independent of any screen.
pub const PREVIEW_WIDTH: f32 = 560.0;

/// Oversampling applied when capturing the preview.
pub const RASTER_SCALE: f32 = 2.0;

/// Logical height of one A4 page at the preview width.
pub const PAGE_HEIGHT: f32 = PREVIEW_WIDTH * 297.0 / 210.0;

const PADDING: f32 = 24.0;
const COLUMN_GAP: f32 = 16.0;
const LOGO_SIZE: f32 = 64.0;
const LINE_HEIGHT: f32 = 1.4;

const INK: Rgb<u8> = Rgb([17, 24, 39]);
const MUTED: Rgb<u8> = Rgb([107, 114, 128]);
const FAINT: Rgb<u8> = Rgb([156, 163, 175]);
const RULE: Rgb<u8> = Rgb([229, 231, 235]);
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Weight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

enum DrawOp {
    Text { x: f32, baseline: f32, size: f32, weight: Weight, color: Rgb<u8>, text: String },
    Rule { x: f32, y: f32, width: f32 },
    Frame { x: f32, y: f32, width: f32, height: f32 },
    Logo { x: f32, y: f32, image: RgbaImage, width: f32, height: f32 },
}

/// Positioned drawing operations in logical pixels.
pub struct Layout {
    ops: Vec<DrawOp>,
    pub height: f32,
}

impl Layout {
    /// Full height at `scale`, before any capping to the page.
    pub fn device_height(&self, scale: f32) -> u32 {
        (self.height * scale).ceil().max(1.0) as u32
    }
}

struct Layouter<'a> {
    fonts: &'a FontSet,
    ops: Vec<DrawOp>,
    y: f32,
}

impl<'a> Layouter<'a> {
    fn font(&self, weight: Weight) -> &'a Font<'static> {
        match weight {
            Weight::Regular => &self.fonts.regular,
            Weight::Bold => &self.fonts.bold,
        }
    }

    /// Lays out wrapped text inside `[x, x + width]` starting at `top`, and
    /// returns the height used.
    #[allow(clippy::too_many_arguments)]
    fn text_block(
        &mut self,
        text: &str,
        x: f32,
        top: f32,
        width: f32,
        size: f32,
        weight: Weight,
        color: Rgb<u8>,
        align: Align,
    ) -> f32 {
        let font = self.font(weight);
        let ascent = font.v_metrics(Scale::uniform(size)).ascent;
        let line_height = size * LINE_HEIGHT;

        let lines = wrap(font, size, text, width);
        for (i, line) in lines.iter().enumerate() {
            let line_width = text_width(font, size, line);
            let left = match align {
                Align::Left => x,
                Align::Center => x + (width - line_width).max(0.0) / 2.0,
                Align::Right => x + (width - line_width).max(0.0),
            };
            let line_top = top + i as f32 * line_height;
            self.ops.push(DrawOp::Text {
                x: left,
                baseline: line_top + (line_height - size) / 2.0 + ascent,
                size,
                weight,
                color,
                text: line.clone(),
            });
        }

        lines.len() as f32 * line_height
    }

    /// Label over value, the shape of every grid cell.
    fn labelled(&mut self, label: &str, value: &str, x: f32, top: f32, width: f32, align: Align) -> f32 {
        let mut used = self.text_block(label, x, top, width, 12.0, Weight::Regular, MUTED, align);
        used += 2.0;
        used += self.text_block(value, x, top + used, width, 14.0, Weight::Bold, INK, align);
        used
    }
}

pub fn layout(doc: &PreviewDocument, fonts: &FontSet) -> Layout {
    let mut l = Layouter { fonts, ops: Vec::new(), y: PADDING };
    let content = PREVIEW_WIDTH - 2.0 * PADDING;
    let column = (content - COLUMN_GAP) / 2.0;
    let left = PADDING;
    let right = PADDING + column + COLUMN_GAP;

    // 1. Organization header
    if let Some(path) = &doc.header.logo_path {
        match image::open(path) {
            Ok(logo) => {
                let logo = logo.to_rgba8();
                let ratio = logo.width() as f32 / logo.height().max(1) as f32;
                let (width, height) = if ratio >= 1.0 {
                    (LOGO_SIZE, LOGO_SIZE / ratio)
                } else {
                    (LOGO_SIZE * ratio, LOGO_SIZE)
                };
                l.ops.push(DrawOp::Logo {
                    x: (PREVIEW_WIDTH - width) / 2.0,
                    y: l.y,
                    image: logo,
                    width,
                    height,
                });
                l.y += LOGO_SIZE + 8.0;
            }
            Err(e) => tracing::warn!("Logo {} skipped: {}", path.display(), e),
        }
    }
    l.y += l.text_block(&doc.header.name, left, l.y, content, 22.0, Weight::Bold, INK, Align::Center);
    l.y += l.text_block(&doc.header.address, left, l.y, content, 12.0, Weight::Regular, MUTED, Align::Center);
    l.y += l.text_block(&doc.header.contact, left, l.y, content, 12.0, Weight::Regular, MUTED, Align::Center);
    l.y += 12.0;
    l.ops.push(DrawOp::Rule { x: left, y: l.y, width: content });
    l.y += 16.0;

    // 2. Title and date
    let top = l.y;
    let mut title = l.text_block(doc.title, left, top, column, 18.0, Weight::Bold, INK, Align::Left);
    title += l.text_block(doc.subtitle, left, top + title, column, 12.0, Weight::Regular, MUTED, Align::Left);
    let mut date = l.text_block("Date", right, top, column, 14.0, Weight::Bold, INK, Align::Right);
    date += l.text_block(&doc.date, right, top + date, column, 14.0, Weight::Regular, INK, Align::Right);
    l.y += title.max(date) + 16.0;

    // 3. Eight cell grid, two per row
    for row in doc.grid.chunks(2) {
        let top = l.y;
        let mut used: f32 = 0.0;
        for (cell, x) in row.iter().zip([left, right]) {
            used = used.max(l.labelled(cell.label, &cell.value, x, top, column, Align::Left));
        }
        l.y += used + 12.0;
    }

    // 4. Notes
    l.y += 4.0;
    l.y += l.labelled("Notes", &doc.notes, left, l.y, content, Align::Left);
    l.y += 24.0;

    // 5. Signatures
    let sig = &doc.signatures;
    let top = l.y;
    let mut receiver = l.text_block(sig.receiver_label, left, top, column, 12.0, Weight::Regular, MUTED, Align::Left);
    receiver += 8.0;
    let frame_height = 56.0;
    l.ops.push(DrawOp::Frame { x: left, y: top + receiver, width: column, height: frame_height });
    let name_height = 12.0 * LINE_HEIGHT;
    l.text_block(
        &sig.receiver,
        left + 4.0,
        top + receiver + (frame_height - name_height) / 2.0,
        column - 8.0,
        12.0,
        Weight::Regular,
        FAINT,
        Align::Center,
    );
    receiver += frame_height;

    let mut signatory = l.text_block(&sig.signatory_heading, right, top, column, 12.0, Weight::Regular, MUTED, Align::Right);
    signatory += 4.0;
    signatory += l.text_block(&sig.signatory, right, top + signatory, column, 14.0, Weight::Regular, INK, Align::Right);
    signatory += l.text_block(sig.signatory_caption, right, top + signatory, column, 14.0, Weight::Bold, INK, Align::Right);
    signatory += l.text_block(&sig.signed_by, right, top + signatory, column, 12.0, Weight::Regular, MUTED, Align::Right);
    l.y += receiver.max(signatory) + 12.0;

    // 6. Footer
    l.y += l.text_block(doc.footer, left, l.y, content, 11.0, Weight::Regular, FAINT, Align::Left);

    Layout { ops: l.ops, height: l.y + PADDING }
}

/// Paints a layout at `scale` device pixels per logical pixel. The canvas
/// never grows past one page; whatever lies below is not drawn.
pub fn paint(layout: &Layout, fonts: &FontSet, scale: f32) -> RgbImage {
    let width = (PREVIEW_WIDTH * scale).ceil() as u32;
    let page_rows = (PAGE_HEIGHT * scale).ceil() as u32;
    let height = layout.device_height(scale).min(page_rows);
    let mut canvas = RgbImage::from_pixel(width, height, PAPER);
    let line = scale.max(1.0);
    let bottom = height as f32 / scale;

    for op in &layout.ops {
        match op {
            DrawOp::Text { baseline, size, .. } if baseline - size > bottom => {}
            DrawOp::Text { x, baseline, size, weight, color, text } => {
                let font = match weight {
                    Weight::Regular => &fonts.regular,
                    Weight::Bold => &fonts.bold,
                };
                draw_text(&mut canvas, font, size * scale, x * scale, baseline * scale, *color, text);
            }
            DrawOp::Rule { x, y, width } => {
                fill_rect(&mut canvas, x * scale, y * scale, width * scale, line, RULE);
            }
            DrawOp::Frame { x, y, width, height } => {
                let (x, y, w, h) = (x * scale, y * scale, width * scale, height * scale);
                fill_rect(&mut canvas, x, y, w, line, RULE);
                fill_rect(&mut canvas, x, y + h - line, w, line, RULE);
                fill_rect(&mut canvas, x, y, line, h, RULE);
                fill_rect(&mut canvas, x + w - line, y, line, h, RULE);
            }
            DrawOp::Logo { x, y, image, width, height } => {
                let w = (width * scale).round().max(1.0) as u32;
                let h = (height * scale).round().max(1.0) as u32;
                let resized = imageops::resize(image, w, h, imageops::FilterType::Triangle);
                let (ox, oy) = ((x * scale).round() as i64, (y * scale).round() as i64);
                for (px, py, pixel) in resized.enumerate_pixels() {
                    let alpha = pixel[3] as f32 / 255.0;
                    blend(&mut canvas, ox + px as i64, oy + py as i64, Rgb([pixel[0], pixel[1], pixel[2]]), alpha);
                }
            }
        }
    }

    canvas
}

fn draw_text(canvas: &mut RgbImage, font: &Font<'static>, size: f32, x: f32, baseline: f32, color: Rgb<u8>, text: &str) {
    for glyph in font.layout(text, Scale::uniform(size), point(x, baseline)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                blend(canvas, (bb.min.x + gx as i32) as i64, (bb.min.y + gy as i32) as i64, color, coverage);
            });
        }
    }
}

fn fill_rect(canvas: &mut RgbImage, x: f32, y: f32, width: f32, height: f32, color: Rgb<u8>) {
    let x0 = x.round() as i64;
    let y0 = y.round() as i64;
    let x1 = (x + width).round() as i64;
    let y1 = (y + height).round() as i64;
    for py in y0..y1.max(y0 + 1) {
        for px in x0..x1.max(x0 + 1) {
            blend(canvas, px, py, color, 1.0);
        }
    }
}

fn blend(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, alpha: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let alpha = alpha.clamp(0.0, 1.0);
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    for c in 0..3 {
        let under = pixel[c] as f32;
        pixel[c] = (under + (color[c] as f32 - under) * alpha).round() as u8;
    }
}

pub fn text_width(font: &Font<'static>, size: f32, text: &str) -> f32 {
    font.layout(text, Scale::uniform(size), point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Greedy word wrap. Explicit newlines are kept; a word wider than the box
/// stays on its own line.
fn wrap(font: &Font<'static>, size: f32, text: &str, width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if current.is_empty() || text_width(font, size, &candidate) <= width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        common::fonts::test_fonts,
        models::{
            invoice::{FieldName, InvoiceDraft},
            preview::Organization,
        },
        services::preview_service::PreviewService,
    };

    fn doc_with_notes(notes: &str) -> PreviewDocument {
        let mut draft = InvoiceDraft::new(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
        draft.set(FieldName::CustomerName, "Meena").unwrap();
        draft.set(FieldName::Notes, notes).unwrap();
        PreviewService::new(Organization::default()).render(&draft)
    }

    #[test]
    fn wrap_breaks_on_width_and_newlines() {
        let fonts = test_fonts();
        let text = "paid in two parts\nsecond line";
        let narrow = text_width(&fonts.regular, 14.0, "paid in two") + 1.0;

        let lines = wrap(&fonts.regular, 14.0, text, narrow);

        assert_eq!(lines, ["paid in two", "parts", "second line"]);
    }

    #[test]
    fn wrap_keeps_empty_text_as_one_line() {
        let fonts = test_fonts();
        assert_eq!(wrap(&fonts.regular, 12.0, "", 100.0), [""]);
    }

    #[test]
    fn bitmap_width_is_fixed_by_the_scale() {
        let fonts = test_fonts();
        let image = paint(&layout(&doc_with_notes("Nil"), &fonts), &fonts, RASTER_SCALE);

        assert_eq!(image.width(), (PREVIEW_WIDTH * RASTER_SCALE) as u32);
        assert!(image.pixels().any(|p| p[0] < 128), "nothing was painted");
    }

    #[test]
    fn long_notes_grow_the_layout() {
        let fonts = test_fonts();
        let short = layout(&doc_with_notes("Nil"), &fonts);
        let long = layout(&doc_with_notes(&"installment received in cash ".repeat(40)), &fonts);

        assert!(long.height > short.height + 100.0);
    }

    #[test]
    fn canvas_never_exceeds_one_page() {
        let fonts = test_fonts();
        let doc = doc_with_notes(&"line\n".repeat(20000));

        let layout = layout(&doc, &fonts);
        let image = paint(&layout, &fonts, RASTER_SCALE);

        assert!(layout.device_height(RASTER_SCALE) > 100_000);
        assert_eq!(image.height(), (PAGE_HEIGHT * RASTER_SCALE).ceil() as u32);
        assert_eq!(image.width(), (PREVIEW_WIDTH * RASTER_SCALE) as u32);
    }

    #[test]
    fn short_previews_keep_their_own_height() {
        let fonts = test_fonts();
        let layout = layout(&doc_with_notes("Nil"), &fonts);

        let image = paint(&layout, &fonts, RASTER_SCALE);

        assert!(layout.height < PAGE_HEIGHT);
        assert_eq!(image.height(), layout.device_height(RASTER_SCALE));
    }

    #[test]
    fn missing_logo_is_skipped() {
        let fonts = test_fonts();
        let mut doc = doc_with_notes("Nil");
        let plain = layout(&doc, &fonts).height;

        doc.header.logo_path = Some("/nonexistent/logo.png".into());

        assert_eq!(layout(&doc, &fonts).height, plain);
    }
}
