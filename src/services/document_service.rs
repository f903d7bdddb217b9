// src/services/document_service.rs

use std::sync::Arc;

use genpdf::{elements, PaperSize};
use image::{imageops, DynamicImage, RgbImage};

use crate::{
    common::{error::AppError, fonts::FontSet},
    models::{
        export::{ExportFile, GeneratedPdf, PDF_MIME},
        preview::PreviewDocument,
    },
    services::raster::{self, RASTER_SCALE},
};

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;
const MM_PER_INCH: f64 = 25.4;

// The bitmap stays this far inside the page edge so float rounding never
// pushes it past the printable area.
const EDGE_MM: f64 = 0.1;

/// How a bitmap of a given size lands on one A4 page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub dpi: f64,
    /// Bitmap rows that fit on the page.
    pub rows: u32,
    pub clipped: bool,
}

impl PagePlacement {
    /// Scales the bitmap to the page width and caps its height to the page.
    pub fn fit(width_px: u32, height_px: u32) -> Self {
        let dpi = width_px.max(1) as f64 * MM_PER_INCH / (PAGE_WIDTH_MM - EDGE_MM);
        let max_rows = ((PAGE_HEIGHT_MM - EDGE_MM) / MM_PER_INCH * dpi).floor() as u32;

        Self {
            dpi,
            rows: height_px.min(max_rows),
            clipped: height_px > max_rows,
        }
    }

    pub fn width_mm(&self, width_px: u32) -> f64 {
        width_px as f64 / self.dpi * MM_PER_INCH
    }

    pub fn height_mm(&self) -> f64 {
        self.rows as f64 / self.dpi * MM_PER_INCH
    }
}

/// PDF export of the preview: rasterize, then embed on a single A4 page.
#[derive(Clone)]
pub struct DocumentService {
    fonts: Option<Arc<FontSet>>,
    font_hint: String,
}

impl DocumentService {
    /// `font_hint` names the expected font files in errors when `fonts` is missing.
    pub fn new(fonts: Option<Arc<FontSet>>, font_hint: impl Into<String>) -> Self {
        Self { fonts, font_hint: font_hint.into() }
    }

    pub async fn generate_pdf(
        &self,
        source: Option<&PreviewDocument>,
        file_name: String,
    ) -> Result<GeneratedPdf, AppError> {
        // Without a mounted preview there is nothing to capture.
        let doc = source.ok_or(AppError::SourceUnavailable)?.clone();
        let fonts = self
            .fonts
            .clone()
            .ok_or_else(|| AppError::FontNotFound(self.font_hint.clone()))?;

        let (bytes, clipped) = tokio::task::spawn_blocking(move || render_pdf(&doc, &fonts))
            .await
            .map_err(|e| anyhow::anyhow!("PDF render task failed: {}", e))??;

        tracing::info!("Generated {} ({} bytes)", file_name, bytes.len());

        Ok(GeneratedPdf {
            file: ExportFile { name: file_name, mime: PDF_MIME, bytes },
            clipped,
        })
    }
}

fn render_pdf(doc: &PreviewDocument, fonts: &FontSet) -> Result<(Vec<u8>, bool), AppError> {
    // 1. Captures the preview, at most one page of it
    let layout = raster::layout(doc, fonts);
    let full_rows = layout.device_height(RASTER_SCALE);
    let bitmap = raster::paint(&layout, fonts, RASTER_SCALE);

    // 2. Fits it on the page; anything below the page edge is dropped
    let placement = PagePlacement::fit(bitmap.width(), full_rows);
    let rows = placement.rows.min(bitmap.height());
    let bitmap = if rows < bitmap.height() {
        crop_rows(&bitmap, rows)
    } else {
        bitmap
    };
    if placement.clipped {
        tracing::warn!(
            "Invoice preview is {}px tall, only {}px fit on one A4 page; clipping",
            full_rows,
            rows
        );
    }

    // 3. Configures the PDF
    let mut document = genpdf::Document::new(fonts.pdf_family()?);
    document.set_title(format!("{} - {}", doc.title, doc.signatures.receiver));
    document.set_paper_size(PaperSize::A4);
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(0);
    document.set_page_decorator(decorator);

    let image = elements::Image::from_dynamic_image(DynamicImage::ImageRgb8(bitmap))?
        .with_dpi(placement.dpi);
    document.push(image);

    // 4. Renders into memory
    let mut buffer = Vec::new();
    document.render(&mut buffer)?;

    Ok((buffer, placement.clipped))
}

fn crop_rows(bitmap: &RgbImage, rows: u32) -> RgbImage {
    imageops::crop_imm(bitmap, 0, 0, bitmap.width(), rows).to_image()
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

    fn doc(notes: &str) -> PreviewDocument {
        let mut draft = InvoiceDraft::new(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
        draft.set(FieldName::CustomerName, "Meena").unwrap();
        draft.set(FieldName::Notes, notes).unwrap();
        PreviewService::new(Organization::default()).render(&draft)
    }

    fn service() -> DocumentService {
        DocumentService::new(Some(Arc::new(test_fonts())), "fonts/DejaVuSans-*.ttf")
    }

    #[test]
    fn placement_fills_the_page_width() {
        let placement = PagePlacement::fit(1120, 800);

        assert!(!placement.clipped);
        assert_eq!(placement.rows, 800);
        let width = placement.width_mm(1120);
        assert!(width <= PAGE_WIDTH_MM && width > PAGE_WIDTH_MM - 0.5, "{width}");
    }

    #[test]
    fn placement_caps_height_at_one_page() {
        let placement = PagePlacement::fit(1120, 4000);

        assert!(placement.clipped);
        assert!(placement.height_mm() <= PAGE_HEIGHT_MM);
        assert!(placement.height_mm() > PAGE_HEIGHT_MM - 0.5);
        // A4 ratio at this width.
        assert_eq!(placement.rows, 1584);
    }

    #[test]
    fn placement_ignores_the_source_resolution() {
        let small = PagePlacement::fit(560, 300);
        let large = PagePlacement::fit(1120, 600);

        assert!((small.width_mm(560) - large.width_mm(1120)).abs() < 1e-9);
        assert!((small.height_mm() - large.height_mm()).abs() < 1e-9);
    }

    #[test]
    fn crop_keeps_the_top_rows() {
        let bitmap = RgbImage::from_fn(4, 10, |_, y| image::Rgb([y as u8, 0, 0]));
        let cropped = crop_rows(&bitmap, 3);

        assert_eq!(cropped.dimensions(), (4, 3));
        assert_eq!(cropped.get_pixel(0, 2)[0], 2);
    }

    #[tokio::test]
    async fn missing_preview_produces_no_document() {
        let result = service().generate_pdf(None, "chitfund_invoice_customer.pdf".into()).await;

        assert!(matches!(result, Err(AppError::SourceUnavailable)));
    }

    #[tokio::test]
    async fn missing_fonts_are_reported() {
        let service = DocumentService::new(None, "fonts/Roboto-*.ttf");
        let result = service.generate_pdf(Some(&doc("Nil")), "x.pdf".into()).await;

        assert!(matches!(result, Err(AppError::FontNotFound(hint)) if hint == "fonts/Roboto-*.ttf"));
    }

    #[tokio::test]
    async fn renders_a_single_page_pdf() {
        let pdf = service()
            .generate_pdf(Some(&doc("Nil")), "chitfund_invoice_Meena.pdf".into())
            .await
            .unwrap();

        assert_eq!(pdf.file.name, "chitfund_invoice_Meena.pdf");
        assert_eq!(pdf.file.mime, "application/pdf");
        assert!(pdf.file.bytes.starts_with(b"%PDF"));
        assert!(!pdf.clipped);
    }

    #[tokio::test]
    async fn overlong_preview_is_clipped_not_paginated() {
        let notes = "collected at the branch office ".repeat(400);
        let pdf = service()
            .generate_pdf(Some(&doc(&notes)), "long.pdf".into())
            .await
            .unwrap();

        assert!(pdf.clipped);
        assert!(pdf.file.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn huge_notes_still_render_one_page() {
        let notes = "line\n".repeat(20000);
        let pdf = service()
            .generate_pdf(Some(&doc(&notes)), "huge.pdf".into())
            .await
            .unwrap();

        assert!(pdf.clipped);
        assert!(pdf.file.bytes.starts_with(b"%PDF"));
    }
}
