//! PDF assembly
//!
//! Two layouts:
//! - one page exactly the size of the image (certificates)
//! - A4 portrait pages with the image scaled to the page width, sliced
//!   across as many pages as its height needs (reports)

use printpdf::image_crate::{DynamicImage, GenericImageView};
use printpdf::{Image, ImageTransform, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use super::{ExportError, Raster};

/// CSS reference pixel density
const PX_PER_INCH: f32 = 96.0;
const MM_PER_INCH: f32 = 25.4;

pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

const LAYER: &str = "Layer 1";

pub fn px_to_mm(px: u32) -> f32 {
    px as f32 * MM_PER_INCH / PX_PER_INCH
}

/// Single page sized to the raster, image placed at the origin.
pub fn image_page_pdf(raster: &Raster, title: &str) -> Result<Vec<u8>, ExportError> {
    let image = flatten(raster.decode()?);
    let width_mm = px_to_mm(raster.width());
    let height_mm = px_to_mm(raster.height());

    let (doc, page, layer) = PdfDocument::new(title, Mm(width_mm), Mm(height_mm), LAYER);
    place(&image, doc.get_page(page).get_layer(layer), 0.0, PX_PER_INCH);

    save(doc)
}

/// A4 portrait, scaled to the page width.
pub fn a4_report_pdf(raster: &Raster, title: &str) -> Result<Vec<u8>, ExportError> {
    let image = flatten(raster.decode()?);
    let (width, height) = image.dimensions();

    // Density at which the raster's width spans the page exactly
    let dpi = width as f32 * MM_PER_INCH / A4_WIDTH_MM;
    let slice_px = ((A4_HEIGHT_MM * dpi / MM_PER_INCH).floor() as u32).max(1);
    let pages = page_count(height, slice_px);

    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER);

    for index in 0..pages {
        let top = index * slice_px;
        let rows = slice_px.min(height - top);
        let slice = image.crop_imm(0, top, width, rows);

        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), LAYER);
            doc.get_page(page).get_layer(layer)
        };

        // PDF origin is bottom-left; keep each slice flush with the top edge
        let slice_height_mm = rows as f32 * MM_PER_INCH / dpi;
        place(&slice, layer, A4_HEIGHT_MM - slice_height_mm, dpi);
    }

    tracing::debug!("Report PDF: {}x{} px over {} page(s)", width, height, pages);

    save(doc)
}

/// Pages needed for `height` rows when each page holds `slice_px` rows.
pub fn page_count(height: u32, slice_px: u32) -> u32 {
    height.div_ceil(slice_px).max(1)
}

// printpdf embeds RGB without a soft mask
fn flatten(image: DynamicImage) -> DynamicImage {
    DynamicImage::ImageRgb8(image.to_rgb8())
}

fn place(image: &DynamicImage, layer: PdfLayerReference, translate_y_mm: f32, dpi: f32) {
    Image::from_dynamic_image(image).add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(translate_y_mm)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

fn save(doc: PdfDocumentReference) -> Result<Vec<u8>, ExportError> {
    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(format!("{:?}", e)))
}
