//! Region capture

use std::path::{Path, PathBuf};

use printpdf::image_crate::{
    self, imageops, imageops::FilterType, DynamicImage, Rgb, RgbImage,
};

use super::{ExportError, Raster};

/// Which part of the page is captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Certificate,
    Report,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Certificate => "certificate",
            Region::Report => "report",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Output pixels per source pixel
    pub pixel_ratio: f32,

    /// Fill behind transparent pixels
    pub background: [u8; 3],
}

impl CaptureOptions {
    /// Certificates: 3x on white
    pub fn certificate() -> Self {
        Self { pixel_ratio: 3.0, background: [0xff, 0xff, 0xff] }
    }

    /// Admin report: 2x on slate (#0f172a)
    pub fn report() -> Self {
        Self { pixel_ratio: 2.0, background: [0x0f, 0x17, 0x2a] }
    }
}

/// Converts a visible region into a raster image.
pub trait Capture: Send + Sync {
    fn capture(&self, region: Region, options: &CaptureOptions) -> Result<Raster, ExportError>;
}

/// Loads `<region>.png` from a directory of pre-rendered regions.
pub struct DirectoryCapture {
    dir: PathBuf,
}

impl DirectoryCapture {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, region: Region) -> PathBuf {
        self.dir.join(format!("{}.png", region.as_str()))
    }
}

impl Capture for DirectoryCapture {
    fn capture(&self, region: Region, options: &CaptureOptions) -> Result<Raster, ExportError> {
        let path = self.path_for(region);
        let source = load(&path)?;
        let rendered = render(&source, options)?;

        tracing::debug!(
            "Captured {} region {}x{} -> {}x{}",
            region.as_str(),
            source.width(),
            source.height(),
            rendered.width(),
            rendered.height()
        );

        Raster::from_image(&rendered)
    }
}

fn load(path: &Path) -> Result<DynamicImage, ExportError> {
    image_crate::open(path)
        .map_err(|e| ExportError::Capture(format!("{}: {}", path.display(), e)))
}

/// Flatten onto the background, then scale by the pixel ratio.
pub fn render(source: &DynamicImage, options: &CaptureOptions) -> Result<DynamicImage, ExportError> {
    if options.pixel_ratio.is_nan() || options.pixel_ratio <= 0.0 {
        return Err(ExportError::Capture(format!(
            "invalid pixel ratio {}",
            options.pixel_ratio
        )));
    }

    let rgba = source.to_rgba8();
    let (width, height) = rgba.dimensions();
    let [br, bg, bb] = options.background;

    let mut flat = RgbImage::from_pixel(width, height, Rgb([br, bg, bb]));
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let blend = |fg: u8, back: u8| -> u8 {
            ((fg as u32 * a as u32 + back as u32 * (255 - a as u32)) / 255) as u8
        };
        flat.put_pixel(x, y, Rgb([blend(r, br), blend(g, bg), blend(b, bb)]));
    }

    let out_w = ((width as f32) * options.pixel_ratio).round().max(1.0) as u32;
    let out_h = ((height as f32) * options.pixel_ratio).round().max(1.0) as u32;

    if (out_w, out_h) == (width, height) {
        return Ok(DynamicImage::ImageRgb8(flat));
    }

    Ok(DynamicImage::ImageRgb8(imageops::resize(
        &flat,
        out_w,
        out_h,
        FilterType::Triangle,
    )))
}
