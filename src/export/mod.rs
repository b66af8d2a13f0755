//! Export glue
//!
//! Turns captured regions into PNG / PDF files and the fetched download
//! history into PDF or CSV reports, then hands the bytes to a sink.
//!
//! Flow of a certificate export:
//! - guard: student and school must be non-blank, else nothing happens
//! - capture the certificate region (pixel ratio 3, white background)
//! - record the download through [`DownloadLog`]
//! - save PNG as-is, or PDF with one page the size of the image

pub mod capture;
pub mod certificate;
pub mod csv;
pub mod pdf;
pub mod report;
pub mod sink;

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use axum::async_trait;
use printpdf::image_crate::{self, DynamicImage, GenericImageView, ImageFormat, ImageOutputFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::ClientError;
use crate::models::NewDownload;

pub use capture::{Capture, CaptureOptions, DirectoryCapture, Region};
pub use certificate::{CertificateExporter, CertificateRequest, ExportedFile};
pub use report::ReportExporter;
pub use sink::{DirectorySink, DownloadSink};

#[derive(Debug, Error)]
pub enum ExportError {
    /// Student or school name is blank; nothing was captured or sent.
    #[error("student name and school name are required")]
    MissingFields,

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("image error: {0}")]
    Image(#[from] image_crate::ImageError),

    #[error("pdf error: {0}")]
    Pdf(String),

    #[error("save failed: {0}")]
    Save(#[from] std::io::Error),
}

impl ExportError {
    /// Only the guard failure is shown to the user.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, ExportError::MissingFields)
    }
}

/// Certificate output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Png,
    Pdf,
}

impl FileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Png => "png",
            FileFormat::Pdf => "pdf",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            FileFormat::Png => "image/png",
            FileFormat::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(FileFormat::Png),
            "pdf" => Ok(FileFormat::Pdf),
            other => Err(format!("unsupported file format: {}", other)),
        }
    }
}

/// Where completed exports are reported.
#[async_trait]
pub trait DownloadLog: Send + Sync {
    async fn record(&self, data: &NewDownload) -> Result<(), ClientError>;
}

/// A captured region: PNG bytes plus pixel dimensions.
#[derive(Clone)]
pub struct Raster {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("bytes", &self.png.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Raster {
    pub fn from_png(png: Vec<u8>) -> Result<Self, ExportError> {
        let image = image_crate::load_from_memory_with_format(&png, ImageFormat::Png)?;
        let (width, height) = image.dimensions();
        Ok(Self { png, width, height })
    }

    pub fn from_image(image: &DynamicImage) -> Result<Self, ExportError> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
        let (width, height) = image.dimensions();
        Ok(Self { png, width, height })
    }

    pub fn decode(&self) -> Result<DynamicImage, ExportError> {
        Ok(image_crate::load_from_memory_with_format(&self.png, ImageFormat::Png)?)
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
