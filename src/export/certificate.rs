//! Certificate export

use std::path::PathBuf;

use super::{
    pdf, Capture, CaptureOptions, DownloadLog, DownloadSink, ExportError, FileFormat, Region,
};
use crate::models::NewDownload;

const FILENAME_PREFIX: &str = "شهادة صناعيو المستقبل";

#[derive(Debug, Clone)]
pub struct CertificateRequest {
    pub template_id: String,
    pub student_name: String,
    pub school_name: String,
    pub format: FileFormat,
}

#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub format: FileFormat,
    /// Whether the download log accepted the event
    pub recorded: bool,
}

pub struct CertificateExporter<'a> {
    capture: &'a dyn Capture,
    log: &'a dyn DownloadLog,
    sink: &'a dyn DownloadSink,
}

impl<'a> CertificateExporter<'a> {
    pub fn new(
        capture: &'a dyn Capture,
        log: &'a dyn DownloadLog,
        sink: &'a dyn DownloadSink,
    ) -> Self {
        Self { capture, log, sink }
    }

    pub async fn export(&self, request: &CertificateRequest) -> Result<ExportedFile, ExportError> {
        let student = request.student_name.trim();
        let school = request.school_name.trim();

        if student.is_empty() || school.is_empty() {
            return Err(ExportError::MissingFields);
        }

        let raster = self
            .capture
            .capture(Region::Certificate, &CaptureOptions::certificate())
            .map_err(|e| {
                tracing::error!("Certificate capture failed: {}", e);
                e
            })?;

        let data = NewDownload {
            certificate_type: request.template_id.clone(),
            file_format: request.format.as_str().to_string(),
            student_name: student.to_string(),
            school_name: school.to_string(),
        };

        // The user still gets the file when the statistics call fails
        let recorded = match self.log.record(&data).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to record download: {}", e);
                false
            }
        };

        let filename = format!("{}_{}.{}", FILENAME_PREFIX, student, request.format);
        let bytes = match request.format {
            FileFormat::Png => raster.png().to_vec(),
            FileFormat::Pdf => pdf::image_page_pdf(&raster, FILENAME_PREFIX)?,
        };

        let path = self
            .sink
            .save(&filename, request.format.mime(), &bytes)
            .map_err(|e| {
                tracing::error!("Certificate save failed: {}", e);
                e
            })?;

        Ok(ExportedFile {
            path,
            format: request.format,
            recorded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::async_trait;
    use parking_lot::Mutex;
    use tempfile::TempDir;

    use crate::client::ClientError;
    use crate::export::testing::solid_raster;
    use crate::export::{DirectorySink, Raster};

    #[derive(Default)]
    struct CountingCapture {
        calls: AtomicUsize,
    }

    impl Capture for CountingCapture {
        fn capture(&self, region: Region, options: &CaptureOptions) -> Result<Raster, ExportError> {
            assert_eq!(region, Region::Certificate);
            assert_eq!(options.pixel_ratio, 3.0);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(solid_raster(90, 60))
        }
    }

    struct BrokenCapture;

    impl Capture for BrokenCapture {
        fn capture(&self, _: Region, _: &CaptureOptions) -> Result<Raster, ExportError> {
            Err(ExportError::Capture("region not mounted".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingLog {
        seen: Mutex<Vec<NewDownload>>,
        fail: bool,
    }

    #[async_trait]
    impl DownloadLog for RecordingLog {
        async fn record(&self, data: &NewDownload) -> Result<(), ClientError> {
            self.seen.lock().push(data.clone());
            if self.fail {
                return Err(ClientError::Network("offline".to_string()));
            }
            Ok(())
        }
    }

    fn request(student: &str, school: &str, format: FileFormat) -> CertificateRequest {
        CertificateRequest {
            template_id: "excellence".to_string(),
            student_name: student.to_string(),
            school_name: school.to_string(),
            format,
        }
    }

    #[tokio::test]
    async fn test_blank_fields_stop_before_capture_and_network() {
        let dir = TempDir::new().unwrap();
        let capture = CountingCapture::default();
        let log = RecordingLog::default();
        let sink = DirectorySink::new(dir.path());
        let exporter = CertificateExporter::new(&capture, &log, &sink);

        for (student, school) in [("", "Future School"), ("Sara", "   "), (" \t", "")] {
            let err = exporter
                .export(&request(student, school, FileFormat::Png))
                .await
                .unwrap_err();
            assert!(matches!(err, ExportError::MissingFields));
        }

        assert_eq!(capture.calls.load(Ordering::SeqCst), 0);
        assert!(log.seen.lock().is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_png_export_records_and_saves() {
        let dir = TempDir::new().unwrap();
        let capture = CountingCapture::default();
        let log = RecordingLog::default();
        let sink = DirectorySink::new(dir.path());
        let exporter = CertificateExporter::new(&capture, &log, &sink);

        let file = exporter
            .export(&request("  Sara ", " Future School", FileFormat::Png))
            .await
            .unwrap();

        assert!(file.recorded);
        assert_eq!(
            file.path.file_name().unwrap().to_str().unwrap(),
            "شهادة صناعيو المستقبل_Sara.png"
        );
        let saved = fs::read(&file.path).unwrap();
        assert_eq!(Raster::from_png(saved).unwrap().width(), 90);

        let seen = log.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].student_name, "Sara");
        assert_eq!(seen[0].school_name, "Future School");
        assert_eq!(seen[0].certificate_type, "excellence");
        assert_eq!(seen[0].file_format, "png");
    }

    #[tokio::test]
    async fn test_pdf_export_writes_document() {
        let dir = TempDir::new().unwrap();
        let capture = CountingCapture::default();
        let log = RecordingLog::default();
        let sink = DirectorySink::new(dir.path());

        let file = CertificateExporter::new(&capture, &log, &sink)
            .export(&request("Sara", "Future School", FileFormat::Pdf))
            .await
            .unwrap();

        assert_eq!(file.format, FileFormat::Pdf);
        assert!(fs::read(&file.path).unwrap().starts_with(b"%PDF"));
        assert_eq!(log.seen.lock()[0].file_format, "pdf");
    }

    #[tokio::test]
    async fn test_record_failure_still_saves() {
        let dir = TempDir::new().unwrap();
        let capture = CountingCapture::default();
        let log = RecordingLog { fail: true, ..Default::default() };
        let sink = DirectorySink::new(dir.path());

        let file = CertificateExporter::new(&capture, &log, &sink)
            .export(&request("Sara", "Future School", FileFormat::Png))
            .await
            .unwrap();

        assert!(!file.recorded);
        assert!(file.path.exists());
    }

    #[tokio::test]
    async fn test_capture_failure_skips_record_and_save() {
        let dir = TempDir::new().unwrap();
        let log = RecordingLog::default();
        let sink = DirectorySink::new(dir.path());

        let err = CertificateExporter::new(&BrokenCapture, &log, &sink)
            .export(&request("Sara", "Future School", FileFormat::Png))
            .await
            .unwrap_err();

        assert!(!err.is_user_facing());
        assert!(log.seen.lock().is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
