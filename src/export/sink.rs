//! File save targets

use std::fs;
use std::path::PathBuf;

use super::ExportError;

/// Receives finished exports (the browser's download prompt, a directory...).
pub trait DownloadSink: Send + Sync {
    fn save(&self, filename: &str, mime: &str, bytes: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Writes exports into a directory, creating it on first use.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, filename: &str, mime: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(sanitize_filename(filename));
        fs::write(&path, bytes)?;

        tracing::info!("Saved {} ({}, {} bytes)", path.display(), mime, bytes.len());
        Ok(path)
    }
}

/// Replace path separators and control characters so user-typed names
/// cannot escape the target directory.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        "download".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("شهادة_سارة.png"), "شهادة_سارة.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_filename("a\nb?.pdf"), "a_b_.pdf");
        assert_eq!(sanitize_filename("  "), "download");
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(dir.path().join("out"));

        let path = sink.save("report.csv", "text/csv", b"abc").unwrap();
        assert_eq!(path, dir.path().join("out").join("report.csv"));
        assert_eq!(fs::read(&path).unwrap(), b"abc");
    }
}
