//! Input resolution: normalise a path, URL, or uploaded byte buffer to a
//! local PDF file.
//!
//! pdfium requires a file-system path — it cannot stream from a byte buffer.
//! Uploaded bytes and downloaded documents are therefore staged into
//! temporary storage whose lifetime is tied to the returned value, so
//! cleanup happens on every exit path (success, error, panic) rather than
//! being left to the caller. We validate the PDF magic bytes (`%PDF`) before
//! returning so callers get a meaningful error rather than a pdfium crash.

use crate::error::Pdf2HtmlError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info};

/// The resolved input — a local path, or staged temporary storage.
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; PDF downloaded to a temp directory.
    /// The `TempDir` is kept alive to prevent cleanup until processing completes.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
    /// Input was an in-memory buffer written to a scoped temp file.
    Staged(NamedTempFile),
}

impl ResolvedInput {
    /// Get the path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
            ResolvedInput::Staged(f) => f.path(),
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local PDF file path.
///
/// If the input is a URL, download it to a temporary directory.
/// If the input is a local file, validate it exists and is readable.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, Pdf2HtmlError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

/// Stage an in-memory PDF buffer into a scoped temporary file.
///
/// The file is removed when the returned [`ResolvedInput`] is dropped, even
/// if extraction fails partway through.
pub fn stage_bytes(bytes: &[u8]) -> Result<ResolvedInput, Pdf2HtmlError> {
    let mut tmp = NamedTempFile::new().map_err(|e| Pdf2HtmlError::Staging {
        detail: e.to_string(),
    })?;
    tmp.write_all(bytes).map_err(|e| Pdf2HtmlError::Staging {
        detail: e.to_string(),
    })?;
    tmp.flush().map_err(|e| Pdf2HtmlError::Staging {
        detail: e.to_string(),
    })?;

    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(Pdf2HtmlError::NotAPdf {
            path: tmp.path().to_path_buf(),
            magic,
        });
    }

    debug!("Staged {} uploaded bytes to {}", bytes.len(), tmp.path().display());
    Ok(ResolvedInput::Staged(tmp))
}

/// Resolve a local file path, validating existence and PDF magic bytes.
fn resolve_local(path_str: &str) -> Result<ResolvedInput, Pdf2HtmlError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(Pdf2HtmlError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            // Verify PDF magic bytes
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(Pdf2HtmlError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2HtmlError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Pdf2HtmlError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Download a URL to a temporary directory and return the path.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, Pdf2HtmlError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Pdf2HtmlError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Pdf2HtmlError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            Pdf2HtmlError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(Pdf2HtmlError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let filename = extract_filename(url);

    let temp_dir = TempDir::new().map_err(|e| Pdf2HtmlError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Pdf2HtmlError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| Pdf2HtmlError::Internal(format!("Failed to write temp file: {}", e)))?;

    // Verify PDF magic bytes
    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(Pdf2HtmlError::NotAPdf {
            path: file_path,
            magic,
        });
    }

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Extract a reasonable filename from the URL path.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.pdf".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_extract_filename() {
        assert_eq!(
            extract_filename("https://example.com/papers/report.pdf"),
            "report.pdf"
        );
        assert_eq!(extract_filename("https://example.com/"), "downloaded.pdf");
    }

    #[test]
    fn stage_bytes_rejects_non_pdf() {
        let err = stage_bytes(b"PK\x03\x04 not a pdf");
        assert!(matches!(err, Err(Pdf2HtmlError::NotAPdf { .. })));
    }

    #[test]
    fn stage_bytes_cleans_up_on_drop() {
        let staged = stage_bytes(b"%PDF-1.7\nfake body").expect("staging should succeed");
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        drop(staged);
        assert!(!path.exists(), "temp file must be removed on drop");
    }

    #[test]
    fn resolve_local_missing_file() {
        let err = resolve_local("/definitely/not/a/real/file.pdf");
        assert!(matches!(err, Err(Pdf2HtmlError::FileNotFound { .. })));
    }
}
