//! Document-to-text decoding for resumes and job descriptions.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::errors::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self, DecodeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" => Ok(DocumentFormat::Txt),
            "" => Err(DecodeError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(DecodeError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Where a document's content comes from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Already-decoded text.
    Text(String),
    Bytes { data: Bytes, format: DocumentFormat },
    /// Format inferred from the extension.
    Path(PathBuf),
}

#[async_trait]
pub trait DocumentDecoder: Send + Sync {
    async fn decode(&self, source: &DocumentSource) -> Result<String, DecodeError>;
}

/// Default decoder: TXT (UTF-8, then Latin-1) and PDF. DOCX is recognized
/// but has no decoder.
#[derive(Debug, Clone, Default)]
pub struct FileDecoder;

impl FileDecoder {
    fn decode_bytes(data: &[u8], format: DocumentFormat) -> Result<String, DecodeError> {
        let text = match format {
            DocumentFormat::Txt => match std::str::from_utf8(data) {
                Ok(s) => s.to_string(),
                Err(_) => {
                    debug!("Text is not UTF-8, decoding as Latin-1");
                    data.iter().map(|&b| b as char).collect()
                }
            },
            DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(data)
                .map_err(|e| DecodeError::Pdf(e.to_string()))?,
            DocumentFormat::Docx => {
                return Err(DecodeError::UnsupportedFormat(".docx".to_string()))
            }
        };
        non_empty(text)
    }
}

#[async_trait]
impl DocumentDecoder for FileDecoder {
    async fn decode(&self, source: &DocumentSource) -> Result<String, DecodeError> {
        match source {
            DocumentSource::Text(text) => non_empty(text.clone()),
            DocumentSource::Bytes { data, format } => {
                let (data, format) = (data.clone(), *format);
                // PDF parsing is CPU-bound.
                tokio::task::spawn_blocking(move || Self::decode_bytes(&data, format))
                    .await
                    .map_err(|e| DecodeError::Pdf(format!("decoder task failed: {e}")))?
            }
            DocumentSource::Path(path) => {
                let format = DocumentFormat::from_path(path)?;
                let data = Bytes::from(tokio::fs::read(path).await?);
                self.decode(&DocumentSource::Bytes { data, format }).await
            }
        }
    }
}

fn non_empty(text: String) -> Result<String, DecodeError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(DecodeError::Empty)
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_plain_text_passthrough_is_trimmed() {
        let text = FileDecoder
            .decode(&DocumentSource::Text("  Jane Doe\nPython  ".into()))
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe\nPython");
    }

    #[tokio::test]
    async fn test_latin1_fallback() {
        let data = Bytes::from_static(b"Jos\xe9 Garc\xeda");
        let text = FileDecoder
            .decode(&DocumentSource::Bytes {
                data,
                format: DocumentFormat::Txt,
            })
            .await
            .unwrap();
        assert_eq!(text, "José García");
    }

    #[tokio::test]
    async fn test_txt_file_from_path() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "Skills: Rust, SQL").unwrap();
        let text = FileDecoder
            .decode(&DocumentSource::Path(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(text, "Skills: Rust, SQL");
    }

    #[tokio::test]
    async fn test_whitespace_only_is_empty() {
        let err = FileDecoder
            .decode(&DocumentSource::Text(" \n\t ".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::Empty));
    }

    #[tokio::test]
    async fn test_docx_unsupported() {
        let err = FileDecoder
            .decode(&DocumentSource::Bytes {
                data: Bytes::from_static(b"PK"),
                format: DocumentFormat::Docx,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = FileDecoder
            .decode(&DocumentSource::Path(PathBuf::from("/nonexistent/resume.txt")))
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::Io(_)));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("cv.PDF")).unwrap(),
            DocumentFormat::Pdf
        );
        assert!(DocumentFormat::from_path(Path::new("cv.rtf")).is_err());
        assert!(DocumentFormat::from_path(Path::new("cv")).is_err());
    }
}
