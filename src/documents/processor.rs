//! Upload persistence and text extraction
//!
//! Raw uploads are written once per distinct content under
//! `<uploads_dir>/<sha256>.<ext>`; re-uploading identical bytes reuses the
//! existing file.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

pub const MIME_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";

/// MIME types accepted for upload
pub const ALLOWED_MIME_TYPES: [&str; 2] = [MIME_TEXT, MIME_PDF];

/// A stored upload with its extracted text
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
    /// Content-addressed location on disk
    pub path: PathBuf,
    pub content: String,
}

/// Stores uploads and extracts their text
pub struct FileProcessor {
    uploads_dir: PathBuf,
    max_bytes: usize,
}

impl FileProcessor {
    pub fn new(uploads_dir: PathBuf, max_bytes: usize) -> Self {
        Self {
            uploads_dir,
            max_bytes,
        }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Check the MIME type against the allow-list and the size limit
    pub fn validate(&self, mime_type: &str, size: usize) -> Result<()> {
        if !ALLOWED_MIME_TYPES.contains(&mime_type) {
            return Err(Error::Validation(
                "File type not supported. Please upload a PDF or text file.".to_string(),
            ));
        }
        if size > self.max_bytes {
            return Err(Error::Validation(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.max_bytes
            )));
        }
        Ok(())
    }

    /// Validate, persist and extract an upload
    pub async fn save(
        &self,
        bytes: &[u8],
        original_name: &str,
        mime_type: &str,
    ) -> Result<ProcessedFile> {
        self.validate(mime_type, bytes.len())?;

        tokio::fs::create_dir_all(&self.uploads_dir).await?;
        let path = self.uploads_dir.join(stored_file_name(bytes, original_name));
        if tokio::fs::metadata(&path).await.is_err() {
            tokio::fs::write(&path, bytes).await?;
            tracing::debug!(path = %path.display(), size = bytes.len(), "Stored upload");
        } else {
            tracing::debug!(path = %path.display(), "Upload already stored");
        }

        let content = extract_text(bytes, mime_type, &path);

        Ok(ProcessedFile {
            original_name: original_name.to_string(),
            mime_type: mime_type.to_string(),
            size: bytes.len() as u64,
            path,
            content,
        })
    }
}

/// `<sha256-hex>[.<ext>]` for the given content
pub fn stored_file_name(bytes: &[u8], original_name: &str) -> String {
    let digest = Sha256::digest(bytes);
    let hash = format!("{:x}", digest);
    match Path::new(original_name).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{}.{}", hash, ext.to_lowercase()),
        _ => hash,
    }
}

/// Pull readable text out of an upload
pub fn extract_text(bytes: &[u8], mime_type: &str, stored_path: &Path) -> String {
    match mime_type {
        MIME_TEXT => String::from_utf8_lossy(bytes).into_owned(),
        MIME_PDF => {
            // TODO: parse the PDF content streams instead of returning a placeholder
            let name = stored_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("PDF content extraction would happen here for \"{}\"", name)
        }
        other => format!("Content extraction not supported for mimetype: {}", other),
    }
}

/// Document title derived from a file name: a non-empty final extension is
/// dropped
pub fn title_from_file_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < file_name.len() => file_name[..idx].to_string(),
        _ => file_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_processor(dir: &TempDir) -> FileProcessor {
        FileProcessor::new(dir.path().join("uploads"), 1024)
    }

    #[tokio::test]
    async fn test_save_plain_text() {
        let dir = TempDir::new().unwrap();
        let processor = make_processor(&dir);

        let file = processor
            .save(b"Hello world", "notes.txt", MIME_TEXT)
            .await
            .unwrap();

        assert_eq!(file.size, 11);
        assert_eq!(file.content, "Hello world");
        assert_eq!(file.original_name, "notes.txt");
        assert!(file.path.starts_with(processor.uploads_dir()));
        assert_eq!(tokio::fs::read(&file.path).await.unwrap(), b"Hello world");
    }

    #[tokio::test]
    async fn test_identical_content_shares_file() {
        let dir = TempDir::new().unwrap();
        let processor = make_processor(&dir);

        let a = processor.save(b"same", "a.txt", MIME_TEXT).await.unwrap();
        let b = processor.save(b"same", "b.txt", MIME_TEXT).await.unwrap();
        let c = processor.save(b"different", "c.txt", MIME_TEXT).await.unwrap();

        assert_eq!(a.path, b.path);
        assert_ne!(a.path, c.path);
    }

    #[tokio::test]
    async fn test_rejects_unsupported_type() {
        let dir = TempDir::new().unwrap();
        let processor = make_processor(&dir);

        let err = processor
            .save(b"<html>", "page.html", "text/html")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(!processor.uploads_dir().exists());
    }

    #[tokio::test]
    async fn test_rejects_oversized_upload() {
        let dir = TempDir::new().unwrap();
        let processor = make_processor(&dir);

        let big = vec![b'a'; 1025];
        let err = processor.save(&big, "big.txt", MIME_TEXT).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_pdf_placeholder() {
        let dir = TempDir::new().unwrap();
        let processor = make_processor(&dir);

        let file = processor
            .save(b"%PDF-1.7 ...", "paper.PDF", MIME_PDF)
            .await
            .unwrap();
        assert!(file.content.starts_with("PDF content extraction would happen here"));
        assert!(file.path.extension().unwrap() == "pdf");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let text = extract_text(&[b'h', 0xff, b'i'], MIME_TEXT, Path::new("x.txt"));
        assert_eq!(text, "h\u{FFFD}i");
    }

    #[test]
    fn test_stored_file_name() {
        let name = stored_file_name(b"Hello world", "notes.TXT");
        assert!(name.ends_with(".txt"));
        assert_eq!(name.len(), 64 + 4);
        assert_eq!(stored_file_name(b"x", "README").len(), 64);
    }

    #[test]
    fn test_title_from_file_name() {
        assert_eq!(title_from_file_name("notes.txt"), "notes");
        assert_eq!(title_from_file_name("chapter.one.pdf"), "chapter.one");
        assert_eq!(title_from_file_name("README"), "README");
        assert_eq!(title_from_file_name(".bashrc"), ".bashrc");
        assert_eq!(title_from_file_name("file."), "file.");
        assert_eq!(title_from_file_name("archive.tar."), "archive.tar.");
    }
}
