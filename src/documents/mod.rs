//! Document uploads
//!
//! `processor` validates, stores and extracts uploaded files; `handler`
//! exposes the upload and document CRUD routes.

pub mod handler;
pub mod processor;

pub use handler::{documents_router, DocumentsState};
pub use processor::{
    extract_text, stored_file_name, title_from_file_name, FileProcessor, ProcessedFile,
    ALLOWED_MIME_TYPES, MIME_PDF, MIME_TEXT,
};
