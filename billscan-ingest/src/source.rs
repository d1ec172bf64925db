//! Text source collaborators.
//!
//! OCR and native PDF text extraction live outside this crate; they plug in
//! through [`TextSource`].

use tracing::debug;

use crate::error::{ExtractError, Result};

pub trait TextSource {
    /// Recover the raw text of one uploaded document.
    fn extract_text(&self, bytes: &[u8], mime: &str) -> Result<String>;
}

impl<F> TextSource for F
where
    F: Fn(&[u8], &str) -> Result<String>,
{
    fn extract_text(&self, bytes: &[u8], mime: &str) -> Result<String> {
        self(bytes, mime)
    }
}

/// Reads documents that already are UTF-8 text (`text/*`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
    fn extract_text(&self, bytes: &[u8], mime: &str) -> Result<String> {
        if !mime.starts_with("text/") {
            return Err(ExtractError::ExtractionFailed(format!(
                "no text extractor for {mime}"
            )));
        }
        String::from_utf8(bytes.to_vec())
            .map_err(|e| ExtractError::ExtractionFailed(format!("document is not UTF-8: {e}")))
    }
}

/// Direct extraction first, a second source (typically OCR) when the first
/// returns no text, as with scanned PDFs that carry no text layer.
///
/// An error from the primary source is returned as is.
#[derive(Debug, Clone)]
pub struct FallbackSource<P, S> {
    pub primary: P,
    pub secondary: S,
}

impl<P, S> FallbackSource<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: TextSource, S: TextSource> TextSource for FallbackSource<P, S> {
    fn extract_text(&self, bytes: &[u8], mime: &str) -> Result<String> {
        let text = self.primary.extract_text(bytes, mime)?;
        let text = text.trim();
        if !text.is_empty() {
            debug!(len = text.len(), "direct text extraction completed");
            return Ok(text.to_string());
        }

        debug!("no text from direct extraction, using fallback source");
        let text = self.secondary.extract_text(bytes, mime)?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ocr(_: &[u8], _: &str) -> Result<String> {
        Ok("  12/03/2024 Groceries ₹10\n".to_string())
    }

    fn blank(_: &[u8], _: &str) -> Result<String> {
        Ok("   ".to_string())
    }

    fn direct(_: &[u8], _: &str) -> Result<String> {
        Ok(" direct ".to_string())
    }

    fn corrupt(_: &[u8], _: &str) -> Result<String> {
        Err(ExtractError::ExtractionFailed("corrupt pdf".into()))
    }

    #[test]
    fn test_plain_text_source() {
        let text = PlainTextSource.extract_text(b"hello", "text/plain").unwrap();
        assert_eq!(text, "hello");
        assert!(matches!(
            PlainTextSource.extract_text(b"%PDF", "application/pdf"),
            Err(ExtractError::ExtractionFailed(_))
        ));
        assert!(PlainTextSource.extract_text(&[0xff, 0xfe], "text/plain").is_err());
    }

    #[test]
    fn test_fallback_used_only_for_blank_text() {
        let src = FallbackSource::new(blank, ocr);
        assert_eq!(src.extract_text(b"", "application/pdf").unwrap(), "12/03/2024 Groceries ₹10");

        let src = FallbackSource::new(direct, ocr);
        assert_eq!(src.extract_text(b"", "application/pdf").unwrap(), "direct");
    }

    #[test]
    fn test_primary_error_propagates() {
        let src = FallbackSource::new(corrupt, ocr);
        assert!(matches!(
            src.extract_text(b"", "application/pdf"),
            Err(ExtractError::ExtractionFailed(_))
        ));
    }
}
