//! CV text extraction. Uploads are PDF or plain text; either way the scorer
//! receives a string. Extraction never fails: an unreadable document yields
//! an empty string, which the heuristic scores as a low but valid result.

use tracing::warn;

/// Extracts text content from stored CV bytes.
pub fn cv_text_from_bytes(key: &str, bytes: &[u8]) -> String {
    if is_pdf(key, bytes) {
        // pdf-extract can panic on malformed documents; a bad upload must
        // degrade to an empty string, not take down the request.
        let extracted =
            std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)).ok();
        match extracted {
            Some(Ok(text)) => text,
            Some(Err(e)) => {
                warn!("Failed to extract text from PDF CV '{key}': {e}");
                String::new()
            }
            None => {
                warn!("PDF extraction panicked for CV '{key}'");
                String::new()
            }
        }
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

fn is_pdf(key: &str, bytes: &[u8]) -> bool {
    key.to_lowercase().ends_with(".pdf") || bytes.starts_with(b"%PDF")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let text = cv_text_from_bytes("cv-jean.txt", "Expérience: 5 ans".as_bytes());
        assert_eq!(text, "Expérience: 5 ans");
    }

    #[test]
    fn test_invalid_utf8_is_lossy_not_fatal() {
        let text = cv_text_from_bytes("cv.txt", &[0x66, 0xff, 0x6f]);
        assert!(text.contains('f'));
        assert!(text.contains('o'));
    }

    #[test]
    fn test_broken_pdf_yields_empty_string() {
        let text = cv_text_from_bytes("cv.pdf", b"%PDF-1.4 truncated garbage");
        assert_eq!(text, "");
    }

    #[test]
    fn test_pdf_detected_by_magic_bytes_without_extension() {
        assert!(is_pdf("cv-upload", b"%PDF-1.7 ..."));
        assert!(is_pdf("cv.PDF", b"whatever"));
        assert!(!is_pdf("cv.txt", b"plain text"));
    }
}
