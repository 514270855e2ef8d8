//! Base64 encoding of attachment streams.

use crate::models::Attachment;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::write::EncoderStringWriter;
use std::io::{self, Read};

impl Attachment {
    /// Build an attachment from already-encoded base64 content.
    pub fn new(
        mime_type: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            mime_type: mime_type.into(),
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read `reader` to the end and encode it. See [`encode_attachment`].
    pub fn from_reader(name: impl Into<String>, reader: impl Read) -> io::Result<Self> {
        encode_attachment(name, reader)
    }
}

/// MIME type for a file name, or an empty string when the extension is unknown.
pub fn mime_type_for(name: &str) -> &'static str {
    mime_guess::from_path(name).first_raw().unwrap_or("")
}

/// Consume `reader` and produce an attachment holding its unpadded base64
/// encoding, typed from the extension of `name`.
///
/// A read error is returned as-is and no attachment is produced.
pub fn encode_attachment(name: impl Into<String>, mut reader: impl Read) -> io::Result<Attachment> {
    let name = name.into();
    let mut encoder = EncoderStringWriter::new(&STANDARD_NO_PAD);
    io::copy(&mut reader, &mut encoder)?;
    // into_inner flushes the trailing partial block
    let content = encoder.into_inner();

    tracing::trace!(name = %name, encoded_len = content.len(), "encoded attachment");

    Ok(Attachment {
        mime_type: mime_type_for(&name).to_string(),
        name,
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingReader {
        sent: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "stream dropped"));
            }
            self.sent = true;
            buf[..4].copy_from_slice(b"half");
            Ok(4)
        }
    }

    #[test]
    fn empty_stream_yields_empty_content() {
        let attachment = encode_attachment("report.pdf", io::empty()).unwrap();
        assert_eq!(attachment.content, "");
        assert_eq!(attachment.mime_type, "application/pdf");
        assert_eq!(attachment.name, "report.pdf");
    }

    #[test]
    fn content_is_unpadded_base64() {
        let attachment = encode_attachment("notes.txt", &b"hello"[..]).unwrap();
        assert_eq!(attachment.content, "aGVsbG8");
        assert_eq!(attachment.mime_type, "text/plain");
    }

    #[test]
    fn trailing_bytes_are_not_truncated() {
        let data = vec![0xffu8; 1025];
        let attachment = Attachment::from_reader("blob.bin", data.as_slice()).unwrap();
        // 1025 bytes = 341 full groups + 2 leftover bytes -> 1364 + 3 chars
        assert_eq!(attachment.content.len(), 1367);
    }

    #[test]
    fn unknown_extension_has_empty_type() {
        let attachment = encode_attachment("data.unknownext", &b"x"[..]).unwrap();
        assert_eq!(attachment.mime_type, "");

        let attachment = encode_attachment("README", &b"x"[..]).unwrap();
        assert_eq!(attachment.mime_type, "");
    }

    #[test]
    fn empty_unknown_attachment_encodes_name_only() {
        let attachment = encode_attachment("README", io::empty()).unwrap();
        assert_eq!(
            serde_json::to_value(&attachment).unwrap(),
            serde_json::json!({"name": "README"})
        );
    }

    #[test]
    fn read_error_propagates() {
        let err = encode_attachment("a.txt", FailingReader { sent: false }).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }
}
