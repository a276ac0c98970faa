//! Decoded audio attempt
//!
//! Clients send audio as base64, optionally as a `data:` URL. The clip keeps
//! the raw bytes plus the MIME type and a file name hint for multipart
//! uploads to the collaborators.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::CoachError;

const DEFAULT_MIME: &str = "audio/m4a";

/// Raw audio bytes with upload metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    bytes: Vec<u8>,
    mime_type: String,
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Decode base64 audio, accepting an optional `data:<mime>;base64,` prefix
    ///
    /// Whitespace inside the payload is ignored. Empty or undecodable input
    /// is a validation error.
    pub fn from_base64(input: &str) -> Result<Self, CoachError> {
        let input = input.trim();
        let (mime_type, payload) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or_else(|| {
                    CoachError::Validation("audioBase64 data URL has no payload".to_string())
                })?;
                let mime = header
                    .trim_end_matches(";base64")
                    .split(';')
                    .next()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(DEFAULT_MIME);
                (mime.to_string(), payload)
            }
            None => (DEFAULT_MIME.to_string(), input),
        };

        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if compact.is_empty() {
            return Err(CoachError::Validation("audioBase64 is empty".to_string()));
        }

        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| CoachError::Validation(format!("audioBase64 is not valid base64: {}", e)))?;

        if bytes.is_empty() {
            return Err(CoachError::Validation("audioBase64 decodes to no audio".to_string()));
        }

        Ok(Self { bytes, mime_type })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// File name for multipart uploads, extension derived from the MIME type
    pub fn file_name(&self) -> String {
        let subtype = self
            .mime_type
            .split('/')
            .nth(1)
            .unwrap_or("m4a")
            .trim_start_matches("x-");
        let ext = match subtype {
            "mpeg" => "mp3",
            "mp4" | "aac" => "m4a",
            "wave" => "wav",
            other => other,
        };
        format!("audio.{}", ext)
    }
}
