//! Image payloads for image options.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

/// An image picked by the user for an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Encodes the image as a `data:<mime>;base64,<payload>` URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            BASE64_STANDARD.encode(&self.bytes)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_uses_mime_type_and_standard_base64() {
        let image = ImageFile::new("dot.png", "image/png", b"hello".to_vec());
        assert_eq!(image.to_data_url(), "data:image/png;base64,aGVsbG8=");
    }
}
