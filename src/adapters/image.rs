//! Image file loading for image options.

use std::path::Path;
use tokio::fs;

use crate::domain::decision::ImageFile;

/// Errors that can occur while loading an image file.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Failed to read image {path}: {message}")]
    Read { path: String, message: String },

    #[error("Unsupported image type for {path}: {mime_type}")]
    UnsupportedType { path: String, mime_type: String },
}

/// Guesses a MIME type from the file extension.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Reads an image file from disk.
///
/// Files whose extension does not map to an `image/*` type are rejected.
pub async fn load_image(path: impl AsRef<Path>) -> Result<ImageFile, ImageError> {
    let path = path.as_ref();
    let mime_type = guess_mime_type(path);
    if !mime_type.starts_with("image/") {
        return Err(ImageError::UnsupportedType {
            path: path.display().to_string(),
            mime_type: mime_type.to_string(),
        });
    }

    let bytes = fs::read(path).await.map_err(|e| ImageError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(ImageFile::new(file_name, mime_type, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn guesses_common_image_types() {
        assert_eq!(guess_mime_type(Path::new("a.PNG")), "image/png");
        assert_eq!(guess_mime_type(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(guess_mime_type(Path::new("a.txt")), "application/octet-stream");
    }

    #[tokio::test]
    async fn loads_image_bytes_and_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("phone.png");
        std::fs::write(&path, [137u8, 80, 78, 71]).unwrap();

        let image = load_image(&path).await.unwrap();
        assert_eq!(image.file_name, "phone.png");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, vec![137u8, 80, 78, 71]);
    }

    #[tokio::test]
    async fn rejects_non_image_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let result = load_image(&path).await;
        assert!(matches!(result, Err(ImageError::UnsupportedType { .. })));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let result = load_image("/definitely/not/here.png").await;
        assert!(matches!(result, Err(ImageError::Read { .. })));
    }
}
