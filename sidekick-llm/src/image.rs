//! Inline image encoding for prompts that attach a picture.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sidekick_common::Result;

/// An image to attach to a prompt.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Read from disk when the request is built.
    File(PathBuf),
    /// Already encoded by the caller.
    Base64 { data: String, media_type: String },
}

impl ImageSource {
    /// Render as a `data:` URL, reading from disk if needed.
    ///
    /// A file that cannot be read surfaces as an I/O error, not a provider
    /// error.
    pub async fn to_data_url(&self) -> Result<String> {
        match self {
            Self::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                Ok(format!(
                    "data:{};base64,{}",
                    media_type_for(path),
                    STANDARD.encode(&bytes)
                ))
            }
            Self::Base64 { data, media_type } => {
                Ok(format!("data:{media_type};base64,{data}"))
            }
        }
    }
}

/// Media type from the file extension; PNG when unknown.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_maps_to_media_type() {
        assert_eq!(media_type_for(Path::new("shot.png")), "image/png");
        assert_eq!(media_type_for(Path::new("photo.JPEG")), "image/jpeg");
        assert_eq!(media_type_for(Path::new("anim.gif")), "image/gif");
        assert_eq!(media_type_for(Path::new("sticker.webp")), "image/webp");
        assert_eq!(media_type_for(Path::new("mystery")), "image/png");
    }

    #[tokio::test]
    async fn base64_variant_renders_without_touching_disk() {
        let image = ImageSource::Base64 {
            data: "aGVsbG8=".into(),
            media_type: "image/webp".into(),
        };
        let url = image.to_data_url().await.unwrap();
        assert_eq!(url, "data:image/webp;base64,aGVsbG8=");
    }

    #[tokio::test]
    async fn file_variant_reads_and_encodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        tokio::fs::write(&path, b"png-bytes").await.unwrap();

        let url = ImageSource::File(path).to_data_url().await.unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(url.ends_with(&STANDARD.encode(b"png-bytes")));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = ImageSource::File(PathBuf::from("/nonexistent/shot.png"))
            .to_data_url()
            .await
            .unwrap_err();
        assert!(matches!(err, sidekick_common::SidekickError::Io(_)));
    }
}
