//
//  fryends-client
//  api/media.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Binary attachments for multipart uploads.

use std::path::Path;

use chrono::Utc;

/// The kind of media being uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// A JPEG photo.
    Photo,
    /// An MP4 video.
    Video,
}

impl MediaKind {
    /// Returns the MIME type sent in the part's `Content-Type` header.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Photo => "image/jpeg",
            Self::Video => "video/mp4",
        }
    }

    /// Returns the file extension used for generated filenames.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Photo => "jpg",
            Self::Video => "mp4",
        }
    }

    /// Returns the default form field for profile uploads.
    pub fn target(&self) -> &'static str {
        match self {
            Self::Photo => "profileImage",
            Self::Video => "profileVideo",
        }
    }

    /// Builds a filename from the kind and the given unix timestamp.
    ///
    /// ```rust
    /// use fryends_client::api::MediaKind;
    ///
    /// assert_eq!(MediaKind::Photo.file_name(1700000000), "ImageFile1700000000.jpg");
    /// assert_eq!(MediaKind::Video.file_name(42), "VideoFile42.mp4");
    /// ```
    pub fn file_name(&self, timestamp: i64) -> String {
        let stem = match self {
            Self::Photo => "ImageFile",
            Self::Video => "VideoFile",
        };
        format!("{}{}.{}", stem, timestamp, self.extension())
    }

    /// Guesses the kind from a file extension.
    ///
    /// Returns `None` for anything that is not a recognised photo or video
    /// extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Photo),
            "mp4" | "m4v" | "mov" => Some(Self::Video),
            _ => None,
        }
    }
}

/// A single binary part of a multipart upload.
///
/// Created per upload call; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    /// Form field name of the file part.
    pub key: String,
    /// Generated filename (`ImageFile<ts>.jpg` or `VideoFile<ts>.mp4`).
    pub filename: String,
    /// Raw file bytes.
    pub data: Vec<u8>,
    /// MIME type of `data`.
    pub mime_type: String,
    /// Whether an extra `cover` part is emitted.
    pub is_cover: bool,
}

impl Media {
    /// Wraps raw bytes as an upload part, stamping the filename with the
    /// current time.
    pub fn new(data: Vec<u8>, key: impl Into<String>, kind: MediaKind, is_cover: bool) -> Self {
        Self {
            key: key.into(),
            filename: kind.file_name(Utc::now().timestamp()),
            data,
            mime_type: kind.mime_type().to_string(),
            is_cover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_photo() {
        let media = Media::new(vec![1, 2, 3], "avatar", MediaKind::Photo, true);
        assert_eq!(media.key, "avatar");
        assert_eq!(media.mime_type, "image/jpeg");
        assert!(media.filename.starts_with("ImageFile"));
        assert!(media.filename.ends_with(".jpg"));
        assert!(media.is_cover);
    }

    #[test]
    fn test_new_video() {
        let media = Media::new(Vec::new(), MediaKind::Video.target(), MediaKind::Video, false);
        assert_eq!(media.key, "profileVideo");
        assert_eq!(media.mime_type, "video/mp4");
        assert!(media.filename.starts_with("VideoFile"));
        assert!(media.filename.ends_with(".mp4"));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(MediaKind::from_path(Path::new("a/b.JPG")), Some(MediaKind::Photo));
        assert_eq!(MediaKind::from_path(Path::new("clip.mp4")), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(MediaKind::from_path(Path::new("noext")), None);
    }
}
