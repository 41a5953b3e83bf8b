//! Upload validation
//!
//! Size and content-type checks applied before any store mutation or network
//! call. A rejected upload never reaches the object store.

use crate::error::{CoreError, Result};

/// What kind of media an upload claims to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Feed video
    Video,
    /// Music track audio
    Audio,
    /// Cover/thumbnail image
    Image,
}

impl UploadKind {
    /// Content types accepted for this kind
    pub fn allowed_content_types(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Video => &["video/mp4", "video/webm", "video/quicktime"],
            UploadKind::Audio => &["audio/mpeg", "audio/mp4", "audio/ogg", "audio/flac"],
            UploadKind::Image => &["image/jpeg", "image/png", "image/webp"],
        }
    }
}

/// Size limits per upload kind, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    /// Maximum video size
    pub max_video_bytes: usize,
    /// Maximum audio size
    pub max_audio_bytes: usize,
    /// Maximum image size
    pub max_image_bytes: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_video_bytes: 200 * 1024 * 1024,
            max_audio_bytes: 50 * 1024 * 1024,
            max_image_bytes: 10 * 1024 * 1024,
        }
    }
}

impl UploadLimits {
    /// Limit for a given kind
    pub fn max_bytes(&self, kind: UploadKind) -> usize {
        match kind {
            UploadKind::Video => self.max_video_bytes,
            UploadKind::Audio => self.max_audio_bytes,
            UploadKind::Image => self.max_image_bytes,
        }
    }

    /// Validate an upload before it touches the network
    pub fn check(&self, kind: UploadKind, content_type: &str, size_bytes: usize) -> Result<()> {
        if size_bytes == 0 {
            return Err(CoreError::validation("upload is empty"));
        }

        let max = self.max_bytes(kind);
        if size_bytes > max {
            return Err(CoreError::validation(format!(
                "upload of {size_bytes} bytes exceeds the {max} byte limit"
            )));
        }

        if !kind
            .allowed_content_types()
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(content_type))
        {
            return Err(CoreError::validation(format!(
                "content type '{content_type}' is not accepted for {kind:?}"
            )));
        }

        Ok(())
    }
}
