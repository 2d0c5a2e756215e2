use crate::error::ClipError;
use bytes::Bytes;

/// Broad class of a clip's media type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

/// A captured audio/video answer.
///
/// Cloning shares the underlying bytes.
#[derive(Debug, Clone)]
pub struct Clip {
    data: Bytes,
    mime_type: String,
}

impl Clip {
    /// `mime_type` parameters (e.g. `;codecs=vp8,opus`) are dropped and the
    /// essence lowercased.
    pub fn new(data: impl Into<Bytes>, mime_type: &str) -> Self {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        Self {
            data: data.into(),
            mime_type: essence,
        }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn media_kind(&self) -> Option<MediaKind> {
        let (top, sub) = self.mime_type.split_once('/')?;
        if sub.is_empty() {
            return None;
        }
        match top {
            "audio" => Some(MediaKind::Audio),
            "video" => Some(MediaKind::Video),
            _ => None,
        }
    }

    /// Accept only non-empty `audio/*` or `video/*` clips
    pub fn validate(&self) -> Result<MediaKind, ClipError> {
        if self.is_empty() {
            return Err(ClipError::Empty);
        }
        self.media_kind()
            .ok_or_else(|| ClipError::UnsupportedMedia(self.mime_type.clone()))
    }
}
