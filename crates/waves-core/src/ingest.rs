//! Turning picked files into library entries.

use serde::{Deserialize, Serialize};

use crate::error::PlayerError;
use crate::library::Library;
use crate::media::{display_name, MediaEntry, MediaKind};

/// Which media the player accepts. Audio-only and audio+video players
/// differ only here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestPolicy {
    #[default]
    AudioOnly,
    AudioAndVideo,
}

impl IngestPolicy {
    /// Value for the file input `accept` attribute.
    pub fn accept_attribute(self) -> &'static str {
        match self {
            IngestPolicy::AudioOnly => "audio/*",
            IngestPolicy::AudioAndVideo => "audio/*,video/*",
        }
    }

    /// Classify a file by its declared MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::UnsupportedMedia`] for non-media types and for
    /// video under [`IngestPolicy::AudioOnly`].
    pub fn classify(self, file_name: &str, mime: &str) -> Result<MediaKind, PlayerError> {
        match (self, MediaKind::from_mime(mime)) {
            (_, Some(MediaKind::Audio)) => Ok(MediaKind::Audio),
            (IngestPolicy::AudioAndVideo, Some(MediaKind::Video)) => Ok(MediaKind::Video),
            _ => Err(PlayerError::UnsupportedMedia {
                name: file_name.to_owned(),
                mime: mime.to_owned(),
            }),
        }
    }
}

/// A file handed over by the picker, before it becomes an entry.
#[derive(Debug)]
pub struct PickedFile<S> {
    pub file_name: String,
    pub mime_type: String,
    pub source: S,
}

/// Build entries for every acceptable file, in picker order.
///
/// Rejected files are dropped here, which releases their handles.
pub fn build_entries<S>(
    library: &mut Library<S>,
    files: impl IntoIterator<Item = PickedFile<S>>,
    policy: IngestPolicy,
) -> Vec<MediaEntry<S>> {
    let mut entries = Vec::new();
    for file in files {
        match policy.classify(&file.file_name, &file.mime_type) {
            Ok(kind) => {
                let name = display_name(&file.file_name).to_owned();
                entries.push(MediaEntry::new(library.new_id(), name, file.source, kind));
            }
            Err(e) => tracing::debug!(error = %e, "Skipping picked file"),
        }
    }
    entries
}
