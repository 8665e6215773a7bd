use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Whether an entry plays as audio or video. Decided once, at ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Classify a declared MIME type by its top-level prefix.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let top = mime.split('/').next()?.trim();
        if top.eq_ignore_ascii_case("audio") {
            Some(MediaKind::Audio)
        } else if top.eq_ignore_ascii_case("video") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// Opaque entry identifier, stable for the lifetime of the entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    /// Draw a random 9 character base-36 id.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = (0..ID_LEN)
            .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MediaId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One playable item in the library.
///
/// The entry owns its source handle. Dropping the entry drops the handle,
/// which is where adapters release the underlying resource.
#[derive(Debug)]
pub struct MediaEntry<S> {
    pub id: MediaId,
    pub name: String,
    pub source: S,
    pub kind: MediaKind,
}

impl<S> MediaEntry<S> {
    pub fn new(id: MediaId, name: impl Into<String>, source: S, kind: MediaKind) -> Self {
        Self {
            id,
            name: name.into(),
            source,
            kind,
        }
    }
}

/// Strip the final extension from a file name: `"song.mp3"` becomes `"song"`.
pub fn display_name(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => file_name,
    }
}
