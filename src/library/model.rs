use std::fmt;

use serde::Deserialize;

/// Stable identifier of a track within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single playable audio item.
///
/// Two tracks are equal when their identifiers are equal, whatever the
/// remaining metadata says.
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    #[serde(default = "unknown_artist")]
    pub artist: String,
    /// Locator of the cover art image, if any.
    #[serde(default)]
    pub cover: Option<String>,
    /// Locator of the audio source (a local path or a `file://` URL).
    pub source: String,
    #[serde(default)]
    pub genre: Option<String>,
}

pub(crate) fn unknown_artist() -> String {
    "Unknown Artist".to_string()
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Track {
    /// `Artist - Title`, or just the title when the artist is blank.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", artist, self.title)
        }
    }
}
