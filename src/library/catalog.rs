//! TOML track catalogs.
//!
//! A catalog lists tracks explicitly instead of scanning a directory:
//!
//! ```toml
//! [[tracks]]
//! id = "mithila-01"
//! title = "Sama Chakeva"
//! artist = "Sharda Sinha"
//! cover = "covers/sama.jpg"
//! source = "audio/sama.flac"
//! genre = "Folk"
//! ```
//!
//! Relative `source` and `cover` locators are resolved against the catalog's
//! directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::model::{Track, TrackId};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("duplicate track id `{0}` in catalog")]
    DuplicateId(TrackId),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tracks: Vec<Track>,
}

pub fn load_catalog(path: &Path) -> Result<Vec<Track>, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let file: CatalogFile = toml::from_str(&text).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let tracks = resolve_tracks(file.tracks, base)?;
    debug!(path = %path.display(), count = tracks.len(), "catalog loaded");
    Ok(tracks)
}

fn resolve_tracks(raw: Vec<Track>, base: &Path) -> Result<Vec<Track>, CatalogError> {
    let mut seen = HashSet::new();
    let mut tracks = Vec::with_capacity(raw.len());
    for mut track in raw {
        if !seen.insert(track.id.clone()) {
            return Err(CatalogError::DuplicateId(track.id));
        }
        track.source = resolve_locator(base, &track.source);
        track.cover = track.cover.map(|c| resolve_locator(base, &c));
        tracks.push(track);
    }
    Ok(tracks)
}

/// URLs and absolute paths are kept as-is; anything else is joined onto `base`.
fn resolve_locator(base: &Path, locator: &str) -> String {
    if locator.contains("://") || Path::new(locator).is_absolute() {
        return locator.to_string();
    }
    base.join(locator).display().to_string()
}
