//! Track library: the model, directory scanning and TOML catalogs.
//!
//! The library only produces `Track` values; playback never reaches back
//! into it.

mod catalog;
mod display;
mod model;
mod scan;

use std::path::Path;

pub use catalog::{CatalogError, load_catalog};
pub use display::display_from_fields;
pub use model::{Track, TrackId};
pub use scan::scan;

use crate::config::LibrarySettings;

/// Load tracks from `location`: a `.toml` file is read as a catalog,
/// anything else is scanned as a directory.
pub fn load_library(location: &Path, settings: &LibrarySettings) -> Result<Vec<Track>, CatalogError> {
    let is_catalog = location
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    if is_catalog {
        load_catalog(location)
    } else {
        Ok(scan(location, settings))
    }
}
