use std::path::PathBuf;

use crate::config::LibrarySettings;

/// Pick where the library comes from: the command-line argument, then the
/// configured catalog, then the working directory.
pub fn library_location(arg: Option<String>, settings: &LibrarySettings) -> PathBuf {
    if let Some(arg) = arg {
        return PathBuf::from(arg);
    }
    if let Some(catalog) = &settings.catalog {
        return catalog.clone();
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("Music"))
}
