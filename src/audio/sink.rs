//! Utilities for creating `rodio` sinks from source locators.
//!
//! The helpers here encapsulate resolving a locator, opening/decoding the
//! file and preparing a paused `Sink` at the start of the source.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::*;
use rodio::mixer::Mixer;
use rodio::{Decoder, Sink, Source};

use super::engine::EngineError;

/// Map a locator to a local path. Only plain paths and `file://` URLs are playable.
pub(super) fn resolve_locator(locator: &str) -> Result<PathBuf, EngineError> {
    if let Some(path) = locator.strip_prefix("file://") {
        return Ok(PathBuf::from(path));
    }
    if locator.contains("://") {
        return Err(EngineError::UnsupportedLocator(locator.to_string()));
    }
    Ok(PathBuf::from(locator))
}

/// Create a paused `Sink` for `path`, along with the source length when it can be determined.
pub(super) fn create_sink(mixer: &Mixer, path: &Path) -> Result<(Sink, Option<Duration>), EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    // Many decoders cannot tell the length up front; the tag reader usually can.
    let duration = source.total_duration().or_else(|| probe_duration(path));

    let sink = Sink::connect_new(mixer);
    sink.append(source);
    sink.pause();
    Ok((sink, duration))
}

fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}
