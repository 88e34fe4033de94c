use std::path::Path;

use crate::config::TrackDisplayField;

use super::model::Track;

/// Build a listing line for a track according to the provided `fields` and separator.
///
/// Blank fields are skipped; when nothing was produced the title is used.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Display => {
                let d = track.display();
                if !d.trim().is_empty() {
                    parts.push(d);
                }
            }
            TrackDisplayField::Title => push_trimmed(&mut parts, Some(&track.title)),
            TrackDisplayField::Artist => push_trimmed(&mut parts, Some(&track.artist)),
            TrackDisplayField::Genre => push_trimmed(&mut parts, track.genre.as_deref()),
            TrackDisplayField::Id => push_trimmed(&mut parts, Some(track.id.as_str())),
            TrackDisplayField::Filename => {
                let stem = Path::new(&track.source)
                    .file_stem()
                    .and_then(|s| s.to_str());
                push_trimmed(&mut parts, stem);
            }
            TrackDisplayField::Source => parts.push(track.source.clone()),
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}

fn push_trimmed(parts: &mut Vec<String>, value: Option<&str>) {
    if let Some(v) = value.map(str::trim).filter(|s| !s.is_empty()) {
        parts.push(v.to_string());
    }
}
