//! Helpers to navigate the playback queue.
//!
//! The queue is an ordered slice of tracks; the current track is located by
//! identifier, so a track missing from the queue has no neighbours.

use crate::library::Track;

pub(crate) fn position_of(queue: &[Track], track: &Track) -> Option<usize> {
    queue.iter().position(|t| t == track)
}

/// Track following `current`, or `None` when `current` is last or absent.
pub(crate) fn next_after<'a>(queue: &'a [Track], current: &Track) -> Option<&'a Track> {
    let pos = position_of(queue, current)?;
    queue.get(pos + 1)
}

/// Track preceding `current`, or `None` when `current` is first or absent.
pub(crate) fn previous_before<'a>(queue: &'a [Track], current: &Track) -> Option<&'a Track> {
    let pos = position_of(queue, current)?;
    pos.checked_sub(1).and_then(|p| queue.get(p))
}

/// Whether two queues list the same tracks in the same order.
pub(crate) fn same_order(a: &[Track], b: &[Track]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}
