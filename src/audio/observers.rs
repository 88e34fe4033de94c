use std::sync::mpsc::{self, Receiver, Sender};

use super::types::PlaybackEvent;

/// Fan-out of playback events to any number of subscribers.
///
/// Subscribers whose receiver was dropped are forgotten on the next publish.
#[derive(Debug, Default)]
pub struct Observers {
    subscribers: Vec<Sender<PlaybackEvent>>,
}

impl Observers {
    pub fn subscribe(&mut self) -> Receiver<PlaybackEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, event: PlaybackEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
