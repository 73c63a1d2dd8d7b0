//! Message delivery.

use crate::message::SyncMessage;

/// Receives the messages of one report call, errors first.
pub trait MessageSink {
    fn deliver(&mut self, message: SyncMessage);
}

/// Keeps every delivered message in order.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub messages: Vec<SyncMessage>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageSink for CollectingSink {
    fn deliver(&mut self, message: SyncMessage) {
        self.messages.push(message);
    }
}

impl MessageSink for Vec<SyncMessage> {
    fn deliver(&mut self, message: SyncMessage) {
        self.push(message);
    }
}
