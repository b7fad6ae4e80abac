use parking_lot::Mutex;
use serde::Serialize;

use crate::map::node::Direction;

/// An item link a sector could not resolve from its own bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PendingRequest {
    pub node_uid: u64,
    pub item_uid: u64,
    pub direction: Direction,
}

/// Receiver for item links that must be resolved outside the requesting sector
pub trait ItemRequester: Sync {
    fn request_item(&self, node_uid: u64, item_uid: u64, direction: Direction);
}

/// Thread-safe queue of deferred item requests
#[derive(Debug, Default)]
pub struct PendingQueue {
    requests: Mutex<Vec<PendingRequest>>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued request, leaving the queue empty
    pub fn drain(&self) -> Vec<PendingRequest> {
        std::mem::take(&mut *self.requests.lock())
    }

    /// Re-queue requests that are still unresolved
    pub fn extend(&self, requests: impl IntoIterator<Item = PendingRequest>) {
        self.requests.lock().extend(requests);
    }

    pub fn snapshot(&self) -> Vec<PendingRequest> {
        self.requests.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }
}

impl ItemRequester for PendingQueue {
    fn request_item(&self, node_uid: u64, item_uid: u64, direction: Direction) {
        self.requests.lock().push(PendingRequest {
            node_uid,
            item_uid,
            direction,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_and_drain() {
        let queue = PendingQueue::new();
        queue.request_item(1, 10, Direction::Forward);
        queue.request_item(2, 20, Direction::Backward);
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert!(queue.is_empty());
        assert_eq!(drained[1].direction, Direction::Backward);

        queue.extend(drained.into_iter().filter(|r| r.node_uid == 2));
        assert_eq!(queue.snapshot().len(), 1);
    }
}
