// event_queue.rs — Thread-safe queue of normalized events
//
// Feeds the scripted platform. A replay or test thread pushes events through
// a cloned sender while the event thread drains them, optionally blocking
// with a timeout the way a real platform waits for input.

use std::time::Duration;

use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};

use crate::event::NormalizedEvent;

/// Default queue capacity, comfortably above one frame of input bursts.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Bounded queue of events between a producer and the event thread.
pub struct EventQueue {
    sender: Sender<NormalizedEvent>,
    receiver: Receiver<NormalizedEvent>,
}

impl EventQueue {
    /// Create a new bounded queue. When full, new events are dropped.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Get a clone of the sender handle (for a producer thread).
    pub fn sender(&self) -> EventQueueSender {
        EventQueueSender {
            sender: self.sender.clone(),
        }
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&self) -> Option<NormalizedEvent> {
        self.receiver.try_recv().ok()
    }

    /// Receive an event, blocking for at most `timeout`.
    ///
    /// Returns `None` on timeout or if every sender is gone and the queue is empty.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<NormalizedEvent> {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

/// Sender handle for the event queue.
#[derive(Clone)]
pub struct EventQueueSender {
    sender: Sender<NormalizedEvent>,
}

impl EventQueueSender {
    /// Try to send an event without blocking.
    ///
    /// Returns `true` if queued, `false` if the queue is full or closed.
    pub fn try_send(&self, event: NormalizedEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dvl_common::keys::{K_A, K_ESCAPE};

    #[test]
    fn test_queue_basic_operations() {
        let queue = EventQueue::new(10);
        let sender = queue.sender();

        assert!(queue.is_empty());
        assert!(sender.try_send(NormalizedEvent::key_down(K_A)));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.try_recv(), Some(NormalizedEvent::key_down(K_A)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_full_drops_events() {
        let queue = EventQueue::new(1);
        let sender = queue.sender();
        assert!(sender.try_send(NormalizedEvent::Quit));
        assert!(!sender.try_send(NormalizedEvent::key_down(K_A)));
        assert_eq!(queue.try_recv(), Some(NormalizedEvent::Quit));
    }

    #[test]
    fn test_recv_timeout_empty() {
        let queue = EventQueue::new(4);
        assert_eq!(queue.recv_timeout(Duration::from_millis(1)), None);
    }

    #[test]
    fn test_sender_from_other_thread() {
        let queue = EventQueue::new(4);
        let sender = queue.sender();
        let handle = std::thread::spawn(move || sender.try_send(NormalizedEvent::key_down(K_ESCAPE)));
        assert!(handle.join().unwrap());
        assert_eq!(
            queue.recv_timeout(Duration::from_secs(1)),
            Some(NormalizedEvent::key_down(K_ESCAPE))
        );
    }
}
