//! Injectable event sources
//!
//! Adapters never listen to the platform directly. The host (or a test)
//! pushes events into an `EventQueue`; the session drains it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Something that yields pending input events
pub trait EventSource<E> {
    /// Next pending event, oldest first
    fn poll_event(&mut self) -> Option<E>;
}

/// Shared FIFO of events. Clones push into and drain the same queue, so the
/// host keeps one handle for its listener and hands another to the session.
#[derive(Debug)]
pub struct EventQueue<E> {
    queue: Rc<RefCell<VecDeque<E>>>,
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn push(&self, event: E) {
        self.queue.borrow_mut().push_back(event);
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventQueue<E> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

impl<E> EventSource<E> for EventQueue<E> {
    fn poll_event(&mut self) -> Option<E> {
        self.queue.borrow_mut().pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_queue() {
        let sender = EventQueue::new();
        let mut receiver = sender.clone();
        sender.push(1);
        sender.push(2);
        assert_eq!(receiver.len(), 2);
        assert_eq!(receiver.poll_event(), Some(1));
        assert_eq!(receiver.poll_event(), Some(2));
        assert_eq!(receiver.poll_event(), None);
        assert!(sender.is_empty());
    }
}
