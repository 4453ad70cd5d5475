//! FIFO queue layered on `DoublyLinkedList`.
//!
//! Items enter at the head and leave from the tail.

use crate::linked_list::DoublyLinkedList;

#[derive(Debug, Clone)]
pub struct Queue<T> {
    list: DoublyLinkedList<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            list: DoublyLinkedList::new(),
        }
    }

    /// Wraps an existing list; its tail is the first item dequeued.
    pub fn from_list(list: DoublyLinkedList<T>) -> Self {
        Self { list }
    }

    pub fn enqueue(&mut self, item: T) {
        self.list.add_first(item);
    }

    pub fn dequeue(&mut self) -> Option<T> {
        self.list.remove_last()
    }

    /// The item the next `dequeue` would return.
    pub fn peek(&self) -> Option<&T> {
        self.list.tail()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_in_first_out() {
        let mut q = Queue::new();
        q.enqueue(1);
        q.enqueue(2);
        q.enqueue(3);
        assert_eq!(q.len(), 3);
        assert_eq!(q.peek(), Some(&1));
        assert_eq!(q.dequeue(), Some(1));
        assert_eq!(q.dequeue(), Some(2));
        q.enqueue(4);
        assert_eq!(q.dequeue(), Some(3));
        assert_eq!(q.dequeue(), Some(4));
        assert_eq!(q.dequeue(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn from_list_dequeues_from_tail() {
        let list: DoublyLinkedList<_> = ["a", "b", "c"].into_iter().collect();
        let mut q = Queue::from_list(list);
        assert_eq!(q.dequeue(), Some("c"));
        q.enqueue("d");
        assert_eq!(q.dequeue(), Some("b"));
        assert_eq!(q.dequeue(), Some("a"));
        assert_eq!(q.dequeue(), Some("d"));
    }
}
