//! LIFO stack layered on `DoublyLinkedList`; the list head is the top.

use crate::linked_list::DoublyLinkedList;

#[derive(Debug, Clone)]
pub struct Stack<T> {
    list: DoublyLinkedList<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self {
            list: DoublyLinkedList::new(),
        }
    }

    /// Wraps an existing list; its head becomes the top of the stack.
    pub fn from_list(list: DoublyLinkedList<T>) -> Self {
        Self { list }
    }

    pub fn push(&mut self, item: T) {
        self.list.add_first(item);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.list.remove_first()
    }

    pub fn peek(&self) -> Option<&T> {
        self.list.head()
    }

    /// Distance from the top (0 = top) of the first item equal to `item`.
    pub fn search(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.list.index_of(item)
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    /// Empties the stack, returning its items top first.
    pub fn drain_to_vec(&mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.list.len());
        while let Some(item) = self.list.remove_first() {
            out.push(item);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}
