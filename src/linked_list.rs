//! DoublyLinkedList: arena-backed list with O(1) work at both ends.
//!
//! Nodes live in a `SlotMap` and refer to their neighbours by arena key,
//! so splicing never needs raw pointers or `Rc<RefCell<_>>` cycles.

use crate::error::Error;
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

#[derive(Clone)]
pub struct DoublyLinkedList<T> {
    nodes: SlotMap<DefaultKey, Node<T>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl<T> DoublyLinkedList<T> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First element, if any.
    pub fn head(&self) -> Option<&T> {
        self.head.and_then(|k| self.nodes.get(k)).map(|n| &n.value)
    }

    /// Last element, if any.
    pub fn tail(&self) -> Option<&T> {
        self.tail.and_then(|k| self.nodes.get(k)).map(|n| &n.value)
    }

    pub fn add_first(&mut self, value: T) {
        let old_head = self.head;
        let slot = self.nodes.insert(Node {
            value,
            prev: None,
            next: old_head,
        });
        match old_head.and_then(|h| self.nodes.get_mut(h)) {
            Some(h) => h.prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    pub fn add_last(&mut self, value: T) {
        let old_tail = self.tail;
        let slot = self.nodes.insert(Node {
            value,
            prev: old_tail,
            next: None,
        });
        match old_tail.and_then(|t| self.nodes.get_mut(t)) {
            Some(t) => t.next = Some(slot),
            None => self.head = Some(slot),
        }
        self.tail = Some(slot);
    }

    /// Inserts `value` so that it ends up at position `index` (`0..=len`).
    pub fn add(&mut self, index: usize, value: T) -> Result<(), Error> {
        let len = self.len();
        if index > len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        if index == 0 {
            self.add_first(value);
            return Ok(());
        }
        if index == len {
            self.add_last(value);
            return Ok(());
        }

        let at = self
            .node_at(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        let prev = self.nodes.get(at).and_then(|n| n.prev);
        let slot = self.nodes.insert(Node {
            value,
            prev,
            next: Some(at),
        });
        if let Some(p) = prev.and_then(|p| self.nodes.get_mut(p)) {
            p.next = Some(slot);
        }
        if let Some(n) = self.nodes.get_mut(at) {
            n.prev = Some(slot);
        }
        Ok(())
    }

    /// Appends every item in order.
    pub fn add_all<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        for item in items {
            self.add_last(item);
        }
    }

    /// Inserts the items consecutively, the first one landing at `index`.
    ///
    /// The index is checked once up front; nothing is inserted on error.
    pub fn add_all_at<I>(&mut self, index: usize, items: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len();
        if index > len {
            return Err(Error::IndexOutOfBounds { index, len });
        }
        for (offset, item) in items.into_iter().enumerate() {
            self.add(index + offset, item)?;
        }
        Ok(())
    }

    pub fn remove_first(&mut self) -> Option<T> {
        let head = self.head?;
        self.detach(head)
    }

    pub fn remove_last(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.detach(tail)
    }

    pub fn remove(&mut self, index: usize) -> Result<T, Error> {
        let len = self.len();
        self.node_at(index)
            .and_then(|slot| self.detach(slot))
            .ok_or(Error::IndexOutOfBounds { index, len })
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.node_at(index)
            .and_then(|k| self.nodes.get(k))
            .map(|n| &n.value)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.node_at(index)
            .and_then(|k| self.nodes.get_mut(k))
            .map(|n| &mut n.value)
    }

    /// Position of the first element equal to `value`.
    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|v| v == value)
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(value).is_some()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            front: self.head,
            back: self.tail,
            remaining: self.len(),
        }
    }

    /// Diagnostic dump: one element per line, or `List is empty`.
    pub fn display(&self) -> ListDump<'_, T> {
        ListDump { list: self }
    }

    /// Walks from whichever end is nearer to `index`.
    fn node_at(&self, index: usize) -> Option<DefaultKey> {
        let len = self.len();
        if index >= len {
            return None;
        }
        if index <= len / 2 {
            let mut cursor = self.head;
            for _ in 0..index {
                cursor = cursor.and_then(|k| self.nodes.get(k)).and_then(|n| n.next);
            }
            cursor
        } else {
            let mut cursor = self.tail;
            for _ in index..len - 1 {
                cursor = cursor.and_then(|k| self.nodes.get(k)).and_then(|n| n.prev);
            }
            cursor
        }
    }

    fn detach(&mut self, slot: DefaultKey) -> Option<T> {
        let node = self.nodes.remove(slot)?;
        match node.prev.and_then(|p| self.nodes.get_mut(p)) {
            Some(p) => p.next = node.next,
            None => self.head = node.next,
        }
        match node.next.and_then(|n| self.nodes.get_mut(n)) {
            Some(n) => n.prev = node.prev,
            None => self.tail = node.prev,
        }
        Some(node.value)
    }
}

impl<T> Default for DoublyLinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over a `DoublyLinkedList`.
pub struct Iter<'a, T> {
    nodes: &'a SlotMap<DefaultKey, Node<T>>,
    front: Option<DefaultKey>,
    back: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.get(self.front?)?;
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.get(self.back?)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// Owning iterator, front to back.
pub struct IntoIter<T>(DoublyLinkedList<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.remove_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.0.remove_last()
    }
}

impl<T> IntoIterator for DoublyLinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter(self)
    }
}

impl<'a, T> IntoIterator for &'a DoublyLinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> Extend<T> for DoublyLinkedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<T> FromIterator<T> for DoublyLinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.add_all(iter);
        list
    }
}

impl<T: fmt::Debug> fmt::Debug for DoublyLinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Diagnostic view returned by `DoublyLinkedList::display`.
pub struct ListDump<'a, T> {
    list: &'a DoublyLinkedList<T>,
}

impl<T: fmt::Display> fmt::Display for ListDump<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.list.is_empty() {
            return writeln!(f, "List is empty");
        }
        for value in self.list.iter() {
            writeln!(f, "{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(items: &[i32]) -> DoublyLinkedList<i32> {
        items.iter().copied().collect()
    }

    #[test]
    fn add_first_and_last_order() {
        let mut l = DoublyLinkedList::new();
        l.add_last(2);
        l.add_first(1);
        l.add_last(3);
        assert_eq!(l.to_vec(), vec![1, 2, 3]);
        assert_eq!(l.head(), Some(&1));
        assert_eq!(l.tail(), Some(&3));
        assert_eq!(l.len(), 3);
    }

    #[test]
    fn empty_list_peeks_and_pops_are_none() {
        let mut l: DoublyLinkedList<i32> = DoublyLinkedList::new();
        assert!(l.is_empty());
        assert_eq!(l.head(), None);
        assert_eq!(l.tail(), None);
        assert_eq!(l.remove_first(), None);
        assert_eq!(l.remove_last(), None);
        assert_eq!(l.get(0), None);
    }

    #[test]
    fn add_at_index_splices_in_the_middle() {
        let mut l = list_of(&[0, 1, 3, 4]);
        l.add(2, 2).unwrap();
        assert_eq!(l.to_vec(), vec![0, 1, 2, 3, 4]);
        l.add(0, -1).unwrap();
        l.add(6, 5).unwrap();
        assert_eq!(l.to_vec(), vec![-1, 0, 1, 2, 3, 4, 5]);
        assert_eq!(
            l.add(9, 9),
            Err(Error::IndexOutOfBounds { index: 9, len: 7 })
        );
    }

    #[test]
    fn add_all_at_inserts_consecutively() {
        let mut l = list_of(&[1, 5]);
        l.add_all_at(1, [2, 3, 4]).unwrap();
        assert_eq!(l.to_vec(), vec![1, 2, 3, 4, 5]);
        assert!(l.add_all_at(10, [0]).is_err());
        assert_eq!(l.len(), 5);
    }

    #[test]
    fn remove_by_index_relinks_neighbours() {
        let mut l = list_of(&[10, 20, 30, 40, 50]);
        assert_eq!(l.remove(2), Ok(30));
        assert_eq!(l.remove(0), Ok(10));
        assert_eq!(l.remove(2), Ok(50));
        assert_eq!(l.to_vec(), vec![20, 40]);
        assert_eq!(l.iter().rev().copied().collect::<Vec<_>>(), vec![40, 20]);
        assert_eq!(
            l.remove(2),
            Err(Error::IndexOutOfBounds { index: 2, len: 2 })
        );
    }

    #[test]
    fn single_element_removal_empties_both_ends() {
        let mut l = list_of(&[7]);
        assert_eq!(l.remove_last(), Some(7));
        assert!(l.head().is_none() && l.tail().is_none());
        l.add_last(8);
        assert_eq!(l.remove_first(), Some(8));
        assert!(l.head().is_none() && l.tail().is_none());
    }

    /// Invariant: `get` agrees with iteration order from either half of the list.
    #[test]
    fn get_walks_from_nearer_end() {
        let l = list_of(&[0, 1, 2, 3, 4, 5, 6]);
        for i in 0..7 {
            assert_eq!(l.get(i), Some(&(i as i32)));
        }
        assert_eq!(l.get(7), None);
    }

    #[test]
    fn index_of_and_contains() {
        let l = list_of(&[4, 5, 4]);
        assert_eq!(l.index_of(&4), Some(0));
        assert_eq!(l.index_of(&5), Some(1));
        assert_eq!(l.index_of(&6), None);
        assert!(l.contains(&5));
        assert!(!l.contains(&6));
    }

    #[test]
    fn clear_then_reuse() {
        let mut l = list_of(&[1, 2, 3]);
        l.clear();
        assert!(l.is_empty());
        l.add_first(9);
        assert_eq!(l.to_vec(), vec![9]);
    }

    #[test]
    fn double_ended_iteration_meets_in_middle() {
        let l = list_of(&[1, 2, 3, 4]);
        let mut it = l.iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.next(), Some(&1));
        assert_eq!(it.next_back(), Some(&4));
        assert_eq!(it.next(), Some(&2));
        assert_eq!(it.next_back(), Some(&3));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }

    #[test]
    fn into_iter_consumes_front_to_back() {
        let l = list_of(&[1, 2, 3]);
        let v: Vec<i32> = l.into_iter().collect();
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn display_lists_each_element() {
        let l = list_of(&[1, 2]);
        assert_eq!(l.display().to_string(), "1\n2\n");
        let empty: DoublyLinkedList<i32> = DoublyLinkedList::new();
        assert_eq!(empty.display().to_string(), "List is empty\n");
        assert_eq!(format!("{l:?}"), "[1, 2]");
    }
}
