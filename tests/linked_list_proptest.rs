// DoublyLinkedList, Queue and Stack property tests.
//
// Model: std::collections::VecDeque.
// Invariant after every step: contents, length, and both ends agree with
// the model; positional errors occur exactly when the index is out of range.
use chained_collections::{DoublyLinkedList, Error, Queue, Stack};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Clone, Debug)]
enum ListOp {
    AddFirst(i32),
    AddLast(i32),
    Add(usize, i32),
    RemoveFirst,
    RemoveLast,
    Remove(usize),
    Get(usize),
    IndexOf(i32),
    Clear,
}

fn arb_list_op() -> impl Strategy<Value = ListOp> {
    prop_oneof![
        3 => (-20i32..20).prop_map(ListOp::AddFirst),
        3 => (-20i32..20).prop_map(ListOp::AddLast),
        2 => (0usize..24, -20i32..20).prop_map(|(i, v)| ListOp::Add(i, v)),
        1 => Just(ListOp::RemoveFirst),
        1 => Just(ListOp::RemoveLast),
        2 => (0usize..24).prop_map(ListOp::Remove),
        1 => (0usize..24).prop_map(ListOp::Get),
        1 => (-20i32..20).prop_map(ListOp::IndexOf),
        1 => Just(ListOp::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_list_matches_vecdeque(ops in proptest::collection::vec(arb_list_op(), 1..120)) {
        let mut sut: DoublyLinkedList<i32> = DoublyLinkedList::new();
        let mut model: VecDeque<i32> = VecDeque::new();

        for op in ops {
            match op {
                ListOp::AddFirst(v) => { sut.add_first(v); model.push_front(v); }
                ListOp::AddLast(v) => { sut.add_last(v); model.push_back(v); }
                ListOp::Add(i, v) => {
                    let len = model.len();
                    match sut.add(i, v) {
                        Ok(()) => { prop_assert!(i <= len); model.insert(i, v); }
                        Err(e) => {
                            prop_assert!(i > len);
                            prop_assert_eq!(e, Error::IndexOutOfBounds { index: i, len });
                        }
                    }
                }
                ListOp::RemoveFirst => prop_assert_eq!(sut.remove_first(), model.pop_front()),
                ListOp::RemoveLast => prop_assert_eq!(sut.remove_last(), model.pop_back()),
                ListOp::Remove(i) => {
                    let expected = model.remove(i);
                    prop_assert_eq!(sut.remove(i).ok(), expected);
                }
                ListOp::Get(i) => prop_assert_eq!(sut.get(i), model.get(i)),
                ListOp::IndexOf(v) => {
                    prop_assert_eq!(sut.index_of(&v), model.iter().position(|x| *x == v));
                }
                ListOp::Clear => { sut.clear(); model.clear(); }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.head(), model.front());
            prop_assert_eq!(sut.tail(), model.back());
            let forward: Vec<i32> = sut.iter().copied().collect();
            let expected: Vec<i32> = model.iter().copied().collect();
            prop_assert_eq!(&forward, &expected);
            let backward: Vec<i32> = sut.iter().rev().copied().collect();
            let expected_rev: Vec<i32> = model.iter().rev().copied().collect();
            prop_assert_eq!(backward, expected_rev);
        }
    }

    // Queue is FIFO and Stack is LIFO for any interleaving of pushes and pops.
    #[test]
    fn prop_queue_and_stack_order(ops in proptest::collection::vec(proptest::option::of(any::<i16>()), 1..100)) {
        let mut q = Queue::new();
        let mut s = Stack::new();
        let mut q_model: VecDeque<i16> = VecDeque::new();
        let mut s_model: Vec<i16> = Vec::new();

        for op in ops {
            match op {
                Some(v) => {
                    q.enqueue(v);
                    s.push(v);
                    q_model.push_back(v);
                    s_model.push(v);
                }
                None => {
                    prop_assert_eq!(q.dequeue(), q_model.pop_front());
                    prop_assert_eq!(s.pop(), s_model.pop());
                }
            }
            prop_assert_eq!(q.peek(), q_model.front());
            prop_assert_eq!(s.peek(), s_model.last());
            prop_assert_eq!(q.len(), q_model.len());
            prop_assert_eq!(s.len(), s_model.len());
        }
    }
}
