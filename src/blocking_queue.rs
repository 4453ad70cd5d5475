//! BlockingQueue: bounded FIFO shared between threads.
//!
//! A `Mutex<Queue<T>>` plus one condition variable per direction:
//! producers wait on `not_full`, consumers on `not_empty`. Every
//! operation leaves the inner queue consistent before releasing the lock,
//! so a poisoned lock is recovered rather than propagated.

use crate::error::Error;
use crate::queue::Queue;
use log::trace;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

pub struct BlockingQueue<T> {
    queue: Mutex<Queue<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl<T> BlockingQueue<T> {
    /// A queue holding at most `capacity` items. Zero is rejected, since
    /// every `enqueue` would block forever.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::InvalidArgument("blocking queue capacity must be non-zero"));
        }
        Ok(Self {
            queue: Mutex::new(Queue::new()),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Queue<T>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `item`, blocking while the queue is full.
    pub fn enqueue(&self, item: T) {
        let mut queue = self.lock();
        while queue.len() >= self.capacity {
            trace!("blocking queue full at {} items; producer waiting", self.capacity);
            queue = self
                .not_full
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
        queue.enqueue(item);
        drop(queue);
        self.not_empty.notify_one();
    }

    /// Removes the oldest item, blocking while the queue is empty.
    pub fn dequeue(&self) -> T {
        let mut queue = self.lock();
        loop {
            if let Some(item) = queue.dequeue() {
                drop(queue);
                self.not_full.notify_one();
                return item;
            }
            trace!("blocking queue empty; consumer waiting");
            queue = self
                .not_empty
                .wait(queue)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Adds `item` without blocking, handing it back if the queue is full.
    pub fn try_enqueue(&self, item: T) -> Result<(), T> {
        let mut queue = self.lock();
        if queue.len() >= self.capacity {
            return Err(item);
        }
        queue.enqueue(item);
        drop(queue);
        self.not_empty.notify_one();
        Ok(())
    }

    pub fn try_dequeue(&self) -> Option<T> {
        let item = self.lock().dequeue()?;
        self.not_full.notify_one();
        Some(item)
    }

    /// Like `dequeue`, but gives up after `timeout`.
    pub fn dequeue_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut queue = self.lock();
        loop {
            if let Some(item) = queue.dequeue() {
                drop(queue);
                self.not_full.notify_one();
                return Some(item);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _) = self
                .not_empty
                .wait_timeout(queue, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            queue = guard;
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
