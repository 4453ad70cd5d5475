// BlockingQueue cross-thread tests.
//
// Invariants exercised:
// - Every produced item is consumed exactly once.
// - Per-producer FIFO order is preserved.
// - The queue never holds more than its capacity.
use chained_collections::BlockingQueue;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn single_producer_single_consumer_preserves_order() {
    let q = Arc::new(BlockingQueue::new(4).unwrap());
    let producer = {
        let q = Arc::clone(&q);
        thread::spawn(move || {
            for i in 0..1_000 {
                q.enqueue(i);
                assert!(q.len() <= q.capacity());
            }
        })
    };
    let received: Vec<i32> = (0..1_000).map(|_| q.dequeue()).collect();
    producer.join().unwrap();
    assert_eq!(received, (0..1_000).collect::<Vec<_>>());
    assert!(q.is_empty());
}

#[test]
fn many_producers_many_consumers_deliver_everything_once() {
    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 250;
    let q = Arc::new(BlockingQueue::new(8).unwrap());

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    q.enqueue((p, i));
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..2)
        .map(|_| {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                let mut got = Vec::new();
                while let Some(item) = q.dequeue_timeout(Duration::from_millis(500)) {
                    got.push(item);
                }
                got
            })
        })
        .collect();

    for p in producers {
        p.join().unwrap();
    }
    let mut all: Vec<(usize, usize)> = Vec::new();
    for c in consumers {
        let got = c.join().unwrap();
        // Items from one producer arrive in the order it sent them.
        for p in 0..PRODUCERS {
            let seq: Vec<usize> = got.iter().filter(|(pp, _)| *pp == p).map(|(_, i)| *i).collect();
            assert!(seq.windows(2).all(|w| w[0] < w[1]));
        }
        all.extend(got);
    }
    all.sort();
    let expected: Vec<(usize, usize)> = (0..PRODUCERS)
        .flat_map(|p| (0..PER_PRODUCER).map(move |i| (p, i)))
        .collect();
    assert_eq!(all, expected);
}

#[test]
fn consumer_blocks_until_item_arrives() {
    let q = Arc::new(BlockingQueue::new(1).unwrap());
    let consumer = {
        let q = Arc::clone(&q);
        thread::spawn(move || q.dequeue())
    };
    thread::sleep(Duration::from_millis(20));
    q.enqueue("late");
    assert_eq!(consumer.join().unwrap(), "late");
}
