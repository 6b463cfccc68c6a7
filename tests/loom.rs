#![cfg(loom)]

use solo::*;

use loom::sync::atomic::AtomicUsize;
use loom::sync::Arc;
use loom::thread;
use std::sync::atomic::Ordering;

struct CountDrops(Arc<AtomicUsize>);
impl CountDrops {
    pub fn new() -> Self {
        Self(Arc::new(AtomicUsize::new(0)))
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.0)
    }
}
impl Drop for CountDrops {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn released_on_receiving_thread() {
    loom::model(|| {
        let drops = CountDrops::new();
        let ndrops = drops.counter();

        let p = make_unique((42, drops));
        let t = thread::spawn(move || {
            assert_eq!(p.0, 42);
            drop(p);
        });

        t.join().unwrap();
        assert_eq!(ndrops.load(Ordering::SeqCst), 1);
    })
}

#[test]
fn handed_back_and_forth() {
    loom::model(|| {
        let drops = CountDrops::new();
        let ndrops = drops.counter();

        let (tx, rx) = loom::sync::mpsc::channel();
        let (back_tx, back_rx) = loom::sync::mpsc::channel();

        let t = thread::spawn(move || {
            let mut a: UniqueArray<u32> = rx.recv().unwrap();
            a[0] += 1;
            back_tx.send(a).unwrap();
        });

        let mut a = make_unique_array::<u32>(1);
        a[0] = 41;
        let p = make_unique(drops);
        tx.send(a).unwrap();

        let a = back_rx.recv().unwrap();
        t.join().unwrap();
        assert_eq!(a[0], 42);
        assert_eq!(ndrops.load(Ordering::SeqCst), 0);
        drop(p);
        assert_eq!(ndrops.load(Ordering::SeqCst), 1);
    })
}

#[test]
fn shared_reads_across_threads() {
    loom::model(|| {
        let p = Arc::new(make_unique(7u64));
        let p1 = Arc::clone(&p);
        let t = thread::spawn(move || **p1);
        let seen = **p;
        assert_eq!(t.join().unwrap(), seen);
    })
}
