//! Process-wide single-flight gate for the quiz-generation call.
//!
//! At most one generation request may be in flight at a time; concurrent
//! callers subscribe to the in-flight result instead of issuing a duplicate
//! upstream call. The slot is released whether the work succeeds, fails, or
//! panics, so the gate can never lock out future callers.

use std::{future::Future, sync::Arc};

use tokio::sync::{Mutex, broadcast};

/// Single-slot in-flight request cache.
pub struct SingleFlight<T> {
    slot: Mutex<Option<broadcast::Sender<T>>>,
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + 'static,
{
    /// Create an empty gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `make`'s future under the gate, or wait for the in-flight call.
    ///
    /// The leader's work is spawned on the runtime so it completes (and
    /// publishes its result to every waiter) even if the leading caller is
    /// cancelled mid-request.
    pub async fn run<F, Fut>(self: &Arc<Self>, make: F) -> T
    where
        F: Fn() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        loop {
            let mut rx = {
                let mut slot = self.slot.lock().await;
                match slot.as_ref() {
                    Some(tx) => tx.subscribe(),
                    None => {
                        let (tx, rx) = broadcast::channel(1);
                        *slot = Some(tx);

                        let this = Arc::clone(self);
                        let work = tokio::spawn(make());
                        tokio::spawn(async move {
                            let outcome = work.await;
                            // Free the slot before publishing so late callers
                            // start a fresh flight instead of waiting forever.
                            let sender = this.slot.lock().await.take();
                            if let (Some(sender), Ok(value)) = (sender, outcome) {
                                let _ = sender.send(value);
                            }
                        });

                        rx
                    }
                }
            };

            match rx.recv().await {
                Ok(value) => return value,
                // The flight ended without publishing (worker panic); retry.
                Err(_) => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };
    use tokio::time::sleep;

    #[tokio::test]
    async fn concurrent_callers_share_one_flight() {
        let gate = Arc::new(SingleFlight::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let work = {
            let calls = Arc::clone(&calls);
            move || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    sleep(Duration::from_millis(50)).await;
                    42u32
                }
            }
        };

        let first = {
            let gate = Arc::clone(&gate);
            let work = work.clone();
            tokio::spawn(async move { gate.run(work).await })
        };
        let second = {
            let gate = Arc::clone(&gate);
            let work = work.clone();
            tokio::spawn(async move { gate.run(work).await })
        };

        let (first, second) = (first.await.unwrap(), second.await.unwrap());
        assert_eq!(first, 42);
        assert_eq!(second, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gate_is_released_after_completion() {
        let gate = Arc::new(SingleFlight::new());
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            let value = gate
                .run(move || {
                    let calls = Arc::clone(&calls);
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        7u32
                    }
                })
                .await;
            assert_eq!(value, 7);
        }

        // Sequential calls each get their own flight.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn panicking_worker_does_not_poison_the_gate() {
        let gate = Arc::new(SingleFlight::<u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        // The first flight panics; every retry afterwards succeeds, so all
        // callers eventually resolve and the slot is left empty.
        let value = gate
            .run({
                let calls = Arc::clone(&calls);
                move || {
                    let attempt = calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if attempt == 0 {
                            panic!("boom");
                        }
                        5u32
                    }
                }
            })
            .await;

        assert_eq!(value, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(gate.slot.lock().await.is_none());
    }
}
