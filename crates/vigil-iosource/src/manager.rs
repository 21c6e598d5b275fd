//! The scheduler loop that drives registered I/O sources.

use futures::future::{FutureExt, select_all};
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::source::IoSource;

struct Registration {
    source: Arc<dyn IoSource>,
    /// Source does not keep the loop alive on its own.
    dont_count: bool,
}

/// Polls registered sources and runs the ones that are ready.
///
/// The manager never busy-waits: between rounds it sleeps until a source's
/// flare is fired or the shortest reported timeout elapses.
#[derive(Default)]
pub struct IoManager {
    sources: RwLock<Vec<Registration>>,
}

impl std::fmt::Debug for IoManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tags: Vec<String> = self
            .sources
            .read()
            .map(|s| s.iter().map(|r| r.source.tag().to_string()).collect())
            .unwrap_or_default();
        f.debug_struct("IoManager").field("sources", &tags).finish()
    }
}

impl IoManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source.
    ///
    /// With `dont_count` set, the source is polled but does not keep
    /// [`run`](Self::run) going once every counted source has closed.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn register(&self, source: Arc<dyn IoSource>, dont_count: bool) {
        debug!(tag = %source.tag(), dont_count, "I/O source registered");
        self.sources
            .write()
            .expect("io source lock poisoned")
            .push(Registration { source, dont_count });
    }

    /// Number of open sources that keep the loop alive.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn size(&self) -> usize {
        self.sources
            .read()
            .expect("io source lock poisoned")
            .iter()
            .filter(|r| !r.dont_count && r.source.is_open())
            .count()
    }

    /// Number of registered sources, counted or not.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.sources.read().expect("io source lock poisoned").len()
    }

    fn snapshot(&self) -> Vec<Arc<dyn IoSource>> {
        self.sources
            .read()
            .expect("io source lock poisoned")
            .iter()
            .filter(|r| r.source.is_open())
            .map(|r| Arc::clone(&r.source))
            .collect()
    }

    /// Wait for at least one source to become ready and process every ready one.
    ///
    /// Returns the number of sources processed. Returns 0 right away when no
    /// open source has a flare or a timeout, since nothing could wake the loop.
    pub async fn run_once(&self) -> usize {
        let sources = self.snapshot();
        let started = Instant::now();

        let timeouts: Vec<Option<Duration>> = sources.iter().map(|s| s.next_timeout()).collect();
        let shortest = timeouts.iter().flatten().min().copied();

        let mut ready = ready_sources(&sources, &timeouts, Duration::ZERO);
        if ready.is_empty() {
            let flares: Vec<_> = sources
                .iter()
                .filter_map(|s| s.flare())
                .map(|f| f.fired().boxed())
                .collect();

            if flares.is_empty() && shortest.is_none() {
                trace!("no pollable sources");
                return 0;
            }

            let wait_flares = async move {
                if flares.is_empty() {
                    std::future::pending::<()>().await;
                } else {
                    let _ = select_all(flares).await;
                }
            };
            let wait_timeout = async move {
                match shortest {
                    Some(d) => tokio::time::sleep(d).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                () = wait_flares => {},
                () = wait_timeout => {},
            }

            ready = ready_sources(&sources, &timeouts, started.elapsed());
        }

        for source in &ready {
            trace!(tag = %source.tag(), "processing I/O source");
            source.process();
        }
        ready.len()
    }

    /// Run rounds until `shutdown` resolves or no counted source is open.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            if self.size() == 0 {
                debug!("no counted I/O sources left, loop exiting");
                break;
            }
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    debug!("I/O loop received shutdown signal");
                    break;
                }
                processed = self.run_once() => {
                    if processed == 0 && !self.has_waitable() {
                        debug!("nothing left to wait on, loop exiting");
                        break;
                    }
                }
            }
        }
    }

    fn has_waitable(&self) -> bool {
        self.snapshot()
            .iter()
            .any(|s| s.flare().is_some() || s.next_timeout().is_some())
    }
}

fn ready_sources(
    sources: &[Arc<dyn IoSource>],
    timeouts: &[Option<Duration>],
    elapsed: Duration,
) -> Vec<Arc<dyn IoSource>> {
    sources
        .iter()
        .zip(timeouts)
        .filter(|(source, timeout)| {
            source.flare().is_some_and(crate::Flare::is_armed)
                || timeout.is_some_and(|t| t <= elapsed)
        })
        .map(|(source, _)| Arc::clone(source))
        .collect()
}
