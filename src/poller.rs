use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::spotify::{FetchOutcome, NowPlayingFetcher};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// One poll cycle
pub trait Fetch: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = FetchOutcome> + Send;
}

impl Fetch for NowPlayingFetcher {
    fn fetch(&self) -> impl Future<Output = FetchOutcome> + Send {
        self.fetch_now_playing()
    }
}

/// What happens when the timer fires while a slow cycle is still running
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Start another cycle anyway
    #[default]
    Allow,
    /// Skip the tick
    #[serde(rename = "skip", alias = "skip-while-in-flight")]
    SkipWhileInFlight,
}

/// Fixed period timer driving a [`Fetch`]
pub struct Poller<F> {
    fetcher: Arc<F>,
    period: Duration,
    overlap: OverlapPolicy,
}

impl<F: Fetch> Poller<F> {
    pub fn new(fetcher: F, period: Duration) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            period,
            overlap: OverlapPolicy::default(),
        }
    }

    pub fn overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    /// Start polling. The first cycle runs immediately, then one per period.
    ///
    /// Outcomes are sent in completion order. Polling stops when the handle is
    /// shut down or dropped, or when the receiver is closed.
    pub fn spawn(self, sender: UnboundedSender<FetchOutcome>) -> PollHandle {
        let cancel = CancellationToken::new();
        let refresh = Arc::new(Notify::new());

        let task = tokio::spawn(run(self, sender, cancel.clone(), refresh.clone()));
        PollHandle {
            cancel,
            refresh,
            task,
        }
    }
}

async fn run<F: Fetch>(
    poller: Poller<F>,
    sender: UnboundedSender<FetchOutcome>,
    cancel: CancellationToken,
    refresh: Arc<Notify>,
) {
    let mut interval = tokio::time::interval(poller.period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let in_flight = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = sender.closed() => break,
            _ = interval.tick() => {}
            _ = refresh.notified() => {}
        }

        if poller.overlap == OverlapPolicy::SkipWhileInFlight
            && in_flight.load(Ordering::Acquire) > 0
        {
            log::debug!("previous poll still in flight, skipping tick");
            continue;
        }

        in_flight.fetch_add(1, Ordering::AcqRel);
        let fetcher = poller.fetcher.clone();
        let sender = sender.clone();
        let cancel = cancel.clone();
        let in_flight = in_flight.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => log::debug!("poll dropped on shutdown"),
                outcome = fetcher.fetch() => {
                    // Receiver may already be gone
                    let _ = sender.send(outcome);
                }
            }
            in_flight.fetch_sub(1, Ordering::AcqRel);
        });
    }

    log::debug!("poller stopped");
}

pub struct PollHandle {
    cancel: CancellationToken,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Run an extra cycle now without waiting for the timer
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the timer and drop any cycle still in flight
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Err(err) = (&mut self.task).await {
            log::error!("poller task failed: {err}");
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::Unavailable;

    #[derive(Clone)]
    struct FakeFetcher {
        calls: Arc<AtomicUsize>,
        delay: Duration,
    }

    impl FakeFetcher {
        fn new(delay: Duration) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                delay,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Fetch for FakeFetcher {
        fn fetch(&self) -> impl Future<Output = FetchOutcome> + Send {
            let calls = self.calls.clone();
            let delay = self.delay;
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(delay).await;
                FetchOutcome::Unavailable(Unavailable::NotPlaying)
            }
        }
    }

    fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<FetchOutcome>) -> usize {
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    #[tokio::test(start_paused = true)]
    async fn polls_immediately_then_every_period() {
        let fetcher = FakeFetcher::new(Duration::ZERO);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = Poller::new(fetcher.clone(), DEFAULT_INTERVAL).spawn(tx);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fetcher.calls(), 1);

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(fetcher.calls(), 3);
        assert_eq!(drain(&mut rx), 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn slow_cycles_overlap_by_default() {
        let fetcher = FakeFetcher::new(Duration::from_secs(12));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = Poller::new(fetcher.clone(), DEFAULT_INTERVAL).spawn(tx);

        tokio::time::sleep(Duration::from_secs(14)).await;
        // started at 0s, 5s, and 10s; only the first has finished
        assert_eq!(fetcher.calls(), 3);
        assert_eq!(drain(&mut rx), 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn single_flight_skips_ticks() {
        let fetcher = FakeFetcher::new(Duration::from_secs(12));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = Poller::new(fetcher.clone(), DEFAULT_INTERVAL)
            .overlap(OverlapPolicy::SkipWhileInFlight)
            .spawn(tx);

        tokio::time::sleep(Duration::from_secs(14)).await;
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(drain(&mut rx), 1);

        // 15s tick finds nothing in flight
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fetcher.calls(), 2);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_discards_in_flight_results() {
        let fetcher = FakeFetcher::new(Duration::from_secs(3));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = Poller::new(fetcher.clone(), DEFAULT_INTERVAL).spawn(tx);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fetcher.calls(), 1);
        handle.shutdown().await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fetcher.calls(), 1);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_runs_an_extra_cycle() {
        let fetcher = FakeFetcher::new(Duration::ZERO);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = Poller::new(fetcher.clone(), Duration::from_secs(60)).spawn(tx);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fetcher.calls(), 1);

        handle.refresh();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fetcher.calls(), 2);
        assert_eq!(drain(&mut rx), 2);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_receiver_is_dropped() {
        let fetcher = FakeFetcher::new(Duration::ZERO);
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = Poller::new(fetcher.clone(), DEFAULT_INTERVAL).spawn(tx);

        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(rx);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(!handle.is_running());
    }
}
