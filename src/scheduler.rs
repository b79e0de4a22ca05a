use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::fetcher::PriceSource;
use crate::refresh::{RefreshEvent, Trigger};

/// Drives fetches from a repeating timer and from manual requests.
///
/// Every attempt runs on its own task and reports a [`RefreshEvent`] on the
/// channel returned by [`RefreshScheduler::new`]. Triggers never wait for
/// the fetch to finish, and overlapping attempts are not serialized.
pub struct RefreshScheduler<S> {
    source: Arc<S>,
    interval: Duration,
    events: UnboundedSender<RefreshEvent>,
    generation: Arc<AtomicU64>,
}

impl<S> Clone for RefreshScheduler<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            interval: self.interval,
            events: self.events.clone(),
            generation: Arc::clone(&self.generation),
        }
    }
}

impl<S: PriceSource> RefreshScheduler<S> {
    pub fn new(source: S, interval: Duration) -> (Self, UnboundedReceiver<RefreshEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            source: Arc::new(source),
            // tokio intervals reject a zero period
            interval: interval.max(Duration::from_millis(1)),
            events,
            generation: Arc::new(AtomicU64::new(0)),
        };
        (scheduler, rx)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fetch once right away, then once per interval until the returned
    /// task is aborted.
    pub fn start(&self) -> JoinHandle<()> {
        let scheduler = self.clone();
        tokio::spawn(async move { scheduler.run_timer().await })
    }

    /// Fetch outside the timer cadence. The timer schedule is unaffected.
    pub fn refresh_now(&self) -> JoinHandle<()> {
        self.trigger(Trigger::Manual)
    }

    #[instrument(skip(self), fields(interval_secs = %self.interval.as_secs()))]
    async fn run_timer(&self) {
        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Refresh scheduler started with {} second interval",
            self.interval.as_secs()
        );

        // The first tick of a tokio interval completes immediately.
        interval.tick().await;
        self.trigger(Trigger::Startup);

        loop {
            interval.tick().await;
            debug!("Scheduler tick - initiating fetch");
            self.trigger(Trigger::Timer);
        }
    }

    fn trigger(&self, trigger: Trigger) -> JoinHandle<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let source = Arc::clone(&self.source);
        let events = self.events.clone();

        debug!(?trigger, generation, "Spawning fetch");

        tokio::spawn(async move {
            let result = source.fetch().await;
            match result.price() {
                Some(price) => info!(?trigger, generation, %price, "Fetched gas price"),
                None => debug!(?trigger, generation, "Fetch attempt failed"),
            }

            if events
                .send(RefreshEvent::new(result, trigger, generation))
                .is_err()
            {
                warn!(generation, "Display controller is gone, dropping refresh result");
            }
        })
    }
}
