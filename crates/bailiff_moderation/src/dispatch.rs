//! Background loop that lifts expired tempbans.

use crate::ModerationService;
use bailiff_interface::ModerationPlatform;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info, instrument};

/// Shortest accepted polling or pruning period.
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Message types for the unban dispatcher.
#[derive(Debug)]
pub enum DispatchMessage {
    /// Run a tick right away
    RunNow,
    /// Stop the loop and drain the queue
    Shutdown,
}

/// Actor that polls the service for due unbans on a fixed interval.
///
/// It also prunes stale slow mode entries on a slower interval. On shutdown
/// (or when every sender is dropped) the pending queue is drained without
/// unbanning anyone; the records stay stored and are rescheduled the next
/// time a service is created over the store.
pub struct UnbanDispatcher<P: ModerationPlatform> {
    service: Arc<ModerationService<P>>,
    poll_interval: Duration,
    prune_interval: Duration,
    rx: mpsc::Receiver<DispatchMessage>,
}

impl<P: ModerationPlatform + 'static> UnbanDispatcher<P> {
    /// Creates a dispatcher fed by `rx`.
    pub fn new(
        service: Arc<ModerationService<P>>,
        poll_interval: Duration,
        prune_interval: Duration,
        rx: mpsc::Receiver<DispatchMessage>,
    ) -> Self {
        Self {
            service,
            poll_interval: poll_interval.max(MIN_INTERVAL),
            prune_interval: prune_interval.max(MIN_INTERVAL),
            rx,
        }
    }

    /// Spawn a dispatcher on the current runtime.
    pub fn spawn(
        service: Arc<ModerationService<P>>,
        poll_interval: Duration,
        prune_interval: Duration,
    ) -> DispatcherHandle {
        let (tx, rx) = mpsc::channel(8);
        let dispatcher = Self::new(service, poll_interval, prune_interval, rx);
        let task = tokio::spawn(async move {
            dispatcher.run().await;
        });
        DispatcherHandle { tx, task }
    }

    /// Runs the dispatch loop until shut down.
    #[instrument(skip(self), fields(poll_ms = self.poll_interval.as_millis() as u64))]
    pub async fn run(self) {
        info!("Unban dispatcher started");

        let Self {
            service,
            poll_interval,
            prune_interval,
            mut rx,
        } = self;

        let mut poll = interval(poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut prune = interval(prune_interval);
        prune.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = poll.tick() => tick(&service).await,
                _ = prune.tick() => {
                    let dropped = service.prune_slow_mode(service.now()).await;
                    debug!(dropped, "Slow mode pruned");
                }
                msg = rx.recv() => match msg {
                    Some(DispatchMessage::RunNow) => tick(&service).await,
                    Some(DispatchMessage::Shutdown) | None => {
                        info!("Unban dispatcher shutting down");
                        break;
                    }
                },
            }
        }

        let drained = service.drain_schedule().await;
        info!(drained, "Unban dispatcher stopped");
    }
}

async fn tick<P: ModerationPlatform>(service: &ModerationService<P>) {
    let now = service.now();
    match service.run_due(now).await {
        Ok(0) => {}
        Ok(count) => debug!(count, now, "Unban tick finished"),
        Err(e) => error!(error = %e, "Unban tick failed"),
    }
}

/// Handle to a spawned [`UnbanDispatcher`].
#[derive(Debug)]
pub struct DispatcherHandle {
    tx: mpsc::Sender<DispatchMessage>,
    task: JoinHandle<()>,
}

impl DispatcherHandle {
    /// Ask for an immediate tick. Returns false if the dispatcher is gone.
    pub async fn run_now(&self) -> bool {
        self.tx.send(DispatchMessage::RunNow).await.is_ok()
    }

    /// Sender for wiring the dispatcher into other tasks.
    pub fn sender(&self) -> mpsc::Sender<DispatchMessage> {
        self.tx.clone()
    }

    /// Stop the dispatcher and wait for it to finish.
    pub async fn shutdown(self) {
        if self.tx.send(DispatchMessage::Shutdown).await.is_err() {
            debug!("Dispatcher already stopped");
        }
        if let Err(e) = self.task.await {
            error!(error = %e, "Dispatcher task failed");
        }
    }
}
