use {
    super::{
        entities,
        repository::{
            self,
            Repository,
        },
    },
    crate::{
        config::LifecycleConfig,
        server_metrics::LIFECYCLE_EVENTS_METRIC,
    },
    axum_prometheus::metrics,
    std::{
        sync::Arc,
        time::Duration,
    },
    tokio::sync::broadcast,
    tokio_util::{
        sync::CancellationToken,
        task::TaskTracker,
    },
};

pub mod add_auction;
pub mod conclude_auction;
pub mod get_auction_by_id;
pub mod get_auctions;
pub mod monitor;
pub mod verification;
pub mod workers;

#[derive(Clone, Debug)]
pub struct Config {
    pub auction_interval: Duration,
    pub sweep_interval:   Duration,
}

impl From<LifecycleConfig> for Config {
    fn from(config: LifecycleConfig) -> Self {
        Self {
            auction_interval: config.auction_interval,
            sweep_interval:   config.sweep_interval,
        }
    }
}

pub struct ServiceInner {
    config:       Config,
    repo:         Arc<Repository>,
    task_tracker: TaskTracker,
    shutdown:     CancellationToken,
    event_sender: broadcast::Sender<entities::LifecycleEvent>,
}

#[derive(Clone)]
pub struct Service(Arc<ServiceInner>);
impl std::ops::Deref for Service {
    type Target = ServiceInner;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Service {
    pub fn new(
        db: impl repository::Database,
        config: Config,
        task_tracker: TaskTracker,
        shutdown: CancellationToken,
        event_sender: broadcast::Sender<entities::LifecycleEvent>,
    ) -> Self {
        Self(Arc::new(ServiceInner {
            config,
            repo: Arc::new(Repository::new(db)),
            task_tracker,
            shutdown,
            event_sender,
        }))
    }

    fn publish_event(&self, event: entities::LifecycleEvent) {
        match &event {
            entities::LifecycleEvent::AuctionClosed {
                auction_id,
                closed_at,
            } => tracing::info!(
                event = event.name(),
                auction_id = %auction_id,
                closed_at = %closed_at,
                "Auction closed"
            ),
            entities::LifecycleEvent::CloseFailed {
                auction_id,
                time,
                error,
            } => tracing::error!(
                event = event.name(),
                auction_id = %auction_id,
                time = %time,
                error = error,
                "Failed to close auction"
            ),
            entities::LifecycleEvent::SweepFailed { time, error } => tracing::warn!(
                event = event.name(),
                time = %time,
                error = error,
                "Skipping sweep cycle"
            ),
        }
        metrics::counter!(LIFECYCLE_EVENTS_METRIC, &[("event", event.name().to_string())])
            .increment(1);
        if let Err(e) = self.event_sender.send(event) {
            tracing::debug!(error = ?e, "No subscriber for lifecycle event");
        }
    }
}
