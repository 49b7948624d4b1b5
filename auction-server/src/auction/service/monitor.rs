use {
    super::{
        conclude_auction::ConcludeAuctionInput,
        Service,
    },
    crate::auction::entities,
    time::OffsetDateTime,
};

/// How a monitor task ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonitorExit {
    /// The monitor performed the transition to completed.
    Closed,
    /// Somebody else closed the auction first.
    AlreadyClosed,
    Shutdown,
    /// The close failed. The sweeper picks the auction up on its next pass.
    Failed,
}

impl Service {
    pub(super) fn spawn_monitor(&self, auction: entities::Auction) {
        self.task_tracker.spawn({
            let service = self.clone();
            async move {
                service.monitor_auction(auction).await;
            }
        });
    }

    /// Waits for the deadline of the auction and closes it.
    ///
    /// Shutdown wins over an elapsed deadline, and a cancelled monitor never writes.
    #[tracing::instrument(skip_all, fields(auction_id = %auction.id))]
    pub async fn monitor_auction(&self, auction: entities::Auction) -> MonitorExit {
        let wait = auction
            .remaining(OffsetDateTime::now_utc())
            .unwrap_or_default();
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => {
                tracing::debug!("Auction monitor stopped by shutdown");
                return MonitorExit::Shutdown;
            }
            _ = tokio::time::sleep(wait) => {}
        }

        match self
            .conclude_auction(ConcludeAuctionInput {
                auction_id: auction.id,
            })
            .await
        {
            Ok(true) => MonitorExit::Closed,
            Ok(false) => MonitorExit::AlreadyClosed,
            Err(_) => MonitorExit::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            auction::{
                repository::MockDatabase,
                service::{
                    add_auction::AddAuctionInput,
                    tests::{
                        drain_events,
                        get_auction_create,
                        get_config,
                    },
                },
            },
            kernel::test_utils::InMemoryDatabase,
        },
        std::time::Duration,
    };

    #[tokio::test]
    async fn test_monitor_closes_auction_at_deadline() {
        let db = InMemoryDatabase::default();
        let (service, mut events) =
            Service::new_with_mocks(db.clone(), get_config(Duration::from_millis(300)));
        let auction = service
            .add_auction(AddAuctionInput {
                auction_create: get_auction_create(),
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        let stored = db.get_auction_entity(auction.id).await.unwrap();
        assert_eq!(stored.status, entities::AuctionStatus::Active);

        tokio::time::sleep(Duration::from_millis(500)).await;
        let stored = db.get_auction_entity(auction.id).await.unwrap();
        assert_eq!(stored.status, entities::AuctionStatus::Completed);
        let conclusion_time = stored.conclusion_time.unwrap();
        assert!(conclusion_time >= auction.deadline());

        let events = drain_events(&mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "auction_closed");
        service.wait_for_tasks().await;
    }

    #[tokio::test]
    async fn test_monitor_exits_on_shutdown_without_writing() {
        let mut db = MockDatabase::default();
        db.expect_conclude_auction().never();
        let (service, mut events) = Service::new_with_mocks(db, get_config(Duration::from_secs(60)));
        let auction = entities::Auction::new(get_auction_create(), Duration::from_secs(60));

        let monitor = tokio::spawn({
            let service = service.clone();
            async move { service.monitor_auction(auction).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        service.shutdown();

        let exit = tokio::time::timeout(Duration::from_secs(1), monitor)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(exit, MonitorExit::Shutdown);
        assert!(drain_events(&mut events).is_empty());
    }

    #[tokio::test]
    async fn test_monitor_prefers_shutdown_over_elapsed_deadline() {
        let mut db = MockDatabase::default();
        db.expect_conclude_auction().never();
        let (service, _) = Service::new_with_mocks(db, get_config(Duration::from_secs(60)));
        let mut auction = entities::Auction::new(get_auction_create(), Duration::from_secs(1));
        auction.creation_time -= Duration::from_secs(10);
        service.shutdown();

        assert_eq!(
            service.monitor_auction(auction).await,
            MonitorExit::Shutdown
        );
    }

    #[tokio::test]
    async fn test_monitor_when_auction_already_closed() {
        let mut db = MockDatabase::default();
        db.expect_conclude_auction()
            .times(1)
            .returning(|_, _| Ok(false));
        let (service, mut events) = Service::new_with_mocks(db, get_config(Duration::from_secs(60)));
        let mut auction = entities::Auction::new(get_auction_create(), Duration::from_secs(1));
        auction.creation_time -= Duration::from_secs(10);

        assert_eq!(
            service.monitor_auction(auction).await,
            MonitorExit::AlreadyClosed
        );
        assert!(drain_events(&mut events).is_empty());
    }

    #[tokio::test]
    async fn test_monitor_when_close_fails() {
        let mut db = MockDatabase::default();
        db.expect_conclude_auction()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("database is down")));
        let (service, mut events) = Service::new_with_mocks(db, get_config(Duration::from_secs(60)));
        let mut auction = entities::Auction::new(get_auction_create(), Duration::from_secs(1));
        auction.creation_time -= Duration::from_secs(10);

        assert_eq!(service.monitor_auction(auction).await, MonitorExit::Failed);
        let events = drain_events(&mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "close_failed");
    }
}
