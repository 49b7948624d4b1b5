use {
    super::{
        conclude_auction::ConcludeAuctionInput,
        Service,
    },
    crate::auction::entities,
    anyhow::Result,
    futures::future::join_all,
    time::OffsetDateTime,
    tokio::time::MissedTickBehavior,
};

/// Outcome of a single sweeper pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub overdue:        usize,
    pub closed:         usize,
    pub already_closed: usize,
    pub failed:         usize,
}

impl Service {
    /// Periodically closes every active auction whose deadline has passed.
    ///
    /// This is the safety net for monitors lost to a restart or a failed write.
    pub async fn run_sweeper_loop(&self) -> Result<()> {
        tracing::info!(
            sweep_interval = ?self.config.sweep_interval,
            "Starting lifecycle sweeper..."
        );
        let mut sweep_interval = tokio::time::interval(self.config.sweep_interval);
        sweep_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = sweep_interval.tick() => {
                    self.sweep_auctions().await;
                }
            }
        }
        tracing::info!("Shutting down lifecycle sweeper...");
        Ok(())
    }

    /// Runs one sweeper pass.
    ///
    /// A failed scan skips the pass. A failed close does not stop the others.
    #[tracing::instrument(skip_all)]
    pub async fn sweep_auctions(&self) -> SweepSummary {
        let now = OffsetDateTime::now_utc();
        let auctions = match self.repo.get_active_auctions_past_deadline(now).await {
            Ok(auctions) => auctions,
            Err(e) => {
                self.publish_event(entities::LifecycleEvent::SweepFailed {
                    time:  now,
                    error: e.to_string(),
                });
                return SweepSummary::default();
            }
        };

        let results = join_all(auctions.iter().map(|auction| {
            self.conclude_auction(ConcludeAuctionInput {
                auction_id: auction.id,
            })
        }))
        .await;

        let mut summary = SweepSummary {
            overdue: auctions.len(),
            ..Default::default()
        };
        for result in results {
            match result {
                Ok(true) => summary.closed += 1,
                Ok(false) => summary.already_closed += 1,
                Err(_) => summary.failed += 1,
            }
        }
        if summary.overdue > 0 {
            tracing::info!(
                overdue = summary.overdue,
                closed = summary.closed,
                already_closed = summary.already_closed,
                failed = summary.failed,
                "Sweep finished"
            );
        }
        summary
    }

    /// Arms a monitor for every auction left active by a previous run.
    pub async fn rearm_monitors(&self) -> Result<usize> {
        let auctions = self.repo.get_active_auctions().await?;
        let count = auctions.len();
        for auction in auctions {
            self.spawn_monitor(auction);
        }
        tracing::info!(count, "Re-armed auction monitors");
        Ok(count)
    }
}
