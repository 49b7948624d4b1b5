use {
    super::Service,
    crate::auction::entities,
    time::OffsetDateTime,
};

pub struct ConcludeAuctionInput {
    pub auction_id: entities::AuctionId,
}

impl Service {
    /// Moves the auction from active to completed.
    ///
    /// Returns `true` only for the caller that performed the transition, so racing monitors,
    /// sweepers and other server instances publish a single `auction_closed` event.
    #[tracing::instrument(skip_all, fields(auction_id))]
    pub async fn conclude_auction(&self, input: ConcludeAuctionInput) -> anyhow::Result<bool> {
        tracing::Span::current().record("auction_id", input.auction_id.to_string());
        let conclusion_time = OffsetDateTime::now_utc();
        match self
            .repo
            .conclude_auction(input.auction_id, conclusion_time)
            .await
        {
            Ok(true) => {
                self.publish_event(entities::LifecycleEvent::AuctionClosed {
                    auction_id: input.auction_id,
                    closed_at:  conclusion_time,
                });
                Ok(true)
            }
            Ok(false) => {
                tracing::debug!("Auction is not active anymore");
                Ok(false)
            }
            Err(e) => {
                self.publish_event(entities::LifecycleEvent::CloseFailed {
                    auction_id: input.auction_id,
                    time:       conclusion_time,
                    error:      e.to_string(),
                });
                Err(e)
            }
        }
    }
}
