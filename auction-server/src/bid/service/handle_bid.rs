use {
    super::{
        verification::VerifyBidInput,
        Service,
    },
    crate::{
        api::RestError,
        bid::entities,
    },
    time::OffsetDateTime,
};

pub struct HandleBidInput {
    pub bid_create: entities::BidCreate,
}

impl Service {
    /// Admits a bid on an auction that is active and before its deadline.
    ///
    /// Lifecycle rejections are reported as `AuctionClosed`, never as bad parameters.
    #[tracing::instrument(skip_all, fields(auction_id, bid_id))]
    pub async fn handle_bid(&self, input: HandleBidInput) -> Result<entities::Bid, RestError> {
        tracing::Span::current().record("auction_id", input.bid_create.auction_id.to_string());
        let now = OffsetDateTime::now_utc();
        self.verify_bid(VerifyBidInput {
            bid_create: &input.bid_create,
            now,
        })
        .await?;

        let bid = entities::Bid::new(input.bid_create, now);
        tracing::Span::current().record("bid_id", bid.id.to_string());
        match self.repo.add_bid(&bid).await {
            Ok(true) => {
                tracing::info!(amount = bid.amount, "Bid accepted");
                Ok(bid)
            }
            // The auction was closed between the check and the write.
            Ok(false) => Err(RestError::AuctionClosed),
            Err(e) => {
                tracing::error!(error = ?e, "Failed to add bid");
                Err(RestError::TemporarilyUnavailable)
            }
        }
    }
}
