use {
    super::{
        verification::VerifyAuctionInput,
        Service,
    },
    crate::{
        api::RestError,
        auction::entities,
    },
};

pub struct AddAuctionInput {
    pub auction_create: entities::AuctionCreate,
}

impl Service {
    /// Creates an active auction closing after the configured interval and arms its monitor.
    #[tracing::instrument(skip_all, fields(auction_id))]
    pub async fn add_auction(
        &self,
        input: AddAuctionInput,
    ) -> Result<entities::Auction, RestError> {
        let auction_create = self.verify_auction(VerifyAuctionInput {
            auction_create: input.auction_create,
        })?;
        let auction = entities::Auction::new(auction_create, self.config.auction_interval);
        tracing::Span::current().record("auction_id", auction.id.to_string());

        let auction = self.repo.add_auction(auction).await.map_err(|e| {
            tracing::error!(error = ?e, "Failed to add auction");
            RestError::TemporarilyUnavailable
        })?;
        tracing::info!(
            auction_id = %auction.id,
            deadline = %auction.deadline(),
            "Auction created"
        );
        self.spawn_monitor(auction.clone());
        Ok(auction)
    }
}
