use {
    super::Service,
    crate::{
        api::RestError,
        auction::service::get_auction_by_id::GetAuctionByIdInput,
        bid::entities,
    },
    time::OffsetDateTime,
};

pub struct VerifyBidInput<'a> {
    pub bid_create: &'a entities::BidCreate,
    /// Arrival time of the bid.
    pub now:        OffsetDateTime,
}

impl Service {
    /// Rejects malformed bids and bids on auctions that do not accept bids at arrival time.
    pub(super) async fn verify_bid(&self, input: VerifyBidInput<'_>) -> Result<(), RestError> {
        let bid_create = input.bid_create;
        if bid_create.amount == 0 {
            return Err(RestError::BadParameters(
                "amount must be greater than zero".to_string(),
            ));
        }
        if bid_create.user_id.trim().is_empty() {
            return Err(RestError::BadParameters(
                "user_id must not be empty".to_string(),
            ));
        }

        let auction = self
            .auction_service
            .get_auction_by_id(GetAuctionByIdInput {
                auction_id: bid_create.auction_id,
            })
            .await?;
        if !auction.accepts_bids_at(input.now) {
            tracing::debug!(
                auction_id = %auction.id,
                deadline = %auction.deadline(),
                "Bid arrived after the auction stopped accepting bids"
            );
            return Err(RestError::AuctionClosed);
        }
        Ok(())
    }
}
