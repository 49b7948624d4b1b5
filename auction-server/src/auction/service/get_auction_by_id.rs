use {
    super::Service,
    crate::{
        api::RestError,
        auction::entities,
    },
    time::OffsetDateTime,
};

pub struct GetAuctionByIdInput {
    pub auction_id: entities::AuctionId,
}

impl Service {
    /// Returns the auction as observed now. An auction past its deadline reads as completed even
    /// before its transition has been written.
    pub async fn get_auction_by_id(
        &self,
        input: GetAuctionByIdInput,
    ) -> Result<entities::Auction, RestError> {
        let auction = self.repo.get_auction(input.auction_id).await?;
        Ok(auction.effective_at(OffsetDateTime::now_utc()))
    }
}
