use {
    super::Service,
    crate::{
        api::RestError,
        auction::service::get_auction_by_id::GetAuctionByIdInput,
        bid::entities,
    },
};

pub struct GetBidsInput {
    pub auction_id: entities::AuctionId,
}

impl Service {
    /// Bids of an existing auction, highest amount first.
    pub async fn get_bids(&self, input: GetBidsInput) -> Result<Vec<entities::Bid>, RestError> {
        self.auction_service
            .get_auction_by_id(GetAuctionByIdInput {
                auction_id: input.auction_id,
            })
            .await?;
        self.repo.get_bids(input.auction_id).await
    }
}
