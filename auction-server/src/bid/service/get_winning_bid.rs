use {
    super::Service,
    crate::{
        api::RestError,
        auction::service::get_auction_by_id::GetAuctionByIdInput,
        bid::entities,
    },
};

pub struct GetWinningBidInput {
    pub auction_id: entities::AuctionId,
}

impl Service {
    /// Resolves the highest bid of the auction, the earliest one among equal amounts.
    ///
    /// Works in any auction state, an open auction reports its current leader.
    pub async fn get_winning_bid(
        &self,
        input: GetWinningBidInput,
    ) -> Result<entities::WinningBid, RestError> {
        let auction = self
            .auction_service
            .get_auction_by_id(GetAuctionByIdInput {
                auction_id: input.auction_id,
            })
            .await?;
        let bids = self.repo.get_bids(input.auction_id).await?;
        Ok(entities::WinningBid {
            bid: entities::get_winner(&bids).cloned(),
            auction,
        })
    }
}
