use {
    super::Repository,
    crate::{
        api::RestError,
        bid::entities,
    },
};

impl Repository {
    pub async fn get_bids(
        &self,
        auction_id: entities::AuctionId,
    ) -> Result<Vec<entities::Bid>, RestError> {
        let bids = self.db.get_bids(auction_id).await?;
        bids.into_iter()
            .map(|bid| {
                bid.get_bid_entity().map_err(|e| {
                    tracing::error!(
                        error = e.to_string(),
                        bid = ?bid,
                        "Failed to convert bid to entity"
                    );
                    RestError::TemporarilyUnavailable
                })
            })
            .collect()
    }
}
