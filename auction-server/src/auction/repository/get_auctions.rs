use {
    super::Repository,
    crate::{
        api::RestError,
        auction::entities,
    },
    time::OffsetDateTime,
};

impl Repository {
    pub async fn get_auctions(
        &self,
        filter: entities::AuctionFilter,
        now: OffsetDateTime,
    ) -> Result<Vec<entities::Auction>, RestError> {
        let auctions = self.db.get_auctions(filter, now).await?;
        Ok(auctions
            .into_iter()
            .filter_map(|auction| {
                auction
                    .get_auction_entity()
                    .map_err(|e| {
                        tracing::error!(
                            error = e.to_string(),
                            auction = ?auction,
                            "Failed to convert auction to entity"
                        );
                    })
                    .ok()
            })
            .collect())
    }
}
