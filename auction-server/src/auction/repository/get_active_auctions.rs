use {
    super::{
        models,
        Repository,
    },
    crate::auction::entities,
    time::OffsetDateTime,
};

fn into_entities(auctions: Vec<models::Auction>) -> Vec<entities::Auction> {
    auctions
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
        .collect()
}

impl Repository {
    pub async fn get_active_auctions(&self) -> anyhow::Result<Vec<entities::Auction>> {
        Ok(into_entities(self.db.get_active_auctions().await?))
    }

    pub async fn get_active_auctions_past_deadline(
        &self,
        now: OffsetDateTime,
    ) -> anyhow::Result<Vec<entities::Auction>> {
        Ok(into_entities(
            self.db.get_active_auctions_past_deadline(now).await?,
        ))
    }
}
