use {
    super::{
        models,
        Repository,
    },
    crate::auction::entities,
};

impl Repository {
    // NOTE: Do not call this function directly. Instead call `add_auction` from `Service`.
    pub async fn add_auction(
        &self,
        auction: entities::Auction,
    ) -> anyhow::Result<entities::Auction> {
        self.db.add_auction(&models::Auction::new(&auction)).await?;
        Ok(auction)
    }
}
