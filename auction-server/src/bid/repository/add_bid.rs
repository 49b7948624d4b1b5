use {
    super::{
        models,
        Repository,
    },
    crate::bid::entities,
};

impl Repository {
    /// Returns `false` when the auction stopped accepting bids before the write.
    #[tracing::instrument(skip_all, name = "add_bid_repo", fields(bid_id, auction_id))]
    pub async fn add_bid(&self, bid: &entities::Bid) -> anyhow::Result<bool> {
        tracing::Span::current().record("bid_id", bid.id.to_string());
        tracing::Span::current().record("auction_id", bid.auction_id.to_string());
        self.db.add_bid(&models::Bid::new(bid)).await
    }
}
