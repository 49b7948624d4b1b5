use {
    super::Repository,
    crate::auction::entities,
    time::OffsetDateTime,
};

impl Repository {
    #[tracing::instrument(skip_all, name = "conclude_auction_repo", fields(auction_id))]
    pub async fn conclude_auction(
        &self,
        auction_id: entities::AuctionId,
        conclusion_time: OffsetDateTime,
    ) -> anyhow::Result<bool> {
        tracing::Span::current().record("auction_id", auction_id.to_string());
        self.db.conclude_auction(auction_id, conclusion_time).await
    }
}
