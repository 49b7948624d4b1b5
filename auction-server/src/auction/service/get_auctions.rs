use {
    super::Service,
    crate::{
        api::RestError,
        auction::entities,
    },
    time::OffsetDateTime,
};

pub struct GetAuctionsInput {
    pub filter: entities::AuctionFilter,
}

impl Service {
    pub async fn get_auctions(
        &self,
        input: GetAuctionsInput,
    ) -> Result<Vec<entities::Auction>, RestError> {
        let now = OffsetDateTime::now_utc();
        let auctions = self.repo.get_auctions(input.filter, now).await?;
        Ok(auctions
            .into_iter()
            .map(|auction| auction.effective_at(now))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            auction::service::tests::{
                get_auction_create,
                get_config,
            },
            kernel::test_utils::InMemoryDatabase,
        },
        std::time::Duration,
    };

    #[tokio::test]
    async fn test_get_auctions_by_status() {
        let (service, _) = Service::new_with_mocks(
            InMemoryDatabase::default(),
            get_config(Duration::from_secs(60)),
        );
        let mut overdue = entities::Auction::new(get_auction_create(), Duration::from_secs(1));
        overdue.creation_time -= Duration::from_secs(10);
        let overdue = service.repo.add_auction(overdue).await.unwrap();
        let running = service
            .repo
            .add_auction(entities::Auction::new(
                entities::AuctionCreate {
                    product_name: "Road bike".to_string(),
                    category: "Sports".to_string(),
                    ..get_auction_create()
                },
                Duration::from_secs(60),
            ))
            .await
            .unwrap();

        let all = service
            .get_auctions(GetAuctionsInput {
                filter: entities::AuctionFilter::default(),
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let active = service
            .get_auctions(GetAuctionsInput {
                filter: entities::AuctionFilter {
                    status: Some(entities::AuctionStatus::Active),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, running.id);

        let completed = service
            .get_auctions(GetAuctionsInput {
                filter: entities::AuctionFilter {
                    status: Some(entities::AuctionStatus::Completed),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, overdue.id);
        assert_eq!(completed[0].status, entities::AuctionStatus::Completed);

        let sports = service
            .get_auctions(GetAuctionsInput {
                filter: entities::AuctionFilter {
                    category: Some("Sports".to_string()),
                    product_name: Some("BIKE".to_string()),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(sports.len(), 1);
        assert_eq!(sports[0].id, running.id);
    }
}
