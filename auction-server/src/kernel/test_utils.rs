use {
    crate::{
        api::RestError,
        auction::{
            entities as auction_entities,
            repository::{
                self as auction_repository,
                to_primitive_date_time,
                AUCTION_PAGE_SIZE_CAP,
            },
        },
        bid::{
            entities as bid_entities,
            repository as bid_repository,
        },
    },
    axum::async_trait,
    std::{
        collections::HashMap,
        sync::{
            atomic::{
                AtomicUsize,
                Ordering,
            },
            Arc,
        },
    },
    time::OffsetDateTime,
    tokio::sync::Mutex,
};

#[derive(Debug, Default)]
struct State {
    auctions: HashMap<auction_entities::AuctionId, auction_repository::Auction>,
    bids:     Vec<bid_repository::Bid>,
}

/// Store of auctions and bids kept in memory.
///
/// Clones share the same state, so several services built on clones behave like several server
/// instances sharing one database. Every operation runs under a single lock.
#[derive(Clone, Debug, Default)]
pub struct InMemoryDatabase {
    state:           Arc<Mutex<State>>,
    conclude_writes: Arc<AtomicUsize>,
}

impl InMemoryDatabase {
    /// Number of transitions to completed performed so far.
    pub fn conclude_writes(&self) -> usize {
        self.conclude_writes.load(Ordering::SeqCst)
    }

    pub async fn insert_auction_entity(&self, auction: &auction_entities::Auction) {
        let mut state = self.state.lock().await;
        state
            .auctions
            .insert(auction.id, auction_repository::Auction::new(auction));
    }

    pub async fn get_auction_entity(
        &self,
        auction_id: auction_entities::AuctionId,
    ) -> Option<auction_entities::Auction> {
        let state = self.state.lock().await;
        state
            .auctions
            .get(&auction_id)
            .and_then(|auction| auction.get_auction_entity().ok())
    }

    pub async fn insert_bid_entity(&self, bid: &bid_entities::Bid) {
        self.state
            .lock()
            .await
            .bids
            .push(bid_repository::Bid::new(bid));
    }

    pub async fn get_bid_entities(
        &self,
        auction_id: auction_entities::AuctionId,
    ) -> Vec<bid_entities::Bid> {
        let state = self.state.lock().await;
        state
            .bids
            .iter()
            .filter(|bid| bid.auction_id == auction_id)
            .filter_map(|bid| bid.get_bid_entity().ok())
            .collect()
    }
}

#[async_trait]
impl auction_repository::Database for InMemoryDatabase {
    async fn add_auction(&self, auction: &auction_repository::Auction) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        if state.auctions.contains_key(&auction.id) {
            return Err(anyhow::anyhow!("Duplicate auction id {}", auction.id));
        }
        state.auctions.insert(auction.id, auction.clone());
        Ok(())
    }

    async fn conclude_auction(
        &self,
        auction_id: auction_entities::AuctionId,
        conclusion_time: OffsetDateTime,
    ) -> anyhow::Result<bool> {
        let mut state = self.state.lock().await;
        match state.auctions.get_mut(&auction_id) {
            Some(auction) if auction.status == auction_repository::AuctionStatus::Active => {
                auction.status = auction_entities::AuctionStatus::from(auction.status)
                    .complete()
                    .into();
                auction.conclusion_time = Some(to_primitive_date_time(conclusion_time));
                self.conclude_writes.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn get_auction(
        &self,
        auction_id: auction_entities::AuctionId,
    ) -> Result<auction_repository::Auction, RestError> {
        let state = self.state.lock().await;
        state
            .auctions
            .get(&auction_id)
            .cloned()
            .ok_or(RestError::AuctionNotFound)
    }

    async fn get_auctions(
        &self,
        filter: auction_entities::AuctionFilter,
        now: OffsetDateTime,
    ) -> Result<Vec<auction_repository::Auction>, RestError> {
        let state = self.state.lock().await;
        let mut auctions: Vec<_> = state
            .auctions
            .values()
            .filter(|auction| auction.matches(&filter, now))
            .cloned()
            .collect();
        auctions.sort_by(|a, b| b.creation_time.cmp(&a.creation_time));
        auctions.truncate(AUCTION_PAGE_SIZE_CAP);
        Ok(auctions)
    }

    async fn get_active_auctions(&self) -> anyhow::Result<Vec<auction_repository::Auction>> {
        let state = self.state.lock().await;
        Ok(state
            .auctions
            .values()
            .filter(|auction| auction.status == auction_repository::AuctionStatus::Active)
            .cloned()
            .collect())
    }

    async fn get_active_auctions_past_deadline(
        &self,
        now: OffsetDateTime,
    ) -> anyhow::Result<Vec<auction_repository::Auction>> {
        let now = to_primitive_date_time(now);
        let state = self.state.lock().await;
        Ok(state
            .auctions
            .values()
            .filter(|auction| {
                auction.status == auction_repository::AuctionStatus::Active
                    && auction.deadline <= now
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl bid_repository::Database for InMemoryDatabase {
    async fn add_bid(&self, bid: &bid_repository::Bid) -> anyhow::Result<bool> {
        let mut state = self.state.lock().await;
        let accepts_bids = state.auctions.get(&bid.auction_id).map_or(false, |auction| {
            auction.status == auction_repository::AuctionStatus::Active
                && auction.deadline > bid.creation_time
        });
        if accepts_bids {
            state.bids.push(bid.clone());
        }
        Ok(accepts_bids)
    }

    async fn get_bids(
        &self,
        auction_id: auction_entities::AuctionId,
    ) -> Result<Vec<bid_repository::Bid>, RestError> {
        let state = self.state.lock().await;
        let mut bids: Vec<_> = state
            .bids
            .iter()
            .filter(|bid| bid.auction_id == auction_id)
            .cloned()
            .collect();
        bids.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.creation_time.cmp(&b.creation_time))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(bids)
    }
}
