use {
    super::repository::{
        self,
        Repository,
    },
    crate::auction::service::Service as AuctionService,
    std::sync::Arc,
};

pub mod get_bids;
pub mod get_winning_bid;
pub mod handle_bid;
mod verification;

pub struct ServiceInner {
    repo:            Arc<Repository>,
    auction_service: AuctionService,
}

#[derive(Clone)]
pub struct Service(Arc<ServiceInner>);
impl std::ops::Deref for Service {
    type Target = ServiceInner;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Service {
    pub fn new(db: impl repository::Database, auction_service: AuctionService) -> Self {
        Self(Arc::new(ServiceInner {
            repo: Arc::new(Repository::new(db)),
            auction_service,
        }))
    }
}
