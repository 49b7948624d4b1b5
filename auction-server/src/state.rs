use crate::{
    auction::service::Service as AuctionService,
    bid::service::Service as BidService,
};

/// Shared state of the REST handlers.
pub struct Store {
    pub auction_service: AuctionService,
    pub bid_service:     BidService,
}
