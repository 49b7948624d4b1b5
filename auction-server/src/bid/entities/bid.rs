pub use crate::auction::entities::AuctionId;
use {
    crate::auction::entities::Auction,
    std::cmp::Ordering,
    time::OffsetDateTime,
    uuid::Uuid,
};

pub type BidId = Uuid;
pub type BidAmount = u64;
pub type UserId = String;

#[derive(Clone, Debug, PartialEq)]
pub struct Bid {
    pub id:            BidId,
    pub auction_id:    AuctionId,
    pub user_id:       UserId,
    pub amount:        BidAmount,
    pub creation_time: OffsetDateTime,
}

#[derive(Clone, Debug)]
pub struct BidCreate {
    pub auction_id: AuctionId,
    pub user_id:    UserId,
    pub amount:     BidAmount,
}

impl Bid {
    pub fn new(bid_create: BidCreate, creation_time: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            auction_id: bid_create.auction_id,
            user_id: bid_create.user_id,
            amount: bid_create.amount,
            creation_time,
        }
    }

    /// Ranks bids for the winner selection. A higher amount ranks higher, and among equal amounts
    /// the earlier bid does. The id only keeps the order total.
    pub fn rank(&self, other: &Bid) -> Ordering {
        self.amount
            .cmp(&other.amount)
            .then_with(|| other.creation_time.cmp(&self.creation_time))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// An auction together with its current winning bid, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct WinningBid {
    pub auction: Auction,
    pub bid:     Option<Bid>,
}

/// Picks the winning bid. `None` when there are no bids.
pub fn get_winner(bids: &[Bid]) -> Option<&Bid> {
    bids.iter().max_by(|a, b| a.rank(b))
}
