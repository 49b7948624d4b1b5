use {
    std::time::Duration,
    time::OffsetDateTime,
    uuid::Uuid,
};

pub type AuctionId = Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductCondition {
    New,
    Used,
    Refurbished,
}

/// Lifecycle state of an auction.
///
/// Every auction starts active. `complete` is the only transition, there is no way back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuctionStatus {
    Active,
    Completed,
}

impl AuctionStatus {
    /// Completing a completed auction is a no-op.
    pub fn complete(self) -> AuctionStatus {
        match self {
            AuctionStatus::Active | AuctionStatus::Completed => AuctionStatus::Completed,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, AuctionStatus::Active)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Auction {
    pub id:               AuctionId,
    pub product_name:     String,
    pub category:         String,
    pub description:      String,
    pub condition:        ProductCondition,
    pub status:           AuctionStatus,
    pub creation_time:    OffsetDateTime,
    pub closing_interval: Duration,
    pub conclusion_time:  Option<OffsetDateTime>,
}

#[derive(Clone, Debug)]
pub struct AuctionCreate {
    pub product_name: String,
    pub category:     String,
    pub description:  String,
    pub condition:    ProductCondition,
}

/// Optional filters when listing auctions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuctionFilter {
    pub status:       Option<AuctionStatus>,
    pub category:     Option<String>,
    /// Case insensitive substring of the product name.
    pub product_name: Option<String>,
}

impl Auction {
    pub fn new(auction_create: AuctionCreate, closing_interval: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_name: auction_create.product_name,
            category: auction_create.category,
            description: auction_create.description,
            condition: auction_create.condition,
            status: AuctionStatus::Active,
            creation_time: OffsetDateTime::now_utc(),
            closing_interval,
            conclusion_time: None,
        }
    }

    pub fn deadline(&self) -> OffsetDateTime {
        self.creation_time + self.closing_interval
    }

    pub fn is_past_deadline(&self, now: OffsetDateTime) -> bool {
        now >= self.deadline()
    }

    /// Whether a bid arriving at `now` may be accepted.
    pub fn accepts_bids_at(&self, now: OffsetDateTime) -> bool {
        self.status.is_active() && !self.is_past_deadline(now)
    }

    /// Time left until the deadline. `None` once the deadline is reached.
    pub fn remaining(&self, now: OffsetDateTime) -> Option<Duration> {
        let remaining = self.deadline() - now;
        if remaining.is_positive() {
            remaining.try_into().ok()
        } else {
            None
        }
    }

    /// The auction as readers must observe it at `now`.
    ///
    /// The stored status may still be active for a short while after the deadline, until the
    /// monitor or the sweeper writes the transition.
    pub fn effective_at(mut self, now: OffsetDateTime) -> Self {
        if self.is_past_deadline(now) {
            self.status = self.status.complete();
        }
        self
    }
}
