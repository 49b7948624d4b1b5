use {
    super::AuctionId,
    std::fmt::{
        Display,
        Formatter,
    },
    time::OffsetDateTime,
};

/// Events published by the lifecycle of the auctions.
#[derive(Clone, Debug, PartialEq)]
pub enum LifecycleEvent {
    AuctionClosed {
        auction_id: AuctionId,
        closed_at:  OffsetDateTime,
    },
    CloseFailed {
        auction_id: AuctionId,
        time:       OffsetDateTime,
        error:      String,
    },
    SweepFailed {
        time:  OffsetDateTime,
        error: String,
    },
}

impl LifecycleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::AuctionClosed { .. } => "auction_closed",
            LifecycleEvent::CloseFailed { .. } => "close_failed",
            LifecycleEvent::SweepFailed { .. } => "sweep_failed",
        }
    }

    pub fn auction_id(&self) -> Option<AuctionId> {
        match self {
            LifecycleEvent::AuctionClosed { auction_id, .. }
            | LifecycleEvent::CloseFailed { auction_id, .. } => Some(*auction_id),
            LifecycleEvent::SweepFailed { .. } => None,
        }
    }
}

impl Display for LifecycleEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.auction_id() {
            Some(auction_id) => write!(f, "{}({})", self.name(), auction_id),
            None => write!(f, "{}", self.name()),
        }
    }
}
