#[cfg(test)]
use mockall::automock;
use {
    super::entities,
    crate::{
        api::RestError,
        auction::repository::{
            to_primitive_date_time,
            AuctionStatus,
        },
        kernel::db::DB,
    },
    axum::async_trait,
    sqlx::{
        types::BigDecimal,
        FromRow,
    },
    std::{
        fmt::Debug,
        num::ParseIntError,
    },
    time::{
        PrimitiveDateTime,
        UtcOffset,
    },
    tracing::instrument,
};

#[derive(Clone, FromRow, Debug, PartialEq)]
pub struct Bid {
    pub id:            entities::BidId,
    pub auction_id:    entities::AuctionId,
    pub user_id:       String,
    pub amount:        BigDecimal,
    pub creation_time: PrimitiveDateTime,
}

impl Bid {
    pub fn new(bid: &entities::Bid) -> Bid {
        Bid {
            id:            bid.id,
            auction_id:    bid.auction_id,
            user_id:       bid.user_id.clone(),
            amount:        BigDecimal::from(bid.amount),
            creation_time: to_primitive_date_time(bid.creation_time),
        }
    }

    pub fn get_bid_entity(&self) -> anyhow::Result<entities::Bid> {
        Ok(entities::Bid {
            id:            self.id,
            auction_id:    self.auction_id,
            user_id:       self.user_id.clone(),
            amount:        self
                .amount
                .to_string()
                .parse()
                .map_err(|e: ParseIntError| anyhow::anyhow!(e))?,
            creation_time: self.creation_time.assume_offset(UtcOffset::UTC),
        })
    }
}

/// Persistent store of the bids. Bids are append only.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Database: Debug + Send + Sync + 'static {
    /// Appends the bid only if its auction is active and the bid is earlier than the deadline.
    /// The check and the write are atomic with respect to the close of the auction.
    /// Returns whether the bid was stored.
    async fn add_bid(&self, bid: &Bid) -> anyhow::Result<bool>;
    /// Bids of the auction, highest amount first and earliest first among equal amounts.
    async fn get_bids(&self, auction_id: entities::AuctionId) -> Result<Vec<Bid>, RestError>;
}

#[async_trait]
impl Database for DB {
    #[instrument(
        target = "metrics",
        name = "db_add_bid",
        fields(
            category = "db_queries",
            result = "success",
            name = "add_bid",
            tracing_enabled
        ),
        skip_all
    )]
    async fn add_bid(&self, bid: &Bid) -> anyhow::Result<bool> {
        // The row lock taken on the auction serializes the insert with a concurrent close.
        let result = sqlx::query(
            "INSERT INTO bid (id, auction_id, user_id, amount, creation_time) \
             SELECT $1, $2, $3, $4, $5 \
             WHERE EXISTS (SELECT 1 FROM auction WHERE id = $2 AND status = $6 AND deadline > $5 FOR SHARE)",
        )
        .bind(bid.id)
        .bind(bid.auction_id)
        .bind(&bid.user_id)
        .bind(&bid.amount)
        .bind(bid.creation_time)
        .bind(AuctionStatus::Active)
        .execute(self)
        .await
        .map_err(|e| {
            tracing::Span::current().record("result", "error");
            tracing::error!(error = e.to_string(), "DB: Failed to insert bid");
            e
        })?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(
        target = "metrics",
        name = "db_get_bids",
        fields(
            category = "db_queries",
            result = "success",
            name = "get_bids",
            tracing_enabled
        ),
        skip_all
    )]
    async fn get_bids(&self, auction_id: entities::AuctionId) -> Result<Vec<Bid>, RestError> {
        sqlx::query_as(
            "SELECT * FROM bid WHERE auction_id = $1 ORDER BY amount DESC, creation_time ASC, id ASC",
        )
        .bind(auction_id)
        .fetch_all(self)
        .await
        .map_err(|e| {
            tracing::Span::current().record("result", "error");
            tracing::error!(
                error = e.to_string(),
                auction_id = %auction_id,
                "DB: Failed to fetch bids"
            );
            RestError::TemporarilyUnavailable
        })
    }
}
