#[cfg(test)]
use mockall::automock;
use {
    super::{
        entities,
        AUCTION_PAGE_SIZE_CAP,
    },
    crate::{
        api::RestError,
        kernel::db::DB,
    },
    axum::async_trait,
    sqlx::{
        FromRow,
        QueryBuilder,
    },
    std::fmt::Debug,
    time::{
        OffsetDateTime,
        PrimitiveDateTime,
        UtcOffset,
    },
    tracing::instrument,
};

#[derive(Clone, Copy, Debug, PartialEq, sqlx::Type)]
#[sqlx(type_name = "auction_status", rename_all = "lowercase")]
pub enum AuctionStatus {
    Active,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, sqlx::Type)]
#[sqlx(type_name = "product_condition", rename_all = "lowercase")]
pub enum ProductCondition {
    New,
    Used,
    Refurbished,
}

impl From<entities::AuctionStatus> for AuctionStatus {
    fn from(status: entities::AuctionStatus) -> Self {
        match status {
            entities::AuctionStatus::Active => AuctionStatus::Active,
            entities::AuctionStatus::Completed => AuctionStatus::Completed,
        }
    }
}

impl From<AuctionStatus> for entities::AuctionStatus {
    fn from(status: AuctionStatus) -> Self {
        match status {
            AuctionStatus::Active => entities::AuctionStatus::Active,
            AuctionStatus::Completed => entities::AuctionStatus::Completed,
        }
    }
}

impl From<entities::ProductCondition> for ProductCondition {
    fn from(condition: entities::ProductCondition) -> Self {
        match condition {
            entities::ProductCondition::New => ProductCondition::New,
            entities::ProductCondition::Used => ProductCondition::Used,
            entities::ProductCondition::Refurbished => ProductCondition::Refurbished,
        }
    }
}

impl From<ProductCondition> for entities::ProductCondition {
    fn from(condition: ProductCondition) -> Self {
        match condition {
            ProductCondition::New => entities::ProductCondition::New,
            ProductCondition::Used => entities::ProductCondition::Used,
            ProductCondition::Refurbished => entities::ProductCondition::Refurbished,
        }
    }
}

pub fn to_primitive_date_time(time: OffsetDateTime) -> PrimitiveDateTime {
    let time = time.to_offset(UtcOffset::UTC);
    PrimitiveDateTime::new(time.date(), time.time())
}

#[derive(Clone, FromRow, Debug, PartialEq)]
pub struct Auction {
    pub id:              entities::AuctionId,
    pub product_name:    String,
    pub category:        String,
    pub description:     String,
    pub condition:       ProductCondition,
    pub status:          AuctionStatus,
    pub creation_time:   PrimitiveDateTime,
    pub deadline:        PrimitiveDateTime,
    pub conclusion_time: Option<PrimitiveDateTime>,
}

impl Auction {
    pub fn new(auction: &entities::Auction) -> Auction {
        Auction {
            id:              auction.id,
            product_name:    auction.product_name.clone(),
            category:        auction.category.clone(),
            description:     auction.description.clone(),
            condition:       auction.condition.into(),
            status:          auction.status.into(),
            creation_time:   to_primitive_date_time(auction.creation_time),
            deadline:        to_primitive_date_time(auction.deadline()),
            conclusion_time: auction.conclusion_time.map(to_primitive_date_time),
        }
    }

    pub fn get_auction_entity(&self) -> anyhow::Result<entities::Auction> {
        let creation_time = self.creation_time.assume_offset(UtcOffset::UTC);
        let closing_interval = (self.deadline.assume_offset(UtcOffset::UTC) - creation_time)
            .try_into()
            .map_err(|e| {
                anyhow::anyhow!(
                    "Auction {} has a deadline before its creation time: {:?}",
                    self.id,
                    e
                )
            })?;
        Ok(entities::Auction {
            id: self.id,
            product_name: self.product_name.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            condition: self.condition.into(),
            status: self.status.into(),
            creation_time,
            closing_interval,
            conclusion_time: self
                .conclusion_time
                .map(|t| t.assume_offset(UtcOffset::UTC)),
        })
    }

    /// Whether the auction passes the filter when evaluated at `now`.
    /// An active auction past its deadline counts as completed.
    #[cfg(test)]
    pub fn matches(&self, filter: &entities::AuctionFilter, now: OffsetDateTime) -> bool {
        let past_deadline = self.deadline <= to_primitive_date_time(now);
        let status_matches = filter.status.map_or(true, |status| match status {
            entities::AuctionStatus::Active => {
                self.status == AuctionStatus::Active && !past_deadline
            }
            entities::AuctionStatus::Completed => {
                self.status == AuctionStatus::Completed || past_deadline
            }
        });
        let category_matches = filter
            .category
            .as_ref()
            .map_or(true, |category| &self.category == category);
        let product_name_matches = filter.product_name.as_ref().map_or(true, |product_name| {
            self.product_name
                .to_lowercase()
                .contains(&product_name.to_lowercase())
        });
        status_matches && category_matches && product_name_matches
    }
}

fn escape_like_pattern(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Persistent store of the auctions.
///
/// Implementations must be safe to use from many tasks and many processes at once. The only
/// write after creation is `conclude_auction`, which has to be atomic.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Database: Debug + Send + Sync + 'static {
    async fn add_auction(&self, auction: &Auction) -> anyhow::Result<()>;
    /// Sets the status to completed if and only if it is active.
    /// Returns whether this call performed the transition.
    async fn conclude_auction(
        &self,
        auction_id: entities::AuctionId,
        conclusion_time: OffsetDateTime,
    ) -> anyhow::Result<bool>;
    async fn get_auction(&self, auction_id: entities::AuctionId) -> Result<Auction, RestError>;
    async fn get_auctions(
        &self,
        filter: entities::AuctionFilter,
        now: OffsetDateTime,
    ) -> Result<Vec<Auction>, RestError>;
    async fn get_active_auctions(&self) -> anyhow::Result<Vec<Auction>>;
    async fn get_active_auctions_past_deadline(
        &self,
        now: OffsetDateTime,
    ) -> anyhow::Result<Vec<Auction>>;
}

#[async_trait]
impl Database for DB {
    #[instrument(
        target = "metrics",
        name = "db_add_auction",
        fields(
            category = "db_queries",
            result = "success",
            name = "add_auction",
            tracing_enabled
        ),
        skip_all
    )]
    async fn add_auction(&self, auction: &Auction) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO auction (id, product_name, category, description, condition, status, creation_time, deadline) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)")
            .bind(auction.id)
            .bind(&auction.product_name)
            .bind(&auction.category)
            .bind(&auction.description)
            .bind(auction.condition)
            .bind(auction.status)
            .bind(auction.creation_time)
            .bind(auction.deadline)
            .execute(self)
            .await
            .inspect_err(|_| {
                tracing::Span::current().record("result", "error");
            })?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_conclude_auction",
        fields(
            category = "db_queries",
            result = "success",
            name = "conclude_auction",
            tracing_enabled
        ),
        skip_all
    )]
    async fn conclude_auction(
        &self,
        auction_id: entities::AuctionId,
        conclusion_time: OffsetDateTime,
    ) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE auction SET status = $1, conclusion_time = $2 WHERE id = $3 AND status = $4",
        )
        .bind(AuctionStatus::Completed)
        .bind(to_primitive_date_time(conclusion_time))
        .bind(auction_id)
        .bind(AuctionStatus::Active)
        .execute(self)
        .await
        .inspect_err(|_| {
            tracing::Span::current().record("result", "error");
        })?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(
        target = "metrics",
        name = "db_get_auction",
        fields(
            category = "db_queries",
            result = "success",
            name = "get_auction",
            tracing_enabled
        ),
        skip_all
    )]
    async fn get_auction(&self, auction_id: entities::AuctionId) -> Result<Auction, RestError> {
        sqlx::query_as("SELECT * FROM auction WHERE id = $1")
            .bind(auction_id)
            .fetch_one(self)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => RestError::AuctionNotFound,
                _ => {
                    tracing::Span::current().record("result", "error");
                    tracing::error!(
                        error = e.to_string(),
                        auction_id = auction_id.to_string(),
                        "Failed to get auction from db"
                    );
                    RestError::TemporarilyUnavailable
                }
            })
    }

    #[instrument(
        target = "metrics",
        name = "db_get_auctions",
        fields(
            category = "db_queries",
            result = "success",
            name = "get_auctions",
            tracing_enabled
        ),
        skip_all
    )]
    async fn get_auctions(
        &self,
        filter: entities::AuctionFilter,
        now: OffsetDateTime,
    ) -> Result<Vec<Auction>, RestError> {
        let mut query = QueryBuilder::new("SELECT * FROM auction WHERE TRUE");
        match filter.status {
            Some(entities::AuctionStatus::Active) => {
                query
                    .push(" AND status = ")
                    .push_bind(AuctionStatus::Active)
                    .push(" AND deadline > ")
                    .push_bind(to_primitive_date_time(now));
            }
            Some(entities::AuctionStatus::Completed) => {
                query
                    .push(" AND (status = ")
                    .push_bind(AuctionStatus::Completed)
                    .push(" OR deadline <= ")
                    .push_bind(to_primitive_date_time(now))
                    .push(")");
            }
            None => {}
        }
        if let Some(category) = filter.category.clone() {
            query.push(" AND category = ").push_bind(category);
        }
        if let Some(product_name) = filter.product_name.as_deref() {
            query
                .push(" AND product_name ILIKE ")
                .push_bind(format!("%{}%", escape_like_pattern(product_name)));
        }
        query.push(" ORDER BY creation_time DESC LIMIT ");
        query.push_bind(AUCTION_PAGE_SIZE_CAP as i64);
        query.build_query_as().fetch_all(self).await.map_err(|e| {
            tracing::Span::current().record("result", "error");
            tracing::error!(error = e.to_string(), filter = ?filter, "DB: Failed to fetch auctions");
            RestError::TemporarilyUnavailable
        })
    }

    #[instrument(
        target = "metrics",
        name = "db_get_active_auctions",
        fields(
            category = "db_queries",
            result = "success",
            name = "get_active_auctions",
            tracing_enabled
        ),
        skip_all
    )]
    async fn get_active_auctions(&self) -> anyhow::Result<Vec<Auction>> {
        let auctions = sqlx::query_as("SELECT * FROM auction WHERE status = $1")
            .bind(AuctionStatus::Active)
            .fetch_all(self)
            .await
            .inspect_err(|_| {
                tracing::Span::current().record("result", "error");
            })?;
        Ok(auctions)
    }

    #[instrument(
        target = "metrics",
        name = "db_get_active_auctions_past_deadline",
        fields(
            category = "db_queries",
            result = "success",
            name = "get_active_auctions_past_deadline",
            tracing_enabled
        ),
        skip_all
    )]
    async fn get_active_auctions_past_deadline(
        &self,
        now: OffsetDateTime,
    ) -> anyhow::Result<Vec<Auction>> {
        let auctions =
            sqlx::query_as("SELECT * FROM auction WHERE status = $1 AND deadline <= $2")
                .bind(AuctionStatus::Active)
                .bind(to_primitive_date_time(now))
                .fetch_all(self)
                .await
                .inspect_err(|_| {
                    tracing::Span::current().record("result", "error");
                })?;
        Ok(auctions)
    }
}
