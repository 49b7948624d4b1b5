use {
    super::{
        entities,
        service::{
            add_auction::AddAuctionInput,
            get_auction_by_id::GetAuctionByIdInput,
            get_auctions::GetAuctionsInput,
        },
    },
    crate::{
        api::RestError,
        state::Store,
    },
    axum::{
        extract::{
            Path,
            Query,
            State,
        },
        routing::get,
        Json,
        Router,
    },
    marketplace_api_types::{
        auction::{
            Auction,
            AuctionCreate,
            AuctionParams,
            AuctionStatus,
            Auctions,
            GetAuctionsQueryParams,
            ProductCondition,
        },
        ErrorBodyResponse,
    },
    std::sync::Arc,
};

impl From<ProductCondition> for entities::ProductCondition {
    fn from(condition: ProductCondition) -> Self {
        match condition {
            ProductCondition::New => entities::ProductCondition::New,
            ProductCondition::Used => entities::ProductCondition::Used,
            ProductCondition::Refurbished => entities::ProductCondition::Refurbished,
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

impl From<AuctionStatus> for entities::AuctionStatus {
    fn from(status: AuctionStatus) -> Self {
        match status {
            AuctionStatus::Active => entities::AuctionStatus::Active,
            AuctionStatus::Completed => entities::AuctionStatus::Completed,
        }
    }
}

impl From<entities::AuctionStatus> for AuctionStatus {
    fn from(status: entities::AuctionStatus) -> Self {
        match status {
            entities::AuctionStatus::Active => AuctionStatus::Active,
            entities::AuctionStatus::Completed => AuctionStatus::Completed,
        }
    }
}

impl From<AuctionCreate> for entities::AuctionCreate {
    fn from(auction_create: AuctionCreate) -> Self {
        Self {
            product_name: auction_create.product_name,
            category:     auction_create.category,
            description:  auction_create.description,
            condition:    auction_create.condition.into(),
        }
    }
}

impl From<entities::Auction> for Auction {
    fn from(auction: entities::Auction) -> Self {
        Self {
            deadline:        auction.deadline(),
            id:              auction.id,
            product_name:    auction.product_name,
            category:        auction.category,
            description:     auction.description,
            condition:       auction.condition.into(),
            status:          auction.status.into(),
            creation_time:   auction.creation_time,
            conclusion_time: auction.conclusion_time,
        }
    }
}

impl From<GetAuctionsQueryParams> for entities::AuctionFilter {
    fn from(params: GetAuctionsQueryParams) -> Self {
        Self {
            status:       params.status.map(Into::into),
            category:     params.category,
            product_name: params.product_name,
        }
    }
}

/// Create a new auction.
///
/// The auction accepts bids until its deadline, which is set by the server from the configured
/// auction interval. It is closed automatically once the deadline passes.
#[utoipa::path(post, path = "/v1/auctions", request_body = AuctionCreate, responses(
    (status = 200, description = "Auction was created successfully", body = Auction),
    (status = 400, response = ErrorBodyResponse),
),)]
pub async fn post_auction(
    State(store): State<Arc<Store>>,
    Json(auction_create): Json<AuctionCreate>,
) -> Result<Json<Auction>, RestError> {
    let auction = store
        .auction_service
        .add_auction(AddAuctionInput {
            auction_create: auction_create.into(),
        })
        .await?;
    Ok(Json(auction.into()))
}

/// List auctions, most recent first.
#[utoipa::path(get, path = "/v1/auctions", params(GetAuctionsQueryParams), responses(
    (status = 200, description = "Auctions matching the filters", body = Auctions),
    (status = 400, response = ErrorBodyResponse),
),)]
pub async fn get_auctions(
    State(store): State<Arc<Store>>,
    Query(params): Query<GetAuctionsQueryParams>,
) -> Result<Json<Auctions>, RestError> {
    let auctions = store
        .auction_service
        .get_auctions(GetAuctionsInput {
            filter: params.into(),
        })
        .await?;
    Ok(Json(Auctions {
        items: auctions.into_iter().map(Into::into).collect(),
    }))
}

/// Query an auction and its current status.
///
/// An auction past its deadline is always reported as completed.
#[utoipa::path(get, path = "/v1/auctions/{auction_id}", params(AuctionParams), responses(
    (status = 200, description = "The auction", body = Auction),
    (status = 400, response = ErrorBodyResponse),
    (status = 404, description = "Auction was not found", body = ErrorBodyResponse),
),)]
pub async fn get_auction(
    State(store): State<Arc<Store>>,
    Path(params): Path<AuctionParams>,
) -> Result<Json<Auction>, RestError> {
    let auction = store
        .auction_service
        .get_auction_by_id(GetAuctionByIdInput {
            auction_id: params.auction_id,
        })
        .await?;
    Ok(Json(auction.into()))
}

pub fn get_routes() -> Router<Arc<Store>> {
    Router::new()
        .route("/", get(get_auctions).post(post_auction))
        .route("/:auction_id", get(get_auction))
        .route("/:auction_id/winner", get(crate::bid::api::get_winning_bid))
        .route("/:auction_id/bids", get(crate::bid::api::get_auction_bids))
}
