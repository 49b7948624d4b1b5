use {
    super::{
        entities,
        service::{
            get_bids::GetBidsInput,
            get_winning_bid::GetWinningBidInput,
            handle_bid::HandleBidInput,
        },
    },
    crate::{
        api::RestError,
        state::Store,
    },
    axum::{
        extract::{
            Path,
            State,
        },
        routing::post,
        Json,
        Router,
    },
    marketplace_api_types::{
        auction::{
            AuctionParams,
            WinningBid,
        },
        bid::{
            Bid,
            BidCreate,
            BidResult,
            Bids,
        },
        ErrorBodyResponse,
    },
    std::sync::Arc,
};

impl From<BidCreate> for entities::BidCreate {
    fn from(bid_create: BidCreate) -> Self {
        Self {
            auction_id: bid_create.auction_id,
            user_id:    bid_create.user_id,
            amount:     bid_create.amount,
        }
    }
}

impl From<entities::Bid> for Bid {
    fn from(bid: entities::Bid) -> Self {
        Self {
            id:            bid.id,
            auction_id:    bid.auction_id,
            user_id:       bid.user_id,
            amount:        bid.amount,
            creation_time: bid.creation_time,
        }
    }
}

impl From<entities::WinningBid> for WinningBid {
    fn from(winning_bid: entities::WinningBid) -> Self {
        Self {
            auction: winning_bid.auction.into(),
            bid:     winning_bid.bid.map(Into::into),
        }
    }
}

/// Bid on an active auction.
///
/// Bids are accepted only while the auction is active and before its deadline. A bid arriving
/// later is rejected with a conflict.
#[utoipa::path(post, path = "/v1/bids", request_body = BidCreate, responses(
    (status = 200, description = "Bid was placed successfully", body = BidResult,
    example = json!({"status": "OK", "id": "beedbeed-b346-4fa1-8fab-2541a9e1872d"})),
    (status = 400, response = ErrorBodyResponse),
    (status = 404, description = "Auction was not found", body = ErrorBodyResponse),
    (status = 409, description = "Auction does not accept bids anymore", body = ErrorBodyResponse),
),)]
pub async fn post_bid(
    State(store): State<Arc<Store>>,
    Json(bid_create): Json<BidCreate>,
) -> Result<Json<BidResult>, RestError> {
    let bid = store
        .bid_service
        .handle_bid(HandleBidInput {
            bid_create: bid_create.into(),
        })
        .await?;
    Ok(Json(BidResult {
        status: "OK".to_string(),
        id:     bid.id,
    }))
}

/// Query the winning bid of an auction.
///
/// The bid with the highest amount wins, the earliest one among equal amounts. For an auction
/// without bids the bid is null.
#[utoipa::path(get, path = "/v1/auctions/{auction_id}/winner", params(AuctionParams), responses(
    (status = 200, description = "The auction and its winning bid", body = WinningBid),
    (status = 400, response = ErrorBodyResponse),
    (status = 404, description = "Auction was not found", body = ErrorBodyResponse),
),)]
pub async fn get_winning_bid(
    State(store): State<Arc<Store>>,
    Path(params): Path<AuctionParams>,
) -> Result<Json<WinningBid>, RestError> {
    let winning_bid = store
        .bid_service
        .get_winning_bid(GetWinningBidInput {
            auction_id: params.auction_id,
        })
        .await?;
    Ok(Json(winning_bid.into()))
}

/// List the bids of an auction, highest amount first.
#[utoipa::path(get, path = "/v1/auctions/{auction_id}/bids", params(AuctionParams), responses(
    (status = 200, description = "Bids of the auction", body = Bids),
    (status = 400, response = ErrorBodyResponse),
    (status = 404, description = "Auction was not found", body = ErrorBodyResponse),
),)]
pub async fn get_auction_bids(
    State(store): State<Arc<Store>>,
    Path(params): Path<AuctionParams>,
) -> Result<Json<Bids>, RestError> {
    let bids = store
        .bid_service
        .get_bids(GetBidsInput {
            auction_id: params.auction_id,
        })
        .await?;
    Ok(Json(Bids {
        items: bids.into_iter().map(Into::into).collect(),
    }))
}

pub fn get_routes() -> Router<Arc<Store>> {
    Router::new().route("/", post(post_bid))
}
