use {
    crate::{
        auction,
        bid,
        config::RunOptions,
        state::Store,
    },
    anyhow::Result,
    axum::{
        http::StatusCode,
        response::{
            IntoResponse,
            Response,
        },
        routing::get,
        Json,
        Router,
    },
    axum_prometheus::PrometheusMetricLayer,
    clap::crate_version,
    marketplace_api_types::{
        auction::{
            Auction,
            AuctionCreate,
            AuctionStatus,
            Auctions,
            ProductCondition,
            WinningBid,
        },
        bid::{
            Bid,
            BidCreate,
            BidResult,
            Bids,
        },
        ErrorBodyResponse,
        Route,
    },
    std::sync::Arc,
    tokio_util::sync::CancellationToken,
    tower_http::cors::CorsLayer,
    utoipa::OpenApi,
    utoipa_redoc::{
        Redoc,
        Servable,
    },
};

async fn root() -> String {
    format!("Auction Marketplace Server API {}", crate_version!())
}

#[derive(Debug, Clone, PartialEq)]
pub enum RestError {
    /// The request contained invalid parameters
    BadParameters(String),
    /// The auction was not found
    AuctionNotFound,
    /// The auction is not active or its deadline has passed
    AuctionClosed,
    /// Internal error occurred during processing the request
    TemporarilyUnavailable,
}

impl RestError {
    pub fn to_status_and_message(&self) -> (StatusCode, String) {
        match self {
            RestError::BadParameters(msg) => {
                (StatusCode::BAD_REQUEST, format!("Bad parameters: {}", msg))
            }
            RestError::AuctionNotFound => (
                StatusCode::NOT_FOUND,
                "Auction with the specified id was not found".to_string(),
            ),
            RestError::AuctionClosed => (
                StatusCode::CONFLICT,
                "Auction is closed and does not accept bids".to_string(),
            ),
            RestError::TemporarilyUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "This service is temporarily unavailable".to_string(),
            ),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let (status, msg) = self.to_status_and_message();
        (status, Json(ErrorBodyResponse { error: msg })).into_response()
    }
}

pub async fn live() -> Response {
    (StatusCode::OK, "OK").into_response()
}

// Make sure functions included in the paths section have distinct names, otherwise some api generators will fail
#[derive(OpenApi)]
#[openapi(
    paths(
        auction::api::post_auction,
        auction::api::get_auctions,
        auction::api::get_auction,
        bid::api::post_bid,
        bid::api::get_winning_bid,
        bid::api::get_auction_bids,
    ),
    components(
        schemas(
            Auction,
            AuctionCreate,
            AuctionStatus,
            Auctions,
            ProductCondition,
            WinningBid,
            Bid,
            BidCreate,
            BidResult,
            Bids,
            ErrorBodyResponse,
        ),
        responses(
            ErrorBodyResponse,
            Auction,
            BidResult,
        ),
    ),
    tags(
        (name = "Auction Marketplace Server", description = "Auction Marketplace Server runs timed auctions. \
        It accepts bids until the deadline of each auction, closes it and resolves its winner.")
    )
)]
struct ApiDoc;

pub async fn start_api(
    run_options: RunOptions,
    store: Arc<Store>,
    metric_layer: PrometheusMetricLayer<'static>,
    shutdown: CancellationToken,
) -> Result<()> {
    let v1_routes = Router::new().nest(
        Route::V1.as_ref(),
        Router::new()
            .nest(Route::Auction.as_ref(), auction::api::get_routes())
            .nest(Route::Bid.as_ref(), bid::api::get_routes()),
    );

    let app: Router<()> = Router::new()
        .merge(Redoc::with_url(Route::Docs.as_ref(), ApiDoc::openapi()))
        .merge(v1_routes)
        .route(Route::Root.as_ref(), get(root))
        .route(Route::Liveness.as_ref(), get(live))
        .layer(CorsLayer::permissive())
        .layer(metric_layer)
        .with_state(store);

    let listener = tokio::net::TcpListener::bind(&run_options.server.listen_addr).await?;
    tracing::info!(listen_addr = %run_options.server.listen_addr, "Starting REST API...");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            tracing::info!("Shutting down RPC server...");
        })
        .await?;
    Ok(())
}
