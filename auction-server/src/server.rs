use {
    crate::{
        api,
        auction::service::{
            self as auction_service,
            Service as AuctionService,
        },
        bid::service::Service as BidService,
        config::{
            Config,
            MigrateOptions,
            RunOptions,
        },
        kernel::{
            db::DB,
            workers::run_delete_pg_db_history,
        },
        server_metrics::start_metrics,
        state::Store,
    },
    anyhow::anyhow,
    axum_prometheus::PrometheusMetricLayerBuilder,
    sqlx::{
        migrate::Migrator,
        postgres::PgPoolOptions,
    },
    std::{
        future::Future,
        sync::Arc,
    },
    tokio::sync::broadcast,
    tokio_util::{
        sync::CancellationToken,
        task::TaskTracker,
    },
};

const EVENTS_CHAN_LEN: usize = 1000;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn connect_db(database_url: &str, max_connections: u32) -> anyhow::Result<DB> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|err| anyhow!("Failed to connect to database: {:?}", err))
}

/// Runs a long lived task and cancels the shutdown token when it fails, so the other tasks stop
/// as well.
async fn fault_tolerant_handler<F>(name: String, shutdown: CancellationToken, f: F)
where
    F: Future<Output = anyhow::Result<()>>,
{
    if let Err(err) = f.await {
        tracing::error!(error = ?err, task = name, "Task failed, shutting down...");
        shutdown.cancel();
    }
}

pub async fn run_migrations(migrate_options: MigrateOptions) -> anyhow::Result<()> {
    tracing::info!("Running migrations...");
    let db = connect_db(&migrate_options.database_url, 1).await?;
    MIGRATOR
        .run(&db)
        .await
        .map_err(|err| anyhow!("Failed to run migrations: {:?}", err))?;
    tracing::info!("Migrations completed");
    Ok(())
}

pub async fn start_server(run_options: RunOptions) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            tracing::info!("Registered shutdown signal handler...");
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = ?err, "Failed to listen for the shutdown signal");
            }
            tracing::info!("Shut down signal received, waiting for tasks...");
            shutdown.cancel();
        }
    });

    let config = Config::load(&run_options.config.config).map_err(|err| {
        anyhow!(
            "Failed to load config from file({path}): {:?}",
            err,
            path = run_options.config.config
        )
    })?;
    tracing::info!(
        auction_interval = ?config.lifecycle.auction_interval,
        sweep_interval = ?config.lifecycle.sweep_interval,
        "Loaded lifecycle config"
    );

    let db = connect_db(
        &run_options.server.database_url,
        run_options.server.database_max_connections,
    )
    .await?;
    MIGRATOR
        .run(&db)
        .await
        .map_err(|err| anyhow!("Failed to run migrations: {:?}", err))?;

    let (metric_layer, metric_handle) = PrometheusMetricLayerBuilder::new()
        .with_default_metrics()
        .build_pair();

    let task_tracker = TaskTracker::new();
    let (event_sender, _) = broadcast::channel(EVENTS_CHAN_LEN);
    let auction_service = AuctionService::new(
        db.clone(),
        auction_service::Config::from(config.lifecycle),
        task_tracker.clone(),
        shutdown.clone(),
        event_sender,
    );
    let bid_service = BidService::new(db.clone(), auction_service.clone());
    let store = Arc::new(Store {
        auction_service: auction_service.clone(),
        bid_service,
    });

    auction_service.rearm_monitors().await?;

    task_tracker.spawn({
        let auction_service = auction_service.clone();
        fault_tolerant_handler(
            "sweeper".to_string(),
            shutdown.clone(),
            async move { auction_service.run_sweeper_loop().await },
        )
    });
    task_tracker.spawn({
        let db = db.clone();
        let delete_pg_rows = run_options.delete_pg_rows.clone();
        let shutdown_token = shutdown.clone();
        fault_tolerant_handler("delete history".to_string(), shutdown.clone(), async move {
            run_delete_pg_db_history(&db, delete_pg_rows, shutdown_token).await
        })
    });
    task_tracker.spawn(fault_tolerant_handler(
        "api server".to_string(),
        shutdown.clone(),
        api::start_api(run_options.clone(), store, metric_layer, shutdown.clone()),
    ));
    task_tracker.spawn(fault_tolerant_handler(
        "metrics server".to_string(),
        shutdown.clone(),
        start_metrics(run_options, metric_handle, shutdown.clone()),
    ));

    task_tracker.close();
    task_tracker.wait().await;
    tracing::info!("All tasks stopped");
    Ok(())
}
