use {
    crate::{
        auction::repository::{
            to_primitive_date_time,
            AuctionStatus,
        },
        config::DeletePgRowsOptions,
        kernel::db::DB,
    },
    axum_prometheus::metrics,
    std::time::Duration,
    time::{
        OffsetDateTime,
        PrimitiveDateTime,
    },
    tokio_util::sync::CancellationToken,
    tracing::instrument,
};

const DELETE_BATCH_SIZE: u64 = 5000;

/// Periodically removes auctions concluded longer ago than the threshold, together with their
/// bids. Active auctions are never touched.
pub async fn run_delete_pg_db_history(
    db: &DB,
    delete_pg_rows_options: DeletePgRowsOptions,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    if delete_pg_rows_options.delete_enabled {
        let delete_interval_secs = delete_pg_rows_options.delete_interval_secs;
        let delete_threshold_secs = delete_pg_rows_options.delete_threshold_secs;

        tracing::info!("Starting delete PG DB history worker, deleting every {} seconds rows that are {} seconds stale...", delete_interval_secs, delete_threshold_secs);
        let mut delete_history_interval =
            tokio::time::interval(Duration::from_secs(delete_interval_secs));

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = delete_history_interval.tick() => {
                    if let Err(e) = delete_pg_db_auction_history(db, delete_threshold_secs).await {
                        tracing::warn!(error = ?e, "Skipping PG DB history deletion cycle");
                    }
                }
            }
        }
        tracing::info!("Shutting down delete PG DB history worker...");
        Ok(())
    } else {
        tracing::info!("Skipping PG DB history deletion loop...");
        Ok(())
    }
}

fn get_delete_threshold(now: OffsetDateTime, delete_threshold_secs: u64) -> PrimitiveDateTime {
    to_primitive_date_time(now - Duration::from_secs(delete_threshold_secs))
}

#[instrument(
    target = "metrics",
    name = "db_delete_pg_auction_history",
    fields(category = "db_queries", result = "success", name = "delete_pg_auction_history", tracing_enabled),
    skip_all
)]
pub async fn delete_pg_db_auction_history(
    db: &DB,
    delete_threshold_secs: u64,
) -> anyhow::Result<()> {
    let threshold = get_delete_threshold(OffsetDateTime::now_utc(), delete_threshold_secs);
    let n_auctions_deleted = sqlx::query(
        "WITH rows_to_delete AS (
            SELECT id FROM auction WHERE status = $1 AND conclusion_time < $2 LIMIT $3
        ) DELETE FROM auction WHERE id IN (SELECT id FROM rows_to_delete)",
    )
    .bind(AuctionStatus::Completed)
    .bind(threshold)
    .bind(DELETE_BATCH_SIZE as i64)
    .execute(db)
    .await
    .map_err(|e| {
        tracing::Span::current().record("result", "error");
        tracing::error!("Failed to delete PG DB auction history: {}", e);
        e
    })?
    .rows_affected();

    metrics::histogram!("db_delete_pg_auction_count").record(n_auctions_deleted as f64);

    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        sqlx::postgres::PgPoolOptions,
        time::macros::datetime,
    };

    #[test]
    fn test_delete_threshold() {
        let now = datetime!(2024-10-19 12:00:00 +02:00);
        assert_eq!(
            get_delete_threshold(now, 3600),
            datetime!(2024-10-19 09:00:00)
        );
    }

    #[tokio::test]
    async fn test_delete_worker_disabled() {
        let db = DB::connect_lazy("postgres://localhost/unused").unwrap();
        let options = DeletePgRowsOptions {
            delete_enabled:        false,
            delete_interval_secs:  1,
            delete_threshold_secs: 1,
        };
        run_delete_pg_db_history(&db, options, CancellationToken::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_worker_survives_store_errors() {
        let db: DB = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(100))
            .connect_lazy("postgres://127.0.0.1:1/marketplace")
            .unwrap();
        let options = DeletePgRowsOptions {
            delete_enabled:        true,
            delete_interval_secs:  1,
            delete_threshold_secs: 1,
        };
        let shutdown = CancellationToken::new();
        let worker = tokio::spawn({
            let shutdown = shutdown.clone();
            async move { run_delete_pg_db_history(&db, options, shutdown).await }
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!worker.is_finished());
        assert!(!shutdown.is_cancelled());

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), worker)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
