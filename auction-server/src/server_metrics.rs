use {
    crate::config::RunOptions,
    anyhow::Result,
    axum::{
        routing::get,
        Router,
    },
    axum_prometheus::{
        metrics,
        metrics_exporter_prometheus::PrometheusHandle,
    },
    std::{
        fmt::Debug,
        time::Instant,
    },
    tokio_util::sync::CancellationToken,
    tracing::{
        field::{
            Field,
            Visit,
        },
        span::{
            Attributes,
            Record,
        },
        Id,
        Metadata,
    },
    tracing_subscriber::{
        layer::Context,
        registry::LookupSpan,
        Layer,
    },
};

/// Counter of the auction lifecycle events, labeled by event name.
pub const LIFECYCLE_EVENTS_METRIC: &str = "lifecycle_events_total";

/// Latency and outcome of a `target = "metrics"` span, recorded once the span closes.
#[derive(Debug, Clone)]
struct SpanMetrics {
    category:   String,
    name:       String,
    result:     String,
    started_at: Instant,
}

impl SpanMetrics {
    fn new(name: &str) -> Self {
        Self {
            category:   "unknown".to_string(),
            name:       name.to_string(),
            result:     "unknown".to_string(),
            started_at: Instant::now(),
        }
    }

    fn record(&self) {
        let latency = self.started_at.elapsed().as_secs_f64();
        let labels = [("name", self.name.clone()), ("result", self.result.clone())];
        metrics::histogram!(format!("{}_duration_seconds", self.category), &labels)
            .record(latency);
        metrics::counter!(format!("{}_total", self.category), &labels).increment(1);
    }
}

impl Visit for SpanMetrics {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "category" => self.category = value.to_string(),
            "name" => self.name = value.to_string(),
            "result" => self.result = value.to_string(),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "result" {
            self.result = format!("{:?}", value);
        }
    }
}

/// Turns the spans of the store calls into `<category>_total` and
/// `<category>_duration_seconds` series labeled by name and result.
pub struct MetricsLayer;

pub fn is_metrics(metadata: &Metadata, check_tracing_enabled: bool) -> bool {
    let tracing_check = !check_tracing_enabled
        || metadata
            .fields()
            .iter()
            .any(|f| f.name() == "tracing_enabled");
    tracing_check && metadata.target().starts_with("metrics")
}

impl<S> Layer<S> for MetricsLayer
where
    S: tracing::Subscriber,
    S: for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            tracing::error!("span not found: {:?}", id);
            return;
        };
        let mut data = SpanMetrics::new(span.name());
        attrs.record(&mut data);
        span.extensions_mut().replace(data);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            if let Some(data) = span.extensions_mut().get_mut::<SpanMetrics>() {
                values.record(data);
            }
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let data = ctx
            .span(&id)
            .and_then(|span| span.extensions().get::<SpanMetrics>().cloned());
        match data {
            Some(data) => data.record(),
            None => tracing::warn!("metrics not found for span: {:?}", id),
        }
    }
}

/// Serves the collected metrics over /metrics in OpenMetrics format.
pub async fn start_metrics(
    run_options: RunOptions,
    metric_handle: PrometheusHandle,
    shutdown: CancellationToken,
) -> Result<()> {
    tracing::info!("Starting Metrics Server...");

    let app = Router::new();
    let app = app.route("/metrics", get(|| async move { metric_handle.render() }));

    let listener = tokio::net::TcpListener::bind(&run_options.server.metrics_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            tracing::info!("Shutting down metrics server...");
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            auction::repository::Database,
            kernel::db::DB,
        },
        axum_prometheus::metrics_exporter_prometheus::PrometheusBuilder,
        sqlx::postgres::PgPoolOptions,
        std::time::Duration,
        tracing_subscriber::{
            filter::filter_fn,
            layer::SubscriberExt,
        },
    };

    fn find_line<'a>(rendered: &'a str, prefix: &str) -> Option<&'a str> {
        rendered.lines().find(|line| line.starts_with(prefix))
    }

    fn render_with_metrics_layer(f: impl FnOnce()) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let subscriber = tracing_subscriber::registry()
            .with(MetricsLayer.with_filter(filter_fn(|metadata| is_metrics(metadata, true))));
        metrics::with_local_recorder(&recorder, || {
            tracing::subscriber::with_default(subscriber, f)
        });
        handle.render()
    }

    #[test]
    fn test_failed_store_call_is_recorded_as_error() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let rendered = render_with_metrics_layer(|| {
            runtime.block_on(async {
                let db: DB = PgPoolOptions::new()
                    .acquire_timeout(Duration::from_millis(200))
                    .connect_lazy("postgres://127.0.0.1:1/marketplace")
                    .unwrap();
                assert!(db.get_active_auctions().await.is_err());
            })
        });

        let line = find_line(&rendered, "db_queries_total{").unwrap();
        assert!(line.contains("name=\"get_active_auctions\""));
        assert!(line.contains("result=\"error\""));
        assert!(line.ends_with(" 1"));
        assert!(find_line(&rendered, "db_queries_duration_seconds_count{").is_some());
    }

    #[test]
    fn test_only_metrics_spans_are_recorded() {
        let rendered = render_with_metrics_layer(|| {
            let span = tracing::info_span!(
                target: "metrics",
                "db_conclude_auction",
                category = "db_queries",
                result = "success",
                name = "conclude_auction",
                tracing_enabled = tracing::field::Empty,
            );
            drop(span);
            let span = tracing::info_span!("sweep_auctions", category = "lifecycle");
            drop(span);
        });

        let line = find_line(&rendered, "db_queries_total{").unwrap();
        assert!(line.contains("name=\"conclude_auction\""));
        assert!(line.contains("result=\"success\""));
        assert!(!rendered.contains("lifecycle_total"));
    }
}
