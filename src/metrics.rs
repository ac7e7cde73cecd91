use axum::{routing::get, Router};
use metrics::{describe_counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder once per process; later calls reuse it.
    pub fn init() -> anyhow::Result<Self> {
        let handle = HANDLE.get_or_try_init(|| {
            let handle = PrometheusBuilder::new().install_recorder()?;

            describe_counter!("rent_split_allocations_total", "Successful /allocate calls");
            describe_counter!("rent_split_rebalances_total", "Weight rebalance calls");
            describe_counter!(
                "rent_split_equal_split_fallback_total",
                "Allocations that fell back to an equal split"
            );
            describe_counter!("rent_split_usage_total", "Usage counter increments by stat");
            describe_counter!("rent_split_suggestions_total", "AI suggestions by outcome");
            gauge!("rent_split_weight_total").set(100.0);

            Ok::<_, anyhow::Error>(handle)
        })?;
        Ok(Self {
            handle: handle.clone(),
        })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
