use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::allocation::{SplitRequest, SplitSummary};
use crate::config::ai::AiConfig;
use crate::config::AppConfig;
use crate::error::SplitError;
use crate::rebalance::rebalance;
use crate::room::{sample_rooms, Room};
use crate::share::{Base64JsonCodec, ShareCodec};
use crate::stats::{InMemoryCounters, StatName, UsageCounters};
use crate::suggest::{
    build_suggester, suggest_weights, DynSuggester, Suggestion, Unavailable,
};
use crate::weights::{WeightField, WeightVector};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub counters: Arc<dyn UsageCounters>,
    pub suggester: DynSuggester,
    pub codec: Arc<dyn ShareCodec>,
}

impl AppState {
    /// Wire collaborators from config: in-memory counters, base64 share codec,
    /// and whichever AI provider `ai_config_path` selects.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let ai_cfg = AiConfig::load_or_disabled(&config.ai_config_path)?;
        info!(
            target: "api",
            "AI cfg loaded: provider={}, enabled={}, key_len={}",
            ai_cfg.provider,
            ai_cfg.enabled,
            ai_cfg.api_key.len()
        );
        let suggester = build_suggester(&ai_cfg)?;
        Ok(Self {
            counters: Arc::new(InMemoryCounters::with_seed(&config.counter_seed)),
            codec: Arc::new(Base64JsonCodec::with_max_len(config.max_share_token_len)),
            suggester,
            config: Arc::new(config),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/defaults", get(defaults))
        .route("/allocate", post(allocate))
        .route("/rebalance", post(rebalance_weights))
        .route("/share", post(create_share))
        .route("/share/{token}", get(open_share))
        .route("/suggest", post(suggest))
        .route("/stats", get(stats))
        .route("/stats/{stat}", post(bump_stat))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/* ----------------------------
Errors
---------------------------- */

/// Handler error: input problems are 400, advisory collaborator failures are 502/503.
#[derive(Debug)]
pub enum ApiError {
    Invalid(SplitError),
    NotFound(String),
    Advisory(anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl From<SplitError> for ApiError {
    fn from(e: SplitError) -> Self {
        ApiError::Invalid(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Invalid(e) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: e.kind(),
                    message: e.to_string(),
                },
            ),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "not_found",
                    message: what,
                },
            ),
            ApiError::Advisory(e) => {
                let status = if e.downcast_ref::<Unavailable>().is_some() {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    StatusCode::BAD_GATEWAY
                };
                (
                    status,
                    ErrorBody {
                        error: "ai_unavailable",
                        message: format!("{e:#}"),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/* ----------------------------
Handlers
---------------------------- */

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DefaultsResp {
    currency: String,
    weights: WeightVector,
    rooms: Vec<Room>,
}

async fn defaults(State(state): State<AppState>) -> Json<DefaultsResp> {
    Json(DefaultsResp {
        currency: state.config.default_currency.clone(),
        weights: state.config.default_weights,
        rooms: sample_rooms(),
    })
}

async fn allocate(Json(req): Json<SplitRequest>) -> Result<Json<SplitSummary>, ApiError> {
    let summary = req.calculate()?;
    counter!("rent_split_allocations_total").increment(1);
    if summary.results.iter().all(|r| r.raw_score == 0.0) {
        counter!("rent_split_equal_split_fallback_total").increment(1);
    }
    info!(
        target: "api",
        rooms = summary.results.len(),
        total = summary.total_rent,
        "allocated"
    );
    Ok(Json(summary))
}

#[derive(Deserialize)]
struct RebalanceReq {
    weights: WeightVector,
    field: WeightField,
    value: i64,
}

async fn rebalance_weights(Json(body): Json<RebalanceReq>) -> Json<WeightVector> {
    counter!("rent_split_rebalances_total").increment(1);
    Json(rebalance(body.weights, body.field, body.value))
}

#[derive(Serialize)]
struct ShareResp {
    token: String,
}

async fn create_share(
    State(state): State<AppState>,
    Json(req): Json<SplitRequest>,
) -> Result<Json<ShareResp>, ApiError> {
    let token = state.codec.encode(&req)?;
    state.counters.increment(StatName::Links);
    state.counters.increment(StatName::Helped);
    info!(target: "api", id = %anon_hash(&token), len = token.len(), "share link created");
    Ok(Json(ShareResp { token }))
}

async fn open_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<SplitRequest>, ApiError> {
    match state.codec.decode(&token) {
        Ok(req) => Ok(Json(req)),
        Err(e) => {
            warn!(target: "api", id = %anon_hash(&token), error = %e, "could not load share link");
            Err(e.into())
        }
    }
}

#[derive(Deserialize)]
struct SuggestReq {
    rooms: Vec<Room>,
}

async fn suggest(
    State(state): State<AppState>,
    Json(body): Json<SuggestReq>,
) -> Result<Json<Suggestion>, ApiError> {
    if body.rooms.is_empty() {
        return Err(SplitError::NoRooms.into());
    }
    for (i, room) in body.rooms.iter().enumerate() {
        room.validate(i)?;
    }
    suggest_weights(state.suggester.as_ref(), &body.rooms)
        .await
        .map(Json)
        .map_err(|e| match e.downcast::<SplitError>() {
            Ok(split) => ApiError::Advisory(anyhow::anyhow!("provider returned {split}")),
            Err(other) => ApiError::Advisory(other),
        })
}

async fn stats(State(state): State<AppState>) -> Json<BTreeMap<StatName, u64>> {
    Json(state.counters.snapshot())
}

#[derive(Serialize)]
struct StatResp {
    stat: StatName,
    value: u64,
}

async fn bump_stat(
    State(state): State<AppState>,
    Path(stat): Path<String>,
) -> Result<Json<StatResp>, ApiError> {
    let stat: StatName = stat.parse().map_err(ApiError::NotFound)?;
    let value = state.counters.increment(stat);
    Ok(Json(StatResp { stat, value }))
}

/// Short stable id for a token so logs never carry the payload itself.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
