//! API Handlers
//!
//! HTTP request handlers exposing the patient cache over JSON.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::{
    CacheExport, CacheInfo, CacheKey, CacheLookup, CacheStats, DataType, MissReason,
    ParseDataTypeError, PatientCache, RuleSummary, SweepReport,
};
use crate::config::{CacheConfig, ConfigUpdate};
use crate::error::{CacheError, Result};
use crate::models::{
    ChangedResponse, ClearResponse, DeleteResponse, HasChangedRequest, HealthResponse,
    LookupResponse, PatientInvalidationResponse, RuleRemovedResponse, SetEntryRequest,
    SetResponse, VersionQuery, WarmupRequest, WarmupResponse,
};
use crate::storage::MemoryStore;

/// Application state shared across all handlers.
///
/// Holds the one cache instance built at the application root.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<PatientCache<Value>>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: Arc<PatientCache<Value>>) -> Self {
        Self { cache }
    }

    /// Creates a new AppState whose durable tier lives in process memory.
    pub fn in_memory(config: CacheConfig) -> Self {
        Self::new(Arc::new(PatientCache::new(config, Arc::new(MemoryStore::new()))))
    }
}

fn parse_key(patient_id: String, data_type: &str, version: Option<String>) -> Result<CacheKey> {
    if patient_id.is_empty() {
        return Err(CacheError::InvalidRequest("Patient id cannot be empty".to_string()));
    }
    let data_type: DataType = data_type
        .parse()
        .map_err(|e: ParseDataTypeError| CacheError::InvalidRequest(e.to_string()))?;

    let key = CacheKey::new(patient_id, data_type);
    Ok(match version {
        Some(version) => key.with_version(version),
        None => key,
    })
}

/// Handler for PUT /entries/:patient_id/:data_type
pub async fn set_handler(
    State(state): State<AppState>,
    Path((patient_id, data_type)): Path<(String, String)>,
    Json(req): Json<SetEntryRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let key = parse_key(patient_id, &data_type, req.version)?;
    state.cache.set(&key, req.payload, req.quality, req.ttl_ms).await?;

    Ok(Json(SetResponse::new(key.resolve())))
}

/// Handler for GET /entries/:patient_id/:data_type
pub async fn get_handler(
    State(state): State<AppState>,
    Path((patient_id, data_type)): Path<(String, String)>,
    Query(query): Query<VersionQuery>,
) -> Result<Json<LookupResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let key = parse_key(patient_id, &data_type, query.version)?;
    match state.cache.get(&key).await {
        CacheLookup::Hit(entry) => Ok(Json(LookupResponse::hit(entry))),
        CacheLookup::Miss(MissReason::Expired) => Err(CacheError::Expired(key.resolve())),
        CacheLookup::Miss(_) => Err(CacheError::NotFound(key.resolve())),
    }
}

/// Handler for DELETE /entries/:patient_id/:data_type
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((patient_id, data_type)): Path<(String, String)>,
    Query(query): Query<VersionQuery>,
) -> Result<Json<DeleteResponse>> {
    if let Some(error_msg) = query.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let key = parse_key(patient_id, &data_type, query.version)?;
    state.cache.invalidate(&key).await;

    Ok(Json(DeleteResponse::new(key.resolve())))
}

/// Handler for POST /entries/:patient_id/:data_type/changed
pub async fn changed_handler(
    State(state): State<AppState>,
    Path((patient_id, data_type)): Path<(String, String)>,
    Json(req): Json<HasChangedRequest>,
) -> Result<Json<ChangedResponse>> {
    let key = parse_key(patient_id, &data_type, req.version)?;
    let changed = state.cache.has_changed(&key, &req.payload).await?;

    Ok(Json(ChangedResponse {
        key: key.resolve(),
        changed,
    }))
}

/// Handler for DELETE /entries
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear().await;
    Json(ClearResponse::cleared())
}

/// Handler for DELETE /patients/:patient_id
pub async fn invalidate_patient_handler(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Json<PatientInvalidationResponse> {
    let removed = state.cache.invalidate_patient(&patient_id).await;
    Json(PatientInvalidationResponse {
        patient_id,
        removed,
    })
}

/// Handler for POST /warmup
///
/// Placeholders are JSON `null`.
pub async fn warmup_handler(
    State(state): State<AppState>,
    Json(req): Json<WarmupRequest>,
) -> Result<Json<WarmupResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let written = state.cache.warmup(&req.patients, |_| Value::Null).await?;
    Ok(Json(WarmupResponse { written }))
}

/// Handler for POST /rules/apply
pub async fn apply_rules_handler(State(state): State<AppState>) -> Json<SweepReport> {
    Json(state.cache.apply_invalidation_rules().await)
}

/// Handler for GET /rules
pub async fn list_rules_handler(State(state): State<AppState>) -> Json<Vec<RuleSummary>> {
    Json(state.cache.rules().await)
}

/// Handler for DELETE /rules/:name
pub async fn remove_rule_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RuleRemovedResponse>> {
    if !state.cache.remove_invalidation_rule(&name).await {
        return Err(CacheError::NotFound(format!("rule {}", name)));
    }
    Ok(Json(RuleRemovedResponse { name, removed: true }))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.get_stats().await)
}

/// Handler for GET /info
pub async fn info_handler(State(state): State<AppState>) -> Json<CacheInfo> {
    Json(state.cache.get_cache_info().await)
}

/// Handler for GET /export
pub async fn export_handler(State(state): State<AppState>) -> Json<CacheExport> {
    Json(state.cache.export_cache().await)
}

/// Handler for GET /config
pub async fn get_config_handler(State(state): State<AppState>) -> Json<CacheConfig> {
    Json(state.cache.get_config().await)
}

/// Handler for PATCH /config
pub async fn update_config_handler(
    State(state): State<AppState>,
    Json(update): Json<ConfigUpdate>,
) -> Json<CacheConfig> {
    Json(state.cache.update_config(update).await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
