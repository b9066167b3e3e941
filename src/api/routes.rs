//! API Routes
//!
//! Configures the Axum router with all cache service endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    apply_rules_handler, changed_handler, clear_handler, delete_handler, export_handler,
    get_config_handler, get_handler, health_handler, info_handler, invalidate_patient_handler,
    list_rules_handler, remove_rule_handler, set_handler, stats_handler, update_config_handler,
    warmup_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT|GET|DELETE /entries/:patient_id/:data_type` - Set, get or invalidate one entry
/// - `POST /entries/:patient_id/:data_type/changed` - Change detection
/// - `DELETE /entries` - Clear the cache
/// - `DELETE /patients/:patient_id` - Invalidate every entry of a patient
/// - `POST /warmup` - Write placeholders for missing entries
/// - `GET /rules`, `POST /rules/apply`, `DELETE /rules/:name` - Invalidation rules
/// - `GET /stats`, `GET /info`, `GET /export` - Diagnostics
/// - `GET|PATCH /config` - Runtime configuration
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/entries/:patient_id/:data_type",
            put(set_handler).get(get_handler).delete(delete_handler),
        )
        .route("/entries/:patient_id/:data_type/changed", post(changed_handler))
        .route("/entries", delete(clear_handler))
        .route("/patients/:patient_id", delete(invalidate_patient_handler))
        .route("/warmup", post(warmup_handler))
        .route("/rules", get(list_rules_handler))
        .route("/rules/apply", post(apply_rules_handler))
        .route("/rules/:name", delete(remove_rule_handler))
        .route("/stats", get(stats_handler))
        .route("/info", get(info_handler))
        .route("/export", get(export_handler))
        .route("/config", get(get_config_handler).patch(update_config_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::in_memory(CacheConfig::default()))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_set_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/entries/123/extracted_data")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"payload":{"background":"abc"}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/entries/nobody/ai_review")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
