//! HTTP route definitions

use crate::{handlers, AppState};
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Liveness route, always mounted next to the signature route
pub const HEALTH_ROUTE: &str = "/health";

/// Create the main router
///
/// `state.config.signature_route` must already be validated; [`AppState::new`]
/// does that.
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route(HEALTH_ROUTE, get(handlers::health_check))
        .route(&state.config.signature_route, get(handlers::get_signature))
        .fallback(handlers::not_found);

    if state.config.cors_enabled {
        router = router.layer(cors_layer(&state.config.cors_origins));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Browsers call the signature route cross-origin, right before uploading
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SignatureServerConfig;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn router(config: SignatureServerConfig) -> Router {
        create_router(Arc::new(AppState::new(config).unwrap()))
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(SignatureServerConfig::new("sk_test"))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_custom_signature_route() {
        let mut config = SignatureServerConfig::new("sk_test");
        config.signature_route = "/sign".to_string();

        let response = router(config)
            .oneshot(Request::builder().uri("/sign").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = router(SignatureServerConfig::new("sk_test"))
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allowed_origin() {
        let mut config = SignatureServerConfig::new("sk_test");
        config.cors_origins = vec!["https://app.example.com".to_string()];

        let response = router(config)
            .oneshot(
                Request::builder()
                    .uri("/api/signature")
                    .header("origin", "https://app.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://app.example.com"
        );
    }
}
