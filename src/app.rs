use axum::{
    http::{HeaderValue, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{admin, me, public};
use crate::middleware::{auth_middleware, optional_auth_middleware, require_admin, require_member};
use crate::paths;
use crate::state::AppState;

/// The whole HTTP surface: `/`, `/health` and the three API tiers.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route(paths::api::HEALTH, get(health))
        // API tiers
        .nest(paths::api::PUBLIC, public_routes(&state))
        .nest(paths::api::ME, me_routes(&state))
        .nest(paths::api::ADMIN, admin_routes(&state))
        // Global middleware
        .layer(cors_layer(&state.config.security.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/topics", get(public::topic_list))
        .route("/topics/:id", get(public::topic_get))
        .route("/topics/:id/quizzes", get(public::topic_quizzes))
        .route("/quizzes/:id", get(public::quiz_get))
        .route("/posts", get(public::post_list))
        .route("/posts/:id", get(public::post_get))
        .route("/groups", get(public::group_list))
        .route("/users/:username", get(public::profile_get))
        .route("/avatars", get(public::avatar_list))
        .route("/config", get(public::config_get))
        // Token acquisition
        .route("/auth/register", post(public::register))
        .route("/auth/login", post(public::login))
        .route_layer(from_fn_with_state(state.clone(), optional_auth_middleware))
}

fn me_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(me::me_get).patch(me::me_patch))
        .route("/avatar", put(me::avatar_put))
        .route("/visibility", put(me::visibility_put))
        .route("/groups", get(me::my_groups).post(me::group_create))
        .route("/groups/:id/join", post(me::group_join))
        .route("/groups/:id/membership", delete(me::group_leave))
        .route("/posts", get(me::my_posts).post(me::post_create))
        .route("/posts/:id", delete(me::post_delete))
        .route("/quizzes/attempts", get(me::attempt_list))
        .route("/quizzes/:id/attempts", post(me::attempt_create))
        // Layers run bottom-up: authenticate, then check the role
        .route_layer(from_fn(require_member))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/session", get(admin::admin_session))
        .route("/config", get(admin::settings_get).put(admin::settings_put))
        .route("/users", get(admin::user_list))
        .route("/quizzes", post(admin::quiz_create))
        .route("/posts/:id", delete(admin::post_remove))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/login", post(admin::admin_login))
        .merge(protected)
}

/// `*` anywhere in the list allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Roadmap API",
            "version": version,
            "endpoints": {
                "health": paths::api::HEALTH,
                "public": format!("{}/* (optional auth)", paths::api::PUBLIC),
                "me": format!("{}/* (member token)", paths::api::ME),
                "admin": format!("{}/* (admin token, except /login)", paths::api::ADMIN),
            }
        }
    }))
}

async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": crate::messages::Message::InternalError.text(),
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, ORIGIN};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::Role;
    use crate::config::AppConfig;
    use crate::database::MemoryStore;

    fn test_state() -> AppState {
        let mut config = AppConfig::development();
        config.security.jwt_secret = "router-test".to_string();
        config.security.bcrypt_cost = 4;
        AppState::new(Arc::new(MemoryStore::new()), config)
    }

    #[tokio::test]
    async fn me_without_token_is_empty_401() {
        let app = router(test_state());

        let response = app
            .oneshot(Request::get("/api/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn member_token_is_refused_on_admin_routes() {
        let state = test_state();
        let token = state.keys.issue("alice", Role::Member).unwrap();
        let app = router(state);

        let response = app
            .oneshot(
                Request::get("/api/admin/users")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], json!(false));
    }

    #[tokio::test]
    async fn wildcard_cors_origin_allows_any() {
        let mut config = (*test_state().config).clone();
        config.security.cors_origins = vec!["https://app.example.com".to_string(), "*".to_string()];
        let app = router(AppState::new(Arc::new(MemoryStore::new()), config));

        let response = app
            .oneshot(
                Request::get("/health")
                    .header(ORIGIN, "https://elsewhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn listed_cors_origin_is_echoed() {
        let app = router(test_state());

        let response = app
            .oneshot(
                Request::get("/health")
                    .header(ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn health_reports_store() {
        let app = router(test_state());

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
