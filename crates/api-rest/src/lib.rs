//! # API REST
//!
//! REST API for the MDM drafting engine.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for request/response types and `preferences` for per-request overrides.

#![warn(rust_2018_idioms)]

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    ConditionRes, DraftMode, DraftReq, DraftRes, ErrorRes, FactsReq, FactsRes, HealthRes,
    HealthService, ListConditionsRes, SuggestionRes, SuggestionsRes,
};
use mdm_core::{registry, Configuration, EngineError, NoteEngine};
use preferences::Preferences;

/// Application state shared by all request handlers.
#[derive(Clone)]
struct AppState {
    engine: NoteEngine,
}

type ApiError = (StatusCode, Json<ErrorRes>);

#[derive(OpenApi)]
#[openapi(
    paths(health, list_conditions, suggestions, draft, facts),
    components(schemas(
        HealthRes,
        ConditionRes,
        ListConditionsRes,
        SuggestionRes,
        SuggestionsRes,
        DraftMode,
        DraftReq,
        DraftRes,
        FactsReq,
        FactsRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
///
/// # Arguments
/// * `config` - The clinician configuration every request starts from.
pub fn router(config: Arc<Configuration>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/conditions", get(list_conditions))
        .route("/suggestions/:prefix", get(suggestions))
        .route("/draft", post(draft))
        .route("/facts", post(facts))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState {
            engine: NoteEngine::new(config),
        })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/conditions",
    responses(
        (status = 200, description = "Registered conditions in detection order", body = ListConditionsRes)
    )
)]
#[axum::debug_handler]
async fn list_conditions() -> Json<ListConditionsRes> {
    Json(ListConditionsRes {
        conditions: registry::registry().iter().map(ConditionRes::from).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/suggestions/{prefix}",
    params(("prefix" = String, Path, description = "Command token typed so far, for example `.h`")),
    responses(
        (status = 200, description = "Aliases starting with the prefix", body = SuggestionsRes)
    )
)]
#[axum::debug_handler]
async fn suggestions(Path(prefix): Path<String>) -> Json<SuggestionsRes> {
    Json(SuggestionsRes {
        suggestions: registry::suggest(&prefix)
            .into_iter()
            .map(|condition| SuggestionRes::from(condition.suggestion()))
            .collect(),
    })
}

#[utoipa::path(
    post,
    path = "/draft",
    request_body = DraftReq,
    responses(
        (status = 200, description = "Drafted document", body = DraftRes),
        (status = 400, description = "Invalid preference overrides", body = ErrorRes),
        (status = 404, description = "Unknown command, with alias suggestions", body = ErrorRes),
        (status = 422, description = "No condition detected", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Drafts a document from free text or a command line.
///
/// # Errors
/// - `400 Bad Request` if the preference overrides do not fit the configuration schema.
/// - `404 Not Found` if a command alias is not registered.
/// - `422 Unprocessable Entity` if free text matches no condition.
#[axum::debug_handler]
async fn draft(
    State(state): State<AppState>,
    Json(req): Json<DraftReq>,
) -> Result<Json<DraftRes>, ApiError> {
    let engine = match &req.preferences {
        Some(overrides) => {
            let config = Preferences::merge_overrides(state.engine.config(), overrides)
                .map_err(|e| (StatusCode::BAD_REQUEST, Json(ErrorRes::new(e.to_string()))))?;
            NoteEngine::new(Arc::new(config))
        }
        None => state.engine.clone(),
    };

    match engine.draft(&req.text, req.mode.into()) {
        Ok(draft) => Ok(Json(DraftRes::from_draft(draft))),
        Err(EngineError::NoConditionDetected) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorRes::new(EngineError::NoConditionDetected.to_string())),
        )),
        Err(EngineError::UnknownCommand { token, suggestions }) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorRes {
                error: format!("unknown command: {token}"),
                suggestions: suggestions.into_iter().map(SuggestionRes::from).collect(),
            }),
        )),
        Err(e) => {
            tracing::error!("Draft error: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes::new("Internal error")),
            ))
        }
    }
}

#[utoipa::path(
    post,
    path = "/facts",
    request_body = FactsReq,
    responses(
        (status = 200, description = "Facts extracted from the text", body = FactsRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn facts(Json(req): Json<FactsReq>) -> Result<Json<FactsRes>, ApiError> {
    let facts = mdm_core::extract(&req.text);
    match serde_json::to_value(&facts) {
        Ok(facts) => Ok(Json(FactsRes { facts })),
        Err(e) => {
            tracing::error!("Facts serialization error: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes::new("Internal error")),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(Configuration::default()))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["conditions"], 10);
    }

    #[tokio::test]
    async fn test_conditions_in_registry_order() {
        let req = Request::builder().uri("/conditions").body(Body::empty()).unwrap();
        let body = body_json(app().oneshot(req).await.unwrap()).await;

        assert_eq!(body["conditions"][0]["alias"], ".pf");
        assert_eq!(body["conditions"][9]["billing_code"], "L3000");
    }

    #[tokio::test]
    async fn test_suggestions() {
        let req = Request::builder()
            .uri("/suggestions/.h")
            .body(Body::empty())
            .unwrap();
        let body = body_json(app().oneshot(req).await.unwrap()).await;
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_draft_free_text() {
        let req = post_json(
            "/draft",
            json!({"text": "Achilles tendinopathy, chronic, patient asking about cortisone shot"}),
        );
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["condition"]["id"], "achilles");
        assert!(body["document"]
            .as_str()
            .unwrap()
            .contains("contraindicated for Achilles tendon pathology"));
    }

    #[tokio::test]
    async fn test_draft_command_with_overrides() {
        let req = post_json(
            "/draft",
            json!({
                "text": ".pf left +inj",
                "mode": "command",
                "preferences": {"clinician_name": "Dr Rivera", "documentation": {"include_billing_codes": false}}
            }),
        );
        let body = body_json(app().oneshot(req).await.unwrap()).await;
        let document = body["document"].as_str().unwrap();

        assert!(document.contains("Dr Rivera"));
        assert!(!document.contains("BILLING:"));
        assert_eq!(body["laterality"], "left");
    }

    #[tokio::test]
    async fn test_draft_errors() {
        let response = app()
            .oneshot(post_json("/draft", json!({"text": "patient doing fine, see you next year"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app()
            .oneshot(post_json("/draft", json!({"text": ".h left", "mode": "command"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);

        let response = app()
            .oneshot(post_json(
                "/draft",
                json!({"text": ".pf", "mode": "command", "preferences": {"unknown": 1}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_facts() {
        let response = app()
            .oneshot(post_json("/facts", json!({"text": "declined injection today, right heel"})))
            .await
            .unwrap();
        let body = body_json(response).await;

        assert_eq!(body["facts"]["declined"]["injection"], true);
        assert_eq!(body["facts"]["procedures"]["injection"], false);
        assert_eq!(body["facts"]["laterality"], "right");
    }
}
