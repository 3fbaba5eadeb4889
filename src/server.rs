//! Axum app serving the planner form and the JSON API.
//!
//! Routes:
//! - `GET /` form page (`?country=` picks the city list)
//! - `POST /plan` form submission, answered with the plan page
//! - `POST /api/plan` JSON trip request, answered with JSON
//! - `GET /api/links?hotel=&city=` booking links for one hotel
//! - `GET /api/cities?country=` cities offered for a country
//! - `GET /health`

use crate::catalog;
use crate::error::{Result, TripPlannerError};
use crate::links::{
    AffiliateWidget, BookingLinks, affiliate_widgets, booking_links, map_search_link,
};
use crate::llm::{GenerationResult, Prompts, TextGenerator};
use crate::render::{self, RawHtml};
use crate::trip::{TripForm, TripRequest};
use axum::{
    Form, Json, Router,
    extract::{
        Query, State,
        rejection::{FormRejection, JsonRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Shared, read-only state handed to every handler.
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
    pub raw_html: RawHtml,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>, raw_html: RawHtml) -> Self {
        Self {
            generator,
            raw_html,
        }
    }

    /// Build the prompt for a request and run it through the configured backend.
    async fn plan(&self, request: &TripRequest) -> GenerationResult {
        let prompt = Prompts::trip_plan(request);
        debug!(city = %request.city, days = request.days, "planning trip");
        self.generator.generate(&prompt).await
    }
}

#[derive(Debug, Deserialize)]
struct CountryQuery {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinksQuery {
    hotel: String,
    city: String,
}

/// JSON answer to `POST /api/plan`.
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub map_link: String,
    pub widgets: Vec<AffiliateWidget>,
}

impl PlanResponse {
    fn new(request: &TripRequest, result: GenerationResult) -> Self {
        let (plan, error) = match result.into_result() {
            Ok(plan) => (Some(plan), None),
            Err(message) => (None, Some(message)),
        };
        Self {
            ok: plan.is_some(),
            plan,
            error,
            map_link: map_search_link(&request.city),
            widgets: affiliate_widgets(&request.city, &request.country).to_vec(),
        }
    }
}

/// Builds the router with request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(form_handler))
        .route("/plan", post(plan_form_handler))
        .route("/api/plan", post(plan_api_handler))
        .route("/api/links", get(links_handler))
        .route("/api/cities", get(cities_handler))
        .route("/health", get(health))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until the process exits.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let addr = listener
        .local_addr()
        .map_err(|e| TripPlannerError::Http(e.to_string()))?;
    info!("trip planner listening on http://{}", addr);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| TripPlannerError::Http(e.to_string()))
}

async fn form_handler(Query(query): Query<CountryQuery>) -> Html<String> {
    Html(render::form_page(query.country.as_deref()))
}

/// Validate an extracted body.
///
/// Extractor rejections (non-numeric days, missing fields) are reported like failed
/// validation, so every bad submission gets a 400 with a message.
fn validated(form: std::result::Result<TripForm, String>) -> Result<TripRequest> {
    let form = form.map_err(TripPlannerError::InvalidRequest)?;
    TripRequest::try_from(form)
}

async fn plan_form_handler(
    State(state): State<Arc<AppState>>,
    form: std::result::Result<Form<TripForm>, FormRejection>,
) -> Response {
    let request = match validated(form.map(|Form(f)| f).map_err(|r| r.body_text())) {
        Ok(request) => request,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Html(render::error_page(&e.to_string())),
            )
                .into_response();
        }
    };

    let result = state.plan(&request).await;
    Html(render::plan_page(&request, &result, state.raw_html)).into_response()
}

async fn plan_api_handler(
    State(state): State<Arc<AppState>>,
    form: std::result::Result<Json<TripForm>, JsonRejection>,
) -> Response {
    let request = match validated(form.map(|Json(f)| f).map_err(|r| r.body_text())) {
        Ok(request) => request,
        Err(e) => {
            let body = serde_json::json!({ "ok": false, "error": e.to_string() });
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let result = state.plan(&request).await;
    Json(PlanResponse::new(&request, result)).into_response()
}

async fn links_handler(Query(query): Query<LinksQuery>) -> Json<BookingLinks> {
    Json(booking_links(&query.hotel, &query.city))
}

async fn cities_handler(Query(query): Query<CountryQuery>) -> Json<&'static [&'static str]> {
    Json(catalog::cities(query.country.as_deref().unwrap_or_default()))
}

async fn health() -> &'static str {
    "ok"
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Records prompts and answers with a fixed outcome.
    struct RecordingGenerator {
        outcome: std::result::Result<String, String>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn model(&self) -> &str {
            "none"
        }

        async fn try_generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.outcome.clone().map_err(TripPlannerError::Http)
        }

        fn describe_error(&self, err: &TripPlannerError) -> String {
            format!("❌ {}", err)
        }
    }

    fn app(outcome: std::result::Result<&str, &str>) -> (Router, Arc<RecordingGenerator>) {
        let generator = Arc::new(RecordingGenerator {
            outcome: outcome.map(str::to_string).map_err(str::to_string),
            prompts: Mutex::new(Vec::new()),
        });
        let state = Arc::new(AppState::new(generator.clone(), RawHtml::Escape));
        (router(state), generator)
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_request(body: &'static str) -> Request<Body> {
        Request::post("/plan")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_form_page() {
        let (app, _) = app(Ok("unused"));
        let request = Request::get("/?country=Italy+%F0%9F%87%AE%F0%9F%87%B9")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains(r#"<option value="Venice">"#));
    }

    #[tokio::test]
    async fn test_plan_submission_calls_generator_once() {
        let (app, generator) = app(Ok("**Day 1**: Beach"));
        let response = app
            .oneshot(form_request(
                "country=India&city=Goa&days=3&month=March&travel_style=Budget&currency=INR+%28%E2%82%B9%29&include_flights=Yes&interests=surfing",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("<strong>Day 1</strong>: Beach"));
        assert!(html.contains("View Hotels and Sights in Goa"));

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Plan a 3-day Budget trip to Goa, India in March."));
        assert!(prompts[0].contains("budget in ₹ (with flights)"));
    }

    #[tokio::test]
    async fn test_plan_failure_still_renders_links() {
        let (app, _) = app(Err("backend down"));
        let response = app
            .oneshot(form_request("country=UK&city=London&days=2&month=June"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("HTTP request failed: backend down"));
        assert!(html.contains("promo_id=4044"));
    }

    #[tokio::test]
    async fn test_invalid_days_rejected() {
        let (app, generator) = app(Ok("unused"));
        let response = app
            .oneshot(form_request("country=UK&city=London&days=21&month=June"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("days must be between 1 and 14"));
        assert!(generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_form_fields_get_400_page() {
        let bodies = [
            "country=UK&city=London&days=300&month=June",
            "country=UK&city=London&days=abc&month=June",
            "country=UK&city=London&days=3",
        ];
        for body in bodies {
            let (app, generator) = app(Ok("unused"));
            let response = app.oneshot(form_request(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            let html = body_string(response).await;
            assert!(html.contains(r#"<p class="error">Invalid trip request:"#), "body: {body}");
            assert!(html.contains("Back to the form"));
            assert!(generator.prompts.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_api_rejects_bad_json_with_400() {
        let bodies = [
            r#"{"city":"Rome","country":"Italy","days":"abc","month":"May"}"#,
            r#"{"city":"Rome","country":"Italy","days":4}"#,
            r#"{"city":"Rome","country":"Italy","days":40,"month":"May"}"#,
        ];
        for body in bodies {
            let (app, _) = app(Ok("unused"));
            let request = Request::post("/api/plan")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap();
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            let json: serde_json::Value =
                serde_json::from_str(&body_string(response).await).unwrap();
            assert_eq!(json["ok"], false);
            assert!(json["error"].as_str().unwrap().starts_with("Invalid trip request:"));
        }
    }

    #[tokio::test]
    async fn test_api_plan() {
        let (app, _) = app(Ok("# Rome"));
        let request = Request::post("/api/plan")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"city":"Rome","country":"Italy","days":4,"month":"Oct","include_flights":false}"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["plan"], "# Rome");
        assert!(json.get("error").is_none());
        assert_eq!(json["widgets"].as_array().unwrap().len(), 2);
        assert_eq!(json["widgets"][0]["kind"], "hotels");
    }

    #[tokio::test]
    async fn test_api_links() {
        let (app, _) = app(Ok("unused"));
        let response = app
            .oneshot(
                Request::get("/api/links?hotel=Grand+Hotel&city=Goa")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(
            json["booking"],
            "https://www.booking.com/searchresults.html?ss=Grand+Hotel+Goa"
        );
    }

    #[tokio::test]
    async fn test_health_and_fallback() {
        let (app, _) = app(Ok("unused"));
        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_string(response).await, "ok");

        let response = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
