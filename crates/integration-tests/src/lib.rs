//! Integration test harness for Marigold.
//!
//! Boots the real booking router against stub upstream services (catalog,
//! payment provider, confirmation endpoint) on ephemeral ports, then
//! walks the wizard over HTTP with a cookie-holding client - the same
//! way a browser session would.
//!
//! Stub behavior is switchable at runtime through [`StubControls`] so a
//! single test can e.g. break the confirmation endpoint, observe the
//! failure, and heal it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;

use marigold_booking::config::{BookingConfig, PaymentsConfig, SchedulingConfig};
use marigold_booking::state::AppState;
use marigold_core::WizardOptions;

/// Runtime switches and counters for the stub upstreams.
#[derive(Debug, Default)]
pub struct StubControls {
    /// Serve an empty stylist roster.
    pub empty_stylists: AtomicBool,
    /// Make intent creation return 500.
    pub fail_intent: AtomicBool,
    /// Make the confirmation endpoint return 500.
    pub fail_confirmation: AtomicBool,
    /// How many intents the provider has created.
    pub intents_created: AtomicUsize,
    /// How many bookings the scheduling backend has confirmed.
    pub confirmations: AtomicUsize,
}

impl StubControls {
    pub fn set_empty_stylists(&self, v: bool) {
        self.empty_stylists.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_intent(&self, v: bool) {
        self.fail_intent.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_confirmation(&self, v: bool) {
        self.fail_confirmation.store(v, Ordering::SeqCst);
    }

    #[must_use]
    pub fn intents_created(&self) -> usize {
        self.intents_created.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn confirmations(&self) -> usize {
        self.confirmations.load(Ordering::SeqCst)
    }
}

/// A running booking service wired to stub upstreams.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
    pub stub: Arc<StubControls>,
}

impl TestContext {
    /// Boot the stubs and the booking service.
    ///
    /// # Panics
    ///
    /// Panics when a listener or client cannot be set up - tests cannot
    /// proceed without them.
    pub async fn new() -> Self {
        let stub = Arc::new(StubControls::default());

        let stub_url = serve(stub_router(Arc::clone(&stub))).await;
        let upstream = Url::parse(&format!("{stub_url}/")).expect("stub URL parses");

        let config = BookingConfig {
            host: "127.0.0.1".parse().expect("loopback parses"),
            port: 0,
            base_url: "http://booking.test".to_string(),
            session_secret: SecretString::from("kQ2!vX8@rT5#mW1$pZ9&nB4^jC7*fH3%"),
            scheduling: SchedulingConfig {
                base_url: upstream.clone(),
                api_key: SecretString::from("sched_kQ2vX8rT5mW1pZ9n"),
            },
            payments: PaymentsConfig {
                base_url: upstream,
                secret_key: SecretString::from("pay_kQ2vX8rT5mW1pZ9n"),
                publishable_key: "pk_test_marigold".to_string(),
            },
            wizard: WizardOptions::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let state = AppState::new(config).expect("application state builds");
        let base_url = serve(marigold_booking::app(state)).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("HTTP client builds");

        Self {
            client,
            base_url,
            stub,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path and parse the JSON body.
    pub async fn get_json(&self, path: &str) -> Value {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("request succeeds");
        response.json().await.expect("JSON body")
    }

    /// POST with an empty body, returning the raw response.
    pub async fn post(&self, path: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .send()
            .await
            .expect("request succeeds")
    }

    /// POST a JSON body, returning the raw response.
    pub async fn post_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("request succeeds")
    }

    /// PATCH a JSON body, returning the raw response.
    pub async fn patch_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .patch(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("request succeeds")
    }
}

/// Bind an ephemeral port and serve the router in the background.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port binds");
    let addr = listener.local_addr().expect("bound address");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server runs");
    });

    format!("http://{addr}")
}

// =============================================================================
// Stub upstreams
// =============================================================================

fn stub_router(controls: Arc<StubControls>) -> Router {
    Router::new()
        .route("/services", get(stub_services))
        .route("/stylists", get(stub_stylists))
        .route("/payment-intents", post(stub_create_intent))
        .route("/appointments", post(stub_confirm))
        .with_state(controls)
}

async fn stub_services() -> Json<Value> {
    Json(json!([
        {
            "id": "svc1",
            "name": "Haircut",
            "description": "Cut and style",
            "price": "45.00",
            "duration_minutes": 45
        },
        {
            "id": "svc2",
            "name": "Color",
            "price": "120.00",
            "duration_minutes": 90
        }
    ]))
}

async fn stub_stylists(State(controls): State<Arc<StubControls>>) -> Json<Value> {
    if controls.empty_stylists.load(Ordering::SeqCst) {
        Json(json!([]))
    } else {
        Json(json!([
            {"id": "sty1", "name": "Robin", "specializations": ["color"]},
            {"id": "sty2", "name": "Sam"}
        ]))
    }
}

async fn stub_create_intent(State(controls): State<Arc<StubControls>>) -> Response {
    if controls.fail_intent.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "provider exploded"})),
        )
            .into_response();
    }

    controls.intents_created.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "client_secret": "sec_1",
        "amount": 4500,
        "payment_intent_id": "pi_1"
    }))
    .into_response()
}

async fn stub_confirm(State(controls): State<Arc<StubControls>>) -> Response {
    if controls.fail_confirmation.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "scheduling backend exploded"})),
        )
            .into_response();
    }

    let n = controls.confirmations.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({
        "appointment": {
            "id": 42,
            "confirmation_number": format!("MG-{n:04}")
        }
    }))
    .into_response()
}
