//! HTTP surface: the search form, its results and a JSON search endpoint

pub mod access;
pub mod api;
pub mod form;
pub mod pages;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Form, Query, State};
use axum::http::Uri;
use axum::response::Html;
use axum::{Router, middleware, routing::get};
use chrono::NaiveDate;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::planner::TripPlanner;
use form::TravelForm;

const MAX_FORM_BYTES: usize = 16 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner>,
    /// Shared secret required as `?key=`; `None` disables the gate
    pub access_key: Option<String>,
    /// Date the month scans start from
    pub today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl AppState {
    pub fn new(planner: TripPlanner, access_key: Option<String>) -> Self {
        Self {
            planner: Arc::new(planner),
            access_key: access_key.filter(|key| !key.is_empty()),
            today: local_today,
        }
    }

    #[must_use]
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/travel", get(travel_get).post(travel_post))
        .nest("/api", api::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            access::require_access_key,
        ))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<AppState>, uri: Uri) -> Html<String> {
    let values = TravelForm::default().resolve((state.today)());
    let key = access::provided_key(&uri);
    Html(pages::travel_page(&values, key.as_deref(), None, None))
}

async fn travel_get(
    State(state): State<AppState>,
    uri: Uri,
    Query(form): Query<TravelForm>,
) -> Html<String> {
    render_search(&state, &uri, form).await
}

async fn travel_post(
    State(state): State<AppState>,
    uri: Uri,
    Form(form): Form<TravelForm>,
) -> Html<String> {
    render_search(&state, &uri, form).await
}

/// Run the submitted search and render the page. Failures become the page's error block.
async fn render_search(state: &AppState, uri: &Uri, form: TravelForm) -> Html<String> {
    let today = (state.today)();
    let values = form.resolve(today);
    let key = access::provided_key(uri);

    if !form.is_submission() {
        return Html(pages::travel_page(&values, key.as_deref(), None, None));
    }

    let outcome = match values.to_request() {
        Ok(request) => state.planner.search(&request, today).await,
        Err(e) => Err(e),
    };
    match outcome {
        Ok(outcome) => Html(pages::travel_page(&values, key.as_deref(), Some(&outcome), None)),
        Err(e) => {
            warn!("{} search failed: {}", values.mode, e);
            let message = e.user_message();
            Html(pages::travel_page(&values, key.as_deref(), None, Some(&message)))
        }
    }
}

/// Bind and serve until the process stops. Uses TLS when the `tls` feature is
/// enabled and both certificate paths are configured.
pub async fn serve(config: &ServerConfig, app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;

    #[cfg(feature = "tls")]
    if let (Some(cert), Some(key)) = (&config.tls_cert_path, &config.tls_key_path) {
        let tls = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert, key)
            .await
            .context("Failed to load TLS certificate")?;
        info!("Web server running at https://{}", addr);
        axum_server::bind_rustls(addr, tls)
            .serve(app.into_make_service())
            .await
            .context("HTTPS server stopped")?;
        return Ok(());
    }

    #[cfg(not(feature = "tls"))]
    if config.tls_cert_path.is_some() {
        warn!("TLS certificate configured but built without the `tls` feature; serving plain HTTP");
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Web server running at http://{}", addr);
    axum::serve(listener, app)
        .await
        .context("HTTP server stopped")?;
    Ok(())
}
