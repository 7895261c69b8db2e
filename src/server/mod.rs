//! JSON API surface
//!
//! The dashboard frontend talks to a small JSON API: corpus metadata,
//! the tracked vocabulary, chart series, and keyword-in-context rows.
//! Routes are assembled here, request handling lives in [`handlers`].

pub mod handlers;

use crate::{
    dataset::FrequencyTables,
    kwic::{store::SnippetStore, KwicService},
    Keyword,
};
use axum::{routing::get, Router};
use std::{num::NonZeroUsize, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// State shared by every request handler
#[derive(Clone)]
pub struct AppContext {
    /// Frequency dataset backing the charts
    pub tables: Arc<FrequencyTables>,

    /// Tracked vocabulary, in lexicographic order
    pub keywords: Arc<[Keyword]>,

    /// Keyword-in-context lookup service
    pub kwic: Arc<KwicService>,
}
//
impl AppContext {
    /// Wire the shared state together
    ///
    /// The vocabulary is derived from the frequency dataset and handed
    /// to the lookup service, so snippet lookups and charts agree on
    /// which keywords exist.
    pub fn new(
        tables: FrequencyTables,
        store: Option<Arc<dyn SnippetStore>>,
        kwic_cache_capacity: NonZeroUsize,
    ) -> Self {
        let tables = Arc::new(tables);
        let keywords: Arc<[Keyword]> = tables.vocabulary().into();
        let kwic = Arc::new(KwicService::new(store, keywords.clone(), kwic_cache_capacity));
        Self {
            tables,
            keywords,
            kwic,
        }
    }
}

/// Assemble the API router
///
/// The frontend is served from another origin during development, hence
/// the permissive CORS layer.
pub fn build_router(context: AppContext) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/meta", get(handlers::meta))
        .route("/api/keywords", get(handlers::keywords))
        .route("/api/frequencies", get(handlers::frequencies))
        .route("/api/kwic", get(handlers::kwic))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(context)
}
