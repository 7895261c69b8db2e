//! Request handling
//!
//! Handlers translate query strings into dataset and lookup calls, and
//! translate the outcome back into JSON. The keyword-in-context handler
//! is the one place where store trouble is deliberately downgraded, a
//! dashboard without snippets is still a useful dashboard.

use crate::{
    dataset::{ChartSeries, MatchMode, Measure},
    error::Error,
    kwic::KwicRecord,
    server::AppContext,
    Keyword, Year, SERVICE_TITLE,
};
use anyhow::Context as _;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Reply to a metadata query
#[derive(Debug, Serialize)]
pub struct Meta {
    /// Human-readable dashboard title
    title: &'static str,

    /// Version of the backend
    version: &'static str,

    /// Number of tracked keywords
    keyword_count: usize,

    /// Truth that keyword-in-context lookups are available
    kwic_store: bool,

    /// Selection the frontend should start from
    defaults: Defaults,
}

/// Initial dashboard selection
#[derive(Debug, Serialize)]
struct Defaults {
    /// First keyword of the vocabulary, if there is one
    keyword: Option<Keyword>,

    /// Measure shown before the user picks one
    measure: Measure,

    /// Matching strategy shown before the user picks one
    matching: MatchMode,
}

/// Everything the frontend needs to draw its initial state
pub async fn meta(State(context): State<AppContext>) -> Json<Meta> {
    Json(Meta {
        title: SERVICE_TITLE,
        version: env!("CARGO_PKG_VERSION"),
        keyword_count: context.keywords.len(),
        kwic_store: context.kwic.store_configured(),
        defaults: Defaults {
            keyword: context.keywords.first().cloned(),
            measure: Measure::default(),
            matching: MatchMode::default(),
        },
    })
}

/// Tracked vocabulary, in lexicographic order
pub async fn keywords(State(context): State<AppContext>) -> Json<Vec<Keyword>> {
    Json(context.keywords.to_vec())
}

/// Query parameters of a chart series request
#[derive(Debug, Deserialize)]
pub struct FrequencyParams {
    /// Keyword to chart
    keyword: String,

    /// Measure to chart, absolute counts unless told otherwise
    #[serde(default)]
    measure: Measure,

    /// Matching strategy, regex families unless told otherwise
    #[serde(default)]
    matching: MatchMode,
}

/// Chart series of one keyword
pub async fn frequencies(
    State(context): State<AppContext>,
    Query(params): Query<FrequencyParams>,
) -> Result<Json<ChartSeries>, Error> {
    let series = (context.tables).series(&params.keyword, params.matching, params.measure)?;
    Ok(Json(series))
}

/// Query parameters of a keyword-in-context request
#[derive(Debug, Deserialize)]
pub struct KwicParams {
    /// Keyword to look up
    keyword: String,

    /// Comma-separated publication years to filter by, all years if absent
    years: Option<String>,
}

/// Keyword-in-context rows of one keyword
pub async fn kwic(
    State(context): State<AppContext>,
    Query(params): Query<KwicParams>,
) -> Response {
    let years = match parse_years(params.years.as_deref()) {
        Ok(years) => years,
        Err(error) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response()
        }
    };
    match context.kwic.lookup(&params.keyword, &years).await {
        Ok(records) => Json(records.to_vec()).into_response(),
        // Snippets are an extra: when the store is absent or unreachable,
        // the table comes back empty instead of failing the dashboard
        Err(Error::StoreUnavailable) => {
            debug!("no snippet store is configured, returning no rows");
            Json(Vec::<KwicRecord>::new()).into_response()
        }
        Err(Error::Query(source)) => {
            warn!("a snippet store query failed: {source}");
            Json(Vec::<KwicRecord>::new()).into_response()
        }
        Err(error) => error.into_response(),
    }
}

/// Decode the comma-separated year list of a lookup request
fn parse_years(text: Option<&str>) -> anyhow::Result<BTreeSet<Year>> {
    let mut years = BTreeSet::new();
    for token in text.into_iter().flat_map(|text| text.split(',')) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let year = token
            .parse::<Year>()
            .with_context(|| format!("{token:?} is not a year"))?;
        years.insert(year);
    }
    Ok(years)
}
