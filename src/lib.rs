//! Backend of a small dashboard that charts word frequencies in historical
//! Finnish newspapers, based on the precomputed tables of the Grand Duchy
//! corpus project
//! <https://github.com/AnttiHaerkoenen/grand_duchy>.
//!
//! Four frequency-by-year tables (lemma/regex matching × absolute/relative
//! measure) are loaded once at startup. A JSON API then serves bar-chart
//! series sliced from those tables, plus keyword-in-context snippets fetched
//! on demand from a relational store of annotated newspaper text and
//! memoized in a bounded cache.

pub mod config;
pub mod dataset;
pub mod error;
pub mod kwic;
pub mod server;

/// Human-readable title of the dashboard, as shown by the frontend
pub const SERVICE_TITLE: &str = "Finnish newspapers";

/// Year of Gregorian Calendar
///
/// Matches the `INTEGER` year column of both the frequency tables and the
/// keyword-in-context store.
pub type Year = i32;

/// A tracked keyword, i.e. one data column of the frequency tables
pub type Keyword = Box<str>;
