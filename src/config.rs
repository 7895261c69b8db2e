//! Service configuration
//!
//! Everything the process needs to know is decided once at startup: CLI
//! arguments for the boring knobs, plus the store connection string from
//! the environment, digested into one immutable [`Config`] that the rest
//! of the code shares.

use clap::Parser;
use std::{num::NonZeroUsize, sync::Arc};

/// Where the frequency tables live unless told otherwise
///
/// This is the published location of the processed Grand Duchy corpus
/// tables, so the dashboard works out of the box without a local copy.
pub const DEFAULT_DATA_DIR: &str =
    "https://raw.githubusercontent.com/AnttiHaerkoenen/grand_duchy/master/data/processed/";

/// Serve word-frequency charts and keyword-in-context snippets from the
/// historical Finnish newspaper corpus
#[derive(Parser, Debug)]
#[command(version, author)]
pub struct Args {
    /// Location of the four frequency tables
    ///
    /// Either an HTTP(S) URL prefix or a local directory. The fixed file
    /// names of the four tables (lemma/regex × absolute/relative) are
    /// appended to this base.
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    data_dir: String,

    /// TCP port the JSON API listens on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Capacity of the keyword-in-context lookup cache
    ///
    /// Lookups are memoized by (keyword, selected years). Once this many
    /// entries are held, the least recently used one is evicted, which
    /// keeps memory bounded no matter how many year selections users
    /// click through.
    #[arg(long, default_value = "256")]
    kwic_cache_capacity: NonZeroUsize,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> anyhow::Result<Self> {
        let args = Args::parse();
        anyhow::ensure!(
            !args.data_dir.trim().is_empty(),
            "the frequency table location must not be empty"
        );
        Ok(args)
    }
}

/// Final process configuration
///
/// This is the result of combining digested [`Args`] with the
/// environment-provided store connection string. Please refer to [`Args`]
/// to know more about common fields.
#[allow(missing_docs)]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Config {
    /// Base location of the frequency tables (URL prefix or directory)
    pub data_dir: Box<str>,

    /// Connection string of the keyword-in-context store, if configured
    ///
    /// Taken from `DATABASE_URL`. Absence is not an error: the dashboard
    /// then runs with the snippet table disabled.
    pub database_url: Option<Box<str>>,

    // Other fields have the same meaning as in Args
    pub port: u16,
    pub kwic_cache_capacity: NonZeroUsize,
}
//
impl Config {
    /// Determine process configuration from initialization products
    pub fn new(args: Args, database_url: Option<String>) -> Arc<Self> {
        let Args {
            data_dir,
            port,
            kwic_cache_capacity,
        } = args;
        Arc::new(Self {
            data_dir: data_dir.into(),
            database_url: database_url.map(Into::into),
            port,
            kwic_cache_capacity,
        })
    }

    /// Truth that the frequency tables are fetched over HTTP rather than
    /// read from a local directory
    pub fn data_dir_is_remote(&self) -> bool {
        self.data_dir.starts_with("http://") || self.data_dir.starts_with("https://")
    }
}
