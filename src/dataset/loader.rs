//! Fetching and decoding of the frequency tables
//!
//! The corpus processing publishes each table as a CSV file named after
//! its matching strategy and measure. Every file has a `year` column plus
//! one column per keyword, and cells are left empty on years where a
//! keyword was never seen. Rows are not guaranteed to arrive in year
//! order, so the decoded tables are sorted here.

use crate::{
    config::Config,
    dataset::{FrequencyTable, FrequencyTables, MatchMode, Measure},
    error::{Error, Result},
    Keyword, Year,
};
use anyhow::Context;
use csv_async::{AsyncReaderBuilder, StringRecord};
use futures::stream::StreamExt;
use reqwest::Response;
use std::{
    collections::BTreeMap,
    io::{self, ErrorKind},
    path::Path,
    sync::Arc,
};
use tokio::{
    fs::File,
    io::{AsyncRead, BufReader},
    task::JoinSet,
};
use tokio_util::io::StreamReader;

/// File names of the four frequency tables, keyed by what they hold
const SOURCES: [(MatchMode, Measure, &str); 4] = [
    (
        MatchMode::Lemma,
        Measure::Absolute,
        "frequencies_FI_newspapers_lemma_abs.csv",
    ),
    (
        MatchMode::Lemma,
        Measure::Relative,
        "frequencies_FI_newspapers_lemma.csv",
    ),
    (
        MatchMode::Regex,
        Measure::Absolute,
        "frequencies_FI_newspapers_regex_abs.csv",
    ),
    (
        MatchMode::Regex,
        Measure::Relative,
        "frequencies_FI_newspapers_regex.csv",
    ),
];

/// Name of the column holding the year axis
const YEAR_COLUMN: &str = "year";

/// Header names that denote upstream processing artifacts, not keywords
///
/// The corpus tables carry an unnamed row-index column left behind by the
/// tool that produced them.
const ARTIFACT_COLUMNS: [&str; 2] = ["", "Unnamed: 0"];

/// Fetch and decode the four frequency tables
///
/// Tables are fetched concurrently, from the web or from a local
/// directory depending on the configured data location. Any failure
/// aborts the whole load, as the dashboard has nothing useful to show
/// with a partial dataset.
pub async fn load(config: Arc<Config>, client: reqwest::Client) -> Result<FrequencyTables> {
    load_inner(config, client).await.map_err(Error::Load)
}
//
async fn load_inner(
    config: Arc<Config>,
    client: reqwest::Client,
) -> anyhow::Result<FrequencyTables> {
    // Start all table fetches
    let mut fetches = JoinSet::new();
    for (matching, measure, file_name) in SOURCES {
        fetches.spawn(fetch_table(
            config.clone(),
            client.clone(),
            matching,
            measure,
            file_name,
        ));
    }

    // Collect tables as fetches finish, in whatever order that happens
    let mut lemma_absolute = None;
    let mut lemma_relative = None;
    let mut regex_absolute = None;
    let mut regex_relative = None;
    while let Some(result) = fetches.join_next().await {
        let (matching, measure, table) = result.context("collecting one frequency table")??;
        match (matching, measure) {
            (MatchMode::Lemma, Measure::Absolute) => lemma_absolute = Some(table),
            (MatchMode::Lemma, Measure::Relative) => lemma_relative = Some(table),
            (MatchMode::Regex, Measure::Absolute) => regex_absolute = Some(table),
            (MatchMode::Regex, Measure::Relative) => regex_relative = Some(table),
        }
    }
    let missing = || anyhow::anyhow!("one of the frequency tables was never fetched");
    Ok(FrequencyTables::new(
        lemma_absolute.ok_or_else(missing)?,
        lemma_relative.ok_or_else(missing)?,
        regex_absolute.ok_or_else(missing)?,
        regex_relative.ok_or_else(missing)?,
    ))
}

/// Fetch and decode one frequency table
async fn fetch_table(
    config: Arc<Config>,
    client: reqwest::Client,
    matching: MatchMode,
    measure: Measure,
    file_name: &'static str,
) -> anyhow::Result<(MatchMode, Measure, FrequencyTable)> {
    let table = if config.data_dir_is_remote() {
        // Start the download
        let url = format!("{}/{file_name}", config.data_dir.trim_end_matches('/'));
        let context = || format!("initiating download of {url}");
        let response = client
            .get(&url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .with_context(context)?;

        // Slice the download into chunks of bytes, translating reqwest
        // errors into the I/O errors that the CSV decoder expects
        let csv_bytes = StreamReader::new(
            response
                .bytes_stream()
                .map(|res| res.map_err(|e| io::Error::new(ErrorKind::Other, Box::new(e)))),
        );
        parse_table(csv_bytes)
            .await
            .with_context(|| format!("decoding {url}"))?
    } else {
        let path = Path::new(&*config.data_dir).join(file_name);
        let file = File::open(&path)
            .await
            .with_context(|| format!("opening {}", path.display()))?;
        parse_table(BufReader::new(file))
            .await
            .with_context(|| format!("decoding {}", path.display()))?
    };
    Ok((matching, measure, table))
}

/// Decode one frequency table from a stream of CSV bytes
async fn parse_table(csv_bytes: impl AsyncRead + Send + Unpin) -> anyhow::Result<FrequencyTable> {
    let mut reader = AsyncReaderBuilder::new().create_reader(csv_bytes);

    // Locate the year axis and the keyword columns
    let headers = reader
        .headers()
        .await
        .context("decoding the header row")?
        .clone();
    let mut year_column = None;
    let mut keyword_columns = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        if header == YEAR_COLUMN {
            anyhow::ensure!(
                year_column.is_none(),
                "there are several {YEAR_COLUMN:?} columns"
            );
            year_column = Some(index);
        } else if !ARTIFACT_COLUMNS.contains(&header) {
            keyword_columns.push((index, Keyword::from(header)));
        }
    }
    let year_column =
        year_column.with_context(|| format!("there is no {YEAR_COLUMN:?} column"))?;

    // Decode data rows in whatever order the file provides them
    let mut rows = Vec::new();
    let mut records = reader.into_records();
    while let Some(record) = records.next().await {
        let record = record.context("decoding a data row")?;
        rows.push(parse_row(&record, year_column, &keyword_columns)?);
    }

    // Establish the year axis
    rows.sort_unstable_by_key(|(year, _)| *year);
    let years = rows.iter().map(|(year, _)| *year).collect::<Vec<_>>();
    if let Some(pair) = years.windows(2).find(|pair| pair[0] == pair[1]) {
        anyhow::bail!("several rows cover year {}", pair[0]);
    }

    // Transpose the sorted rows into per-keyword columns
    let mut columns = vec![Vec::with_capacity(rows.len()); keyword_columns.len()];
    for (_, values) in &rows {
        for (column, value) in columns.iter_mut().zip(values) {
            column.push(*value);
        }
    }
    let num_keywords = keyword_columns.len();
    let columns = (keyword_columns.into_iter())
        .map(|(_, keyword)| keyword)
        .zip(columns)
        .collect::<BTreeMap<_, _>>();
    anyhow::ensure!(
        columns.len() == num_keywords,
        "several columns share the same keyword"
    );
    FrequencyTable::from_columns(years, columns)
}

/// Decode one data row into a year and its per-keyword values
///
/// Empty cells mean that the keyword was never seen that year.
fn parse_row(
    record: &StringRecord,
    year_column: usize,
    keyword_columns: &[(usize, Keyword)],
) -> anyhow::Result<(Year, Vec<f64>)> {
    let cell = |index: usize| {
        record
            .get(index)
            .with_context(|| format!("row {record:?} is too short"))
    };
    let year_cell = cell(year_column)?;
    let year = year_cell
        .parse::<Year>()
        .with_context(|| format!("decoding year {year_cell:?}"))?;
    let mut values = Vec::with_capacity(keyword_columns.len());
    for (index, keyword) in keyword_columns {
        let text = cell(*index)?;
        let value = if text.is_empty() {
            0.0
        } else {
            text.parse::<f64>()
                .with_context(|| format!("decoding the year {year} value of {keyword:?}"))?
        };
        values.push(value);
    }
    Ok((year, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn parse(csv: &str) -> anyhow::Result<FrequencyTable> {
        parse_table(csv.as_bytes()).await
    }

    #[tokio::test]
    async fn artifact_columns_are_not_keywords() {
        let table = parse(",year,suomi\n0,1900,1.5\n1,1901,2.5\n").await.unwrap();
        assert_eq!(table.years(), [1900, 1901]);
        let keywords = table.keywords().cloned().collect::<Vec<_>>();
        assert_eq!(keywords, vec![Keyword::from("suomi")]);
        assert_eq!(table.column("suomi").unwrap(), [1.5, 2.5]);
    }

    #[tokio::test]
    async fn rows_are_sorted_by_year() {
        let table = parse("year,sota\n1902,3.0\n1900,1.0\n1901,2.0\n").await.unwrap();
        assert_eq!(table.years(), [1900, 1901, 1902]);
        assert_eq!(table.column("sota").unwrap(), [1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn empty_cells_count_as_zero() {
        let table = parse("year,sota,suomi\n1900,,4.0\n1901,2.0,\n").await.unwrap();
        assert_eq!(table.column("sota").unwrap(), [0.0, 2.0]);
        assert_eq!(table.column("suomi").unwrap(), [4.0, 0.0]);
    }

    #[tokio::test]
    async fn duplicate_years_are_rejected() {
        let error = parse("year,sota\n1900,1.0\n1900,2.0\n").await.unwrap_err();
        assert!(error.to_string().contains("1900"));
    }

    #[tokio::test]
    async fn the_year_column_is_mandatory() {
        assert!(parse("vuosi,sota\n1900,1.0\n").await.is_err());
    }

    #[tokio::test]
    async fn unparseable_cells_are_reported() {
        assert!(parse("year,sota\nMCMXIV,1.0\n").await.is_err());
        assert!(parse("year,sota\n1900,paljon\n").await.is_err());
    }
}
