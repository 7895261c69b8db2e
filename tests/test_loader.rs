//! Loading of the frequency tables, from a local directory and over HTTP

use sanomat::{
    config::Config,
    dataset::{loader, FrequencyTables, MatchMode, Measure},
};
use std::{num::NonZeroUsize, path::Path, sync::Arc};

const LEMMA_ABSOLUTE: (&str, &str) = (
    "frequencies_FI_newspapers_lemma_abs.csv",
    "year,suomi\n1920,10\n1921,20\n1922,15\n",
);
const LEMMA_RELATIVE: (&str, &str) = (
    "frequencies_FI_newspapers_lemma.csv",
    "Unnamed: 0,year,suomi\n0,1920,0.01\n1,1921,0.02\n2,1922,0.015\n",
);
const REGEX_ABSOLUTE: (&str, &str) = (
    "frequencies_FI_newspapers_regex_abs.csv",
    "year,suomi\n1922,17\n1920,12\n1921,22\n",
);
const REGEX_RELATIVE: (&str, &str) = (
    "frequencies_FI_newspapers_regex.csv",
    "year,suomi\n1920,0.012\n1921,0.022\n1922,0.017\n",
);
const TABLES: [(&str, &str); 4] = [LEMMA_ABSOLUTE, LEMMA_RELATIVE, REGEX_ABSOLUTE, REGEX_RELATIVE];

fn config(data_dir: &str) -> Arc<Config> {
    Arc::new(Config {
        data_dir: data_dir.into(),
        database_url: None,
        port: 8080,
        kwic_cache_capacity: NonZeroUsize::new(4).unwrap(),
    })
}

fn write_tables(dir: &Path, tables: &[(&str, &str)]) {
    for (file_name, contents) in tables {
        std::fs::write(dir.join(file_name), contents).expect("writing a fixture table");
    }
}

fn check_loaded_tables(tables: &FrequencyTables) {
    let vocabulary = tables.vocabulary();
    assert_eq!(vocabulary.len(), 1);
    assert_eq!(&*vocabulary[0], "suomi");

    // Each file must land in its own slot, rows sorted by year
    let values = |matching, measure| {
        tables
            .table(matching, measure)
            .column("suomi")
            .expect("suomi is part of the fixture vocabulary")
    };
    assert_eq!(values(MatchMode::Lemma, Measure::Absolute), [10.0, 20.0, 15.0]);
    assert_eq!(values(MatchMode::Lemma, Measure::Relative), [0.01, 0.02, 0.015]);
    assert_eq!(values(MatchMode::Regex, Measure::Absolute), [12.0, 22.0, 17.0]);
    assert_eq!(values(MatchMode::Regex, Measure::Relative), [0.012, 0.022, 0.017]);
    assert_eq!(
        tables.table(MatchMode::Regex, Measure::Absolute).years(),
        [1920, 1921, 1922]
    );
}

#[tokio::test]
async fn tables_load_from_a_local_directory() {
    let dir = tempfile::tempdir().expect("creating a temporary directory");
    write_tables(dir.path(), &TABLES);
    let tables = loader::load(config(&dir.path().to_string_lossy()), reqwest::Client::new())
        .await
        .expect("loading well-formed fixture tables");
    check_loaded_tables(&tables);
}

#[tokio::test]
async fn a_missing_table_aborts_the_load() {
    let dir = tempfile::tempdir().expect("creating a temporary directory");
    write_tables(dir.path(), &TABLES[..3]);
    let result = loader::load(config(&dir.path().to_string_lossy()), reqwest::Client::new()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn a_malformed_table_aborts_the_load() {
    let dir = tempfile::tempdir().expect("creating a temporary directory");
    write_tables(dir.path(), &TABLES);

    // Two rows for 1920 make the lemma/absolute table ambiguous
    write_tables(
        dir.path(),
        &[("frequencies_FI_newspapers_lemma_abs.csv", "year,suomi\n1920,10\n1920,20\n")],
    );
    let result = loader::load(config(&dir.path().to_string_lossy()), reqwest::Client::new()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn tables_load_over_http() {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = Vec::new();
    for (file_name, contents) in TABLES {
        let mock = server
            .mock("GET", format!("/{file_name}").as_str())
            .with_body(contents)
            .create_async()
            .await;
        mocks.push(mock);
    }
    let tables = loader::load(config(&server.url()), reqwest::Client::new())
        .await
        .expect("loading well-formed fixture tables");
    check_loaded_tables(&tables);
    for mock in &mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn http_failures_abort_the_load() {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = Vec::new();
    for (file_name, contents) in &TABLES[..3] {
        let mock = server
            .mock("GET", format!("/{file_name}").as_str())
            .with_body(*contents)
            .create_async()
            .await;
        mocks.push(mock);
    }
    let _not_found = server
        .mock("GET", "/frequencies_FI_newspapers_regex.csv")
        .with_status(404)
        .create_async()
        .await;
    let result = loader::load(config(&server.url()), reqwest::Client::new()).await;
    assert!(result.is_err());
}
