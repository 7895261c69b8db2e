//! Chart queries against the frequency dataset

use sanomat::{
    dataset::{FrequencyTable, FrequencyTables, MatchMode, Measure},
    error::Error,
    Keyword,
};
use std::collections::BTreeMap;

/// Three years of data for two keywords, with distinct values per table so
/// that tests can tell which table a series was sliced from
fn tables() -> FrequencyTables {
    let years = vec![1920, 1921, 1922];
    let table = |suomi: [f64; 3], sota: [f64; 3]| {
        let columns: BTreeMap<Keyword, Vec<f64>> = [
            (Keyword::from("suomi"), suomi.to_vec()),
            (Keyword::from("sota"), sota.to_vec()),
        ]
        .into_iter()
        .collect();
        FrequencyTable::from_columns(years.clone(), columns)
            .expect("the fixture table is well-formed")
    };
    FrequencyTables::new(
        table([10.0, 20.0, 15.0], [3.0, 0.0, 1.0]),
        table([0.01, 0.02, 0.015], [0.003, 0.0, 0.001]),
        table([12.0, 22.0, 17.0], [5.0, 0.0, 2.0]),
        table([0.012, 0.022, 0.017], [0.005, 0.0, 0.002]),
    )
}

#[test]
fn every_combination_reads_its_own_table() {
    let tables = tables();
    let values = |matching, measure| {
        tables
            .series("suomi", matching, measure)
            .expect("suomi is part of the fixture vocabulary")
            .values
    };
    assert_eq!(&values(MatchMode::Lemma, Measure::Absolute)[..], [10.0, 20.0, 15.0]);
    assert_eq!(&values(MatchMode::Lemma, Measure::Relative)[..], [0.01, 0.02, 0.015]);
    assert_eq!(&values(MatchMode::Regex, Measure::Absolute)[..], [12.0, 22.0, 17.0]);
    assert_eq!(&values(MatchMode::Regex, Measure::Relative)[..], [0.012, 0.022, 0.017]);
}

#[test]
fn a_series_carries_its_label_and_year_axis() {
    let series = tables()
        .series("suomi", MatchMode::Lemma, Measure::Relative)
        .expect("suomi is part of the fixture vocabulary");
    assert_eq!(&*series.label, "suomi");
    assert_eq!(&series.years[..], [1920, 1921, 1922]);
    assert_eq!(&series.values[..], [0.01, 0.02, 0.015]);
}

#[test]
fn series_are_aligned_with_an_increasing_year_axis() {
    let tables = tables();
    for matching in [MatchMode::Lemma, MatchMode::Regex] {
        for measure in [Measure::Absolute, Measure::Relative] {
            let series = tables
                .series("sota", matching, measure)
                .expect("sota is part of the fixture vocabulary");
            assert_eq!(series.years.len(), series.values.len());
            assert!(series.years.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}

#[test]
fn unknown_keywords_are_refused() {
    let error = tables()
        .series("ruotsi", MatchMode::Regex, Measure::Absolute)
        .unwrap_err();
    assert!(matches!(error, Error::UnknownKeyword(keyword) if &*keyword == "ruotsi"));
}

#[test]
fn the_vocabulary_is_sorted() {
    let vocabulary = tables().vocabulary();
    assert_eq!(vocabulary.len(), 2);
    assert_eq!(&*vocabulary[0], "sota");
    assert_eq!(&*vocabulary[1], "suomi");
}
