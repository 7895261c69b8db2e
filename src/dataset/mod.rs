//! Word-frequency dataset
//!
//! The charts are backed by four tables published alongside the corpus:
//! yearly frequencies of the tracked keywords, for each combination of
//! matching strategy (exact lemmas vs regex spelling families) and measure
//! (absolute hit counts vs relative frequencies). This module provides the
//! in-memory form of those tables and the chart queries against them,
//! while [`loader`] takes care of fetching and decoding.

pub mod loader;

use crate::{
    error::{Error, Result},
    Keyword, Year,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How keyword occurrences were counted
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// Raw number of occurrences per year
    #[default]
    Absolute,

    /// Occurrences per year, normalized by that year's corpus size
    Relative,
}

/// How keywords were matched against the source text
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Exact matches of the dictionary lemma
    Lemma,

    /// Regex covering period spelling variants and OCR confusions
    #[default]
    Regex,
}

/// One frequency table
///
/// A table is a shared year axis plus one column of values per keyword.
/// Every column covers the full year axis, with 0.0 standing in for years
/// where the keyword was never seen.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyTable {
    /// Years covered by the table, in increasing order without duplicates
    years: Box<[Year]>,

    /// Per-keyword value columns, each as long as the year axis
    columns: BTreeMap<Keyword, Box<[f64]>>,
}
//
impl FrequencyTable {
    /// Assemble a table from a year axis and keyword columns
    ///
    /// Fails if the year axis is not strictly increasing or if any column
    /// does not cover it exactly.
    pub fn from_columns(
        years: Vec<Year>,
        columns: BTreeMap<Keyword, Vec<f64>>,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            years.windows(2).all(|pair| pair[0] < pair[1]),
            "the year axis must be strictly increasing"
        );
        for (keyword, column) in &columns {
            anyhow::ensure!(
                column.len() == years.len(),
                "keyword {keyword:?} covers {} year(s) but the axis has {}",
                column.len(),
                years.len()
            );
        }
        Ok(Self {
            years: years.into(),
            columns: columns
                .into_iter()
                .map(|(keyword, column)| (keyword, column.into()))
                .collect(),
        })
    }

    /// Years covered by this table, in increasing order
    pub fn years(&self) -> &[Year] {
        &self.years
    }

    /// Keywords tracked by this table, in lexicographic order
    pub fn keywords(&self) -> impl Iterator<Item = &Keyword> {
        self.columns.keys()
    }

    /// Value column of one keyword, if the table tracks it
    pub fn column(&self, keyword: &str) -> Option<&[f64]> {
        self.columns.get(keyword).map(|column| &column[..])
    }
}

/// The full dataset: one [`FrequencyTable`] per (matching, measure) pair
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyTables {
    /// Lemma matches, absolute counts
    lemma_absolute: FrequencyTable,

    /// Lemma matches, relative frequencies
    lemma_relative: FrequencyTable,

    /// Regex matches, absolute counts
    regex_absolute: FrequencyTable,

    /// Regex matches, relative frequencies
    regex_relative: FrequencyTable,
}
//
impl FrequencyTables {
    /// Bundle the four tables together
    pub fn new(
        lemma_absolute: FrequencyTable,
        lemma_relative: FrequencyTable,
        regex_absolute: FrequencyTable,
        regex_relative: FrequencyTable,
    ) -> Self {
        Self {
            lemma_absolute,
            lemma_relative,
            regex_absolute,
            regex_relative,
        }
    }

    /// Table holding one (matching, measure) combination
    pub fn table(&self, matching: MatchMode, measure: Measure) -> &FrequencyTable {
        match (matching, measure) {
            (MatchMode::Lemma, Measure::Absolute) => &self.lemma_absolute,
            (MatchMode::Lemma, Measure::Relative) => &self.lemma_relative,
            (MatchMode::Regex, Measure::Absolute) => &self.regex_absolute,
            (MatchMode::Regex, Measure::Relative) => &self.regex_relative,
        }
    }

    /// Tracked vocabulary, in lexicographic order
    ///
    /// By convention the lemma/relative table is the one that defines which
    /// keywords the dashboard knows about.
    pub fn vocabulary(&self) -> Box<[Keyword]> {
        self.lemma_relative.keywords().cloned().collect()
    }

    /// Chart series of one keyword in one table
    ///
    /// Fails with [`Error::UnknownKeyword`] if the requested table does not
    /// track this keyword.
    pub fn series(
        &self,
        keyword: &str,
        matching: MatchMode,
        measure: Measure,
    ) -> Result<ChartSeries> {
        let table = self.table(matching, measure);
        let values = table
            .column(keyword)
            .ok_or_else(|| Error::UnknownKeyword(keyword.into()))?;
        Ok(ChartSeries {
            label: keyword.into(),
            years: table.years.clone(),
            values: values.into(),
        })
    }
}

/// Data behind one line of the frequency chart
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ChartSeries {
    /// Chart label, i.e. the keyword the series belongs to
    pub label: Box<str>,

    /// Year of each data point, in increasing order
    pub years: Box<[Year]>,

    /// Value of each data point, aligned with `years`
    pub values: Box<[f64]>,
}
