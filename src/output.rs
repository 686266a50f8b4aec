//! Result Writer
//!
//! One CSV row per trait and ancestry. Rows are serialized into memory and
//! written in a single step once every simulation has finished, so a failed
//! run leaves no partial table behind.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::Result;
use crate::simulation::SelectionResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub analysis: String,
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub trait_kind: String,
    pub ancestry: String,
    pub selection: String,
    pub families: usize,
    pub embryos: usize,
    pub selected_mean: f64,
    pub random_mean: f64,
    pub mean_difference: f64,
    pub difference_sd: f64,
    pub standard_error: f64,
    pub interval_95: f64,
    pub seed: u64,
}

impl From<&SelectionResult> for ResultRow {
    fn from(result: &SelectionResult) -> Self {
        Self {
            analysis: result.analysis.name().to_string(),
            trait_name: result.trait_name.clone(),
            trait_kind: result.scale.kind().to_string(),
            ancestry: result.ancestry.clone(),
            selection: result.rule.name().to_string(),
            families: result.families,
            embryos: result.embryos,
            selected_mean: result.tally.selected.mean(),
            random_mean: result.tally.random.mean(),
            mean_difference: result.tally.difference.mean(),
            difference_sd: result.tally.difference.std_dev(),
            standard_error: result.tally.difference.standard_error(),
            interval_95: result.interval_95(),
            seed: result.seed,
        }
    }
}

pub fn render_csv(results: &[SelectionResult]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for result in results {
        writer.serialize(ResultRow::from(result))?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|err| err.into_error().into())
}

/// Logs each result's summary and writes the table to `output`, or to stdout
/// when no path is given.
pub fn write_results(results: &[SelectionResult], output: Option<&Path>) -> Result<()> {
    for result in results {
        info!("{}", result.summary());
    }

    let table = render_csv(results)?;
    match output {
        Some(path) => {
            fs::write(path, &table)?;
            info!("Wrote {} result rows to {}", results.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&table)?;
            handle.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liability::TraitScale;
    use crate::selection::SelectionRule;
    use crate::simulation::Analysis;
    use crate::stats::OutcomeTally;

    fn sample_result() -> SelectionResult {
        let mut tally = OutcomeTally::default();
        tally.record(0.0, 1.0);
        tally.record(0.0, 0.0);
        SelectionResult {
            analysis: Analysis::WithinFamilyClinical,
            trait_name: "Type 2 Diabetes".to_string(),
            ancestry: "EUR".to_string(),
            scale: TraitScale::binary(0.1).unwrap(),
            rule: SelectionRule::LowestScore,
            families: 2,
            embryos: 5,
            seed: 99,
            tally,
        }
    }

    #[test]
    fn test_csv_has_header_and_one_row_per_result() {
        let bytes = render_csv(&[sample_result()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("analysis,trait,trait_kind,ancestry,selection"));
        assert!(lines[1].starts_with("within_family_clinical,Type 2 Diabetes,binary,EUR,lowest_score,2,5,0.0,0.5,-0.5"));
        assert!(lines[1].ends_with(",99"));
    }

    #[test]
    fn test_results_are_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        write_results(&[sample_result(), sample_result()], Some(path.as_path())).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 2);
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("results.csv");
        assert!(write_results(&[sample_result()], Some(path.as_path())).is_err());
        assert!(!path.exists());
    }
}
