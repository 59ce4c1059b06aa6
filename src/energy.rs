use log::{debug, info, warn};

use canton_energy::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_geojson;

use crate::energy::config_reader::*;
use crate::energy::io_common::simplify_file_name;
use crate::energy::io_csv::RecordCache;
use crate::energy::io_geojson::read_boundaries;

#[derive(Debug, Snafu)]
pub enum EnergyError {
    #[snafu(display("Error opening records file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error parsing records file {path} at line {lineno}"))]
    ParsingCsv {
        source: csv::Error,
        path: String,
        lineno: u64,
    },
    #[snafu(display("Invalid production {production} in {path} at line {lineno}"))]
    InvalidProduction {
        path: String,
        lineno: u64,
        production: f64,
    },
    #[snafu(display("Error opening boundaries file {path}"))]
    OpeningGeoJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing boundaries file {path}"))]
    ParsingGeoJson {
        source: geojson::Error,
        path: String,
    },
    #[snafu(display("Boundaries file {path} does not contain a feature collection"))]
    NotAFeatureCollection { path: String },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Invalid canton in records file {path}: {source}"))]
    UnknownCanton { source: CantonErrors, path: String },
    #[snafu(display("Error writing summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary {path}"))]
    ReferenceMismatch { path: String },
}

pub type EnergyResult<T> = Result<T, EnergyError>;

fn production_to_json(view: &DashboardView) -> Vec<JSValue> {
    view.production
        .iter()
        .map(|t| {
            json!({
                "canton": t.canton,
                "production": t.total_production,
                "logProduction": t.log_production(),
            })
        })
        .collect()
}

fn counts_to_json(view: &DashboardView) -> Vec<JSValue> {
    view.counts
        .iter()
        .map(|c| json!({"canton": c.canton, "count": c.count}))
        .collect()
}

fn matrix_to_json(matrix: &SourceCountMatrix) -> JSValue {
    let cantons: Vec<JSValue> = matrix
        .rows
        .iter()
        .map(|(canton, counts)| json!({"canton": canton, "counts": counts}))
        .collect();
    json!({"sources": matrix.sources, "cantons": cantons})
}

fn build_summary_js(
    settings: &DashboardSettings,
    view: &DashboardView,
    missing_boundaries: &[String],
    num_records: usize,
) -> JSValue {
    let c = OutputConfig {
        records_file: simplify_file_name(&settings.records_path),
        boundaries_file: simplify_file_name(&settings.boundaries_path),
        source_filter: view.filter.to_string(),
        num_records,
    };
    json!({
        "config": c,
        "productionByCanton": production_to_json(view),
        "sourceOptions": view.source_options,
        "countsByCanton": counts_to_json(view),
        "sourceMatrix": matrix_to_json(&view.matrix),
        "missingBoundaries": missing_boundaries,
    })
}

/// Writes the records as a fixed width table.
pub fn print_dataset<W: Write>(out: &mut W, records: &[PowerPlantRecord]) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>8} {:<25} {:<20} {:>15}",
        "#", "canton", "energy_source_level_2", "production"
    )?;
    for (idx, r) in records.iter().enumerate() {
        writeln!(
            out,
            "{:>8} {:<25} {:<20} {:>15.2}",
            idx, r.canton, r.energy_source_level_2, r.production
        )?;
    }
    Ok(())
}

fn write_summary(out: &Option<std::path::PathBuf>, pretty_js: &str) -> EnergyResult<()> {
    match out {
        None => {
            println!("{}", pretty_js);
            Ok(())
        }
        Some(p) => {
            info!("Writing summary to {:?}", p);
            fs::write(p, pretty_js).context(WritingOutputSnafu {
                path: p.display().to_string(),
            })
        }
    }
}

// The summaries are compared as values, the text is only used to show the differences.
fn check_reference(
    reference_p: &Path,
    summary_js: &JSValue,
    pretty_js_stats: &str,
) -> EnergyResult<()> {
    let summary_ref = read_summary(reference_p)?;
    debug!("reference summary: {:?}", summary_ref);
    if summary_ref != *summary_js {
        warn!("Found differences with the reference summary");
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return ReferenceMismatchSnafu {
            path: reference_p.display().to_string(),
        }
        .fail();
    }
    info!("Summary matches the reference {:?}", reference_p);
    Ok(())
}

/// Runs the full pipeline: loading, normalization, aggregation and output.
///
/// The records are read through `cache`, the boundaries are read on every call.
/// Returns the summary that was written.
pub fn run_dashboard(
    settings: &DashboardSettings,
    cache: &mut RecordCache,
) -> EnergyResult<JSValue> {
    info!("settings: {:?}", settings);

    let raw_records = cache.load(&settings.records_path)?;
    let records = normalize_cantons(raw_records, &CantonTable::swiss()).context(
        UnknownCantonSnafu {
            path: settings.records_path.display().to_string(),
        },
    )?;
    let boundaries = read_boundaries(&settings.boundaries_path)?;

    let view = DashboardView::compute(&records, &settings.source_filter);
    if let SourceFilter::Source(s) = &settings.source_filter {
        if !view.source_options.contains(s) {
            warn!(
                "No record with energy source {:?}, the available sources are {:?}",
                s, view.source_options
            );
        }
    }

    let missing_boundaries =
        boundaries.missing_cantons(view.production.iter().map(|t| t.canton.as_str()));
    for canton in missing_boundaries.iter() {
        warn!("No boundary found for canton {:?}", canton);
    }

    if settings.show_dataset {
        let stdout = std::io::stdout();
        print_dataset(&mut stdout.lock(), &records).context(WritingOutputSnafu {
            path: STDOUT.to_string(),
        })?;
    }

    let summary_js = build_summary_js(settings, &view, &missing_boundaries, records.len());
    let pretty_js_stats = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    write_summary(&settings.out, &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(reference_p) = &settings.reference_path {
        check_reference(reference_p, &summary_js, &pretty_js_stats)?;
    }

    Ok(summary_js)
}
