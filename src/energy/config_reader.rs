use crate::args::Args;
use crate::energy::io_common::resolve_path;
use crate::energy::*;

use std::path::{Path, PathBuf};

pub const DEFAULT_RECORDS_PATH: &str = "./data/raw/renewable_power_plants_CH.csv";
pub const DEFAULT_BOUNDARIES_PATH: &str = "./data/raw/georef-switzerland-kanton.geojson";
pub const STDOUT: &str = "stdout";

/// The content of the optional JSON configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(rename = "recordsPath")]
    pub records_path: Option<String>,
    #[serde(rename = "boundariesPath")]
    pub boundaries_path: Option<String>,
    #[serde(rename = "sourceFilter")]
    pub source_filter: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

/// The description of the run, written at the top of the summary.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "recordsFile")]
    pub records_file: String,
    #[serde(rename = "boundariesFile")]
    pub boundaries_file: String,
    #[serde(rename = "sourceFilter")]
    pub source_filter: String,
    #[serde(rename = "numRecords")]
    pub num_records: usize,
}

/// The settings of one run, once the configuration file and the flags are merged.
#[derive(PartialEq, Debug, Clone)]
pub struct DashboardSettings {
    pub records_path: PathBuf,
    pub boundaries_path: PathBuf,
    pub source_filter: SourceFilter,
    /// None for the standard output.
    pub out: Option<PathBuf>,
    pub reference_path: Option<PathBuf>,
    pub show_dataset: bool,
}

pub fn read_config(path: &Path) -> EnergyResult<DashboardConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
        path: path.display().to_string(),
    })?;
    let config: DashboardConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

fn output_target(root: Option<&Path>, s: &str) -> Option<PathBuf> {
    if s.is_empty() || s == STDOUT {
        None
    } else {
        Some(resolve_path(root, s))
    }
}

/// Merges the command line with the configuration file, if any.
///
/// The flags take precedence. Relative paths coming from the file are resolved
/// against its directory, the ones from the flags against the working directory.
pub fn resolve_settings(args: &Args) -> EnergyResult<DashboardSettings> {
    let (config, root): (DashboardConfig, Option<PathBuf>) = match &args.config {
        Some(p) => {
            let config_p = Path::new(p);
            let config = read_config(config_p)?;
            (config, config_p.parent().map(|r| r.to_path_buf()))
        }
        None => (DashboardConfig::default(), None),
    };
    let root = root.as_deref();

    let records_path = match (&args.input, &config.records_path) {
        (Some(p), _) => PathBuf::from(p),
        (None, Some(p)) => resolve_path(root, p),
        (None, None) => PathBuf::from(DEFAULT_RECORDS_PATH),
    };
    let boundaries_path = match (&args.boundaries, &config.boundaries_path) {
        (Some(p), _) => PathBuf::from(p),
        (None, Some(p)) => resolve_path(root, p),
        (None, None) => PathBuf::from(DEFAULT_BOUNDARIES_PATH),
    };
    let source_filter = args
        .source
        .as_deref()
        .or(config.source_filter.as_deref())
        .map(SourceFilter::from)
        .unwrap_or_default();
    let out = match (&args.out, &config.output_path) {
        (Some(o), _) => output_target(None, o),
        (None, Some(o)) => output_target(root, o),
        (None, None) => None,
    };

    Ok(DashboardSettings {
        records_path,
        boundaries_path,
        source_filter,
        out,
        reference_path: args.reference.as_ref().map(PathBuf::from),
        show_dataset: args.show_dataset,
    })
}

pub fn read_summary(path: &Path) -> EnergyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
        path: path.display().to_string(),
    })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(flags: &[&str]) -> Args {
        let mut all = vec!["chenergy"];
        all.extend_from_slice(flags);
        Args::parse_from(all)
    }

    #[test]
    fn defaults() {
        let s = resolve_settings(&args(&[])).unwrap();
        assert_eq!(s.records_path, PathBuf::from(DEFAULT_RECORDS_PATH));
        assert_eq!(s.boundaries_path, PathBuf::from(DEFAULT_BOUNDARIES_PATH));
        assert_eq!(s.source_filter, SourceFilter::All);
        assert_eq!(s.out, None);
        assert_eq!(s.reference_path, None);
        assert!(!s.show_dataset);
    }

    #[test]
    fn config_paths_are_relative_to_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_p = dir.path().join("dashboard.json");
        fs::write(
            &config_p,
            r#"{"recordsPath": "plants.csv", "boundariesPath": "/srv/cantons.geojson",
                "sourceFilter": "Solar", "outputPath": "summary.json"}"#,
        )
        .unwrap();
        let config_s = config_p.display().to_string();
        let s = resolve_settings(&args(&["--config", config_s.as_str()])).unwrap();
        assert_eq!(s.records_path, dir.path().join("plants.csv"));
        assert_eq!(s.boundaries_path, PathBuf::from("/srv/cantons.geojson"));
        assert_eq!(s.source_filter, SourceFilter::Source("Solar".to_string()));
        assert_eq!(s.out, Some(dir.path().join("summary.json")));
    }

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_p = dir.path().join("dashboard.json");
        fs::write(
            &config_p,
            r#"{"recordsPath": "plants.csv", "sourceFilter": "Solar", "outputPath": "summary.json"}"#,
        )
        .unwrap();
        let config_s = config_p.display().to_string();
        let s = resolve_settings(&args(&[
            "--config",
            config_s.as_str(),
            "--input",
            "other.csv",
            "--source",
            "All",
            "--out",
            "stdout",
            "--reference",
            "ref.json",
            "--show-dataset",
        ]))
        .unwrap();
        assert_eq!(s.records_path, PathBuf::from("other.csv"));
        assert_eq!(s.boundaries_path, PathBuf::from(DEFAULT_BOUNDARIES_PATH));
        assert_eq!(s.source_filter, SourceFilter::All);
        assert_eq!(s.out, None);
        assert_eq!(s.reference_path, Some(PathBuf::from("ref.json")));
        assert!(s.show_dataset);
    }

    #[test]
    fn broken_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_p = dir.path().join("dashboard.json");
        fs::write(&config_p, r#"{"recordsPath": 3}"#).unwrap();
        let config_s = config_p.display().to_string();
        assert!(matches!(
            resolve_settings(&args(&["--config", config_s.as_str()])),
            Err(EnergyError::ParsingJson { .. })
        ));
        assert!(matches!(
            read_config(&dir.path().join("nope.json")),
            Err(EnergyError::OpeningJson { .. })
        ));
    }
}
