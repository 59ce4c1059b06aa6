// Primitives for reading the power plant records.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::energy::{io_common::simplify_file_name, *};

// Only the columns used by the aggregation are read, the other ones are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    canton: String,
    energy_source_level_2: String,
    production: Option<f64>,
}

pub fn read_power_plants(path: &Path) -> EnergyResult<Vec<PowerPlantRecord>> {
    let path_s = path.display().to_string();
    info!("Attempting to read records file {:?}", path_s);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(OpeningCsvSnafu {
            path: path_s.clone(),
        })?;
    let headers = rdr
        .headers()
        .context(ParsingCsvSnafu {
            path: path_s.clone(),
            lineno: 1_u64,
        })?
        .clone();
    debug!("read_power_plants: headers: {:?}", headers);

    let mut res: Vec<PowerPlantRecord> = Vec::new();
    let mut num_missing: usize = 0;
    for (idx, line_r) in rdr.records().enumerate() {
        // The header takes the first line.
        let default_lineno = (idx + 2) as u64;
        let line = line_r.context(ParsingCsvSnafu {
            path: path_s.clone(),
            lineno: default_lineno,
        })?;
        let lineno = line
            .position()
            .map(|p| p.line())
            .unwrap_or(default_lineno);
        let row: CsvRow = line.deserialize(Some(&headers)).context(ParsingCsvSnafu {
            path: path_s.clone(),
            lineno,
        })?;
        debug!("read_power_plants: lineno: {:?} row: {:?}", lineno, row);

        let production = match row.production {
            Some(p) if !p.is_finite() || p < 0.0 => {
                return InvalidProductionSnafu {
                    path: path_s,
                    lineno,
                    production: p,
                }
                .fail();
            }
            Some(p) => p,
            None => {
                num_missing += 1;
                0.0
            }
        };
        res.push(PowerPlantRecord {
            canton: row.canton,
            energy_source_level_2: row.energy_source_level_2,
            production,
        });
    }
    if num_missing > 0 {
        info!(
            "{}: {:?} records without production, counted as zero",
            simplify_file_name(path),
            num_missing
        );
    }
    info!(
        "Read {:?} records from {}",
        res.len(),
        simplify_file_name(path)
    );
    Ok(res)
}

/// Keeps the records already read, by file path.
///
/// The files are assumed not to change while the program runs: an entry stays
/// until it is explicitly invalidated.
#[derive(Debug, Default)]
pub struct RecordCache {
    entries: HashMap<PathBuf, Vec<PowerPlantRecord>>,
}

impl RecordCache {
    pub fn new() -> RecordCache {
        RecordCache::default()
    }

    /// Returns the records of the file, reading it only if it is not cached yet.
    pub fn load(&mut self, path: &Path) -> EnergyResult<&[PowerPlantRecord]> {
        match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(e) => {
                debug!("RecordCache: hit for {:?}", path);
                Ok(e.into_mut().as_slice())
            }
            Entry::Vacant(e) => {
                let records = read_power_plants(path)?;
                Ok(e.insert(records).as_slice())
            }
        }
    }

    /// Forgets one file. Returns true if it was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
