// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

/// One power plant, as read from the records file.
///
/// Before normalization `canton` holds the two-letter code (`ZH`), after
/// normalization it holds the full canton name (`Zürich`).
#[derive(PartialEq, Debug, Clone)]
pub struct PowerPlantRecord {
    pub canton: String,
    pub energy_source_level_2: String,
    pub production: f64,
}

impl PowerPlantRecord {
    pub fn new(canton: &str, energy_source_level_2: &str, production: f64) -> PowerPlantRecord {
        PowerPlantRecord {
            canton: canton.to_string(),
            energy_source_level_2: energy_source_level_2.to_string(),
            production,
        }
    }
}

/// The label used by the source selector to mean "no filtering".
pub const ALL_SOURCES: &str = "All";

/// Restricts the records to one energy source, or keeps all of them.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Default)]
pub enum SourceFilter {
    #[default]
    All,
    Source(String),
}

impl SourceFilter {
    pub fn label(&self) -> &str {
        match self {
            SourceFilter::All => ALL_SOURCES,
            SourceFilter::Source(s) => s.as_str(),
        }
    }

    pub fn accepts(&self, record: &PowerPlantRecord) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Source(s) => record.energy_source_level_2 == *s,
        }
    }
}

impl From<&str> for SourceFilter {
    fn from(s: &str) -> Self {
        if s == ALL_SOURCES {
            SourceFilter::All
        } else {
            SourceFilter::Source(s.to_string())
        }
    }
}

impl FromStr for SourceFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SourceFilter::from(s))
    }
}

impl Display for SourceFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ********* Canton codes **********

/// The 26 Swiss cantons, by their two-letter code.
///
/// The names are the ones used by the `kan_name` property of the cantonal
/// boundaries, so that the aggregates can be joined with the map.
pub const SWISS_CANTONS: [(&str, &str); 26] = [
    ("TG", "Thurgau"),
    ("GR", "Graubünden"),
    ("LU", "Luzern"),
    ("BE", "Bern"),
    ("VS", "Valais"),
    ("BL", "Basel-Landschaft"),
    ("SO", "Solothurn"),
    ("VD", "Vaud"),
    ("SH", "Schaffhausen"),
    ("ZH", "Zürich"),
    ("AG", "Aargau"),
    ("UR", "Uri"),
    ("NE", "Neuchâtel"),
    ("TI", "Ticino"),
    ("SG", "St. Gallen"),
    ("GE", "Genève"),
    ("GL", "Glarus"),
    ("JU", "Jura"),
    ("ZG", "Zug"),
    ("OW", "Obwalden"),
    ("FR", "Fribourg"),
    ("SZ", "Schwyz"),
    ("AR", "Appenzell Ausserrhoden"),
    ("AI", "Appenzell Innerrhoden"),
    ("NW", "Nidwalden"),
    ("BS", "Basel-Stadt"),
];

/// A read-only mapping from canton codes to canton names.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CantonTable {
    names: HashMap<String, String>,
}

impl CantonTable {
    /// The table of all the Swiss cantons.
    pub fn swiss() -> CantonTable {
        CantonTable::from_pairs(&SWISS_CANTONS)
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> CantonTable {
        CantonTable {
            names: pairs
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
        }
    }

    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(code).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct CantonProductionTotal {
    pub canton: String,
    pub total_production: f64,
}

impl CantonProductionTotal {
    /// `ln(1 + production)`, the value plotted on a logarithmic axis.
    pub fn log_production(&self) -> f64 {
        self.total_production.ln_1p()
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CantonCount {
    pub canton: String,
    pub count: u64,
}

/// Number of plants for every (canton, source) pair.
///
/// Invariant: every row holds exactly one count per entry of `sources`, in the
/// same order. Missing pairs are filled with zero.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SourceCountMatrix {
    pub sources: Vec<String>,
    pub rows: Vec<(String, Vec<u64>)>,
}

impl SourceCountMatrix {
    pub fn counts_for(&self, canton: &str) -> Option<&[u64]> {
        self.rows
            .iter()
            .find(|(c, _)| c == canton)
            .map(|(_, counts)| counts.as_slice())
    }

    /// The counts of a canton, each paired with its source name.
    pub fn labelled_row(&self, canton: &str) -> Option<Vec<(String, u64)>> {
        self.counts_for(canton).map(|counts| {
            self.sources
                .iter()
                .cloned()
                .zip(counts.iter().cloned())
                .collect()
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Everything needed to draw the dashboard for one source selection.
#[derive(PartialEq, Debug, Clone)]
pub struct DashboardView {
    pub filter: SourceFilter,
    /// Computed over all the records, regardless of the filter.
    pub production: Vec<CantonProductionTotal>,
    pub counts: Vec<CantonCount>,
    pub matrix: SourceCountMatrix,
    pub source_options: Vec<String>,
}

/// Errors that prevent the records from being aggregated.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum CantonErrors {
    /// A canton code that is not in the table.
    UnknownCantonCode(String),
}

impl Error for CantonErrors {}

impl Display for CantonErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CantonErrors::UnknownCantonCode(code) => write!(f, "Unknown canton code {:?}", code),
        }
    }
}
