mod config;
pub mod manual;

use log::{debug, info};

use std::collections::{BTreeSet, HashMap};

pub use crate::config::*;

// **** Private structures ****

// Position of a key in first-seen order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct GroupId(usize);

/// Assigns a stable id to every distinct key, in the order the keys are first seen.
#[derive(Debug, Default)]
struct FirstSeen<'a> {
    ids: HashMap<&'a str, GroupId>,
    keys: Vec<&'a str>,
}

impl<'a> FirstSeen<'a> {
    fn id(&mut self, key: &'a str) -> GroupId {
        if let Some(gid) = self.ids.get(key) {
            return *gid;
        }
        let gid = GroupId(self.keys.len());
        self.ids.insert(key, gid);
        self.keys.push(key);
        gid
    }

    fn get(&self, key: &str) -> Option<GroupId> {
        self.ids.get(key).cloned()
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn into_keys(self) -> Vec<String> {
        self.keys.iter().map(|k| k.to_string()).collect()
    }
}

// **** Normalization ****

/// Replaces the canton code of every record by the full canton name.
///
/// The input is left untouched. The first code that is not part of `table`
/// aborts the normalization: names are not codes, so normalizing a collection
/// twice fails as well.
pub fn normalize_cantons(
    records: &[PowerPlantRecord],
    table: &CantonTable,
) -> Result<Vec<PowerPlantRecord>, CantonErrors> {
    debug!(
        "normalize_cantons: {:?} records, {:?} codes",
        records.len(),
        table.len()
    );
    let mut res: Vec<PowerPlantRecord> = Vec::with_capacity(records.len());
    for r in records.iter() {
        let name = table
            .name(&r.canton)
            .ok_or_else(|| CantonErrors::UnknownCantonCode(r.canton.clone()))?;
        res.push(PowerPlantRecord {
            canton: name.to_string(),
            ..r.clone()
        });
    }
    Ok(res)
}

// **** Aggregation ****

/// Sums the production of each canton.
///
/// The cantons are returned in the order they first appear in `records`.
pub fn total_production_by_canton(records: &[PowerPlantRecord]) -> Vec<CantonProductionTotal> {
    let mut cantons = FirstSeen::default();
    let mut totals: Vec<f64> = Vec::new();
    for r in records.iter() {
        let GroupId(idx) = cantons.id(&r.canton);
        if idx == totals.len() {
            totals.push(0.0);
        }
        totals[idx] += r.production;
    }
    cantons
        .into_keys()
        .into_iter()
        .zip(totals)
        .map(|(canton, total_production)| CantonProductionTotal {
            canton,
            total_production,
        })
        .collect()
}

/// The records matching the filter. An empty result is valid.
pub fn select_by_source(records: &[PowerPlantRecord], filter: &SourceFilter) -> Vec<PowerPlantRecord> {
    let res: Vec<PowerPlantRecord> = records
        .iter()
        .filter(|r| filter.accepts(r))
        .cloned()
        .collect();
    debug!(
        "select_by_source: filter {:?} kept {:?} of {:?} records",
        filter,
        res.len(),
        records.len()
    );
    res
}

/// Number of records for each canton, in first-seen order.
pub fn count_by_canton(records: &[PowerPlantRecord]) -> Vec<CantonCount> {
    let mut cantons = FirstSeen::default();
    let mut counts: Vec<u64> = Vec::new();
    for r in records.iter() {
        let GroupId(idx) = cantons.id(&r.canton);
        if idx == counts.len() {
            counts.push(0);
        }
        counts[idx] += 1;
    }
    cantons
        .into_keys()
        .into_iter()
        .zip(counts)
        .map(|(canton, count)| CantonCount { canton, count })
        .collect()
}

/// Builds the dense canton × source count matrix.
///
/// The columns are the sources present in `records` (first-seen order), so a
/// filtered record set yields fewer columns. Every canton gets a count for
/// every column, zero when it has no plant of that source.
pub fn source_count_matrix(records: &[PowerPlantRecord]) -> SourceCountMatrix {
    // First pass: the columns.
    let mut sources = FirstSeen::default();
    for r in records.iter() {
        sources.id(&r.energy_source_level_2);
    }
    let num_sources = sources.len();

    // Second pass: one aligned row per canton.
    let mut cantons = FirstSeen::default();
    let mut rows: Vec<Vec<u64>> = Vec::new();
    for r in records.iter() {
        let GroupId(row_idx) = cantons.id(&r.canton);
        if row_idx == rows.len() {
            rows.push(vec![0; num_sources]);
        }
        // Every source was registered in the first pass.
        if let Some(GroupId(col_idx)) = sources.get(&r.energy_source_level_2) {
            rows[row_idx][col_idx] += 1;
        }
    }

    SourceCountMatrix {
        sources: sources.into_keys(),
        rows: cantons.into_keys().into_iter().zip(rows).collect(),
    }
}

/// The choices offered by the source selector: `All`, then every source in
/// alphabetical order.
pub fn source_options(records: &[PowerPlantRecord]) -> Vec<String> {
    let distinct: BTreeSet<&str> = records
        .iter()
        .map(|r| r.energy_source_level_2.as_str())
        .collect();
    let mut res = vec![ALL_SOURCES.to_string()];
    res.extend(distinct.into_iter().map(|s| s.to_string()));
    res
}

impl DashboardView {
    /// Computes all the aggregates for one selection of the source filter.
    ///
    /// `records` are expected to be normalized already. The production totals
    /// ignore the filter, the counts and the matrix follow it.
    pub fn compute(records: &[PowerPlantRecord], filter: &SourceFilter) -> DashboardView {
        info!(
            "Computing dashboard over {:?} records, source filter: {}",
            records.len(),
            filter
        );
        let production = total_production_by_canton(records);
        let selected = select_by_source(records, filter);
        let counts = count_by_canton(&selected);
        let matrix = source_count_matrix(&selected);
        info!(
            "{:?} cantons with production, {:?} cantons and {:?} sources after filtering",
            production.len(),
            counts.len(),
            matrix.sources.len()
        );
        DashboardView {
            filter: filter.clone(),
            production,
            counts,
            matrix,
            source_options: source_options(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sample_table() -> CantonTable {
        CantonTable::from_pairs(&[("ZH", "Zürich"), ("BE", "Bern")])
    }

    fn sample_records() -> Vec<PowerPlantRecord> {
        vec![
            PowerPlantRecord::new("ZH", "Solar", 10.0),
            PowerPlantRecord::new("ZH", "Wind", 5.0),
            PowerPlantRecord::new("BE", "Solar", 7.0),
        ]
    }

    fn normalized() -> Vec<PowerPlantRecord> {
        normalize_cantons(&sample_records(), &sample_table()).unwrap()
    }

    #[test]
    fn swiss_table_is_complete() {
        let table = CantonTable::swiss();
        assert_eq!(table.len(), 26);
        assert_eq!(table.name("ZH"), Some("Zürich"));
        assert_eq!(table.name("GE"), Some("Genève"));
        assert_eq!(table.name("AI"), Some("Appenzell Innerrhoden"));
        assert_eq!(table.name("XX"), None);
    }

    #[test]
    fn normalize_rewrites_codes() {
        init();
        let res = normalized();
        let cantons: Vec<&str> = res.iter().map(|r| r.canton.as_str()).collect();
        assert_eq!(cantons, vec!["Zürich", "Zürich", "Bern"]);
        assert_eq!(res[1].energy_source_level_2, "Wind");
        assert_eq!(res[1].production, 5.0);
    }

    #[test]
    fn normalize_unknown_code() {
        let mut records = sample_records();
        records.push(PowerPlantRecord::new("GE", "Hydro", 1.0));
        assert_eq!(
            normalize_cantons(&records, &sample_table()),
            Err(CantonErrors::UnknownCantonCode("GE".to_string()))
        );
    }

    #[test]
    fn normalize_twice_fails() {
        assert_eq!(
            normalize_cantons(&normalized(), &sample_table()),
            Err(CantonErrors::UnknownCantonCode("Zürich".to_string()))
        );
    }

    #[test]
    fn total_production_example() {
        let res = total_production_by_canton(&normalized());
        assert_eq!(
            res,
            vec![
                CantonProductionTotal {
                    canton: "Zürich".to_string(),
                    total_production: 15.0
                },
                CantonProductionTotal {
                    canton: "Bern".to_string(),
                    total_production: 7.0
                },
            ]
        );
    }

    #[test]
    fn total_production_is_conserved() {
        let records = vec![
            PowerPlantRecord::new("Bern", "Solar", 1.5),
            PowerPlantRecord::new("Uri", "Hydro", 120.25),
            PowerPlantRecord::new("Bern", "Biomass", 3.0),
            PowerPlantRecord::new("Zug", "Solar", 0.0),
            PowerPlantRecord::new("Uri", "Solar", 2.5),
        ];
        let grouped: f64 = total_production_by_canton(&records)
            .iter()
            .map(|t| t.total_production)
            .sum();
        let direct: f64 = records.iter().map(|r| r.production).sum();
        assert_eq!(grouped, direct);
    }

    #[test]
    fn log_production() {
        let t = CantonProductionTotal {
            canton: "Uri".to_string(),
            total_production: 0.0,
        };
        assert_eq!(t.log_production(), 0.0);
        let t = CantonProductionTotal {
            canton: "Uri".to_string(),
            total_production: std::f64::consts::E - 1.0,
        };
        assert!((t.log_production() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn select_all_is_identity() {
        let records = normalized();
        assert_eq!(select_by_source(&records, &SourceFilter::All), records);
        assert_eq!("All".parse::<SourceFilter>(), Ok(SourceFilter::All));
    }

    #[test]
    fn select_solar() {
        let solar = select_by_source(&normalized(), &"Solar".parse().unwrap());
        assert_eq!(
            count_by_canton(&solar),
            vec![
                CantonCount {
                    canton: "Zürich".to_string(),
                    count: 1
                },
                CantonCount {
                    canton: "Bern".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn select_without_match() {
        let none = select_by_source(&normalized(), &SourceFilter::Source("Geothermal".to_string()));
        assert!(none.is_empty());
        assert!(total_production_by_canton(&none).is_empty());
        assert!(count_by_canton(&none).is_empty());
        let matrix = source_count_matrix(&none);
        assert!(matrix.is_empty());
        assert!(matrix.sources.is_empty());
    }

    #[test]
    fn matrix_example() {
        let matrix = source_count_matrix(&normalized());
        assert_eq!(matrix.sources, vec!["Solar", "Wind"]);
        assert_eq!(matrix.counts_for("Zürich"), Some(&[1, 1][..]));
        assert_eq!(matrix.counts_for("Bern"), Some(&[1, 0][..]));
        assert_eq!(matrix.counts_for("Uri"), None);
        assert_eq!(
            matrix.labelled_row("Bern"),
            Some(vec![("Solar".to_string(), 1), ("Wind".to_string(), 0)])
        );
    }

    #[test]
    fn matrix_collapses_with_filter() {
        let wind = select_by_source(&normalized(), &SourceFilter::Source("Wind".to_string()));
        let matrix = source_count_matrix(&wind);
        assert_eq!(matrix.sources, vec!["Wind"]);
        assert_eq!(matrix.rows, vec![("Zürich".to_string(), vec![1])]);
    }

    #[test]
    fn matrix_rows_reconcile_with_counts() {
        let records = vec![
            PowerPlantRecord::new("Bern", "Solar", 1.0),
            PowerPlantRecord::new("Uri", "Hydro", 1.0),
            PowerPlantRecord::new("Bern", "Biomass", 1.0),
            PowerPlantRecord::new("Bern", "Solar", 1.0),
            PowerPlantRecord::new("Zug", "Wind", 1.0),
            PowerPlantRecord::new("Uri", "Solar", 1.0),
        ];
        for filter in [SourceFilter::All, SourceFilter::from("Solar")] {
            let selected = select_by_source(&records, &filter);
            let matrix = source_count_matrix(&selected);
            let counts = count_by_canton(&selected);
            assert_eq!(matrix.rows.len(), counts.len());
            for ((canton, row), cc) in matrix.rows.iter().zip(counts.iter()) {
                assert_eq!(*canton, cc.canton);
                assert_eq!(row.len(), matrix.sources.len());
                assert_eq!(row.iter().sum::<u64>(), cc.count);
            }
        }
        let solar = select_by_source(&records, &SourceFilter::from("Solar"));
        let matrix = source_count_matrix(&solar);
        assert_eq!(matrix.sources, vec!["Solar"]);
        assert_eq!(matrix.counts_for("Bern"), Some(&[2_u64][..]));
        assert_eq!(matrix.counts_for("Uri"), Some(&[1_u64][..]));
        assert_eq!(matrix.counts_for("Zug"), None);
    }

    #[test]
    fn options_are_sorted() {
        let records = vec![
            PowerPlantRecord::new("Bern", "Wind", 1.0),
            PowerPlantRecord::new("Uri", "Hydro", 1.0),
            PowerPlantRecord::new("Bern", "Biomass", 1.0),
            PowerPlantRecord::new("Zug", "Wind", 1.0),
        ];
        assert_eq!(
            source_options(&records),
            vec!["All", "Biomass", "Hydro", "Wind"]
        );
    }

    #[test]
    fn dashboard_view_filters_counts_only() {
        init();
        let view = DashboardView::compute(&normalized(), &SourceFilter::Source("Wind".to_string()));
        assert_eq!(view.production.len(), 2);
        assert_eq!(
            view.counts,
            vec![CantonCount {
                canton: "Zürich".to_string(),
                count: 1
            }]
        );
        assert_eq!(view.matrix.sources, vec!["Wind"]);
        assert_eq!(view.source_options, vec!["All", "Solar", "Wind"]);
        assert_eq!(view.filter.label(), "Wind");
    }
}
