// Reading of the cantonal boundaries.

use std::collections::HashSet;
use std::path::Path;

use geojson::{FeatureCollection, GeoJson, JsonValue};

use crate::energy::*;

/// The feature property holding the name of the canton.
pub const CANTON_NAME_PROPERTY: &str = "kan_name";

/// The boundaries of the cantons, as read from a GeoJSON feature collection.
#[derive(Debug, Clone)]
pub struct GeoBoundaries {
    collection: FeatureCollection,
    names: Vec<String>,
}

impl GeoBoundaries {
    pub fn from_collection(collection: FeatureCollection) -> GeoBoundaries {
        let mut names: Vec<String> = Vec::new();
        for (idx, feature) in collection.features.iter().enumerate() {
            let name = feature
                .properties
                .as_ref()
                .and_then(|props| props.get(CANTON_NAME_PROPERTY))
                .and_then(canton_name);
            match name {
                Some(n) => names.push(n),
                None => warn!(
                    "Boundary feature #{} has no usable {:?} property, skipping it",
                    idx, CANTON_NAME_PROPERTY
                ),
            }
        }
        GeoBoundaries { collection, names }
    }

    /// The canton names, in the order of the features.
    pub fn canton_names(&self) -> &[String] {
        self.names.as_slice()
    }

    pub fn contains(&self, canton: &str) -> bool {
        self.names.iter().any(|n| n == canton)
    }

    pub fn feature_count(&self) -> usize {
        self.collection.features.len()
    }

    /// The cantons that have no boundary, without duplicates and in input order.
    pub fn missing_cantons<'a, I>(&self, cantons: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let known: HashSet<&str> = self.names.iter().map(|s| s.as_str()).collect();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut res: Vec<String> = Vec::new();
        for c in cantons {
            if !known.contains(c) && seen.insert(c) {
                res.push(c.to_string());
            }
        }
        res
    }
}

// Some exports store the name as a list with a single element.
fn canton_name(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Array(elts) => match elts.as_slice() {
            [JsonValue::String(s)] => Some(s.clone()),
            _ => None,
        },
        _ => None,
    }
}

pub fn read_boundaries(path: &Path) -> EnergyResult<GeoBoundaries> {
    let path_s = path.display().to_string();
    info!("Attempting to read boundaries file {:?}", path_s);
    let contents = fs::read_to_string(path).context(OpeningGeoJsonSnafu {
        path: path_s.clone(),
    })?;
    let geojson: GeoJson = contents.parse().context(ParsingGeoJsonSnafu {
        path: path_s.clone(),
    })?;
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            let res = GeoBoundaries::from_collection(fc);
            info!(
                "Read {:?} boundary features, {:?} named cantons",
                res.feature_count(),
                res.canton_names().len()
            );
            Ok(res)
        }
        _ => NotAFeatureCollectionSnafu { path: path_s }.fail(),
    }
}
