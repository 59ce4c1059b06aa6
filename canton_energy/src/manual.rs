/*!

This is the long-form manual for `canton_energy` and `chenergy`.

## Input formats

Two files are read. Both are expected to be local and to stay unchanged while
the program runs.

### Power plant records

A comma separated file in UTF-8, with a header row. The columns are found by
their name in the header, their position does not matter and the other columns
are ignored.

```text
project_name,energy_source_level_2,canton,production
Plant A,Solar,ZH,10.5
Plant B,Wind,ZH,5
Plant C,Solar,BE,
```

* `canton` the two-letter code of the canton (`ZH`, `BE`, ...). All the 26
   official codes are accepted, any other code stops the program.
* `energy_source_level_2` the type of renewable energy (`Solar`, `Hydro`, ...).
   Any value is accepted.
* `production` the energy produced, a non-negative number. An empty cell is
   counted as zero.

### Cantonal boundaries

A GeoJSON `FeatureCollection`. Each feature carries the name of its canton in
the `kan_name` property, either as a string or as a list with a single
string. The names must match the ones of [`crate::SWISS_CANTONS`].

The boundaries are only used to check that every canton present in the records
can be drawn on a map.

## Configuration

The command line flags can also be stored in a JSON file passed with
`--config`. All the fields are optional:

```json
{
  "recordsPath": "data/raw/renewable_power_plants_CH.csv",
  "boundariesPath": "data/raw/georef-switzerland-kanton.geojson",
  "sourceFilter": "Solar",
  "outputPath": "summary.json"
}
```

Relative paths are resolved against the directory of the configuration file.
A flag given on the command line takes precedence over the file.

## Output

The summary is a JSON document:

* `productionByCanton` the total production of each canton, with its
  `ln(1 + x)` value for plotting on a logarithmic axis. This table does not
  depend on the source filter.
* `sourceOptions` the values accepted by `--source`.
* `countsByCanton` the number of plants of each canton, after filtering.
* `sourceMatrix` the number of plants for each canton and each source, after
  filtering. The `counts` of each canton are aligned with `sources`.
* `missingBoundaries` the cantons present in the records without a boundary.

*/
