use clap::Parser;

/// Aggregates the renewable power plants of Switzerland by canton and energy source.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the settings of the run. The flags below
    /// override the values of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, default ./data/raw/renewable_power_plants_CH.csv) The CSV file with the
    /// power plant records.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path, default ./data/raw/georef-switzerland-kanton.geojson) The GeoJSON file
    /// with the boundaries of the cantons.
    #[clap(short, long, value_parser)]
    pub boundaries: Option<String>,

    /// (default All) Only count the plants of this energy source.
    #[clap(short, long, value_parser)]
    pub source: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the summary in JSON format.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, chenergy will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// If passed as an argument, prints the normalized records.
    #[clap(long, takes_value = false)]
    pub show_dataset: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
