use crate::boundary::SWISS_BOUNDARY_URL;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the input CSV file listing institution names.
    #[arg(short, long, value_name = "FILE")]
    pub input_file: PathBuf,

    /// Header of the CSV column holding the institution names.
    #[arg(long, value_name = "NAME", default_value = "institution")]
    pub institution_column: String,

    /// Path to a JSON file with aliases, query overrides and label offsets.
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Path to the persistent geocoding cache.
    #[arg(long, value_name = "FILE", default_value = "geocoding_cache.json")]
    pub cache_file: PathBuf,

    /// Path to the TSV resolution report to write.
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Region qualifier appended to every geocoding query.
    #[arg(long, value_name = "NAME", default_value = "Switzerland")]
    pub region: String,

    /// Minimum delay between geocoding requests, in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 2)]
    pub min_delay_secs: u64,

    /// Download the region boundary GeoJSON to this path.
    #[arg(long, value_name = "FILE")]
    pub boundary_file: Option<PathBuf>,

    /// URL of the boundary GeoJSON to download.
    #[arg(long, value_name = "URL", default_value = SWISS_BOUNDARY_URL)]
    pub boundary_url: String,
}
