pub mod boundary;
pub mod cli;
pub mod config;
pub mod csv_handler;
pub mod error;
pub mod geocode;
pub mod institution;
pub mod report;

use chrono::Utc;
use clap::Parser;
use cli::Cli;
use config::ResolverConfig;
use csv_handler::load_institutions;
use error::{CrateError, Result};
use geocode::cache::GeocodeCache;
use geocode::nominatim::{self, RateLimiter};
use indicatif::{ProgressBar, ProgressStyle};
use institution::canonical::canonical_set;
use log::{error, info};
use report::{ResolutionRecord, ResolutionStatus, write_report};
use reqwest::Client;
use std::collections::HashSet;
use std::fs;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .format_target(false)
        .format_timestamp_secs()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .expect("Failed to initialize logger");

    let cli = Cli::parse();
    info!("Starting institution resolver...");
    info!("Input file: {:?}", cli.input_file);
    info!("Cache file: {:?}", cli.cache_file);
    if let Some(config_file) = &cli.config_file {
        info!("Config file: {:?}", config_file);
    }

    let start_time = Instant::now();

    // 1. Load raw institution names
    let raw_names = match load_institutions(&cli.input_file, &cli.institution_column) {
        Ok(names) => {
            info!("Loaded {} raw institution names.", names.len());
            names
        }
        Err(e) => {
            error!("Failed to load input CSV: {}", e);
            return Err(e);
        }
    };

    if raw_names.is_empty() {
        info!("Input CSV contains no institutions. Exiting.");
        return Ok(());
    }

    // 2. Load resolver configuration and canonicalize
    let config = match &cli.config_file {
        Some(path) => ResolverConfig::load(path)?,
        None => ResolverConfig::default(),
    };

    let canonical_names = canonical_set(&raw_names, &config.aliases);
    info!("Found {} unique institutions.", canonical_names.len());

    // 3. Load cache and compute misses
    let mut cache = GeocodeCache::load(&cli.cache_file)?;
    let missing: Vec<String> = cache
        .missing(&canonical_names)
        .into_iter()
        .cloned()
        .collect();

    let client = Client::builder()
        .user_agent(nominatim::USER_AGENT)
        .build()
        .map_err(CrateError::ApiRequestError)?;

    // 4. Geocode misses, one at a time behind the politeness throttle
    let mut records: Vec<ResolutionRecord> = Vec::with_capacity(canonical_names.len());
    let mut geocoded_count = 0;
    let mut not_found_count = 0;
    let mut errors_count = 0;
    let mut failure_details: Vec<String> = Vec::new();

    if missing.is_empty() {
        info!("All institutions found in cache, no geocoding needed.");
    } else {
        info!("Geocoding {} new institutions...", missing.len());
        let mut limiter = RateLimiter::new(Duration::from_secs(cli.min_delay_secs));
        let pb = ProgressBar::new(missing.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .expect("Failed to set progress bar style")
                .progress_chars("##-"),
        );

        for name in &missing {
            let query = nominatim::build_query(name, &config.query_overrides, &cli.region);
            pb.set_message(format!("Geocoding: {}", name));

            limiter.wait().await;
            let outcome = nominatim::resolve(&query, &client).await;
            let record = ResolutionRecord::from_outcome(
                name,
                query,
                config.label_offsets.get(name).copied(),
                outcome,
                &mut cache,
            );
            match record.status {
                ResolutionStatus::Geocoded => geocoded_count += 1,
                ResolutionStatus::NotFound => {
                    let detail = format!("Not found: {}", record.canonical_name);
                    pb.println(&detail);
                    failure_details.push(detail);
                    not_found_count += 1;
                }
                ResolutionStatus::Failed => {
                    let detail = format!(
                        "Error geocoding {}: {}",
                        record.canonical_name,
                        record.failure_detail.as_deref().unwrap_or("unknown error")
                    );
                    pb.println(&detail);
                    failure_details.push(detail);
                    errors_count += 1;
                }
                ResolutionStatus::Cached => {}
            }
            records.push(record);
            pb.inc(1);
        }
        pb.finish_with_message("Geocoding complete.");

        // 5. Persist the extended cache
        cache.save(&cli.cache_file)?;
    }

    // Cached names were never queried; fold them into the report too.
    let missed: HashSet<&str> = missing.iter().map(String::as_str).collect();
    for name in &canonical_names {
        if missed.contains(name.as_str()) {
            continue;
        }
        if let Some(coordinate) = cache.get(name) {
            records.push(ResolutionRecord {
                canonical_name: name.clone(),
                status: ResolutionStatus::Cached,
                coordinate: Some(coordinate),
                label_offset: config.label_offsets.get(name).copied(),
                query: nominatim::build_query(name, &config.query_overrides, &cli.region),
                failure_detail: None,
            });
        }
    }
    records.sort_by(|a, b| a.canonical_name.cmp(&b.canonical_name));

    let cached_count = records
        .iter()
        .filter(|r| r.status == ResolutionStatus::Cached)
        .count();
    info!(
        "Total geocoded institutions: {}",
        cached_count + geocoded_count
    );

    // 6. Optional boundary download
    if let Some(boundary_file) = &cli.boundary_file {
        let geojson = boundary::fetch_boundary(&cli.boundary_url, &client).await?;
        fs::write(boundary_file, geojson)?;
        info!("Boundary data saved to {:?}", boundary_file);
    }

    // 7. Optional resolution report
    if let Some(output_file) = &cli.output_file {
        write_report(&records, output_file, Utc::now().date_naive())?;
        info!("Resolution report saved to {:?}", output_file);
    }

    let duration = start_time.elapsed();

    println!("\n--- Summary Report ---");
    println!("Raw institution names read: {}", raw_names.len());
    println!("Unique canonical institutions: {}", canonical_names.len());
    println!("Resolved from cache: {}", cached_count);
    println!("Newly geocoded this run: {}", geocoded_count);
    println!("Not found by the lookup service: {}", not_found_count);
    println!("Lookup errors: {}", errors_count);
    if !failure_details.is_empty() {
        println!("\n--- Unresolved institutions ---");
        for detail in &failure_details {
            println!("- {}", detail);
        }
        println!(
            "These names stay out of the cache and will be retried on the next run; \
check the review_url column of the report to refine their queries."
        );
    }
    if let Some(output_file) = &cli.output_file {
        println!("Per-institution report saved to: {}", output_file.display());
    }
    println!("Execution time: {:.2?}", duration);

    Ok(())
}
