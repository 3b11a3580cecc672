//! HangJeongDong dataset ingest pipeline.
//!
//! Parses the boundary GeoJSON, normalizes administrative names,
//! and bulk-loads the normalized regions into Elasticsearch.

mod es_region_doc;
mod reader;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use ginkgo::elasticsearch::{create_index, BulkIndexer, EsClient};
use ginkgo::models::NormalizedRegion;
use ginkgo::normalize::normalize;

use crate::es_region_doc::EsRegionDoc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Ingest HangJeongDong boundary data into Elasticsearch")]
struct Args {
    /// GeoJSON dataset file to import
    #[arg(short, long)]
    file: PathBuf,

    /// Elasticsearch URL
    #[arg(long, default_value = "http://localhost:9200")]
    es_url: String,

    /// Elasticsearch index name
    #[arg(long, default_value = "regions")]
    index: String,

    /// Create/recreate index before import
    #[arg(long)]
    create_index: bool,

    /// Batch size for bulk indexing
    #[arg(long, default_value = "1000")]
    batch_size: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Ginkgo Ingest Pipeline");
    info!("File: {}", args.file.display());

    // Connect to Elasticsearch
    let es_client = EsClient::new(&args.es_url, &args.index)
        .await
        .context("Failed to connect to Elasticsearch")?;

    if !es_client.health_check().await? {
        anyhow::bail!("Elasticsearch cluster is not healthy");
    }
    info!("Connected to Elasticsearch");

    if args.create_index {
        create_index(&es_client, true).await?;
    }

    // Get source file name for refresh tracking
    let source_file = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown.geojson")
        .to_string();

    // Parse the boundary dataset
    let features = reader::read_features(&args.file)?;
    if features.is_empty() {
        anyhow::bail!("No usable boundary features in {}", args.file.display());
    }

    // Normalization is pure per-feature work, so run it in parallel
    info!("Normalizing {} features...", features.len());
    let regions: Vec<NormalizedRegion> = features
        .par_iter()
        .map(|raw| normalize(raw, &source_file))
        .collect();

    // Bulk load into Elasticsearch
    let pb = ProgressBar::new(regions.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let mut indexer = BulkIndexer::new(es_client.clone(), args.batch_size);

    for region in &regions {
        match EsRegionDoc::from_region(region) {
            Some(doc) => indexer.add(doc).await?,
            None => warn!("Skipping region with degenerate geometry: {}", region.address),
        }
        pb.inc(1);
    }

    let (indexed, errors) = indexer.finish().await?;
    pb.finish();

    info!("Indexed {} regions ({} errors)", indexed, errors);
    info!("Index now holds {} documents", es_client.doc_count().await?);

    Ok(())
}
