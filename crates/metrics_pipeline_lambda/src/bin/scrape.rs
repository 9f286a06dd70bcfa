use std::path::PathBuf;

use clap::Parser;
use metrics_pipeline_core::synthetic::{generate_scrape_payload, unix_now, DEFAULT_SCRAPE_VALUES};
use metrics_pipeline_lambda::adapters::aws::{AwsClients, S3RawObjectStore};
use metrics_pipeline_lambda::logging::init_tracing;
use metrics_pipeline_lambda::scraper::{run_scrape, DEFAULT_OUTPUT_PATH};
use tokio::runtime::Handle;

#[derive(Parser)]
#[command(
    name = "scrape",
    about = "Generate a synthetic scrape payload and store it locally or in S3"
)]
struct Cli {
    /// Bucket to upload to; the payload is written locally when unset
    #[arg(long, env = "BUCKET_NAME")]
    bucket: Option<String>,
    /// Local output file
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,
    /// Number of random values in the payload
    #[arg(long, default_value_t = DEFAULT_SCRAPE_VALUES)]
    count: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let payload = generate_scrape_payload(&mut rand::thread_rng(), unix_now(), cli.count);

    let outcome = run_scrape(
        cli.bucket.as_deref(),
        |bucket: &str| {
            let clients =
                tokio::task::block_in_place(|| Handle::current().block_on(AwsClients::load()));
            S3RawObjectStore::new(clients.s3, bucket)
        },
        &cli.output,
        &payload,
    )?;

    println!("{outcome}");
    Ok(())
}
