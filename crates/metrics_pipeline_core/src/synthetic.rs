use chrono::Utc;
use rand::Rng;

use crate::contract::{Metrics, MetricsPayload, ScrapePayload};

pub const CLICKS_MIN: i64 = 50;
pub const CLICKS_MAX: i64 = 500;
pub const IMPRESSIONS_MIN: i64 = 1_000;
pub const IMPRESSIONS_MAX: i64 = 10_000;
pub const CTR_MIN: f64 = 0.01;
pub const CTR_MAX_EXCLUSIVE: f64 = 0.2;
pub const CTR_DECIMAL_PLACES: i32 = 4;
pub const DEFAULT_SCRAPE_VALUES: usize = 20;
pub const SCRAPE_VALUE_MAX: u8 = 100;

// Largest 4-place value below the exclusive bound; rounding can otherwise land on 0.2.
const CTR_ROUNDED_CEILING: f64 = 0.1999;

/// Produces a fresh payload per call.
pub trait PayloadSource: Send + Sync {
    fn next_payload(&self) -> MetricsPayload;
}

/// Wall clock plus the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPayloadSource;

impl PayloadSource for SystemPayloadSource {
    fn next_payload(&self) -> MetricsPayload {
        generate_metrics_payload(&mut rand::thread_rng(), unix_now())
    }
}

pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

pub fn generate_metrics_payload<R: Rng + ?Sized>(rng: &mut R, timestamp: i64) -> MetricsPayload {
    MetricsPayload {
        timestamp,
        metrics: Metrics {
            clicks: rng.gen_range(CLICKS_MIN..=CLICKS_MAX),
            impressions: rng.gen_range(IMPRESSIONS_MIN..=IMPRESSIONS_MAX),
            ctr: round_ctr(rng.gen_range(CTR_MIN..CTR_MAX_EXCLUSIVE)),
        },
    }
}

pub fn generate_scrape_payload<R: Rng + ?Sized>(
    rng: &mut R,
    timestamp: i64,
    count: usize,
) -> ScrapePayload {
    ScrapePayload {
        ts: timestamp,
        values: (0..count)
            .map(|_| rng.gen_range(0..=SCRAPE_VALUE_MAX))
            .collect(),
    }
}

fn round_ctr(raw: f64) -> f64 {
    let scale = 10f64.powi(CTR_DECIMAL_PLACES);
    ((raw * scale).round() / scale).min(CTR_ROUNDED_CEILING)
}
