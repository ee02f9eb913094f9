//! Query and aggregation operations behind the HTTP routes.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::entity::temperature_data;
use crate::error::AppResult;
use crate::services::generator::{ReadingGenerator, round1};
use crate::services::storage::{NewReading, Storage};

/// How seeded readings are spread over the past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeSpread {
    /// Reading `i` is stamped `i` hours before now.
    Hourly,
    /// Reading `i` is stamped `5 * i` minutes before now.
    FiveMinutes,
    /// Each reading gets a random offset within the past 24 hours.
    #[default]
    RandomPastDay,
}

impl TimeSpread {
    /// Parse the `spread` query value; `None` for unknown names.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "five-minutes" | "five_minutes" | "5m" => Some(Self::FiveMinutes),
            "random" => Some(Self::RandomPastDay),
            _ => None,
        }
    }

    fn timestamp(self, index: u64, now: DateTime<Utc>, generator: &ReadingGenerator) -> DateTime<Utc> {
        let index = i64::try_from(index).unwrap_or(i64::MAX);
        let offset = match self {
            Self::Hourly => Duration::hours(index),
            Self::FiveMinutes => Duration::minutes(index.saturating_mul(5)),
            Self::RandomPastDay => Duration::minutes(generator.pick(0..=24 * 60)),
        };
        now - offset
    }
}

/// Summary statistics, rounded to one decimal. Empty store yields zeros.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stats {
    pub average_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub average_humidity: f64,
}

#[derive(Clone)]
pub struct TelemetryService {
    storage: Storage,
    generator: Arc<ReadingGenerator>,
}

impl TelemetryService {
    pub fn new(storage: Storage, generator: Arc<ReadingGenerator>) -> Self {
        Self { storage, generator }
    }

    /// Cap the table at `max_rows`; each write prunes the oldest rows inside
    /// the same transaction as the insert.
    #[must_use]
    pub fn with_retention(mut self, max_rows: Option<u64>) -> Self {
        self.storage = self.storage.with_retention(max_rows);
        self
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Latest reading. An empty store gets a freshly generated one first.
    pub async fn get_current(&self) -> AppResult<temperature_data::Model> {
        if let Some(latest) = self.storage.latest().await? {
            return Ok(latest);
        }

        let sample = self.generator.sample();
        tracing::info!(
            temperature = sample.temperature,
            humidity = sample.humidity,
            "store_empty_generating_reading"
        );
        self.storage
            .insert(NewReading::new(sample.temperature, sample.humidity).at(Utc::now()))
            .await
    }

    /// Up to `limit` readings newest first, plus how many were returned.
    pub async fn get_history(
        &self,
        limit: u64,
    ) -> AppResult<(Vec<temperature_data::Model>, usize)> {
        let history = self.storage.list_recent(limit).await?;
        let count = history.len();
        Ok((history, count))
    }

    pub async fn get_stats(&self) -> AppResult<Stats> {
        let row = self.storage.aggregate().await?;
        let rounded = |v: Option<f64>| v.map_or(0.0, round1);

        Ok(Stats {
            average_temperature: rounded(row.avg_temperature),
            min_temperature: rounded(row.min_temperature),
            max_temperature: rounded(row.max_temperature),
            average_humidity: rounded(row.avg_humidity),
        })
    }

    /// Insert `count` synthetic readings stamped according to `spread`.
    /// Returns the number inserted.
    pub async fn seed_dummy(&self, count: u64, spread: TimeSpread) -> AppResult<u64> {
        let now = Utc::now();
        let readings: Vec<NewReading> = (0..count)
            .map(|i| {
                let sample = self.generator.sample();
                NewReading::new(sample.temperature, sample.humidity)
                    .at(spread.timestamp(i, now, &self.generator))
            })
            .collect();

        let inserted = self.storage.insert_many(readings).await?;
        tracing::info!(count = inserted, spread = ?spread, "dummy_readings_generated");
        Ok(inserted)
    }

    /// Seed `count` hourly readings if the store is empty. Returns rows added.
    pub async fn seed_if_empty(&self, count: u64) -> AppResult<u64> {
        if self.storage.count().await? > 0 {
            tracing::debug!("store not empty, skipping initial seed");
            return Ok(0);
        }

        tracing::info!(count, "Generating initial dummy data");
        self.seed_dummy(count, TimeSpread::Hourly).await
    }
}
