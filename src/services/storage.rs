//! Storage layer over the `temperature_data` table.
//!
//! `Storage` is an explicitly constructed handle around the connection pool.
//! Every method checks a connection out, runs one logical operation, and
//! returns it to the pool on all exit paths. Writes run inside a single
//! transaction that rolls back if it is dropped before commit; when a row cap
//! is configured, the prune of the oldest rows commits with the insert.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Statement, TransactionTrait,
};

use crate::entity::temperature_data;
use crate::error::AppResult;

/// Rows per INSERT statement, keeping bound parameters well under SQLite's limit.
const INSERT_CHUNK_ROWS: usize = 200;

/// A reading about to be written. Missing fields take storage defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub temperature: f64,
    pub humidity: f64,
    pub timestamp: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

impl NewReading {
    #[must_use]
    pub fn new(temperature: f64, humidity: f64) -> Self {
        Self {
            temperature,
            humidity,
            timestamp: None,
            location: None,
        }
    }

    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn located(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Raw aggregate row. Every column is NULL on an empty table.
#[derive(Debug, Default, Clone, Copy, PartialEq, FromQueryResult)]
pub struct AggregateRow {
    pub avg_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub max_temperature: Option<f64>,
    pub avg_humidity: Option<f64>,
}

#[derive(Clone)]
pub struct Storage {
    db: DatabaseConnection,
    default_location: String,
    retention_max_rows: Option<u64>,
}

impl Storage {
    pub fn new(db: DatabaseConnection, default_location: impl Into<String>) -> Self {
        Self {
            db,
            default_location: default_location.into(),
            retention_max_rows: None,
        }
    }

    /// Cap the table at `max_rows`; every write then drops the oldest rows
    /// beyond the cap in the same transaction.
    #[must_use]
    pub fn with_retention(mut self, max_rows: Option<u64>) -> Self {
        self.retention_max_rows = max_rows;
        self
    }

    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn active_model(&self, reading: NewReading) -> temperature_data::ActiveModel {
        temperature_data::ActiveModel {
            temperature: Set(reading.temperature),
            humidity: Set(reading.humidity),
            timestamp: Set(reading.timestamp.unwrap_or_else(Utc::now)),
            location: Set(reading
                .location
                .unwrap_or_else(|| self.default_location.clone())),
            ..Default::default()
        }
    }

    /// Persist one reading and return it with its assigned id.
    pub async fn insert(&self, reading: NewReading) -> AppResult<temperature_data::Model> {
        let txn = self.db.begin().await?;
        let model = self.active_model(reading).insert(&txn).await?;
        self.apply_retention(&txn).await?;
        txn.commit().await?;

        tracing::debug!(id = model.id, "reading_inserted");
        Ok(model)
    }

    /// Persist a batch atomically. Returns the number of rows written.
    pub async fn insert_many(&self, readings: Vec<NewReading>) -> AppResult<u64> {
        if readings.is_empty() {
            return Ok(0);
        }

        let count = readings.len() as u64;
        let models: Vec<temperature_data::ActiveModel> = readings
            .into_iter()
            .map(|r| self.active_model(r))
            .collect();

        let txn = self.db.begin().await?;
        for chunk in models.chunks(INSERT_CHUNK_ROWS) {
            temperature_data::Entity::insert_many(chunk.iter().cloned())
                .exec(&txn)
                .await?;
        }
        self.apply_retention(&txn).await?;
        txn.commit().await?;

        tracing::debug!(count, "readings_inserted");
        Ok(count)
    }

    async fn apply_retention<C: ConnectionTrait>(&self, conn: &C) -> AppResult<()> {
        if let Some(keep) = self.retention_max_rows {
            prune_with(conn, keep).await?;
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<u64> {
        Ok(temperature_data::Entity::find().count(&self.db).await?)
    }

    /// Reading with the greatest timestamp; ties go to the newest id.
    pub async fn latest(&self) -> AppResult<Option<temperature_data::Model>> {
        Ok(temperature_data::Entity::find()
            .order_by_desc(temperature_data::Column::Timestamp)
            .order_by_desc(temperature_data::Column::Id)
            .one(&self.db)
            .await?)
    }

    /// Up to `limit` readings, newest timestamp first.
    pub async fn list_recent(&self, limit: u64) -> AppResult<Vec<temperature_data::Model>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        Ok(temperature_data::Entity::find()
            .order_by_desc(temperature_data::Column::Timestamp)
            .order_by_desc(temperature_data::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    /// AVG/MIN/MAX over the whole table in one statement.
    pub async fn aggregate(&self) -> AppResult<AggregateRow> {
        let backend = self.db.get_database_backend();
        let sql = "SELECT AVG(temperature) AS avg_temperature, \
                   MIN(temperature) AS min_temperature, \
                   MAX(temperature) AS max_temperature, \
                   AVG(humidity) AS avg_humidity \
                   FROM temperature_data";

        let row = AggregateRow::find_by_statement(Statement::from_string(backend, sql))
            .one(&self.db)
            .await?;

        Ok(row.unwrap_or_default())
    }

    /// Delete the oldest readings so that at most `keep` remain.
    /// Returns the number of rows removed.
    pub async fn prune_oldest(&self, keep: u64) -> AppResult<u64> {
        let txn = self.db.begin().await?;
        let removed = prune_with(&txn, keep).await?;
        txn.commit().await?;
        Ok(removed)
    }
}

/// Delete the oldest rows (by timestamp, then id) beyond `keep` on `conn`.
async fn prune_with<C: ConnectionTrait>(conn: &C, keep: u64) -> AppResult<u64> {
    let total = temperature_data::Entity::find().count(conn).await?;
    if total <= keep {
        return Ok(0);
    }

    let doomed: Vec<i32> = temperature_data::Entity::find()
        .select_only()
        .column(temperature_data::Column::Id)
        .order_by_asc(temperature_data::Column::Timestamp)
        .order_by_asc(temperature_data::Column::Id)
        .limit(total - keep)
        .into_tuple()
        .all(conn)
        .await?;

    let result = temperature_data::Entity::delete_many()
        .filter(temperature_data::Column::Id.is_in(doomed))
        .exec(conn)
        .await?;

    tracing::info!(removed = result.rows_affected, keep, "readings_pruned");
    Ok(result.rows_affected)
}
