//! Storage layer against a migrated in-memory database.
//!
//! Run with: cargo test --test storage_test

mod common;

use chrono::{Duration, TimeZone, Utc};
use smartgarden_api::services::storage::NewReading;

#[tokio::test]
async fn empty_store_has_no_rows() {
    let storage = common::storage().await;

    assert_eq!(storage.count().await.unwrap(), 0);
    assert!(storage.latest().await.unwrap().is_none());
    assert!(storage.list_recent(50).await.unwrap().is_empty());

    let agg = storage.aggregate().await.unwrap();
    assert_eq!(agg.avg_temperature, None);
    assert_eq!(agg.min_temperature, None);
    assert_eq!(agg.max_temperature, None);
    assert_eq!(agg.avg_humidity, None);
}

#[tokio::test]
async fn insert_assigns_ids_and_defaults() {
    let storage = common::storage().await;

    let before = Utc::now();
    let first = storage.insert(NewReading::new(21.5, 55.0)).await.unwrap();
    let second = storage
        .insert(NewReading::new(22.0, 60.0).located("Greenhouse"))
        .await
        .unwrap();

    assert!(second.id > first.id);
    assert_eq!(first.location, common::LOCATION);
    assert_eq!(second.location, "Greenhouse");
    assert!(first.timestamp >= before);
    assert_eq!(storage.count().await.unwrap(), 2);
}

#[tokio::test]
async fn latest_round_trips_inserted_values() {
    let storage = common::storage().await;
    let at = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();

    storage
        .insert(NewReading::new(24.3, 61.7).at(at).located("Patio"))
        .await
        .unwrap();

    let latest = storage.latest().await.unwrap().expect("one row");
    assert_eq!(latest.temperature, 24.3);
    assert_eq!(latest.humidity, 61.7);
    assert_eq!(latest.location, "Patio");
    assert_eq!(latest.timestamp, at);
}

#[tokio::test]
async fn latest_picks_max_timestamp_not_last_insert() {
    let storage = common::storage().await;
    let now = Utc::now();

    storage.insert(NewReading::new(25.0, 50.0).at(now)).await.unwrap();
    // Backfilled reading inserted afterwards
    storage
        .insert(NewReading::new(20.0, 40.0).at(now - Duration::hours(3)))
        .await
        .unwrap();

    let latest = storage.latest().await.unwrap().unwrap();
    assert_eq!(latest.temperature, 25.0);
}

#[tokio::test]
async fn list_recent_is_limited_and_newest_first() {
    let storage = common::storage().await;
    let now = Utc::now();

    let readings = [5, 1, 3, 0, 4, 2]
        .into_iter()
        .map(|h| NewReading::new(20.0 + f64::from(h), 50.0).at(now - Duration::hours(h.into())))
        .collect();
    assert_eq!(storage.insert_many(readings).await.unwrap(), 6);

    let recent = storage.list_recent(4).await.unwrap();
    assert_eq!(recent.len(), 4);
    assert!(recent.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    assert_eq!(recent[0].temperature, 20.0);

    assert_eq!(storage.list_recent(100).await.unwrap().len(), 6);
    assert!(storage.list_recent(0).await.unwrap().is_empty());
}

#[tokio::test]
async fn insert_many_of_nothing_is_a_no_op() {
    let storage = common::storage().await;

    assert_eq!(storage.insert_many(Vec::new()).await.unwrap(), 0);
    assert_eq!(storage.count().await.unwrap(), 0);
}

#[tokio::test]
async fn aggregate_over_known_values() {
    let storage = common::storage().await;

    storage.insert(NewReading::new(20.0, 40.0)).await.unwrap();
    storage.insert(NewReading::new(30.0, 60.0)).await.unwrap();

    let agg = storage.aggregate().await.unwrap();
    assert_eq!(agg.avg_temperature, Some(25.0));
    assert_eq!(agg.min_temperature, Some(20.0));
    assert_eq!(agg.max_temperature, Some(30.0));
    assert_eq!(agg.avg_humidity, Some(50.0));
}

#[tokio::test]
async fn prune_keeps_the_newest_rows() {
    let storage = common::storage().await;
    let now = Utc::now();

    let readings = (0..5)
        .map(|h| NewReading::new(20.0 + f64::from(h), 50.0).at(now - Duration::hours(h.into())))
        .collect();
    storage.insert_many(readings).await.unwrap();

    assert_eq!(storage.prune_oldest(10).await.unwrap(), 0);
    assert_eq!(storage.prune_oldest(2).await.unwrap(), 3);
    assert_eq!(storage.count().await.unwrap(), 2);

    let left: Vec<f64> = storage
        .list_recent(10)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.temperature)
        .collect();
    assert_eq!(left, vec![20.0, 21.0]);
}

#[tokio::test]
async fn capped_writes_prune_in_the_same_transaction() {
    let now = Utc::now();
    let storage = common::storage().await.with_retention(Some(3));

    let readings = (0..5)
        .map(|h| NewReading::new(20.0 + f64::from(h), 50.0).at(now - Duration::hours(h.into())))
        .collect();
    // All rows are reported written even though two are pruned on commit
    assert_eq!(storage.insert_many(readings).await.unwrap(), 5);
    assert_eq!(storage.count().await.unwrap(), 3);

    let newest = storage
        .insert(NewReading::new(29.9, 70.0).at(now + Duration::minutes(1)))
        .await
        .unwrap();
    assert_eq!(storage.count().await.unwrap(), 3);
    assert_eq!(storage.latest().await.unwrap().unwrap().id, newest.id);

    let left: Vec<f64> = storage
        .list_recent(10)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.temperature)
        .collect();
    assert_eq!(left, vec![29.9, 20.0, 21.0]);
}

#[tokio::test]
async fn large_batches_are_split_across_statements() {
    let storage = common::storage().await;
    let now = Utc::now();

    let readings: Vec<NewReading> = (0..2_500)
        .map(|i| NewReading::new(25.0, 55.0).at(now - Duration::seconds(i)))
        .collect();

    assert_eq!(storage.insert_many(readings).await.unwrap(), 2_500);
    assert_eq!(storage.count().await.unwrap(), 2_500);

    let agg = storage.aggregate().await.unwrap();
    assert_eq!(agg.avg_temperature, Some(25.0));
}
