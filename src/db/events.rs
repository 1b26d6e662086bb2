use sqlx::SqlitePool;

use crate::models::{Event, EventId, NewEvent};

pub async fn insert(pool: &SqlitePool, event: &NewEvent) -> Result<EventId, sqlx::Error> {
    let row: (EventId,) = sqlx::query_as(
        "INSERT INTO events (case_id, activity_code, start_time, end_time)
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(event.case_id)
    .bind(&event.activity_code)
    .bind(event.start_time)
    .bind(event.end_time)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// Every stored event in insertion order.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY id ASC")
        .fetch_all(pool)
        .await
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
