use tracing::debug;

use crate::{
    db::DbPool,
    error::AppError,
    models::{NewTrip, Trip, TripChanges},
    services::activities,
};

const TRIP_COLUMNS: &str = "id, destination, start_date, end_date, user_id";

pub async fn create(db: &DbPool, new_trip: NewTrip) -> Result<Trip, AppError> {
    let id = sqlx::query(
        "INSERT INTO trips (destination, start_date, end_date, user_id) VALUES (?, ?, ?, ?)",
    )
    .bind(&new_trip.destination)
    .bind(new_trip.start_date)
    .bind(new_trip.end_date)
    .bind(new_trip.user_id)
    .execute(db)
    .await?
    .last_insert_rowid();
    debug!("created trip {id} for user {}", new_trip.user_id);

    Ok(Trip {
        id,
        destination: new_trip.destination,
        start_date: new_trip.start_date,
        end_date: new_trip.end_date,
        user_id: new_trip.user_id,
        activities: None,
    })
}

pub async fn find(db: &DbPool, id: i64) -> Result<Option<Trip>, AppError> {
    let trip = sqlx::query_as::<_, Trip>(&format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(trip)
}

pub async fn list_for_user(db: &DbPool, user_id: i64) -> Result<Vec<Trip>, AppError> {
    let trips = sqlx::query_as::<_, Trip>(&format!(
        "SELECT {TRIP_COLUMNS} FROM trips WHERE user_id = ? ORDER BY start_date, id"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(trips)
}

pub async fn update(db: &DbPool, id: i64, changes: TripChanges) -> Result<Trip, AppError> {
    let result = sqlx::query(
        r#"UPDATE trips
           SET destination = COALESCE(?, destination),
               start_date = COALESCE(?, start_date),
               end_date = COALESCE(?, end_date),
               user_id = COALESCE(?, user_id)
           WHERE id = ?"#,
    )
    .bind(changes.destination)
    .bind(changes.start_date)
    .bind(changes.end_date)
    .bind(changes.user_id)
    .bind(id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    debug!("updated trip {id}");
    find(db, id).await?.ok_or(AppError::NotFound)
}

/// Deletes the trip together with its activities.
pub async fn delete(db: &DbPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM trips WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    let deleted = result.rows_affected() > 0;
    if deleted {
        debug!("deleted trip {id}");
    }
    Ok(deleted)
}

pub async fn load_activities(db: &DbPool, trip: &mut Trip) -> Result<(), AppError> {
    trip.activities = Some(activities::list_for_trip(db, trip.id).await?);
    Ok(())
}
