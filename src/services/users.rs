use std::collections::HashMap;

use tracing::debug;

use crate::{
    db::DbPool,
    error::AppError,
    models::{NewUser, User, UserChanges},
    services::{activities, trips},
};

pub async fn create(db: &DbPool, new_user: NewUser) -> Result<User, AppError> {
    let id = sqlx::query("INSERT INTO users (username, email, password) VALUES (?, ?, ?)")
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .execute(db)
        .await?
        .last_insert_rowid();
    debug!("created user {id}");

    Ok(User {
        id,
        username: Some(new_user.username),
        email: Some(new_user.email),
        password: Some(new_user.password_hash),
        trips: None,
    })
}

pub async fn find(db: &DbPool, id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn find_by_email(db: &DbPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, email, password FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

pub async fn list(db: &DbPool) -> Result<Vec<User>, AppError> {
    let users =
        sqlx::query_as::<_, User>("SELECT id, username, email, password FROM users ORDER BY id")
            .fetch_all(db)
            .await?;
    Ok(users)
}

/// Applies validated `changes`. Untouched columns keep their value.
pub async fn update(db: &DbPool, id: i64, changes: UserChanges) -> Result<User, AppError> {
    let result = sqlx::query(
        r#"UPDATE users
           SET username = COALESCE(?, username),
               email = COALESCE(?, email),
               password = COALESCE(?, password)
           WHERE id = ?"#,
    )
    .bind(changes.username)
    .bind(changes.email)
    .bind(changes.password_hash)
    .bind(id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    debug!("updated user {id}");
    find(db, id).await?.ok_or(AppError::NotFound)
}

/// Deletes the user; the database cascades to their trips and activities.
pub async fn delete(db: &DbPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    let deleted = result.rows_affected() > 0;
    if deleted {
        debug!("deleted user {id}");
    }
    Ok(deleted)
}

/// Loads the user's trips, each with its activities and their categories.
pub async fn load_trips(db: &DbPool, user: &mut User) -> Result<(), AppError> {
    let mut owned = trips::list_for_user(db, user.id).await?;
    let mut by_trip: HashMap<i64, Vec<_>> = HashMap::new();
    for activity in activities::list_for_user(db, user.id).await? {
        by_trip.entry(activity.trip_id).or_default().push(activity);
    }
    for trip in &mut owned {
        trip.activities = Some(by_trip.remove(&trip.id).unwrap_or_default());
    }
    user.trips = Some(owned);
    Ok(())
}
