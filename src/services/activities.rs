use std::collections::HashMap;

use sqlx::FromRow;
use tracing::debug;

use crate::{
    db::DbPool,
    error::AppError,
    models::{Activity, ActivityChanges, Category, NewActivity},
};

const ACTIVITY_COLUMNS: &str = "id, description, date, time, cost, trip_id";

/// Which activities a batch of category links is loaded for.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LinkScope {
    Activity(i64),
    Trip(i64),
    User(i64),
    /// Every activity linked to the category.
    Category(i64),
}

impl LinkScope {
    fn filter(self) -> (&'static str, i64) {
        match self {
            LinkScope::Activity(id) => ("WHERE a.id = ?", id),
            LinkScope::Trip(id) => ("WHERE a.trip_id = ?", id),
            LinkScope::User(id) => (
                "JOIN trips t ON t.id = a.trip_id WHERE t.user_id = ?",
                id,
            ),
            LinkScope::Category(id) => (
                "WHERE a.id IN (SELECT activity_id FROM activities_meetings WHERE category_id = ?)",
                id,
            ),
        }
    }
}

/// One row of `activities_meetings` joined with its category.
#[derive(FromRow)]
struct CategoryLink {
    activity_id: i64,
    id: i64,
    name: Option<String>,
}

/// Inserts the activity and attaches `category_ids` in a single transaction.
pub async fn create(db: &DbPool, new_activity: NewActivity) -> Result<Activity, AppError> {
    let mut tx = db.begin().await?;

    let id = sqlx::query(
        "INSERT INTO activities (description, date, time, cost, trip_id) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&new_activity.description)
    .bind(new_activity.date)
    .bind(&new_activity.time)
    .bind(new_activity.cost)
    .bind(new_activity.trip_id)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    for category_id in &new_activity.category_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO activities_meetings (activity_id, category_id) VALUES (?, ?)",
        )
        .bind(id)
        .bind(*category_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    debug!(
        "created activity {id} on trip {} with {} categories",
        new_activity.trip_id,
        new_activity.category_ids.len()
    );

    find(db, id).await?.ok_or(AppError::NotFound)
}

/// Fetches the activity with its categories loaded.
pub async fn find(db: &DbPool, id: i64) -> Result<Option<Activity>, AppError> {
    let activity = sqlx::query_as::<_, Activity>(&format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;

    match activity {
        Some(activity) => {
            let mut loaded = vec![activity];
            attach_categories(db, &mut loaded, LinkScope::Activity(id)).await?;
            Ok(loaded.pop())
        }
        None => Ok(None),
    }
}

pub async fn list_for_trip(db: &DbPool, trip_id: i64) -> Result<Vec<Activity>, AppError> {
    let mut activities = sqlx::query_as::<_, Activity>(&format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE trip_id = ? ORDER BY date, id"
    ))
    .bind(trip_id)
    .fetch_all(db)
    .await?;
    attach_categories(db, &mut activities, LinkScope::Trip(trip_id)).await?;
    Ok(activities)
}

/// Every activity on any of the user's trips, with categories loaded.
pub async fn list_for_user(db: &DbPool, user_id: i64) -> Result<Vec<Activity>, AppError> {
    let mut activities = sqlx::query_as::<_, Activity>(
        r#"SELECT a.id, a.description, a.date, a.time, a.cost, a.trip_id
           FROM activities a
           JOIN trips t ON t.id = a.trip_id
           WHERE t.user_id = ?
           ORDER BY a.date, a.id"#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    attach_categories(db, &mut activities, LinkScope::User(user_id)).await?;
    Ok(activities)
}

pub async fn update(
    db: &DbPool,
    id: i64,
    changes: ActivityChanges,
) -> Result<Activity, AppError> {
    let result = sqlx::query(
        r#"UPDATE activities
           SET description = COALESCE(?, description),
               date = COALESCE(?, date),
               time = COALESCE(?, time),
               cost = COALESCE(?, cost),
               trip_id = COALESCE(?, trip_id)
           WHERE id = ?"#,
    )
    .bind(changes.description)
    .bind(changes.date)
    .bind(changes.time)
    .bind(changes.cost)
    .bind(changes.trip_id)
    .bind(id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    debug!("updated activity {id}");
    find(db, id).await?.ok_or(AppError::NotFound)
}

/// Deletes the activity and its category links; the categories stay.
pub async fn delete(db: &DbPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM activities WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    let deleted = result.rows_affected() > 0;
    if deleted {
        debug!("deleted activity {id}");
    }
    Ok(deleted)
}

/// Links a category to an activity. Returns `false` if the link already existed.
pub async fn add_category(
    db: &DbPool,
    activity_id: i64,
    category_id: i64,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO activities_meetings (activity_id, category_id) VALUES (?, ?)",
    )
    .bind(activity_id)
    .bind(category_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn remove_category(
    db: &DbPool,
    activity_id: i64,
    category_id: i64,
) -> Result<bool, AppError> {
    let result =
        sqlx::query("DELETE FROM activities_meetings WHERE activity_id = ? AND category_id = ?")
            .bind(activity_id)
            .bind(category_id)
            .execute(db)
            .await?;
    Ok(result.rows_affected() > 0)
}

/// Categories linked to the activity, oldest link first.
pub async fn categories_of(db: &DbPool, activity_id: i64) -> Result<Vec<Category>, AppError> {
    let categories = sqlx::query_as::<_, Category>(
        r#"SELECT c.id, c.name
           FROM categories c
           JOIN activities_meetings am ON am.category_id = c.id
           WHERE am.activity_id = ?
           ORDER BY am.rowid"#,
    )
    .bind(activity_id)
    .fetch_all(db)
    .await?;
    Ok(categories)
}

/// Fills `categories` on every activity from the links in `scope`, in one query.
///
/// `scope` must cover every activity in `activities`; those without links get
/// an empty list.
pub(crate) async fn attach_categories(
    db: &DbPool,
    activities: &mut [Activity],
    scope: LinkScope,
) -> Result<(), AppError> {
    if activities.is_empty() {
        return Ok(());
    }

    let (filter, id) = scope.filter();
    let links = sqlx::query_as::<_, CategoryLink>(&format!(
        r#"SELECT am.activity_id, c.id, c.name
           FROM activities_meetings am
           JOIN categories c ON c.id = am.category_id
           JOIN activities a ON a.id = am.activity_id
           {filter}
           ORDER BY am.rowid"#
    ))
    .bind(id)
    .fetch_all(db)
    .await?;

    let mut by_activity: HashMap<i64, Vec<Category>> = HashMap::new();
    for link in links {
        by_activity.entry(link.activity_id).or_default().push(Category {
            id: link.id,
            name: link.name,
            activities: None,
        });
    }
    for activity in activities.iter_mut() {
        activity.categories = Some(by_activity.remove(&activity.id).unwrap_or_default());
    }
    Ok(())
}
