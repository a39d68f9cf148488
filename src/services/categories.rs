use tracing::debug;

use crate::{
    db::DbPool,
    error::AppError,
    models::{Activity, Category},
    services::activities::{attach_categories, LinkScope},
};

pub async fn create(db: &DbPool, name: &str) -> Result<Category, AppError> {
    let id = sqlx::query("INSERT INTO categories (name) VALUES (?)")
        .bind(name)
        .execute(db)
        .await?
        .last_insert_rowid();
    debug!("created category {id} ({name})");

    Ok(Category {
        id,
        name: Some(name.to_string()),
        activities: None,
    })
}

pub async fn find(db: &DbPool, id: i64) -> Result<Option<Category>, AppError> {
    let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(category)
}

/// First category carrying `name`; names are not unique.
pub async fn find_by_name(db: &DbPool, name: &str) -> Result<Option<Category>, AppError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name FROM categories WHERE name = ? ORDER BY id LIMIT 1",
    )
    .bind(name)
    .fetch_optional(db)
    .await?;
    Ok(category)
}

pub async fn find_or_create(db: &DbPool, name: &str) -> Result<Category, AppError> {
    match find_by_name(db, name).await? {
        Some(category) => Ok(category),
        None => create(db, name).await,
    }
}

pub async fn list(db: &DbPool) -> Result<Vec<Category>, AppError> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
        .fetch_all(db)
        .await?;
    Ok(categories)
}

pub async fn rename(db: &DbPool, id: i64, name: &str) -> Result<Category, AppError> {
    let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    debug!("renamed category {id} to {name}");
    find(db, id).await?.ok_or(AppError::NotFound)
}

/// Deletes the category and its links; linked activities stay.
pub async fn delete(db: &DbPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    let deleted = result.rows_affected() > 0;
    if deleted {
        debug!("deleted category {id}");
    }
    Ok(deleted)
}

/// Activities linked to the category in link order, with their categories loaded.
pub async fn activities_of(db: &DbPool, category_id: i64) -> Result<Vec<Activity>, AppError> {
    let mut activities = sqlx::query_as::<_, Activity>(
        r#"SELECT a.id, a.description, a.date, a.time, a.cost, a.trip_id
           FROM activities a
           JOIN activities_meetings am ON am.activity_id = a.id
           WHERE am.category_id = ?
           ORDER BY am.rowid"#,
    )
    .bind(category_id)
    .fetch_all(db)
    .await?;
    attach_categories(db, &mut activities, LinkScope::Category(category_id)).await?;
    Ok(activities)
}

pub async fn load_activities(db: &DbPool, category: &mut Category) -> Result<(), AppError> {
    category.activities = Some(activities_of(db, category.id).await?);
    Ok(())
}
