use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use sqlx::FromRow;

use crate::{
    models::category::Category,
    serialize::{
        leaf, list, optional_text, timestamp, Include, Mapping, ToMapping, UnknownRelation,
    },
};

#[derive(Debug, Clone, FromRow)]
pub struct Activity {
    pub id: i64,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub time: String,
    pub cost: f64,
    pub trip_id: i64,
    /// Associated categories in the order they were attached.
    #[sqlx(skip)]
    pub categories: Option<Vec<Category>>,
}

impl Activity {
    pub fn categories(&self) -> &[Category] {
        self.categories.as_deref().unwrap_or_default()
    }

    /// One name per associated category, lined up with [`Activity::categories`].
    pub fn category_names(&self) -> Vec<Option<&str>> {
        self.categories()
            .iter()
            .map(|category| category.name.as_deref())
            .collect()
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Activity {}, {}, {}, {}>",
            self.id,
            self.description.as_deref().unwrap_or(""),
            self.date,
            self.cost
        )
    }
}

impl ToMapping for Activity {
    const RELATIONS: &'static [&'static str] = &["categories", "category_names"];

    fn check_relation(relation: &str, nested: &Include) -> Result<(), UnknownRelation> {
        match relation {
            "categories" => Category::check_include(nested),
            _ => leaf(nested),
        }
    }

    fn to_mapping(&self, include: &Include) -> Mapping {
        let mut map = Mapping::new();
        map.insert("id".into(), Value::from(self.id));
        map.insert("description".into(), optional_text(&self.description));
        map.insert("date".into(), timestamp(&self.date));
        map.insert("time".into(), Value::String(self.time.clone()));
        map.insert("cost".into(), Value::from(self.cost));
        map.insert("trip_id".into(), Value::from(self.trip_id));
        if let Some(categories) = &self.categories {
            if include.contains("categories") {
                map.insert(
                    "categories".into(),
                    list(categories, &include.nested("categories")),
                );
            }
            if include.contains("category_names") {
                map.insert(
                    "category_names".into(),
                    Value::from(self.category_names()),
                );
            }
        }
        map
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub time: String,
    pub cost: f64,
    pub trip_id: i64,
    /// Categories to attach, in this order, in the same transaction.
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityChanges {
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub time: Option<String>,
    pub cost: Option<f64>,
    pub trip_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn category(id: i64, name: Option<&str>) -> Category {
        Category {
            id,
            name: name.map(str::to_string),
            activities: None,
        }
    }

    fn hike() -> Activity {
        Activity {
            id: 11,
            description: Some("Hike".into()),
            date: Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap(),
            time: "08:30".into(),
            cost: 12.5,
            trip_id: 3,
            categories: Some(vec![
                category(1, Some("Outdoor")),
                category(2, None),
                category(3, Some("Food")),
            ]),
        }
    }

    #[test]
    fn category_names_follow_association_order() {
        let activity = hike();
        let names = activity.category_names();
        assert_eq!(names, [Some("Outdoor"), None, Some("Food")]);
        assert_eq!(names.len(), activity.categories().len());
    }

    #[test]
    fn category_names_empty_when_not_loaded() {
        let mut activity = hike();
        activity.categories = None;
        assert!(activity.category_names().is_empty());
    }

    #[test]
    fn mapping_inlines_requested_relations() {
        let map = hike().to_mapping(&Include::paths(["category_names", "categories"]));
        assert_eq!(map["cost"], json!(12.5));
        assert_eq!(map["time"], json!("08:30"));
        assert_eq!(map["category_names"], json!(["Outdoor", null, "Food"]));
        assert_eq!(
            map["categories"],
            json!([
                {"id": 1, "name": "Outdoor"},
                {"id": 2, "name": null},
                {"id": 3, "name": "Food"},
            ])
        );

        let bare = hike().to_mapping(&Include::none());
        assert!(!bare.contains_key("categories"));
        assert!(!bare.contains_key("category_names"));
    }

    #[test]
    fn new_activity_defaults_to_no_categories() {
        let new_activity: NewActivity = serde_json::from_value(json!({
            "description": null,
            "date": "2024-05-02T00:00:00Z",
            "time": "08:30",
            "cost": 12.5,
            "trip_id": 3,
        }))
        .unwrap();
        assert!(new_activity.category_ids.is_empty());
        assert_eq!(new_activity.date, hike().date);
    }

    #[test]
    fn display_matches_record_shape() {
        assert_eq!(
            hike().to_string(),
            "<Activity 11, Hike, 2024-05-02 00:00:00 UTC, 12.5>"
        );
    }
}
