use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use sqlx::FromRow;

use crate::{
    models::activity::Activity,
    serialize::{
        leaf, list, optional_text, timestamp, Include, Mapping, ToMapping, UnknownRelation,
    },
};

#[derive(Debug, Clone, FromRow)]
pub struct Trip {
    pub id: i64,
    pub destination: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub user_id: i64,
    #[sqlx(skip)]
    pub activities: Option<Vec<Activity>>,
}

impl Trip {
    pub fn activities(&self) -> &[Activity] {
        self.activities.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Trip {}, {}, {}, {}>",
            self.id,
            self.destination.as_deref().unwrap_or(""),
            self.start_date,
            self.end_date
        )
    }
}

impl ToMapping for Trip {
    const RELATIONS: &'static [&'static str] = &["activities"];

    fn check_relation(relation: &str, nested: &Include) -> Result<(), UnknownRelation> {
        match relation {
            "activities" => Activity::check_include(nested),
            _ => leaf(nested),
        }
    }

    fn to_mapping(&self, include: &Include) -> Mapping {
        let mut map = Mapping::new();
        map.insert("id".into(), Value::from(self.id));
        map.insert("destination".into(), optional_text(&self.destination));
        map.insert("start_date".into(), timestamp(&self.start_date));
        map.insert("end_date".into(), timestamp(&self.end_date));
        map.insert("user_id".into(), Value::from(self.user_id));
        if let (true, Some(activities)) = (include.contains("activities"), &self.activities) {
            map.insert(
                "activities".into(),
                list(activities, &include.nested("activities")),
            );
        }
        map
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTrip {
    pub destination: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub user_id: i64,
}

/// Partial update for a trip; `None` leaves a column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripChanges {
    pub destination: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub user_id: Option<i64>,
}
