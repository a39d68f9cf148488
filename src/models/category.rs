use std::fmt;

use serde_json::Value;
use sqlx::FromRow;

use crate::{
    models::activity::Activity,
    serialize::{leaf, list, optional_text, Include, Mapping, ToMapping, UnknownRelation},
};

#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: Option<String>,
    #[sqlx(skip)]
    pub activities: Option<Vec<Activity>>,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Category {}, {}>",
            self.id,
            self.name.as_deref().unwrap_or("")
        )
    }
}

impl ToMapping for Category {
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
        map.insert("name".into(), optional_text(&self.name));
        if let (true, Some(activities)) = (include.contains("activities"), &self.activities) {
            map.insert(
                "activities".into(),
                list(activities, &include.nested("activities")),
            );
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_mapping() {
        let food = Category {
            id: 4,
            name: Some("Food".into()),
            activities: None,
        };
        assert_eq!(food.to_string(), "<Category 4, Food>");
        assert_eq!(
            food.to_value(&Include::paths(["activities"])),
            serde_json::json!({"id": 4, "name": "Food"})
        );
    }
}
