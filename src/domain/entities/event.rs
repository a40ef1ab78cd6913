use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: i64,
    pub title: String,
    pub date: String, // free text, e.g. "March 15, 2024"
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEvent {
    pub title: String,
    pub date: String,
    pub description: String,
    pub image_url: String,
}

/// Text fields of the admin "add event" form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct EventFields {
    #[validate(length(min = 1, message = "Event title is required"))]
    #[serde(default)]
    pub title: String,

    #[validate(length(min = 1, message = "Event date is required"))]
    #[serde(default)]
    pub date: String,

    #[validate(length(min = 1, message = "Description is required"))]
    #[serde(default)]
    pub description: String,
}

impl EventFields {
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.date.is_empty() && !self.description.is_empty()
    }

    pub fn into_new_event(self, image_url: String) -> NewEvent {
        NewEvent {
            title: self.title,
            date: self.date,
            description: self.description,
            image_url,
        }
    }
}
