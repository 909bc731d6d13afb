use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Topic {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Row shape of the topic listing: the fixed field subset plus the derived roadmap count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TopicSummary {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub roadmap_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Roadmap {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub title: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDetail {
    #[serde(flatten)]
    pub topic: Topic,
    pub roadmaps: Vec<Roadmap>,
}

#[derive(Debug, Clone)]
pub struct NewRoadmap {
    pub title: String,
    pub url: String,
}

impl NewRoadmap {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}
