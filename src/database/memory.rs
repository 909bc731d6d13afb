use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Admin, Group, NewAttempt, NewGroup, NewPost, NewQuiz, NewRoadmap, NewUser, Post, Quiz,
    QuizAttempt, Roadmap, SiteSettings, Topic, TopicDetail, TopicSummary, User, UserPatch,
    Visibility,
};
use crate::database::store::Store;

/// Rows carry an insertion sequence so that "newest first" stays total
/// even when two rows share a timestamp.
#[derive(Debug, Clone)]
struct Row<T> {
    seq: u64,
    value: T,
}

#[derive(Debug, Clone)]
struct GroupRow {
    id: Uuid,
    name: String,
    description: String,
    owner: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    next_seq: u64,
    admins: Vec<Row<Admin>>,
    topics: Vec<Row<Topic>>,
    roadmaps: Vec<Row<Roadmap>>,
    users: Vec<Row<User>>,
    groups: Vec<Row<GroupRow>>,
    memberships: BTreeSet<(Uuid, String)>,
    posts: Vec<Row<Post>>,
    quizzes: Vec<Row<Quiz>>,
    attempts: Vec<Row<QuizAttempt>>,
    settings: SiteSettings,
}

impl Tables {
    fn row<T>(&mut self, value: T) -> Row<T> {
        self.next_seq += 1;
        Row {
            seq: self.next_seq,
            value,
        }
    }

    fn group(&self, row: &GroupRow) -> Group {
        let member_count = self
            .memberships
            .iter()
            .filter(|(group_id, _)| *group_id == row.id)
            .count() as i64;

        Group {
            id: row.id,
            name: row.name.clone(),
            description: row.description.clone(),
            owner: row.owner.clone(),
            created_at: row.created_at,
            member_count,
        }
    }
}

/// Newest first by `(created_at, seq)`.
fn newest_first<T: Clone>(rows: &[Row<T>], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut sorted: Vec<&Row<T>> = rows.iter().collect();
    sorted.sort_by(|a, b| {
        (created_at(&b.value), b.seq).cmp(&(created_at(&a.value), a.seq))
    });
    sorted.into_iter().map(|row| row.value.clone()).collect()
}

/// In-process store with the same observable behavior as `PgStore`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryStore {
    pub(crate) async fn admin_count(&self) -> usize {
        self.tables.read().await.admins.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn list_topics(&self) -> Result<Vec<TopicSummary>, DatabaseError> {
        let tables = self.tables.read().await;
        let topics = newest_first(&tables.topics, |t| t.created_at)
            .into_iter()
            .map(|topic| {
                let roadmap_count = tables
                    .roadmaps
                    .iter()
                    .filter(|r| r.value.topic_id == topic.id)
                    .count() as i64;
                TopicSummary {
                    id: topic.id,
                    name: topic.name,
                    created_at: topic.created_at,
                    roadmap_count,
                }
            })
            .collect();
        Ok(topics)
    }

    async fn get_topic(&self, id: Uuid) -> Result<Option<TopicDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        let Some(topic) = tables.topics.iter().find(|t| t.value.id == id) else {
            return Ok(None);
        };

        let roadmaps: Vec<Row<Roadmap>> = tables
            .roadmaps
            .iter()
            .filter(|r| r.value.topic_id == id)
            .cloned()
            .collect();

        Ok(Some(TopicDetail {
            topic: topic.value.clone(),
            roadmaps: newest_first(&roadmaps, |r| r.created_at),
        }))
    }

    async fn insert_topic(&self, name: &str, roadmaps: &[NewRoadmap]) -> Result<Topic, DatabaseError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let topic = Topic {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
        };
        let row = tables.row(topic.clone());
        tables.topics.push(row);

        for roadmap in roadmaps {
            let row = tables.row(Roadmap {
                id: Uuid::new_v4(),
                topic_id: topic.id,
                title: roadmap.title.clone(),
                url: roadmap.url.clone(),
                created_at: now,
            });
            tables.roadmaps.push(row);
        }

        Ok(topic)
    }

    async fn upsert_admin(&self, username: &str, password_hash: &str) -> Result<Admin, DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.admins.iter().find(|a| a.value.username == username) {
            return Ok(existing.value.clone());
        }

        let admin = Admin {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        let row = tables.row(admin.clone());
        tables.admins.push(row);
        Ok(admin)
    }

    async fn find_admin(&self, username: &str) -> Result<Option<Admin>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .admins
            .iter()
            .find(|a| a.value.username == username)
            .map(|a| a.value.clone()))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.value.username == new_user.username) {
            return Err(DatabaseError::Conflict("username".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            password_hash: new_user.password_hash,
            display_name: new_user.display_name,
            bio: String::new(),
            avatar: None,
            visibility: Visibility::Public,
            created_at: Utc::now(),
        };
        let row = tables.row(user.clone());
        tables.users.push(row);
        Ok(user)
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.value.username == username)
            .map(|u| u.value.clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut users = newest_first(&tables.users, |u| u.created_at);
        users.reverse();
        Ok(users)
    }

    async fn update_user(&self, username: &str, patch: UserPatch) -> Result<Option<User>, DatabaseError> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.users.iter_mut().find(|u| u.value.username == username) else {
            return Ok(None);
        };
        patch.apply(&mut row.value);
        Ok(Some(row.value.clone()))
    }

    async fn list_groups(&self) -> Result<Vec<Group>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.groups, |g| g.created_at)
            .iter()
            .map(|g| tables.group(g))
            .collect())
    }

    async fn list_groups_for(&self, username: &str) -> Result<Vec<Group>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.groups, |g| g.created_at)
            .iter()
            .filter(|g| tables.memberships.contains(&(g.id, username.to_string())))
            .map(|g| tables.group(g))
            .collect())
    }

    async fn get_group(&self, id: Uuid) -> Result<Option<Group>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .groups
            .iter()
            .find(|g| g.value.id == id)
            .map(|g| tables.group(&g.value)))
    }

    async fn create_group(&self, new_group: NewGroup) -> Result<Group, DatabaseError> {
        let mut tables = self.tables.write().await;
        let group = GroupRow {
            id: Uuid::new_v4(),
            name: new_group.name,
            description: new_group.description,
            owner: new_group.owner,
            created_at: Utc::now(),
        };
        tables.memberships.insert((group.id, group.owner.clone()));
        let row = tables.row(group.clone());
        tables.groups.push(row);
        Ok(tables.group(&group))
    }

    async fn add_member(&self, group_id: Uuid, username: &str) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.memberships.insert((group_id, username.to_string())) {
            return Err(DatabaseError::Conflict("membership".to_string()));
        }
        Ok(())
    }

    async fn remove_member(&self, group_id: Uuid, username: &str) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.memberships.remove(&(group_id, username.to_string())))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.posts, |p| p.created_at))
    }

    async fn list_posts_by(&self, author: &str) -> Result<Vec<Post>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.posts, |p| p.created_at)
            .into_iter()
            .filter(|p| p.author == author)
            .collect())
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .find(|p| p.value.id == id)
            .map(|p| p.value.clone()))
    }

    async fn create_post(&self, new_post: NewPost) -> Result<Post, DatabaseError> {
        let mut tables = self.tables.write().await;
        let post = Post {
            id: Uuid::new_v4(),
            author: new_post.author,
            title: new_post.title,
            body: new_post.body,
            created_at: Utc::now(),
        };
        let row = tables.row(post.clone());
        tables.posts.push(row);
        Ok(post)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.value.id != id);
        Ok(tables.posts.len() < before)
    }

    async fn create_quiz(&self, new_quiz: NewQuiz) -> Result<Quiz, DatabaseError> {
        let mut tables = self.tables.write().await;
        let quiz = Quiz {
            id: Uuid::new_v4(),
            topic_id: new_quiz.topic_id,
            title: new_quiz.title,
            questions: Json(new_quiz.questions),
            created_at: Utc::now(),
        };
        let row = tables.row(quiz.clone());
        tables.quizzes.push(row);
        Ok(quiz)
    }

    async fn get_quiz(&self, id: Uuid) -> Result<Option<Quiz>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .quizzes
            .iter()
            .find(|q| q.value.id == id)
            .map(|q| q.value.clone()))
    }

    async fn list_quizzes(&self, topic_id: Uuid) -> Result<Vec<Quiz>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.quizzes, |q| q.created_at)
            .into_iter()
            .filter(|q| q.topic_id == topic_id)
            .collect())
    }

    async fn record_attempt(&self, attempt: NewAttempt) -> Result<QuizAttempt, DatabaseError> {
        let mut tables = self.tables.write().await;
        let attempt = QuizAttempt {
            id: Uuid::new_v4(),
            quiz_id: attempt.quiz_id,
            username: attempt.username,
            score: attempt.score,
            total: attempt.total,
            created_at: Utc::now(),
        };
        let row = tables.row(attempt.clone());
        tables.attempts.push(row);
        Ok(attempt)
    }

    async fn list_attempts(&self, username: &str) -> Result<Vec<QuizAttempt>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.attempts, |a| a.created_at)
            .into_iter()
            .filter(|a| a.username == username)
            .collect())
    }

    async fn get_settings(&self) -> Result<SiteSettings, DatabaseError> {
        Ok(self.tables.read().await.settings.clone())
    }

    async fn save_settings(&self, settings: SiteSettings) -> Result<SiteSettings, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.settings = settings;
        Ok(tables.settings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn topics_list_newest_first_with_roadmap_counts() {
        let store = MemoryStore::new();
        let first = store.insert_topic("Rust", &[]).await.unwrap();
        let second = store
            .insert_topic(
                "Databases",
                &[
                    NewRoadmap::new("SQL basics", "https://example.com/sql"),
                    NewRoadmap::new("Indexes", "https://example.com/indexes"),
                ],
            )
            .await
            .unwrap();
        let third = store.insert_topic("Networking", &[]).await.unwrap();

        let listed = store.list_topics().await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
        assert_eq!(listed[1].roadmap_count, 2);
        assert_eq!(listed[0].roadmap_count, 0);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryStore::new();
        let new_user = NewUser {
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            display_name: "Alice".to_string(),
        };
        store.create_user(new_user.clone()).await.unwrap();
        assert!(matches!(
            store.create_user(new_user).await,
            Err(DatabaseError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn upsert_admin_keeps_first_row() {
        let store = MemoryStore::new();
        let first = store.upsert_admin("admin", "hash-1").await.unwrap();
        let second = store.upsert_admin("admin", "hash-2").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.password_hash, "hash-1");
        assert_eq!(store.admin_count().await, 1);
    }

    #[tokio::test]
    async fn group_owner_is_first_member() {
        let store = MemoryStore::new();
        let group = store
            .create_group(NewGroup {
                name: "Rustaceans".to_string(),
                description: String::new(),
                owner: "alice".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(group.member_count, 1);

        store.add_member(group.id, "bob").await.unwrap();
        assert!(matches!(
            store.add_member(group.id, "bob").await,
            Err(DatabaseError::Conflict(_))
        ));
        assert_eq!(store.get_group(group.id).await.unwrap().unwrap().member_count, 2);

        assert_eq!(store.list_groups_for("bob").await.unwrap().len(), 1);
        assert!(store.remove_member(group.id, "bob").await.unwrap());
        assert!(!store.remove_member(group.id, "bob").await.unwrap());
        assert!(store.list_groups_for("bob").await.unwrap().is_empty());
    }
}
