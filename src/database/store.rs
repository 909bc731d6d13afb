use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Admin, Group, NewAttempt, NewGroup, NewPost, NewQuiz, NewRoadmap, NewUser, Post, Quiz,
    QuizAttempt, SiteSettings, Topic, TopicDetail, TopicSummary, User, UserPatch,
};

/// Database access facade. One instance per process, shared by every handler.
///
/// Listings come back newest first (`created_at` descending) unless noted.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Topics
    async fn list_topics(&self) -> Result<Vec<TopicSummary>, DatabaseError>;
    async fn get_topic(&self, id: Uuid) -> Result<Option<TopicDetail>, DatabaseError>;
    /// Fixture/seed entry point; the HTTP API never writes topics.
    async fn insert_topic(&self, name: &str, roadmaps: &[NewRoadmap]) -> Result<Topic, DatabaseError>;

    // Admins
    /// Insert keyed on username; an existing row is left as it is.
    async fn upsert_admin(&self, username: &str, password_hash: &str) -> Result<Admin, DatabaseError>;
    async fn find_admin(&self, username: &str) -> Result<Option<Admin>, DatabaseError>;

    // Users
    /// `DatabaseError::Conflict` when the username is taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user(&self, username: &str) -> Result<Option<User>, DatabaseError>;
    /// Oldest first.
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;
    async fn update_user(&self, username: &str, patch: UserPatch) -> Result<Option<User>, DatabaseError>;

    // Groups
    async fn list_groups(&self) -> Result<Vec<Group>, DatabaseError>;
    async fn list_groups_for(&self, username: &str) -> Result<Vec<Group>, DatabaseError>;
    async fn get_group(&self, id: Uuid) -> Result<Option<Group>, DatabaseError>;
    /// Creates the group with its owner as first member.
    async fn create_group(&self, new_group: NewGroup) -> Result<Group, DatabaseError>;
    /// `DatabaseError::Conflict` when already a member.
    async fn add_member(&self, group_id: Uuid, username: &str) -> Result<(), DatabaseError>;
    /// `false` when there was no such membership.
    async fn remove_member(&self, group_id: Uuid, username: &str) -> Result<bool, DatabaseError>;

    // Posts
    async fn list_posts(&self) -> Result<Vec<Post>, DatabaseError>;
    async fn list_posts_by(&self, author: &str) -> Result<Vec<Post>, DatabaseError>;
    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError>;
    async fn create_post(&self, new_post: NewPost) -> Result<Post, DatabaseError>;
    async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError>;

    // Quizzes
    async fn create_quiz(&self, new_quiz: NewQuiz) -> Result<Quiz, DatabaseError>;
    async fn get_quiz(&self, id: Uuid) -> Result<Option<Quiz>, DatabaseError>;
    async fn list_quizzes(&self, topic_id: Uuid) -> Result<Vec<Quiz>, DatabaseError>;
    async fn record_attempt(&self, attempt: NewAttempt) -> Result<QuizAttempt, DatabaseError>;
    async fn list_attempts(&self, username: &str) -> Result<Vec<QuizAttempt>, DatabaseError>;

    // Settings
    async fn get_settings(&self) -> Result<SiteSettings, DatabaseError>;
    async fn save_settings(&self, settings: SiteSettings) -> Result<SiteSettings, DatabaseError>;
}
