use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Admin, Group, NewAttempt, NewGroup, NewPost, NewQuiz, NewRoadmap, NewUser, Post, Quiz,
    QuizAttempt, Roadmap, SiteSettings, Topic, TopicDetail, TopicSummary, User, UserPatch,
    Visibility,
};
use crate::database::store::Store;

const USER_COLUMNS: &str =
    "id, username, password_hash, display_name, bio, avatar, visibility, created_at";

const GROUP_SELECT: &str = "
    SELECT g.id, g.name, g.description, g.owner, g.created_at,
           COUNT(m.username) AS member_count
    FROM study_groups g
    LEFT JOIN study_group_members m ON m.group_id = g.id";

const POST_COLUMNS: &str = "id, author, title, body, created_at";
const QUIZ_COLUMNS: &str = "id, topic_id, title, questions, created_at";
const ATTEMPT_COLUMNS: &str = "id, quiz_id, username, score, total, created_at";

/// PostgreSQL-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Turn unique-constraint violations into `DatabaseError::Conflict`.
fn conflict_on_unique(err: sqlx::Error, what: &str) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            DatabaseError::Conflict(what.to_string())
        }
        _ => DatabaseError::Sqlx(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_topics(&self) -> Result<Vec<TopicSummary>, DatabaseError> {
        let topics = sqlx::query_as::<_, TopicSummary>(
            "SELECT t.id, t.name, t.created_at, COUNT(r.id) AS roadmap_count
             FROM topics t
             LEFT JOIN roadmaps r ON r.topic_id = t.id
             GROUP BY t.id
             ORDER BY t.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(topics)
    }

    async fn get_topic(&self, id: Uuid) -> Result<Option<TopicDetail>, DatabaseError> {
        let topic = sqlx::query_as::<_, Topic>(
            "SELECT id, name, created_at FROM topics WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(topic) = topic else {
            return Ok(None);
        };

        let roadmaps = sqlx::query_as::<_, Roadmap>(
            "SELECT id, topic_id, title, url, created_at
             FROM roadmaps
             WHERE topic_id = $1
             ORDER BY created_at DESC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(TopicDetail { topic, roadmaps }))
    }

    async fn insert_topic(&self, name: &str, roadmaps: &[NewRoadmap]) -> Result<Topic, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let topic = sqlx::query_as::<_, Topic>(
            "INSERT INTO topics (id, name) VALUES ($1, $2) RETURNING id, name, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        for roadmap in roadmaps {
            sqlx::query("INSERT INTO roadmaps (id, topic_id, title, url) VALUES ($1, $2, $3, $4)")
                .bind(Uuid::new_v4())
                .bind(topic.id)
                .bind(&roadmap.title)
                .bind(&roadmap.url)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(topic)
    }

    async fn upsert_admin(&self, username: &str, password_hash: &str) -> Result<Admin, DatabaseError> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let admin = sqlx::query_as::<_, Admin>(
            "INSERT INTO admins (id, username, password_hash)
             VALUES ($1, $2, $3)
             ON CONFLICT (username) DO UPDATE SET username = EXCLUDED.username
             RETURNING id, username, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn find_admin(&self, username: &str) -> Result<Option<Admin>, DatabaseError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, username, password_hash, created_at FROM admins WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let query = format!(
            "INSERT INTO users (id, username, password_hash, display_name)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&new_user.username)
            .bind(&new_user.password_hash)
            .bind(&new_user.display_name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "username"))
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC");
        let users = sqlx::query_as::<_, User>(&query).fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn update_user(&self, username: &str, patch: UserPatch) -> Result<Option<User>, DatabaseError> {
        let query = format!(
            "UPDATE users SET
                display_name = COALESCE($2, display_name),
                bio = COALESCE($3, bio),
                avatar = COALESCE($4, avatar),
                visibility = COALESCE($5, visibility)
             WHERE username = $1
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(patch.display_name)
            .bind(patch.bio)
            .bind(patch.avatar)
            .bind(patch.visibility.map(Visibility::as_str))
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn list_groups(&self) -> Result<Vec<Group>, DatabaseError> {
        let query = format!("{GROUP_SELECT} GROUP BY g.id ORDER BY g.created_at DESC");
        let groups = sqlx::query_as::<_, Group>(&query).fetch_all(&self.pool).await?;
        Ok(groups)
    }

    async fn list_groups_for(&self, username: &str) -> Result<Vec<Group>, DatabaseError> {
        let query = format!(
            "{GROUP_SELECT}
             WHERE g.id IN (SELECT group_id FROM study_group_members WHERE username = $1)
             GROUP BY g.id
             ORDER BY g.created_at DESC"
        );
        let groups = sqlx::query_as::<_, Group>(&query)
            .bind(username)
            .fetch_all(&self.pool)
            .await?;
        Ok(groups)
    }

    async fn get_group(&self, id: Uuid) -> Result<Option<Group>, DatabaseError> {
        let query = format!("{GROUP_SELECT} WHERE g.id = $1 GROUP BY g.id");
        let group = sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(group)
    }

    async fn create_group(&self, new_group: NewGroup) -> Result<Group, DatabaseError> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO study_groups (id, name, description, owner) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(&new_group.name)
            .bind(&new_group.description)
            .bind(&new_group.owner)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO study_group_members (group_id, username) VALUES ($1, $2)")
            .bind(id)
            .bind(&new_group.owner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_group(id)
            .await?
            .ok_or(DatabaseError::Sqlx(sqlx::Error::RowNotFound))
    }

    async fn add_member(&self, group_id: Uuid, username: &str) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO study_group_members (group_id, username) VALUES ($1, $2)")
            .bind(group_id)
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, "membership"))?;
        Ok(())
    }

    async fn remove_member(&self, group_id: Uuid, username: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM study_group_members WHERE group_id = $1 AND username = $2")
            .bind(group_id)
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DatabaseError> {
        let query = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC");
        let posts = sqlx::query_as::<_, Post>(&query).fetch_all(&self.pool).await?;
        Ok(posts)
    }

    async fn list_posts_by(&self, author: &str) -> Result<Vec<Post>, DatabaseError> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author = $1 ORDER BY created_at DESC"
        );
        let posts = sqlx::query_as::<_, Post>(&query)
            .bind(author)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        let query = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn create_post(&self, new_post: NewPost) -> Result<Post, DatabaseError> {
        let query = format!(
            "INSERT INTO posts (id, author, title, body) VALUES ($1, $2, $3, $4)
             RETURNING {POST_COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(Uuid::new_v4())
            .bind(&new_post.author)
            .bind(&new_post.title)
            .bind(&new_post.body)
            .fetch_one(&self.pool)
            .await?;
        Ok(post)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_quiz(&self, new_quiz: NewQuiz) -> Result<Quiz, DatabaseError> {
        let query = format!(
            "INSERT INTO quizzes (id, topic_id, title, questions) VALUES ($1, $2, $3, $4)
             RETURNING {QUIZ_COLUMNS}"
        );
        let quiz = sqlx::query_as::<_, Quiz>(&query)
            .bind(Uuid::new_v4())
            .bind(new_quiz.topic_id)
            .bind(&new_quiz.title)
            .bind(Json(&new_quiz.questions))
            .fetch_one(&self.pool)
            .await?;
        Ok(quiz)
    }

    async fn get_quiz(&self, id: Uuid) -> Result<Option<Quiz>, DatabaseError> {
        let query = format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1");
        let quiz = sqlx::query_as::<_, Quiz>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(quiz)
    }

    async fn list_quizzes(&self, topic_id: Uuid) -> Result<Vec<Quiz>, DatabaseError> {
        let query = format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE topic_id = $1 ORDER BY created_at DESC"
        );
        let quizzes = sqlx::query_as::<_, Quiz>(&query)
            .bind(topic_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(quizzes)
    }

    async fn record_attempt(&self, attempt: NewAttempt) -> Result<QuizAttempt, DatabaseError> {
        let query = format!(
            "INSERT INTO quiz_attempts (id, quiz_id, username, score, total)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ATTEMPT_COLUMNS}"
        );
        let attempt = sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(Uuid::new_v4())
            .bind(attempt.quiz_id)
            .bind(&attempt.username)
            .bind(attempt.score)
            .bind(attempt.total)
            .fetch_one(&self.pool)
            .await?;
        Ok(attempt)
    }

    async fn list_attempts(&self, username: &str) -> Result<Vec<QuizAttempt>, DatabaseError> {
        let query = format!(
            "SELECT {ATTEMPT_COLUMNS} FROM quiz_attempts WHERE username = $1 ORDER BY created_at DESC"
        );
        let attempts = sqlx::query_as::<_, QuizAttempt>(&query)
            .bind(username)
            .fetch_all(&self.pool)
            .await?;
        Ok(attempts)
    }

    async fn get_settings(&self) -> Result<SiteSettings, DatabaseError> {
        let settings = sqlx::query_as::<_, SiteSettings>(
            "SELECT site_name, registration_open, notice FROM site_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings.unwrap_or_default())
    }

    async fn save_settings(&self, settings: SiteSettings) -> Result<SiteSettings, DatabaseError> {
        let saved = sqlx::query_as::<_, SiteSettings>(
            "INSERT INTO site_settings (id, site_name, registration_open, notice)
             VALUES (1, $1, $2, $3)
             ON CONFLICT (id) DO UPDATE SET
                site_name = EXCLUDED.site_name,
                registration_open = EXCLUDED.registration_open,
                notice = EXCLUDED.notice
             RETURNING site_name, registration_open, notice",
        )
        .bind(&settings.site_name)
        .bind(settings.registration_open)
        .bind(&settings.notice)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }
}
