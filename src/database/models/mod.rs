pub mod admin;
pub mod group;
pub mod post;
pub mod quiz;
pub mod settings;
pub mod topic;
pub mod user;

pub use admin::Admin;
pub use group::{Group, NewGroup};
pub use post::{NewPost, Post};
pub use quiz::{NewAttempt, NewQuiz, PublicQuiz, Question, Quiz, QuizAttempt};
pub use settings::SiteSettings;
pub use topic::{NewRoadmap, Roadmap, Topic, TopicDetail, TopicSummary};
pub use user::{NewUser, PublicProfile, User, UserPatch, Visibility, AVATARS};
