//! User-facing message table.
//!
//! Handlers never put internal error text on the wire; they pick a key from
//! here and the envelope carries the matching string.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    InternalError,
    Unauthorized,
    InvalidCredentials,
    AdminOnly,
    MembersOnly,
    InvalidRequest,
    InvalidUsername,
    PasswordTooShort,
    UsernameTaken,
    RegistrationClosed,
    UserNotFound,
    TopicNotFound,
    InvalidAvatar,
    GroupNotFound,
    GroupNameRequired,
    AlreadyMember,
    NotMember,
    OwnerCannotLeave,
    PostNotFound,
    PostContentRequired,
    NotPostAuthor,
    QuizNotFound,
    InvalidQuiz,
    AnswerCountMismatch,
    SiteNameRequired,
}

impl Message {
    pub fn text(self) -> &'static str {
        match self {
            Message::InternalError => "Something went wrong on our side. Please try again later.",
            Message::Unauthorized => "Please sign in to continue.",
            Message::InvalidCredentials => "The username or password is incorrect.",
            Message::AdminOnly => "This area is for administrators only.",
            Message::MembersOnly => "This area is for members only.",
            Message::InvalidRequest => "The request could not be understood.",
            Message::InvalidUsername => {
                "Usernames must be 3 to 30 characters of letters, digits or underscores."
            }
            Message::PasswordTooShort => "Passwords must be at least 8 characters long.",
            Message::UsernameTaken => "That username is already taken.",
            Message::RegistrationClosed => "Registration is currently closed.",
            Message::UserNotFound => "No such user.",
            Message::TopicNotFound => "No such topic.",
            Message::InvalidAvatar => "Please choose one of the available avatars.",
            Message::GroupNotFound => "No such group.",
            Message::GroupNameRequired => "Groups need a name.",
            Message::AlreadyMember => "You are already a member of this group.",
            Message::NotMember => "You are not a member of this group.",
            Message::OwnerCannotLeave => "Group owners cannot leave their own group.",
            Message::PostNotFound => "No such post.",
            Message::PostContentRequired => "Posts need both a title and a body.",
            Message::NotPostAuthor => "You can only delete your own posts.",
            Message::QuizNotFound => "No such quiz.",
            Message::InvalidQuiz => {
                "Every question needs at least two choices and a valid answer."
            }
            Message::AnswerCountMismatch => "Please answer every question exactly once.",
            Message::SiteNameRequired => "The site name cannot be empty.",
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}
