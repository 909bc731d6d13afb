use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub choices: Vec<String>,
    /// Index into `choices`
    pub answer: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub title: String,
    pub questions: Json<Vec<Question>>,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    /// A quiz needs a title, at least one question, and every answer must point at a choice.
    pub fn is_well_formed(title: &str, questions: &[Question]) -> bool {
        !title.trim().is_empty()
            && !questions.is_empty()
            && questions.iter().all(|q| {
                !q.prompt.trim().is_empty() && q.choices.len() >= 2 && q.answer < q.choices.len()
            })
    }

    /// Number of correct answers, or `None` when the answer count does not match.
    pub fn score(&self, answers: &[usize]) -> Option<i32> {
        if answers.len() != self.questions.len() {
            return None;
        }
        let correct = self
            .questions
            .iter()
            .zip(answers)
            .filter(|(question, given)| question.answer == **given)
            .count();
        Some(correct as i32)
    }

    pub fn public_view(&self) -> PublicQuiz {
        PublicQuiz {
            id: self.id,
            topic_id: self.topic_id,
            title: self.title.clone(),
            questions: self
                .questions
                .iter()
                .map(|q| PublicQuestion {
                    prompt: q.prompt.clone(),
                    choices: q.choices.clone(),
                })
                .collect(),
            created_at: self.created_at,
        }
    }
}

/// Quiz as shown to people taking it: no answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuiz {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub title: String,
    pub questions: Vec<PublicQuestion>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub prompt: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizAttempt {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub username: String,
    pub score: i32,
    pub total: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub topic_id: Uuid,
    pub title: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub quiz_id: Uuid,
    pub username: String,
    pub score: i32,
    pub total: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: usize) -> Question {
        Question {
            prompt: "Pick one".to_string(),
            choices: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            answer,
        }
    }

    fn quiz(questions: Vec<Question>) -> Quiz {
        Quiz {
            id: Uuid::new_v4(),
            topic_id: Uuid::new_v4(),
            title: "Basics".to_string(),
            questions: Json(questions),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn score_counts_matching_answers() {
        let quiz = quiz(vec![question(0), question(2), question(1)]);
        assert_eq!(quiz.score(&[0, 2, 1]), Some(3));
        assert_eq!(quiz.score(&[0, 0, 0]), Some(1));
        assert_eq!(quiz.score(&[0, 2]), None);
    }

    #[test]
    fn out_of_range_answer_is_malformed() {
        assert!(Quiz::is_well_formed("Basics", &[question(2)]));
        assert!(!Quiz::is_well_formed("Basics", &[question(3)]));
        assert!(!Quiz::is_well_formed("Basics", &[]));
        assert!(!Quiz::is_well_formed(" ", &[question(0)]));
    }

    #[test]
    fn public_view_hides_answers() {
        let view = serde_json::to_value(quiz(vec![question(1)]).public_view()).unwrap();
        assert!(view["questions"][0].get("answer").is_none());
        assert_eq!(view["questions"][0]["choices"].as_array().unwrap().len(), 3);
    }
}
