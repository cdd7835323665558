//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Field names are camelCase on the wire, matching the mobile client.

use serde::{Deserialize, Serialize};

use crate::domain::{Question, Quiz, QuizResult, UserProfile};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    GetQuiz {
        #[serde(rename = "quizId")]
        quiz_id: String,
    },
    ListQuizzes {
        #[serde(default)]
        q: Option<String>,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        popular: Option<bool>,
    },
    ResolveLink {
        #[serde(default)]
        link: Option<String>,
        #[serde(default, rename = "quizId")]
        quiz_id: Option<String>,
    },
    SubmitResult {
        result: ResultIn,
    },
    RecentResults {
        #[serde(default)]
        limit: Option<usize>,
    },
    GetProfile,
    /// Current profile immediately, then a push after every submission.
    SubscribeProfile,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Quiz {
        quiz: QuizOut,
    },
    QuizNotFound {
        #[serde(rename = "quizId")]
        quiz_id: String,
    },
    Quizzes {
        quizzes: Vec<QuizSummaryOut>,
    },
    Resolved {
        #[serde(rename = "quizId")]
        quiz_id: Option<String>,
        quiz: Option<QuizOut>,
    },
    ResultRecorded {
        profile: ProfileOut,
        result: ResultOut,
    },
    RecentResults {
        results: Vec<ResultOut>,
    },
    Profile {
        profile: ProfileOut,
    },
    ProfileUpdate {
        profile: ProfileOut,
        result: ResultOut,
    },
    Error {
        message: String,
    },
}

/// Full quiz DTO, questions included (the client grades locally).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub question_count: u32,
    pub duration: String,
    pub questions: Vec<QuestionOut>,
    pub is_popular: bool,
    pub created_at: i64,
}

/// List-view DTO: everything but the question bodies.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummaryOut {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub question_count: u32,
    pub duration: String,
    pub is_popular: bool,
    pub created_at: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOut {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: Option<String>,
}

/// Convert the internal `Quiz` to the full public DTO.
pub fn to_out(q: &Quiz) -> QuizOut {
    QuizOut {
        id: q.id.clone(),
        title: q.title.clone(),
        description: q.description.clone(),
        category: q.category.clone(),
        question_count: q.question_count,
        duration: q.duration.clone(),
        questions: q.questions.iter().map(question_to_out).collect(),
        is_popular: q.is_popular,
        created_at: q.created_at,
    }
}

pub fn to_summary(q: &Quiz) -> QuizSummaryOut {
    QuizSummaryOut {
        id: q.id.clone(),
        title: q.title.clone(),
        description: q.description.clone(),
        category: q.category.clone(),
        question_count: q.question_count,
        duration: q.duration.clone(),
        is_popular: q.is_popular,
        created_at: q.created_at,
    }
}

fn question_to_out(q: &Question) -> QuestionOut {
    QuestionOut {
        id: q.id.clone(),
        text: q.text.clone(),
        options: q.options.clone(),
        correct_answer_index: q.correct_answer_index,
        explanation: q.explanation.clone(),
    }
}

/// A submitted attempt. Unsigned fields reject negative scores/totals at
/// deserialization time; `completed_at` defaults to the server clock.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultIn {
    pub quiz_id: String,
    pub score: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub time_spent: u64,
    #[serde(default)]
    pub completed_at: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultOut {
    pub quiz_id: String,
    pub score: u32,
    pub total_questions: u32,
    pub time_spent: u64,
    pub completed_at: i64,
    pub percentage: u32,
}

pub fn result_to_out(r: &QuizResult) -> ResultOut {
    ResultOut {
        quiz_id: r.quiz_id.clone(),
        score: r.score,
        total_questions: r.total_questions,
        time_spent: r.time_spent,
        completed_at: r.completed_at,
        percentage: r.percentage(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOut {
    pub id: String,
    pub name: String,
    pub email: String,
    pub completed_quizzes: u32,
    pub best_score: u32,
    pub total_score: u64,
    pub created_at: i64,
}

pub fn profile_to_out(p: &UserProfile) -> ProfileOut {
    ProfileOut {
        id: p.id.clone(),
        name: p.name.clone(),
        email: p.email.clone(),
        completed_quizzes: p.completed_quizzes,
        best_score: p.best_score,
        total_score: p.total_score,
        created_at: p.created_at,
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct QuizzesQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub popular: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, rename = "quizId")]
    pub quiz_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct QuizzesOut {
    pub quizzes: Vec<QuizSummaryOut>,
}

#[derive(Serialize)]
pub struct CategoriesOut {
    pub categories: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveOut {
    #[serde(rename = "quizId")]
    pub quiz_id: Option<String>,
    pub quiz: Option<QuizOut>,
}

#[derive(Serialize)]
pub struct RecentResultsOut {
    pub results: Vec<ResultOut>,
}

#[derive(Serialize)]
pub struct NotFoundOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
