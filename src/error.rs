// src/error.rs
use std::fmt;
use warp::http::StatusCode;
use warp::reject::Reject;

#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    NotStarted,
    AlreadyComplete,
    /// An action was attempted before the journey step it depends on.
    StepLocked { action: &'static str, requires: &'static str },
    QuizAlreadyPassed,
    HintsExhausted,
    UnknownStock(String),
    InsufficientCash { needed: f64, available: f64 },
    InvalidInput(String),
    SessionNotFound(String),
    Unauthorized(String),
}

impl GameError {
    pub fn status(&self) -> StatusCode {
        match self {
            GameError::NotStarted
            | GameError::AlreadyComplete
            | GameError::StepLocked { .. }
            | GameError::QuizAlreadyPassed
            | GameError::HintsExhausted => StatusCode::CONFLICT,
            GameError::UnknownStock(_)
            | GameError::InsufficientCash { .. }
            | GameError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GameError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            GameError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::NotStarted => write!(f, "game has not been started"),
            GameError::AlreadyComplete => write!(f, "game is already complete"),
            GameError::StepLocked { action, requires } => {
                write!(f, "cannot {} before {}", action, requires)
            }
            GameError::QuizAlreadyPassed => write!(f, "quiz already passed for this quarter"),
            GameError::HintsExhausted => write!(f, "no hints remaining"),
            GameError::UnknownStock(id) => write!(f, "unknown stock: {}", id),
            GameError::InsufficientCash { needed, available } => write!(
                f,
                "insufficient cash: need {:.2}, have {:.2}",
                needed, available
            ),
            GameError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            GameError::SessionNotFound(user) => write!(f, "no game session for {}", user),
            GameError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for GameError {}

impl Reject for GameError {}
