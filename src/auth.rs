// src/auth.rs
use crate::error::GameError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::{Filter, Rejection};

const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// Function to create a JWT token
pub fn create_token(user_id: &str, secret: &str) -> Result<String, GameError> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| GameError::Unauthorized(format!("could not issue token: {}", e)))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, GameError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| GameError::Unauthorized(e.to_string()))
}

fn authorize(header: Option<String>, secret: &str) -> Result<String, GameError> {
    let header =
        header.ok_or_else(|| GameError::Unauthorized("missing authorization header".into()))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| GameError::Unauthorized("expected a bearer token".into()))?;
    Ok(verify_token(token.trim(), secret)?.sub)
}

/// Extracts the user id from `Authorization: Bearer <jwt>`.
pub fn with_user(
    secret: Arc<String>,
) -> impl Filter<Extract = (String,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let secret = secret.clone();
        async move { authorize(header, &secret).map_err(warp::reject::custom) }
    })
}
