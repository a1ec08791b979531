//! Bearer token authentication for the HTTP transport.
//!
//! Student records are writable through every tool, so an HTTP deployment that
//! is reachable from other hosts should configure at least one token.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::warn;

/// Accepted bearer tokens. An empty set disables authentication.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    tokens: Vec<String>,
}

impl AuthConfig {
    /// Build from configured tokens. Blank entries are rejected.
    pub fn from_tokens(tokens: Vec<String>) -> Result<Self, String> {
        let mut accepted: Vec<String> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let trimmed = token.trim();
            if trimmed.is_empty() {
                return Err("Empty token value in --auth-token".to_string());
            }
            if !accepted.iter().any(|t| t == trimmed) {
                accepted.push(trimmed.to_string());
            }
        }
        Ok(Self { tokens: accepted })
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        !self.tokens.is_empty()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Compare against every token without short-circuiting.
    pub fn accepts(&self, provided: &str) -> bool {
        self.tokens.iter().fold(false, |found, expected| {
            found | (expected.len() == provided.len()
                && bool::from(expected.as_bytes().ct_eq(provided.as_bytes())))
        })
    }
}

/// Rejects requests without a valid `Authorization: Bearer <token>` header.
pub async fn auth_middleware(
    State(auth): State<Arc<AuthConfig>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let rejection = match bearer_token(&request) {
        Ok(token) if auth.accepts(token) => None,
        Ok(token) => {
            warn!(token_prefix = %mask_token(token), "Authentication failed: invalid token");
            Some("Invalid Bearer token")
        }
        Err(reason) => {
            warn!(reason, "Authentication failed");
            Some(reason)
        }
    };

    match rejection {
        None => next.run(request).await,
        Some(message) => unauthorized(message),
    }
}

fn bearer_token(request: &Request<Body>) -> Result<&str, &'static str> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or("Missing Bearer token in Authorization header")?
        .to_str()
        .map_err(|_| "Authorization header contains invalid characters")?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or("Invalid Authorization header format. Expected 'Bearer <token>'")?;
    if token.is_empty() {
        return Err("Bearer token is empty");
    }
    Ok(token)
}

fn mask_token(token: &str) -> String {
    match token.get(..3) {
        Some(prefix) if token.len() > 3 => format!("{}***", prefix),
        _ => "***".to_string(),
    }
}

fn unauthorized(message: &str) -> Response {
    let body = serde_json::json!({
        "error": { "code": "unauthorized", "message": message }
    });
    (
        StatusCode::UNAUTHORIZED,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}
