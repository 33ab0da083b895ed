use axum::{
    Json,
    body::Bytes,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use log::{debug, info};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::{AppError, AppState, blocking, parse_body};
use crate::auth::{self as credentials, AuthError, Claims, Role};
use crate::db::models::NewUser;
use crate::store::{StoreError, Stores};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Loose shape check, enough to reject obvious typos.
pub(crate) fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid email address: {}", email)))
    }
}

pub(crate) fn parse_role(raw: &str) -> Result<Role, AppError> {
    raw.parse::<Role>()
        .map_err(|_| AppError::Validation("Invalid role specified".to_string()))
}

/// Validates a registration, hashes the password and stores the user.
pub(crate) fn create_user(stores: &Stores, req: RegisterRequest, bcrypt_cost: u32) -> Result<i64, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let email = req.email.trim();
    validate_email(email)?;
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    let role = parse_role(&req.role)?;

    let password_hash = credentials::hash_password(&req.password, bcrypt_cost)
        .map_err(|e| AppError::internal("Failed to hash password", e))?;

    stores
        .users
        .create(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role: role.to_string(),
        })
        .map_err(|e| match e {
            StoreError::Conflict(_) => AppError::Validation("Email is already registered".to_string()),
            other => AppError::from_store(other, "register", "user"),
        })
}

pub async fn register(State(state): State<AppState>, body: Bytes) -> Result<(StatusCode, Json<Value>), AppError> {
    let req: RegisterRequest = parse_body(&body)?;
    let stores = state.stores.clone();
    let cost = state.bcrypt_cost;
    let id = blocking(move || create_user(&stores, req, cost)).await?;

    info!("Registered user {}", id);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully", "user_id": id })),
    ))
}

pub async fn login(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, AppError> {
    let req: LoginRequest = parse_body(&body)?;
    let stores = state.stores.clone();

    let user = blocking(move || {
        let user = stores
            .users
            .find_by_email(req.email.trim())
            .map_err(|e| AppError::from_store(e, "login", "user"))?
            .ok_or(AppError::Unauthenticated("Invalid credentials"))?;
        if !credentials::verify_password(&req.password, &user.password_hash) {
            return Err(AppError::Unauthenticated("Invalid credentials"));
        }
        Ok(user)
    })
    .await?;

    let role = user
        .role
        .parse::<Role>()
        .map_err(|e| AppError::internal("Failed to login", e))?;
    let token = state
        .tokens
        .issue(user.id, role)
        .map_err(|e| AppError::internal("Failed to generate token", e))?;

    info!("User {} logged in as {}", user.id, role);
    Ok(Json(json!({ "message": "Login successful", "token": token, "role": role })))
}

/// Rejects requests without a valid bearer token and exposes the claims to
/// the handlers behind it.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthenticated("Unauthorized: Missing or invalid token format"))?;

    let claims = state.tokens.verify(token).map_err(|e| {
        match &e {
            AuthError::Expired => debug!("Rejected expired token"),
            other => debug!("Rejected token: {}", other),
        }
        AppError::Unauthenticated("Unauthorized: Invalid or expired token")
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub async fn require_role(State(allowed): State<&'static [Role]>, req: Request, next: Next) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(AppError::Unauthenticated("Unauthorized: Missing or invalid token format"))?;
    if !allowed.contains(&claims.role) {
        debug!("User {} with role {} denied {}", claims.user_id, claims.role, req.uri().path());
        return Err(AppError::Forbidden);
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_check() {
        for ok in ["a@b.io", "first.last@example.org"] {
            assert!(validate_email(ok).is_ok(), "{ok}");
        }
        for bad in ["", "plain", "@example.org", "a@b", "a@.io", "a b@c.io", "a@b.io."] {
            assert!(validate_email(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn registration_rules() {
        let (stores, _) = Stores::in_memory();
        let req = |name: &str, email: &str, password: &str, role: &str| RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: role.into(),
        };

        assert!(matches!(
            create_user(&stores, req("Ravi", "ravi@example.org", "12345", "staff"), 4),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            create_user(&stores, req("Ravi", "ravi@example.org", "123456", "owner"), 4),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            create_user(&stores, req(" ", "ravi@example.org", "123456", "staff"), 4),
            Err(AppError::Validation(_))
        ));

        let id = create_user(&stores, req("Ravi", "ravi@example.org", "123456", "staff"), 4).unwrap();
        let stored = stores.users.get(id).unwrap();
        assert_eq!(stored.role, "staff");
        assert!(credentials::verify_password("123456", &stored.password_hash));

        let dup = create_user(&stores, req("Other", "ravi@example.org", "abcdef", "viewer"), 4).unwrap_err();
        assert_eq!(dup.to_string(), "Email is already registered");
    }
}
