use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    dto::RegisterRequest,
    repo::UserRepo,
    repo_types::{NewUser, User},
};
use crate::error::{AppError, AppResult};

const MIN_NAME_LEN: usize = 3;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trim and normalize the registration payload, rejecting bad input.
pub(crate) fn validate_registration(payload: RegisterRequest) -> AppResult<(String, String)> {
    let name = payload.name.trim().to_string();
    let email = payload.email.trim().to_lowercase();

    if name.chars().count() < MIN_NAME_LEN {
        return Err(AppError::validation(format!(
            "name must be at least {MIN_NAME_LEN} characters"
        )));
    }
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email"));
    }
    Ok((name, email))
}

/// Outcome of a registration: the user and whether it was newly created.
pub struct Registration {
    pub user: User,
    pub created: bool,
}

/// Look up the user by email, creating it with a fresh session id if absent.
/// Existing users are returned untouched so their session id is reused.
pub async fn register(users: &dyn UserRepo, payload: RegisterRequest) -> AppResult<Registration> {
    let (name, email) = validate_registration(payload)?;

    if let Some(user) = users.find_by_email(&email).await? {
        debug!(user_id = %user.id, "email already registered; reusing session");
        return Ok(Registration {
            user,
            created: false,
        });
    }

    let new = NewUser {
        name,
        email: email.clone(),
        session_id: Uuid::new_v4(),
    };
    match users.create(new).await? {
        Some(user) => {
            info!(user_id = %user.id, email = %user.email, "user registered");
            Ok(Registration {
                user,
                created: true,
            })
        }
        // lost a race against a concurrent registration of the same email
        None => {
            let user = users
                .find_by_email(&email)
                .await?
                .ok_or_else(|| anyhow::anyhow!("user {email} vanished after insert conflict"))?;
            Ok(Registration {
                user,
                created: false,
            })
        }
    }
}
