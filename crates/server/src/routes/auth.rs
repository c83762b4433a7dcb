//! Registration, login and logout.

use axum::{Json, extract::State, http::StatusCode};
use secrecy::SecretString;
use tower_sessions::Session;

use cashback_core::{CashbackError, CashbackStore, NewUser, User};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, LoginRequest, RegisterRequest};
use crate::services::validate_password;
use crate::state::AppState;

/// Run a password-hashing engine call off the async runtime.
async fn with_hasher<T, F>(store: &CashbackStore, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&CashbackStore) -> std::result::Result<T, CashbackError> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))?
        .map_err(AppError::from)
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    set_current_user(session, &CurrentUser::from(user)).await?;
    set_sentry_user(&user.id, user.username.as_str());
    Ok(())
}

/// Register a customer account and log it in.
///
/// POST /api/register
///
/// # Errors
///
/// `400` for a weak password or invalid profile field, `409` for a taken
/// username.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let password = SecretString::from(req.password);
    validate_password(&password)?;

    let new_user = NewUser {
        username: req.username,
        password,
        name: req.name,
        address: req.address,
        phone: req.phone,
        is_admin: false,
    };

    let user = with_hasher(state.store(), move |store| store.accounts().register(&new_user)).await?;
    start_session(&session, &user).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in with username and password.
///
/// POST /api/login
///
/// # Errors
///
/// `401` when the username is unknown or the password is wrong.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<User>> {
    let password = SecretString::from(req.password);
    let username = req.username;

    let user = with_hasher(state.store(), move |store| {
        store.accounts().authenticate(&username, &password)
    })
    .await?
    .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    start_session(&session, &user).await?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(Json(user))
}

/// Log out and drop the session.
///
/// POST /api/logout
///
/// # Errors
///
/// `500` if the session store fails.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The logged-in user's profile.
///
/// GET /api/user
///
/// # Errors
///
/// `401` without a session user.
pub async fn current_user(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<User>> {
    let user = state
        .store()
        .accounts()
        .get_user(current.id)
        .map_err(|e| match e {
            CashbackError::UserNotFound(_) => {
                AppError::Unauthorized("Session user no longer exists".to_string())
            }
            other => other.into(),
        })?;

    Ok(Json(user))
}
