// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 VolunteerHub

//! Authentication endpoints: registration, confirmation, login, resend, me.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    Json,
};

use crate::{
    auth::{self, password, tokens, Auth, Role},
    error::ApiError,
    mailer,
    models::{
        AckResponse, LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse,
        ResendConfirmationRequest, UserView,
    },
    state::AppState,
    storage::StoredAccount,
};

/// Register a new account.
///
/// Creates the credential record unconfirmed and emails a confirmation
/// link. Requesting `admin` yields an `admin_pending` account that cannot
/// log in until approved by staff.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, confirmation email dispatched", body = RegisterResponse),
        (status = 400, description = "Missing fields or invalid role"),
        (status = 409, description = "Email already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let email = auth::normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request(
            "missing_fields",
            "Email and password are required.",
        ));
    }

    let tag = {
        let raw = req.role.as_deref().unwrap_or("").trim().to_lowercase();
        if raw.is_empty() {
            "member".to_string()
        } else {
            raw
        }
    };
    let role = Role::from_registration_tag(&tag)
        .ok_or_else(|| ApiError::bad_request("invalid_role", "Invalid role."))?;

    let password_hash = password::hash_password(&req.password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        ApiError::internal("Internal server error.")
    })?;

    // Uniqueness is enforced by the store, not a pre-check
    let account = state.store.create(&email, &password_hash, role)?;
    tracing::info!(account_id = account.id, role = %account.role, "account registered");

    let token = state
        .confirmations
        .encode(account.id, &account.email, &tag, account.token_version);
    send_confirmation(&state, &account.email, account.id, &token).await;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful. Please check your email to confirm your account."
                .to_string(),
            user_id: account.id,
            role: tag,
        }),
    ))
}

/// Confirm an email address from an emailed link.
///
/// Responds with a redirect to the frontend login page: `?verified=1` on
/// success, `?verified=0&error={token|user|stale}` otherwise. The three
/// failure causes are distinguishable in the query string but the token
/// causes (signature, expiry) are not.
#[utoipa::path(
    get,
    path = "/auth/confirm/{token}",
    tag = "Auth",
    params(("token" = String, Path, description = "Confirmation token from the emailed link")),
    responses(
        (status = 303, description = "Redirect to the frontend login page with the outcome in the query string"),
    )
)]
pub async fn confirm_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Redirect {
    let origin = &state.config.frontend_origin;

    let Some(payload) = state
        .confirmations
        .decode(&token, state.config.confirm_token_max_age_secs)
    else {
        return confirm_redirect(origin, "verified=0&error=token");
    };

    let account = match state.store.find_by_id(payload.account_id) {
        Ok(Some(account)) => account,
        Ok(None) => return confirm_redirect(origin, "verified=0&error=user"),
        Err(e) => {
            tracing::error!(error = %e, "credential store failure during confirmation");
            return confirm_redirect(origin, "verified=0&error=user");
        }
    };

    if account.email != payload.email {
        return confirm_redirect(origin, "verified=0&error=user");
    }

    // Version check: a successful confirmation bumped the counter, which
    // revokes every token issued before it.
    if account.token_version != payload.version {
        return confirm_redirect(origin, "verified=0&error=stale");
    }

    match state.store.bump_confirmation(account.id, payload.version) {
        Ok(true) => {
            tracing::info!(account_id = account.id, "email confirmed");
            confirm_redirect(origin, "verified=1")
        }
        // A concurrent confirmation won the race between our version check
        // and the conditional update; the account is confirmed either way.
        Ok(false) => confirm_redirect(origin, "verified=1"),
        Err(e) => {
            tracing::error!(error = %e, account_id = account.id, "confirmation update failed");
            confirm_redirect(origin, "verified=0&error=token")
        }
    }
}

/// Authenticate and mint an access token.
///
/// Unknown email and wrong password are deliberately indistinguishable.
/// Unconfirmed accounts and pending admin applicants are refused with
/// specific codes: the caller has already proven password knowledge.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token and user snapshot", body = LoginResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid email or password"),
        (status = 403, description = "Email unconfirmed, or admin approval pending"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = auth::normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request(
            "missing_credentials",
            "Email and password are required.",
        ));
    }

    // Deliberately vague to avoid account enumeration
    let invalid_login = || ApiError::unauthorized("invalid_login", "Invalid email or password.");

    let Some(account) = state.store.find_by_email(&email)? else {
        return Err(invalid_login());
    };

    if !password::verify_password(&req.password, &account.password_hash) {
        return Err(invalid_login());
    }

    if !account.is_confirmed() {
        return Err(ApiError::forbidden(
            "email_unconfirmed",
            "Please confirm your email before logging in. \
             Check your inbox for the verification link.",
        ));
    }

    if account.role == Role::AdminPending {
        return Err(ApiError::forbidden(
            "admin_pending",
            "Your admin application is awaiting approval.",
        ));
    }

    let access_token = tokens::issue_access_token(
        account.id,
        &account.email,
        account.role,
        &state.config.access_token_secret,
        state.config.access_token_max_age_secs,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "access token issuance failed");
        ApiError::internal("Internal server error.")
    })?;

    tracing::info!(account_id = account.id, role = %account.role, "login succeeded");

    let mut user = UserView::from(&account);
    user.redirect = Some(account.role.redirect_hint().to_string());

    Ok(Json(LoginResponse { access_token, user }))
}

/// Re-send the confirmation email.
///
/// Always acknowledges with 200 so callers cannot probe which addresses
/// exist; a message is only actually dispatched for an existing,
/// still-unconfirmed account.
#[utoipa::path(
    post,
    path = "/auth/resend-confirmation",
    tag = "Auth",
    request_body = ResendConfirmationRequest,
    responses(
        (status = 200, description = "Generic acknowledgement", body = AckResponse),
        (status = 400, description = "Missing email"),
    )
)]
pub async fn resend_confirmation(
    State(state): State<AppState>,
    Json(req): Json<ResendConfirmationRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let email = auth::normalize_email(&req.email);
    if email.is_empty() {
        return Err(ApiError::bad_request("missing_email", "Email is required."));
    }

    match state.store.find_by_email(&email) {
        Ok(Some(account)) if !account.is_confirmed() => {
            // Issued at the CURRENT version so earlier links stay valid
            // until one of them is used.
            let token = state.confirmations.encode(
                account.id,
                &account.email,
                account.role.registration_tag(),
                account.token_version,
            );
            send_confirmation(&state, &account.email, account.id, &token).await;
        }
        Ok(_) => {}
        Err(e) => {
            // Same acknowledgement either way; the failure only goes to the log.
            tracing::error!(error = %e, "credential store failure during resend");
        }
    }

    Ok(Json(AckResponse {
        message: "If that email is registered and unconfirmed, a confirmation link has been sent."
            .to_string(),
    }))
}

/// Get the current authenticated account (session restore).
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current account", body = MeResponse),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn me(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, ApiError> {
    let account: StoredAccount = state
        .store
        .find_by_id(user.account_id)?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    Ok(Json(MeResponse {
        user: UserView::from(&account),
    }))
}

fn confirm_redirect(origin: &str, query: &str) -> Redirect {
    Redirect::to(&format!("{origin}/login?{query}"))
}

/// Dispatch the confirmation email. Best-effort: a mail outage must not
/// block account creation, so failures land in the log only.
async fn send_confirmation(state: &AppState, to: &str, account_id: u64, token: &str) {
    let confirm_url = state.confirmation_url(token);
    let (subject, text, html) = mailer::confirmation_email(&confirm_url);
    if let Err(e) = state.mailer.send(to, &subject, &text, Some(&html)).await {
        tracing::warn!(error = %e, account_id, "failed to send confirmation email");
    }
}
