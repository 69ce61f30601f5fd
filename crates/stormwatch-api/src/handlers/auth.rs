//! Registration, verification and login handlers.

use axum::Json;
use axum::extract::State;

use stormwatch_service::{AuthSession, Registration};

use crate::dto::request::{LoginRequest, RegisterRequest, ResendOtpRequest, VerifyRequest};
use crate::dto::response::{AuthResponse, MessageResponse, RegisterResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

fn auth_response(message: &str, session: AuthSession) -> AuthResponse {
    AuthResponse {
        message: message.to_string(),
        token: session.token.token,
        expires_at: session.token.expires_at,
        email: session.user.email.clone(),
        user: session.user.into(),
    }
}

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let email = state
        .accounts
        .register(Registration {
            name: req.name,
            email: req.email,
            phone: req.phone,
            password: req.password,
            coordinates: req.coordinates,
        })
        .await?;

    Ok(Json(RegisterResponse {
        message: "Registration initiated. Check your email and SMS for verification code."
            .to_string(),
        email,
    }))
}

/// POST /api/resend-otp
pub async fn resend_otp(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ResendOtpRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.accounts.resend_code(&req.email).await?;
    Ok(Json(MessageResponse::new("Verification code re-sent")))
}

/// POST /api/verify
pub async fn verify(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifyRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = state.accounts.verify(&req.email, &req.code).await?;
    Ok(Json(auth_response("Email verified successfully", session)))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = state
        .accounts
        .login(&req.identifier, &req.password, req.coordinates)
        .await?;
    Ok(Json(auth_response("User logged in successfully", session)))
}
