//! Account lifecycle: register → verify (creates the user) → login.

use std::sync::Arc;

use tracing::{info, warn};

use stormwatch_auth::otp::generate_code;
use stormwatch_auth::{
    IssuedToken, JwtEncoder, PasswordHasher, PasswordValidator, PendingRegistration,
    PendingRegistrations,
};
use stormwatch_core::config::auth::AuthConfig;
use stormwatch_core::error::{AppError, ErrorKind};
use stormwatch_core::result::AppResult;
use stormwatch_core::traits::{
    Clock, EmailMessage, EmailSender, SmsMessage, SmsSender, WeatherProvider,
};
use stormwatch_core::types::Coordinates;
use stormwatch_database::store::UserStore;
use stormwatch_entity::user::{User, UserLocation};

use crate::templates::account::{VERIFY_SUBJECT, verification_email, welcome_sms};

/// Place name stored when reverse geocoding yields nothing.
const UNKNOWN_PLACE: &str = "Unknown Location";

const ALREADY_REGISTERED: &str = "Email or phone number already registered";
const INVALID_CREDENTIALS: &str = "Invalid credentials or unverified account";

/// Input to [`AccountService::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub coordinates: Option<Coordinates>,
}

/// A signed-in user and their bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: IssuedToken,
    pub user: User,
}

/// Drives registration, code verification and login.
#[derive(Debug, Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    pending: PendingRegistrations,
    weather: Arc<dyn WeatherProvider>,
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
    clock: Arc<dyn Clock>,
    hasher: PasswordHasher,
    password_policy: PasswordValidator,
    tokens: JwtEncoder,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserStore>,
        weather: Arc<dyn WeatherProvider>,
        email: Arc<dyn EmailSender>,
        sms: Arc<dyn SmsSender>,
        clock: Arc<dyn Clock>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            users,
            pending: PendingRegistrations::new(config),
            weather,
            email,
            sms,
            clock,
            hasher: PasswordHasher::new(),
            password_policy: PasswordValidator::new(config),
            tokens: JwtEncoder::new(config),
        }
    }

    /// Start a registration: check uniqueness, hold the account server-side
    /// and send the verification code by email and SMS.
    ///
    /// Returns the normalized email the code was sent to.
    pub async fn register(&self, input: Registration) -> AppResult<String> {
        let name = input.name.trim();
        let email = input.email.trim().to_lowercase();
        let phone = input.phone.trim();
        if name.is_empty() || email.is_empty() || phone.is_empty() {
            return Err(AppError::validation("Name, email and phone are required"));
        }
        self.password_policy.validate(&input.password)?;

        if self.users.exists_by_email_or_phone(&email, phone).await? {
            return Err(AppError::validation(ALREADY_REGISTERED));
        }

        let location = match input.coordinates {
            Some(at) => Some(self.resolve_location(at).await?),
            None => None,
        };

        let pending = PendingRegistration {
            name: name.to_string(),
            email: email.clone(),
            phone: phone.to_string(),
            password_hash: self.hasher.hash_password(&input.password)?,
            location,
            code: generate_code(),
        };
        self.send_code(&pending).await;
        self.pending.put(pending).await;

        info!(user_email = %email, "Registration pending verification");
        Ok(email)
    }

    /// Issue a fresh code for a pending registration and restart its TTL.
    pub async fn resend_code(&self, email: &str) -> AppResult<()> {
        let mut pending = self
            .pending
            .get(email)
            .await
            .ok_or_else(|| AppError::validation("Verification expired or not found"))?;

        pending.code = generate_code();
        self.send_code(&pending).await;
        self.pending.put(pending).await;

        info!(user_email = %email, "Verification code re-sent");
        Ok(())
    }

    /// Confirm a code, create the verified account and sign it in.
    pub async fn verify(&self, email: &str, code: &str) -> AppResult<AuthSession> {
        let pending = self
            .pending
            .get(email)
            .await
            .ok_or_else(|| AppError::validation("Verification expired or not found"))?;

        if !pending.code_matches(code) {
            return Err(AppError::validation("Invalid verification code"));
        }

        if self
            .users
            .exists_by_email_or_phone(&pending.email, &pending.phone)
            .await?
        {
            self.pending.remove(email).await;
            return Err(AppError::validation(ALREADY_REGISTERED));
        }

        let user = self
            .users
            .create(pending.into_create_user())
            .await
            .map_err(|e| match e.kind {
                ErrorKind::Conflict => AppError::validation(ALREADY_REGISTERED),
                _ => e,
            })?;
        self.pending.remove(email).await;

        info!(user_id = %user.id, user_email = %user.email, "Account verified");
        self.session(user)
    }

    /// Authenticate by email or phone and refresh the stored location when
    /// coordinates are supplied.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        coordinates: Option<Coordinates>,
    ) -> AppResult<AuthSession> {
        let mut user = self
            .users
            .find_by_identifier(identifier.trim())
            .await?
            .filter(|u| u.is_verified)
            .ok_or_else(|| AppError::authentication(INVALID_CREDENTIALS))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        if let Some(at) = coordinates {
            let location = self.resolve_location(at).await?;
            self.users.update_location(user.id, &location).await?;
            user.set_location(&location);
        }

        info!(user_id = %user.id, user_email = %user.email, "User logged in");
        self.session(user)
    }

    fn session(&self, user: User) -> AppResult<AuthSession> {
        let token = self.tokens.issue(&user.email, self.clock.now())?;
        Ok(AuthSession { token, user })
    }

    async fn resolve_location(&self, at: Coordinates) -> AppResult<UserLocation> {
        if !at.is_valid() {
            return Err(AppError::validation("Coordinates are out of range"));
        }
        let place_name = match self.weather.reverse_geocode(at).await {
            Ok(Some(name)) => name,
            Ok(None) => UNKNOWN_PLACE.to_string(),
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed");
                UNKNOWN_PLACE.to_string()
            }
        };
        Ok(UserLocation {
            coordinates: at,
            place_name,
            last_updated: self.clock.now(),
        })
    }

    /// Best effort on both channels.
    async fn send_code(&self, pending: &PendingRegistration) {
        let email = EmailMessage::plain(
            &pending.email,
            VERIFY_SUBJECT,
            verification_email(&pending.code),
        );
        if let Err(e) = self.email.send(&email).await {
            warn!(user_email = %pending.email, error = %e, "Verification email failed");
        }

        let sms = SmsMessage::new(&pending.phone, welcome_sms(&pending.name, &pending.code));
        if let Err(e) = self.sms.send(&sms).await {
            warn!(user_email = %pending.email, error = %e, "Verification SMS failed");
        }
    }
}
