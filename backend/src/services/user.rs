//! User service for sign-up, login and password management
//!
//! Password hashing and verification run on the blocking thread pool; the
//! JWT service is passed by reference so its keys are never re-derived.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{NewUser, UserStore};
use authgate_shared::validation::normalize_email;
use authgate_shared::{AuthError, Role, SignUpRequest, UpdatePasswordRequest, User};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// Token plus the user it was issued for
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub user: User,
}

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user and issue a token for it
    pub async fn sign_up(
        users: &dyn UserStore,
        jwt: &JwtService,
        req: SignUpRequest,
    ) -> Result<IssuedToken, ApiError> {
        req.validate()?;

        let email = normalize_email(&req.email);
        if users.email_exists(&email).await? {
            return Err(ApiError::DuplicateEmail);
        }

        let password_hash = PasswordService::hash_async(req.password).await?;

        let record = users
            .create(NewUser {
                name: req.name.trim().to_string(),
                email,
                password_hash,
                role: Role::User,
            })
            .await?;

        let token = jwt.issue_token(record.id)?;

        metrics::counter!("auth_signups_total").increment(1);
        info!(user_id = %record.id, "user signed up");

        Ok(IssuedToken {
            token,
            user: record.into(),
        })
    }

    /// Check credentials and issue a token.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn login(
        users: &dyn UserStore,
        jwt: &JwtService,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<String, ApiError> {
        let (email, password) = match (email, password) {
            (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
                (email, password)
            }
            _ => return Err(AuthError::MissingCredentials.into()),
        };

        let user = users.find_by_email(&normalize_email(email)).await?;

        let verified = match &user {
            Some(user) => user.correct_password(password).await?,
            None => PasswordService::verify_placeholder_async(password.to_string()).await?,
        };

        let user = match user {
            Some(user) if verified => user,
            _ => {
                metrics::counter!("auth_logins_total", "outcome" => "failure").increment(1);
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let token = jwt.issue_token(user.id)?;

        metrics::counter!("auth_logins_total", "outcome" => "success").increment(1);
        info!(user_id = %user.id, "user logged in");

        Ok(token)
    }

    /// Change the password of `user_id` after re-checking the current one.
    ///
    /// Records the change time, so tokens issued earlier stop working.
    pub async fn update_password(
        users: &dyn UserStore,
        jwt: &JwtService,
        user_id: Uuid,
        req: UpdatePasswordRequest,
    ) -> Result<IssuedToken, ApiError> {
        let user = users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNoLongerExists)?;

        if !user.correct_password(&req.password_current).await? {
            return Err(AuthError::WrongCurrentPassword.into());
        }

        req.validate()?;

        let password_hash = PasswordService::hash_async(req.password).await?;
        let record = users
            .update_password(user.id, &password_hash, Utc::now())
            .await?;

        let token = jwt.issue_token(record.id)?;
        info!(user_id = %record.id, "password changed");

        Ok(IssuedToken {
            token,
            user: record.into(),
        })
    }

    /// All users, without password material
    pub async fn list(users: &dyn UserStore) -> Result<Vec<User>, ApiError> {
        let records = users.list().await?;
        Ok(records.into_iter().map(User::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryUserStore;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    fn jwt() -> JwtService {
        JwtService::new("service-test-secret", 3600)
    }

    fn sign_up_request(email: &str, password: &str, confirm: &str) -> SignUpRequest {
        SignUpRequest {
            name: "Service Tester".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_issues_token_for_new_user() {
        let store = MemoryUserStore::new();
        let jwt = jwt();
        let email: String = SafeEmail().fake();

        let issued = UserService::sign_up(&store, &jwt, sign_up_request(&email, "password123", "password123"))
            .await
            .unwrap();

        let claims = jwt.verify_token(&issued.token).unwrap();
        assert_eq!(claims.user_id(), Some(issued.user.id));
        assert_eq!(issued.user.role, Role::User);
        assert_eq!(issued.user.email, email.to_lowercase());
    }

    #[tokio::test]
    async fn test_sign_up_mismatched_confirmation_creates_nothing() {
        let store = MemoryUserStore::new();

        let err = UserService::sign_up(
            &store,
            &jwt(),
            sign_up_request("mismatch@example.com", "password123", "password321"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Validation(ref msg) if msg.contains("Passwords are not the same!")));
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email_is_case_insensitive() {
        let store = MemoryUserStore::new();
        let jwt = jwt();

        UserService::sign_up(&store, &jwt, sign_up_request("dup@example.com", "password123", "password123"))
            .await
            .unwrap();
        let err = UserService::sign_up(&store, &jwt, sign_up_request("DUP@Example.com", "password123", "password123"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = MemoryUserStore::new();
        let jwt = jwt();
        UserService::sign_up(&store, &jwt, sign_up_request("login@example.com", "password123", "password123"))
            .await
            .unwrap();

        let wrong_password = UserService::login(&store, &jwt, Some("login@example.com"), Some("nope-nope"))
            .await
            .unwrap_err();
        let unknown_email = UserService::login(&store, &jwt, Some("ghost@example.com"), Some("password123"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.status(), unknown_email.status());
    }

    #[tokio::test]
    async fn test_unknown_email_still_runs_argon2() {
        let store = MemoryUserStore::new();
        let jwt = jwt();
        UserService::sign_up(&store, &jwt, sign_up_request("timing@example.com", "password123", "password123"))
            .await
            .unwrap();
        PasswordService::placeholder_hash().unwrap();

        let started = std::time::Instant::now();
        UserService::login(&store, &jwt, Some("timing@example.com"), Some("nope-nope"))
            .await
            .unwrap_err();
        let wrong_password = started.elapsed();

        let started = std::time::Instant::now();
        UserService::login(&store, &jwt, Some("nobody@example.com"), Some("nope-nope"))
            .await
            .unwrap_err();
        let unknown_email = started.elapsed();

        // Both paths pay for one argon2 verification
        assert!(unknown_email * 4 >= wrong_password);
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let store = MemoryUserStore::new();

        for (email, password) in [
            (None, Some("password123")),
            (Some("a@example.com"), None),
            (Some(""), Some("password123")),
            (Some("a@example.com"), Some("")),
        ] {
            let err = UserService::login(&store, &jwt(), email, password).await.unwrap_err();
            assert!(matches!(err, ApiError::Auth(AuthError::MissingCredentials)));
        }
    }

    #[tokio::test]
    async fn test_update_password_requires_current_password() {
        let store = MemoryUserStore::new();
        let jwt = jwt();
        let issued = UserService::sign_up(&store, &jwt, sign_up_request("pw@example.com", "password123", "password123"))
            .await
            .unwrap();

        let err = UserService::update_password(
            &store,
            &jwt,
            issued.user.id,
            UpdatePasswordRequest {
                password_current: "not-my-password".to_string(),
                password: "new-password-1".to_string(),
                password_confirm: "new-password-1".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Auth(AuthError::WrongCurrentPassword)));
    }

    #[tokio::test]
    async fn test_update_password_then_login_with_new_password() {
        let store = MemoryUserStore::new();
        let jwt = jwt();
        let issued = UserService::sign_up(&store, &jwt, sign_up_request("rotate@example.com", "password123", "password123"))
            .await
            .unwrap();

        UserService::update_password(
            &store,
            &jwt,
            issued.user.id,
            UpdatePasswordRequest {
                password_current: "password123".to_string(),
                password: "new-password-1".to_string(),
                password_confirm: "new-password-1".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(UserService::login(&store, &jwt, Some("rotate@example.com"), Some("password123"))
            .await
            .is_err());
        assert!(UserService::login(&store, &jwt, Some("rotate@example.com"), Some("new-password-1"))
            .await
            .is_ok());
    }
}
