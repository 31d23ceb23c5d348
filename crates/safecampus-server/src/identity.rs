//! Identity service: registration, login and profile maintenance for both
//! principal kinds.
//!
//! `register` and `login` are the entry points for the gateway. They split
//! the work so that Argon2 runs on its own blocking task and never while the
//! database lock is held. The remaining functions are synchronous and run
//! inside `AppState::with_db`.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use safecampus_shared::models::Account;
use safecampus_shared::protocol::{LoginRequest, SignupRequest, UpdateAccountRequest};
use safecampus_shared::types::PrincipalKind;
use safecampus_shared::validation::{
    require, validate_email, validate_password_confirmation, validate_phone,
};
use safecampus_store::{AccountRecord, Database, NewAccount};
use uuid::Uuid;

use crate::api::AppState;
use crate::error::{not_found, ServerError};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Salted Argon2id hash in PHC string format.
pub fn hash_password(password: &str) -> Result<String, ServerError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServerError::Internal(format!("password hashing failed: {e}")))
}

/// `false` for a wrong password and for an unparseable stored hash alike.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::warn!("stored password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

async fn run_blocking<T, F>(f: F) -> Result<T, ServerError>
where
    F: FnOnce() -> Result<T, ServerError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(format!("password task failed: {e}")))?
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> ServerError {
    ServerError::Unauthorized(INVALID_CREDENTIALS.to_string())
}

fn not_found_message(kind: PrincipalKind) -> &'static str {
    match kind {
        PrincipalKind::Student => "Student not found",
        PrincipalKind::Admin => "Admin not found",
    }
}

/// Field checks that need neither the database nor a hash.
pub fn validate_signup(req: &SignupRequest) -> Result<(), ServerError> {
    require("Name", &req.name)?;
    validate_email(req.email.trim())?;
    validate_phone(&req.mobile)?;
    validate_password_confirmation(&req.password, &req.confirm_password)?;
    Ok(())
}

pub fn validate_login(req: &LoginRequest) -> Result<(), ServerError> {
    validate_email(req.email.trim())?;
    require("Password", &req.password)?;
    Ok(())
}

/// Store a validated signup whose password has already been hashed.
pub fn create_account(
    db: &Database,
    kind: PrincipalKind,
    req: &SignupRequest,
    password_hash: String,
) -> Result<Account, ServerError> {
    validate_signup(req)?;

    let email = normalize_email(&req.email);
    if db.find_account_by_email(kind, &email)?.is_some() {
        return Err(ServerError::Conflict(format!("{} already exists", kind.label())));
    }

    let new = NewAccount {
        name: req.name.trim().to_string(),
        email,
        mobile: req.mobile.clone(),
        password_hash,
    };
    Ok(db.insert_account(kind, &new)?)
}

/// The stored credentials for a login attempt. An unknown email is
/// `Unauthorized` with the same message as a wrong password.
pub fn find_credentials(
    db: &Database,
    kind: PrincipalKind,
    req: &LoginRequest,
) -> Result<AccountRecord, ServerError> {
    validate_login(req)?;
    db.find_account_by_email(kind, &normalize_email(&req.email))?
        .ok_or_else(invalid_credentials)
}

pub fn check_password(record: AccountRecord, password: &str) -> Result<Account, ServerError> {
    if verify_password(password, &record.password_hash) {
        Ok(record.account)
    } else {
        Err(invalid_credentials())
    }
}

pub async fn register(
    state: &AppState,
    kind: PrincipalKind,
    req: SignupRequest,
) -> Result<Account, ServerError> {
    validate_signup(&req)?;

    let password = req.password.clone();
    let password_hash = run_blocking(move || hash_password(&password)).await?;
    let account = state
        .with_db(move |db| create_account(db, kind, &req, password_hash))
        .await?;

    tracing::info!(id = %account.id, kind = %kind, "account registered");
    Ok(account)
}

pub async fn login(
    state: &AppState,
    kind: PrincipalKind,
    req: LoginRequest,
) -> Result<Account, ServerError> {
    validate_login(&req)?;

    let lookup = req.clone();
    let record = state
        .with_db(move |db| find_credentials(db, kind, &lookup))
        .await?;
    let account = run_blocking(move || check_password(record, &req.password)).await?;

    tracing::debug!(id = %account.id, kind = %kind, "login succeeded");
    Ok(account)
}

pub fn get_account(db: &Database, kind: PrincipalKind, id: Uuid) -> Result<Account, ServerError> {
    db.get_account(kind, id)
        .map_err(ServerError::from)
        .map_err(not_found(not_found_message(kind)))
}

pub fn update_account(
    db: &Database,
    kind: PrincipalKind,
    id: Uuid,
    req: &UpdateAccountRequest,
) -> Result<Account, ServerError> {
    require("Name", &req.name)?;
    validate_phone(&req.mobile)?;

    db.update_account(kind, id, req.name.trim(), &req.mobile)
        .map_err(ServerError::from)
        .map_err(not_found(not_found_message(kind)))
}

pub fn list_accounts(db: &Database, kind: PrincipalKind) -> Result<Vec<Account>, ServerError> {
    Ok(db.list_accounts(kind)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str) -> SignupRequest {
        SignupRequest {
            name: "Alice".into(),
            email: email.into(),
            mobile: "9999999999".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    fn register_in(db: &Database, kind: PrincipalKind, req: &SignupRequest) -> Result<Account, ServerError> {
        create_account(db, kind, req, hash_password(&req.password)?)
    }

    fn login_in(db: &Database, kind: PrincipalKind, req: &LoginRequest) -> Result<Account, ServerError> {
        check_password(find_credentials(db, kind, req)?, &req.password)
    }

    async fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().unwrap();
        let config = crate::config::ServerConfig {
            database_path: dir.path().join("identity.db"),
            upload_path: dir.path().join("uploads"),
            ..Default::default()
        };
        (AppState::new(config).await.unwrap(), dir)
    }

    #[test]
    fn test_hash_is_salted_and_verifies() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(verify_password("secret", &a));
        assert!(!verify_password("Secret", &a));
        assert!(!verify_password("secret", "not-a-hash"));
    }

    #[test]
    fn test_register_then_login() {
        let db = Database::open_in_memory().unwrap();
        let account = register_in(&db, PrincipalKind::Student, &signup("a@x.com")).unwrap();

        let logged_in = login_in(&db, PrincipalKind::Student, &login_req("a@x.com", "pw")).unwrap();
        assert_eq!(logged_in.id, account.id);

        // Email matching ignores case and surrounding whitespace.
        assert!(login_in(&db, PrincipalKind::Student, &login_req(" A@X.com ", "pw")).is_ok());
    }

    #[test]
    fn test_login_failures_are_unauthorized() {
        let db = Database::open_in_memory().unwrap();
        register_in(&db, PrincipalKind::Student, &signup("a@x.com")).unwrap();

        for (kind, email, password) in [
            (PrincipalKind::Student, "a@x.com", "wrong"),
            (PrincipalKind::Student, "b@x.com", "pw"),
            (PrincipalKind::Admin, "a@x.com", "pw"),
        ] {
            let err = login_in(&db, kind, &login_req(email, password)).unwrap_err();
            assert!(
                matches!(err, ServerError::Unauthorized(ref m) if m == INVALID_CREDENTIALS),
                "{kind} {email} {password}: {err:?}"
            );
        }
    }

    #[test]
    fn test_register_validation() {
        let db = Database::open_in_memory().unwrap();

        let mut req = signup("a@x.com");
        req.confirm_password = "other".into();
        assert!(matches!(
            register_in(&db, PrincipalKind::Student, &req),
            Err(ServerError::BadRequest(ref m)) if m == "Passwords must match"
        ));

        let mut req = signup("not-an-email");
        req.confirm_password = "pw".into();
        assert!(matches!(
            register_in(&db, PrincipalKind::Student, &req),
            Err(ServerError::BadRequest(_))
        ));

        let mut req = signup("a@x.com");
        req.mobile = "123".into();
        assert!(matches!(
            register_in(&db, PrincipalKind::Student, &req),
            Err(ServerError::BadRequest(_))
        ));
    }

    #[test]
    fn test_duplicate_email_conflicts_per_kind() {
        let db = Database::open_in_memory().unwrap();
        register_in(&db, PrincipalKind::Student, &signup("a@x.com")).unwrap();

        assert!(matches!(
            register_in(&db, PrincipalKind::Student, &signup("A@x.com")),
            Err(ServerError::Conflict(ref m)) if m == "Student already exists"
        ));
        assert!(register_in(&db, PrincipalKind::Admin, &signup("a@x.com")).is_ok());
    }

    #[test]
    fn test_get_and_update_account() {
        let db = Database::open_in_memory().unwrap();
        let account = register_in(&db, PrincipalKind::Student, &signup("a@x.com")).unwrap();

        let update = UpdateAccountRequest {
            name: "Alice B".into(),
            mobile: "+441234567890".into(),
        };
        let updated = update_account(&db, PrincipalKind::Student, account.id, &update).unwrap();
        assert_eq!(updated.name, "Alice B");
        assert_eq!(get_account(&db, PrincipalKind::Student, account.id).unwrap(), updated);

        let missing = Uuid::new_v4();
        assert!(matches!(
            get_account(&db, PrincipalKind::Student, missing),
            Err(ServerError::NotFound(ref m)) if m == "Student not found"
        ));
        assert!(matches!(
            update_account(&db, PrincipalKind::Admin, account.id, &update),
            Err(ServerError::NotFound(ref m)) if m == "Admin not found"
        ));
    }

    #[test]
    fn test_find_credentials_does_not_verify() {
        let db = Database::open_in_memory().unwrap();
        let account = register_in(&db, PrincipalKind::Student, &signup("a@x.com")).unwrap();

        // The lookup only fetches the record. The hash check is separate.
        let record = find_credentials(&db, PrincipalKind::Student, &login_req("a@x.com", "wrong")).unwrap();
        assert_eq!(record.account.id, account.id);
        assert!(matches!(
            check_password(record, "wrong"),
            Err(ServerError::Unauthorized(ref m)) if m == INVALID_CREDENTIALS
        ));
    }

    #[tokio::test]
    async fn test_register_and_login_through_state() {
        let (state, _dir) = test_state().await;

        let account = register(&state, PrincipalKind::Student, signup("a@x.com")).await.unwrap();
        let logged_in = login(&state, PrincipalKind::Student, login_req("a@x.com", "pw"))
            .await
            .unwrap();
        assert_eq!(logged_in.id, account.id);

        let err = login(&state, PrincipalKind::Student, login_req("a@x.com", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Unauthorized(_)));
    }
}
