//! Screen flows against a real server bound to a local port.

use std::sync::Arc;

use safecampus_server::{AppState, ServerConfig};
use safecampus_shared::types::PrincipalKind;
use tempfile::TempDir;

use super::*;
use crate::api::ApiClient;
use crate::error::ClientError;
use crate::forms::{ArticleForm, ContactForm, IncidentForm, LoginForm, MediaFile, PostForm, SignupForm};
use crate::location::FixedLocation;
use crate::navigation::Screen;
use crate::session::{MemoryStorage, SecureStorage, Session, TOKEN_KEY};
use crate::state::ClientState;

struct TestServer {
    base_url: String,
    _dir: TempDir,
}

async fn start_server() -> TestServer {
    let dir = TempDir::new().unwrap();
    let config = ServerConfig {
        database_path: dir.path().join("test.db"),
        upload_path: dir.path().join("uploads"),
        admin_registration_open: true,
        ..ServerConfig::default()
    };
    let state = AppState::new(config).await.unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(safecampus_server::serve_on(state, listener));
    TestServer {
        base_url,
        _dir: dir,
    }
}

fn client(server: &TestServer, storage: Arc<MemoryStorage>) -> ClientState {
    ClientState::new(
        ApiClient::new(server.base_url.clone()),
        storage,
        Arc::new(FixedLocation::new(12.34, 56.78)),
    )
    .unwrap()
}

fn signup_form(email: &str, mobile: &str) -> SignupForm {
    SignupForm {
        name: "Alice".into(),
        email: email.into(),
        mobile: mobile.into(),
        password: "pw".into(),
        confirm_password: "pw".into(),
    }
}

fn login_form(email: &str) -> LoginForm {
    LoginForm {
        email: email.into(),
        password: "pw".into(),
    }
}

#[tokio::test]
async fn test_signup_persists_session_and_restores() {
    let server = start_server().await;
    let storage = Arc::new(MemoryStorage::new());
    let mut state = client(&server, storage.clone());
    assert_eq!(state.session(), &Session::Anonymous);

    let screen = auth::signup(
        &mut state,
        PrincipalKind::Student,
        &signup_form("alice@campus.edu", "9999999999"),
    )
    .await
    .unwrap();
    assert_eq!(screen, Screen::StudentHome);
    assert!(storage.get(TOKEN_KEY).unwrap().is_some());

    // A fresh start picks the session back up.
    let restored = client(&server, storage.clone());
    assert_eq!(restored.session(), state.session());

    let profile = profile::load_profile(&restored).await.unwrap();
    assert_eq!(profile.email, "alice@campus.edu");

    assert_eq!(auth::logout(&mut state).unwrap(), Screen::Login);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_login_any_falls_through_to_admin() {
    let server = start_server().await;
    let mut state = client(&server, Arc::new(MemoryStorage::new()));
    auth::signup(
        &mut state,
        PrincipalKind::Admin,
        &signup_form("admin@campus.edu", "8888888888"),
    )
    .await
    .unwrap();
    auth::logout(&mut state).unwrap();

    let screen = auth::login_any(&mut state, &login_form("admin@campus.edu")).await.unwrap();
    assert_eq!(screen, Screen::AdminHome);
    assert!(matches!(state.session(), Session::Admin { .. }));

    auth::logout(&mut state).unwrap();
    let err = auth::login_any(&mut state, &login_form("nobody@campus.edu"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Invalid email or password");
}

#[tokio::test]
async fn test_contact_flow_reports_server_messages() {
    let server = start_server().await;
    let mut state = client(&server, Arc::new(MemoryStorage::new()));
    auth::signup(
        &mut state,
        PrincipalKind::Student,
        &signup_form("alice@campus.edu", "9999999999"),
    )
    .await
    .unwrap();

    let form = ContactForm {
        name: "Mom".into(),
        phone: "1234567890".into(),
    };
    let contact = contacts::add_contact(&state, &form).await.unwrap();

    let err = contacts::add_contact(&state, &form).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.to_string(), "Contact number must be unique.");

    // Rejected locally, before any request.
    let bad = ContactForm {
        name: "Mom".into(),
        phone: "123".into(),
    };
    assert!(matches!(
        contacts::add_contact(&state, &bad).await,
        Err(ClientError::Validation(_))
    ));

    assert_eq!(contacts::my_contacts(&state).await.unwrap().len(), 1);
    assert_eq!(
        contacts::remove_contact(&state, contact.id).await.unwrap(),
        "Emergency contact deleted"
    );
    assert!(contacts::my_contacts(&state).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_incident_and_post_uploads() {
    let server = start_server().await;
    let mut state = client(&server, Arc::new(MemoryStorage::new()));
    auth::signup(
        &mut state,
        PrincipalKind::Student,
        &signup_form("alice@campus.edu", "9999999999"),
    )
    .await
    .unwrap();

    let form = IncidentForm {
        description: "Broken light".into(),
        location: "Car park".into(),
        incident_date: "2024-03-01".into(),
        image: Some(MediaFile::new("light.jpg", b"jpeg".to_vec())),
    };
    let first = incidents::report_incident(&state, &form).await.unwrap();
    let second = incidents::report_incident(&state, &form).await.unwrap();
    assert!(!first.image_path.is_empty());
    assert_ne!(first.image_path, second.image_path);
    assert_eq!(incidents::my_incidents(&state).await.unwrap().len(), 2);

    // Students cannot see the admin review list.
    let err = incidents::all_incidents(&state).await.unwrap_err();
    assert_eq!(err.status(), Some(403));

    let post = posts::add_post(
        &state,
        &PostForm {
            description: "Lost keys".into(),
            media: Some(MediaFile::new("keys.png", b"png".to_vec())),
        },
    )
    .await
    .unwrap();
    assert_eq!(post.author_name, "Alice");

    let media = reqwest::get(state.api.media_url(&post.media_path))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert_eq!(media.as_ref(), b"png");
}

#[tokio::test]
async fn test_safety_alert_round_trip() {
    let server = start_server().await;
    let mut student = client(&server, Arc::new(MemoryStorage::new()));
    auth::signup(
        &mut student,
        PrincipalKind::Student,
        &signup_form("alice@campus.edu", "9999999999"),
    )
    .await
    .unwrap();

    let alert = safety::send_safety_alert(&student).await.unwrap();
    assert_eq!(alert.name, "Alice");
    assert_eq!(alert.phone, "9999999999");
    assert_eq!(alert.location.coordinates, [56.78, 12.34]);

    let mut admin = client(&server, Arc::new(MemoryStorage::new()));
    auth::signup(
        &mut admin,
        PrincipalKind::Admin,
        &signup_form("admin@campus.edu", "8888888888"),
    )
    .await
    .unwrap();

    let details = safety::safety_details(&admin).await.unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(
        details[0].map_link,
        "https://www.google.com/maps/@12.34,56.78,15z"
    );

    let nearby = safety::alerts_near_me(&admin, 5).await.unwrap();
    assert_eq!(nearby.len(), 1);
    assert!(nearby[0].distance_m < 1.0);
}

#[tokio::test]
async fn test_articles_need_admin() {
    let server = start_server().await;
    let mut admin = client(&server, Arc::new(MemoryStorage::new()));
    auth::signup(
        &mut admin,
        PrincipalKind::Admin,
        &signup_form("admin@campus.edu", "8888888888"),
    )
    .await
    .unwrap();

    let form = ArticleForm {
        title: "Night safety".into(),
        description: "Walk in pairs".into(),
        image: Some(MediaFile::new("a.png", b"png".to_vec())),
    };
    let article = articles::add_article(&admin, &form).await.unwrap();

    let edit = ArticleForm {
        title: "Night safety tips".into(),
        image: None,
        ..form
    };
    let edited = articles::edit_article(&admin, article.id, &edit).await.unwrap();
    assert_eq!(edited.title, "Night safety tips");
    assert_eq!(edited.image_path, article.image_path);

    assert_eq!(articles::list_articles(&admin).await.unwrap().len(), 1);
    assert_eq!(
        articles::remove_article(&admin, article.id).await.unwrap(),
        "Article deleted"
    );
}

#[tokio::test]
async fn test_signed_out_actions_fail_locally() {
    let server = start_server().await;
    let state = client(&server, Arc::new(MemoryStorage::new()));
    assert!(matches!(
        helplines::list_helplines(&state).await,
        Err(ClientError::NotSignedIn)
    ));
    assert!(matches!(
        safety::send_safety_alert(&state).await,
        Err(ClientError::NotSignedIn)
    ));
}
