//! Typed access to the SafeCampus REST API.
//!
//! Every method takes the current [`Session`] explicitly; routes that need a
//! signed-in user fail with `NotSignedIn` before any request is made.

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use safecampus_shared::models::{Account, Article, Contact, Incident, LocationAlert, NearbyAlert, Post};
use safecampus_shared::protocol::{
    AuthResponse, ContactRequest, HealthResponse, LocationRequest, LoginRequest, MessageResponse,
    ServerInfoResponse, SignupRequest, UpdateAccountRequest, UpdateContactRequest,
    ARTICLE_IMAGE_FIELD, INCIDENT_IMAGE_FIELD, POST_MEDIA_FIELD,
};
use safecampus_shared::types::PrincipalKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ClientError, Result};
use crate::forms::{ArticleForm, IncidentForm, MediaFile, PostForm};
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

fn media_part(file: &MediaFile) -> Part {
    Part::bytes(file.bytes.clone()).file_name(file.file_name.clone())
}

fn with_media(form: Form, field: &'static str, file: Option<&MediaFile>) -> Form {
    match file {
        Some(file) if !file.is_empty() => form.part(field, media_part(file)),
        _ => form,
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a stored media path such as `uploads/1700000000000.jpg`.
    pub fn media_url(&self, relative_path: &str) -> String {
        let path = relative_path.replace('\\', "/");
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "api request");
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    fn authed(&self, session: &Session, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = session.require_token()?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        Self::decode(response).await
    }

    /// Turn a response into `T`, or into `ClientError::Api` carrying the
    /// server's message (or a generic one when the body has none).
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response
            .json::<MessageResponse>()
            .await
            .map(|body| body.message)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| ClientError::GENERIC_FAILURE.to_string());

        tracing::debug!(status = status.as_u16(), %message, "api error");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        body: &B,
    ) -> Result<T> {
        self.send(request.json(body)).await
    }

    // ─── Service ───

    pub async fn health(&self) -> Result<HealthResponse> {
        self.send(self.request(Method::GET, "/health")).await
    }

    pub async fn server_info(&self) -> Result<ServerInfoResponse> {
        self.send(self.request(Method::GET, "/info")).await
    }

    // ─── Accounts ───

    pub async fn signup(&self, kind: PrincipalKind, req: &SignupRequest) -> Result<AuthResponse> {
        let path = format!("/api/accounts/{kind}/signup");
        self.send_json(self.request(Method::POST, &path), req).await
    }

    pub async fn login(&self, kind: PrincipalKind, req: &LoginRequest) -> Result<AuthResponse> {
        let path = format!("/api/accounts/{kind}/login");
        self.send_json(self.request(Method::POST, &path), req).await
    }

    pub async fn list_accounts(&self, session: &Session, kind: PrincipalKind) -> Result<Vec<Account>> {
        let path = format!("/api/accounts/{kind}");
        self.send(self.authed(session, Method::GET, &path)?).await
    }

    pub async fn get_account(&self, session: &Session, kind: PrincipalKind, id: Uuid) -> Result<Account> {
        let path = format!("/api/accounts/{kind}/{id}");
        self.send(self.authed(session, Method::GET, &path)?).await
    }

    pub async fn update_account(
        &self,
        session: &Session,
        kind: PrincipalKind,
        id: Uuid,
        req: &UpdateAccountRequest,
    ) -> Result<Account> {
        let path = format!("/api/accounts/{kind}/{id}");
        self.send_json(self.authed(session, Method::PUT, &path)?, req).await
    }

    // ─── Emergency contacts ───

    pub async fn create_contact(&self, session: &Session, req: &ContactRequest) -> Result<Contact> {
        self.send_json(self.authed(session, Method::POST, "/api/contacts")?, req)
            .await
    }

    pub async fn list_contacts(&self, session: &Session) -> Result<Vec<Contact>> {
        self.send(self.authed(session, Method::GET, "/api/contacts")?).await
    }

    pub async fn list_contacts_by_owner(&self, session: &Session, owner_id: &str) -> Result<Vec<Contact>> {
        let path = format!("/api/contacts/owner/{owner_id}");
        self.send(self.authed(session, Method::GET, &path)?).await
    }

    pub async fn get_contact(&self, session: &Session, id: Uuid) -> Result<Contact> {
        let path = format!("/api/contacts/{id}");
        self.send(self.authed(session, Method::GET, &path)?).await
    }

    pub async fn update_contact(
        &self,
        session: &Session,
        id: Uuid,
        req: &UpdateContactRequest,
    ) -> Result<Contact> {
        let path = format!("/api/contacts/{id}");
        self.send_json(self.authed(session, Method::PUT, &path)?, req).await
    }

    pub async fn delete_contact(&self, session: &Session, id: Uuid) -> Result<MessageResponse> {
        let path = format!("/api/contacts/{id}");
        self.send(self.authed(session, Method::DELETE, &path)?).await
    }

    // ─── Helplines ───

    pub async fn create_helpline(&self, session: &Session, req: &ContactRequest) -> Result<Contact> {
        self.send_json(self.authed(session, Method::POST, "/api/helplines")?, req)
            .await
    }

    pub async fn list_helplines(&self, session: &Session) -> Result<Vec<Contact>> {
        self.send(self.authed(session, Method::GET, "/api/helplines")?).await
    }

    pub async fn get_helpline(&self, session: &Session, id: Uuid) -> Result<Contact> {
        let path = format!("/api/helplines/{id}");
        self.send(self.authed(session, Method::GET, &path)?).await
    }

    pub async fn update_helpline(
        &self,
        session: &Session,
        id: Uuid,
        req: &UpdateContactRequest,
    ) -> Result<Contact> {
        let path = format!("/api/helplines/{id}");
        self.send_json(self.authed(session, Method::PUT, &path)?, req).await
    }

    pub async fn delete_helpline(&self, session: &Session, id: Uuid) -> Result<MessageResponse> {
        let path = format!("/api/helplines/{id}");
        self.send(self.authed(session, Method::DELETE, &path)?).await
    }

    // ─── Incidents ───

    fn incident_form(form: &IncidentForm) -> Form {
        let multipart = Form::new()
            .text("description", form.description.trim().to_string())
            .text("location", form.location.trim().to_string())
            .text("incidentDate", form.incident_date.trim().to_string());
        with_media(multipart, INCIDENT_IMAGE_FIELD, form.image.as_ref())
    }

    pub async fn create_incident(&self, session: &Session, form: &IncidentForm) -> Result<Incident> {
        let request = self.authed(session, Method::POST, "/api/incidents")?;
        self.send(request.multipart(Self::incident_form(form))).await
    }

    pub async fn list_incidents(&self, session: &Session) -> Result<Vec<Incident>> {
        self.send(self.authed(session, Method::GET, "/api/incidents")?).await
    }

    pub async fn list_incidents_by_reporter(&self, session: &Session, reporter: &str) -> Result<Vec<Incident>> {
        let path = format!("/api/incidents/reporter/{reporter}");
        self.send(self.authed(session, Method::GET, &path)?).await
    }

    pub async fn get_incident(&self, session: &Session, id: Uuid) -> Result<Incident> {
        let path = format!("/api/incidents/{id}");
        self.send(self.authed(session, Method::GET, &path)?).await
    }

    /// Blank text fields and a missing image keep the stored values.
    pub async fn update_incident(&self, session: &Session, id: Uuid, form: &IncidentForm) -> Result<Incident> {
        let path = format!("/api/incidents/{id}");
        let request = self.authed(session, Method::PUT, &path)?;
        self.send(request.multipart(Self::incident_form(form))).await
    }

    pub async fn delete_incident(&self, session: &Session, id: Uuid) -> Result<MessageResponse> {
        let path = format!("/api/incidents/{id}");
        self.send(self.authed(session, Method::DELETE, &path)?).await
    }

    // ─── Posts ───

    fn post_form(form: &PostForm) -> Form {
        let multipart = Form::new().text("description", form.description.trim().to_string());
        with_media(multipart, POST_MEDIA_FIELD, form.media.as_ref())
    }

    pub async fn create_post(&self, session: &Session, form: &PostForm) -> Result<Post> {
        let request = self.authed(session, Method::POST, "/api/posts")?;
        self.send(request.multipart(Self::post_form(form))).await
    }

    pub async fn list_posts(&self, session: &Session) -> Result<Vec<Post>> {
        self.send(self.authed(session, Method::GET, "/api/posts")?).await
    }

    pub async fn list_posts_by_author(&self, session: &Session, author_id: &str) -> Result<Vec<Post>> {
        let path = format!("/api/posts/author/{author_id}");
        self.send(self.authed(session, Method::GET, &path)?).await
    }

    pub async fn get_post(&self, session: &Session, id: Uuid) -> Result<Post> {
        let path = format!("/api/posts/{id}");
        self.send(self.authed(session, Method::GET, &path)?).await
    }

    pub async fn update_post(&self, session: &Session, id: Uuid, form: &PostForm) -> Result<Post> {
        let path = format!("/api/posts/{id}");
        let request = self.authed(session, Method::PUT, &path)?;
        self.send(request.multipart(Self::post_form(form))).await
    }

    pub async fn delete_post(&self, session: &Session, id: Uuid) -> Result<MessageResponse> {
        let path = format!("/api/posts/{id}");
        self.send(self.authed(session, Method::DELETE, &path)?).await
    }

    // ─── Articles ───

    fn article_form(form: &ArticleForm) -> Form {
        let multipart = Form::new()
            .text("title", form.title.trim().to_string())
            .text("description", form.description.trim().to_string());
        with_media(multipart, ARTICLE_IMAGE_FIELD, form.image.as_ref())
    }

    pub async fn create_article(&self, session: &Session, form: &ArticleForm) -> Result<Article> {
        let request = self.authed(session, Method::POST, "/api/articles")?;
        self.send(request.multipart(Self::article_form(form))).await
    }

    pub async fn list_articles(&self, session: &Session) -> Result<Vec<Article>> {
        self.send(self.authed(session, Method::GET, "/api/articles")?).await
    }

    pub async fn list_articles_by_author(&self, session: &Session, author_id: &str) -> Result<Vec<Article>> {
        let path = format!("/api/articles/author/{author_id}");
        self.send(self.authed(session, Method::GET, &path)?).await
    }

    pub async fn get_article(&self, session: &Session, id: Uuid) -> Result<Article> {
        let path = format!("/api/articles/{id}");
        self.send(self.authed(session, Method::GET, &path)?).await
    }

    pub async fn update_article(&self, session: &Session, id: Uuid, form: &ArticleForm) -> Result<Article> {
        let path = format!("/api/articles/{id}");
        let request = self.authed(session, Method::PUT, &path)?;
        self.send(request.multipart(Self::article_form(form))).await
    }

    pub async fn delete_article(&self, session: &Session, id: Uuid) -> Result<MessageResponse> {
        let path = format!("/api/articles/{id}");
        self.send(self.authed(session, Method::DELETE, &path)?).await
    }

    // ─── Location alerts ───

    pub async fn record_location(&self, session: &Session, req: &LocationRequest) -> Result<LocationAlert> {
        self.send_json(self.authed(session, Method::POST, "/api/locations")?, req)
            .await
    }

    pub async fn list_locations(&self, session: &Session) -> Result<Vec<LocationAlert>> {
        self.send(self.authed(session, Method::GET, "/api/locations")?).await
    }

    pub async fn nearest_locations(
        &self,
        session: &Session,
        latitude: f64,
        longitude: f64,
        limit: usize,
    ) -> Result<Vec<NearbyAlert>> {
        let request = self
            .authed(session, Method::GET, "/api/locations/nearest")?
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("limit", limit.to_string()),
            ]);
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_url() {
        let api = ApiClient::new("http://localhost:3000/");
        assert_eq!(api.base_url(), "http://localhost:3000");
        assert_eq!(
            api.media_url("uploads/1700000000000.jpg"),
            "http://localhost:3000/uploads/1700000000000.jpg"
        );
        assert_eq!(
            api.media_url("uploads\\1700000000000.jpg"),
            "http://localhost:3000/uploads/1700000000000.jpg"
        );
    }

    #[tokio::test]
    async fn test_signed_out_requests_fail_locally() {
        // Port 9 is never contacted: the session check fails first.
        let api = ApiClient::new("http://127.0.0.1:9");
        let err = api.list_helplines(&Session::Anonymous).await.unwrap_err();
        assert!(matches!(err, ClientError::NotSignedIn));
    }
}
