// src/api/client.rs
// =============================================================================
// The real HTTP implementation of the business API, built on reqwest.
//
// Endpoints (relative to the base URL, e.g. https://mylink.asia/api/):
//   GET    businesses/              owner's businesses (dashboard)
//   POST   businesses/              create
//   GET    businesses/<path>/       fetch one (also used as the path probe)
//   PUT    businesses/<path>/       full replace of scalars + links
//   PATCH  businesses/<path>/       multipart logo upload / removal
//   GET    public/<path>/           visitor-facing read, no auth
//   POST   auth/otp/                send a login code by SMS
//   POST   auth/login/              exchange phone + code for a token
//
// The auth token comes from the Session handed to `HttpApi::new`; call sites
// never look it up themselves.
//
// Rust concepts:
// - #[async_trait]: async methods on a trait object
// - reqwest multipart::Form for the logo, .json() for everything else
// - Url::path_segments_mut: percent-encodes every segment
// =============================================================================

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::error::{classify, ApiError};
use super::types::{LogoChange, Profile, ProfilePayload};
use super::BusinessApi;
use crate::session::Session;

/// Where the hosted service lives.
pub const DEFAULT_BASE_URL: &str = "https://mylink.asia/api/";

/// reqwest-backed client for the business API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
    token: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

impl HttpApi {
    /// Builds a client for `base_url`, authenticated with the session's token
    /// if there is one.
    pub fn new(base_url: &str, session: &Session) -> Result<Self, ApiError> {
        let mut base =
            Url::parse(base_url).map_err(|e| ApiError::BaseUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(base_url.to_string()));
        }
        // Url::join and path_segments_mut both want a trailing slash on the base
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(HttpApi {
            client,
            base,
            token: session.token.clone(),
        })
    }

    /// POST auth/otp/: asks the server to text a login code to `phone`.
    pub async fn request_login_code(&self, phone: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "phone_number": phone });
        let response = self
            .json_request(Method::POST, &["auth", "otp"], &body)?
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// POST auth/login/: trades the texted code for an auth token.
    pub async fn verify_login_code(&self, phone: &str, code: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({ "phone_number": phone, "code": code });
        let response = self
            .json_request(Method::POST, &["auth", "login"], &body)?
            .send()
            .await?;
        let token: TokenResponse = read_json(response).await?;
        Ok(token.token)
    }

    // Builds <base>/<segments...>/ with each segment percent-encoded, so a
    // path candidate can never escape into the query string.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::BaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "api request");

        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.header(reqwest::header::AUTHORIZATION, format!("Token {}", token));
        }
        Ok(builder)
    }

    fn json_request<T: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &T,
    ) -> Result<RequestBuilder, ApiError> {
        Ok(self.request(method, segments)?.json(body))
    }

    // PATCH businesses/<path>/ as multipart/form-data. The logo cannot ride
    // along with the JSON save request.
    //
    // Parameters:
    //   path   - where the business lives after the profile request
    //   change - `logo_upload` file part, or `logo_remove=true`
    fn logo_request(&self, path: &str, change: &LogoChange) -> Result<RequestBuilder, ApiError> {
        let form = match change {
            LogoChange::Upload(file) => {
                let part = Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(file.mime)?;
                Form::new().part("logo_upload", part)
            }
            LogoChange::Remove => Form::new().text("logo_remove", "true"),
        };

        Ok(self.request(Method::PATCH, &["businesses", path])?.multipart(form))
    }
}

#[async_trait]
impl BusinessApi for HttpApi {
    async fn business_by_path(&self, path: &str) -> Result<Profile, ApiError> {
        let response = self.request(Method::GET, &["businesses", path])?.send().await?;
        read_json(response).await
    }

    async fn create_business(&self, payload: &ProfilePayload) -> Result<Profile, ApiError> {
        let response = self
            .json_request(Method::POST, &["businesses"], payload)?
            .send()
            .await?;
        read_json(response).await
    }

    async fn replace_business(
        &self,
        path: &str,
        payload: &ProfilePayload,
    ) -> Result<Profile, ApiError> {
        let response = self
            .json_request(Method::PUT, &["businesses", path], payload)?
            .send()
            .await?;
        read_json(response).await
    }

    async fn update_business_asset(
        &self,
        path: &str,
        change: &LogoChange,
    ) -> Result<Profile, ApiError> {
        let response = self.logo_request(path, change)?.send().await?;
        read_json(response).await
    }

    async fn list_businesses(&self) -> Result<Vec<Profile>, ApiError> {
        let response = self.request(Method::GET, &["businesses"])?.send().await?;
        read_json(response).await
    }

    async fn public_business(&self, path: &str) -> Result<Profile, ApiError> {
        let response = self.request(Method::GET, &["public", path])?.send().await?;
        read_json(response).await
    }
}

// Passes successful responses through; turns everything else into ApiError
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // An unreadable body still gets classified by status alone
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(status = status.as_u16(), error = %e, "could not read api error body");
            String::new()
        }
    };
    debug!(status = status.as_u16(), %body, "api error response");
    Err(classify(status, &body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check(response).await?;
    Ok(response.json::<T>().await?)
}
