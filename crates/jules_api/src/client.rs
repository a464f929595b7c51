use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::JulesApiConfig;
use crate::error::{parse_error_message, JulesApiError};
use crate::headers::{build_headers, HEADER_API_KEY};
use crate::model::{Activity, ActivityPage, Session, SessionPage, Source, SourcePage};
use crate::payload::{ApprovePlanRequest, CreateSessionRequest, SendMessageRequest};
use crate::url::{normalize_base_url, resource_url};

/// Stateless client bound to one API key and endpoint.
///
/// Construct one explicitly and pass it to the code that needs it; cloning is
/// cheap because the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct JulesApiClient {
    http: Client,
    config: JulesApiConfig,
    headers: HeaderMap,
}

impl JulesApiClient {
    pub fn new(config: JulesApiConfig) -> Result<Self, JulesApiError> {
        let base_url = normalize_base_url(&config.base_url);
        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|error| JulesApiError::InvalidBaseUrl(format!("{base_url}: {error}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(JulesApiError::InvalidBaseUrl(base_url));
        }

        let headers = header_map(&config)?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            config,
            headers,
        })
    }

    pub fn config(&self) -> &JulesApiConfig {
        &self.config
    }

    /// Absolute URL for a resource path under the configured version prefix.
    pub fn endpoint(&self, resource_path: &str) -> String {
        resource_url(
            &self.config.base_url,
            &self.config.api_version,
            resource_path,
        )
    }

    /// Request builder with auth and content headers attached.
    pub fn build_request(&self, method: Method, resource_path: &str) -> RequestBuilder {
        self.http
            .request(method, self.endpoint(resource_path))
            .headers(self.headers.clone())
    }

    pub async fn list_sessions(&self) -> Result<Vec<Session>, JulesApiError> {
        let page: SessionPage = self.get_json("sessions", "session list").await?;
        Ok(page.sessions)
    }

    pub async fn list_sources(&self) -> Result<Vec<Source>, JulesApiError> {
        let page: SourcePage = self.get_json("sources", "source list").await?;
        Ok(page.sources)
    }

    pub async fn get_session(&self, session_name: &str) -> Result<Session, JulesApiError> {
        let session_name = require_non_empty(session_name, "session name")?;
        self.get_json(session_name, "session").await
    }

    pub async fn list_activities(&self, session_name: &str) -> Result<Vec<Activity>, JulesApiError> {
        let session_name = require_non_empty(session_name, "session name")?;
        let page: ActivityPage = self
            .get_json(&format!("{session_name}/activities"), "activity list")
            .await?;
        Ok(page.activities)
    }

    pub async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<Session, JulesApiError> {
        require_non_empty(&request.prompt, "prompt")?;
        require_non_empty(&request.source_context.source, "source")?;

        let body = self
            .send(self.build_request(Method::POST, "sessions").json(request))
            .await?;
        decode(&body, "created session")
    }

    pub async fn send_message(&self, session_name: &str, message: &str) -> Result<(), JulesApiError> {
        let session_name = require_non_empty(session_name, "session name")?;
        require_non_empty(message, "message")?;

        let request = SendMessageRequest::new(message);
        self.send(
            self.build_request(Method::POST, &format!("{session_name}:sendMessage"))
                .json(&request),
        )
        .await?;
        Ok(())
    }

    pub async fn approve_plan(&self, session_name: &str) -> Result<(), JulesApiError> {
        let session_name = require_non_empty(session_name, "session name")?;

        self.send(
            self.build_request(Method::POST, &format!("{session_name}:approvePlan"))
                .json(&ApprovePlanRequest::default()),
        )
        .await?;
        Ok(())
    }

    async fn get_json<T>(&self, resource_path: &str, context: &'static str) -> Result<T, JulesApiError>
    where
        T: DeserializeOwned,
    {
        let body = self
            .send(self.build_request(Method::GET, resource_path))
            .await?;
        decode(&body, context)
    }

    /// One round trip. Non-2xx responses become [`JulesApiError::Status`].
    async fn send(&self, request: RequestBuilder) -> Result<String, JulesApiError> {
        let request = request.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_owned();
        tracing::debug!(%method, %path, "jules api request");

        let response = self.http.execute(request).await.map_err(|error| {
            tracing::warn!(%method, %path, %error, "jules api transport failure");
            JulesApiError::from(error)
        })?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            tracing::debug!(%method, %path, status = status.as_u16(), "jules api response");
            return Ok(body);
        }

        let message = parse_error_message(status, &body);
        tracing::warn!(%method, %path, status = status.as_u16(), %message, "jules api request failed");
        Err(JulesApiError::Status { status, message })
    }
}

fn header_map(config: &JulesApiConfig) -> Result<HeaderMap, JulesApiError> {
    let headers = build_headers(config, None)?;
    let mut out = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| JulesApiError::InvalidHeader { name: key.clone() })?;
        let mut value = HeaderValue::from_str(&value)
            .map_err(|_| JulesApiError::InvalidHeader { name: key.clone() })?;
        if name.as_str() == HEADER_API_KEY {
            value.set_sensitive(true);
        }
        out.insert(name, value);
    }
    Ok(out)
}

fn decode<T>(body: &str, context: &'static str) -> Result<T, JulesApiError>
where
    T: DeserializeOwned,
{
    // Some endpoints answer with an empty body; treat it like `{}`.
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|source| JulesApiError::Decode { context, source })
}

fn require_non_empty<'a>(value: &'a str, field: &'static str) -> Result<&'a str, JulesApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(JulesApiError::EmptyField { field })
    } else {
        Ok(trimmed)
    }
}
