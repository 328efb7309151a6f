use std::path::Path;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, ENV_API_KEY};
use crate::errors::{Result, SharpApiError};
use crate::models::{error_message, poll_result_from_value, JobHandle, PollResult, SubmitResponse};

/// Builder for a [`SharpApiClient`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// use sharpapi_resume_parser::ClientBuilder;
///
/// # fn example() -> sharpapi_resume_parser::Result<()> {
/// let client = ClientBuilder::new()
///     .api_key("your_api_key")
///     .poll_interval_secs(10)
///     .poll_max_wait_secs(300)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_key: Option<String>,
    config: ClientConfig,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            api_key: None,
            config: ClientConfig::new(String::new()),
        }
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the base URL (defaults to `https://sharpapi.com/api/v1`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Seconds between status checks (defaults to 5).
    pub fn poll_interval_secs(mut self, secs: u64) -> Self {
        self.config.poll_interval_secs = secs;
        self
    }

    /// Ceiling on the polling phase in seconds (defaults to 180).
    pub fn poll_max_wait_secs(mut self, secs: u64) -> Self {
        self.config.poll_max_wait_secs = secs;
        self
    }

    /// Override the `User-Agent` header.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Timeout for each HTTP request in seconds (defaults to 60).
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    /// Build the [`SharpApiClient`].
    ///
    /// If no API key was set via [`api_key`](Self::api_key), the builder will
    /// attempt to read the `SHARP_API_KEY` environment variable.
    ///
    /// Returns [`SharpApiError::Configuration`] if no usable key is available
    /// or the polling bounds are inconsistent.
    pub fn build(self) -> Result<SharpApiClient> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var(ENV_API_KEY).ok())
            .ok_or_else(|| {
                SharpApiError::config(
                    "API key is required. Pass it to ClientBuilder::api_key() \
                     or set the SHARP_API_KEY environment variable.",
                )
            })?;

        SharpApiClient::new(ClientConfig {
            api_key,
            ..self.config
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Generic SharpAPI job client: submits multipart jobs and polls their
/// status URL until a terminal state.
///
/// Cloning is cheap and clones share one connection pool.
#[derive(Clone, Debug)]
pub struct SharpApiClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl SharpApiClient {
    /// Validate `config` and build a client from it.
    ///
    /// Fails immediately with [`SharpApiError::Configuration`] on an empty API
    /// key; no request is ever attempted with an invalid configuration.
    pub fn new(mut config: ClientConfig) -> Result<Self> {
        config.validate()?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| SharpApiError::config("API key contains characters not allowed in a header"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|_| SharpApiError::config("user agent is not a valid header value"))?,
        );

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(SharpApiError::Http)?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Upload `path` to `endpoint` together with the given form fields and
    /// return the handle of the created job.
    ///
    /// The file is read before anything is sent, so a missing file fails with
    /// [`SharpApiError::Io`] without touching the network. Fields whose value
    /// is `None` are left out of the form.
    pub async fn submit(
        &self,
        endpoint: &str,
        path: impl AsRef<Path>,
        fields: &[(&str, Option<&str>)],
    ) -> Result<JobHandle> {
        let path = path.as_ref();
        let file_bytes = tokio::fs::read(path).await.map_err(SharpApiError::Io)?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());

        let mut part = Part::bytes(file_bytes).file_name(file_name.clone());
        if let Some(mime) = mime_for(path) {
            part = part.mime_str(mime).map_err(SharpApiError::Http)?;
        }

        let mut form = Form::new().part("file", part);
        for (name, value) in fields {
            if let Some(value) = value {
                form = form.text(name.to_string(), value.to_string());
            }
        }

        let url = format!("{}{}", self.config.base_url, endpoint);
        debug!(%url, file = %file_name, "submitting job");

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(SharpApiError::Http)?;

        let resp: SubmitResponse = read_json(response).await?;
        let handle = resp.into_handle()?;

        info!(status_url = %handle.status_url, job_id = ?handle.job_id, "job submitted");
        Ok(handle)
    }

    /// Query the job status once, without waiting.
    pub async fn check_status(&self, handle: &JobHandle) -> Result<PollResult> {
        self.fetch_status(handle).await.map(|(result, _)| result)
    }

    /// Poll the job until it completes, fails, or the configured max wait
    /// elapses.
    ///
    /// Returns the result payload as a JSON string.
    ///
    /// # Errors
    ///
    /// - [`SharpApiError::JobFailed`] if the service reports the job failed.
    /// - [`SharpApiError::Timeout`] if no terminal status is seen in time.
    /// - Transport errors from any status request, unretried.
    pub async fn poll(&self, handle: &JobHandle) -> Result<String> {
        let max_wait = self.config.poll_max_wait();
        let deadline = Instant::now().checked_add(max_wait).ok_or_else(|| {
            SharpApiError::config(format!("poll max wait {max_wait:?} is out of range"))
        })?;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let (result, retry_after) = self.fetch_status(handle).await?;
            debug!(status_url = %handle.status_url, attempt, ?result, "polled job status");

            match result {
                PollResult::Completed(payload) => {
                    info!(status_url = %handle.status_url, attempt, "job completed");
                    return Ok(payload);
                }
                PollResult::Failed(reason) => {
                    warn!(status_url = %handle.status_url, %reason, "job failed");
                    return Err(SharpApiError::JobFailed { reason });
                }
                PollResult::Pending => {}
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!(status_url = %handle.status_url, attempt, "job polling timed out");
                return Err(SharpApiError::Timeout(max_wait));
            }

            // Retry-After never stretches the wait past the deadline.
            let wait = retry_after.unwrap_or_else(|| self.config.poll_interval());
            tokio::time::sleep(wait.min(remaining)).await;
        }
    }

    /// One GET of the status URL, plus any `Retry-After` hint it carried.
    async fn fetch_status(&self, handle: &JobHandle) -> Result<(PollResult, Option<Duration>)> {
        let response = self
            .http
            .get(&handle.status_url)
            .send()
            .await
            .map_err(SharpApiError::Http)?;

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let body: serde_json::Value = read_json(response).await?;
        Ok((poll_result_from_value(body)?, retry_after))
    }
}

/// Deserialize a 2xx body or map the failure status to a typed error.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        return response.json().await.map_err(SharpApiError::Http);
    }

    let status_code = status.as_u16();
    let response_text = response.text().await.unwrap_or_default();
    let parsed_body: Option<serde_json::Value> = serde_json::from_str(&response_text).ok();
    let message = error_message(parsed_body.as_ref(), &response_text);

    Err(match status_code {
        401 => SharpApiError::Authentication { message },
        _ => SharpApiError::Api {
            status_code,
            message,
            body: parsed_body,
        },
    })
}

/// MIME type for the document formats the resume endpoint accepts.
fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "txt" => Some("text/plain"),
        "rtf" => Some("application/rtf"),
        _ => None,
    }
}
