use std::path::Path;

use crate::client::SharpApiClient;
use crate::config::ClientConfig;
use crate::errors::Result;
use crate::models::JobHandle;

const PARSE_RESUME_ENDPOINT: &str = "/hr/parse_resume";

/// Resume (CV) parsing on top of a [`SharpApiClient`].
///
/// Accepts PDF, DOC, DOCX, TXT and RTF files and yields the service's JSON
/// document of extracted data points.
///
/// # Example
///
/// ```no_run
/// use sharpapi_resume_parser::ResumeParserService;
///
/// # async fn example() -> sharpapi_resume_parser::Result<()> {
/// let parser = ResumeParserService::from_env()?;
/// let json = parser.parse_resume("cv.pdf", Some("German")).await?;
/// println!("{json}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ResumeParserService {
    client: SharpApiClient,
}

impl ResumeParserService {
    /// Compose the service over an existing job client.
    pub fn new(client: SharpApiClient) -> Self {
        Self { client }
    }

    /// Build a service from an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        SharpApiClient::new(config).map(Self::new)
    }

    /// Build a service from `SHARP_API_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// The underlying job client.
    pub fn client(&self) -> &SharpApiClient {
        &self.client
    }

    /// Upload a resume and wait for the parsed result.
    ///
    /// `language` is sent as-is; with `None` the service assumes `English`.
    pub async fn parse_resume(
        &self,
        path: impl AsRef<Path>,
        language: Option<&str>,
    ) -> Result<String> {
        let handle = self.submit_resume(path, language).await?;
        self.fetch_results(&handle).await
    }

    /// Upload a resume and return as soon as the job is queued.
    pub async fn submit_resume(
        &self,
        path: impl AsRef<Path>,
        language: Option<&str>,
    ) -> Result<JobHandle> {
        self.client
            .submit(PARSE_RESUME_ENDPOINT, path, &[("language", language)])
            .await
    }

    /// Wait for a previously submitted job and return its JSON result.
    pub async fn fetch_results(&self, handle: &JobHandle) -> Result<String> {
        self.client.poll(handle).await
    }
}
