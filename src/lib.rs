//! # SharpAPI resume parser for Rust
//!
//! Async client for the [SharpAPI](https://sharpapi.com) resume parsing
//! endpoint. A resume file is uploaded as a job, then its status URL is polled
//! at a fixed interval until the service returns the parsed JSON, reports a
//! failure, or the configured wait runs out.
//!
//! ## Quick start
//!
//! ```no_run
//! use sharpapi_resume_parser::{ClientConfig, ResumeParserService};
//!
//! #[tokio::main]
//! async fn main() -> sharpapi_resume_parser::Result<()> {
//!     let parser = ResumeParserService::with_config(ClientConfig::new("your_api_key"))?;
//!
//!     let json = parser.parse_resume("resume.pdf", None).await?;
//!     println!("{json}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Builder pattern
//!
//! ```no_run
//! use sharpapi_resume_parser::{ClientBuilder, ResumeParserService};
//!
//! # fn example() -> sharpapi_resume_parser::Result<()> {
//! let client = ClientBuilder::new()
//!     .api_key("your_api_key")
//!     .base_url("https://sharpapi.com/api/v1")
//!     .poll_interval_secs(10)
//!     .poll_max_wait_secs(300)
//!     .build()?;
//! let parser = ResumeParserService::new(client);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod errors;
mod models;
mod resume;

pub use client::{ClientBuilder, SharpApiClient};
pub use config::ClientConfig;
pub use errors::{Result, SharpApiError};
pub use models::{JobHandle, PollResult};
pub use resume::ResumeParserService;
