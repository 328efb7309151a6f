//! Parse a resume end to end.
//!
//! ```sh
//! SHARP_API_KEY=... RUST_LOG=sharpapi_resume_parser=debug \
//!     cargo run --example quickstart -- path/to/resume.pdf German
//! ```
//!
//! The resume is uploaded once. `ResumeParserService::parse_resume` does the
//! same submit-then-wait in a single call.

use sharpapi_resume_parser::{PollResult, ResumeParserService, SharpApiError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> sharpapi_resume_parser::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "resume.pdf".to_string());
    let language = args.next();

    let parser = ResumeParserService::from_env()?;

    // -----------------------------------------------------------------------
    // 1. Submit and peek at the status
    // -----------------------------------------------------------------------
    let handle = parser.submit_resume(&path, language.as_deref()).await?;
    println!("Submitted, status URL: {}", handle.status_url);

    match parser.client().check_status(&handle).await? {
        PollResult::Pending => println!("Still processing..."),
        PollResult::Completed(_) => println!("Already done."),
        PollResult::Failed(reason) => println!("Failed: {reason}"),
    }

    // -----------------------------------------------------------------------
    // 2. Wait for the same job to finish
    // -----------------------------------------------------------------------
    match parser.fetch_results(&handle).await {
        Ok(json) => println!("{json}"),
        Err(SharpApiError::JobFailed { reason }) => eprintln!("parsing failed: {reason}"),
        Err(SharpApiError::Timeout(waited)) => eprintln!("gave up after {waited:?}"),
        Err(e) => return Err(e),
    }

    Ok(())
}
