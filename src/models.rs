use serde::Deserialize;
use serde_json::Value;

use crate::errors::{Result, SharpApiError};

/// Handle to a submitted job. Only meaningful for polling that one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    /// URL to GET for the job's status.
    pub status_url: String,
    /// Server-assigned job id, when the submission response includes one.
    pub job_id: Option<String>,
}

impl JobHandle {
    /// Wrap a status URL obtained elsewhere, e.g. from an earlier process.
    pub fn new(status_url: impl Into<String>) -> Self {
        Self {
            status_url: status_url.into(),
            job_id: None,
        }
    }
}

/// Outcome of a single status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    Pending,
    /// Result payload, serialized as JSON.
    Completed(String),
    /// Remote-provided failure reason.
    Failed(String),
}

impl PollResult {
    /// Completed or Failed.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollResult::Pending)
    }
}

/// POST /hr/parse_resume response.
#[derive(Deserialize)]
pub(crate) struct SubmitResponse {
    pub status_url: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
}

impl SubmitResponse {
    pub(crate) fn into_handle(self) -> Result<JobHandle> {
        let status_url = self
            .status_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                SharpApiError::InvalidResponse("submission response has no status_url".into())
            })?;

        Ok(JobHandle {
            status_url,
            job_id: self.job_id,
        })
    }
}

/// Interpret a status response body.
///
/// Accepts both the JSON:API envelope (`data.attributes.status`) and a flat
/// object carrying `status` at the top level. A top-level `status` wins, so a
/// flat payload with its own `attributes` key is not mistaken for an envelope.
pub(crate) fn poll_result_from_value(val: Value) -> Result<PollResult> {
    let attrs = match val.pointer("/data/attributes") {
        Some(a) if a.is_object() && val.get("status").is_none() => a.clone(),
        _ => val,
    };

    let status = attrs
        .get("status")
        .and_then(|s| s.as_str())
        .ok_or_else(|| SharpApiError::InvalidResponse("status response has no status field".into()))?
        .to_ascii_lowercase();

    match status.as_str() {
        "success" | "completed" => {
            let payload = attrs
                .get("result")
                .or_else(|| attrs.get("data"))
                .filter(|p| !p.is_null())
                .ok_or_else(|| {
                    SharpApiError::InvalidResponse("completed job has no result payload".into())
                })?;
            Ok(PollResult::Completed(payload.to_string()))
        }
        "failed" | "error" => Ok(PollResult::Failed(failure_reason(&attrs))),
        _ => Ok(PollResult::Pending),
    }
}

/// Best human-readable reason from a failed job body.
fn failure_reason(attrs: &Value) -> String {
    ["message", "error", "result"]
        .iter()
        .filter_map(|key| attrs.get(*key))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Object(o) => o
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
            _ => None,
        })
        .unwrap_or_else(|| "remote job failed without a reason".to_string())
}

/// Pull an error message out of a non-2xx body, or fall back to the raw text.
pub(crate) fn error_message(body: Option<&Value>, raw: &str) -> String {
    body.and_then(|b| b.get("message").or_else(|| b.get("error")))
        .and_then(|m| m.as_str())
        .unwrap_or(raw)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pending_statuses() {
        for status in ["pending", "processing", "new", "queued"] {
            let res = poll_result_from_value(json!({ "status": status })).unwrap();
            assert_eq!(res, PollResult::Pending, "status {status}");
        }
    }

    #[test]
    fn flat_completed_uses_data_field() {
        let res = poll_result_from_value(json!({
            "status": "completed",
            "data": { "candidate_name": "Jane Doe" }
        }))
        .unwrap();
        assert_eq!(
            res,
            PollResult::Completed(r#"{"candidate_name":"Jane Doe"}"#.to_string())
        );
    }

    #[test]
    fn flat_payload_with_attributes_key_is_not_an_envelope() {
        let res = poll_result_from_value(json!({
            "status": "completed",
            "data": { "attributes": { "skills": ["rust"] } }
        }))
        .unwrap();
        assert_eq!(
            res,
            PollResult::Completed(r#"{"attributes":{"skills":["rust"]}}"#.to_string())
        );
    }

    #[test]
    fn json_api_success_uses_result_field() {
        let res = poll_result_from_value(json!({
            "data": {
                "type": "api_job",
                "id": "abc",
                "attributes": {
                    "status": "success",
                    "type": "hr_parse_resume",
                    "result": { "positions": [] }
                }
            }
        }))
        .unwrap();
        assert_eq!(res, PollResult::Completed(r#"{"positions":[]}"#.to_string()));
    }

    #[test]
    fn failure_reason_prefers_message() {
        let res = poll_result_from_value(json!({
            "status": "failed",
            "message": "bad file",
            "error": "ignored"
        }))
        .unwrap();
        assert_eq!(res, PollResult::Failed("bad file".to_string()));
    }

    #[test]
    fn failure_reason_from_nested_result() {
        let res = poll_result_from_value(json!({
            "data": { "attributes": {
                "status": "failed",
                "result": { "message": "unsupported format" }
            }}
        }))
        .unwrap();
        assert_eq!(res, PollResult::Failed("unsupported format".to_string()));
    }

    #[test]
    fn missing_status_is_invalid() {
        let err = poll_result_from_value(json!({ "data": {} })).unwrap_err();
        assert!(matches!(err, SharpApiError::InvalidResponse(_)));
    }

    #[test]
    fn completed_without_payload_is_invalid() {
        let err = poll_result_from_value(json!({ "status": "success" })).unwrap_err();
        assert!(matches!(err, SharpApiError::InvalidResponse(_)));
    }

    #[test]
    fn submit_response_requires_status_url() {
        let resp: SubmitResponse = serde_json::from_value(json!({ "job_id": "1" })).unwrap();
        assert!(resp.into_handle().is_err());

        let resp: SubmitResponse = serde_json::from_value(json!({
            "status_url": "https://sharpapi.com/api/v1/job/status/1",
            "job_id": "1"
        }))
        .unwrap();
        let handle = resp.into_handle().unwrap();
        assert_eq!(handle.job_id.as_deref(), Some("1"));
    }
}
