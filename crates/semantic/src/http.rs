use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use crate::SemanticError;

/// Longest provider error body we keep in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Pooled client with a per-request timeout. Timeouts surface as
/// [`SemanticError::Timeout`].
pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, SemanticError> {
    let timeout = Duration::from_secs(timeout_secs.max(1));
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .pool_max_idle_per_host(32)
        .build()
        .map_err(|e| SemanticError::InvalidConfig(format!("failed to build HTTP client: {e}")))
}

/// POST `payload` as JSON and decode the JSON answer.
pub(crate) async fn post_json(
    client: &reqwest::Client,
    url: &str,
    auth_header: Option<&str>,
    payload: &Value,
) -> Result<Value, SemanticError> {
    let mut request = client.post(url).json(payload);
    if let Some(header) = auth_header {
        request = request.header(AUTHORIZATION, header);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|&i| body.is_char_boundary(i))
                .unwrap_or(0);
            body.truncate(cut);
        }
        return Err(SemanticError::Status {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| SemanticError::MalformedResponse(format!("invalid JSON response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_with_zero_timeout_clamped() {
        assert!(build_client(0).is_ok());
        assert!(build_client(30).is_ok());
    }
}
