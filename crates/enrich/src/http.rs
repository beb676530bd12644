use std::time::Duration;

use crate::EnrichError;

const MAX_ERROR_BODY: usize = 512;

pub(crate) fn build_client(timeout_secs: u64) -> Result<reqwest::Client, EnrichError> {
    let timeout = Duration::from_secs(timeout_secs.max(1));
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .build()
        .map_err(|e| EnrichError::InvalidConfig(format!("failed to build HTTP client: {e}")))
}

/// Turn a non-success response into [`EnrichError::Status`], keeping at most
/// [`MAX_ERROR_BODY`] bytes of the body.
pub(crate) async fn status_error(response: reqwest::Response) -> EnrichError {
    let status = response.status().as_u16();
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    EnrichError::Status { status, body }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
