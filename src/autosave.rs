use serde::Deserialize;
use std::time::Duration;

pub const CSRF_HEADER: &str = "X-CSRFToken";

pub const SAVED_MESSAGE: &str = "Auto-saved successfully";
pub const FAILED_MESSAGE: &str = "Auto-save failed";

/// The application-level shape of a save response: anything without a true
/// `success` flag counts as a rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub success: bool,
}

/// Seam between the change handler and the network. Production uses the
/// blocking HTTP client; tests script outcomes without sockets.
pub trait SaveTransport {
    fn post_form(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
        csrf_token: Option<&str>,
    ) -> anyhow::Result<SaveResponse>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> HttpTransport {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        HttpTransport { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        HttpTransport::new()
    }
}

impl SaveTransport for HttpTransport {
    fn post_form(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
        csrf_token: Option<&str>,
    ) -> anyhow::Result<SaveResponse> {
        let mut request = self.client.post(endpoint).form(fields);
        if let Some(token) = csrf_token {
            request = request.header(CSRF_HEADER, token);
        }
        let response = request.send()?;
        let parsed: SaveResponse = response.json()?;
        Ok(parsed)
    }
}
