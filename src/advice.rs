use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct SlipResponse {
    slip: Slip,
}

#[derive(Debug, Deserialize)]
struct Slip {
    advice: String,
}

/// Fetches one motivational tip. Every failure simply means "no tip".
#[derive(Clone)]
pub struct AdviceFetcher {
    client: reqwest::Client,
    url: Url,
}

impl AdviceFetcher {
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    async fn fetch_text(&self) -> Result<String, reqwest::Error> {
        self.client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    pub async fn fetch(&self) -> Option<String> {
        // The endpoint does not always label its JSON as such, so parse the text.
        let body = self
            .fetch_text()
            .await
            .map_err(|err| tracing::warn!(error = %err, "failed to fetch advice"))
            .ok()?;
        parse_advice(&body)
    }
}

fn parse_advice(body: &str) -> Option<String> {
    let parsed: SlipResponse = serde_json::from_str(body)
        .map_err(|err| tracing::debug!(error = %err, "unexpected advice payload"))
        .ok()?;
    let advice = parsed.slip.advice.trim();
    (!advice.is_empty()).then(|| advice.to_string())
}
