use std::sync::Arc;

use http::StatusCode;
use thiserror::Error;
use url::Url;

use crate::models::{NewSchedule, Schedule, ScheduleId, ScheduleStatus, StatusUpdate};

const COLLECTION: &str = "schedules";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server responded with status {0}")]
    Status(StatusCode),
    #[error("Base URL cannot carry a path: {0}")]
    InvalidBaseUrl(String),
}

/// Stateless wrapper over the remote `/schedules` collection.
#[derive(Clone)]
pub struct RemoteScheduleClient {
    client: reqwest::Client,
    base_url: Arc<Url>,
}

impl RemoteScheduleClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::new(base_url),
        }
    }

    fn endpoint(&self, id: Option<ScheduleId>) -> Result<Url, RemoteError> {
        let mut url = (*self.base_url).clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| RemoteError::InvalidBaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push(COLLECTION);
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        Ok(url)
    }

    fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(RemoteError::Status(status))
        }
    }

    pub async fn list(&self) -> Result<Vec<Schedule>, RemoteError> {
        let url = self.endpoint(None)?;
        let response = Self::check(self.client.get(url).send().await?)?;
        Ok(response.json().await?)
    }

    pub async fn create(&self, body: &NewSchedule) -> Result<Schedule, RemoteError> {
        let url = self.endpoint(None)?;
        let response = Self::check(self.client.post(url).json(body).send().await?)?;
        Ok(response.json().await?)
    }

    /// The response body is not inspected beyond its status.
    pub async fn update_status(
        &self,
        id: ScheduleId,
        status: ScheduleStatus,
    ) -> Result<(), RemoteError> {
        let url = self.endpoint(Some(id))?;
        Self::check(
            self.client
                .patch(url)
                .json(&StatusUpdate { status })
                .send()
                .await?,
        )?;
        Ok(())
    }

    pub async fn delete(&self, id: ScheduleId) -> Result<(), RemoteError> {
        let url = self.endpoint(Some(id))?;
        Self::check(self.client.delete(url).send().await?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_root() {
        let client = RemoteScheduleClient::new(Url::parse("http://localhost:3000").unwrap());
        assert_eq!(
            client.endpoint(None).unwrap().as_str(),
            "http://localhost:3000/schedules"
        );
        assert_eq!(
            client.endpoint(Some(42)).unwrap().as_str(),
            "http://localhost:3000/schedules/42"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = RemoteScheduleClient::new(Url::parse("https://api.example.com/v1/").unwrap());
        assert_eq!(
            client.endpoint(Some(7)).unwrap().as_str(),
            "https://api.example.com/v1/schedules/7"
        );
        let client = RemoteScheduleClient::new(Url::parse("https://api.example.com/v1").unwrap());
        assert_eq!(
            client.endpoint(None).unwrap().as_str(),
            "https://api.example.com/v1/schedules"
        );
    }

    #[test]
    fn test_endpoint_rejects_opaque_url() {
        let client = RemoteScheduleClient::new(Url::parse("mailto:someone@example.com").unwrap());
        assert!(matches!(
            client.endpoint(None),
            Err(RemoteError::InvalidBaseUrl(_))
        ));
    }
}
