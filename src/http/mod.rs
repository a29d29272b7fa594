pub mod model;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::{
    audio::traits::TrackLookup, error::NetworkError, http::model::TrackPayload,
    ui::traits::TemplateSource,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct ApiService {
    client: Client,
    origin: Url,
}

impl ApiService {
    pub fn new(origin: Url) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| NetworkError::Request {
                url: origin.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { client, origin })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    fn track_url(&self, id: &str) -> Result<Url, NetworkError> {
        let mut url = self.origin.clone();
        url.path_segments_mut()
            .map_err(|_| NetworkError::InvalidLocation(self.origin.to_string()))?
            .pop_if_empty()
            .push("tracks")
            .push(id);
        Ok(url)
    }

    async fn get_text(&self, url: Url) -> Result<String, NetworkError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| NetworkError::Request {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| NetworkError::Request {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl TrackLookup for ApiService {
    async fn get_track(&self, id: &str) -> Result<TrackPayload, NetworkError> {
        let url = self.track_url(id)?;
        debug!(id, url = url.as_str(), "api_track_lookup");
        let body = self.get_text(url).await?;
        TrackPayload::from_json(&body).map_err(|e| NetworkError::Body(e.to_string()))
    }
}

#[async_trait]
impl TemplateSource for ApiService {
    async fn fetch_template(&self, location: &str) -> Result<String, NetworkError> {
        let url = self
            .origin
            .join(location)
            .map_err(|_| NetworkError::InvalidLocation(location.to_string()))?;
        debug!(url = url.as_str(), "api_template_fetch");
        self.get_text(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_urls_keep_the_origin_path() {
        let api = ApiService::new(Url::parse("http://localhost:3000/api/").unwrap()).unwrap();
        assert_eq!(
            api.track_url("abc").unwrap().as_str(),
            "http://localhost:3000/api/tracks/abc"
        );
        assert_eq!(
            api.track_url("a/b").unwrap().as_str(),
            "http://localhost:3000/api/tracks/a%2Fb"
        );
    }
}
