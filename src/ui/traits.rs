use async_trait::async_trait;

use crate::error::NetworkError;

#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn fetch_template(&self, location: &str) -> Result<String, NetworkError>;
}
