use crate::domain::model::{AddressResponse, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Destination for rendered leaflets and the run summary.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn contact_email(&self) -> &str;
    fn project_url(&self) -> &str;
    fn api_base_url(&self) -> &str;
    fn postcodes(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn background_path(&self) -> &str;
    fn font_family(&self) -> &str;
    fn request_interval(&self) -> Duration;
    fn max_addresses(&self) -> Option<usize>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<AddressResponse>>;
    async fn transform(&self, data: Vec<AddressResponse>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
