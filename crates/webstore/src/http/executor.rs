use async_trait::async_trait;

use super::{HttpRequest, HttpResponse};
use crate::error::TransportError;

#[async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
