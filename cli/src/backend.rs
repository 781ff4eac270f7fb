//! Backend selection from the startup configuration.

use async_trait::async_trait;
use storefront_core::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, StorefrontApi, StorefrontConfig, TransportError};
use tracing::info;

use crate::mock::{MockTransport, MOCK_BASE_URL};

/// The transport the client talks through.
#[derive(Clone)]
pub enum Backend {
    Http(ReqwestTransport),
    Mock(MockTransport),
}

impl Backend {
    pub fn from_config(config: &StorefrontConfig) -> Self {
        if config.use_mock {
            Backend::Mock(MockTransport::new())
        } else {
            Backend::Http(ReqwestTransport::new())
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, Backend::Mock(_))
    }
}

#[async_trait]
impl HttpTransport for Backend {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        match self {
            Backend::Http(transport) => transport.execute(request).await,
            Backend::Mock(transport) => transport.execute(request).await,
        }
    }
}

/// Service wrapper bound to the configured backend.
pub fn connect(config: &StorefrontConfig) -> StorefrontApi<Backend> {
    let backend = Backend::from_config(config);
    let base_url = if backend.is_mock() {
        MOCK_BASE_URL
    } else {
        config.api_base_url.as_str()
    };
    info!(base_url, mock = backend.is_mock(), "using backend");
    StorefrontApi::new(base_url, backend)
}
