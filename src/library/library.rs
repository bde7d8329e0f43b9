use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_cognito::*;
use crate::infra_http::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::Arc;

/// Every service the front-end needs, wired from settings.
pub struct Library {
    pub identity: Arc<dyn IdentityService>,
    pub api: Arc<dyn ApiClient>,
    pub books: Arc<dyn BookService>,
    pub categories: Arc<dyn CategoryService>,
    pub borrows: Arc<dyn BorrowService>,
}

impl Library {
    pub fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new()?);
        Self::with_transport(settings, transport)
    }

    pub fn with_transport(
        settings: &Settings,
        transport: Arc<dyn HttpTransport>,
    ) -> anyhow::Result<Self> {
        let (identity, sessions): (Arc<dyn IdentityService>, Arc<dyn SessionProvider>) =
            match settings.identity.backend.as_str() {
                "fake" => {
                    let fake = Arc::new(FakeIdentityService::new());
                    let identity: Arc<dyn IdentityService> = fake.clone();
                    let sessions: Arc<dyn SessionProvider> = fake;
                    (identity, sessions)
                }
                "cognito" => {
                    let cognito = Arc::new(CognitoIdentityService::try_new(
                        CognitoConfig {
                            user_pool_id: settings.identity.user_pool_id.clone(),
                            client_id: settings.identity.client_id.clone(),
                            endpoint: settings.identity.endpoint.clone(),
                        },
                        transport.clone(),
                    )?);
                    let identity: Arc<dyn IdentityService> = cognito.clone();
                    let sessions: Arc<dyn SessionProvider> = cognito;
                    (identity, sessions)
                }
                other => return Err(anyhow::anyhow!("Unknown identity backend: {}", other)),
            };
        debug!(backend = %settings.identity.backend, base_url = %settings.api.base_url, "library wired");

        let api: Arc<dyn ApiClient> = Arc::new(AuthenticatedApiClient::new(
            settings.api.base_url.clone(),
            sessions,
            transport,
        ));

        Ok(Self {
            identity,
            books: Arc::new(RealBookService::new(api.clone())),
            categories: Arc::new(RealCategoryService::new(api.clone())),
            borrows: Arc::new(RealBorrowService::new(api.clone())),
            api,
        })
    }
}
