//! Wires the session, exchanger and gateway together from configuration.

use std::sync::Arc;

use crate::auth::CredentialExchanger;
use crate::config::XpdashConfig;
use crate::dashboard::{load_dashboard, DashboardLoad};
use crate::error::XpdashError;
use crate::gateway::QueryGateway;
use crate::guard::GuardActivation;
use crate::session::{FileSessionStore, Session, SessionStore};

/// One shared session injected into both network components.
#[derive(Debug, Clone)]
pub struct XpdashClient {
    session: Session,
    exchanger: CredentialExchanger,
    gateway: QueryGateway,
}

impl XpdashClient {
    /// Build a client whose session is persisted at `[session] path`.
    pub fn from_config(config: &XpdashConfig) -> Result<Self, XpdashError> {
        let store = FileSessionStore::new(config.session.resolved_path());
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: &XpdashConfig, store: Arc<dyn SessionStore>) -> Result<Self, XpdashError> {
        let session = Session::new(store);
        let exchanger = CredentialExchanger::new(
            config.endpoints.auth_url.clone(),
            session.clone(),
            config.http.timeout(),
        )?;
        let gateway = QueryGateway::new(
            config.endpoints.graphql_url.clone(),
            session.clone(),
            config.http.timeout(),
        )?;

        Ok(Self {
            session,
            exchanger,
            gateway,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn exchanger(&self) -> &CredentialExchanger {
        &self.exchanger
    }

    pub fn gateway(&self) -> &QueryGateway {
        &self.gateway
    }

    /// Forget the stored session. Idempotent.
    pub fn logout(&self) -> Result<(), XpdashError> {
        Ok(self.exchanger.logout()?)
    }

    /// Protected dashboard load for a new view activation.
    pub async fn dashboard(&self) -> Result<DashboardLoad, XpdashError> {
        Ok(load_dashboard(GuardActivation::protect(), &self.session, &self.gateway).await?)
    }
}
