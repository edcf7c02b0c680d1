use thiserror::Error;

use crate::auth::CredentialError;
use crate::gateway::QueryError;
use crate::session::SessionError;

#[derive(Error, Debug)]
pub enum XpdashError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Query(#[from] QueryError),
}
