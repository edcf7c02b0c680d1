pub mod auth;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod gateway;
pub mod guard;
pub mod models;
pub mod pipeline;
pub mod session;
pub mod token;

pub use auth::{CredentialError, CredentialExchanger};
pub use client::XpdashClient;
pub use config::XpdashConfig;
pub use dashboard::{load_dashboard, DashboardLoad, DashboardView, DASHBOARD_QUERY};
pub use error::XpdashError;
pub use gateway::{DashboardSource, QueryError, QueryGateway, QueryOutcome};
pub use guard::{Gate, GuardActivation, GuardState, View};
pub use models::DashboardData;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionError, SessionStore};
