//! Session-scoped prediction history and named what-if scenarios.

use eta_core::PipelineError;

pub mod manager;
pub mod presets;
pub mod registry;
pub mod store;

pub use manager::ScenarioManager;
pub use presets::Preset;
pub use registry::{SessionId, SessionRegistry};
pub use store::SessionStore;

#[derive(thiserror::Error, Debug)]
pub enum ScenarioError {
    #[error("a scenario named {0:?} already exists")]
    DuplicateName(String),
    #[error("scenario name must not be empty")]
    EmptyName,
    #[error("no scenario named {0:?}")]
    UnknownScenario(String),
    #[error("no session {0}")]
    UnknownSession(SessionId),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

pub type Result<T, E = ScenarioError> = std::result::Result<T, E>;
