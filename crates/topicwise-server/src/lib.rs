//! Topicwise server: HTTP reporting API and CLI reports over the content history.

pub mod cli;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
