// src/trialogue/mod.rs

pub mod client_wrapper;
pub mod clients;
pub mod config;
pub mod context_window;
pub mod event;
pub mod export;
pub mod http_client_pool;
pub mod orchestrator;
pub mod participant;
pub mod session;
pub mod topics;
pub mod transcript;

// So callers can write trialogue::Session instead of trialogue::session::Session.
pub use orchestrator::RoundOrchestrator;
pub use session::Session;
