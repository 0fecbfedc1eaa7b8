//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (KeyValueStore, ChatApi, etc.)
//! but are themselves concrete structs, not traits.

mod auth;
mod chat;
mod client_factory;
mod credentials;
mod files;
mod project;

pub use auth::AuthService;
pub use chat::{ChatOutcome, ChatService, CreateOptions, InitOutcome};
pub use client_factory::{ClientFactory, KeySource, API_KEY_ENV};
pub use credentials::CredentialStore;
pub use files::FileCollector;
pub use project::ProjectService;
