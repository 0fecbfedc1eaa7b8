//! chatctl: command-line client for a remote chat-management API.
//!
//! Layers, innermost first:
//! - `domain`: entities and input validation
//! - `application`: services (credentials, client factory, chats, projects, files)
//! - `infrastructure`: I/O traits, HTTP client, service container
//! - `cli`: argument parsing, command handlers, error classification

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
