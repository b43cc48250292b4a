//! Development server with hot reload for aiui sites.
//!
//! Compiles the site config into a work directory, renders pages on
//! request, and pushes reloads or content updates over a WebSocket when
//! the config or docs change.

pub mod server;
pub mod site;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, ServerError};
pub use site::DevSite;
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{HmrHub, HmrMessage};
