//! Development server with live reload for folio sites.
//!
//! Builds the site into its output directory, serves it, and rebuilds
//! whenever a document or the site descriptor changes. Connected browsers
//! are told to reload over a WebSocket; a failed rebuild keeps the last good
//! output and shows the error instead.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{preview, DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{ReloadHub, ReloadMessage};
