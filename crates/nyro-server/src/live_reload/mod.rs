//! Live reload system for development mode.
//!
//! Forwards content store changes to connected browsers over WebSocket.

mod manager;
mod websocket;

pub(crate) use manager::{ANY_PAGE, LiveReloadManager, ReloadEvent};
pub(crate) use websocket::ws_handler;
