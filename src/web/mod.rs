//! Live caller server.
//!
//! Pushes the current game to every connected display and admin panel over
//! WebSocket, and accepts admin commands on the same socket.
//!
//! ## Usage
//!
//! ```sh
//! cargo run --features web --bin bingo -- --port 3000
//! ```
//!
//! Clients connect to `ws://localhost:3000`. A plain HTTP `GET` returns the
//! current game state as JSON.

#[cfg(feature = "web")]
mod server;

#[cfg(feature = "web")]
pub use server::{start_live_server, LiveServer, ServerMessage};
