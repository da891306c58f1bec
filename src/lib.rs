//! Bingo caller and draws-to-win simulator.
//!
//! - `simulator`: Monte Carlo engine estimating how many draws a game lasts
//! - `session`: the live game driven by the admin panel
//! - `web`: WebSocket broadcast of the live game (feature `web`)

pub mod build_info;
pub mod constants;
pub mod logging;
pub mod session;
pub mod simulator;
pub mod web;
