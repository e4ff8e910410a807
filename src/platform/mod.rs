//! Platform abstraction layer
//!
//! The simulation and session are platform-free; this module only adapts
//! them to a host. On the web that is a JS shell driving `requestAnimationFrame`.

#[cfg(target_arch = "wasm32")]
pub mod web;
