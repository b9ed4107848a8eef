#![forbid(unsafe_code)]

//! Browser frontend for folio.
//!
//! Native-testable pieces ([`RunnerCore`], [`LogBuffer`], [`markup`]) build
//! on every target; the DOM wiring and the `PortfolioPage` export only
//! build for `wasm32`.

pub mod log;
pub mod markup;
pub mod runner_core;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use log::LogBuffer;
pub use runner_core::RunnerCore;

#[cfg(target_arch = "wasm32")]
pub use wasm::PortfolioPage;
