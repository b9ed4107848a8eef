#![forbid(unsafe_code)]

//! Test harness for folio.
//!
//! - [`page_model::PageModel`] - In-memory page that applies `DomPatch`es
//! - [`simulator::PageSimulator`] - Drives a controller against the model
//!   on a virtual clock

pub mod page_model;
pub mod simulator;

pub use page_model::PageModel;
pub use simulator::PageSimulator;
