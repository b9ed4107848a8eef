#![forbid(unsafe_code)]

//! Folio page core.
//!
//! Host-independent interaction logic for the folio portfolio page. The
//! host measures the document, forwards events, and applies the
//! [`DomPatch`]es the controller emits; everything in between is plain,
//! deterministic Rust.
//!
//! # Key Components
//!
//! - [`PageController`] - Owns page state, the virtual clock and all handlers
//! - [`BindingTable`] - Declarative `(target, event) → handler` wiring
//! - [`form::validate`] - Contact form validation
//! - [`MailtoLink`] - `mailto:` hand-off construction
//! - [`notify::Toaster`] - Self-removing toast notifications
//! - [`scroll::ScrollDispatcher`] - Active nav link, reveal, navbar state
//! - [`TimerQueue`] - Cancellable deadline-ordered tasks

pub mod bindings;
pub mod config;
pub mod contact;
pub mod controller;
pub mod effects;
pub mod form;
pub mod mailto;
pub mod notify;
pub mod patch;
pub mod scroll;
pub mod timer;

pub use bindings::{BINDINGS, Binding, BindingTable, ElementProbe, EventKind, HandlerId, Target};
pub use config::{ConfigError, PageConfig};
pub use contact::SubmitOutcome;
pub use controller::{PageController, PageEvent, PageLayout, Task};
pub use effects::ObservedEntry;
pub use form::{FieldId, FieldOutcome, FormSnapshot, ValidationResult};
pub use mailto::MailtoLink;
pub use notify::{Notification, NotificationId, Severity};
pub use patch::{CLASS_ACTIVE, CLASS_VISIBLE, DomPatch, ElementRef};
pub use scroll::{ScrollSnapshot, SectionMetrics};
pub use timer::{TimerId, TimerQueue};
