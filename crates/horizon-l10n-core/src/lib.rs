//! Core primitives for Horizon L10n.
//!
//! - **Signal/Slot System**: synchronous multicast change notification
//! - **Property System**: change-detecting state cells
//! - **Logging**: `tracing` targets and span names shared by the workspace
//!
//! # Example
//!
//! ```
//! use horizon_l10n_core::{Property, Signal};
//!
//! let language = Property::new("en-US".to_string());
//! let language_changed = Signal::<String>::new();
//!
//! let conn_id = language_changed.connect(|lang| println!("now {lang}"));
//!
//! if language.set("de-DE".to_string()) {
//!     language_changed.emit(language.get());
//! }
//!
//! language_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod property;
pub mod signal;

pub use logging::PerfSpan;
pub use property::{Property, ReadOnlyProperty};
pub use signal::{ConnectionGuard, ConnectionId, Signal, SignalEmitter};
