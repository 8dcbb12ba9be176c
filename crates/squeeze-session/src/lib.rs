//! Catalog and command dispatch for the squeeze hub client.
//!
//! # How it fits in the stack
//!
//! ```text
//! Facade (above)  ← opens one session, dispatches one action, closes it
//!     ↕
//! Session Layer (this crate)  ← catalog of names → ids, command dispatch
//!     ↕
//! Protocol / Transport (below)  ← command lines, listing parsers, socket
//! ```

mod catalog;
mod error;
mod session;

pub use catalog::{Catalog, CatalogKind, CatalogListing, LoadStatus, NameIndex};
pub use error::SessionError;
pub use session::{
    Session, SessionConfig, SessionState, ShuffleToggle, DEFAULT_RESPONSE_TIMEOUT,
};
