//! # squeeze
//!
//! Control client for networked media-player hubs that speak the
//! line-oriented CLI protocol on TCP port 9090.
//!
//! A run connects, loads the player and favorite catalog, performs one
//! [`Action`] and disconnects:
//!
//! ```rust,no_run
//! use squeeze::prelude::*;
//!
//! # async fn run() -> Result<(), SqueezeError> {
//! let outcome = SqueezeClient::builder()
//!     .host("192.168.1.10")
//!     .connect()
//!     .await?
//!     .dispatch(Action::StartFavorite {
//!         player: "Kitchen".into(),
//!         favorite: "Jazz FM".into(),
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::{Action, Outcome, SqueezeClient, SqueezeClientBuilder};
pub use error::SqueezeError;

pub use squeeze_protocol as protocol;
pub use squeeze_session as session;
pub use squeeze_transport as transport;

pub mod prelude {
    pub use crate::{Action, Outcome, SqueezeClient, SqueezeClientBuilder, SqueezeError};
    pub use squeeze_protocol::{FavoriteRecord, PlayerRecord, ShuffleMode};
    pub use squeeze_session::{CatalogListing, LoadStatus, SessionConfig};
    pub use squeeze_transport::DEFAULT_PORT;
}
