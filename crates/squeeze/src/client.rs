//! `SqueezeClient` builder and the one-shot dispatch boundary.
//!
//! A client opens one connection, loads the catalog, runs exactly one
//! [`Action`], and closes the connection on every path. Name lookups and
//! malformed replies come back as [`Outcome::Rejected`] with a one-line
//! message; only connection-level failures are errors.

use std::time::Duration;

use serde::Serialize;
use squeeze_protocol::ShuffleMode;
use squeeze_session::{
    CatalogListing, Session, SessionConfig, SessionError, ShuffleToggle,
};
use squeeze_transport::{TcpConnection, DEFAULT_PORT};

use crate::SqueezeError;

/// One command a client run performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print every player and favorite name.
    List,
    /// Start `favorite` on `player`.
    StartFavorite { player: String, favorite: String },
    /// Flip `player`'s playlist shuffle.
    ToggleShuffle { player: String },
}

/// What a dispatched action did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Listed(CatalogListing),
    FavoriteStarted { player: String, favorite: String },
    ShuffleToggled {
        player: String,
        from: ShuffleMode,
        to: ShuffleMode,
    },
    /// The player never reported its shuffle state; nothing was changed.
    ShuffleUnchanged { player: String },
    /// The action could not be carried out, with a one-line reason.
    Rejected { message: String },
}

/// Builder for configuring and connecting a [`SqueezeClient`].
///
/// # Example
///
/// ```rust,no_run
/// use squeeze::prelude::*;
///
/// # async fn run() -> Result<(), SqueezeError> {
/// let client = SqueezeClient::builder()
///     .host("lms.local")
///     .connect()
///     .await?;
/// let outcome = client.dispatch(Action::List).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SqueezeClientBuilder {
    host: Option<String>,
    port: u16,
    session_config: SessionConfig,
}

impl SqueezeClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            host: None,
            port: DEFAULT_PORT,
            session_config: SessionConfig::default(),
        }
    }

    /// Sets the hub's host name or IP address. Required.
    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    /// Sets the hub's CLI port (default 9090).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets how long to wait for each reply.
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.session_config.response_timeout = timeout;
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Connects to the hub and loads the catalog.
    ///
    /// # Errors
    /// Fails if no host was set, the connection cannot be opened, or a
    /// listing command cannot be sent.
    pub async fn connect(self) -> Result<SqueezeClient, SqueezeError> {
        let host = self.host.ok_or(SqueezeError::MissingHost)?;
        let conn = TcpConnection::connect(&host, self.port).await?;
        let session = Session::open(conn, self.session_config)
            .await
            .map_err(lift)?;
        Ok(SqueezeClient { session })
    }
}

impl Default for SqueezeClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A connected client with its catalog loaded.
#[derive(Debug)]
pub struct SqueezeClient {
    session: Session<TcpConnection>,
}

impl SqueezeClient {
    /// Creates a new builder.
    pub fn builder() -> SqueezeClientBuilder {
        SqueezeClientBuilder::new()
    }

    /// Runs one action and closes the connection.
    ///
    /// # Errors
    /// Only transport failures are returned as errors. Unknown names and
    /// malformed replies become [`Outcome::Rejected`].
    pub async fn dispatch(mut self, action: Action) -> Result<Outcome, SqueezeError> {
        tracing::debug!(?action, "dispatching");
        let result = run_action(&mut self.session, action).await;

        let closed = self.session.close().await;
        let outcome = result?;
        closed.map_err(lift)?;
        Ok(outcome)
    }
}

async fn run_action(
    session: &mut Session<TcpConnection>,
    action: Action,
) -> Result<Outcome, SqueezeError> {
    let result = match action {
        Action::List => session.list_all().map(Outcome::Listed),
        Action::StartFavorite { player, favorite } => {
            let started = session.start_favorite(&player, &favorite).await;
            started.map(|()| Outcome::FavoriteStarted { player, favorite })
        }
        Action::ToggleShuffle { player } => {
            let toggled = session.toggle_shuffle(&player).await;
            toggled.map(|toggle| match toggle {
                ShuffleToggle::Toggled { from, to } => Outcome::ShuffleToggled { player, from, to },
                ShuffleToggle::NoResponse => Outcome::ShuffleUnchanged { player },
            })
        }
    };

    settle(result)
}

/// Turns a session result into what the caller sees. Lookups and
/// malformed replies become a rejection; a transport failure is lifted
/// out of the session error so callers match one `Transport` variant
/// whether it happened while connecting or while dispatching.
fn settle(result: Result<Outcome, SessionError>) -> Result<Outcome, SqueezeError> {
    match result {
        Ok(outcome) => Ok(outcome),
        Err(e) if e.is_recoverable() => {
            tracing::info!(error = %e, "action rejected");
            Ok(Outcome::Rejected {
                message: e.to_string(),
            })
        }
        Err(e) => Err(lift(e)),
    }
}

fn lift(err: SessionError) -> SqueezeError {
    match err {
        SessionError::Transport(e) => SqueezeError::Transport(e),
        e => SqueezeError::Session(e),
    }
}
