//! Command-line flags and how they map onto one [`Action`].

use std::time::Duration;

use clap::{ArgAction, Parser};
use squeeze::prelude::*;

/// Start a hub favorite or toggle shuffle from the command line.
#[derive(Parser, Debug)]
#[command(name = "squeeze-favorite", version, about, long_about = None)]
pub struct Cli {
    /// Get list of available players and favorites
    #[arg(short = 'l', long)]
    pub list: bool,

    /// Server address (ip or hostname)
    #[arg(short = 's', long)]
    pub server: Option<String>,

    /// Port (default 9090)
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<String>,

    /// Player name
    #[arg(short = 'r', long)]
    pub player: Option<String>,

    /// Favorite name
    #[arg(short = 'f', long)]
    pub favorite: Option<String>,

    /// Toggle shuffle
    #[arg(short = 't', long)]
    pub shuffle: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Seconds to wait for each hub reply
    #[arg(long, value_name = "SECS", default_value_t = 10.0)]
    pub timeout: f64,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Why the flags cannot be turned into a run.
#[derive(Debug, PartialEq, Eq)]
pub enum UsageError {
    /// `--port` is not a valid port number.
    InvalidPort(String),
    /// No `--server` was given.
    MissingServer,
    /// The flags do not name one of the supported actions.
    NoAction,
    /// `--timeout` is negative or not finite.
    InvalidTimeout,
}

impl UsageError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            UsageError::InvalidPort(_) => 1,
            UsageError::MissingServer | UsageError::NoAction | UsageError::InvalidTimeout => 2,
        }
    }
}

/// Everything needed to run: where to connect and what to do.
#[derive(Debug, PartialEq)]
pub struct Plan {
    pub server: String,
    pub port: u16,
    pub timeout: Duration,
    pub action: Action,
}

impl Cli {
    /// Validates the flags and picks the action.
    ///
    /// `-l` wins over everything; otherwise a player with a favorite
    /// starts it, and a player with `-t` toggles shuffle.
    pub fn plan(&self) -> Result<Plan, UsageError> {
        let port = parse_port(self.port.as_deref())?;
        let server = self.server.clone().ok_or(UsageError::MissingServer)?;
        let timeout =
            Duration::try_from_secs_f64(self.timeout).map_err(|_| UsageError::InvalidTimeout)?;

        let action = if self.list {
            Action::List
        } else {
            match (&self.player, &self.favorite) {
                (Some(player), Some(favorite)) => Action::StartFavorite {
                    player: player.clone(),
                    favorite: favorite.clone(),
                },
                (Some(player), None) if self.shuffle => Action::ToggleShuffle {
                    player: player.clone(),
                },
                _ => return Err(UsageError::NoAction),
            }
        };

        Ok(Plan {
            server,
            port,
            timeout,
            action,
        })
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16, UsageError> {
    match raw {
        None => Ok(DEFAULT_PORT),
        Some(raw) => raw
            .parse()
            .map_err(|_| UsageError::InvalidPort(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("squeeze-favorite").chain(args.iter().copied()))
            .expect("flags should parse")
    }

    #[test]
    fn test_list_plan() {
        let plan = parse(&["-s", "lms.local", "-l"]).plan().unwrap();
        assert_eq!(plan.server, "lms.local");
        assert_eq!(plan.port, 9090);
        assert_eq!(plan.timeout, Duration::from_secs(10));
        assert_eq!(plan.action, Action::List);
    }

    #[test]
    fn test_list_wins_over_player_flags() {
        let plan = parse(&["-s", "h", "-l", "-r", "Kitchen", "-f", "Jazz"]).plan().unwrap();
        assert_eq!(plan.action, Action::List);
    }

    #[test]
    fn test_start_favorite_plan() {
        let plan = parse(&["-s", "h", "-p", "9000", "-r", "Kitchen", "-f", "Jazz FM"])
            .plan()
            .unwrap();
        assert_eq!(plan.port, 9000);
        assert_eq!(
            plan.action,
            Action::StartFavorite {
                player: "Kitchen".into(),
                favorite: "Jazz FM".into()
            }
        );
    }

    #[test]
    fn test_toggle_shuffle_plan() {
        let plan = parse(&["-s", "h", "-r", "Kitchen", "-t"]).plan().unwrap();
        assert_eq!(
            plan.action,
            Action::ToggleShuffle {
                player: "Kitchen".into()
            }
        );
    }

    #[test]
    fn test_player_alone_is_usage_error() {
        let err = parse(&["-s", "h", "-r", "Kitchen"]).plan().unwrap_err();
        assert_eq!(err, UsageError::NoAction);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_server_is_usage_error() {
        let err = parse(&["-l"]).plan().unwrap_err();
        assert_eq!(err, UsageError::MissingServer);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_invalid_port_exits_one() {
        let err = parse(&["-s", "h", "-l", "-p", "ninety"]).plan().unwrap_err();
        assert_eq!(err, UsageError::InvalidPort("ninety".into()));
        assert_eq!(err.exit_code(), 1);

        let err = parse(&["-s", "h", "-l", "-p", "70000"]).plan().unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_negative_timeout_is_usage_error() {
        let err = parse(&["-s", "h", "-l", "--timeout=-1"]).plan().unwrap_err();
        assert_eq!(err, UsageError::InvalidTimeout);
    }

    #[test]
    fn test_fractional_timeout() {
        let plan = parse(&["-s", "h", "-l", "--timeout", "2.5"]).plan().unwrap();
        assert_eq!(plan.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_verbosity_counts() {
        assert_eq!(parse(&["-vv"]).verbose, 2);
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
