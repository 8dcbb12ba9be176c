//! Session tests against a scripted in-memory connection.
//!
//! The script hands out one canned reply per awaited response. A `None`
//! entry (or an exhausted script) models a hub that stays silent, which
//! with the paused test clock makes the response timeout elapse
//! instantly.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use squeeze_protocol::ShuffleMode;
use squeeze_session::{
    CatalogKind, LoadStatus, Session, SessionConfig, SessionError, SessionState, ShuffleToggle,
};
use squeeze_transport::{Connection, TransportError};

// =========================================================================
// Scripted connection
// =========================================================================

#[derive(Debug, Default)]
struct Wire {
    sent: Vec<String>,
    closes: usize,
}

#[derive(Debug)]
struct ScriptedConnection {
    replies: VecDeque<Option<Vec<u8>>>,
    wire: Arc<Mutex<Wire>>,
    fail_sends: bool,
}

impl ScriptedConnection {
    fn new(replies: Vec<Option<&str>>) -> (Self, Arc<Mutex<Wire>>) {
        let wire = Arc::new(Mutex::new(Wire::default()));
        let conn = Self {
            replies: replies
                .into_iter()
                .map(|r| r.map(|s| s.as_bytes().to_vec()))
                .collect(),
            wire: Arc::clone(&wire),
            fail_sends: false,
        };
        (conn, wire)
    }
}

impl Connection for ScriptedConnection {
    type Error = TransportError;

    async fn send(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_sends {
            return Err(TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "hub went away",
            )));
        }
        let line = String::from_utf8(data.to_vec()).unwrap();
        self.wire.lock().unwrap().sent.push(line);
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        match self.replies.pop_front() {
            Some(Some(data)) => Ok(Some(data)),
            _ => std::future::pending().await,
        }
    }

    async fn close(&mut self) -> Result<(), Self::Error> {
        self.wire.lock().unwrap().closes += 1;
        Ok(())
    }

    fn peer(&self) -> &str {
        "scripted"
    }
}

// =========================================================================
// Canned hub replies
// =========================================================================

const PLAYERS: &str = concat!(
    "players 0 9999 count:2 - ",
    "playerindex:0 playerid:AA%3ABB%3ACC%3ADD%3AEE%3AFF uuid:1 ip:10.0.0.2%3A3483 name:Kitchen ",
    "seq_no:0 model:squeezelite modelname:SqueezeLite power:1 isplaying:0 displaytype:none ",
    "isplayer:1 canpoweroff:1 connected:1 ",
    "playerindex:1 playerid:11%3A22%3A33%3A44%3A55%3A66 uuid:2 ip:10.0.0.3%3A3483 name:Living%20Room ",
    "seq_no:0 model:baby modelname:Radio power:0 isplaying:0 displaytype:none ",
    "isplayer:1 canpoweroff:1 connected:0\n",
);

const FAVORITES: &str = concat!(
    "favorites items 0 9999 title:Favorites ",
    "id:8a1.0 name:Jazz%20FM type:audio isaudio:1 hasitems:0 ",
    "id:8a1.1 name:Morning%3A%20News type:audio isaudio:1 hasitems:0 ",
    "count:2\n",
);

fn sent(wire: &Arc<Mutex<Wire>>) -> Vec<String> {
    wire.lock().unwrap().sent.clone()
}

async fn ready_session(
    mut replies: Vec<Option<&str>>,
) -> (Session<ScriptedConnection>, Arc<Mutex<Wire>>) {
    let mut all = vec![Some(PLAYERS), Some(FAVORITES)];
    all.append(&mut replies);
    let (conn, wire) = ScriptedConnection::new(all);
    let session = Session::open(conn, SessionConfig::default())
        .await
        .expect("session should open");
    (session, wire)
}

// =========================================================================
// Catalog loading
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_open_loads_both_listings() {
    let (session, wire) = ready_session(vec![]).await;

    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(sent(&wire), ["players 0 9999\n", "favorites items 0 9999\n"]);

    let catalog = session.catalog();
    assert_eq!(catalog.lookup_player("Kitchen").unwrap(), "AA:BB:CC:DD:EE:FF");
    assert_eq!(catalog.lookup_player("Living Room").unwrap(), "11:22:33:44:55:66");
    assert_eq!(catalog.lookup_favorite("Jazz FM").unwrap(), "8a1.0");
    assert_eq!(catalog.lookup_favorite("Morning: News").unwrap(), "8a1.1");
}

#[tokio::test(start_paused = true)]
async fn test_silent_hub_leaves_catalog_empty() {
    let (conn, wire) = ScriptedConnection::new(vec![None, None]);
    let session = Session::open(conn, SessionConfig::default()).await.unwrap();

    assert_eq!(session.state(), SessionState::Ready);
    assert!(session.catalog().players().is_empty());
    assert!(session.catalog().favorites().is_empty());
    assert_eq!(session.catalog().status(CatalogKind::Player), &LoadStatus::NoResponse);
    assert_eq!(sent(&wire).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_listing_only_empties_its_half() {
    let truncated = PLAYERS.replace(" connected:0", "");
    let (conn, _wire) = ScriptedConnection::new(vec![Some(truncated.as_str()), Some(FAVORITES)]);
    let session = Session::open(conn, SessionConfig::default()).await.unwrap();

    assert!(session.catalog().players().is_empty());
    assert!(matches!(
        session.catalog().status(CatalogKind::Player),
        LoadStatus::Malformed { .. }
    ));
    assert_eq!(session.catalog().favorites().len(), 2);

    let listing = session.list_all().unwrap();
    assert!(listing.to_string().contains("listing unavailable"));
}

#[tokio::test(start_paused = true)]
async fn test_send_failure_during_load_closes_and_errors() {
    let (mut conn, wire) = ScriptedConnection::new(vec![]);
    conn.fail_sends = true;

    let err = Session::open(conn, SessionConfig::default()).await.unwrap_err();
    assert!(matches!(err, SessionError::Transport(TransportError::SendFailed(_))));
    assert!(!err.is_recoverable());
    assert_eq!(wire.lock().unwrap().closes, 1);
}

// =========================================================================
// Dispatch
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_list_all_in_listing_order() {
    let (session, _wire) = ready_session(vec![]).await;
    let listing = session.list_all().unwrap();

    assert_eq!(listing.players, ["Kitchen", "Living Room"]);
    assert_eq!(listing.favorites, ["Jazz FM", "Morning: News"]);
}

#[tokio::test(start_paused = true)]
async fn test_start_favorite_sends_play_command() {
    let (mut session, wire) = ready_session(vec![]).await;

    session.start_favorite("Kitchen", "Jazz FM").await.unwrap();

    assert_eq!(
        sent(&wire).last().unwrap(),
        "AA:BB:CC:DD:EE:FF favorites playlist play item_id:8a1.0\n"
    );
}

#[tokio::test(start_paused = true)]
async fn test_start_favorite_unknown_names_sends_nothing() {
    let (conn, wire) = ScriptedConnection::new(vec![None, None]);
    let mut session = Session::open(conn, SessionConfig::default()).await.unwrap();
    let before = sent(&wire).len();

    let err = session.start_favorite("Unknown", "Jazz").await.unwrap_err();

    match &err {
        SessionError::Unresolved { player, favorite } => {
            assert_eq!(player, "Unknown");
            assert_eq!(favorite, "Jazz");
        }
        other => panic!("expected Unresolved, got {other:?}"),
    }
    assert!(err.is_recoverable());
    assert_eq!(sent(&wire).len(), before);
}

#[tokio::test(start_paused = true)]
async fn test_start_favorite_reports_both_names_when_only_one_missing() {
    let (mut session, wire) = ready_session(vec![]).await;

    let err = session.start_favorite("Kitchen", "Polka").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "player \"Kitchen\" or favorite \"Polka\" not available"
    );
    assert_eq!(sent(&wire).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_shuffle_turns_shuffled_player_off() {
    let (mut session, wire) =
        ready_session(vec![Some("AA%3ABB%3ACC%3ADD%3AEE%3AFF playlist shuffle 2\n")]).await;

    let toggle = session.toggle_shuffle("Kitchen").await.unwrap();

    assert_eq!(
        toggle,
        ShuffleToggle::Toggled {
            from: ShuffleMode::ByAlbum,
            to: ShuffleMode::Off
        }
    );
    assert_eq!(
        sent(&wire)[2..],
        [
            "AA:BB:CC:DD:EE:FF playlist shuffle ?\n",
            "AA:BB:CC:DD:EE:FF playlist shuffle 0\n",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_toggle_shuffle_turns_unshuffled_player_on() {
    let (mut session, wire) =
        ready_session(vec![Some("11%3A22%3A33%3A44%3A55%3A66 playlist shuffle 0\n")]).await;

    let toggle = session.toggle_shuffle("Living Room").await.unwrap();

    assert_eq!(
        toggle,
        ShuffleToggle::Toggled {
            from: ShuffleMode::Off,
            to: ShuffleMode::BySong
        }
    );
    assert_eq!(
        sent(&wire).last().unwrap(),
        "11:22:33:44:55:66 playlist shuffle 1\n"
    );
}

#[tokio::test(start_paused = true)]
async fn test_toggle_shuffle_unnamed_nonzero_state_turns_off() {
    let (mut session, wire) =
        ready_session(vec![Some("AA%3ABB%3ACC%3ADD%3AEE%3AFF playlist shuffle 3\n")]).await;

    let toggle = session.toggle_shuffle("Kitchen").await.unwrap();

    assert_eq!(
        toggle,
        ShuffleToggle::Toggled {
            from: ShuffleMode::Other(3),
            to: ShuffleMode::Off
        }
    );
    assert_eq!(
        sent(&wire).last().unwrap(),
        "AA:BB:CC:DD:EE:FF playlist shuffle 0\n"
    );
}

#[tokio::test(start_paused = true)]
async fn test_toggle_shuffle_without_reply_sends_no_set() {
    let (mut session, wire) = ready_session(vec![None]).await;

    let toggle = session.toggle_shuffle("Kitchen").await.unwrap();

    assert_eq!(toggle, ShuffleToggle::NoResponse);
    assert_eq!(
        sent(&wire).last().unwrap(),
        "AA:BB:CC:DD:EE:FF playlist shuffle ?\n"
    );
}

#[tokio::test(start_paused = true)]
async fn test_toggle_shuffle_unknown_player() {
    let (mut session, wire) = ready_session(vec![]).await;

    let err = session.toggle_shuffle("Garage").await.unwrap_err();
    assert!(matches!(err, SessionError::NotFound { kind: CatalogKind::Player, .. }));
    assert_eq!(sent(&wire).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_shuffle_garbage_reply_is_protocol_error() {
    let (mut session, wire) = ready_session(vec![Some("AA playlist shuffle ?\n")]).await;

    let err = session.toggle_shuffle("Kitchen").await.unwrap_err();
    assert!(matches!(err, SessionError::Protocol(_)));
    assert!(err.is_recoverable());
    assert_eq!(sent(&wire).len(), 3, "no set command after a bad reply");
}

// =========================================================================
// Close
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_close_is_idempotent_and_terminal() {
    let (mut session, wire) = ready_session(vec![]).await;

    session.close().await.unwrap();
    session.close().await.unwrap();

    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(wire.lock().unwrap().closes, 1);
    assert!(matches!(session.list_all(), Err(SessionError::Closed)));
    assert!(matches!(
        session.start_favorite("Kitchen", "Jazz FM").await,
        Err(SessionError::Closed)
    ));
}
