// Wire protocol between clients and the session coordinator.
//
// Commands arrive as tagged JSON text frames; pushes go out the same way.
// The transport layer never inspects these; parsing happens inside the
// coordinator so a malformed frame is just another rejected command.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Athlete;
use crate::draft::results::TeamScore;
use crate::draft::session::{DraftSession, Phase, Team};
use crate::draft::DraftError;

// ---------------------------------------------------------------------------
// Inbound commands
// ---------------------------------------------------------------------------

/// Everything a client may ask of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Register a new team. The first successful join becomes host.
    Join { name: String },
    /// Reattach to an existing team by identity token (preferred) or name.
    Rejoin {
        #[serde(alias = "name", alias = "token")]
        identity: String,
    },
    /// Host-only: compute the order and begin the draft.
    StartDraft,
    /// Host-only: remove a team (lobby) or forfeit its turns (mid-draft).
    KickTeam { target_name: String },
    /// Claim an athlete for the caller's team.
    MakePick { athlete_id: u32 },
    /// Request a full state snapshot (also used after page refresh).
    GetState,
    /// Request the final standings (valid once the draft completed).
    GetResults,
}

// ---------------------------------------------------------------------------
// Outbound pushes
// ---------------------------------------------------------------------------

/// A team as shown to participants. The identity token is deliberately not
/// part of this: it is private to its owner and only travels in `Joined`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamInfo {
    pub name: String,
    pub is_host: bool,
    pub connected: bool,
    pub kicked: bool,
}

impl From<&Team> for TeamInfo {
    fn from(team: &Team) -> Self {
        TeamInfo {
            name: team.name.clone(),
            is_host: team.is_host,
            connected: team.connected,
            kicked: team.kicked,
        }
    }
}

/// One consistent view of the whole session, pushed after every successful
/// mutation and on demand for `get_state`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub teams: Vec<TeamInfo>,
    /// The full snake pick order (empty until the draft starts).
    pub pick_order: Vec<String>,
    pub current_pick_index: usize,
    pub current_team: Option<String>,
    pub next_team: Option<String>,
    /// Undrafted athletes, ranked ascending.
    pub available_athletes: Vec<Athlete>,
    /// Every team's roster in pick order.
    pub team_rosters: BTreeMap<String, Vec<Athlete>>,
    /// Seconds left on the pick clock, while a turn is running.
    pub time_remaining: Option<u64>,
    /// Final standings once the draft completed.
    pub results: Option<Vec<TeamScore>>,
}

impl SessionSnapshot {
    /// Capture the session's current state. Pure read; the coordinator
    /// supplies the timer reading since the clock lives there.
    pub fn capture(session: &DraftSession, time_remaining: Option<u64>) -> Self {
        let team_rosters = session
            .teams()
            .iter()
            .map(|t| (t.name.clone(), session.pool().roster_of(&t.name).to_vec()))
            .collect();

        SessionSnapshot {
            phase: session.phase(),
            teams: session.teams().iter().map(TeamInfo::from).collect(),
            pick_order: session.pick_order().to_vec(),
            current_pick_index: session.current_pick_index(),
            current_team: session.current_team().map(str::to_string),
            next_team: session.next_team().map(str::to_string),
            available_athletes: session.pool().available().to_vec(),
            team_rosters,
            time_remaining,
            results: session.results().map(<[TeamScore]>::to_vec),
        }
    }
}

/// Server-to-client pushes.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerPush {
    /// Ack for a successful join; the token is the durable rejoin handle.
    Joined {
        team_name: String,
        token: Uuid,
        is_host: bool,
    },
    /// Membership changed.
    TeamList { teams: Vec<TeamInfo> },
    /// The draft began; carries the computed snake order.
    DraftStarted { pick_order: Vec<String> },
    /// Full state after a successful mutation or on request.
    StateSnapshot { snapshot: SessionSnapshot },
    /// Periodic pick-clock reading while a turn is running.
    TimeRemaining { seconds: u64 },
    /// The engine made a forced selection on timer expiry.
    AutoPick { team: String, athlete: Athlete },
    /// A team was kicked by the host.
    TeamKicked { team: String },
    /// Final rosters and projected standings.
    Results {
        standings: Vec<TeamScore>,
        rosters: BTreeMap<String, Vec<Athlete>>,
    },
    /// A command was rejected. `kind` is the stable machine-readable code.
    Error { kind: String, message: String },
}

impl ServerPush {
    pub fn from_error(err: &DraftError) -> Self {
        ServerPush::Error {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }

    /// Serialize to a text frame. Serialization of these types cannot fail;
    /// the fallback keeps the transport path infallible.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize push: {e}");
            r#"{"type":"error","kind":"internal","message":"serialization failure"}"#.to_string()
        })
    }
}
