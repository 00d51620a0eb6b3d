// Session coordinator: the single writer for one draft room.
//
// Every inbound intent (connection events, parsed commands, and the pick
// clock's expiry) is applied on this loop, one at a time. A timer expiry
// and a human pick for the same slot therefore cannot both commit: whichever
// the loop admits first wins and the loser gets an ordinary rejection.
// Outbound fan-out is fire-and-forget; a slow participant drops pushes
// rather than stalling mutations.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::draft::session::{DraftSession, KickOutcome, Phase, PickOutcome};
use crate::draft::DraftError;
use crate::export;
use crate::protocol::{ClientCommand, ServerPush, SessionSnapshot, TeamInfo};
use crate::ws_server::{ConnEvent, ConnId};

/// Cadence of pick-clock broadcasts and expiry checks.
pub const TIMER_TICK: Duration = Duration::from_secs(1);

struct Connection {
    outbound: mpsc::Sender<String>,
    addr: String,
    /// The team this connection authenticated as, once it joined/rejoined.
    identity: Option<Uuid>,
}

/// Owns the session and serializes every mutation against it.
pub struct Coordinator {
    session: DraftSession,
    config: Config,
    conns: HashMap<ConnId, Connection>,
    /// When the current turn's clock runs out. None outside InProgress.
    deadline: Option<Instant>,
}

impl Coordinator {
    pub fn new(session: DraftSession, config: Config) -> Self {
        Coordinator {
            session,
            config,
            conns: HashMap::new(),
            deadline: None,
        }
    }

    /// Run the coordinator loop until the transport channel closes.
    pub async fn run(mut self, mut rx: mpsc::Receiver<ConnEvent>) -> anyhow::Result<()> {
        info!("Session coordinator started");

        let mut ticker = tokio::time::interval(TIMER_TICK);
        // The first tick completes immediately; consume it so clock
        // broadcasts start one full tick after the loop does.
        ticker.tick().await;

        loop {
            tokio::select! {
                event = rx.recv() => {
                    match event {
                        Some(event) => self.handle_event(event),
                        None => {
                            info!("Transport channel closed, coordinator shutting down");
                            break;
                        }
                    }
                }
                _ = ticker.tick() => {
                    self.handle_tick();
                }
            }
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Event handling
    // -----------------------------------------------------------------------

    fn handle_event(&mut self, event: ConnEvent) {
        match event {
            ConnEvent::Connected { conn_id, addr, outbound } => {
                debug!("Connection {conn_id} registered ({addr})");
                self.conns.insert(
                    conn_id,
                    Connection {
                        outbound,
                        addr,
                        identity: None,
                    },
                );
                // A fresh connection gets the current state right away so
                // reloading clients render without an extra round trip.
                self.send_to(conn_id, &ServerPush::StateSnapshot {
                    snapshot: self.snapshot(),
                });
            }
            ConnEvent::Disconnected { conn_id } => {
                if let Some(conn) = self.conns.remove(&conn_id) {
                    debug!("Connection {conn_id} deregistered ({})", conn.addr);
                    if let Some(token) = conn.identity {
                        // Another tab may still hold the same identity.
                        let still_live = self
                            .conns
                            .values()
                            .any(|c| c.identity == Some(token));
                        if !still_live {
                            self.session.disconnect(token);
                            self.broadcast_team_list();
                        }
                    }
                }
            }
            ConnEvent::Command { conn_id, text } => {
                match serde_json::from_str::<ClientCommand>(&text) {
                    Ok(command) => self.handle_command(conn_id, command),
                    Err(e) => {
                        warn!("Unparseable command on connection {conn_id}: {e}");
                        self.send_to(conn_id, &ServerPush::Error {
                            kind: "bad_request".to_string(),
                            message: format!("unrecognized command: {e}"),
                        });
                    }
                }
            }
        }
    }

    fn handle_command(&mut self, conn_id: ConnId, command: ClientCommand) {
        let result = match command {
            ClientCommand::Join { name } => self.cmd_join(conn_id, &name),
            ClientCommand::Rejoin { identity } => self.cmd_rejoin(conn_id, &identity),
            ClientCommand::StartDraft => self.cmd_start(conn_id),
            ClientCommand::KickTeam { target_name } => self.cmd_kick(conn_id, &target_name),
            ClientCommand::MakePick { athlete_id } => self.cmd_pick(conn_id, athlete_id),
            ClientCommand::GetState => {
                self.send_to(conn_id, &ServerPush::StateSnapshot {
                    snapshot: self.snapshot(),
                });
                Ok(())
            }
            ClientCommand::GetResults => self.cmd_results(conn_id),
        };

        // The command failed: the session is untouched, the caller alone
        // hears about it.
        if let Err(err) = result {
            self.send_to(conn_id, &ServerPush::from_error(&err));
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    fn cmd_join(&mut self, conn_id: ConnId, name: &str) -> Result<(), DraftError> {
        let team = self.session.join(name)?;
        self.bind(conn_id, team.token);
        self.send_to(conn_id, &ServerPush::Joined {
            team_name: team.name.clone(),
            token: team.token,
            is_host: team.is_host,
        });
        self.broadcast_team_list();
        Ok(())
    }

    fn cmd_rejoin(&mut self, conn_id: ConnId, identity: &str) -> Result<(), DraftError> {
        let team = self.session.rejoin(identity)?;
        self.bind(conn_id, team.token);
        self.send_to(conn_id, &ServerPush::Joined {
            team_name: team.name.clone(),
            token: team.token,
            is_host: team.is_host,
        });
        self.send_to(conn_id, &ServerPush::StateSnapshot {
            snapshot: self.snapshot(),
        });
        self.broadcast_team_list();
        Ok(())
    }

    fn cmd_start(&mut self, conn_id: ConnId) -> Result<(), DraftError> {
        let actor = self.actor(conn_id)?;
        let pick_order = self.session.start(actor)?.to_vec();
        self.arm_timer();
        self.broadcast(&ServerPush::DraftStarted { pick_order });
        self.broadcast_snapshot();
        Ok(())
    }

    fn cmd_kick(&mut self, conn_id: ConnId, target_name: &str) -> Result<(), DraftError> {
        let actor = self.actor(conn_id)?;
        let target_token = self
            .session
            .teams()
            .iter()
            .find(|t| t.name == target_name)
            .map(|t| t.token);

        let outcome = self.session.kick(actor, target_name)?;
        self.broadcast(&ServerPush::TeamKicked {
            team: target_name.to_string(),
        });
        self.broadcast_team_list();

        match outcome {
            KickOutcome::RemovedFromLobby => {
                // The membership no longer knows this identity; unbind any
                // connection still carrying it.
                if let Some(token) = target_token {
                    for conn in self.conns.values_mut() {
                        if conn.identity == Some(token) {
                            conn.identity = None;
                        }
                    }
                }
            }
            KickOutcome::Forfeited { was_current, completed } => {
                if completed {
                    self.finish_draft();
                } else if was_current {
                    // The clock restarts for whoever is now on the clock.
                    self.arm_timer();
                }
            }
        }
        self.broadcast_snapshot();
        Ok(())
    }

    fn cmd_pick(&mut self, conn_id: ConnId, athlete_id: u32) -> Result<(), DraftError> {
        let actor = self.actor(conn_id)?;
        let outcome = self.session.submit_pick(actor, athlete_id)?;
        self.after_pick(outcome);
        Ok(())
    }

    fn cmd_results(&mut self, conn_id: ConnId) -> Result<(), DraftError> {
        // Results exist exactly once Completed and never change after.
        let standings = self
            .session
            .results()
            .ok_or(DraftError::DraftNotInProgress)?
            .to_vec();
        let push = ServerPush::Results {
            standings,
            rosters: self.rosters_by_team(),
        };
        self.send_to(conn_id, &push);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pick clock
    // -----------------------------------------------------------------------

    fn handle_tick(&mut self) {
        if self.session.phase() != Phase::InProgress {
            return;
        }
        let Some(deadline) = self.deadline else {
            return;
        };

        let now = Instant::now();
        if now >= deadline {
            // Expiry is just another serialized intent on this loop; a pick
            // that landed before this tick already moved the deadline.
            match self.session.auto_pick() {
                Ok(outcome) => self.after_pick(outcome),
                Err(e) => {
                    warn!("Auto-pick failed: {e}");
                    self.deadline = None;
                }
            }
        } else {
            let seconds = (deadline - now).as_secs();
            self.broadcast(&ServerPush::TimeRemaining { seconds });
        }
    }

    fn arm_timer(&mut self) {
        self.deadline =
            Some(Instant::now() + Duration::from_secs(self.config.pick_duration_seconds));
    }

    fn after_pick(&mut self, outcome: PickOutcome) {
        if outcome.auto {
            self.broadcast(&ServerPush::AutoPick {
                team: outcome.team.clone(),
                athlete: outcome.athlete.clone(),
            });
        }
        if outcome.completed {
            self.finish_draft();
        } else {
            self.arm_timer();
        }
        self.broadcast_snapshot();
    }

    fn finish_draft(&mut self) {
        self.deadline = None;

        if let Some(standings) = self.session.results() {
            let push = ServerPush::Results {
                standings: standings.to_vec(),
                rosters: self.rosters_by_team(),
            };
            self.broadcast(&push);
        }

        if let Some(path) = self.config.export_path.clone() {
            match export::write_rosters(&path, &self.session) {
                Ok(()) => info!("Final rosters exported to {path}"),
                Err(e) => warn!("Roster export failed: {e}"),
            }
        }
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    /// The team identity bound to a connection. Commands that require an
    /// identity fail cleanly when the connection never joined.
    fn actor(&self, conn_id: ConnId) -> Result<Uuid, DraftError> {
        self.conns
            .get(&conn_id)
            .and_then(|c| c.identity)
            .ok_or_else(|| DraftError::NotFound("connection has no team".to_string()))
    }

    fn bind(&mut self, conn_id: ConnId, token: Uuid) {
        if let Some(conn) = self.conns.get_mut(&conn_id) {
            conn.identity = Some(token);
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.session, self.time_remaining())
    }

    fn time_remaining(&self) -> Option<u64> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()).as_secs())
    }

    fn rosters_by_team(&self) -> std::collections::BTreeMap<String, Vec<crate::catalog::Athlete>> {
        self.session
            .teams()
            .iter()
            .map(|t| {
                (
                    t.name.clone(),
                    self.session.pool().roster_of(&t.name).to_vec(),
                )
            })
            .collect()
    }

    fn broadcast_team_list(&mut self) {
        let push = ServerPush::TeamList {
            teams: self.session.teams().iter().map(TeamInfo::from).collect(),
        };
        self.broadcast(&push);
    }

    fn broadcast_snapshot(&mut self) {
        let push = ServerPush::StateSnapshot {
            snapshot: self.snapshot(),
        };
        self.broadcast(&push);
    }

    /// Queue a push on every connection. `try_send` only: a full or dead
    /// queue drops this push for that participant, and the next snapshot
    /// brings them back in sync.
    fn broadcast(&mut self, push: &ServerPush) {
        let frame = push.to_json();
        for (conn_id, conn) in &self.conns {
            if conn.outbound.try_send(frame.clone()).is_err() {
                debug!("Dropping push for lagging connection {conn_id}");
            }
        }
    }

    fn send_to(&mut self, conn_id: ConnId, push: &ServerPush) {
        if let Some(conn) = self.conns.get(&conn_id) {
            if conn.outbound.try_send(push.to_json()).is_err() {
                debug!("Dropping reply for lagging connection {conn_id}");
            }
        }
    }
}
