// The authoritative draft session: membership, lifecycle, and the turn
// state machine.
//
// One DraftSession exists per room. Every mutating intent is applied here
// by the coordinator, strictly serialized; nothing in this module spawns
// tasks or touches I/O.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::catalog::{Athlete, Catalog};
use crate::draft::pool::AthletePool;
use crate::draft::results::TeamScore;
use crate::draft::{order, results, DraftError};

/// Longest accepted team name, in characters.
pub const MAX_TEAM_NAME_LEN: usize = 40;

/// Session lifecycle. One-way: Lobby -> InProgress -> Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    InProgress,
    Completed,
}

/// A registered team. The `token` is the durable identity handle issued at
/// first join; reconnections are matched back to the same Team through it,
/// never by allocating a new one.
#[derive(Debug, Clone)]
pub struct Team {
    pub name: String,
    pub token: Uuid,
    pub is_host: bool,
    pub connected: bool,
    /// Set when the team is kicked mid-draft. The roster is kept; all
    /// remaining turn slots are forfeited.
    pub kicked: bool,
    pub joined_at: DateTime<Utc>,
}

/// What a successful pick did, for notification fan-out.
#[derive(Debug, Clone)]
pub struct PickOutcome {
    pub team: String,
    pub athlete: Athlete,
    /// True when the engine made the selection on timer expiry.
    pub auto: bool,
    /// True when this pick ended the draft.
    pub completed: bool,
}

/// What a successful kick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KickOutcome {
    /// Lobby kick: the team was removed outright from the pending order.
    RemovedFromLobby,
    /// Mid-draft kick: the team keeps its roster but forfeits future slots.
    Forfeited {
        /// The kicked team was on the clock; its slot was consumed
        /// immediately and the turn moved on.
        was_current: bool,
        /// Forfeiting the remaining slots ended the draft.
        completed: bool,
    },
}

/// The authoritative state of one draft room.
#[derive(Debug)]
pub struct DraftSession {
    catalog: Catalog,
    pool: AthletePool,
    /// Teams in join order; the host is always first.
    teams: Vec<Team>,
    /// The fixed snake pick order (team names), computed once at start.
    pick_order: Vec<String>,
    current_pick: usize,
    phase: Phase,
    results: Option<Vec<TeamScore>>,
    roster_cap: usize,
    trend_bonus: u32,
}

impl DraftSession {
    pub fn new(catalog: Catalog, roster_cap: usize, trend_bonus: u32) -> Self {
        let pool = AthletePool::new(&catalog);
        DraftSession {
            catalog,
            pool,
            teams: Vec::new(),
            pick_order: Vec::new(),
            current_pick: 0,
            phase: Phase::Lobby,
            results: None,
            roster_cap,
            trend_bonus,
        }
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Register a new team. The first successful joiner becomes host.
    pub fn join(&mut self, name: &str) -> Result<Team, DraftError> {
        if self.phase != Phase::Lobby {
            return Err(DraftError::DraftAlreadyStarted);
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(DraftError::NameInvalid("name is empty".to_string()));
        }
        if name.chars().count() > MAX_TEAM_NAME_LEN {
            return Err(DraftError::NameInvalid(format!(
                "name exceeds {MAX_TEAM_NAME_LEN} characters"
            )));
        }
        if name.chars().any(|c| c.is_control()) {
            return Err(DraftError::NameInvalid(
                "name contains control characters".to_string(),
            ));
        }
        // Case-sensitive collision check: "Team" and "team" are distinct.
        if self.teams.iter().any(|t| t.name == name) {
            return Err(DraftError::NameTaken(name.to_string()));
        }

        let team = Team {
            name: name.to_string(),
            token: Uuid::new_v4(),
            is_host: self.teams.is_empty(),
            connected: true,
            kicked: false,
            joined_at: Utc::now(),
        };
        info!(
            "Team '{}' joined{}",
            team.name,
            if team.is_host { " as host" } else { "" }
        );
        self.pool.add_team(&team.name);
        self.teams.push(team.clone());
        Ok(team)
    }

    /// Match a reconnecting participant back to its Team.
    ///
    /// `key` is the identity token issued at join; the display name is
    /// accepted as a fallback. Idempotent: rejoining an already-connected
    /// team is a no-op that returns the same Team.
    pub fn rejoin(&mut self, key: &str) -> Result<Team, DraftError> {
        let key = key.trim();
        let by_token = Uuid::parse_str(key).ok();

        let team = self
            .teams
            .iter_mut()
            .find(|t| by_token.map_or(false, |tok| t.token == tok) || t.name == key)
            .ok_or_else(|| DraftError::NotFound(key.to_string()))?;

        if !team.connected {
            info!("Team '{}' reconnected", team.name);
        }
        team.connected = true;
        Ok(team.clone())
    }

    /// Mark a team as no longer live. Its roster and turn slot are kept for
    /// a later `rejoin`; disconnection is not an error condition.
    pub fn disconnect(&mut self, token: Uuid) {
        if let Some(team) = self.teams.iter_mut().find(|t| t.token == token) {
            if team.connected {
                info!("Team '{}' disconnected", team.name);
            }
            team.connected = false;
        }
    }

    /// Kick a team. Host-only; the host cannot kick itself.
    ///
    /// In the Lobby the target is removed outright. Mid-draft the pick
    /// order stays untouched: the target keeps its roster and its remaining
    /// slots become forfeits the turn machine skips over.
    pub fn kick(&mut self, actor: Uuid, target_name: &str) -> Result<KickOutcome, DraftError> {
        let actor = self
            .teams
            .iter()
            .find(|t| t.token == actor)
            .ok_or_else(|| DraftError::NotFound(actor.to_string()))?;
        if !actor.is_host {
            return Err(DraftError::NotHost);
        }
        if actor.name == target_name {
            return Err(DraftError::TargetIsSelf);
        }

        let target_idx = self
            .teams
            .iter()
            .position(|t| t.name == target_name && !t.kicked)
            .ok_or_else(|| DraftError::TargetNotFound(target_name.to_string()))?;

        if self.phase == Phase::Lobby {
            let removed = self.teams.remove(target_idx);
            self.pool.remove_team(&removed.name);
            info!("Team '{}' kicked from lobby", removed.name);
            return Ok(KickOutcome::RemovedFromLobby);
        }

        let target = &mut self.teams[target_idx];
        target.kicked = true;
        target.connected = false;
        let name = target.name.clone();
        let was_current = self.current_team() == Some(name.as_str());
        info!("Team '{}' kicked mid-draft; remaining slots forfeited", name);

        // If the kicked team is on the clock its slot is forfeited right
        // now rather than at some future turn.
        self.skip_forfeited_slots();
        let completed = self.check_completion();
        Ok(KickOutcome::Forfeited {
            was_current,
            completed,
        })
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team_by_token(&self, token: Uuid) -> Option<&Team> {
        self.teams.iter().find(|t| t.token == token)
    }

    pub fn host(&self) -> Option<&Team> {
        self.teams.iter().find(|t| t.is_host)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Start the draft: compute the snake order from the join-ordered team
    /// list and move to InProgress. Host-only, two-team minimum.
    pub fn start(&mut self, actor: Uuid) -> Result<&[String], DraftError> {
        let actor = self
            .teams
            .iter()
            .find(|t| t.token == actor)
            .ok_or_else(|| DraftError::NotFound(actor.to_string()))?;
        if !actor.is_host {
            return Err(DraftError::NotHost);
        }
        if self.phase != Phase::Lobby {
            return Err(DraftError::AlreadyStarted);
        }
        if self.teams.len() < 2 {
            return Err(DraftError::InsufficientTeams);
        }

        let names: Vec<String> = self.teams.iter().map(|t| t.name.clone()).collect();
        let rounds = order::rounds_for(self.catalog.len(), names.len(), self.roster_cap);
        self.pick_order = order::snake_order(&names, rounds);
        self.current_pick = 0;
        self.phase = Phase::InProgress;
        info!(
            "Draft started: {} teams, {} rounds, {} pick slots",
            names.len(),
            rounds,
            self.pick_order.len()
        );
        Ok(&self.pick_order)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The team currently on the clock. Some exactly while InProgress.
    pub fn current_team(&self) -> Option<&str> {
        if self.phase != Phase::InProgress {
            return None;
        }
        self.pick_order.get(self.current_pick).map(String::as_str)
    }

    /// The next non-forfeited team after the current slot, for display.
    pub fn next_team(&self) -> Option<&str> {
        if self.phase != Phase::InProgress {
            return None;
        }
        self.pick_order[self.current_pick + 1..]
            .iter()
            .find(|name| !self.is_kicked(name))
            .map(String::as_str)
    }

    pub fn pick_order(&self) -> &[String] {
        &self.pick_order
    }

    pub fn current_pick_index(&self) -> usize {
        self.current_pick
    }

    // -----------------------------------------------------------------------
    // Picks
    // -----------------------------------------------------------------------

    /// Submit a pick for the team identified by `actor`.
    ///
    /// Legality: the draft must be in progress, the actor must be the
    /// current team, and the athlete must be in the available pool. On
    /// success the athlete moves to the actor's roster atomically and the
    /// cursor advances exactly once.
    pub fn submit_pick(
        &mut self,
        actor: Uuid,
        athlete_id: u32,
    ) -> Result<PickOutcome, DraftError> {
        if self.phase != Phase::InProgress {
            return Err(DraftError::DraftNotInProgress);
        }
        let team = self
            .teams
            .iter()
            .find(|t| t.token == actor)
            .ok_or_else(|| DraftError::NotFound(actor.to_string()))?;
        if team.kicked || Some(team.name.as_str()) != self.current_team() {
            return Err(DraftError::NotYourTurn);
        }
        let team_name = team.name.clone();
        self.commit_pick(team_name, athlete_id, false)
    }

    /// Engine-forced selection on timer expiry: the highest-ranked (lowest
    /// rank number) available athlete for the team on the clock. Proceeds
    /// exactly as a normal pick afterwards.
    pub fn auto_pick(&mut self) -> Result<PickOutcome, DraftError> {
        if self.phase != Phase::InProgress {
            return Err(DraftError::DraftNotInProgress);
        }
        let team_name = self
            .current_team()
            .ok_or(DraftError::DraftNotInProgress)?
            .to_string();
        let athlete_id = self
            .pool
            .best_available()
            .ok_or(DraftError::AthleteUnavailable)?
            .id;
        self.commit_pick(team_name, athlete_id, true)
    }

    fn commit_pick(
        &mut self,
        team_name: String,
        athlete_id: u32,
        auto: bool,
    ) -> Result<PickOutcome, DraftError> {
        let athlete = self.pool.reserve(athlete_id, &team_name)?;
        info!(
            "Pick #{}: {} -> {}{}",
            self.current_pick + 1,
            athlete.name,
            team_name,
            if auto { " (auto)" } else { "" }
        );

        self.current_pick += 1;
        self.skip_forfeited_slots();
        let completed = self.check_completion();

        Ok(PickOutcome {
            team: team_name,
            athlete,
            auto,
            completed,
        })
    }

    /// Advance past slots belonging to kicked teams. Each skipped slot is
    /// consumed (forfeited), never reassigned.
    fn skip_forfeited_slots(&mut self) {
        while let Some(name) = self.pick_order.get(self.current_pick) {
            if !self.is_kicked(name) {
                break;
            }
            info!("Pick slot #{} forfeited by '{}'", self.current_pick + 1, name);
            self.current_pick += 1;
        }
    }

    fn is_kicked(&self, name: &str) -> bool {
        self.teams.iter().any(|t| t.name == name && t.kicked)
    }

    /// Transition to Completed when the order is exhausted or the pool is
    /// empty. Computes results exactly once.
    fn check_completion(&mut self) -> bool {
        if self.phase != Phase::InProgress {
            return self.phase == Phase::Completed;
        }
        if self.current_pick >= self.pick_order.len() || self.pool.is_exhausted() {
            self.phase = Phase::Completed;
            let names: Vec<String> = self.teams.iter().map(|t| t.name.clone()).collect();
            self.results = Some(results::compute(
                &names,
                &self.pool,
                self.catalog.len(),
                self.trend_bonus,
            ));
            info!("Draft completed after {} pick slots", self.current_pick);
            return true;
        }
        false
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn pool(&self) -> &AthletePool {
        &self.pool
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Final standings; Some exactly once Completed, then immutable.
    pub fn results(&self) -> Option<&[TeamScore]> {
        self.results.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Athlete;

    fn test_catalog(n: u32) -> Catalog {
        let athletes = (1..=n)
            .map(|i| Athlete {
                id: 0,
                name: format!("Athlete {i}"),
                team: "Club".to_string(),
                rank: i,
                trend: "-".to_string(),
            })
            .collect();
        Catalog::from_athletes(athletes).unwrap()
    }

    fn session(n_athletes: u32, roster_cap: usize) -> DraftSession {
        DraftSession::new(test_catalog(n_athletes), roster_cap, 0)
    }

    /// Join n teams named "T1".."Tn"; returns their tokens. T1 is host.
    fn join_teams(s: &mut DraftSession, n: usize) -> Vec<Uuid> {
        (1..=n)
            .map(|i| s.join(&format!("T{i}")).unwrap().token)
            .collect()
    }

    #[test]
    fn first_joiner_is_host_and_only_the_first() {
        let mut s = session(10, 2);
        let a = s.join("Alpha").unwrap();
        let b = s.join("Beta").unwrap();
        assert!(a.is_host);
        assert!(!b.is_host);
        assert_eq!(s.host().unwrap().name, "Alpha");
    }

    #[test]
    fn duplicate_name_rejected_case_sensitively() {
        let mut s = session(10, 2);
        s.join("Alpha").unwrap();
        assert_eq!(
            s.join("Alpha").unwrap_err(),
            DraftError::NameTaken("Alpha".into())
        );
        // Different case is a different name.
        s.join("alpha").unwrap();
    }

    #[test]
    fn invalid_names_rejected() {
        let mut s = session(10, 2);
        assert!(matches!(s.join("   ").unwrap_err(), DraftError::NameInvalid(_)));
        let long = "x".repeat(MAX_TEAM_NAME_LEN + 1);
        assert!(matches!(s.join(&long).unwrap_err(), DraftError::NameInvalid(_)));
        assert!(matches!(s.join("a\nb").unwrap_err(), DraftError::NameInvalid(_)));
    }

    #[test]
    fn join_after_start_rejected() {
        let mut s = session(10, 2);
        let tokens = join_teams(&mut s, 2);
        s.start(tokens[0]).unwrap();
        assert_eq!(s.join("Late").unwrap_err(), DraftError::DraftAlreadyStarted);
    }

    #[test]
    fn rejoin_by_token_and_by_name_returns_same_team() {
        let mut s = session(10, 2);
        let team = s.join("Alpha").unwrap();
        s.disconnect(team.token);
        assert!(!s.teams()[0].connected);

        let by_token = s.rejoin(&team.token.to_string()).unwrap();
        assert_eq!(by_token.token, team.token);
        assert!(by_token.connected);

        s.disconnect(team.token);
        let by_name = s.rejoin("Alpha").unwrap();
        assert_eq!(by_name.token, team.token);
    }

    #[test]
    fn rejoin_is_idempotent() {
        let mut s = session(10, 2);
        let team = s.join("Alpha").unwrap();
        let first = s.rejoin("Alpha").unwrap();
        let second = s.rejoin("Alpha").unwrap();
        assert_eq!(first.token, second.token);
        assert_eq!(first.token, team.token);
    }

    #[test]
    fn rejoin_unknown_is_not_found() {
        let mut s = session(10, 2);
        assert!(matches!(s.rejoin("Ghost").unwrap_err(), DraftError::NotFound(_)));
    }

    #[test]
    fn rejoin_preserves_roster_and_order_slot() {
        let mut s = session(10, 2);
        let tokens = join_teams(&mut s, 2);
        s.start(tokens[0]).unwrap();
        s.submit_pick(tokens[0], 1).unwrap();

        // T2 disconnects with zero picks made and comes back.
        s.disconnect(tokens[1]);
        let restored = s.rejoin("T2").unwrap();
        assert_eq!(restored.token, tokens[1]);
        assert_eq!(s.current_team(), Some("T2"));
        assert!(s.pool().roster_of("T2").is_empty());
        assert_eq!(s.pool().roster_of("T1").len(), 1);
    }

    #[test]
    fn host_flag_survives_disconnect() {
        let mut s = session(10, 2);
        let tokens = join_teams(&mut s, 3);
        s.disconnect(tokens[0]);
        assert_eq!(s.host().unwrap().name, "T1");
        let back = s.rejoin("T1").unwrap();
        assert!(back.is_host);
    }

    #[test]
    fn start_requires_host_and_two_teams() {
        let mut s = session(10, 2);
        let alpha = s.join("Alpha").unwrap();
        assert_eq!(s.start(alpha.token).unwrap_err(), DraftError::InsufficientTeams);

        let beta = s.join("Beta").unwrap();
        assert_eq!(s.start(beta.token).unwrap_err(), DraftError::NotHost);

        s.start(alpha.token).unwrap();
        assert_eq!(s.start(alpha.token).unwrap_err(), DraftError::AlreadyStarted);
    }

    #[test]
    fn start_computes_snake_order_from_join_order() {
        let mut s = session(6, 2);
        let tokens = join_teams(&mut s, 3);
        let order = s.start(tokens[0]).unwrap().to_vec();
        assert_eq!(order, vec!["T1", "T2", "T3", "T3", "T2", "T1"]);
        assert_eq!(s.phase(), Phase::InProgress);
        assert_eq!(s.current_team(), Some("T1"));
    }

    #[test]
    fn pick_legality_checks() {
        let mut s = session(10, 2);
        let tokens = join_teams(&mut s, 2);

        // Before start.
        assert_eq!(
            s.submit_pick(tokens[0], 1).unwrap_err(),
            DraftError::DraftNotInProgress
        );

        s.start(tokens[0]).unwrap();

        // Wrong team.
        assert_eq!(s.submit_pick(tokens[1], 1).unwrap_err(), DraftError::NotYourTurn);

        // Unavailable athlete.
        s.submit_pick(tokens[0], 1).unwrap();
        assert_eq!(
            s.submit_pick(tokens[1], 1).unwrap_err(),
            DraftError::AthleteUnavailable
        );

        // State unchanged by the rejection: still T2's turn, pool intact.
        assert_eq!(s.current_team(), Some("T2"));
        assert_eq!(s.pool().available().len(), 9);
    }

    #[test]
    fn cursor_advances_exactly_once_per_pick() {
        let mut s = session(10, 2);
        let tokens = join_teams(&mut s, 2);
        s.start(tokens[0]).unwrap();
        assert_eq!(s.current_pick_index(), 0);
        s.submit_pick(tokens[0], 3).unwrap();
        assert_eq!(s.current_pick_index(), 1);
    }

    #[test]
    fn partition_invariant_holds_after_every_pick() {
        let mut s = session(8, 2);
        let tokens = join_teams(&mut s, 2);
        s.start(tokens[0]).unwrap();

        let catalog = s.catalog().clone();
        for (token, id) in [(tokens[0], 5), (tokens[1], 1), (tokens[1], 8), (tokens[0], 2)] {
            s.submit_pick(token, id).unwrap();
            assert!(s.pool().partition_holds(&catalog));
        }
    }

    #[test]
    fn auto_pick_takes_lowest_rank_available() {
        let mut s = session(10, 2);
        let tokens = join_teams(&mut s, 2);
        s.start(tokens[0]).unwrap();
        s.submit_pick(tokens[0], 1).unwrap(); // rank 1 gone

        let before = s.current_pick_index();
        let outcome = s.auto_pick().unwrap();
        assert_eq!(outcome.team, "T2");
        assert_eq!(outcome.athlete.rank, 2);
        assert!(outcome.auto);
        assert_eq!(s.current_pick_index(), before + 1);
    }

    #[test]
    fn draft_completes_when_order_exhausted() {
        let mut s = session(10, 2);
        let tokens = join_teams(&mut s, 2);
        s.start(tokens[0]).unwrap();

        // Snake for 2 teams, 2 rounds: T1 T2 T2 T1.
        s.submit_pick(tokens[0], 1).unwrap();
        s.submit_pick(tokens[1], 2).unwrap();
        s.submit_pick(tokens[1], 3).unwrap();
        let last = s.submit_pick(tokens[0], 4).unwrap();

        assert!(last.completed);
        assert_eq!(s.phase(), Phase::Completed);
        assert!(s.current_team().is_none());
        assert!(s.results().is_some());
    }

    #[test]
    fn draft_completes_when_pool_exhausted() {
        // 3 athletes, 2 teams, cap 2 -> ceil(3/2) = 2 rounds, 4 slots, but
        // only 3 athletes exist.
        let mut s = session(3, 2);
        let tokens = join_teams(&mut s, 2);
        s.start(tokens[0]).unwrap();
        assert_eq!(s.pick_order().len(), 4);

        s.submit_pick(tokens[0], 1).unwrap();
        s.submit_pick(tokens[1], 2).unwrap();
        let last = s.submit_pick(tokens[1], 3).unwrap();
        assert!(last.completed);
        assert_eq!(s.phase(), Phase::Completed);
    }

    #[test]
    fn results_are_immutable_once_computed() {
        let mut s = session(4, 2);
        let tokens = join_teams(&mut s, 2);
        s.start(tokens[0]).unwrap();
        for (token, id) in [(tokens[0], 1), (tokens[1], 2), (tokens[1], 3), (tokens[0], 4)] {
            s.submit_pick(token, id).unwrap();
        }
        let first = s.results().unwrap().to_vec();
        let second = s.results().unwrap().to_vec();
        assert_eq!(first, second);
        // T1 drafted ranks 1 and 4 (4+1), T2 ranks 2 and 3 (3+2): a tie,
        // broken by join order in T1's favor.
        assert_eq!(first[0].team, "T1");
    }

    #[test]
    fn lobby_kick_removes_team_outright() {
        let mut s = session(10, 2);
        let tokens = join_teams(&mut s, 3);
        let outcome = s.kick(tokens[0], "T2").unwrap();
        assert_eq!(outcome, KickOutcome::RemovedFromLobby);
        assert_eq!(s.teams().len(), 2);
        // The name is free again.
        s.join("T2").unwrap();
    }

    #[test]
    fn kick_requires_host_and_forbids_self() {
        let mut s = session(10, 2);
        let tokens = join_teams(&mut s, 2);
        assert_eq!(s.kick(tokens[1], "T1").unwrap_err(), DraftError::NotHost);
        assert_eq!(s.kick(tokens[0], "T1").unwrap_err(), DraftError::TargetIsSelf);
        assert!(matches!(
            s.kick(tokens[0], "Ghost").unwrap_err(),
            DraftError::TargetNotFound(_)
        ));
    }

    #[test]
    fn mid_draft_kick_keeps_roster_and_forfeits_turns() {
        let mut s = session(12, 2);
        let tokens = join_teams(&mut s, 3);
        s.start(tokens[0]).unwrap();
        // Order: T1 T2 T3 T3 T2 T1.
        s.submit_pick(tokens[0], 1).unwrap();
        s.submit_pick(tokens[1], 2).unwrap();

        // Kick T2 (not current). Its roster survives.
        let outcome = s.kick(tokens[0], "T2").unwrap();
        assert_eq!(
            outcome,
            KickOutcome::Forfeited { was_current: false, completed: false }
        );
        assert_eq!(s.pool().roster_of("T2").len(), 1);

        // T3 picks twice; T2's round-2 slot is then skipped straight to T1.
        s.submit_pick(tokens[2], 3).unwrap();
        s.submit_pick(tokens[2], 4).unwrap();
        assert_eq!(s.current_team(), Some("T1"));

        let last = s.submit_pick(tokens[0], 5).unwrap();
        assert!(last.completed);
        // Forfeited slot consumed, not reassigned: T2 still has one athlete.
        assert_eq!(s.pool().roster_of("T2").len(), 1);
        assert_eq!(s.pool().roster_of("T1").len(), 2);
        assert_eq!(s.pool().roster_of("T3").len(), 2);
    }

    #[test]
    fn kicking_current_team_forfeits_immediately() {
        let mut s = session(12, 2);
        let tokens = join_teams(&mut s, 3);
        s.start(tokens[0]).unwrap();
        s.submit_pick(tokens[0], 1).unwrap();
        assert_eq!(s.current_team(), Some("T2"));

        let outcome = s.kick(tokens[0], "T2").unwrap();
        assert_eq!(
            outcome,
            KickOutcome::Forfeited { was_current: true, completed: false }
        );
        assert_eq!(s.current_team(), Some("T3"));
        // A pick from the kicked team is now rejected.
        assert_eq!(s.submit_pick(tokens[1], 5).unwrap_err(), DraftError::NotYourTurn);
    }

    #[test]
    fn kick_consuming_all_remaining_slots_completes_draft() {
        let mut s = session(10, 1);
        let tokens = join_teams(&mut s, 2);
        s.start(tokens[0]).unwrap();
        // One round: T1 T2.
        s.submit_pick(tokens[0], 1).unwrap();
        let outcome = s.kick(tokens[0], "T2").unwrap();
        assert_eq!(
            outcome,
            KickOutcome::Forfeited { was_current: true, completed: true }
        );
        assert_eq!(s.phase(), Phase::Completed);
        assert!(s.results().is_some());
    }

    /// The end-to-end scenario from the core contract: two teams, snake
    /// order [A,B,B,A], one human pick, one timeout auto-pick, completion.
    #[test]
    fn two_team_scenario_with_auto_pick() {
        let mut s = session(4, 2);
        let a = s.join("A").unwrap().token;
        let b = s.join("B").unwrap().token;

        let order = s.start(a).unwrap().to_vec();
        assert_eq!(order, vec!["A", "B", "B", "A"]);

        // A picks rank 1.
        s.submit_pick(a, 1).unwrap();
        assert_eq!(s.current_team(), Some("B"));

        // B's timer expires; engine picks rank 2 for B.
        let auto = s.auto_pick().unwrap();
        assert_eq!(auto.team, "B");
        assert_eq!(auto.athlete.rank, 2);

        // Round 2 reversed keeps B on the clock.
        assert_eq!(s.current_team(), Some("B"));
        s.submit_pick(b, 3).unwrap();
        let last = s.submit_pick(a, 4).unwrap();
        assert!(last.completed);

        let results = s.results().unwrap();
        assert_eq!(results.len(), 2);
        // A holds ranks 1+4 (4+1=5), B holds 2+3 (3+2=5): tie, join order
        // puts A first.
        assert_eq!(results[0].team, "A");
    }
}
