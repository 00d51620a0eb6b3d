// Roster and availability store.
//
// Partitions the athlete catalog into "available" and "owned by team X".
// `reserve` is the only mutator that moves an athlete across the partition;
// it is called by the session state machine and never by external actors.

use std::collections::HashMap;

use crate::catalog::{Athlete, Catalog};
use crate::draft::DraftError;

/// The available/owned partition of the athlete catalog.
#[derive(Debug, Clone)]
pub struct AthletePool {
    /// Unowned athletes, sorted ascending by rank.
    available: Vec<Athlete>,
    /// Per-team rosters in pick order, keyed by team name.
    rosters: HashMap<String, Vec<Athlete>>,
}

impl AthletePool {
    /// Create a pool with the full catalog available and no rosters.
    pub fn new(catalog: &Catalog) -> Self {
        AthletePool {
            available: catalog.athletes().to_vec(),
            rosters: HashMap::new(),
        }
    }

    /// Register an empty roster for a newly joined team.
    pub fn add_team(&mut self, team: &str) {
        self.rosters.entry(team.to_string()).or_default();
    }

    /// Remove a team's roster entirely (lobby kick). Any athletes it held
    /// are returned to the available list to keep the partition intact.
    pub fn remove_team(&mut self, team: &str) {
        if let Some(roster) = self.rosters.remove(team) {
            self.available.extend(roster);
            self.available.sort_by_key(|a| a.rank);
        }
    }

    /// Move an athlete from the available list to `team`'s roster.
    ///
    /// The single mutation point for the partition invariant: the athlete is
    /// removed and appended in one step, so no observable state ever shows
    /// it in both places or in neither.
    pub fn reserve(&mut self, athlete_id: u32, team: &str) -> Result<Athlete, DraftError> {
        let idx = self
            .available
            .iter()
            .position(|a| a.id == athlete_id)
            .ok_or(DraftError::AthleteUnavailable)?;
        let athlete = self.available.remove(idx);
        self.rosters
            .entry(team.to_string())
            .or_default()
            .push(athlete.clone());
        Ok(athlete)
    }

    /// Unowned athletes, ranked ascending.
    pub fn available(&self) -> &[Athlete] {
        &self.available
    }

    /// The highest-ranked (lowest rank number) available athlete. This is
    /// the deterministic auto-pick fallback.
    pub fn best_available(&self) -> Option<&Athlete> {
        self.available.first()
    }

    /// A team's roster in pick order. Empty slice for unknown teams.
    pub fn roster_of(&self, team: &str) -> &[Athlete] {
        self.rosters.get(team).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All rosters, keyed by team name.
    pub fn rosters(&self) -> &HashMap<String, Vec<Athlete>> {
        &self.rosters
    }

    /// Whether every athlete has been drafted.
    pub fn is_exhausted(&self) -> bool {
        self.available.is_empty()
    }

    /// Verify the partition invariant against the originating catalog: the
    /// union of available and all rosters equals the catalog, with no
    /// athlete appearing twice. Test support; cheap enough to call after
    /// every mutation in the suite.
    pub fn partition_holds(&self, catalog: &Catalog) -> bool {
        let mut seen = std::collections::HashSet::new();
        for athlete in self
            .available
            .iter()
            .chain(self.rosters.values().flatten())
        {
            if !seen.insert(athlete.id) {
                return false;
            }
        }
        seen.len() == catalog.len() && catalog.athletes().iter().all(|a| seen.contains(&a.id))
    }
}
