// Projected rankings from final rosters.
//
// Runs once, on the transition to Completed, and the output is immutable
// for the rest of the session. Scoring is a deterministic function of
// roster contents: rank-weighted points plus a configurable bonus for
// athletes trending upward.

use serde::Serialize;

use crate::catalog::Athlete;
use crate::draft::pool::AthletePool;

/// One row of the projected rankings: total points for a team's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamScore {
    pub team: String,
    pub points: u32,
}

/// Compute projected rankings for the given teams (in join order).
///
/// Points per athlete: `catalog_size - rank + 1`, so the top-ranked athlete
/// is worth the full catalog size and the bottom one is worth 1, plus
/// `trend_bonus` when the athlete's trend marker is rising. Output is
/// sorted descending by points; ties keep join order (stable sort).
pub fn compute(
    teams_in_join_order: &[String],
    pool: &AthletePool,
    catalog_size: usize,
    trend_bonus: u32,
) -> Vec<TeamScore> {
    let mut scores: Vec<TeamScore> = teams_in_join_order
        .iter()
        .map(|team| TeamScore {
            team: team.clone(),
            points: pool
                .roster_of(team)
                .iter()
                .map(|a| athlete_points(a, catalog_size, trend_bonus))
                .sum(),
        })
        .collect();

    scores.sort_by(|a, b| b.points.cmp(&a.points));
    scores
}

fn athlete_points(athlete: &Athlete, catalog_size: usize, trend_bonus: u32) -> u32 {
    let base = (catalog_size as u32).saturating_sub(athlete.rank) + 1;
    if is_rising(&athlete.trend) {
        base + trend_bonus
    } else {
        base
    }
}

/// Whether a trend marker counts as "rising". Rankings exports are not
/// consistent about the symbol, so accept the common spellings.
fn is_rising(trend: &str) -> bool {
    matches!(trend.trim(), "up" | "Up" | "UP" | "+" | "↑" | "▲")
}
