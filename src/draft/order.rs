// Snake draft order generation.
//
// The order is a deterministic, pure function of the team list in join order
// (host first). It is computed exactly once, at the Lobby -> InProgress
// transition, and never recomputed afterwards; mid-draft membership changes
// are handled by forfeiting slots, not by touching the order.

/// Compute the number of rounds: one roster slot per team per round, capped
/// by `roster_cap` and by how many athletes the catalog can actually supply.
pub fn rounds_for(catalog_size: usize, num_teams: usize, roster_cap: usize) -> usize {
    if num_teams == 0 {
        return 0;
    }
    let supply_rounds = catalog_size.div_ceil(num_teams);
    supply_rounds.min(roster_cap)
}

/// Produce the full snake pick order for the given teams and round count.
///
/// Round r (1-indexed) visits teams in forward order when r is odd and in
/// reverse order when r is even, so early picks in one round become late
/// picks in the next.
pub fn snake_order(teams: &[String], rounds: usize) -> Vec<String> {
    let mut order = Vec::with_capacity(teams.len() * rounds);
    for round in 0..rounds {
        if round % 2 == 0 {
            order.extend(teams.iter().cloned());
        } else {
            order.extend(teams.iter().rev().cloned());
        }
    }
    order
}
