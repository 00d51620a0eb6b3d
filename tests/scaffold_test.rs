// Sanity checks on the files shipped with the repo: the default config and
// the bundled rankings must load with the same code paths the server uses.

use std::path::Path;

use draftroom::{catalog, config};

#[test]
fn shipped_config_loads_and_validates() {
    let config = config::load_config_from(Path::new(".")).unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.pick_duration_seconds, 60);
    assert_eq!(config.roster_cap, 7);
    assert_eq!(config.trend_bonus, 5);
    assert_eq!(config.rankings_path, "data/individual_rankings.csv");
    // The export stays opt-in.
    assert!(config.export_path.is_none());
}

#[test]
fn shipped_rankings_load_as_a_valid_catalog() {
    let catalog = catalog::load("data/individual_rankings.csv").unwrap();

    assert!(!catalog.is_empty());
    // Ranked ascending from 1, ids assigned, no gaps the pool would trip on.
    let athletes = catalog.athletes();
    assert_eq!(athletes[0].rank, 1);
    for (i, athlete) in athletes.iter().enumerate() {
        assert_eq!(athlete.rank as usize, i + 1);
        assert!(athlete.id != 0);
        assert!(!athlete.name.is_empty());
    }
}

#[test]
fn shipped_rankings_cover_a_full_default_draft() {
    let catalog = catalog::load("data/individual_rankings.csv").unwrap();
    let config = config::load_config_from(Path::new(".")).unwrap();

    // Two teams at the default roster cap must fit inside the catalog.
    assert!(catalog.len() >= 2 * config.roster_cap);
}
