// Athlete catalog loading and validation.
//
// Reads the rankings CSV (Rank,Name,Team,Trend columns) into an immutable
// ranked pool. The catalog is loaded once per session; every athlete the
// draft ever touches comes from here.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A single draftable athlete. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    /// Stable numeric id assigned at load time (1-based catalog position).
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Source-team label (the real-world team the athlete plays for).
    pub team: String,
    /// Overall ranking; lower is better. Unique within the catalog.
    pub rank: u32,
    /// Trend indicator from the rankings source (e.g. "up", "down", "-").
    pub trend: String,
}

/// The full ranked athlete pool, sorted ascending by rank.
#[derive(Debug, Clone)]
pub struct Catalog {
    athletes: Vec<Athlete>,
}

impl Catalog {
    /// Number of athletes in the catalog.
    pub fn len(&self) -> usize {
        self.athletes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.athletes.is_empty()
    }

    /// All athletes, ranked ascending.
    pub fn athletes(&self) -> &[Athlete] {
        &self.athletes
    }

    /// Build a catalog from pre-validated athletes (used by tests and the
    /// pool). Sorts by rank and assigns ids when callers left them zero.
    pub fn from_athletes(mut athletes: Vec<Athlete>) -> Result<Self, CatalogError> {
        athletes.sort_by_key(|a| a.rank);
        for (i, athlete) in athletes.iter_mut().enumerate() {
            if athlete.id == 0 {
                athlete.id = (i + 1) as u32;
            }
        }
        validate(&athletes)?;
        Ok(Catalog { athletes })
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read rankings file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// Rankings CSV row. Column names match the source export exactly.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawRankingRow {
    Rank: u32,
    Name: String,
    #[serde(default)]
    Team: String,
    #[serde(default)]
    Trend: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load the athlete catalog from a rankings CSV file.
pub fn load(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let mut contents = String::new();
    std::fs::File::open(path)
        .and_then(|mut f| f.read_to_string(&mut contents))
        .map_err(|e| CatalogError::Io {
            path: path_str.clone(),
            source: e,
        })?;

    let catalog = parse_csv(&contents, &path_str)?;
    info!("Loaded {} athletes from {}", catalog.len(), path_str);
    Ok(catalog)
}

/// Parse rankings CSV content. Split out from `load` so tests can feed
/// in-memory strings without touching the filesystem.
pub fn parse_csv(contents: &str, path: &str) -> Result<Catalog, CatalogError> {
    let mut reader = csv::Reader::from_reader(contents.as_bytes());
    let mut athletes = Vec::new();

    for row in reader.deserialize::<RawRankingRow>() {
        let row = row.map_err(|e| CatalogError::Csv {
            path: path.to_string(),
            source: e,
        })?;
        athletes.push(Athlete {
            id: 0, // assigned after sorting
            name: row.Name.trim().to_string(),
            team: row.Team.trim().to_string(),
            rank: row.Rank,
            trend: row.Trend.trim().to_string(),
        });
    }

    Catalog::from_athletes(athletes)
}

fn validate(athletes: &[Athlete]) -> Result<(), CatalogError> {
    if athletes.is_empty() {
        return Err(CatalogError::Validation(
            "rankings file contains no athletes".to_string(),
        ));
    }

    for athlete in athletes {
        if athlete.name.is_empty() {
            return Err(CatalogError::Validation(format!(
                "athlete with rank {} has an empty name",
                athlete.rank
            )));
        }
    }

    // Ranks are sorted at this point, so duplicates are adjacent.
    for pair in athletes.windows(2) {
        if pair[0].rank == pair[1].rank {
            return Err(CatalogError::Validation(format!(
                "duplicate rank {}: '{}' and '{}'",
                pair[0].rank, pair[0].name, pair[1].name
            )));
        }
    }

    Ok(())
}
