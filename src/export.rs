// Results export: final rosters as CSV.
//
// A read-only consumer of the post-completion state; nothing here mutates
// the session. The file is written once, when the draft completes.

use std::path::Path;

use crate::draft::session::DraftSession;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to create export directory {path}: {source}")]
    Dir {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write export file {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// Write every team's final roster to a CSV at `path`, one row per pick.
/// Teams appear in standings order; rosters in pick order.
pub fn write_rosters(path: impl AsRef<Path>, session: &DraftSession) -> Result<(), ExportError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ExportError::Dir {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| ExportError::Csv {
        path: path_str.clone(),
        source: e,
    })?;

    let csv_err = |e| ExportError::Csv {
        path: path_str.clone(),
        source: e,
    };

    writer
        .write_record(["Team", "Points", "Pick", "Rank", "Name", "Club", "Trend"])
        .map_err(csv_err)?;

    // Standings order when results exist; join order otherwise (the export
    // only runs post-completion, so the fallback covers tests at most).
    let order: Vec<(String, Option<u32>)> = match session.results() {
        Some(standings) => standings
            .iter()
            .map(|s| (s.team.clone(), Some(s.points)))
            .collect(),
        None => session
            .teams()
            .iter()
            .map(|t| (t.name.clone(), None))
            .collect(),
    };

    for (team, points) in order {
        let points = points.map(|p| p.to_string()).unwrap_or_default();
        for (i, athlete) in session.pool().roster_of(&team).iter().enumerate() {
            writer
                .write_record([
                    team.as_str(),
                    points.as_str(),
                    &(i + 1).to_string(),
                    &athlete.rank.to_string(),
                    athlete.name.as_str(),
                    athlete.team.as_str(),
                    athlete.trend.as_str(),
                ])
                .map_err(csv_err)?;
        }
    }

    writer.flush().map_err(|e| ExportError::Csv {
        path: path_str.clone(),
        source: csv::Error::from(e),
    })?;
    Ok(())
}
