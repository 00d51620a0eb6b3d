// Draft domain: order generation, the available/owned partition, the
// session state machine, and results scoring.

pub mod order;
pub mod pool;
pub mod results;
pub mod session;

use thiserror::Error;

/// Everything that can go wrong at the command boundary.
///
/// Every variant is recoverable: the offending command is rejected with the
/// specific kind and session state is left untouched. Disconnection is not
/// an error and does not appear here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("team name '{0}' is already taken")]
    NameTaken(String),

    #[error("invalid team name: {0}")]
    NameInvalid(String),

    #[error("cannot join: the draft has already started")]
    DraftAlreadyStarted,

    #[error("no team found for '{0}'")]
    NotFound(String),

    #[error("only the host may do that")]
    NotHost,

    #[error("no team named '{0}'")]
    TargetNotFound(String),

    #[error("the host cannot kick itself")]
    TargetIsSelf,

    #[error("at least two teams are required to start the draft")]
    InsufficientTeams,

    #[error("the draft has already started")]
    AlreadyStarted,

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("that athlete is not available")]
    AthleteUnavailable,

    #[error("the draft is not in progress")]
    DraftNotInProgress,
}

impl DraftError {
    /// Stable wire code for the `error` push. Snake_case, never reworded.
    pub fn kind(&self) -> &'static str {
        match self {
            DraftError::NameTaken(_) => "name_taken",
            DraftError::NameInvalid(_) => "name_invalid",
            DraftError::DraftAlreadyStarted => "draft_already_started",
            DraftError::NotFound(_) => "not_found",
            DraftError::NotHost => "not_host",
            DraftError::TargetNotFound(_) => "target_not_found",
            DraftError::TargetIsSelf => "target_is_self",
            DraftError::InsufficientTeams => "insufficient_teams",
            DraftError::AlreadyStarted => "already_started",
            DraftError::NotYourTurn => "not_your_turn",
            DraftError::AthleteUnavailable => "athlete_unavailable",
            DraftError::DraftNotInProgress => "draft_not_in_progress",
        }
    }
}
