use lg_core::{EntityId, LgError};

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors surfaced by the simulation's public entry points.
///
/// State-machine transitions themselves never fail; these only come from
/// bad ids, bad configuration, or misuse of the drag API.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// An error from the world model.
    #[error(transparent)]
    Core(#[from] LgError),

    /// Configuration could not be read or is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The entity has no sway component and cannot be picked up.
    #[error("entity {0} cannot be dragged")]
    NotDraggable(EntityId),

    /// `drag_to`/`end_drag` was called with nothing being dragged.
    #[error("no drag in progress")]
    NoActiveDrag,

    /// A custom system failed.
    #[error("system error: {0}")]
    SystemError(String),
}
