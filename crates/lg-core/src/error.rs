use crate::entity::EntityId;
use crate::geometry::Vec2;

/// Alias for `Result<T, LgError>`.
pub type LgResult<T> = Result<T, LgError>;

/// Errors that can occur when manipulating a world.
#[derive(Debug, thiserror::Error)]
pub enum LgError {
    /// The requested entity ID does not exist in the world.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// The entity is larger than the world and can never be placed in bounds.
    #[error("entity \"{name}\" of size {size} does not fit in a world of size {bounds}")]
    DoesNotFit {
        /// Display name of the rejected entity.
        name: String,
        /// The entity's size.
        size: Vec2,
        /// The world's size.
        bounds: Vec2,
    },

    /// World dimensions must be finite and positive.
    #[error("invalid world bounds: {0}")]
    InvalidBounds(Vec2),
}
