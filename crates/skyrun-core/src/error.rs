use thiserror::Error;

/// Error taxonomy shared by the simulation crates.
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value is out of range. Callers clamp instead of failing.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An entity ended up with a NaN/infinite coordinate.
    #[error("non-finite {entity} state at index {index}")]
    NonFinite { entity: &'static str, index: usize },

    /// Session-level state no longer satisfies its invariants.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// The audio collaborator cannot play sounds right now.
    #[error("audio output unavailable")]
    AudioUnavailable,

    #[error("snapshot encode error: {0}")]
    Snapshot(#[from] rmp_serde::encode::Error),
}
