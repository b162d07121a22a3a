//! Persistence error types.

use thiserror::Error;

/// Errors that can occur while snapshotting or restoring a machine.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The snapshot's state token matches no registered state.
    #[error("unknown serialized state token '{token}'")]
    UnknownState { token: String },

    /// The machine occupies a state with no persistent token registered.
    #[error("state '{name}' has no persistent token registered")]
    UnregisteredState { name: String },

    /// Two states were registered under the same persistent token.
    #[error("token '{token}' is already registered")]
    DuplicateToken { token: String },

    /// The state already has a persistent token registered.
    #[error("state '{name}' is already registered under token '{token}'")]
    StateAlreadyRegistered { name: String, token: String },

    /// The handle does not belong to the automaton this registry serves.
    #[error("handle does not belong to this automaton")]
    ForeignHandle,

    /// The machine being snapshotted was built from a different automaton.
    #[error("transitioner was built from a different automaton")]
    AutomatonMismatch,

    /// A data-bearing state was registered without a payload codec.
    #[error("state '{name}' carries data and must be registered with a payload codec")]
    PayloadCodecRequired { name: String },

    /// A stateless state was registered with a payload codec.
    #[error("state '{name}' is stateless and cannot take a payload codec")]
    PayloadCodecUnsupported { name: String },

    /// The snapshot names a data-bearing state but carries no payload.
    #[error("snapshot for state token '{token}' is missing its data payload")]
    MissingPayload { token: String },

    /// Snapshot format version is not supported by this version.
    #[error("unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Serialization to JSON or binary format failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed.
    #[error("deserialization failed: {0}")]
    DeserializationFailed(String),

    /// A payload codec rejected the stored payload.
    #[error("payload reconstruction failed: {0}")]
    PayloadLoadFailed(String),
}
