//! Error types.
//!
//! Every failure in the editor is recoverable: the attempted mutation is
//! rejected, the graph is left as it was, and the `Display` text of the error
//! is what the user sees.

use thiserror::Error;

/// Reasons why a connection between two nodes was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Neither endpoint is a bank node
    #[error("Error: Cannot connect non-Bank nodes to each other")]
    NonBankPair,
    /// The bank already has a credit line
    #[error("Error: Bank node '{bank_id}' is already connected to a credit line")]
    CreditLineTaken { bank_id: String },
    /// The bank already has a projection node
    #[error("Error: Bank node '{bank_id}' is already connected to a projection node")]
    ProjectionTaken { bank_id: String },
    /// The projection's entity suffix differs from the bank's entity
    #[error("Error: Projection entity ({projection_entity}) must match Bank entity ({bank_entity})")]
    EntityMismatch {
        projection_entity: String,
        bank_entity: String,
    },
    /// Both directions between the pair already exist
    #[error("Error: Bidirectional connection already exists")]
    BidirectionalExists,
}

/// Crate-wide error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error(transparent)]
    Connection(#[from] ValidationError),

    #[error("Error: Only one Street node is allowed")]
    StreetAlreadyExists,

    #[error("Error: Bank ID '{0}' already exists")]
    DuplicateBankId(String),

    #[error("Error: Projection node name must follow format PRJ_XXXX where X is alphanumeric")]
    InvalidProjectionName(String),

    #[error("Error: A Projection node with this name already exists")]
    DuplicateProjectionName(String),

    #[error("Error: A Credit Line node with this name already exists")]
    DuplicateCreditLineName(String),

    #[error("Error: Node name '{0}' already exists")]
    DuplicateNodeName(String),

    #[error("Error: Invalid properties: {0}")]
    InvalidProperties(String),

    #[error("Invalid editor configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for EditError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidProperties(err.to_string())
    }
}

pub type Result<T, E = EditError> = std::result::Result<T, E>;
