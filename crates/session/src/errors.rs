use catalog::ReferenceError;
use projection::InvalidProjectionFamily;
use topology::TopologyError;

/// Top-level error taxonomy.
///
/// Only `InvalidProjectionFamily` is fatal (a configuration defect).
/// Fetch failures are rendered inline and keep prior state; superseded
/// loads are discarded silently and never become an error at all.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    InvalidProjectionFamily(InvalidProjectionFamily),
    Fetch(TopologyError),
    MissingReferenceData(ReferenceError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InvalidProjectionFamily(e) => write!(f, "{e}"),
            SessionError::Fetch(e) => write!(f, "{e}"),
            SessionError::MissingReferenceData(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::InvalidProjectionFamily(e) => Some(e),
            SessionError::Fetch(e) => Some(e),
            SessionError::MissingReferenceData(e) => Some(e),
        }
    }
}

impl From<InvalidProjectionFamily> for SessionError {
    fn from(e: InvalidProjectionFamily) -> Self {
        SessionError::InvalidProjectionFamily(e)
    }
}

impl From<TopologyError> for SessionError {
    fn from(e: TopologyError) -> Self {
        SessionError::Fetch(e)
    }
}

impl From<ReferenceError> for SessionError {
    fn from(e: ReferenceError) -> Self {
        SessionError::MissingReferenceData(e)
    }
}
