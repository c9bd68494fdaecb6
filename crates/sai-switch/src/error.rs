//! Manager error taxonomy.

use sai_api::SaiError;
use std::fmt;
use thiserror::Error;

/// Resource category named in a [`ManagerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Port,
    BridgePort,
    RouterInterface,
    Neighbor,
    NextHop,
    NextHopGroup,
    NextHopGroupMember,
    /// A SAI object whose category was not known at conversion time.
    SaiObject,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Port => "port",
            ResourceKind::BridgePort => "bridge port",
            ResourceKind::RouterInterface => "router interface",
            ResourceKind::Neighbor => "neighbor",
            ResourceKind::NextHop => "next hop",
            ResourceKind::NextHopGroup => "next hop group",
            ResourceKind::NextHopGroupMember => "next hop group member",
            ResourceKind::SaiObject => "sai object",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by the resource managers to their callers.
///
/// Managers never retry. A hardware failure is classified and returned as
/// is, and recovery belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    #[error("{kind} already exists: {id}")]
    DuplicateResource { kind: ResourceKind, id: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    #[error("Invalid {kind} parameter: {message}")]
    InvalidParameter { kind: ResourceKind, message: String },

    #[error("{kind} resources exhausted: {message}")]
    ResourceExhausted { kind: ResourceKind, message: String },

    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    #[error("SAI error: {0}")]
    Sai(SaiError),
}

impl ManagerError {
    pub fn duplicate(kind: ResourceKind, id: impl fmt::Display) -> Self {
        ManagerError::DuplicateResource {
            kind,
            id: id.to_string(),
        }
    }

    pub fn not_found(kind: ResourceKind, id: impl fmt::Display) -> Self {
        ManagerError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn invalid_parameter(kind: ResourceKind, message: impl Into<String>) -> Self {
        ManagerError::InvalidParameter {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        ManagerError::InvalidState {
            message: message.into(),
        }
    }

    /// Classifies a SAI failure against the category being operated on.
    pub fn sai(kind: ResourceKind, error: SaiError) -> Self {
        match error {
            SaiError::InvalidParameter { message } => {
                ManagerError::InvalidParameter { kind, message }
            }
            SaiError::TableFull { table } => ManagerError::ResourceExhausted {
                kind,
                message: table,
            },
            SaiError::NotFound { item } => ManagerError::NotFound { kind, id: item },
            SaiError::AlreadyExists { item } => ManagerError::DuplicateResource { kind, id: item },
            other => ManagerError::Sai(other),
        }
    }

    /// Returns a closure for `map_err` that classifies against `kind`.
    pub(crate) fn sai_for(kind: ResourceKind) -> impl Fn(SaiError) -> ManagerError {
        move |error| ManagerError::sai(kind, error)
    }
}

impl From<SaiError> for ManagerError {
    fn from(error: SaiError) -> Self {
        ManagerError::sai(ResourceKind::SaiObject, error)
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sai_api::SaiStatus;

    #[test]
    fn test_sai_error_classification() {
        let err = ManagerError::sai(
            ResourceKind::Port,
            SaiError::from_status(SaiStatus::InvalidParameter, "port"),
        );
        assert!(matches!(
            err,
            ManagerError::InvalidParameter {
                kind: ResourceKind::Port,
                ..
            }
        ));

        let err = ManagerError::sai(
            ResourceKind::NextHopGroup,
            SaiError::from_status(SaiStatus::TableFull, "next hop group"),
        );
        assert!(matches!(err, ManagerError::ResourceExhausted { .. }));

        let err: ManagerError = SaiError::from_status(SaiStatus::ObjectInUse, "port").into();
        assert!(matches!(err, ManagerError::Sai(_)));
    }

    #[test]
    fn test_display() {
        let err = ManagerError::duplicate(ResourceKind::Port, "Ethernet0");
        assert_eq!(err.to_string(), "port already exists: Ethernet0");

        let err = ManagerError::not_found(ResourceKind::RouterInterface, 7);
        assert_eq!(err.to_string(), "router interface not found: 7");
    }
}
