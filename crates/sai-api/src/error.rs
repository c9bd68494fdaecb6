//! SAI error types and status handling.
//!
//! Drivers report a raw [`SaiStatus`] per call. The typed API layer turns
//! those into [`SaiError`] values carrying the object the call was about.

use std::fmt;
use thiserror::Error;

/// SAI status codes matching the SAI C API (`sai_status_t`).
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaiStatus {
    Success = 0,
    Failure = -1,
    NotSupported = -2,
    NoMemory = -3,
    InsufficientResources = -4,
    InvalidParameter = -5,
    ItemAlreadyExists = -6,
    ItemNotFound = -7,
    BufferOverflow = -8,
    Uninitialized = -12,
    TableFull = -13,
    MandatoryAttributeMissing = -14,
    NotImplemented = -15,
    ObjectInUse = -17,
    InvalidObjectType = -18,
    InvalidObjectId = -19,
    HwTableFull = -22,
    InvalidAttribute = -24,
}

impl SaiStatus {
    /// Creates a SaiStatus from a raw i32 value.
    ///
    /// Codes this crate does not model collapse to `Failure`.
    pub fn from_raw(status: i32) -> Self {
        match status {
            0 => SaiStatus::Success,
            -1 => SaiStatus::Failure,
            -2 => SaiStatus::NotSupported,
            -3 => SaiStatus::NoMemory,
            -4 => SaiStatus::InsufficientResources,
            -5 => SaiStatus::InvalidParameter,
            -6 => SaiStatus::ItemAlreadyExists,
            -7 => SaiStatus::ItemNotFound,
            -8 => SaiStatus::BufferOverflow,
            -12 => SaiStatus::Uninitialized,
            -13 => SaiStatus::TableFull,
            -14 => SaiStatus::MandatoryAttributeMissing,
            -15 => SaiStatus::NotImplemented,
            -17 => SaiStatus::ObjectInUse,
            -18 => SaiStatus::InvalidObjectType,
            -19 => SaiStatus::InvalidObjectId,
            -22 => SaiStatus::HwTableFull,
            -24 => SaiStatus::InvalidAttribute,
            _ => SaiStatus::Failure,
        }
    }

    /// Returns true if the status indicates success.
    pub fn is_success(&self) -> bool {
        *self == SaiStatus::Success
    }

    /// Returns true if the status indicates an error.
    pub fn is_error(&self) -> bool {
        *self != SaiStatus::Success
    }

    /// Converts to a Result, returning Ok(()) for success.
    ///
    /// `context` names the object or operation for the error message.
    pub fn into_result(self, context: impl fmt::Display) -> SaiResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(SaiError::from_status(self, context))
        }
    }
}

impl fmt::Display for SaiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SaiStatus::Success => "SAI_STATUS_SUCCESS",
            SaiStatus::Failure => "SAI_STATUS_FAILURE",
            SaiStatus::NotSupported => "SAI_STATUS_NOT_SUPPORTED",
            SaiStatus::NoMemory => "SAI_STATUS_NO_MEMORY",
            SaiStatus::InsufficientResources => "SAI_STATUS_INSUFFICIENT_RESOURCES",
            SaiStatus::InvalidParameter => "SAI_STATUS_INVALID_PARAMETER",
            SaiStatus::ItemAlreadyExists => "SAI_STATUS_ITEM_ALREADY_EXISTS",
            SaiStatus::ItemNotFound => "SAI_STATUS_ITEM_NOT_FOUND",
            SaiStatus::BufferOverflow => "SAI_STATUS_BUFFER_OVERFLOW",
            SaiStatus::Uninitialized => "SAI_STATUS_UNINITIALIZED",
            SaiStatus::TableFull => "SAI_STATUS_TABLE_FULL",
            SaiStatus::MandatoryAttributeMissing => "SAI_STATUS_MANDATORY_ATTRIBUTE_MISSING",
            SaiStatus::NotImplemented => "SAI_STATUS_NOT_IMPLEMENTED",
            SaiStatus::ObjectInUse => "SAI_STATUS_OBJECT_IN_USE",
            SaiStatus::InvalidObjectType => "SAI_STATUS_INVALID_OBJECT_TYPE",
            SaiStatus::InvalidObjectId => "SAI_STATUS_INVALID_OBJECT_ID",
            SaiStatus::HwTableFull => "SAI_STATUS_HW_TABLE_FULL",
            SaiStatus::InvalidAttribute => "SAI_STATUS_INVALID_ATTRIBUTE",
        };
        write!(f, "{}", s)
    }
}

/// Error type for SAI operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaiError {
    /// SAI API returned an error status with no finer classification.
    #[error("SAI operation on {context} failed: {status}")]
    Status { status: SaiStatus, context: String },

    /// The requested feature is not supported by the SAI implementation.
    #[error("Feature not supported: {feature}")]
    NotSupported { feature: String },

    /// Invalid parameter passed to SAI API.
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// The requested item was not found.
    #[error("Item not found: {item}")]
    NotFound { item: String },

    /// The item already exists.
    #[error("Item already exists: {item}")]
    AlreadyExists { item: String },

    /// Hardware table is full or the driver ran out of resources.
    #[error("Table full: {table}")]
    TableFull { table: String },

    /// Object is in use and cannot be removed.
    #[error("Object in use: {object}")]
    ObjectInUse { object: String },

    /// Internal error.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SaiError {
    /// Creates an error from a SAI status code.
    pub fn from_status(status: SaiStatus, context: impl fmt::Display) -> Self {
        match status {
            SaiStatus::Success => SaiError::Internal {
                message: format!("from_status called with success status for {}", context),
            },
            SaiStatus::NotSupported | SaiStatus::NotImplemented => SaiError::NotSupported {
                feature: context.to_string(),
            },
            SaiStatus::InvalidParameter
            | SaiStatus::MandatoryAttributeMissing
            | SaiStatus::InvalidObjectType
            | SaiStatus::InvalidObjectId
            | SaiStatus::InvalidAttribute => SaiError::InvalidParameter {
                message: format!("{} rejected with {}", context, status),
            },
            SaiStatus::ItemNotFound => SaiError::NotFound {
                item: context.to_string(),
            },
            SaiStatus::ItemAlreadyExists => SaiError::AlreadyExists {
                item: context.to_string(),
            },
            SaiStatus::TableFull
            | SaiStatus::HwTableFull
            | SaiStatus::NoMemory
            | SaiStatus::InsufficientResources => SaiError::TableFull {
                table: format!("{} ({})", context, status),
            },
            SaiStatus::ObjectInUse => SaiError::ObjectInUse {
                object: context.to_string(),
            },
            _ => SaiError::Status {
                status,
                context: context.to_string(),
            },
        }
    }

    /// Creates a not supported error with a feature description.
    pub fn not_supported(feature: impl Into<String>) -> Self {
        SaiError::NotSupported {
            feature: feature.into(),
        }
    }

    /// Creates an invalid parameter error with a message.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        SaiError::InvalidParameter {
            message: message.into(),
        }
    }

    /// Creates a not found error with an item description.
    pub fn not_found(item: impl Into<String>) -> Self {
        SaiError::NotFound { item: item.into() }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        SaiError::Internal {
            message: message.into(),
        }
    }

    /// Returns the underlying SAI status if this is a Status error.
    pub fn status(&self) -> Option<SaiStatus> {
        match self {
            SaiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for SAI operations.
pub type SaiResult<T> = Result<T, SaiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_success() {
        assert!(SaiStatus::Success.is_success());
        assert!(!SaiStatus::Success.is_error());
        assert!(SaiStatus::Success.into_result("port").is_ok());
    }

    #[test]
    fn test_status_failure() {
        assert!(!SaiStatus::Failure.is_success());
        assert!(SaiStatus::Failure.is_error());
        let err = SaiStatus::Failure.into_result("port 0x1").unwrap_err();
        assert_eq!(err.status(), Some(SaiStatus::Failure));
    }

    #[test]
    fn test_status_from_raw() {
        assert_eq!(SaiStatus::from_raw(0), SaiStatus::Success);
        assert_eq!(SaiStatus::from_raw(-7), SaiStatus::ItemNotFound);
        assert_eq!(SaiStatus::from_raw(-999), SaiStatus::Failure);
    }

    #[test]
    fn test_error_from_status() {
        let err = SaiError::from_status(SaiStatus::ItemNotFound, "next hop 0x4");
        assert_eq!(err, SaiError::not_found("next hop 0x4"));

        for status in [
            SaiStatus::TableFull,
            SaiStatus::HwTableFull,
            SaiStatus::NoMemory,
            SaiStatus::InsufficientResources,
        ] {
            let err = SaiError::from_status(status, "next hop group");
            assert!(matches!(err, SaiError::TableFull { .. }));
        }

        let err = SaiError::from_status(SaiStatus::MandatoryAttributeMissing, "port");
        assert!(matches!(err, SaiError::InvalidParameter { .. }));
    }

    #[test]
    fn test_error_display_carries_context() {
        let err = SaiError::from_status(SaiStatus::ObjectInUse, "router interface 0x6");
        assert_eq!(err.to_string(), "Object in use: router interface 0x6");
    }
}
