//! Raw attribute values and the typed attribute contract.
//!
//! The driver boundary speaks [`SaiAttribute`]: a numeric attribute id plus
//! a value union. Each object category layers a typed enum over it that
//! implements [`SaiAttributeSet`]; decoding a raw attribute with an unknown
//! id or a mismatched value variant is an `InvalidParameter` error.

use crate::error::{SaiError, SaiResult};
use crate::mac::MacAddress;
use crate::types::{RawSaiObjectId, SaiObjectId, SaiObjectKind};
use std::fmt;
use std::net::IpAddr;

/// Raw attribute identifier (`sai_attr_id_t`).
pub type SaiAttrId = u32;

/// Attribute value union (`sai_attribute_value_t`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaiAttributeValue {
    Bool(bool),
    U32(u32),
    S32(i32),
    U64(u64),
    Mac(MacAddress),
    Ip(IpAddr),
    Oid(RawSaiObjectId),
    OidList(Vec<RawSaiObjectId>),
    U32List(Vec<u32>),
}

impl SaiAttributeValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U32(_) => "u32",
            Self::S32(_) => "s32",
            Self::U64(_) => "u64",
            Self::Mac(_) => "mac",
            Self::Ip(_) => "ip",
            Self::Oid(_) => "oid",
            Self::OidList(_) => "objlist",
            Self::U32List(_) => "u32list",
        }
    }

    fn mismatch(&self, expected: &str) -> SaiError {
        SaiError::invalid_parameter(format!(
            "expected {} attribute value, got {}",
            expected,
            self.kind()
        ))
    }

    pub fn as_bool(&self) -> SaiResult<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(other.mismatch("bool")),
        }
    }

    pub fn as_u32(&self) -> SaiResult<u32> {
        match self {
            Self::U32(v) => Ok(*v),
            other => Err(other.mismatch("u32")),
        }
    }

    pub fn as_s32(&self) -> SaiResult<i32> {
        match self {
            Self::S32(v) => Ok(*v),
            other => Err(other.mismatch("s32")),
        }
    }

    pub fn as_u64(&self) -> SaiResult<u64> {
        match self {
            Self::U64(v) => Ok(*v),
            other => Err(other.mismatch("u64")),
        }
    }

    pub fn as_mac(&self) -> SaiResult<MacAddress> {
        match self {
            Self::Mac(v) => Ok(*v),
            other => Err(other.mismatch("mac")),
        }
    }

    pub fn as_ip(&self) -> SaiResult<IpAddr> {
        match self {
            Self::Ip(v) => Ok(*v),
            other => Err(other.mismatch("ip")),
        }
    }

    pub fn as_oid(&self) -> SaiResult<RawSaiObjectId> {
        match self {
            Self::Oid(v) => Ok(*v),
            other => Err(other.mismatch("oid")),
        }
    }

    /// Reads an object id value as a typed handle. Null is allowed.
    pub fn as_object_id<K: SaiObjectKind>(&self) -> SaiResult<SaiObjectId<K>> {
        self.as_oid().map(SaiObjectId::from_raw_unchecked)
    }

    pub fn as_oid_list(&self) -> SaiResult<&[RawSaiObjectId]> {
        match self {
            Self::OidList(v) => Ok(v),
            other => Err(other.mismatch("objlist")),
        }
    }

    pub fn as_u32_list(&self) -> SaiResult<&[u32]> {
        match self {
            Self::U32List(v) => Ok(v),
            other => Err(other.mismatch("u32list")),
        }
    }
}

/// A single raw attribute (`sai_attribute_t`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaiAttribute {
    pub id: SaiAttrId,
    pub value: SaiAttributeValue,
}

impl SaiAttribute {
    pub fn new(id: impl Into<SaiAttrId>, value: SaiAttributeValue) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

/// Typed attribute set for one object category.
pub trait SaiAttributeSet: Sized + Clone + fmt::Debug + PartialEq {
    /// Attribute id enum of the category.
    type Id: Copy + fmt::Debug + PartialEq + Into<SaiAttrId> + TryFrom<SaiAttrId>;

    /// Returns the id of this attribute.
    fn id(&self) -> Self::Id;

    /// Encodes the attribute for the driver.
    fn to_raw(&self) -> SaiAttribute;

    /// Decodes a raw attribute returned by (or handed to) the driver.
    fn from_raw(raw: &SaiAttribute) -> SaiResult<Self>;
}

pub(crate) fn unknown_attribute(category: &str, id: SaiAttrId) -> SaiError {
    SaiError::invalid_parameter(format!("unknown {} attribute id {}", category, id))
}

/// Declares an attribute id enum with raw conversions.
macro_rules! sai_attr_id {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[repr(u32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            /// Looks up an attribute id by its raw value.
            pub fn from_raw(raw: $crate::attribute::SaiAttrId) -> Option<Self> {
                match raw {
                    $(x if x == $value => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl From<$name> for $crate::attribute::SaiAttrId {
            fn from(id: $name) -> Self {
                id as $crate::attribute::SaiAttrId
            }
        }

        impl TryFrom<$crate::attribute::SaiAttrId> for $name {
            type Error = $crate::attribute::SaiAttrId;

            fn try_from(raw: $crate::attribute::SaiAttrId) -> Result<Self, Self::Error> {
                Self::from_raw(raw).ok_or(raw)
            }
        }
    };
}

/// Declares an enum carried as an `S32` attribute value.
macro_rules! sai_enum_value {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($(#[$vmeta:meta])* $variant:ident = $value:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[repr(i32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl $name {
            pub fn from_raw(raw: i32) -> Option<Self> {
                match raw {
                    $(x if x == $value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub const fn as_raw(self) -> i32 {
                self as i32
            }

            pub(crate) fn from_value(
                value: &$crate::attribute::SaiAttributeValue,
            ) -> $crate::error::SaiResult<Self> {
                let raw = value.as_s32()?;
                Self::from_raw(raw).ok_or_else(|| {
                    $crate::error::SaiError::invalid_parameter(format!(
                        "invalid {} value {}",
                        $label, raw
                    ))
                })
            }

            pub(crate) fn to_value(self) -> $crate::attribute::SaiAttributeValue {
                $crate::attribute::SaiAttributeValue::S32(self.as_raw())
            }
        }
    };
}

pub(crate) use sai_attr_id;
pub(crate) use sai_enum_value;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PortOid;

    #[test]
    fn test_value_accessors() {
        assert_eq!(SaiAttributeValue::U32(9100).as_u32().unwrap(), 9100);
        assert!(SaiAttributeValue::U32(1).as_bool().is_err());
        assert_eq!(
            SaiAttributeValue::U32List(vec![0, 1]).as_u32_list().unwrap(),
            &[0, 1]
        );
    }

    #[test]
    fn test_mismatch_is_invalid_parameter() {
        let err = SaiAttributeValue::Bool(true).as_oid().unwrap_err();
        assert!(matches!(err, SaiError::InvalidParameter { .. }));
        assert!(err.to_string().contains("expected oid"));
    }

    #[test]
    fn test_typed_object_id() {
        let value = SaiAttributeValue::Oid(0x1000000000007);
        let port: PortOid = value.as_object_id().unwrap();
        assert_eq!(port.as_raw(), 0x1000000000007);

        let null: PortOid = SaiAttributeValue::Oid(0).as_object_id().unwrap();
        assert!(null.is_null());
    }
}
