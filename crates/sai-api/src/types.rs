//! Type-safe SAI object ID wrappers.
//!
//! Object IDs carry their kind as a phantom type parameter so that a port
//! handle can never be passed where a next hop handle is expected.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Raw SAI object ID type (matches sai_object_id_t in C).
pub type RawSaiObjectId = u64;

/// SAI object type codes (`sai_object_type_t`).
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SaiObjectType {
    Null = 0,
    Port = 1,
    VirtualRouter = 3,
    NextHop = 4,
    NextHopGroup = 5,
    RouterInterface = 6,
    Switch = 33,
    NeighborEntry = 36,
    NextHopGroupMember = 45,
    BridgePort = 58,
}

impl SaiObjectType {
    /// Creates an object type from its raw code.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Null),
            1 => Some(Self::Port),
            3 => Some(Self::VirtualRouter),
            4 => Some(Self::NextHop),
            5 => Some(Self::NextHopGroup),
            6 => Some(Self::RouterInterface),
            33 => Some(Self::Switch),
            36 => Some(Self::NeighborEntry),
            45 => Some(Self::NextHopGroupMember),
            58 => Some(Self::BridgePort),
            _ => None,
        }
    }

    /// Returns the raw code.
    pub const fn as_raw(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for SaiObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Null => "SAI_OBJECT_TYPE_NULL",
            Self::Port => "SAI_OBJECT_TYPE_PORT",
            Self::VirtualRouter => "SAI_OBJECT_TYPE_VIRTUAL_ROUTER",
            Self::NextHop => "SAI_OBJECT_TYPE_NEXT_HOP",
            Self::NextHopGroup => "SAI_OBJECT_TYPE_NEXT_HOP_GROUP",
            Self::RouterInterface => "SAI_OBJECT_TYPE_ROUTER_INTERFACE",
            Self::Switch => "SAI_OBJECT_TYPE_SWITCH",
            Self::NeighborEntry => "SAI_OBJECT_TYPE_NEIGHBOR_ENTRY",
            Self::NextHopGroupMember => "SAI_OBJECT_TYPE_NEXT_HOP_GROUP_MEMBER",
            Self::BridgePort => "SAI_OBJECT_TYPE_BRIDGE_PORT",
        };
        f.write_str(s)
    }
}

/// Marker trait for SAI object kinds.
///
/// Each SAI object type implements this trait to enable compile-time
/// type checking of object IDs.
pub trait SaiObjectKind: Send + Sync + 'static {
    /// Returns the SAI object type name for debugging.
    fn type_name() -> &'static str;

    /// Returns the object type code passed to the driver.
    fn object_type() -> SaiObjectType;
}

/// A type-safe SAI object ID.
///
/// # Examples
///
/// ```
/// use sai_api::{NextHopOid, PortOid};
///
/// let port: PortOid = PortOid::from_raw(0x1000000000001).unwrap();
/// let nhop: NextHopOid = NextHopOid::from_raw(0x4000000000001).unwrap();
///
/// // fn takes_port(p: PortOid) {}
/// // takes_port(nhop);  // Error: expected PortOid, found NextHopOid
/// # let _ = (port, nhop);
/// ```
pub struct SaiObjectId<T: SaiObjectKind> {
    raw: RawSaiObjectId,
    _marker: PhantomData<T>,
}

impl<T: SaiObjectKind> SaiObjectId<T> {
    /// The null object ID (SAI_NULL_OBJECT_ID).
    pub const NULL: Self = Self {
        raw: 0,
        _marker: PhantomData,
    };

    /// Creates a new object ID from a raw value.
    ///
    /// Returns `None` if the raw value is 0 (null object ID).
    pub fn from_raw(raw: RawSaiObjectId) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Some(Self {
                raw,
                _marker: PhantomData,
            })
        }
    }

    /// Creates a new object ID from a raw value, including null.
    pub const fn from_raw_unchecked(raw: RawSaiObjectId) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Returns the raw object ID value.
    pub const fn as_raw(&self) -> RawSaiObjectId {
        self.raw
    }

    /// Returns true if this is a null object ID.
    pub const fn is_null(&self) -> bool {
        self.raw == 0
    }

    /// Returns true if this is a valid (non-null) object ID.
    pub const fn is_valid(&self) -> bool {
        self.raw != 0
    }
}

impl<T: SaiObjectKind> Clone for SaiObjectId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: SaiObjectKind> Copy for SaiObjectId<T> {}

impl<T: SaiObjectKind> fmt::Debug for SaiObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:016x})", T::type_name(), self.raw)
    }
}

impl<T: SaiObjectKind> fmt::Display for SaiObjectId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.raw)
    }
}

impl<T: SaiObjectKind> PartialEq for SaiObjectId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: SaiObjectKind> Eq for SaiObjectId<T> {}

impl<T: SaiObjectKind> PartialOrd for SaiObjectId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: SaiObjectKind> Ord for SaiObjectId<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T: SaiObjectKind> Hash for SaiObjectId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T: SaiObjectKind> Default for SaiObjectId<T> {
    fn default() -> Self {
        Self::NULL
    }
}

// ============================================================================
// Object Kind Markers
// ============================================================================

macro_rules! define_object_kind {
    ($name:ident, $type_name:literal, $object_type:ident, $oid_alias:ident) => {
        #[doc = concat!("Marker type for SAI ", $type_name, " objects.")]
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl SaiObjectKind for $name {
            fn type_name() -> &'static str {
                $type_name
            }

            fn object_type() -> SaiObjectType {
                SaiObjectType::$object_type
            }
        }

        #[doc = concat!("Type alias for ", $type_name, " object IDs.")]
        pub type $oid_alias = SaiObjectId<$name>;
    };
}

define_object_kind!(SwitchKind, "Switch", Switch, SwitchOid);
define_object_kind!(PortKind, "Port", Port, PortOid);
define_object_kind!(VirtualRouterKind, "VirtualRouter", VirtualRouter, VirtualRouterOid);
define_object_kind!(RouterInterfaceKind, "RouterInterface", RouterInterface, RouterInterfaceOid);
define_object_kind!(NextHopKind, "NextHop", NextHop, NextHopOid);
define_object_kind!(NextHopGroupKind, "NextHopGroup", NextHopGroup, NextHopGroupOid);
define_object_kind!(
    NextHopGroupMemberKind,
    "NextHopGroupMember",
    NextHopGroupMember,
    NextHopGroupMemberOid
);
define_object_kind!(BridgePortKind, "BridgePort", BridgePort, BridgePortOid);
