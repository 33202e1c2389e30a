//! Typed identities for the objects a host exposes.
//!
//! Identities are compared by value; they never own the thing they name.

use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

id_type!(
    /// A vessel part (a compartment is a part with an interior).
    PartId,
    "part"
);
id_type!(
    /// A vessel: a tree of parts anchored at a root part.
    VesselId,
    "vessel"
);
id_type!(
    /// A crew member.
    CrewId,
    "crew"
);
id_type!(
    /// A shader asset.
    ShaderId,
    "shader"
);

/// A node in the host's scene hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub hecs::Entity);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0.id())
    }
}
