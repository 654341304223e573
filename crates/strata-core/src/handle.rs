//! Opaque handles into the host scene
//!
//! The importer never owns scene objects. Every object, image, container,
//! material and node lives in the host and is referred to by a handle the
//! host hands out. Handles are plain integers so they can be copied freely,
//! compared in tests, and serialized into operation logs.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! host_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Create a handle from a raw host value
            pub fn from_raw(id: u64) -> Self {
                Self(id)
            }

            /// Get the raw u64 value
            pub fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

host_handle!(
    /// A scene object created by a geometry import
    ObjectHandle
);

host_handle!(
    /// An image loaded into the host
    ImageHandle
);

host_handle!(
    /// A scene container (collection) that groups objects
    ContainerHandle
);

host_handle!(
    /// A material with a node graph
    MaterialHandle
);

host_handle!(
    /// A node inside a material's node graph
    NodeHandle
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        let id = ObjectHandle::from_raw(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{:?}", id), "ObjectHandle(42)");
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&ContainerHandle::from_raw(7)).unwrap();
        assert_eq!(json, "7");
        let back: ContainerHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ContainerHandle(7));
    }
}
