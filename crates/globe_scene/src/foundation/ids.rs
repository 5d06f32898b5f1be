//! Opaque 64-bit identifiers
//!
//! Billboards, batches and shaders are all named by 64-bit handles. Values
//! handed out by [`next_identity`] come from one process-wide counter, so two
//! handles of any kind never collide and a value is never handed out twice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// The reserved "no identity" value
pub const EMPTY_IDENTITY: u64 = 0;

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

/// Allocate a fresh, non-zero identity
///
/// Identities are never recycled. Running out would take 2^64 allocations.
pub fn next_identity() -> u64 {
    NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed)
}

/// Make sure [`next_identity`] never hands out `raw`
///
/// Used when a caller picks an identity itself instead of allocating one.
pub fn reserve_identity(raw: u64) {
    NEXT_IDENTITY.fetch_max(raw.saturating_add(1), Ordering::Relaxed);
}

macro_rules! identity_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Allocate a fresh identity of this kind
            pub fn allocate() -> Self {
                Self(next_identity())
            }

            /// Raw 64-bit value
            pub const fn raw(self) -> u64 {
                self.0
            }

            /// Whether this is the reserved empty identity
            pub const fn is_empty(self) -> bool {
                self.0 == EMPTY_IDENTITY
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

identity_type!(
    /// Identifier of a single billboard
    BillboardId
);
identity_type!(
    /// Identifier grouping the billboards added by one `add_billboards` call
    BatchId
);
identity_type!(
    /// Handle to a registered shader program
    ShaderId
);
identity_type!(
    /// Reference to a texture the renderer already owns
    TextureId
);
identity_type!(
    /// Scene-level identifier of a renderable object
    ObjectId
);

impl From<BillboardId> for ObjectId {
    fn from(id: BillboardId) -> Self {
        Self(id.0)
    }
}
