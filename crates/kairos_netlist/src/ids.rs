//! Opaque ID newtypes for nets and cells.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub const fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub const fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// A wire in the circuit, numbered the way Yosys numbers netlist bits.
    NetId
);

define_id!(
    /// The position of a cell within its [`Circuit`](crate::Circuit).
    CellId
);

impl CellId {
    /// Returns the ID as a `Vec` index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn net_id_roundtrip() {
        assert_eq!(NetId::from_raw(42).as_raw(), 42);
    }

    #[test]
    fn cell_id_index() {
        assert_eq!(CellId::from_raw(7).index(), 7);
    }

    #[test]
    fn ids_hash_and_order() {
        let set: HashSet<_> = [NetId::from_raw(1), NetId::from_raw(2), NetId::from_raw(1)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(NetId::from_raw(1) < NetId::from_raw(2));
    }

    #[test]
    fn serializes_as_bare_number() {
        assert_eq!(serde_json::to_string(&NetId::from_raw(9)).unwrap(), "9");
        let back: CellId = serde_json::from_str("3").unwrap();
        assert_eq!(back, CellId::from_raw(3));
    }

    #[test]
    fn display_is_raw_number() {
        assert_eq!(NetId::from_raw(12).to_string(), "12");
    }
}
