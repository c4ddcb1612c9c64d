//! Typed domain separators for canonical hashing.
//!
//! Every digest selects a domain via [`HashDomain`] so equal bytes hashed
//! for different purposes never collide.

/// Declares `HashDomain`, `as_bytes()`, `ALL` and `Display` from one list.
macro_rules! define_hash_domains {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $bytes:expr
        ),+ $(,)?
    ) => {
        /// Typed domain separator for [`super::hash::canonical_hash`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HashDomain {
            $(
                $(#[$meta])*
                $variant,
            )+
        }

        impl HashDomain {
            /// Null-terminated separator bytes, hashed before the payload.
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $( Self::$variant => $bytes, )+
                }
            }

            /// All domains in declaration order.
            pub const ALL: &[HashDomain] = &[
                $( Self::$variant, )+
            ];
        }

        impl core::fmt::Display for HashDomain {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $( Self::$variant => write!(f, stringify!($variant)), )+
                }
            }
        }
    };
}

define_hash_domains! {
    /// Grounded task content.
    Task => b"KPLAN::TASK::V1\0",

    /// A single plan (cost + action names).
    Plan => b"KPLAN::PLAN::V1\0",

    /// A full planning result record.
    PlanningResult => b"KPLAN::PLANNING_RESULT::V1\0",

    /// Symmetry generator set.
    SymmetryGroup => b"KPLAN::SYMMETRY_GROUP::V1\0",

    /// Benchmark determinism guard.
    BenchGuard => b"KPLAN::BENCH_GUARD::V1\0",
}
