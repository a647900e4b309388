// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record identifiers: `<3-letter-prefix>-<6-hex>`, e.g. `job-4a9f21`.
//!
//! IDs are fixed-size, `Copy`, stack-allocated buffers (mirrors the
//! teacher's `IdBuf`/`define_id!` pattern) so hashmap keys and Store
//! collection lookups never allocate. Generation goes through an
//! injectable [`IdGen`] trait (mirrors [`crate::clock::Clock`]) so tests
//! can supply deterministic IDs instead of random hex.

use rand::Rng;

/// Every generated ID is exactly 10 bytes: 3-letter prefix + '-' + 6 hex digits.
pub const ID_LEN: usize = 10;

/// Something that can mint the random 6-hex-digit suffix of a new ID.
///
/// Kept separate from the ID newtypes themselves so the Store can be
/// generic over "how IDs are generated" the same way it is generic over
/// "what time it is" via [`crate::clock::Clock`].
pub trait IdGen: Send + Sync {
    fn next_suffix(&self) -> String;
}

/// Production ID generator: a random `u24` rendered as lowercase hex.
#[derive(Clone, Copy, Default)]
pub struct RandomIdGen;

impl IdGen for RandomIdGen {
    fn next_suffix(&self) -> String {
        let n: u32 = rand::thread_rng().gen_range(0..=0xFF_FFFF);
        format!("{n:06x}")
    }
}

/// Fixed-size inline ID buffer, `Copy`, no heap allocation.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IdBuf {
    buf: [u8; ID_LEN],
}

impl IdBuf {
    pub fn new(s: &str) -> Self {
        debug_assert!(s.len() <= ID_LEN, "ID exceeds {ID_LEN} bytes: {s:?}");
        let mut buf = [0u8; ID_LEN];
        let n = s.len().min(ID_LEN);
        buf[..n].copy_from_slice(&s.as_bytes()[..n]);
        Self { buf }
    }

    pub fn as_str(&self) -> &str {
        let end = self.buf.iter().position(|&b| b == 0).unwrap_or(ID_LEN);
        // Invariant: only ever constructed from a validated &str.
        std::str::from_utf8(&self.buf[..end]).unwrap_or("")
    }
}

impl std::fmt::Debug for IdBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl std::fmt::Display for IdBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::hash::Hash for IdBuf {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl std::borrow::Borrow<str> for IdBuf {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Defines an ID newtype wrapping [`IdBuf`] with a stable 3-letter prefix.
macro_rules! define_id {
    ($(#[$meta:meta])* pub struct $name:ident($prefix:literal);) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $crate::ids::IdBuf);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Mint a fresh ID using the given generator.
            pub fn generate(id_gen: &dyn $crate::ids::IdGen) -> Self {
                Self($crate::ids::IdBuf::new(&format!("{}-{}", Self::PREFIX, id_gen.next_suffix())))
            }

            /// Parse/reconstruct an existing ID, e.g. from CLI args or storage.
            pub fn from_string(s: impl AsRef<str>) -> Self {
                Self($crate::ids::IdBuf::new(s.as_ref()))
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// True iff this ID carries the expected 3-letter prefix.
            pub fn has_valid_prefix(&self) -> bool {
                self.0.as_str().starts_with(Self::PREFIX)
            }
        }

        impl Default for $name {
            /// The empty ID, used as a sentinel meaning "let the Store assign one on insert".
            fn default() -> Self {
                Self::from_string("")
            }
        }

        impl $name {
            pub fn is_unassigned(&self) -> bool {
                self.0.as_str().is_empty()
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0.as_str())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.as_str())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::from_string(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from_string(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                self.0.as_str()
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                self.0.as_str()
            }
        }
    };
}

define_id! {
    /// A registered source repository (`cmb-`).
    pub struct CodebaseId("cmb");
}

define_id! {
    /// A high-level user intent (`qst-`).
    pub struct GoalId("qst");
}

define_id! {
    /// A unit of assignable work (`job-`).
    pub struct WorkItemId("job");
}

define_id! {
    /// A `from -> to` dependency edge (`jdp-`).
    pub struct DependencyId("jdp");
}

define_id! {
    /// An active or terminated agent process (`bee-`).
    pub struct WorkerId("bee");
}

define_id! {
    /// An isolated worktree+branch working directory (`cel-`).
    pub struct SandboxId("cel");
}

define_id! {
    /// A durable bus message (`wag-`).
    pub struct SignalId("wag");
}

define_id! {
    /// A token-usage record (`cst-`).
    pub struct CostEntryId("cst");
}
