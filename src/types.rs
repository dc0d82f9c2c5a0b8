//! Shared primitive aliases and presentation enums.

use serde::{Deserialize, Serialize};

/// 1-indexed page number.
pub type PageNo = usize;
/// Monotonic search sequence number.
pub type SearchSeq = u64;
/// Monotonic load sequence number.
pub type LoadSeq = u64;

/// Loading floor applied on constrained presentation, in milliseconds.
pub const CONSTRAINED_MIN_LOADING_MS: u64 = 300;

/// Presentation class of the surface hosting the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    /// Desktop-class layout; the searching indicator tracks the request.
    #[default]
    Standard,
    /// Mobile-class layout; the searching indicator is held for a floor.
    Constrained,
}

impl Presentation {
    /// Minimum visible duration of the searching indicator.
    pub fn minimum_loading_ms(self) -> u64 {
        match self {
            Self::Standard => 0,
            Self::Constrained => CONSTRAINED_MIN_LOADING_MS,
        }
    }
}

/// How a non-blank applied filter is turned into a visible collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMode {
    /// Issue a remote query and show its result.
    #[default]
    Remote,
    /// Filter the cached collection with [`crate::record::Record::matches`].
    Local,
}
