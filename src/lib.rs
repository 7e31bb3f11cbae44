// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Rankseq - insertion-friendly order ranks for manually sorted records.
//!
//! A rank is a string like `0|hzzzzz:` that sorts with plain string
//! comparison. A new rank can always be generated between any two distinct
//! ranks, so moving a record never renumbers its neighbours.
//!
//! # Quick Start
//!
//! ```
//! use rankseq::RankSequence;
//!
//! let seq = RankSequence::default();
//!
//! // Seed an empty collection, then append two records.
//! let first = seq.append_after(None);
//! let third = seq.advance(&first);
//!
//! // Drop a record between them.
//! let second = seq.between(&first, &third).unwrap();
//! assert!(first < second && second < third);
//! assert_eq!(first.as_str(), "0|hzzzzz:");
//! ```
//!
//! # Concurrency
//!
//! Generation is pure and holds no state. Callers that read the last rank
//! of a collection and append after it must serialize that read-compute-
//! write cycle themselves, otherwise two writers can pick the same rank.

pub mod bucket;
pub mod collection;
pub mod config;
pub mod digits;
pub mod document;
pub mod error;
pub mod rank;
pub mod sequence;

pub use bucket::Bucket;
pub use collection::Ranked;
pub use error::MalformedReason;
pub use error::RankError;
pub use rank::Rank;
pub use sequence::RankSequence;
pub use sequence::SequenceConfig;
