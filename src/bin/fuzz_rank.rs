//! AFL fuzz harness for rank generation
//!
//! Checks the properties callers rely on:
//! 1. Density: inserting at any position of a sorted list always succeeds
//!    (except before the absolute minimum) and keeps the list sorted
//! 2. Round trip: every generated rank parses back to itself
//! 3. Parsing arbitrary input never panics, and accepted input formats back
//!    to the same string
//!
//! Model: a single collection held as a sorted list of ranks.

use afl::fuzz;
use rankseq::Rank;
use rankseq::RankError;
use rankseq::RankSequence;
use rankseq::collection;

/// Cap on list length so long inputs stay fast.
const MAX_LEN: usize = 512;

/// Operation types the fuzzer can generate
#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    /// Insert at a position given as a fraction of the list length
    Insert { pos_frac: u8 },
    /// Insert repeatedly just after one element, crowding that gap
    Crowd { pos_frac: u8, times: u8 },
    /// Append after the last rank
    Append,
    /// Reassign the whole list into the next bucket
    Rebalance,
    /// Parse the next bytes as a rank string
    Parse { len: u8 },
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        if bytes.is_empty() {
            return None;
        }

        let op_type = bytes[0] % 5;
        let rest = &bytes[1..];

        match op_type {
            0 if !rest.is_empty() => Some((FuzzOp::Insert { pos_frac: rest[0] }, &rest[1..])),
            1 if rest.len() >= 2 => {
                let op = FuzzOp::Crowd {
                    pos_frac: rest[0],
                    times: (rest[1] % 64).saturating_add(1),
                };
                Some((op, &rest[2..]))
            }
            2 => Some((FuzzOp::Append, rest)),
            3 => Some((FuzzOp::Rebalance, rest)),
            4 if !rest.is_empty() => Some((FuzzOp::Parse { len: rest[0] % 32 }, &rest[1..])),
            _ => None,
        }
    }
}

fn insert(seq: &RankSequence, ranks: &mut Vec<Rank>, index: usize) {
    match collection::rank_for_position(seq, ranks, index) {
        Ok(rank) => ranks.insert(index.min(ranks.len()), rank),
        Err(RankError::NoRoomBelow { .. }) => assert!(ranks[0].is_min()),
        Err(e) => panic!("insert at {index} failed: {e}"),
    }
}

fn position(pos_frac: u8, len: usize) -> usize {
    return (pos_frac as usize * (len + 1)) / 256;
}

fn main() {
    let seq = RankSequence::default();

    fuzz!(|data: &[u8]| {
        let mut ranks: Vec<Rank> = Vec::new();
        let mut remaining = data;

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;
            if ranks.len() >= MAX_LEN {
                break;
            }

            match op {
                FuzzOp::Insert { pos_frac } => {
                    let index = position(pos_frac, ranks.len());
                    insert(&seq, &mut ranks, index);
                }

                FuzzOp::Crowd { pos_frac, times } => {
                    let index = position(pos_frac, ranks.len());
                    for _ in 0..times {
                        insert(&seq, &mut ranks, index);
                    }
                }

                FuzzOp::Append => {
                    let next = seq.append_after(ranks.last());
                    ranks.push(next);
                }

                FuzzOp::Rebalance => {
                    let mut slots: Vec<Option<Rank>> = ranks.iter().cloned().map(Some).collect();
                    collection::rebalance(&seq, &mut slots);
                    ranks = slots.into_iter().flatten().collect();
                }

                FuzzOp::Parse { len } => {
                    let len = (len as usize).min(remaining.len());
                    let text = String::from_utf8_lossy(&remaining[..len]);
                    if let Ok(rank) = Rank::parse(&text) {
                        assert_eq!(rank.as_str(), text);
                    }
                    remaining = &remaining[len..];
                }
            }

            // CRITICAL INVARIANT: the list stays strictly sorted
            for pair in ranks.windows(2) {
                assert!(pair[0] < pair[1], "order broken: {} !< {}", pair[0], pair[1]);
                assert_eq!(pair[0].bucket(), pair[1].bucket(), "bucket split");
            }
        }

        for rank in &ranks {
            assert_eq!(Rank::parse(rank.as_str()).as_ref(), Ok(rank), "round trip failed");
        }
    });
}
