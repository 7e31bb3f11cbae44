// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

//! Ranking helpers over caller-owned records.
//!
//! Records live wherever the caller keeps them; this module only reads and
//! writes their rank field through [`Ranked`]. Stored ranks are strings
//! because that is what a document store hands back, and a stored value
//! can be malformed.

use rustc_hash::FxHashMap;

use crate::bucket::Bucket;
use crate::digits::MAX_INTEGER;
use crate::error::RankError;
use crate::error::Result;
use crate::rank::Rank;
use crate::sequence::RankSequence;

/// A record with an optional order rank.
pub trait Ranked {
    fn order_rank(&self) -> Option<&str>;
    fn set_order_rank(&mut self, rank: &Rank);
}

impl<T: Ranked> Ranked for &mut T {
    fn order_rank(&self) -> Option<&str> {
        return (**self).order_rank();
    }

    fn set_order_rank(&mut self, rank: &Rank) {
        (**self).set_order_rank(rank);
    }
}

impl Ranked for Option<String> {
    fn order_rank(&self) -> Option<&str> {
        return self.as_deref();
    }

    fn set_order_rank(&mut self, rank: &Rank) {
        *self = Some(rank.to_string());
    }
}

impl Ranked for Option<Rank> {
    fn order_rank(&self) -> Option<&str> {
        return self.as_ref().map(|rank| rank.as_str());
    }

    fn set_order_rank(&mut self, rank: &Rank) {
        *self = Some(rank.clone());
    }
}

/// What [`audit`] found in a collection. Indices refer to the input slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Audit {
    pub total: usize,
    /// Records with any stored rank, valid or not.
    pub ranked: usize,
    pub missing: Vec<usize>,
    pub malformed: Vec<usize>,
    /// Groups of records sharing the same rank string.
    pub duplicates: Vec<Vec<usize>>,
}

impl Audit {
    /// No missing, malformed or duplicated ranks.
    pub fn is_clean(&self) -> bool {
        return self.missing.is_empty() && self.malformed.is_empty() && self.duplicates.is_empty();
    }
}

/// Check every record's rank.
pub fn audit<R: Ranked>(records: &[R]) -> Audit {
    let mut report = Audit {
        total: records.len(),
        ..Audit::default()
    };
    let mut seen: FxHashMap<&str, Vec<usize>> = FxHashMap::default();

    for (i, record) in records.iter().enumerate() {
        let Some(value) = record.order_rank() else {
            report.missing.push(i);
            continue;
        };
        report.ranked += 1;
        if Rank::parse(value).is_err() {
            report.malformed.push(i);
        }
        seen.entry(value).or_default().push(i);
    }

    report.duplicates = seen.into_values().filter(|group| group.len() > 1).collect();
    report.duplicates.sort();
    return report;
}

/// The greatest stored rank, compared as strings the way a store sorts.
///
/// A malformed maximum is an error rather than skipped, since anything
/// appended after it would sort wrong.
pub fn last_rank<R: Ranked>(records: &[R]) -> Result<Option<Rank>> {
    let Some(value) = records.iter().filter_map(|r| r.order_rank()).max() else {
        return Ok(None);
    };
    return Rank::parse(value).map(Some);
}

/// Give every record without a rank one after the current last rank, in
/// slice order. Returns how many records were ranked.
pub fn assign_missing<R: Ranked>(seq: &RankSequence, records: &mut [R]) -> Result<usize> {
    let missing: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.order_rank().is_none())
        .map(|(i, _)| i)
        .collect();
    if missing.is_empty() {
        return Ok(0);
    }

    let last = last_rank(records)?;
    let ranks = seq.sequential(last.as_ref(), missing.len());
    for (i, rank) in missing.iter().zip(&ranks) {
        records[*i].set_order_rank(rank);
    }

    tracing::info!(count = missing.len(), after = ?last, "assigned missing ranks");
    return Ok(missing.len());
}

/// Rank every record from scratch, in slice order.
pub fn migrate<R: Ranked>(seq: &RankSequence, records: &mut [R]) -> usize {
    let ranks = seq.sequential(None, records.len());
    for (record, rank) in records.iter_mut().zip(&ranks) {
        record.set_order_rank(rank);
    }
    tracing::info!(count = records.len(), "migrated ranks");
    return records.len();
}

/// The rank for a record dropped at `index` of `sorted`, an ascending list
/// of the ranks already in the collection. `index` past the end appends.
pub fn rank_for_position(seq: &RankSequence, sorted: &[Rank], index: usize) -> Result<Rank> {
    let index = index.min(sorted.len());
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Ok(seq.middle());
    };

    if index == 0 {
        return seq.prev(first).ok_or_else(|| RankError::NoRoomBelow {
            rank: first.to_string(),
        });
    }
    if index == sorted.len() {
        return Ok(seq.next(last));
    }
    return seq.between(&sorted[index - 1], &sorted[index]);
}

/// Evenly spaced integer ranks for `count` records in `bucket`.
pub fn spread(seq: &RankSequence, bucket: Bucket, count: usize) -> Vec<Rank> {
    let gap = MAX_INTEGER / (count as u64 + 1);
    if gap == 0 {
        return seq.sequential(Some(&Rank::min_in(bucket)), count);
    }
    return (1..=count as u64).map(|i| Rank::from_integer(bucket, gap * i)).collect();
}

/// Move the whole collection into the next bucket with evenly spaced ranks,
/// keeping the current order. Records without a valid rank go last, in
/// slice order. Returns the new bucket.
pub fn rebalance<R: Ranked>(seq: &RankSequence, records: &mut [R]) -> Bucket {
    let mut ranked: Vec<(Rank, usize)> = Vec::new();
    let mut unranked: Vec<usize> = Vec::new();
    for (i, record) in records.iter().enumerate() {
        match record.order_rank().map(Rank::parse) {
            Some(Ok(rank)) => ranked.push((rank, i)),
            _ => unranked.push(i),
        }
    }
    ranked.sort();

    let current = ranked
        .last()
        .map(|(rank, _)| rank.bucket())
        .unwrap_or(seq.config().bucket);
    let target = current.next();

    let order: Vec<usize> = ranked.into_iter().map(|(_, i)| i).chain(unranked).collect();
    let ranks = spread(seq, target, order.len());
    for (i, rank) in order.iter().zip(&ranks) {
        records[*i].set_order_rank(rank);
    }

    tracing::info!(count = order.len(), from = %current, to = %target, "rebalanced");
    return target;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(values: &[Option<&str>]) -> Vec<Option<String>> {
        return values.iter().map(|v| v.map(String::from)).collect();
    }

    #[test]
    fn audit_counts_everything() {
        let records = stored(&[
            Some("0|100008:"),
            None,
            Some("garbage"),
            Some("0|100008:"),
            Some("0|10000g:"),
            None,
        ]);
        let report = audit(&records);
        assert_eq!(report.total, 6);
        assert_eq!(report.ranked, 4);
        assert_eq!(report.missing, vec![1, 5]);
        assert_eq!(report.malformed, vec![2]);
        assert_eq!(report.duplicates, vec![vec![0, 3]]);
        assert!(!report.is_clean());
    }

    #[test]
    fn audit_of_clean_collection() {
        let records = stored(&[Some("0|100008:"), Some("0|10000g:")]);
        assert!(audit(&records).is_clean());
        assert!(audit::<Option<String>>(&[]).is_clean());
    }

    #[test]
    fn last_rank_uses_string_order() {
        let records = stored(&[Some("0|10000g:"), None, Some("0|100008:")]);
        assert_eq!(last_rank(&records).unwrap().unwrap().as_str(), "0|10000g:");
        assert_eq!(last_rank::<Option<String>>(&[None, None]).unwrap(), None);
    }

    #[test]
    fn last_rank_propagates_malformed_maximum() {
        let records = stored(&[Some("0|100008:"), Some("zzz")]);
        assert!(last_rank(&records).unwrap_err().is_malformed());
    }

    #[test]
    fn assign_missing_appends_after_last() {
        let seq = RankSequence::default();
        let mut records = stored(&[Some("0|100008:"), None, Some("0|10000g:"), None]);
        assert_eq!(assign_missing(&seq, &mut records).unwrap(), 2);
        assert_eq!(records[1].as_deref(), Some("0|10000w:"));
        assert_eq!(records[3].as_deref(), Some("0|10001c:"));
        assert_eq!(records[0].as_deref(), Some("0|100008:"));
        assert!(audit(&records).is_clean());
    }

    #[test]
    fn assign_missing_on_empty_collection_starts_after_min() {
        let seq = RankSequence::default();
        let mut records = stored(&[None, None]);
        assert_eq!(assign_missing(&seq, &mut records).unwrap(), 2);
        assert_eq!(records[0].as_deref(), Some("0|100008:"));
        assert_eq!(records[1].as_deref(), Some("0|10000o:"));
    }

    #[test]
    fn assign_missing_with_nothing_to_do() {
        let seq = RankSequence::default();
        let mut records = stored(&[Some("bad")]);
        assert_eq!(assign_missing(&seq, &mut records).unwrap(), 0);
    }

    #[test]
    fn migrate_reranks_in_slice_order() {
        let seq = RankSequence::default();
        let mut records = stored(&[Some("0|zzzzzz:"), None, Some("0|000001:")]);
        assert_eq!(migrate(&seq, &mut records), 3);
        let ranks: Vec<Rank> = records.iter().map(|r| Rank::parse(r.as_deref().unwrap()).unwrap()).collect();
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ranks[0].as_str(), "0|100008:");
    }

    #[test]
    fn rank_for_position_covers_every_slot() {
        let seq = RankSequence::default();
        assert_eq!(rank_for_position(&seq, &[], 0).unwrap(), Rank::middle());

        let sorted = seq.sequential(None, 3);
        for index in 0..=sorted.len() {
            let rank = rank_for_position(&seq, &sorted, index).unwrap();
            if index > 0 {
                assert!(sorted[index - 1] < rank);
            }
            if index < sorted.len() {
                assert!(rank < sorted[index]);
            }
        }
        let past_end = rank_for_position(&seq, &sorted, 99).unwrap();
        assert!(past_end > sorted[2]);
    }

    #[test]
    fn rank_for_position_before_absolute_min() {
        let seq = RankSequence::default();
        let sorted = vec![Rank::min()];
        let err = rank_for_position(&seq, &sorted, 0).unwrap_err();
        assert!(matches!(err, RankError::NoRoomBelow { .. }));
    }

    #[test]
    fn spread_is_even_and_ordered() {
        let seq = RankSequence::default();
        let ranks = spread(&seq, Bucket::One, 3);
        assert_eq!(ranks.len(), 3);
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
        assert!(ranks.iter().all(|r| r.bucket() == Bucket::One && r.precision() == 0));
    }

    #[test]
    fn rebalance_keeps_order_and_moves_bucket() {
        let seq = RankSequence::default();
        let mut records = stored(&[
            Some("0|100000:1"),
            None,
            Some("0|100000:"),
            Some("0|100000:01"),
        ]);
        let bucket = rebalance(&seq, &mut records);
        assert_eq!(bucket, Bucket::One);

        let ranks: Vec<Rank> = records.iter().map(|r| Rank::parse(r.as_deref().unwrap()).unwrap()).collect();
        assert!(ranks.iter().all(|r| r.bucket() == Bucket::One && r.precision() == 0));
        // old order 2, 3, 0 then the unranked 1
        assert!(ranks[2] < ranks[3]);
        assert!(ranks[3] < ranks[0]);
        assert!(ranks[0] < ranks[1]);
    }

    #[test]
    fn ranked_for_option_rank() {
        let mut slot: Option<Rank> = None;
        assert_eq!(slot.order_rank(), None);
        slot.set_order_rank(&Rank::middle());
        assert_eq!(slot.order_rank(), Some("0|hzzzzz:"));
    }
}
