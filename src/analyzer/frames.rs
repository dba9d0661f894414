//! Queries over a parsed frame sequence: filtering and plot series.

use std::collections::BTreeMap;

use super::types::{FrameRecord, MAX_DATA_BYTES};

/// Records whose identifier equals `identifier`, in their original order.
///
/// No match is a valid outcome and yields an empty vector.
pub fn filter_by_id(records: &[FrameRecord], identifier: u32) -> Vec<FrameRecord> {
    records.iter().filter(|r| r.identifier() == identifier).copied().collect()
}

/// Every identifier present with its frame count, ordered by identifier.
pub fn identifier_counts(records: &[FrameRecord]) -> Vec<(u32, usize)> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.identifier()).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// One `[timestamp, value]` series per byte position.
///
/// Points keep record order. A record with fewer bytes adds nothing to the
/// positions it does not carry.
pub fn byte_series(records: &[FrameRecord]) -> [Vec<[f64; 2]>; MAX_DATA_BYTES] {
    let mut series: [Vec<[f64; 2]>; MAX_DATA_BYTES] = Default::default();
    for record in records {
        for (position, byte) in record.data_bytes().iter().enumerate() {
            series[position].push([record.timestamp(), f64::from(*byte)]);
        }
    }
    series
}
