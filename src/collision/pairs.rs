//! Pair Table Construction
//!
//! Helpers for building the exemption table consumed by the line kernels.
//! A paired (body, collection) combination is skipped during line hit
//! detection and restriction, which keeps a body from clipping the lines it
//! owns. Ownership itself lives with the caller; these helpers only turn a
//! caller-side association into [`PairRecord`]s.

use crate::collision::records::PairRecord;

/// Pair every body and collection that share a key.
///
/// Keys are whatever the caller identifies ownership by. Indices in the
/// resulting records are positions in the input slices, matching the
/// group-relative indices the kernels compare against.
pub fn build_pair_table<K: PartialEq>(body_keys: &[K], collection_keys: &[K]) -> Vec<PairRecord> {
    let mut pairs = Vec::new();
    for (body_index, body_key) in body_keys.iter().enumerate() {
        for (collection_index, collection_key) in collection_keys.iter().enumerate() {
            if body_key == collection_key {
                pairs.push(PairRecord {
                    body_index: body_index as i32,
                    collection_index: collection_index as i32,
                });
            }
        }
    }
    pairs
}

/// Pair every (body, collection) combination the predicate accepts.
pub fn build_pair_table_with<F>(
    body_count: usize,
    collection_count: usize,
    mut paired: F,
) -> Vec<PairRecord>
where
    F: FnMut(usize, usize) -> bool,
{
    let mut pairs = Vec::new();
    for body_index in 0..body_count {
        for collection_index in 0..collection_count {
            if paired(body_index, collection_index) {
                pairs.push(PairRecord {
                    body_index: body_index as i32,
                    collection_index: collection_index as i32,
                });
            }
        }
    }
    pairs
}
