use crate::core::config::ResultOrder;
use crate::core::motif::{Candidate, MotifRecord};

/// Greedily select non-overlapping candidates for one channel, highest energy first.
///
/// Candidates are stably sorted by descending energy, so equal energies keep
/// their generation order. Each candidate is accepted only if none of its
/// indices has been claimed by an earlier acceptance. This is a greedy
/// heuristic for weighted interval selection, not an optimal solver; the
/// selection semantics are part of the output contract.
///
/// The returned records are in selection order.
pub fn resolve_overlaps(mut candidates: Vec<Candidate>) -> Vec<MotifRecord> {
    candidates.sort_by(|a, b| b.energy.total_cmp(&a.energy));

    let span = candidates.iter().map(Candidate::end).max().unwrap_or(0);
    let mut claimed = vec![false; span];
    let mut selected = Vec::new();

    for candidate in candidates {
        let range = candidate.start..candidate.end();
        if claimed[range.clone()].iter().any(|&c| c) {
            continue;
        }
        claimed[range].fill(true);
        selected.push(MotifRecord::from(candidate));
    }

    selected
}

/// Reorder resolved records according to `order`.
pub fn apply_order(records: &mut [MotifRecord], order: ResultOrder) {
    match order {
        ResultOrder::Selection => {}
        ResultOrder::Start => records.sort_by_key(|r| r.start),
    }
}
