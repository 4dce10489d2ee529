use std::collections::BTreeMap;

use stockwork_core::{DomainError, DomainResult};

/// Spread `qty` packets over `delta` buckets as evenly as possible.
///
/// Whole rounds go to every bucket first. A remainder smaller than half the
/// buckets is placed at evenly spaced positions; a larger one fills every
/// bucket and then removes the surplus at evenly spaced positions from the
/// end. The result is deterministic and its values sum to `qty`.
pub fn distribute(delta: u32, qty: u64) -> DomainResult<BTreeMap<u32, u64>> {
    if delta == 0 {
        return Err(DomainError::validation("cannot distribute over zero periods"));
    }
    let d = u64::from(delta);
    let mut buckets = vec![0u64; delta as usize];
    let mut qty = qty;

    while qty > 0 {
        if qty > d {
            for bucket in buckets.iter_mut() {
                *bucket += qty / d;
            }
            qty %= d;
        } else if d / qty > 1 {
            let half_step = d / qty / 2;
            for i in 0..qty {
                buckets[(i * d / qty + half_step) as usize] += 1;
            }
            qty = 0;
        } else {
            for bucket in buckets.iter_mut() {
                *bucket += 1;
            }
            let surplus = d - qty;
            if surplus > 0 {
                let half_step = d / surplus / 2;
                for i in 0..surplus {
                    buckets[(d - (i * d / surplus + half_step) - 1) as usize] -= 1;
                }
            }
            qty = 0;
        }
    }

    Ok((0..delta).zip(buckets).collect())
}
