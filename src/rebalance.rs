//! # Weight Rebalancer
//! Keeps the three weight percentages summing to exactly 100 while the user drags
//! one of them. Pure and stateless: one `WeightVector` in, one out.
//!
//! Policy:
//! 1. The changed field is locked to `clamp(new_value, 0, 100)`.
//! 2. The other two share the remaining budget `100 - new_value` in proportion to
//!    their current values, so their relative balance survives the drag. When both
//!    are zero they share it evenly.
//! 3. Each share is rounded to the nearest integer (halves away from zero).
//! 4. The rounding residual goes to the untouched field with the larger current
//!    value; ties go to the first untouched field in `size, features, comfort` order.
//! 5. If that correction would push the field below zero it is clamped and the
//!    second untouched field absorbs what is left.
//!
//! Input vectors that do not sum to 100 are repaired the same way, since only the
//! untouched fields' ratio is read from them.

use tracing::debug;

use crate::weights::{WeightField, WeightVector, WEIGHT_TOTAL};

/// Set `changed` to `new_value` and redistribute the rest so the vector sums to 100.
pub fn rebalance(current: WeightVector, changed: WeightField, new_value: i64) -> WeightVector {
    let locked = new_value.clamp(0, i64::from(WEIGHT_TOTAL));
    let budget = i64::from(WEIGHT_TOTAL) - locked;

    let [first, second] = changed.others();
    let a = i64::from(current.get(first).min(WEIGHT_TOTAL));
    let b = i64::from(current.get(second).min(WEIGHT_TOTAL));

    let mut pair = apportion(budget, a, b);
    let prefer = if b > a { 1 } else { 0 };
    correct_residual(&mut pair, budget, prefer);

    let mut out = current;
    out.set(changed, to_weight(locked));
    out.set(first, to_weight(pair[0]));
    out.set(second, to_weight(pair[1]));
    out
}

/// Split `budget` between two fields in proportion to `a : b` (evenly when both are 0),
/// rounding each share independently. The result may miss `budget` by one.
fn apportion(budget: i64, a: i64, b: i64) -> [i64; 2] {
    let (wa, wb) = if a + b > 0 {
        (a as f64, b as f64)
    } else {
        debug!(target: "rebalance", budget, "untouched weights both zero; splitting evenly");
        (1.0, 1.0)
    };
    let total = wa + wb;
    let share_a = budget as f64 * wa / total;
    let share_b = budget as f64 * wb / total;
    [share_a.round() as i64, share_b.round() as i64]
}

/// Push `budget - sum(pair)` into `pair[prefer]`; if clamping that field at zero
/// leaves a residual, the other field takes it. Always ends with `sum == budget`
/// for any `budget >= 0`.
fn correct_residual(pair: &mut [i64; 2], budget: i64, prefer: usize) {
    for (pass, idx) in [prefer, 1 - prefer].into_iter().enumerate() {
        let residual = budget - (pair[0] + pair[1]);
        if residual == 0 {
            return;
        }
        if pass > 0 {
            debug!(target: "rebalance", residual, "clamp broke the sum; correcting again");
        }
        pair[idx] = (pair[idx] + residual).max(0);
    }
}

fn to_weight(v: i64) -> u32 {
    u32::try_from(v.clamp(0, i64::from(WEIGHT_TOTAL))).unwrap_or(0)
}
