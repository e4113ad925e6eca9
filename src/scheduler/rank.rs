use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::core::{Seq, Ticks};

/// Leading sort key. A policy only ever builds one variant, so the
/// cross-variant order never decides anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Primary {
    Ticks(Ticks),
    Vruntime(OrderedFloat<f64>),
}

/// Ready-queue key: primary key, then secondary key, then input order.
/// Smaller ranks run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    pub primary: Primary,
    // Wide enough for both arrival times and signed priorities
    pub secondary: i128,
    pub seq: Seq,
}

impl Rank {
    pub fn by_ticks(primary: Ticks, secondary: Ticks, seq: Seq) -> Self {
        Self {
            primary: Primary::Ticks(primary),
            secondary: i128::from(secondary),
            seq,
        }
    }

    pub fn by_vruntime(vruntime: f64, priority: i64, seq: Seq) -> Self {
        Self {
            primary: Primary::Vruntime(OrderedFloat(vruntime)),
            secondary: i128::from(priority),
            seq,
        }
    }

    fn key(&self) -> (Primary, i128, Seq) {
        (self.primary, self.secondary, self.seq)
    }
}

// KeyedPriorityQueue pops the greatest priority, so the order is inverted
impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smaller_keys_compare_greater() {
        assert!(Rank::by_vruntime(1.0, 9, 9) > Rank::by_vruntime(2.0, 0, 0));
        assert!(Rank::by_vruntime(1.0, 0, 9) > Rank::by_vruntime(1.0, 1, 0));
        assert!(Rank::by_vruntime(1.0, 1, 0) > Rank::by_vruntime(1.0, 1, 1));
        assert!(Rank::by_vruntime(1.0, -3, 5) > Rank::by_vruntime(1.0, 0, 0));
        assert_eq!(Rank::by_vruntime(0.5, 1, 1), Rank::by_vruntime(0.5, 1, 1));
    }

    #[test]
    fn tick_keys_keep_full_precision() {
        // Adjacent values above 2^53 collapse to one f64
        let big = u64::MAX - 1;
        assert!(Rank::by_ticks(big, 0, 9) > Rank::by_ticks(big + 1, 0, 0));
        assert!(Rank::by_ticks(5, big, 9) > Rank::by_ticks(5, big + 1, 0));
        assert!(Rank::by_ticks(5, 1 << 63, 9) < Rank::by_ticks(5, 0, 0));
    }
}
