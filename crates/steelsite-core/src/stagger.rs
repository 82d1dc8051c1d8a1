#![forbid(unsafe_code)]

//! Stagger utilities: per-item delay offsets for cascading list animations.
//!
//! The mobile menu reveals its items top to bottom and hides them bottom to
//! top, each item a constant step after its neighbour.
//!
//! # Invariants
//!
//! 1. `stagger_offsets(0, ..)` returns an empty vec.
//! 2. For `Forward`, offset[i] = i * step.
//! 3. For `Reverse`, offset[i] = (count - i - 1) * step.
//! 4. Both orders produce the same multiset of offsets; the largest is
//!    `(count - 1) * step`.

use std::time::Duration;

/// Which end of the list animates first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaggerOrder {
    /// First item first.
    Forward,
    /// Last item first.
    Reverse,
}

/// Compute stagger delay offsets for `count` items.
///
/// Uses exact integer arithmetic, so offsets never drift.
#[must_use]
pub fn stagger_offsets(count: usize, step: Duration, order: StaggerOrder) -> Vec<Duration> {
    (0..count)
        .map(|i| {
            let slot = match order {
                StaggerOrder::Forward => i,
                StaggerOrder::Reverse => count - i - 1,
            };
            step.saturating_mul(u32::try_from(slot).unwrap_or(u32::MAX))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_50: Duration = Duration::from_millis(50);

    #[test]
    fn zero_count_returns_empty() {
        assert!(stagger_offsets(0, MS_50, StaggerOrder::Forward).is_empty());
        assert!(stagger_offsets(0, MS_50, StaggerOrder::Reverse).is_empty());
    }

    #[test]
    fn forward_equal_spacing() {
        let offsets = stagger_offsets(4, MS_50, StaggerOrder::Forward);
        assert_eq!(
            offsets,
            vec![
                Duration::ZERO,
                MS_50,
                Duration::from_millis(100),
                Duration::from_millis(150)
            ]
        );
    }

    #[test]
    fn reverse_starts_with_last_item() {
        let offsets = stagger_offsets(3, MS_50, StaggerOrder::Reverse);
        assert_eq!(offsets, vec![Duration::from_millis(100), MS_50, Duration::ZERO]);
    }

    #[test]
    fn both_orders_share_largest_offset() {
        let forward = stagger_offsets(6, MS_50, StaggerOrder::Forward);
        let reverse = stagger_offsets(6, MS_50, StaggerOrder::Reverse);
        assert_eq!(forward.iter().max(), reverse.iter().max());
        assert_eq!(reverse[0], Duration::from_millis(250));
    }

    #[test]
    fn zero_step_all_zero() {
        let offsets = stagger_offsets(5, Duration::ZERO, StaggerOrder::Forward);
        assert!(offsets.iter().all(|d| d.is_zero()));
    }
}
