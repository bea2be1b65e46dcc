//! The position module holds the [Position] trait and its implementation for [Gindex].

use super::{FaultError, FaultResult};
use std::ops::RangeInclusive;

/// A generalized index within the game tree: `2^{depth} + index_at_depth`.
pub type Gindex = u128;

/// The deepest game tree supported. At this depth every trace index still fits within a `u64`.
pub const MAX_GAME_DEPTH: u64 = 64;

/// The [Position] trait defines the interface of a generalized index within a binary tree.
///
/// The unchecked navigation methods (`left`, `right`, `parent`, `make_move`) mirror the onchain
/// arithmetic and never fail. The checked variants (`left_child`, `right_child`, `attack`,
/// `defend`) additionally enforce that the result stays within a tree of `max_depth`.
pub trait Position: Sized {
    /// Returns the depth of the [Position] within the tree.
    fn depth(&self) -> u64;
    /// Returns the index at depth of the [Position] within the tree.
    fn index_at_depth(&self) -> u64;
    /// Returns the left child [Position] relative to the current [Position].
    fn left(&self) -> Self;
    /// Returns the right child [Position] relative to the current [Position].
    fn right(&self) -> Self;
    /// Returns the parent [Position] relative to the current [Position].
    fn parent(&self) -> Self;
    /// Returns the rightmost leaf [Position] within the subtree rooted at the current [Position].
    fn right_index(&self, max_depth: u64) -> Self;
    /// Returns the trace index that the current [Position] commits to: the rightmost trace
    /// index covered by its subtree.
    fn trace_index(&self, max_depth: u64) -> u64;
    /// Returns the inclusive range of trace indices covered by the subtree rooted at the current
    /// [Position].
    fn trace_range(&self, max_depth: u64) -> RangeInclusive<u64>;
    /// Returns the left child, failing with [FaultError::InvalidDepth] at the leaf level.
    fn left_child(&self, max_depth: u64) -> FaultResult<Self>;
    /// Returns the right child, failing with [FaultError::InvalidDepth] at the leaf level.
    fn right_child(&self, max_depth: u64) -> FaultResult<Self>;
    /// Returns the relative [Position] for an attack or defense move against the current [Position].
    fn make_move(&self, is_attack: bool) -> Self;
    /// Returns the [Position] of an attack against the current [Position].
    fn attack(&self, max_depth: u64) -> FaultResult<Self>;
    /// Returns the [Position] of a defense of the current [Position]. The root cannot be defended,
    /// as there is no opposing claim above it.
    fn defend(&self, max_depth: u64) -> FaultResult<Self>;
}

/// Computes a generalized index from a depth and index at depth.
///
/// ### Takes
/// - `depth`: The depth of the generalized index.
/// - `index_at_depth`: The index at depth of the generalized index.
///
/// ### Returns
/// - `Gindex`: The generalized index: `2^{depth} + index_at_depth`.
pub fn compute_gindex(depth: u8, index_at_depth: u64) -> Gindex {
    2u128.pow(depth as u32) + index_at_depth as u128
}

/// Computes a generalized index from a depth and index at depth, validating that the node exists
/// within a tree of `max_depth`.
///
/// ### Takes
/// - `depth`: The depth of the generalized index.
/// - `index_at_depth`: The index at depth of the generalized index.
/// - `max_depth`: The maximum depth of the game tree.
///
/// ### Returns
/// - `Ok(Gindex)`: The generalized index.
/// - `Err(FaultError)`: `max_depth` is unsupported, or the node is not part of the tree.
pub fn try_gindex(depth: u64, index_at_depth: u64, max_depth: u64) -> FaultResult<Gindex> {
    if max_depth > MAX_GAME_DEPTH {
        return Err(FaultError::InvalidMaxDepth(max_depth));
    }
    if depth > max_depth || index_at_depth as u128 >= 1u128 << depth {
        return Err(FaultError::InvalidPosition {
            depth,
            index_at_depth,
            max_depth,
        });
    }
    Ok((1u128 << depth) | index_at_depth as u128)
}

/// Ensures that `gindex` is a node above the leaf level of a tree of `max_depth`.
fn ensure_above_leaves(gindex: Gindex, max_depth: u64, reason: &'static str) -> FaultResult<()> {
    if gindex == 0 || gindex.depth() >= max_depth {
        return Err(FaultError::InvalidDepth {
            gindex,
            max_depth,
            reason,
        });
    }
    Ok(())
}

/// Implementation of the [Position] trait for [Gindex].
impl Position for Gindex {
    fn depth(&self) -> u64 {
        127 - self.leading_zeros() as u64
    }

    fn index_at_depth(&self) -> u64 {
        (self - (1 << self.depth())) as u64
    }

    fn left(&self) -> Self {
        self << 1
    }

    fn right(&self) -> Self {
        self.left() | 1
    }

    fn parent(&self) -> Self {
        self >> 1
    }

    fn right_index(&self, max_depth: u64) -> Self {
        let remaining = max_depth - self.depth();
        (self << remaining) | ((1 << remaining) - 1)
    }

    fn trace_index(&self, max_depth: u64) -> u64 {
        self.right_index(max_depth).index_at_depth()
    }

    fn trace_range(&self, max_depth: u64) -> RangeInclusive<u64> {
        let leftmost = self << (max_depth - self.depth());
        leftmost.index_at_depth()..=self.trace_index(max_depth)
    }

    fn left_child(&self, max_depth: u64) -> FaultResult<Self> {
        ensure_above_leaves(*self, max_depth, "leaf positions have no children")?;
        Ok(self.left())
    }

    fn right_child(&self, max_depth: u64) -> FaultResult<Self> {
        ensure_above_leaves(*self, max_depth, "leaf positions have no children")?;
        Ok(self.right())
    }

    fn make_move(&self, is_attack: bool) -> Self {
        ((!is_attack as u128) | self) << 1
    }

    fn attack(&self, max_depth: u64) -> FaultResult<Self> {
        ensure_above_leaves(*self, max_depth, "cannot attack below the leaf level")?;
        Ok(self.make_move(true))
    }

    fn defend(&self, max_depth: u64) -> FaultResult<Self> {
        ensure_above_leaves(*self, max_depth, "cannot defend below the leaf level")?;
        if self.depth() == 0 {
            return Err(FaultError::InvalidDepth {
                gindex: *self,
                max_depth,
                reason: "the root position has no parent to defend against",
            });
        }
        Ok(self.make_move(false))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    const MAX_DEPTH: u64 = 4;

    /// `(depth, index_at_depth, trace_index, first trace index covered)` for every node of a tree
    /// of depth [MAX_DEPTH].
    const EXPECTED_VALUES: &[(u64, u64, u64, u64)] = &[
        (0, 0, 15, 0),
        (1, 0, 7, 0),
        (1, 1, 15, 8),
        (2, 0, 3, 0),
        (2, 1, 7, 4),
        (2, 2, 11, 8),
        (2, 3, 15, 12),
        (3, 0, 1, 0),
        (3, 1, 3, 2),
        (3, 2, 5, 4),
        (3, 3, 7, 6),
        (3, 4, 9, 8),
        (3, 5, 11, 10),
        (3, 6, 13, 12),
        (3, 7, 15, 14),
    ];

    #[test]
    fn position_correctness_static() {
        for (i, &(depth, index_at_depth, trace_index, first)) in EXPECTED_VALUES.iter().enumerate() {
            let pos = try_gindex(depth, index_at_depth, MAX_DEPTH).unwrap();
            // Breadth-first enumeration of the tree yields consecutive generalized indices.
            assert_eq!(pos, (i + 1) as Gindex);
            assert_eq!(pos.depth(), depth);
            assert_eq!(pos.index_at_depth(), index_at_depth);
            assert_eq!(pos.trace_index(MAX_DEPTH), trace_index);
            assert_eq!(pos.trace_range(MAX_DEPTH), first..=trace_index);
        }
    }

    #[test]
    fn leaves_commit_to_their_own_index() {
        for index in 0..16 {
            let leaf = try_gindex(MAX_DEPTH, index, MAX_DEPTH).unwrap();
            assert_eq!(leaf.trace_index(MAX_DEPTH), index);
            assert_eq!(leaf.right_index(MAX_DEPTH), leaf);
        }
    }

    #[test]
    fn compute_gindex_matches_checked() {
        assert_eq!(compute_gindex(0, 0), 1);
        assert_eq!(compute_gindex(3, 4), try_gindex(3, 4, 3).unwrap());
        assert_eq!(compute_gindex(2, 2), 6);
    }

    #[test]
    fn try_gindex_rejects_nodes_outside_the_tree() {
        assert!(matches!(
            try_gindex(4, 0, 3),
            Err(FaultError::InvalidPosition { depth: 4, .. })
        ));
        assert!(matches!(
            try_gindex(2, 4, 3),
            Err(FaultError::InvalidPosition {
                index_at_depth: 4,
                ..
            })
        ));
        assert!(matches!(
            try_gindex(0, 0, MAX_GAME_DEPTH + 1),
            Err(FaultError::InvalidMaxDepth(65))
        ));
        assert!(try_gindex(MAX_GAME_DEPTH, u64::MAX, MAX_GAME_DEPTH).is_ok());
    }

    #[test]
    fn moves_static() {
        // (claim position, is_attack, expected move position) within a tree of depth 3.
        let cases = [
            ((0, 0), true, (1, 0)),
            ((1, 0), true, (2, 0)),
            ((1, 0), false, (2, 2)),
            ((1, 1), true, (2, 2)),
            ((2, 2), true, (3, 4)),
            ((2, 2), false, (3, 6)),
            ((2, 1), false, (3, 2)),
        ];
        for ((depth, index), is_attack, (move_depth, move_index)) in cases {
            let pos = try_gindex(depth, index, 3).unwrap();
            let expected = try_gindex(move_depth, move_index, 3).unwrap();
            let mv = if is_attack {
                pos.attack(3).unwrap()
            } else {
                pos.defend(3).unwrap()
            };
            assert_eq!(mv, expected);
            assert_eq!(mv, pos.make_move(is_attack));
        }
    }

    #[test]
    fn leaf_has_no_children() {
        let leaf = try_gindex(3, 5, 3).unwrap();
        assert!(matches!(
            leaf.left_child(3),
            Err(FaultError::InvalidDepth { gindex: 13, max_depth: 3, .. })
        ));
        assert!(leaf.right_child(3).is_err());
        assert!(leaf.attack(3).is_err());
        assert!(leaf.defend(3).is_err());
        assert!(0u128.left_child(3).is_err());
    }

    #[test]
    fn root_cannot_be_defended() {
        assert!(matches!(
            1u128.defend(3),
            Err(FaultError::InvalidDepth { gindex: 1, .. })
        ));
        assert_eq!(1u128.attack(3).unwrap(), 2);
    }

    #[test]
    fn ordering_is_structural() {
        let a = try_gindex(1, 1, 3).unwrap();
        let b = try_gindex(2, 0, 3).unwrap();
        let c = try_gindex(2, 3, 3).unwrap();
        assert!(a < b && b < c);
        assert_eq!(a, compute_gindex(1, 1));
    }

    /// Generates `(max_depth, depth, index_at_depth)` with `depth < max_depth`.
    fn inner_node() -> impl Strategy<Value = (u64, u64, u64)> {
        (1..=MAX_GAME_DEPTH)
            .prop_flat_map(|max_depth| (Just(max_depth), 0..max_depth, any::<u64>()))
            .prop_map(|(max_depth, depth, raw)| {
                let index = if depth == 0 { 0 } else { raw >> (64 - depth) };
                (max_depth, depth, index)
            })
    }

    proptest! {
        #[test]
        fn children_bisect_the_parent_range((max_depth, depth, index) in inner_node()) {
            let pos = try_gindex(depth, index, max_depth).unwrap();
            let (left, right) = (pos.left_child(max_depth).unwrap(), pos.right_child(max_depth).unwrap());
            prop_assert_eq!(left.depth(), depth + 1);
            prop_assert_eq!(right.depth(), depth + 1);
            prop_assert!(left.trace_index(max_depth) < right.trace_index(max_depth));

            let (parent, l, r) = (
                pos.trace_range(max_depth),
                left.trace_range(max_depth),
                right.trace_range(max_depth),
            );
            prop_assert_eq!(l.start(), parent.start());
            prop_assert_eq!(*l.end() + 1, *r.start());
            prop_assert_eq!(r.end(), parent.end());
            prop_assert_eq!(l.end() - l.start(), r.end() - r.start());
        }

        #[test]
        fn trace_index_is_monotonic_at_depth((max_depth, depth, index) in inner_node()) {
            prop_assume!(depth > 0 && index + 1 < 1u64 << depth);
            let pos = try_gindex(depth, index, max_depth).unwrap();
            let next = try_gindex(depth, index + 1, max_depth).unwrap();
            prop_assert!(pos.trace_index(max_depth) < next.trace_index(max_depth));
            prop_assert_eq!(*pos.trace_range(max_depth).end() + 1, *next.trace_range(max_depth).start());
        }

        #[test]
        fn moves_descend_one_level((max_depth, depth, index) in inner_node()) {
            let pos = try_gindex(depth, index, max_depth).unwrap();
            let attack = pos.attack(max_depth).unwrap();
            prop_assert_eq!(attack.depth(), depth + 1);
            prop_assert_eq!(attack.parent(), pos);
            if depth > 0 {
                let defend = pos.defend(max_depth).unwrap();
                prop_assert_eq!(defend.depth(), depth + 1);
                prop_assert!(defend.trace_index(max_depth) > pos.trace_index(max_depth) || index % 2 == 1);
            }
        }

        #[test]
        fn leaf_trace_index_is_index_at_depth(max_depth in 0..=MAX_GAME_DEPTH, raw in any::<u64>()) {
            let index = if max_depth == 0 { 0 } else { raw >> (64 - max_depth) };
            let leaf = try_gindex(max_depth, index, max_depth).unwrap();
            prop_assert_eq!(leaf.trace_index(max_depth), index);
            prop_assert!(leaf.left_child(max_depth).is_err());
        }
    }
}
