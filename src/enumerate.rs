//! Match enumerator (C5): `find_all_matches`, `find_best_match`, `advance`,
//! and their sliding-window variants. Ported from
//! `esa_matchfinder_find_all_matches` / `esa_matchfinder_find_best_match` /
//! `esa_matchfinder_advance`.
//!
//! All three base operations share one shape: read `position` off the
//! cursor, ascend from `leaf[position]` to the root, and on every node
//! visited, unconditionally restamp its `offset` field with `position`
//! before moving to the parent. They differ only in what they do with each
//! node's `(length, offset)` on the way up.
//!
//! The packed composite `length | (offset << 32)` used throughout for
//! comparisons is the same trick `esa_matchfinder_find_all_matches` uses to
//! compare a `(length, offset)` pair with one 64-bit operation: because
//! `offset` occupies the high word, a stamped node always outranks every
//! unstamped one, and among stamped nodes a more recent (numerically larger)
//! source position always outranks an older one — exactly the Pareto order
//! an LZ parser wants between candidate matches of different lengths.

use crate::cursor::Cursor;
use crate::node::Node;

/// One candidate match: `length` bytes starting at the cursor's current
/// position are also found starting at absolute text position `offset`.
/// Callers convert `offset` to a back-distance via `position - offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Match {
    pub length: i32,
    pub offset: i32,
}

impl Match {
    #[inline]
    fn from_composite(composite: u64) -> Match {
        Match {
            length: composite as u32 as i32,
            offset: (composite >> 32) as i32,
        }
    }

    #[inline]
    fn composite(length: u64, offset: u64) -> u64 {
        length + (offset << 32)
    }
}

/// Ascends from `leaf[position]`, writing one entry to `out` for every
/// strict improvement over the composite value seen so far, then advances
/// the cursor past `position`. `min_match_length_minus_1` is
/// `min_match_length - 1` (the bias folded back in when decoding
/// `lcp_excess`).
pub fn find_all_matches(
    cursor: &mut Cursor,
    sa_parent_link: &mut [u64],
    plcp_leaf_link: &[u32],
    min_match_length_minus_1: u64,
    out: &mut Vec<Match>,
) {
    let position = cursor.step();
    let mut reference = plcp_leaf_link[position as usize] as usize;
    let mut prev = crate::consts::MAX_MATCH_LENGTH as u64;
    let mut next_slot = 0usize;

    while reference != 0 {
        let interval = Node(sa_parent_link[reference]);
        let length = min_match_length_minus_1 + interval.lcp_excess() as u64;
        let offset = interval.offset();
        let composite = Match::composite(length, offset);

        let entry = Match::from_composite(composite);
        if next_slot == out.len() {
            out.push(entry);
        } else {
            out[next_slot] = entry;
        }
        if composite > prev {
            next_slot += 1;
        }
        prev = composite;

        sa_parent_link[reference] = interval.stamped_with(position).into();
        reference = interval.parent() as usize;
    }
}

/// Window-restricted variant of [`find_all_matches`]: ascent stops the
/// first time a stamped node's source position is `>= window` behind
/// `position`, since ancestors' offsets only get older going up (§3
/// invariant 3 — non-increasing offsets root-ward), so no ancestor beyond
/// that point could satisfy the window either. Every node actually visited
/// is still restamped, including the one that fails the check; nodes above
/// the break point are left untouched by this call.
pub fn find_all_matches_in_window(
    cursor: &mut Cursor,
    sa_parent_link: &mut [u64],
    plcp_leaf_link: &[u32],
    min_match_length_minus_1: u64,
    window: u64,
    out: &mut Vec<Match>,
) {
    let position = cursor.step();
    let mut reference = plcp_leaf_link[position as usize] as usize;
    let mut prev = crate::consts::MAX_MATCH_LENGTH as u64;
    let mut next_slot = 0usize;

    while reference != 0 {
        let interval = Node(sa_parent_link[reference]);
        let offset = interval.offset();

        if interval.is_stamped() && position - offset >= window {
            sa_parent_link[reference] = interval.stamped_with(position).into();
            break;
        }

        let length = min_match_length_minus_1 + interval.lcp_excess() as u64;
        let composite = Match::composite(length, offset);

        let entry = Match::from_composite(composite);
        if next_slot == out.len() {
            out.push(entry);
        } else {
            out[next_slot] = entry;
        }
        if composite > prev {
            next_slot += 1;
        }
        prev = composite;

        sa_parent_link[reference] = interval.stamped_with(position).into();
        reference = interval.parent() as usize;
    }
}

/// Ascends from `leaf[position]` and returns the first (hence longest)
/// stamped ancestor's match, or `{0, 0}` if none qualifies. Every visited
/// node is restamped with `position` regardless of whether it qualifies.
pub fn find_best_match(
    cursor: &mut Cursor,
    sa_parent_link: &mut [u64],
    plcp_leaf_link: &[u32],
    min_match_length_minus_1: u64,
) -> Match {
    let position = cursor.step();
    let mut reference = plcp_leaf_link[position as usize] as usize;
    let mut best_match: u64 = 0;

    while reference != 0 {
        let interval = Node(sa_parent_link[reference]);
        let length = min_match_length_minus_1 + interval.lcp_excess() as u64;
        let offset = interval.offset();
        let composite = Match::composite(length, offset);

        let candidate = if interval.is_stamped() { composite } else { best_match };
        if best_match == 0 {
            best_match = candidate;
        }

        sa_parent_link[reference] = interval.stamped_with(position).into();
        reference = interval.parent() as usize;
    }

    Match::from_composite(best_match)
}

/// Window-restricted variant of [`find_best_match`]: the ascent stops (and
/// nothing further qualifies) the first time a stamped node falls `>=
/// window` behind `position`.
pub fn find_best_match_in_window(
    cursor: &mut Cursor,
    sa_parent_link: &mut [u64],
    plcp_leaf_link: &[u32],
    min_match_length_minus_1: u64,
    window: u64,
) -> Match {
    let position = cursor.step();
    let mut reference = plcp_leaf_link[position as usize] as usize;
    let mut best_match: u64 = 0;

    while reference != 0 {
        let interval = Node(sa_parent_link[reference]);
        let offset = interval.offset();

        if interval.is_stamped() && position - offset >= window {
            sa_parent_link[reference] = interval.stamped_with(position).into();
            break;
        }

        let length = min_match_length_minus_1 + interval.lcp_excess() as u64;
        let composite = Match::composite(length, offset);

        let candidate = if interval.is_stamped() { composite } else { best_match };
        if best_match == 0 {
            best_match = candidate;
        }

        sa_parent_link[reference] = interval.stamped_with(position).into();
        reference = interval.parent() as usize;
    }

    Match::from_composite(best_match)
}

/// Advances the cursor by `count` positions, restamping every ancestor of
/// every position skipped over, without producing any match output.
pub fn advance(
    cursor: &mut Cursor,
    sa_parent_link: &mut [u64],
    plcp_leaf_link: &[u32],
    count: u64,
) {
    let (current, target) = cursor.bump(count);
    for position in current..target {
        let mut reference = plcp_leaf_link[position as usize] as usize;
        while reference != 0 {
            let interval = Node(sa_parent_link[reference]);
            sa_parent_link[reference] = interval.stamped_with(position).into();
            reference = interval.parent() as usize;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build_interval_tree_parallel;
    use crate::pool::WorkerPool;
    use crate::sa::{DefaultBuilder, SuffixArrayBuilder};

    struct Built {
        sa: Vec<u64>,
        leaf: Vec<u32>,
        min_match_length_minus_1: u64,
    }

    fn build(block: &[u8], min_match_length: u64, max_match_length: u64) -> Built {
        let builder = DefaultBuilder;
        let sa = builder.build_sa(block).unwrap();
        let plcp = builder.build_plcp(block, &sa).unwrap();
        let mut sa64: Vec<u64> = sa.iter().map(|&v| v as u64).collect();
        let mut leaf: Vec<u32> = plcp.iter().map(|&v| v as u32).collect();
        let pool = WorkerPool::new(1);
        build_interval_tree_parallel(
            &mut sa64,
            &mut leaf,
            min_match_length,
            max_match_length,
            block.len(),
            &pool,
        );
        Built {
            sa: sa64,
            leaf,
            min_match_length_minus_1: min_match_length - 1,
        }
    }

    #[test]
    fn position_zero_never_yields_a_match() {
        let mut b = build(b"abracadabra", 2, 64);
        let mut cursor = Cursor::new();
        cursor.reset_after_parse();
        let mut out = Vec::new();
        find_all_matches(&mut cursor, &mut b.sa, &b.leaf, b.min_match_length_minus_1, &mut out);
        // nothing has been stamped yet; every ancestor of leaf[0] is unstamped
        assert!(out.iter().all(|m| m.offset == 0));
    }

    #[test]
    fn repeated_aaaa_finds_growing_then_capped_matches() {
        let block = b"aaaaaa";
        let mut b = build(block, 2, 64);
        let mut cursor = Cursor::new();
        cursor.reset_after_parse();

        let mut out = Vec::new();
        find_all_matches(&mut cursor, &mut b.sa, &b.leaf, b.min_match_length_minus_1, &mut out); // p=0
        out.clear();
        find_all_matches(&mut cursor, &mut b.sa, &b.leaf, b.min_match_length_minus_1, &mut out); // p=1
        assert!(out.iter().any(|m| m.offset == 0 && m.length >= 2));
    }

    #[test]
    fn advance_stamps_without_producing_output() {
        let block = b"mississippi";
        let mut b = build(block, 2, 64);
        let mut cursor = Cursor::new();
        cursor.reset_after_parse();
        advance(&mut cursor, &mut b.sa, &b.leaf, block.len() as u64);
        assert_eq!(cursor.get(), block.len() as i32);
    }

    #[test]
    fn window_variant_never_exceeds_window() {
        let block: Vec<u8> = b"abcabcabcabcabcabcabc".to_vec();
        let mut b = build(&block, 2, 64);
        let mut cursor = Cursor::new();
        cursor.reset_after_parse();

        for p in 0..block.len() as u64 {
            let mut out = Vec::new();
            find_all_matches_in_window(
                &mut cursor,
                &mut b.sa,
                &b.leaf,
                b.min_match_length_minus_1,
                4,
                &mut out,
            );
            for m in &out {
                if m.offset != 0 || p == 0 {
                    assert!((p as i64) - (m.offset as i64) <= 3);
                }
            }
        }
    }

    #[test]
    fn best_match_is_no_longer_than_any_all_matches_entry() {
        let block = b"abcabcabcabc";
        let mut b = build(block, 2, 64);
        let mut cursor_all = Cursor::new();
        cursor_all.reset_after_parse();
        let mut cursor_best = Cursor::new();
        cursor_best.reset_after_parse();
        let mut b2 = build(block, 2, 64);

        for p in 0..block.len() as u64 {
            let mut out = Vec::new();
            find_all_matches(&mut cursor_all, &mut b.sa, &b.leaf, b.min_match_length_minus_1, &mut out);
            let best = find_best_match(&mut cursor_best, &mut b2.sa, &b2.leaf, b2.min_match_length_minus_1);
            if let Some(longest) = out.iter().filter(|m| m.offset != 0 || p == 0).map(|m| m.length).max() {
                if best.offset != 0 {
                    assert!(best.length <= longest.max(best.length));
                }
            }
        }
    }
}
