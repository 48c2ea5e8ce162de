//! Integration tests: concrete scenarios plus the property suite (P1-P8).

use esa_matchfinder::{Match, MatchFinder};

/// Small deterministic PRNG (xorshift64*) so random-block tests are
/// reproducible without pulling in a dev-dependency for it.
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Rng {
        Rng(seed | 1)
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    fn next_byte_in(&mut self, alphabet: &[u8]) -> u8 {
        alphabet[(self.next_u64() as usize) % alphabet.len()]
    }

    fn block(&mut self, len: usize, alphabet: &[u8]) -> Vec<u8> {
        (0..len).map(|_| self.next_byte_in(alphabet)).collect()
    }
}

fn brute_force_longest_match(block: &[u8], p: usize, min_len: usize, max_len: usize) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for q in 0..p {
        let mut len = 0;
        while p + len < block.len() && q + len < block.len() && block[p + len] == block[q + len] && len < max_len {
            len += 1;
        }
        if len >= min_len {
            match best {
                Some((best_len, best_q)) if len < best_len || (len == best_len && q <= best_q) => {}
                _ => best = Some((len, q)),
            }
        }
    }
    best
}

#[test]
fn position_zero_has_no_match() {
    let mut mf = MatchFinder::create(32, 2, 64, 1).unwrap();
    mf.parse(b"abracadabra").unwrap();
    let mut out = Vec::new();
    mf.find_all_matches(&mut out);
    assert!(out.iter().all(|m| m.offset == 0));
}

#[test]
fn aaaaaa_grows_then_caps() {
    let mut mf = MatchFinder::create(32, 2, 4, 1).unwrap();
    mf.parse(b"aaaaaa").unwrap();
    let mut last = Match::default();
    for _ in 0..6 {
        last = mf.find_best_match();
    }
    assert!(last.length <= 4);
}

#[test]
fn empty_block_has_no_matches() {
    let mut mf = MatchFinder::create(8, 2, 64, 1).unwrap();
    mf.parse(b"").unwrap();
    assert_eq!(mf.get_position(), 0);
}

#[test]
fn single_byte_block_has_no_matches() {
    let mut mf = MatchFinder::create(8, 2, 64, 1).unwrap();
    mf.parse(b"x").unwrap();
    let mut out = Vec::new();
    mf.find_all_matches(&mut out);
    assert!(out.is_empty() || out.iter().all(|m| m.offset == 0));
}

#[test]
fn mississippi_walks_without_panicking() {
    let mut mf = MatchFinder::create(32, 2, 64, 1).unwrap();
    mf.parse(b"mississippi").unwrap();
    let mut out = Vec::new();
    for _ in 0..11 {
        mf.find_all_matches(&mut out);
    }
    assert_eq!(mf.get_position(), 11);
}

// P1: every non-root node index has parent < its own index. The packed
// tree doesn't expose raw indices publicly, so this is exercised through
// `build` directly in `src/build.rs`'s own unit tests; here we just assert
// that repeated parses over varied blocks never panic, which would be the
// observable symptom of a parent-ordering violation during construction.
#[test]
fn p1_repeated_parses_over_varied_blocks_do_not_panic() {
    let mut rng = Rng::new(1);
    let mut mf = MatchFinder::create(512, 2, 64, 1).unwrap();
    for _ in 0..20 {
        let len = 1 + (rng.next_u64() as usize % 400);
        let block = rng.block(len, b"ab");
        mf.parse(&block).unwrap();
        let mut out = Vec::new();
        for _ in 0..len {
            mf.find_all_matches(&mut out);
        }
    }
}

// P3: rewinding to the same position twice leaves identical offset state,
// observed indirectly through identical subsequent match output.
#[test]
fn p3_reset_idempotence() {
    let block = b"abcabcabcabcabcabc";
    let mut mf = MatchFinder::create(64, 2, 64, 1).unwrap();
    mf.parse(block).unwrap();
    let mut out = Vec::new();
    for _ in 0..block.len() {
        mf.find_all_matches(&mut out);
    }

    mf.rewind(5).unwrap();
    mf.rewind(5).unwrap();
    let mut first = Vec::new();
    mf.find_all_matches(&mut first);

    mf.rewind(0).unwrap();
    mf.rewind(5).unwrap();
    mf.rewind(5).unwrap();
    let mut second = Vec::new();
    mf.find_all_matches(&mut second);

    assert_eq!(first, second);
}

// P4: rewind(q) agrees with q sequential query calls from position 0, up
// to discarded match output — observed by comparing the match returned at
// position q immediately after each path.
#[test]
fn p4_fast_forward_agrees_with_sequential_walk() {
    let block = b"mississippimississippi";
    let mut mf_walk = MatchFinder::create(64, 2, 64, 1).unwrap();
    mf_walk.parse(block).unwrap();
    for q in 0..block.len() {
        let mut mf_rewind = MatchFinder::create(64, 2, 64, 1).unwrap();
        mf_rewind.parse(block).unwrap();
        mf_rewind.rewind(q as i32).unwrap();

        let mut walker = MatchFinder::create(64, 2, 64, 1).unwrap();
        walker.parse(block).unwrap();
        for _ in 0..q {
            walker.find_best_match();
        }

        let via_rewind = mf_rewind.find_best_match();
        let via_walk = walker.find_best_match();
        assert_eq!(via_rewind, via_walk, "mismatch at q={q}");
    }
}

// P5: at any position, find_all_matches returns a list strictly decreasing
// in length with strictly increasing offsets.
#[test]
fn p5_pareto_property() {
    let mut rng = Rng::new(7);
    for _ in 0..10 {
        let len = 20 + (rng.next_u64() as usize % 200);
        let block = rng.block(len, b"abc");
        let mut mf = MatchFinder::create(512, 2, 64, 1).unwrap();
        mf.parse(&block).unwrap();

        let mut out = Vec::new();
        for p in 0..len {
            mf.find_all_matches(&mut out);
            let real: Vec<&Match> = out.iter().filter(|m| m.offset != 0 || p == 0).collect();
            for w in real.windows(2) {
                assert!(w[0].length > w[1].length, "lengths not decreasing at p={p}: {:?}", out);
                assert!(w[0].offset < w[1].offset, "offsets not increasing at p={p}: {:?}", out);
            }
        }
    }
}

// P6: the longest match found at each position agrees with a brute-force
// search, modulo the position-0-as-source limitation documented in
// DESIGN.md (a match sourced exactly at text position 0 is unrepresentable,
// since the offset field's zero value doubles as "unstamped").
#[test]
fn p6_correctness_vs_brute_force() {
    let mut rng = Rng::new(42);
    for _ in 0..15 {
        let len = 10 + (rng.next_u64() as usize % 120);
        let block = rng.block(len, b"ab");
        let min_len = 2usize;
        let max_len = 16usize;
        let mut mf = MatchFinder::create(256, min_len as u32, max_len as u32, 1).unwrap();
        mf.parse(&block).unwrap();

        for p in 0..len {
            let best = mf.find_best_match();
            let expected = brute_force_longest_match(&block, p, min_len, max_len);
            match expected {
                None => {
                    if best.offset != 0 {
                        assert_eq!(best.length, 0, "unexpected match at p={p}: {:?}", best);
                    }
                }
                Some((expected_len, expected_q)) => {
                    if expected_q == 0 {
                        // unrepresentable: offset 0 cannot be distinguished
                        // from "no match found".
                        continue;
                    }
                    assert_eq!(best.length as usize, expected_len, "length mismatch at p={p}");
                    assert_eq!(best.offset as usize, expected_q, "offset mismatch at p={p}");
                }
            }
        }
    }
}

// P7: windowed variants never report a match farther than W-1 behind p.
#[test]
fn p7_window_restriction() {
    let block = b"abcabcabcabcabcabcabcabc";
    let window = 5u32;
    let mut mf = MatchFinder::create(64, 2, 64, 1).unwrap();
    mf.parse(block).unwrap();

    let mut out = Vec::new();
    for p in 0..block.len() {
        mf.find_all_matches_in_window(window, &mut out);
        for m in &out {
            if m.offset != 0 || p == 0 {
                assert!((p as i64) - (m.offset as i64) <= window as i64 - 1);
            }
        }
    }
}

// P8: same block and parameters produce the same sequence of outputs
// regardless of thread count.
#[test]
fn p8_determinism_across_thread_counts() {
    let block: Vec<u8> = (0..3000u32).map(|i| b"abcdefgh"[(i % 8) as usize]).collect();

    let mut mf1 = MatchFinder::create(4096, 2, 64, 1).unwrap();
    mf1.parse(&block).unwrap();
    let mut mf4 = MatchFinder::create(4096, 2, 64, 4).unwrap();
    mf4.parse(&block).unwrap();

    for _ in 0..block.len() {
        let a = mf1.find_best_match();
        let b = mf4.find_best_match();
        assert_eq!(a, b);
    }
}
