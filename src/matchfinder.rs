//! Public contract (C6): `MatchFinder::create`/`parse`/`get_position`/
//! `rewind`/`find_all_matches[_in_window]`/`find_best_match[_in_window]`/
//! `advance`. Ported from `esa_matchfinder_create`, `esa_matchfinder_parse`
//! and the thin dispatch wrappers around C3–C5 in `esa_matchfinder.c`.
//!
//! Construction validates every bound `esa_matchfinder_create` validates;
//! everything else is `Storage` + `WorkerPool` + `Cursor` orchestration, with
//! cleanup handled by `Drop` rather than an explicit `destroy` call.

use crate::build::build_interval_tree_parallel;
use crate::consts::{MAX_BLOCK_SIZE, MIN_MATCH_LENGTH};
use crate::cursor::Cursor;
use crate::enumerate::{self, Match};
use crate::error::{Error, Result};
use crate::node::LCP_MAX;
use crate::pool::WorkerPool;
use crate::sa::{DefaultBuilder, SuffixArrayBuilder};
use crate::storage::Storage;

/// An ESA-backed match finder for a single block, reusable across repeated
/// `parse` calls as long as the block never exceeds `max_block_size`.
pub struct MatchFinder<B: SuffixArrayBuilder = DefaultBuilder> {
    storage: Storage,
    pool: WorkerPool,
    builder: B,
    cursor: Cursor,
    min_match_length: u32,
    max_match_length: u32,
    block_size: usize,
    tree_ranges: Vec<(usize, usize)>,
}

impl MatchFinder<DefaultBuilder> {
    /// Builds a match finder using [`DefaultBuilder`] for SA/PLCP
    /// construction. `num_threads == 0` selects the platform default.
    pub fn create(
        max_block_size: usize,
        min_match_length: u32,
        max_match_length: u32,
        num_threads: usize,
    ) -> Result<MatchFinder<DefaultBuilder>> {
        MatchFinder::create_with_builder(
            max_block_size,
            min_match_length,
            max_match_length,
            num_threads,
            DefaultBuilder,
        )
    }
}

impl<B: SuffixArrayBuilder> MatchFinder<B> {
    /// Same as [`MatchFinder::create`] but with a caller-supplied SA/PLCP
    /// builder — the seam `esa_matchfinder.h` leaves open for a faster
    /// linear-time construction algorithm.
    pub fn create_with_builder(
        max_block_size: usize,
        min_match_length: u32,
        max_match_length: u32,
        num_threads: usize,
        builder: B,
    ) -> Result<MatchFinder<B>> {
        if max_block_size as i64 > MAX_BLOCK_SIZE {
            return Err(Error::BadParameter);
        }
        if (min_match_length as i32) < MIN_MATCH_LENGTH {
            return Err(Error::BadParameter);
        }
        if (max_match_length as u64) > LCP_MAX + min_match_length as u64 - 1 {
            return Err(Error::BadParameter);
        }
        if max_match_length < min_match_length {
            return Err(Error::BadParameter);
        }

        let storage = Storage::new(max_block_size);
        let pool = WorkerPool::new(num_threads);

        Ok(MatchFinder {
            storage,
            pool,
            builder,
            cursor: Cursor::new(),
            min_match_length,
            max_match_length,
            block_size: 0,
            tree_ranges: Vec::new(),
        })
    }

    pub fn max_block_size(&self) -> usize {
        self.storage.padded_words()
    }

    pub fn num_threads(&self) -> usize {
        self.pool.num_threads()
    }

    /// Indexes `block` for matching. `block.len()` must not exceed the
    /// `max_block_size` this match finder was created with.
    pub fn parse(&mut self, block: &[u8]) -> Result<()> {
        if block.len() > self.storage.padded_words() {
            return Err(Error::BadParameter);
        }

        let sa = self.builder.build_sa(block)?;
        let plcp = self.builder.build_plcp(block, &sa)?;

        {
            let sa_i32 = self.storage.sa_region_i32_mut();
            sa_i32[..sa.len()].copy_from_slice(&sa);
        }
        {
            let leaf = self.storage.leaf_region_u32_mut();
            for (slot, &v) in leaf.iter_mut().zip(plcp.iter()) {
                *slot = v as u32;
            }
        }

        self.storage.widen_sa_in_place(block.len(), self.pool.num_threads());
        self.storage.zero_guards(block.len());

        {
            let (sa_parent_link, plcp_leaf_link) = self.storage.split_parent_and_leaf_mut();
            self.tree_ranges = build_interval_tree_parallel(
                sa_parent_link,
                plcp_leaf_link,
                self.min_match_length as u64,
                self.max_match_length as u64,
                block.len(),
                &self.pool,
            );
        }

        self.block_size = block.len();
        self.cursor.reset_after_parse();
        Ok(())
    }

    pub fn get_position(&self) -> i32 {
        self.cursor.get()
    }

    /// Moves the cursor to `position`, replaying or discarding offset stamps
    /// as needed. `position` must be in `[0, block_size)`.
    pub fn rewind(&mut self, position: i32) -> Result<()> {
        if position < 0 || position as usize >= self.block_size {
            return Err(Error::BadParameter);
        }
        let (sa_parent_link, plcp_leaf_link) = self.storage.split_parent_and_leaf_mut();
        self.cursor.rewind(
            position as u64,
            sa_parent_link,
            plcp_leaf_link,
            &self.tree_ranges,
            &self.pool,
        );
        Ok(())
    }

    pub fn find_all_matches(&mut self, out: &mut Vec<Match>) {
        out.clear();
        let min_match_length_minus_1 = self.min_match_length as u64 - 1;
        let (sa_parent_link, plcp_leaf_link) = self.storage.split_parent_and_leaf_mut();
        enumerate::find_all_matches(
            &mut self.cursor,
            sa_parent_link,
            plcp_leaf_link,
            min_match_length_minus_1,
            out,
        );
    }

    pub fn find_all_matches_in_window(&mut self, window: u32, out: &mut Vec<Match>) {
        out.clear();
        let min_match_length_minus_1 = self.min_match_length as u64 - 1;
        let (sa_parent_link, plcp_leaf_link) = self.storage.split_parent_and_leaf_mut();
        enumerate::find_all_matches_in_window(
            &mut self.cursor,
            sa_parent_link,
            plcp_leaf_link,
            min_match_length_minus_1,
            window as u64,
            out,
        );
    }

    pub fn find_best_match(&mut self) -> Match {
        let min_match_length_minus_1 = self.min_match_length as u64 - 1;
        let (sa_parent_link, plcp_leaf_link) = self.storage.split_parent_and_leaf_mut();
        enumerate::find_best_match(&mut self.cursor, sa_parent_link, plcp_leaf_link, min_match_length_minus_1)
    }

    pub fn find_best_match_in_window(&mut self, window: u32) -> Match {
        let min_match_length_minus_1 = self.min_match_length as u64 - 1;
        let (sa_parent_link, plcp_leaf_link) = self.storage.split_parent_and_leaf_mut();
        enumerate::find_best_match_in_window(
            &mut self.cursor,
            sa_parent_link,
            plcp_leaf_link,
            min_match_length_minus_1,
            window as u64,
        )
    }

    pub fn advance(&mut self, count: i32) -> Result<()> {
        if count < 0 {
            return Err(Error::BadParameter);
        }
        let (sa_parent_link, plcp_leaf_link) = self.storage.split_parent_and_leaf_mut();
        enumerate::advance(&mut self.cursor, sa_parent_link, plcp_leaf_link, count as u64);
        Ok(())
    }
}
