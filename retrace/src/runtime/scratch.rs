use std::mem;

use crate::{common::Database, Result};

/// A unit of pending work on the backtracking stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Frame {
    /// Resume the instruction at `pc` with the subject position `at`.
    Step { pc: usize, at: usize },
    /// Put back the previous value of a capture slot.
    Restore { slot: usize, offset: Option<usize> },
}

/// The number of subject positions covered by one block of a visited set.
const BLOCK_LEN: usize = 256;

/// The outcome of inserting into a [`Visited`] set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Visit {
    New,
    Seen,
    /// The position has no block and the memory budget is spent.
    Untracked,
}

/// A set of `(instruction, position)` pairs, stored as bit blocks of [`BLOCK_LEN`] positions.
///
/// Blocks are allocated on first use up to a memory budget, and recycled when the search moves past them or the
/// set is reset, so a reset costs time proportional to the blocks in use.
#[derive(Clone, Debug, Default)]
pub(crate) struct Visited {
    stride: usize,
    block_words: usize,
    max_blocks: usize,
    blocks: Vec<Option<Box<[u64]>>>,
    used: Vec<usize>,
    allocated: usize,
    low: usize,
    pool: Vec<Box<[u64]>>,
}

impl Visited {
    /// Empty the set for a search of `stride` instructions over `len` bytes starting at `from`, using at most
    /// `capacity` bytes of blocks.
    pub fn reset(&mut self, stride: usize, len: usize, from: usize, capacity: usize) {
        for index in self.used.drain(..) {
            if let Some(block) = self.blocks[index].take() {
                self.pool.push(block);
            }
        }

        let block_words = (BLOCK_LEN * stride + 63) / 64;

        if block_words != self.block_words {
            self.pool.clear();
            self.block_words = block_words;
        }

        let wanted = len / BLOCK_LEN + 1;

        if self.blocks.len() < wanted {
            self.blocks.resize_with(wanted, || None);
        }

        self.stride = stride;
        self.max_blocks = capacity / (block_words * 8).max(1);
        self.allocated = 0;
        self.low = from / BLOCK_LEN;
    }

    /// Recycle the blocks wholly before the position `at`, which the search will not come back to.
    pub fn forget_before(&mut self, at: usize) {
        let until = at / BLOCK_LEN;

        while self.low < until {
            if let Some(block) = self.blocks[self.low].take() {
                self.pool.push(block);
                self.allocated -= 1;
            }
            self.low += 1;
        }
    }

    /// Insert the pair of instruction `pc` and position `at`.
    pub fn insert(&mut self, pc: usize, at: usize) -> Visit {
        let index = at / BLOCK_LEN;

        if self.blocks[index].is_none() {
            if self.allocated >= self.max_blocks {
                return Visit::Untracked;
            }

            let block = match self.pool.pop() {
                Some(mut block) => {
                    block.iter_mut().for_each(|word| *word = 0);
                    block
                }
                None => vec![0; self.block_words].into_boxed_slice(),
            };

            self.blocks[index] = Some(block);
            self.used.push(index);
            self.allocated += 1;
        }

        let bit = (at % BLOCK_LEN) * self.stride + pc;
        let (word, mask) = (bit / 64, 1u64 << (bit % 64));

        match &mut self.blocks[index] {
            Some(block) if block[word] & mask != 0 => Visit::Seen,
            Some(block) => {
                block[word] |= mask;
                Visit::New
            }
            None => Visit::Untracked,
        }
    }

    fn size(&self) -> usize {
        self.blocks.capacity() * mem::size_of::<Option<Box<[u64]>>>()
            + self.used.capacity() * mem::size_of::<usize>()
            + (self.allocated + self.pool.len()) * self.block_words * mem::size_of::<u64>()
    }
}

/// The shape of the current search, used to prepare the visited sets of nested searches.
#[derive(Clone, Copy, Debug, Default)]
struct Geometry {
    stride: usize,
    len: usize,
    capacity: usize,
}

/// A region of scratch space to support matching with a database.
///
/// This is required for runtime use, and one scratch space per thread,
/// or concurrent caller, is required.
#[derive(Clone, Debug, Default)]
pub struct Scratch {
    pub(crate) stack: Vec<Frame>,
    pub(crate) slots: Vec<Option<usize>>,
    /// Steps taken over positions no visited set covers.
    pub(crate) untracked: usize,
    levels: Vec<Visited>,
    geometry: Geometry,
}

impl Scratch {
    /// Allocate an empty scratch space; it grows to fit the databases and subjects it is used with.
    pub fn new() -> Self {
        Scratch::default()
    }

    /// Provides the size of the given scratch space in bytes.
    pub fn size(&self) -> usize {
        mem::size_of::<Self>()
            + self.stack.capacity() * mem::size_of::<Frame>()
            + self.slots.capacity() * mem::size_of::<Option<usize>>()
            + self.levels.iter().map(Visited::size).sum::<usize>()
    }

    /// Prepare for a new search with `num_slots` slots, over a program of `stride` instructions and a subject of
    /// `len` bytes searched from `from`.
    pub(crate) fn prepare(&mut self, num_slots: usize, stride: usize, len: usize, from: usize, capacity: usize) {
        self.stack.clear();
        self.slots.clear();
        self.slots.resize(num_slots, None);
        self.untracked = 0;
        self.geometry = Geometry { stride, len, capacity };
        self.level(0, from);
    }

    /// Empty the visited set of the nested search at `depth`, which starts at `at`.
    pub(crate) fn level(&mut self, depth: usize, at: usize) {
        if self.levels.len() <= depth {
            self.levels.resize_with(depth + 1, Visited::default);
        }

        let Geometry { stride, len, capacity } = self.geometry;

        self.levels[depth].reset(stride, len, at, capacity);
    }

    /// Insert into the visited set at `depth`, which must have been prepared with [`Scratch::level`].
    pub(crate) fn visit(&mut self, depth: usize, pc: usize, at: usize) -> Visit {
        self.levels[depth].insert(pc, at)
    }

    /// Recycle the top-level visited blocks before the start position `at`.
    pub(crate) fn advance(&mut self, at: usize) {
        if let Some(visited) = self.levels.first_mut() {
            visited.forget_before(at);
        }
    }
}

impl Database {
    /// Allocate a "scratch" space for use with this database.
    pub fn alloc_scratch(&self) -> Result<Scratch> {
        let mut scratch = Scratch::new();

        scratch.slots.reserve(self.program().num_slots());

        Ok(scratch)
    }

    /// Reallocate a "scratch" space for use with this database, keeping its buffers.
    pub fn realloc_scratch<'a>(&'a self, s: &'a mut Scratch) -> Result<&'a mut Scratch> {
        let wanted = self.program().num_slots();

        if s.slots.capacity() < wanted {
            s.slots.reserve(wanted - s.slots.len());
        }

        Ok(s)
    }
}
