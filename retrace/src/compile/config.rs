/// The largest count accepted in a `{m,n}` repeat.
pub const REPEAT_MAX: u32 = 1000;

/// Limits applied when compiling a pattern and searching with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    size_limit: usize,
    nest_limit: usize,
    visited_capacity: usize,
    backtrack_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            size_limit: 100_000,
            nest_limit: 250,
            visited_capacity: 16 * (1 << 20),
            backtrack_limit: 1 << 30,
        }
    }
}

impl Config {
    /// Create a configuration with the default limits.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the maximum number of instructions in a compiled program.
    pub fn size_limit(mut self, limit: usize) -> Self {
        self.size_limit = limit;
        self
    }

    /// Set the maximum nesting depth of groups and repetitions.
    pub fn nest_limit(mut self, limit: usize) -> Self {
        self.nest_limit = limit;
        self
    }

    /// Set the memory in bytes the matcher may use for the visited set of each lookaround depth.
    ///
    /// Every `(instruction, position)` pair of a search takes one bit. The set is allocated in blocks of positions
    /// around where the search currently is, and blocks behind the current start position are recycled. Once the
    /// budget is spent, pairs in positions without a block are explored without being remembered, and count
    /// against the [backtrack limit](Config::backtrack_limit).
    pub fn visited_capacity(mut self, bytes: usize) -> Self {
        self.visited_capacity = bytes;
        self
    }

    /// Set the number of steps a search may take over positions the visited set does not cover.
    pub fn backtrack_limit(mut self, steps: usize) -> Self {
        self.backtrack_limit = steps;
        self
    }

    /// The maximum number of instructions in a compiled program.
    pub fn get_size_limit(&self) -> usize {
        self.size_limit
    }

    /// The maximum nesting depth of groups and repetitions.
    pub fn get_nest_limit(&self) -> usize {
        self.nest_limit
    }

    /// The memory in bytes the matcher may use for its visited set.
    pub fn get_visited_capacity(&self) -> usize {
        self.visited_capacity
    }

    /// The number of steps a search may take over positions the visited set does not cover.
    pub fn get_backtrack_limit(&self) -> usize {
        self.backtrack_limit
    }
}
