use fxhash::FxHashMap;
use tracing::debug;

use crate::error::Error;
use crate::paths::ShortestPaths;
use crate::search::{check_args, Budget, SearchConfig};
use crate::volcano::{ValveHandle, ValveSet, Volcano};

type Key = (ValveHandle, usize, ValveSet);

/// Memoized search for the most pressure a single agent can release.
///
/// Instead of simulating minute by minute, each step jumps straight to the next valve opening:
/// walk the shortest route to a closed valve and open it. States are therefore
/// (room, minutes left, open valves), and the open valves are a bitmask so the order they were
/// opened in doesn't split the cache.
pub struct SoloSearch<'a> {
    volcano: &'a Volcano,
    paths: &'a ShortestPaths<'a>,
    config: SearchConfig,
    openable: ValveSet,
    budget: Budget,
    cache: FxHashMap<Key, usize>,
}

impl<'a> SoloSearch<'a> {
    pub fn new(paths: &'a ShortestPaths<'a>, config: SearchConfig) -> Self {
        SoloSearch {
            volcano: paths.volcano(),
            paths,
            config,
            openable: ValveSet::empty(),
            budget: Budget::new(config.max_expansions),
            cache: FxHashMap::default(),
        }
    }

    /// States expanded by the last call to `max_pressure`.
    pub fn expansions(&self) -> u64 {
        self.budget.spent()
    }

    /// Most pressure released in `minutes` starting from `start`, only ever opening valves in
    /// `openable`.
    pub fn max_pressure(&mut self, start: ValveHandle, minutes: i64, openable: ValveSet) -> Result<usize, Error> {
        let minutes = check_args(self.volcano, start, minutes, openable, 1)?;
        self.openable = openable;
        self.budget = Budget::new(self.config.max_expansions);
        self.cache.clear();

        let best = self.best(start, minutes, ValveSet::empty())?;
        debug!(
            start = self.volcano.name(start),
            minutes,
            expansions = self.budget.spent(),
            cached = self.cache.len(),
            best,
            "single-agent search done");
        Ok(best)
    }

    fn best(&mut self, room: ValveHandle, minutes_left: usize, open: ValveSet) -> Result<usize, Error> {
        if minutes_left == 0 {
            return Ok(0);
        }
        let key = (room, minutes_left, open);
        if let Some(&best) = self.cache.get(&key) {
            return Ok(best);
        }
        self.budget.spend()?;

        let rate = self.volcano.rate(open);
        // Sit tight until time runs out.
        let mut best = minutes_left * rate;
        for next in self.openable.difference(open).without(room).iter() {
            // Walk there and open it, but only if it'll be open for at least a minute.
            let spent = self.paths.distance(room, next)? + 1;
            if minutes_left <= spent {
                continue;
            }
            let released = spent * rate + self.best(next, minutes_left - spent, open.with(next))?;
            best = best.max(released);
        }

        self.cache.insert(key, best);
        Ok(best)
    }
}
