use fxhash::FxHashMap;
use tracing::debug;

use crate::error::Error;
use crate::paths::ShortestPaths;
use crate::search::{check_args, Budget, Handoff, SearchConfig};
use crate::volcano::{ValveHandle, ValveSet, Volcano};

type Key = (ValveHandle, usize, ValveSet, ValveSet, usize);

/// Memoized search for several agents sharing one volcano, all starting at the same time.
///
/// Agents don't interleave. The first agent plays the single-agent game, and whenever it decides
/// to stop, the next agent plays the same game from the start with whatever valves are still
/// closed. Since the first agent may stop after any opening sequence, every split of the valves
/// between agents gets tried, and for a fixed split each agent's best play is exactly the
/// single-agent optimum.
pub struct DuoSearch<'a> {
    volcano: &'a Volcano,
    paths: &'a ShortestPaths<'a>,
    config: SearchConfig,
    start: ValveHandle,
    minutes: usize,
    budget: Budget,
    cache: FxHashMap<Key, usize>,
}

impl<'a> DuoSearch<'a> {
    pub fn new(paths: &'a ShortestPaths<'a>, config: SearchConfig) -> Self {
        DuoSearch {
            volcano: paths.volcano(),
            paths,
            config,
            start: ValveHandle::default(),
            minutes: 0,
            budget: Budget::new(config.max_expansions),
            cache: FxHashMap::default(),
        }
    }

    pub fn expansions(&self) -> u64 {
        self.budget.spent()
    }

    pub fn max_pressure_two_agents(&mut self, start: ValveHandle, minutes: i64, openable: ValveSet) -> Result<usize, Error> {
        self.max_pressure_agents(start, minutes, openable, 2)
    }

    /// Most pressure `agents` agents can release together, each having `minutes` minutes.
    pub fn max_pressure_agents(
        &mut self,
        start: ValveHandle,
        minutes: i64,
        openable: ValveSet,
        agents: usize,
    ) -> Result<usize, Error> {
        let minutes = check_args(self.volcano, start, minutes, openable, agents)?;
        self.start = start;
        self.minutes = minutes;
        self.budget = Budget::new(self.config.max_expansions);
        self.cache.clear();
        if agents == 0 {
            return Ok(0);
        }

        let best = self.best(start, minutes, ValveSet::empty(), openable, agents)?;
        debug!(
            start = self.volcano.name(start),
            minutes,
            agents,
            handoff = ?self.config.handoff,
            expansions = self.budget.spent(),
            cached = self.cache.len(),
            best,
            "multi-agent search done");
        Ok(best)
    }

    fn best(
        &mut self,
        room: ValveHandle,
        minutes_left: usize,
        open: ValveSet,
        openable: ValveSet,
        agents: usize,
    ) -> Result<usize, Error> {
        let last = agents == 1;
        if minutes_left == 0 && last {
            return Ok(0);
        }
        let key = (room, minutes_left, open, openable, agents);
        if let Some(&best) = self.cache.get(&key) {
            return Ok(best);
        }
        self.budget.spend()?;

        let best = if minutes_left == 0 {
            self.next_agent(open, openable, agents)?
        } else {
            let (may_move, may_stop) = match self.config.handoff {
                _ if last => (true, true),
                Handoff::Exhaustive => (true, true),
                Handoff::AfterOpening(n) => (open.len() < n, open.len() >= n),
            };

            let rate = self.volcano.rate(open);
            let mut best = 0;
            let mut moved = false;
            if may_move {
                for next in openable.difference(open).without(room).iter() {
                    let spent = self.paths.distance(room, next)? + 1;
                    if minutes_left <= spent {
                        continue;
                    }
                    let rest = self.best(next, minutes_left - spent, open.with(next), openable, agents)?;
                    best = best.max(spent * rate + rest);
                    moved = true;
                }
            }
            // Stopping is always allowed when there's nothing else to do.
            if may_stop || !moved {
                let others = if last { 0 } else { self.next_agent(open, openable, agents)? };
                best = best.max(minutes_left * rate + others);
            }
            best
        };

        self.cache.insert(key, best);
        Ok(best)
    }

    // The next agent starts over with the full time budget and whatever this one left closed.
    fn next_agent(&mut self, open: ValveSet, openable: ValveSet, agents: usize) -> Result<usize, Error> {
        self.best(self.start, self.minutes, ValveSet::empty(), openable.difference(open), agents - 1)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::solo::SoloSearch;
    use crate::volcano::test::example;
    use crate::volcano::ValveRecord;

    fn solve(volcano: &Volcano, config: SearchConfig, minutes: i64, agents: usize) -> Result<usize, Error> {
        let paths = ShortestPaths::new(volcano);
        let mut search = DuoSearch::new(&paths, config);
        search.max_pressure_agents(volcano.handle("AA")?, minutes, volcano.openable(), agents)
    }

    fn solo(volcano: &Volcano, minutes: i64) -> usize {
        let paths = ShortestPaths::new(volcano);
        let mut search = SoloSearch::new(&paths, SearchConfig::default());
        search.max_pressure(volcano.handle("AA").unwrap(), minutes, volcano.openable()).unwrap()
    }

    #[test]
    fn test_example() {
        let volcano = example();
        let paths = ShortestPaths::new(&volcano);
        let mut search = DuoSearch::new(&paths, SearchConfig::default());
        let aa = volcano.handle("AA").unwrap();
        assert_eq!(search.max_pressure_two_agents(aa, 26, volcano.openable()).unwrap(), 1707);
    }

    #[test]
    fn test_at_least_single_agent() {
        let volcano = example();
        for minutes in [0, 5, 10, 26] {
            let two = solve(&volcano, SearchConfig::default(), minutes, 2).unwrap();
            assert!(two >= solo(&volcano, minutes), "{minutes} minutes");
        }
    }

    #[test]
    fn test_one_agent_matches_solo() {
        let volcano = example();
        for minutes in [0, 7, 26, 30] {
            assert_eq!(solve(&volcano, SearchConfig::default(), minutes, 1).unwrap(), solo(&volcano, minutes));
        }
    }

    #[test]
    fn test_more_time_never_hurts() {
        let volcano = example();
        let mut prev = 0;
        for minutes in 0..=26 {
            let best = solve(&volcano, SearchConfig::default(), minutes, 2).unwrap();
            assert!(best >= prev, "{minutes} minutes: {best} < {prev}");
            prev = best;
        }
    }

    #[test]
    fn test_more_agents_never_hurt() {
        let volcano = example();
        let two = solve(&volcano, SearchConfig::default(), 26, 2).unwrap();
        let three = solve(&volcano, SearchConfig::default(), 26, 3).unwrap();
        assert!(three >= two);
        assert_eq!(solve(&volcano, SearchConfig::default(), 26, 0).unwrap(), 0);
    }

    #[test]
    fn test_nothing_to_open() {
        let volcano = example();
        let paths = ShortestPaths::new(&volcano);
        let mut search = DuoSearch::new(&paths, SearchConfig::default());
        let aa = volcano.handle("AA").unwrap();
        assert_eq!(search.max_pressure_two_agents(aa, 26, ValveSet::empty()).unwrap(), 0);
        assert_eq!(search.max_pressure_two_agents(aa, 0, volcano.openable()).unwrap(), 0);
    }

    #[test]
    fn test_handoff_after_opening() {
        let volcano = example();
        // The best split on the example gives each agent three valves.
        let config = SearchConfig::default().with_handoff(Handoff::AfterOpening(3));
        assert_eq!(solve(&volcano, config, 26, 2).unwrap(), 1707);

        // The first agent can't open anything, so the second one does all the work.
        let config = SearchConfig::default().with_handoff(Handoff::AfterOpening(0));
        assert_eq!(solve(&volcano, config, 26, 2).unwrap(), solo(&volcano, 26));
    }

    #[test]
    fn test_handoff_never_beats_exhaustive() {
        let volcano = example();
        let exhaustive = solve(&volcano, SearchConfig::default(), 26, 2).unwrap();
        for n in 0..=7 {
            let config = SearchConfig::default().with_handoff(Handoff::AfterOpening(n));
            let best = solve(&volcano, config, 26, 2).unwrap();
            assert!(best <= exhaustive, "handoff after {n}: {best} > {exhaustive}");
        }
    }

    #[test]
    fn test_negative_budget() {
        let volcano = example();
        assert!(matches!(
            solve(&volcano, SearchConfig::default(), -1, 2),
            Err(Error::InvalidBudget(-1))));
    }

    #[test]
    fn test_huge_budget() {
        let volcano = example();
        assert!(matches!(
            solve(&volcano, SearchConfig::default(), i64::MAX, 2),
            Err(Error::InvalidBudget(i64::MAX))));
        // Fits for one agent but not for two.
        let most = (usize::MAX / 81) as i64;
        assert!(matches!(
            solve(&volcano, SearchConfig::default(), most, 2),
            Err(Error::InvalidBudget(_))));
    }

    #[test]
    fn test_foreign_valves() {
        let volcano = example();
        let paths = ShortestPaths::new(&volcano);
        let mut search = DuoSearch::new(&paths, SearchConfig::default());
        let big = Volcano::new((0..50).map(|i| ValveRecord::new(&format!("V{i}"), 1, &[])).collect()).unwrap();
        let v42 = big.handle("V42").unwrap();
        let aa = volcano.handle("AA").unwrap();
        assert!(matches!(
            search.max_pressure_two_agents(aa, 26, volcano.openable().with(v42)),
            Err(Error::ValveOutOfRange(42))));
        assert!(matches!(
            search.max_pressure_two_agents(v42, 26, volcano.openable()),
            Err(Error::ValveOutOfRange(42))));
    }

    #[test]
    fn test_budget_exhausted() {
        let volcano = example();
        let config = SearchConfig::default().with_max_expansions(100);
        assert!(matches!(solve(&volcano, config, 26, 2), Err(Error::BudgetExhausted(100))));
    }
}
