use crate::error::Error;
use crate::volcano::{ValveHandle, ValveSet, Volcano};

/// When an agent that isn't the last one may stop and let the next agent take over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Handoff {
    /// Any time. Tries every way of splitting the valves between agents, so the result is optimal.
    #[default]
    Exhaustive,
    /// Only once the agent has opened this many valves, or has no move left. Much faster on
    /// real inputs, but splits that give the agent a different number of valves are never
    /// tried, so the result can be lower than the true optimum.
    AfterOpening(usize),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SearchConfig {
    /// Give up with `Error::BudgetExhausted` after expanding this many states.
    pub max_expansions: Option<u64>,
    pub handoff: Handoff,
}

impl SearchConfig {
    pub fn with_max_expansions(self, max_expansions: u64) -> Self {
        SearchConfig { max_expansions: Some(max_expansions), ..self }
    }

    pub fn with_handoff(self, handoff: Handoff) -> Self {
        SearchConfig { handoff, ..self }
    }
}

/// Counts expanded states (memo misses) for one top-level search.
#[derive(Clone, Copy, Debug)]
pub struct Budget {
    limit: Option<u64>,
    spent: u64,
}

impl Budget {
    pub fn new(limit: Option<u64>) -> Self {
        Budget { limit, spent: 0 }
    }

    pub fn spend(&mut self) -> Result<(), Error> {
        if let Some(limit) = self.limit {
            if self.spent >= limit {
                return Err(Error::BudgetExhausted(limit));
            }
        }
        self.spent += 1;
        Ok(())
    }

    pub fn spent(&self) -> u64 {
        self.spent
    }
}

/// Validate the arguments shared by every top-level search and convert the time budget.
///
/// No search result can exceed `agents * minutes * rate(openable)`, so once that product fits
/// in a `usize` none of the pressure sums inside the searches can overflow.
pub(crate) fn check_args(
    volcano: &Volcano,
    start: ValveHandle,
    minutes: i64,
    openable: ValveSet,
    agents: usize,
) -> Result<usize, Error> {
    if start.as_usize() >= volcano.len() {
        return Err(Error::ValveOutOfRange(start.as_usize()));
    }
    volcano.check(openable)?;
    let invalid = || Error::InvalidBudget(minutes);
    let minutes = usize::try_from(minutes).map_err(|_| invalid())?;
    let rate = openable.iter()
        .try_fold(0usize, |rate, v| rate.checked_add(volcano.flow(v)))
        .ok_or_else(invalid)?;
    minutes.checked_mul(rate)
        .and_then(|total| total.checked_mul(agents.max(1)))
        .ok_or_else(invalid)?;
    Ok(minutes)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::volcano::test::example;
    use crate::volcano::ValveRecord;

    #[test]
    fn test_budget() {
        let mut budget = Budget::new(Some(2));
        assert!(budget.spend().is_ok());
        assert!(budget.spend().is_ok());
        assert!(matches!(budget.spend(), Err(Error::BudgetExhausted(2))));
        assert_eq!(budget.spent(), 2);
    }

    #[test]
    fn test_unlimited_budget() {
        let mut budget = Budget::new(None);
        for _ in 0..1000 {
            budget.spend().unwrap();
        }
        assert_eq!(budget.spent(), 1000);
    }

    #[test]
    fn test_check_args() {
        let volcano = example();
        let aa = volcano.handle("AA").unwrap();
        assert_eq!(check_args(&volcano, aa, 30, volcano.openable(), 1).unwrap(), 30);
        assert!(matches!(
            check_args(&volcano, aa, -1, volcano.openable(), 1),
            Err(Error::InvalidBudget(-1))));
    }

    #[test]
    fn test_check_args_overflow() {
        let volcano = example();
        let aa = volcano.handle("AA").unwrap();
        // The example's valves release 81 per minute in total.
        let most = (usize::MAX / 81) as i64;
        assert!(check_args(&volcano, aa, most, volcano.openable(), 1).is_ok());
        assert!(matches!(
            check_args(&volcano, aa, most + 1, volcano.openable(), 1),
            Err(Error::InvalidBudget(_))));
        assert!(matches!(
            check_args(&volcano, aa, most, volcano.openable(), 2),
            Err(Error::InvalidBudget(_))));
        // Nothing to open means nothing can overflow.
        assert!(check_args(&volcano, aa, i64::MAX, ValveSet::empty(), 2).is_ok());
    }

    #[test]
    fn test_check_args_foreign_start() {
        let volcano = example();
        let big = Volcano::new((0..50).map(|i| ValveRecord::new(&format!("V{i}"), 0, &[])).collect()).unwrap();
        let v42 = big.handle("V42").unwrap();
        assert!(matches!(
            check_args(&volcano, v42, 30, volcano.openable(), 1),
            Err(Error::ValveOutOfRange(42))));
    }

    #[test]
    fn test_config() {
        let config = SearchConfig::default()
            .with_max_expansions(10)
            .with_handoff(Handoff::AfterOpening(3));
        assert_eq!(config.max_expansions, Some(10));
        assert_eq!(config.handoff, Handoff::AfterOpening(3));
        assert_eq!(SearchConfig::default().handoff, Handoff::Exhaustive);
    }
}
