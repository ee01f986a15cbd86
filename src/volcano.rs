use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::unsync::Lazy;
use regex_lite::Regex;

use crate::error::Error;

/// One line of puzzle input: a valve, its flow rate, and the valves its tunnels lead to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValveRecord {
    pub name: String,
    pub flow: usize,
    pub tunnels: Vec<String>,
}

impl ValveRecord {
    pub fn new(name: &str, flow: usize, tunnels: &[&str]) -> Self {
        ValveRecord {
            name: name.to_string(),
            flow,
            tunnels: tunnels.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ValveHandle(u8);

impl ValveHandle {
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ValveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A set of valves, stored as a bitmask indexed by handle. Since the mask is the set, two sets
/// holding the same valves always hash and compare equal, whatever order they were built in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ValveSet(u128);

impl ValveSet {
    pub const CAPACITY: usize = u128::BITS as usize;

    pub fn empty() -> Self {
        ValveSet(0)
    }

    pub fn contains(&self, valve: ValveHandle) -> bool {
        self.0 & (1 << valve.0) != 0
    }

    pub fn with(self, valve: ValveHandle) -> Self {
        ValveSet(self.0 | (1 << valve.0))
    }

    pub fn without(self, valve: ValveHandle) -> Self {
        ValveSet(self.0 & !(1 << valve.0))
    }

    pub fn difference(self, other: ValveSet) -> Self {
        ValveSet(self.0 & !other.0)
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Handles in ascending order.
    pub fn iter(self) -> impl Iterator<Item = ValveHandle> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let i = bits.trailing_zeros();
            bits &= bits - 1;
            Some(ValveHandle(i as u8))
        })
    }
}

impl FromIterator<ValveHandle> for ValveSet {
    fn from_iter<I: IntoIterator<Item = ValveHandle>>(iter: I) -> Self {
        iter.into_iter().fold(ValveSet::empty(), ValveSet::with)
    }
}

impl fmt::Debug for ValveSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

struct Valve {
    name: String,
    flow: usize,
    tunnels: Vec<ValveHandle>,
}

/// The valve network. Immutable once built.
pub struct Volcano {
    valves: Vec<Valve>,
    handle_for: HashMap<String, ValveHandle>,
}

impl Volcano {
    pub fn new(records: Vec<ValveRecord>) -> Result<Self, Error> {
        if records.len() > ValveSet::CAPACITY {
            return Err(Error::TooManyValves(records.len()));
        }

        let mut handle_for: HashMap<String, ValveHandle> = HashMap::new();
        for (i, record) in records.iter().enumerate() {
            if handle_for.insert(record.name.clone(), ValveHandle(i as u8)).is_some() {
                return Err(Error::DuplicateValve(record.name.clone()));
            }
        }

        let mut valves: Vec<Valve> = records.iter()
            .map(|r| Valve { name: r.name.clone(), flow: r.flow, tunnels: Vec::new() })
            .collect();
        for (i, record) in records.iter().enumerate() {
            let src = ValveHandle(i as u8);
            for name in &record.tunnels {
                let Some(&dst) = handle_for.get(name) else {
                    return Err(Error::MissingNode { from: record.name.clone(), to: name.clone() });
                };
                // Tunnels work both ways, even when the input only lists one direction.
                for (a, b) in [(src, dst), (dst, src)] {
                    let tunnels = &mut valves[a.as_usize()].tunnels;
                    if a != b && !tunnels.contains(&b) {
                        tunnels.push(b);
                    }
                }
            }
        }

        Ok(Volcano { valves, handle_for })
    }

    pub fn len(&self) -> usize {
        self.valves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valves.is_empty()
    }

    pub fn handle(&self, name: &str) -> Result<ValveHandle, Error> {
        self.handle_for.get(name)
            .copied()
            .ok_or_else(|| Error::UnknownValve(name.to_string()))
    }

    pub fn handles(&self) -> impl Iterator<Item = ValveHandle> {
        (0..self.valves.len()).map(|i| ValveHandle(i as u8))
    }

    pub fn name(&self, valve: ValveHandle) -> &str {
        &self.valves[valve.as_usize()].name
    }

    pub fn flow(&self, valve: ValveHandle) -> usize {
        self.valves[valve.as_usize()].flow
    }

    pub fn tunnels(&self, valve: ValveHandle) -> &[ValveHandle] {
        &self.valves[valve.as_usize()].tunnels
    }

    /// Valves worth opening, ie those with a positive flow rate.
    pub fn openable(&self) -> ValveSet {
        self.handles().filter(|&v| self.flow(v) > 0).collect()
    }

    pub fn valve_set(&self, names: &[&str]) -> Result<ValveSet, Error> {
        names.iter().map(|name| self.handle(name)).collect::<Result<ValveSet, _>>()
    }

    /// Pressure released per minute by the given open valves.
    pub fn rate(&self, open: ValveSet) -> usize {
        open.iter().map(|v| self.flow(v)).sum()
    }

    /// Fails if the set names a handle this volcano doesn't have.
    pub fn check(&self, set: ValveSet) -> Result<(), Error> {
        match set.iter().find(|v| v.as_usize() >= self.len()) {
            Some(v) => Err(Error::ValveOutOfRange(v.as_usize())),
            None => Ok(()),
        }
    }
}

pub fn parse_records(s: &str) -> Result<Vec<ValveRecord>, Error> {
    // eg: Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
    let line_re = Lazy::new(|| {
        Regex::new(r#"^Valve (\w+) has flow rate=(\d+); tunnels? leads? to valves? (.*)$"#).unwrap()
    });
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let Some(caps) = line_re.captures(line) else {
                return Err(Error::Format(line.to_string()));
            };
            Ok(ValveRecord {
                name: caps[1].to_string(),
                flow: caps[2].parse()?,
                tunnels: caps[3].split(',').map(|t| t.trim().to_string()).collect(),
            })
        })
        .collect()
}

impl FromStr for Volcano {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Volcano::new(parse_records(s)?)
    }
}
