use itertools::Itertools;
use tracing::debug;

use crate::error::Error;
use crate::paths::ShortestPaths;
use crate::search::check_args;
use crate::volcano::{ValveHandle, ValveSet};

/// Single-agent answer by brute force: try every order of opening the valves in `openable`,
/// walking and opening until time runs out. Factorial in the number of valves, so only useful
/// for checking the memoized search on small inputs.
pub fn max_pressure(
    paths: &ShortestPaths,
    start: ValveHandle,
    minutes: i64,
    openable: ValveSet,
) -> Result<usize, Error> {
    let volcano = paths.volcano();
    let minutes = check_args(volcano, start, minutes, openable, 1)?;
    let valves: Vec<ValveHandle> = openable.iter().collect();

    let mut best = 0;
    let mut orders = 0;
    for order in valves.iter().permutations(valves.len()) {
        orders += 1;
        let mut room = start;
        let mut minutes_left = minutes;
        let mut released = 0;
        for &valve in order {
            // Like the memoized search, never open the valve an agent is standing on at the
            // start; it has to leave and come back.
            if valve == room {
                break;
            }
            let spent = paths.distance(room, valve)? + 1;
            if minutes_left <= spent {
                break;
            }
            minutes_left -= spent;
            room = valve;
            released += minutes_left * volcano.flow(valve);
        }
        best = best.max(released);
    }
    debug!(orders, best, "permutation search done");
    Ok(best)
}
