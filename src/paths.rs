use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

use tracing::trace;

use crate::error::Error;
use crate::volcano::{ValveHandle, Volcano};

#[derive(Clone)]
pub struct SquareArray {
    cols: usize,
    data: Vec<Option<usize>>,
}

impl SquareArray {
    pub fn new(cols: usize) -> Self {
        SquareArray { cols, data: vec![None; cols * cols] }
    }

    pub fn get(&self, src: ValveHandle, dst: ValveHandle) -> Option<usize> {
        self.data[src.as_usize() * self.cols + dst.as_usize()]
    }

    pub fn set(&mut self, src: ValveHandle, dst: ValveHandle, v: Option<usize>) {
        self.data[src.as_usize() * self.cols + dst.as_usize()] = v;
    }

    pub fn row(&self, y: usize) -> &[Option<usize>] {
        let start = y * self.cols;
        &self.data[start..(start + self.cols)]
    }
}

impl fmt::Display for SquareArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.cols {
            for w in self.row(y) {
                match w {
                    Some(w) => write!(f, "{:>3}", w)?,
                    None => write!(f, "{:>3}", "-")?,
                }
            }
            writeln!(f)?
        }
        Ok(())
    }
}

/// Tunnel cost between every pair of valves, computed once when the volcano is surveyed.
pub struct ShortestPaths<'a> {
    volcano: &'a Volcano,
    costs: SquareArray,
}

impl<'a> ShortestPaths<'a> {
    pub fn new(volcano: &'a Volcano) -> Self {
        let mut costs = SquareArray::new(volcano.len());
        for src in volcano.handles() {
            dijkstra(volcano, src, &mut costs);
        }
        trace!("tunnel costs:\n{costs}");
        ShortestPaths { volcano, costs }
    }

    pub fn volcano(&self) -> &'a Volcano {
        self.volcano
    }

    pub fn costs(&self) -> &SquareArray {
        &self.costs
    }

    /// Minimum number of moves to get from `src` to `dst`.
    pub fn distance(&self, src: ValveHandle, dst: ValveHandle) -> Result<usize, Error> {
        self.costs.get(src, dst).ok_or_else(|| Error::UnreachableNode {
            from: self.volcano.name(src).to_string(),
            to: self.volcano.name(dst).to_string(),
        })
    }
}

// Fill in row `src` of `costs`. Every tunnel costs one move, so the first time a valve is popped
// its cost is final.
fn dijkstra(volcano: &Volcano, src: ValveHandle, costs: &mut SquareArray) {
    let mut frontier: BinaryHeap<Reverse<(usize, ValveHandle)>> = BinaryHeap::new();
    frontier.push(Reverse((0, src)));

    while let Some(Reverse((cost, valve))) = frontier.pop() {
        if costs.get(src, valve).is_some() {
            continue;
        }
        costs.set(src, valve, Some(cost));
        for &next in volcano.tunnels(valve) {
            if costs.get(src, next).is_none() {
                frontier.push(Reverse((cost + 1, next)));
            }
        }
    }
}
