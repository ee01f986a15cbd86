//! Find the most pressure that can be released from a network of valves in a fixed number of
//! minutes, by one agent or by several agents working in parallel.
//!
//! ```no_run
//! use std::str::FromStr;
//! use valve_pressure::{ShortestPaths, SoloSearch, SearchConfig, Volcano};
//!
//! # fn main() -> Result<(), valve_pressure::Error> {
//! let volcano = Volcano::from_str(&std::io::read_to_string(std::io::stdin())?)?;
//! let paths = ShortestPaths::new(&volcano);
//! let mut search = SoloSearch::new(&paths, SearchConfig::default());
//! println!("{}", search.max_pressure(volcano.handle("AA")?, 30, volcano.openable())?);
//! # Ok(())
//! # }
//! ```

pub mod duo;
pub mod error;
pub mod paths;
pub mod permutations;
pub mod search;
pub mod solo;
pub mod volcano;

pub use duo::DuoSearch;
pub use error::Error;
pub use paths::ShortestPaths;
pub use search::{Handoff, SearchConfig};
pub use solo::SoloSearch;
pub use volcano::{ValveHandle, ValveRecord, ValveSet, Volcano};
