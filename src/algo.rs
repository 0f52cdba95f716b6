//! The collection of implemented algorithms.

pub mod annealing;
pub mod cuckoo;
pub mod hill_climber;
pub mod random_search;
pub mod rechenberg;

pub use annealing::AnnealedHillClimber;
pub use cuckoo::Cuckoo;
pub use hill_climber::HillClimber;
pub use random_search::RandomSearch;
pub use rechenberg::OnePlusOneEs;
