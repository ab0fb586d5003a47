pub mod random;
pub mod simulation;

pub use random::{RandomSource, StdRandomSource};
pub use simulation::{generate, ScenarioParameters, ScenarioSeries};
