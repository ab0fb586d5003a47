pub mod catalogue;
pub mod recommendations;
pub mod scenario;

pub use catalogue::{scenario_catalogue, ScenarioInfo};
pub use scenario::Scenario;
