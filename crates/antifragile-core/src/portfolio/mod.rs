pub mod aggregate;
pub mod correlation;
pub mod weights;

pub use aggregate::{aggregate, AggregateResult, AntifragilityBand, AntifragilityIndex};
pub use correlation::{run_correlation_matrix, Correlation, CorrelationMatrix};
pub use weights::{AllocationInput, PortfolioWeights};
