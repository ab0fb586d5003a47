pub mod report;
pub mod sensitivity;

pub use report::{compute_dashboard, run_dashboard, DashboardInput, DashboardOutput};
pub use sensitivity::intensity_sensitivity;
