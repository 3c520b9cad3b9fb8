pub mod express_scan;
pub mod link_state;
pub mod measurement;
pub mod scan;
pub mod stats;

pub use express_scan::{Cabin, ExpressScanFrame, N_CABINS};
pub use link_state::LinkState;
pub use measurement::Measurement;
pub use scan::Scan;
pub use stats::DriverStats;
