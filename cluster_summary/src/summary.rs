mod cluster_record;
mod cluster_summary_builder;
mod cluster_summary_error;
mod cluster_summary_handle;
mod fleet_summary;

pub use cluster_record::*;
pub use cluster_summary_builder::*;
pub use cluster_summary_error::*;
pub use cluster_summary_handle::*;
pub use fleet_summary::*;
