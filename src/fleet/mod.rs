pub mod data;
pub mod geometry;
pub mod report;
pub mod types;

pub use data::*;
pub use geometry::*;
pub use report::*;
pub use types::*;
