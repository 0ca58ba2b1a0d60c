pub mod dataset;
pub mod sink;
pub mod store;
