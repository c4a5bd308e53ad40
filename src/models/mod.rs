pub mod dataset;
pub mod filter;
pub mod metrics;
pub mod ticket;
