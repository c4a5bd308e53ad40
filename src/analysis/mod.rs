pub mod aggregate;
pub mod dashboard;
pub mod filter;
pub mod loader;
pub mod satisfaction;
pub mod sla;
pub mod trends;

/// Round to two decimals, exact halves going to the even digit
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
