/// Statistical transforms behind the charts.
///
/// Every function here is pure: it takes column values and returns a fresh
/// numeric payload. Missing values are `None` (or filtered out) and never
/// raise errors.
pub mod correlation;
pub mod crosstab;
pub mod kde;
pub mod profile;
pub mod transform;
