// ── Rate derivation ──
//
// Pure, synchronous computations over samples already in memory. The
// only async code here is the ranking pass, which drives the store.
// `search` filters inventory rows and derives no rates.
//
// Counter resets are handled by two separate policies:
// - `rate::compute_average_rate` discards a delta across a reset.
// - `series::build_series` clamps it to zero so the chart keeps a point.

pub mod ranking;
pub mod rate;
pub mod search;
pub mod series;

pub use ranking::{RankQuery, join_metadata, rank_error_rates, rank_utilization, select_top};
pub use rate::compute_average_rate;
pub use search::{InterfaceQuery, InterfaceSort, filter_interfaces};
pub use series::build_series;
