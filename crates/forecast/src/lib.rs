//! Stock forecast: plan outgoing moves for expected demand over a period.
//!
//! Each forecast line spreads its not-yet-executed quantity, in packets of the
//! line's minimal quantity, as evenly as possible over the forecast days.

pub mod distribute;
pub mod forecast;

pub use distribute::distribute;
pub use forecast::{Forecast, ForecastLine, ForecastState};
