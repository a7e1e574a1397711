//! Presentation-facing values derived from build state.
//!
//! Everything here is a pure function of the domain state: icon selection,
//! status message text and indicator values. The coordinator computes them,
//! the presentation layer only reads them.

mod icons;
mod indicators;
pub mod messages;
mod view;

pub use icons::{ResultIcon, StatusIcon};
pub use indicators::{IndicatorValues, Indicators, ResetIndicatorMode};
pub use view::ViewStateSnapshot;
