//! Time value types: durations and calendar instants.
//!
//! [`Period`] is a signed duration with a fixed-width `HH:MM:SS.s` text form;
//! [`Moment`] is a calendar instant at whole-second resolution with a
//! `MM/DD/YYYY@HH:MM:SS.s` text form, usable as an ordered map key.

mod moment;
mod period;

pub use moment::{Moment, NOW_TOKEN};
pub use period::Period;
