//! Embedded store for speedrun split tracking.
//!
//! One active [`Category`](model::Category) owns route templates and the
//! timed records made against them: named comparisons, timestamped
//! performances, and single-checkpoint practice samples. The whole category
//! round-trips through a flat whitespace-delimited token format.
//!
//! # Example
//!
//! ```
//! use splits_db::model::Name;
//! use splits_db::time::Period;
//! use splits_db::Store;
//!
//! # fn main() -> splits_db::Result<()> {
//! let mut store = Store::new();
//! store.replace_category(Name::new("Celeste")?);
//! store.create_template(Name::new("Any%")?, 3)?;
//! store.create_comparison(Name::new("PB")?, &Name::new("Any%")?)?;
//! store.retime_comparison_at(&Name::new("PB")?, 0, Period::from_seconds(90.0))?;
//! store.retime_comparison_at(&Name::new("PB")?, 1, Period::from_seconds(195.0))?;
//!
//! let pb = store.comparison(&Name::new("PB")?)?;
//! assert_eq!(pb.times().sum_as_prefix(0, 1)?, Period::from_seconds(105.0));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod codec;
pub mod error;
pub mod model;
pub mod seq;
pub mod store;
pub mod time;

pub use error::{Error, Result};
pub use store::Store;
