//! Statistics for summarising simulation batches.
//!
//! # Example
//!
//! ```
//! use tabutris_stats::descriptive::DescriptiveStats;
//!
//! let lines = [12.0, 40.0, 7.0, 21.0];
//! let stats = DescriptiveStats::new(lines).unwrap();
//! assert_eq!(stats.count, 4);
//! assert_eq!(stats.median, 16.5);
//! ```

pub mod descriptive;
