//! Statistical utilities for the dotapulse project.
//!
//! This crate provides the small set of statistical tools used to summarize
//! per-player behavior across a population:
//!
//! - **Descriptive statistics**: mean, median, variance, standard deviation, etc.
//! - **Histogram generation**: fixed-range, equal-width frequency distributions
//! - **Correlation**: Pearson correlation between paired observations
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`histogram`]: Histogram construction over an explicit value range
//! - [`correlation`]: Pearson correlation coefficient for paired data
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use dotapulse_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Creating a histogram of rates
//!
//! ```
//! use dotapulse_stats::histogram::Histogram;
//!
//! let win_rates = [0.42, 0.48, 0.51, 0.55, 0.61];
//! let histogram = Histogram::new(win_rates, 10, 0.0..1.0);
//! assert_eq!(histogram.total_count(), 5);
//! ```
//!
//! ## Correlating two metrics
//!
//! ```
//! use dotapulse_stats::correlation::pearson;
//!
//! let pairs = [(0.1, 0.2), (0.2, 0.4), (0.3, 0.6)];
//! let r = pearson(pairs).unwrap();
//! assert!((r - 1.0).abs() < 1e-12);
//! ```

pub mod correlation;
pub mod descriptive;
pub mod histogram;
