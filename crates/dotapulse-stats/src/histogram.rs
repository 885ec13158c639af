use std::ops::Range;

/// A histogram representation of a dataset's distribution.
///
/// The histogram divides an explicit value range into equal-width bins and
/// counts the values falling into each bin. Unlike a data-driven binning,
/// the range is fixed by the caller so that histograms of different
/// populations (e.g. win rates of two player cohorts) are directly comparable.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order of range.
    pub bins: Vec<HistogramBin>,
    /// Number of values that fell outside the histogram range (or were NaN).
    pub out_of_range: u64,
}

/// A single bin in a histogram.
#[derive(Debug, Clone)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end).
    ///
    /// The last bin additionally includes the end of the histogram range.
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Creates a histogram with `num_bins` equal-width bins over `range`.
    ///
    /// # Arguments
    ///
    /// * `values` - The data points to bin.
    /// * `num_bins` - The number of bins. Zero bins yields an empty histogram
    ///   where every value is out of range.
    /// * `range` - The value range covered by the bins. A value equal to
    ///   `range.end` is counted in the last bin.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dotapulse_stats::histogram::Histogram;
    /// let histogram = Histogram::new([0.0, 0.05, 0.5, 1.0], 10, 0.0..1.0);
    /// assert_eq!(histogram.bins.len(), 10);
    /// assert_eq!(histogram.bins[0].count, 2);
    /// assert_eq!(histogram.bins[5].count, 1);
    /// assert_eq!(histogram.bins[9].count, 1);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize, range: Range<f64>) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let width = (range.end - range.start) / num_bins as f64;
        let mut bins = (0..num_bins)
            .map(|idx| {
                // Recompute each bound from the range start to avoid accumulation error
                let start = range.start + width * idx as f64;
                let end = if idx + 1 == num_bins {
                    range.end
                } else {
                    range.start + width * (idx + 1) as f64
                };
                HistogramBin {
                    range: start..end,
                    count: 0,
                }
            })
            .collect::<Vec<_>>();

        let mut out_of_range = 0;
        for value in values {
            if bins.is_empty() || !(range.start..=range.end).contains(&value) {
                out_of_range += 1;
                continue;
            }
            let idx = ((value - range.start) / width).floor() as usize;
            bins[idx.min(num_bins - 1)].count += 1;
        }

        Self { bins, out_of_range }
    }

    /// Total number of values counted in the bins.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Largest bin count, useful for scaling a text bar chart.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_bound_goes_to_last_bin() {
        let histogram = Histogram::new([1.0, 1.0], 4, 0.0..1.0);
        assert_eq!(histogram.bins[3].count, 2);
        assert_eq!(histogram.out_of_range, 0);
    }

    #[test]
    fn test_out_of_range_values() {
        let histogram = Histogram::new([-0.1, 0.5, 1.5, f64::NAN], 2, 0.0..1.0);
        assert_eq!(histogram.total_count(), 1);
        assert_eq!(histogram.out_of_range, 3);
    }

    #[test]
    fn test_bin_boundaries() {
        let histogram = Histogram::new([0.25, 0.49, 0.5], 2, 0.0..1.0);
        assert_eq!(histogram.bins[0].range, 0.0..0.5);
        assert_eq!(histogram.bins[1].range, 0.5..1.0);
        assert_eq!(histogram.bins[0].count, 2);
        assert_eq!(histogram.bins[1].count, 1);
        assert_eq!(histogram.max_count(), 2);
    }

    #[test]
    fn test_zero_bins() {
        let histogram = Histogram::new([0.5], 0, 0.0..1.0);
        assert!(histogram.bins.is_empty());
        assert_eq!(histogram.out_of_range, 1);
        assert_eq!(histogram.max_count(), 0);
    }
}
