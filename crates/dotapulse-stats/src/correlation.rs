/// Pearson correlation coefficient of paired observations.
///
/// # Returns
///
/// * `Some(r)` with `r` in `[-1, 1]` - if there are at least two pairs and
///   neither variable is constant
/// * `None` - otherwise (the coefficient is undefined)
///
/// # Examples
///
/// ```
/// # use dotapulse_stats::correlation::pearson;
/// let r = pearson([(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)]).unwrap();
/// assert!((r + 1.0).abs() < 1e-12);
///
/// // Constant variable: undefined
/// assert_eq!(pearson([(1.0, 1.0), (2.0, 1.0)]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn pearson<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let pairs = pairs.into_iter().collect::<Vec<_>>();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom <= f64::EPSILON {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}
