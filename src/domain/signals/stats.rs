//! Small statistics helpers shared by the detectors.

/// Arithmetic mean; `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation; `None` for an empty slice.
pub(crate) fn stddev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Median of day gaps; `None` for an empty slice.
pub(crate) fn median(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) as f64 / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn mean_and_stddev_agree_on_constant_series() {
        let values = [5.0, 5.0, 5.0];
        assert_eq!(mean(&values), Some(5.0));
        assert_eq!(stddev(&values), Some(0.0));
    }

    #[test]
    fn stddev_of_known_series() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((stddev(&values).unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn median_odd_and_even_lengths() {
        assert_eq!(median(&[30, 7, 14]), Some(14.0));
        assert_eq!(median(&[7, 14, 30, 31]), Some(22.0));
        assert_eq!(median(&[]), None);
    }
}
