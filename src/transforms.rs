//! Numerical helpers for preparing downloaded fields for analysis and plotting.
//!
//! Fields are plain slices. Three-dimensional fields use a level-major layout:
//! all grid points of the first level, then all of the second, and so on.

use thiserror::Error;

/// Standard gravity in m s⁻².
pub const STANDARD_GRAVITY: f64 = 9.80665;
/// Mean earth radius in m.
pub const EARTH_RADIUS: f64 = 6.371e6;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    #[error("Expected {expected} values but got {found} for '{field}'")]
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
}

fn check_len(field: &'static str, values: &[f64], expected: usize) -> Result<(), TransformError> {
    if values.len() != expected {
        return Err(TransformError::ShapeMismatch {
            field,
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

/// Converts geopotential (m² s⁻²) to geometric height (m).
///
/// Accounts for gravity decreasing with height but ignores its variation with latitude.
///
/// # Examples
///
/// ```
/// use era5::transforms::geopotential_to_height;
///
/// let heights = geopotential_to_height(&[0.0, 9.80665 * 1000.0]);
/// assert_eq!(heights[0], 0.0);
/// assert!((heights[1] - 1000.16).abs() < 0.01);
/// ```
pub fn geopotential_to_height(geopotential: &[f64]) -> Vec<f64> {
    geopotential
        .iter()
        .map(|z| z * EARTH_RADIUS / (STANDARD_GRAVITY * EARTH_RADIUS - z))
        .collect()
}

/// Integrates a variable through the atmospheric column with the trapezoidal rule.
///
/// `values` and `geopotential` hold `levels × points` values in level-major order;
/// integration runs over the geometric heights derived from the geopotential.
/// Returns one value per grid point.
pub fn column_integration(
    values: &[f64],
    geopotential: &[f64],
    levels: usize,
    points: usize,
) -> Result<Vec<f64>, TransformError> {
    let expected = levels * points;
    check_len("values", values, expected)?;
    check_len("geopotential", geopotential, expected)?;

    let heights = geopotential_to_height(geopotential);
    let mut integrated = vec![0.0; points];
    for level in 1..levels {
        let (below, above) = ((level - 1) * points, level * points);
        for (point, total) in integrated.iter_mut().enumerate() {
            let dz = heights[above + point] - heights[below + point];
            *total += 0.5 * (values[below + point] + values[above + point]) * dz;
        }
    }
    Ok(integrated)
}

/// Horizontal wind speed from its u and v components.
pub fn wind_speed(u: &[f64], v: &[f64]) -> Result<Vec<f64>, TransformError> {
    check_len("v", v, u.len())?;
    Ok(u.iter().zip(v).map(|(u, v)| u.hypot(*v)).collect())
}

/// Scales wind vectors to unit length, for arrows of uniform size.
///
/// Calm points (zero speed) become `NaN` and are left out by plotting tools.
pub fn normalize_wind(u: &[f64], v: &[f64]) -> Result<(Vec<f64>, Vec<f64>), TransformError> {
    let speed = wind_speed(u, v)?;
    let scale = |component: &[f64]| -> Vec<f64> {
        component
            .iter()
            .zip(&speed)
            .map(|(c, s)| if *s == 0.0 { f64::NAN } else { c / s })
            .collect()
    };
    Ok((scale(u), scale(v)))
}

/// Mean of the finite values, skipping `NaN` and infinities; `None` if there are none.
pub fn nan_mean(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn column_of_constant_value_integrates_to_value_times_depth() {
        // Two grid points, three levels.
        let geopotential = [0.0, 0.0, 9806.65, 9806.65, 19613.3, 19613.3];
        let values = [2.0; 6];
        let result = column_integration(&values, &geopotential, 3, 2).unwrap();
        let top = geopotential_to_height(&[19613.3])[0];
        assert_eq!(result.len(), 2);
        assert!(close(result[0], 2.0 * top));
        assert!(close(result[1], 2.0 * top));
    }

    #[test]
    fn column_integration_checks_shapes() {
        let err = column_integration(&[1.0; 5], &[0.0; 6], 3, 2).unwrap_err();
        assert_eq!(
            err,
            TransformError::ShapeMismatch {
                field: "values",
                expected: 6,
                found: 5
            }
        );
    }

    #[test]
    fn single_level_integrates_to_zero() {
        assert_eq!(column_integration(&[5.0, 6.0], &[0.0, 0.0], 1, 2).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn normalized_wind_has_unit_length() {
        let (u, v) = normalize_wind(&[3.0, 0.0], &[4.0, 0.0]).unwrap();
        assert!(close(u[0], 0.6));
        assert!(close(v[0], 0.8));
        assert!(u[1].is_nan() && v[1].is_nan());
    }

    #[test]
    fn wind_speed_requires_matching_components() {
        assert!(wind_speed(&[1.0], &[1.0, 2.0]).is_err());
        assert_eq!(wind_speed(&[3.0], &[4.0]).unwrap(), vec![5.0]);
    }

    #[test]
    fn nan_mean_skips_missing_values() {
        assert_eq!(nan_mean(&[1.0, f64::NAN, 3.0]), Some(2.0));
        assert_eq!(nan_mean(&[f64::NAN]), None);
        assert_eq!(nan_mean(&[]), None);
    }

    #[test]
    fn nan_mean_skips_infinities() {
        assert_eq!(nan_mean(&[1.0, f64::INFINITY, 3.0]), Some(2.0));
        assert_eq!(nan_mean(&[f64::NEG_INFINITY, 4.0]), Some(4.0));
        assert_eq!(nan_mean(&[f64::INFINITY]), None);
    }
}
