//! Success threshold evaluation shared by every map expectation.

use crate::error::{DatavowError, Result};

/// Decides success from the counts of a map evaluation and an optional
/// `mostly` fraction.
///
/// Rules, in order:
/// - `mostly` outside `[0, 1]` is an [`DatavowError::InvalidParameter`].
/// - Zero considered rows pass vacuously, whatever `mostly` says.
/// - Without `mostly`, success requires zero failing rows.
/// - With `mostly`, success requires `passing / considered >= mostly`.
pub fn evaluate(
    considered_count: usize,
    passing_count: usize,
    mostly: Option<f64>,
) -> Result<bool> {
    if let Some(fraction) = mostly {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(DatavowError::invalid_parameter(format!(
                "mostly must be between 0 and 1, got {fraction}"
            )));
        }
    }

    if considered_count == 0 {
        return Ok(true);
    }

    match mostly {
        None => Ok(passing_count == considered_count),
        Some(fraction) => Ok(passing_count as f64 / considered_count as f64 >= fraction),
    }
}
