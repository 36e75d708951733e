//! Label formatting for display nodes.
//!
//! Every helper rejects non-finite input with [`UpdateError::Format`] so a
//! display node keeps its previous text instead of showing `NaN`.

use std::f64::consts::PI;

use crate::error::UpdateError;

/// Format `value` with `digits` decimals.
pub fn fixed(value: f64, digits: usize) -> Result<String, UpdateError> {
    if !value.is_finite() {
        return Err(UpdateError::Format(format!("cannot display {value}")));
    }
    Ok(format!("{value:.digits$}"))
}

/// `θ = 0.318π = 57.296°`
pub fn theta_label(angle: f64) -> Result<String, UpdateError> {
    Ok(format!(
        "θ = {}π = {}°",
        fixed(angle / PI, 3)?,
        fixed(angle.to_degrees(), 3)?
    ))
}

/// `cosθ = 0.540`
pub fn cos_label(cos: f64) -> Result<String, UpdateError> {
    Ok(format!("cosθ = {}", fixed(cos, 3)?))
}

/// `sinθ = 0.841`
pub fn sin_label(sin: f64) -> Result<String, UpdateError> {
    Ok(format!("sinθ = {}", fixed(sin, 3)?))
}
