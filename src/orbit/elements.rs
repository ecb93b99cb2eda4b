//! Orbital parameter derivation from a two-line element source.
//!
//! Only two scalars are taken from the element set: the inclination and the
//! mean motion (converted to an orbital period). No propagation is done
//! with them.

use std::time::Duration;

use crate::orbit::error::ElementsError;
use crate::orbit::types::OrbitalParameters;

const MINUTES_PER_DAY: f64 = 24.0 * 60.0;
const INCLINATION_FIELD: usize = 2;
const MEAN_MOTION_FIELD: usize = 7;

/// Fetches element text over HTTP and derives [`OrbitalParameters`].
///
/// Constructed once at startup and shared; holds its own HTTP client with
/// the configured request timeout.
pub struct ElementsProvider {
    client: reqwest::Client,
    source_url: String,
}

impl ElementsProvider {
    pub fn new(source_url: String, fetch_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(fetch_timeout).build()?;
        Ok(Self { client, source_url })
    }

    /// Derive parameters from the live source, falling back to the fixed
    /// defaults on any failure. This call never returns an error.
    pub async fn fetch(&self) -> OrbitalParameters {
        match self.fetch_text().await {
            Ok(text) => params_from_text(&text),
            Err(e) => {
                log::warn!("element source unavailable ({e}), using default parameters");
                OrbitalParameters::fallback()
            }
        }
    }

    async fn fetch_text(&self) -> Result<String, ElementsError> {
        let text = self
            .client
            .get(&self.source_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }
}

/// Total version of [`parse_elements`]: parse or fall back, never fail.
pub fn params_from_text(text: &str) -> OrbitalParameters {
    match parse_elements(text) {
        Ok(params) => {
            log::info!(
                "element set loaded: inclination={:.4} deg, period={:.2} min",
                params.inclination_deg,
                params.period_min
            );
            params
        }
        Err(e) => {
            log::warn!("invalid element text ({e}), using default parameters");
            OrbitalParameters::fallback()
        }
    }
}

/// Parse element text: line 0 is the object name, line 1 is ignored, line 2
/// carries inclination (field 2) and mean motion in rev/day (field 7).
fn parse_elements(text: &str) -> Result<OrbitalParameters, ElementsError> {
    let lines: Vec<&str> = text
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    if lines.len() < 3 {
        return Err(ElementsError::TooFewLines(lines.len()));
    }

    let fields: Vec<&str> = lines[2].split_whitespace().collect();
    if fields.len() < 8 {
        return Err(ElementsError::TooFewFields(fields.len()));
    }

    let inclination_deg: f64 = fields[INCLINATION_FIELD].parse()?;
    let mean_motion: f64 = fields[MEAN_MOTION_FIELD].parse()?;
    let period_min = MINUTES_PER_DAY / mean_motion;

    if !inclination_deg.is_finite() || inclination_deg <= 0.0 || inclination_deg > 90.0 {
        return Err(ElementsError::InclinationOutOfRange(inclination_deg));
    }
    if !period_min.is_finite() || period_min <= 0.0 {
        return Err(ElementsError::PeriodOutOfRange(period_min));
    }

    Ok(OrbitalParameters {
        inclination_deg,
        period_min,
        degraded: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ELEMENT_TEXT: &str = "\
ISS (ZARYA)
1 25544U 98067A   24015.50000000  .00016717  00000+0  10270-3 0  9005
2 25544  51.6400 247.4627 0006703 130.5360 325.0288 15.50000000123456";

    #[test]
    fn parses_inclination_and_period_from_line_two() {
        let params = params_from_text(ELEMENT_TEXT);
        assert!(!params.degraded);
        assert!((params.inclination_deg - 51.64).abs() < 1e-9);
        assert!((params.period_min - 1440.0 / 15.50000000123456).abs() < 1e-6);
    }

    #[test]
    fn too_few_lines_falls_back_to_defaults() {
        let params = params_from_text("1 25544U 98067A\n2 25544 51.6 0 0 0 0 15.5");
        assert!(params.degraded);
        assert_eq!(
            params.inclination_deg,
            OrbitalParameters::DEFAULT_INCLINATION_DEG
        );
        assert_eq!(params.period_min, OrbitalParameters::DEFAULT_PERIOD_MIN);
    }

    #[test]
    fn too_few_fields_falls_back_to_defaults() {
        let params = params_from_text("ISS\nline one\n2 25544 51.6");
        assert!(params.degraded);
    }

    #[test]
    fn garbage_numeric_field_falls_back_to_defaults() {
        let params = params_from_text("ISS\nline one\n2 25544 incl 0 0 0 0 15.5");
        assert!(params.degraded);
    }

    #[test]
    fn out_of_range_inclination_falls_back_to_defaults() {
        let text = "ISS\nline one\n2 25544 95.0 247.4 0006703 130.5 325.0 15.5";
        let params = params_from_text(text);
        assert!(params.degraded);
        assert_eq!(
            params.inclination_deg,
            OrbitalParameters::DEFAULT_INCLINATION_DEG
        );
    }

    #[test]
    fn non_positive_mean_motion_falls_back_to_defaults() {
        let text = "ISS\nline one\n2 25544 51.6 247.4 0006703 130.5 325.0 -15.5";
        assert!(params_from_text(text).degraded);

        let text = "ISS\nline one\n2 25544 51.6 247.4 0006703 130.5 325.0 0.0";
        assert!(params_from_text(text).degraded);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let padded = format!("\n\n{ELEMENT_TEXT}\n\n");
        assert!(!params_from_text(&padded).degraded);
    }
}
