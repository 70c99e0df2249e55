//! Spacecraft ground positions, live or simulated.

use std::f64::consts::PI;

use serde::Deserialize;

pub const SIM_INCLINATION_DEG: f64 = 51.6;
pub const SIM_ANGLE_STEP: f64 = 0.001;
const SIM_LAT_FREQUENCY: f64 = 3.0;
const SIM_LON_RATE: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpacecraftPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: i64,
}

/// Coordinates arrive as strings from the live feed, numbers are accepted too.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Option<f64> {
        match self {
            Coordinate::Number(v) => Some(*v),
            Coordinate::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct GroundPoint {
    latitude: Coordinate,
    longitude: Coordinate,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PositionReport {
    iss_position: GroundPoint,
    #[serde(default)]
    timestamp: i64,
}

impl PositionReport {
    pub fn to_position(&self) -> Option<SpacecraftPosition> {
        let latitude = self.iss_position.latitude.value()?;
        let longitude = self.iss_position.longitude.value()?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(SpacecraftPosition { latitude, longitude, timestamp: self.timestamp })
    }
}

/// Stand-in orbit used whenever the live position is unavailable.
///
/// The angle only ever grows; latitude swings with the station's inclination
/// and longitude sweeps west to east.
#[derive(Clone, Debug, Default)]
pub struct SimulatedOrbit {
    angle: f64,
}

impl SimulatedOrbit {
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn advance(&mut self) -> f64 {
        self.angle += SIM_ANGLE_STEP;
        self.angle
    }

    pub fn position_at(angle: f64, timestamp: i64) -> SpacecraftPosition {
        let latitude = SIM_INCLINATION_DEG * (angle * SIM_LAT_FREQUENCY).sin();
        let longitude = (angle * 180.0 / PI * SIM_LON_RATE).rem_euclid(360.0) - 180.0;
        SpacecraftPosition { latitude, longitude, timestamp }
    }

    pub fn step(&mut self, timestamp: i64) -> SpacecraftPosition {
        let angle = self.advance();
        Self::position_at(angle, timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simulated_position_is_deterministic() {
        let a = SimulatedOrbit::position_at(0.734, 100);
        let b = SimulatedOrbit::position_at(0.734, 100);
        assert_eq!(a, b);
    }

    #[test]
    fn test_simulated_position_ranges() {
        let mut orbit = SimulatedOrbit::default();
        for _ in 0..5000 {
            let pos = orbit.step(0);
            assert!(pos.latitude.abs() <= SIM_INCLINATION_DEG + 1e-9);
            assert!(pos.longitude >= -180.0 && pos.longitude < 180.0);
        }
        assert_abs_diff_eq!(orbit.angle(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_simulated_position_formula() {
        let pos = SimulatedOrbit::position_at(0.01, 0);
        assert_abs_diff_eq!(pos.latitude, 51.6 * 0.03_f64.sin(), epsilon = 1e-12);
        assert_abs_diff_eq!(pos.longitude, 0.01_f64.to_degrees() * 10.0 - 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_step_advances_angle() {
        let mut orbit = SimulatedOrbit::default();
        let first = orbit.step(1);
        let second = orbit.step(2);
        assert_abs_diff_eq!(orbit.angle(), 2.0 * SIM_ANGLE_STEP, epsilon = 1e-15);
        assert!(second.longitude > first.longitude);
        assert_eq!(second.timestamp, 2);
    }

    #[test]
    fn test_live_report_with_string_coordinates() {
        let json = r#"{"message": "success", "timestamp": 1700000000,
            "iss_position": {"latitude": "-12.3456", "longitude": "101.5"}}"#;
        let report: PositionReport = serde_json::from_str(json).unwrap();
        let pos = report.to_position().unwrap();
        assert_eq!(pos.latitude, -12.3456);
        assert_eq!(pos.longitude, 101.5);
        assert_eq!(pos.timestamp, 1700000000);
    }

    #[test]
    fn test_live_report_with_numeric_coordinates() {
        let json = r#"{"timestamp": 5, "iss_position": {"latitude": 1.5, "longitude": -2.5}}"#;
        let report: PositionReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.to_position().unwrap().longitude, -2.5);
    }

    #[test]
    fn test_live_report_rejects_garbage() {
        let json = r#"{"iss_position": {"latitude": "north", "longitude": "0"}}"#;
        let report: PositionReport = serde_json::from_str(json).unwrap();
        assert!(report.to_position().is_none());

        let out_of_range = r#"{"iss_position": {"latitude": "95", "longitude": "0"}}"#;
        let report: PositionReport = serde_json::from_str(out_of_range).unwrap();
        assert!(report.to_position().is_none());

        assert!(serde_json::from_str::<PositionReport>(r#"{"message": "success"}"#).is_err());
    }
}
