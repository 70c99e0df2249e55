//! Geographic to screen-space projection and marker placement.
//!
//! Points are placed on a sphere centred at the origin with +y up and +z
//! towards the viewer, then flattened onto the canvas by dropping z.
//! Rotation is an unbounded angle in radians added to the longitude.

use std::collections::HashMap;
use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::position::SpacecraftPosition;
use crate::roster::CraftCrew;

/// Fixed layout of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasGeometry {
    pub width: f64,
    pub height: f64,
    pub earth_radius: f64,
    pub orbit_radius: f64,
}

impl CanvasGeometry {
    pub fn new(size: f64, earth_radius: f64, orbit_altitude: f64) -> Self {
        Self {
            width: size,
            height: size,
            earth_radius,
            orbit_radius: earth_radius + orbit_altitude,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

pub fn project(lat: f64, lon: f64, radius: f64, rotation: f64) -> Vector3<f64> {
    let phi = (90.0 - lat).to_radians();
    let theta = (lon + rotation.to_degrees()).to_radians();
    Vector3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

pub fn is_visible(point: &Vector3<f64>) -> bool {
    point.z > 0.0
}

pub fn to_screen(point: &Vector3<f64>, center: (f64, f64)) -> (f64, f64) {
    (center.0 + point.x, center.1 - point.y)
}

/// Even spread around the orbit ring for craft without a known position.
pub fn fallback_ring_position(
    index: usize,
    count: usize,
    radius: f64,
    rotation: f64,
    center: (f64, f64),
) -> (f64, f64) {
    let angle = index as f64 * (2.0 * PI) / count.max(1) as f64 + rotation;
    (center.0 + angle.cos() * radius, center.1 + angle.sin() * radius)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Tracked,
    Ring,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub craft: String,
    pub crew_count: usize,
    pub x: f64,
    pub y: f64,
    pub placement: Placement,
}

impl Marker {
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        ((x - self.x).powi(2) + (y - self.y).powi(2)).sqrt()
    }
}

/// Screen markers for every craft currently on the near side.
///
/// Renderer and hit-tester both go through here, so what is clickable is
/// exactly what is drawn.
pub fn place_markers(
    groups: &[CraftCrew],
    positions: &HashMap<String, SpacecraftPosition>,
    rotation: f64,
    geometry: &CanvasGeometry,
) -> Vec<Marker> {
    let center = geometry.center();
    groups
        .iter()
        .enumerate()
        .filter_map(|(index, group)| {
            let (x, y, placement) = match positions.get(&group.craft) {
                Some(pos) => {
                    let p = project(pos.latitude, pos.longitude, geometry.orbit_radius, rotation);
                    if !is_visible(&p) {
                        return None;
                    }
                    let (x, y) = to_screen(&p, center);
                    (x, y, Placement::Tracked)
                }
                None => {
                    let (x, y) = fallback_ring_position(
                        index,
                        groups.len(),
                        geometry.orbit_radius,
                        rotation,
                        center,
                    );
                    (x, y, Placement::Ring)
                }
            };
            Some(Marker {
                craft: group.craft.clone(),
                crew_count: group.crew.len(),
                x,
                y,
                placement,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn group(craft: &str, crew: &[&str]) -> CraftCrew {
        CraftCrew {
            craft: craft.to_string(),
            crew: crew.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn at(lat: f64, lon: f64) -> SpacecraftPosition {
        SpacecraftPosition { latitude: lat, longitude: lon, timestamp: 0 }
    }

    #[test]
    fn test_equator_prime_meridian_fixture() {
        let p = project(0.0, 0.0, 100.0, 0.0);
        assert_abs_diff_eq!(p.x, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_poles_project_onto_vertical_axis() {
        let north = project(90.0, 45.0, 100.0, 1.3);
        assert_abs_diff_eq!(north.y, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(north.x, 0.0, epsilon = 1e-9);

        let south = project(-90.0, -120.0, 100.0, 0.0);
        assert_abs_diff_eq!(south.y, -100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_visible_hemisphere() {
        assert!(is_visible(&project(0.0, 90.0, 100.0, 0.0)));
        assert!(!is_visible(&project(0.0, -90.0, 100.0, 0.0)));
        assert!(is_visible(&project(30.0, 0.0, 100.0, PI / 2.0)));
        assert!(!is_visible(&project(30.0, 0.0, 100.0, -PI / 2.0)));
    }

    #[test]
    fn test_unbounded_rotation_is_periodic() {
        let a = project(51.6, -73.0, 210.0, 0.4);
        let b = project(51.6, -73.0, 210.0, 0.4 + 2.0 * PI * 17.0);
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-6);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-6);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-6);
    }

    #[test]
    fn test_screen_inverts_y() {
        let p = Vector3::new(10.0, 20.0, 5.0);
        assert_eq!(to_screen(&p, (300.0, 300.0)), (310.0, 280.0));
    }

    #[test]
    fn test_fallback_ring_is_deterministic_and_even() {
        let a = fallback_ring_position(1, 4, 210.0, 0.25, (300.0, 300.0));
        let b = fallback_ring_position(1, 4, 210.0, 0.25, (300.0, 300.0));
        assert_eq!(a, b);

        let first = fallback_ring_position(0, 2, 210.0, 0.0, (300.0, 300.0));
        let second = fallback_ring_position(1, 2, 210.0, 0.0, (300.0, 300.0));
        assert_abs_diff_eq!(first.0, 510.0, epsilon = 1e-9);
        assert_abs_diff_eq!(second.0, 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(second.1, 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_place_markers_mixes_tracked_and_ring() {
        let geometry = CanvasGeometry::new(600.0, 150.0, 60.0);
        let groups = vec![group("ISS", &["A", "B"]), group("Tiangong", &["C"])];
        let mut positions = HashMap::new();
        positions.insert("ISS".to_string(), at(0.0, 90.0));

        let markers = place_markers(&groups, &positions, 0.0, &geometry);
        assert_eq!(markers.len(), 2);

        assert_eq!(markers[0].placement, Placement::Tracked);
        assert_eq!(markers[0].crew_count, 2);
        assert_abs_diff_eq!(markers[0].x, 300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(markers[0].y, 300.0, epsilon = 1e-9);

        assert_eq!(markers[1].placement, Placement::Ring);
        assert_abs_diff_eq!(markers[1].x, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_far_side_craft_is_not_placed() {
        let geometry = CanvasGeometry::new(600.0, 150.0, 60.0);
        let groups = vec![group("ISS", &["A"])];
        let mut positions = HashMap::new();
        positions.insert("ISS".to_string(), at(0.0, -90.0));

        assert!(place_markers(&groups, &positions, 0.0, &geometry).is_empty());
    }

    #[test]
    fn test_positions_without_roster_entry_are_ignored() {
        let geometry = CanvasGeometry::new(600.0, 150.0, 60.0);
        let mut positions = HashMap::new();
        positions.insert("ISS".to_string(), at(0.0, 90.0));

        assert!(place_markers(&[], &positions, 0.0, &geometry).is_empty());
    }
}
