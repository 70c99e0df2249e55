//! Per-frame painting of the globe scene.
//!
//! Everything is drawn with plain painter shapes in canvas coordinates
//! offset by the canvas origin. Layers, back to front: sky, stars, halo,
//! planet disc, surface, marker rings and glyphs, labels.

use eframe::egui;
use eframe::egui::{Align2, Color32, FontId, Pos2, Shape, Stroke, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::projection::{CanvasGeometry, Marker};

pub const COLOR_SKY: Color32 = Color32::from_rgb(10, 14, 39);
pub const COLOR_OCEAN_LIGHT: Color32 = Color32::from_rgb(79, 195, 247);
pub const COLOR_OCEAN: Color32 = Color32::from_rgb(33, 150, 243);
pub const COLOR_OCEAN_DEEP: Color32 = Color32::from_rgb(13, 71, 161);
pub const COLOR_MARKER: Color32 = Color32::from_rgb(255, 213, 79);
pub const COLOR_PANEL: Color32 = Color32::from_rgb(25, 118, 210);
pub const COLOR_ANTENNA_TIP: Color32 = Color32::from_rgb(255, 82, 82);

const HALO_RGB: (u8, u8, u8) = (100, 181, 246);
const LAND_RGBA: (u8, u8, u8, u8) = (27, 94, 32, 153);

const DISC_STEPS: usize = 64;
const HALO_STEPS: usize = 40;
const RING_SEGMENTS: usize = 180;
const ELLIPSE_SEGMENTS: usize = 48;

/// Landmass ellipses as (dx, dy, rx, ry) relative to the canvas centre.
const CONTINENTS: [(f32, f32, f32, f32); 3] = [
    (-50.0, -30.0, 40.0, 50.0),
    (20.0, 10.0, 50.0, 40.0),
    (-30.0, 40.0, 35.0, 30.0),
];

const CLOUD_BANDS: [(f32, f32, f32, f32); 3] = [
    (-20.0, -60.0, 90.0, 10.0),
    (30.0, 20.0, 100.0, 8.0),
    (-10.0, 75.0, 70.0, 7.0),
];
const CLOUD_DRIFT: f64 = 0.6;

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub base_alpha: f32,
    pub phase: f32,
    pub rate: f32,
}

impl Star {
    pub fn alpha_at(&self, time: f64) -> f32 {
        let shimmer = 0.75 + 0.25 * (time as f32 * self.rate + self.phase).sin();
        (self.base_alpha * shimmer).clamp(0.0, 1.0)
    }
}

/// Star positions are generated once; only their brightness moves.
#[derive(Clone, Debug, PartialEq)]
pub struct StarField {
    pub stars: Vec<Star>,
}

impl StarField {
    pub fn generate(count: usize, width: f32, height: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let stars = (0..count)
            .map(|_| Star {
                x: rng.gen_range(0.0..width),
                y: rng.gen_range(0.0..height),
                size: rng.gen_range(0.0..2.0),
                base_alpha: rng.gen_range(0.5..1.0),
                phase: rng.gen_range(0.0..std::f32::consts::TAU),
                rate: rng.gen_range(0.5..2.0),
            })
            .collect();
        Self { stars }
    }
}

pub fn mix(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let [ar, ag, ab, aa] = a.to_srgba_unmultiplied();
    let [br, bg, bb, ba] = b.to_srgba_unmultiplied();
    let lerp = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgba_unmultiplied(lerp(ar, br), lerp(ag, bg), lerp(ab, bb), lerp(aa, ba))
}

/// Colour at `t` along a list of (offset, colour) stops sorted by offset.
pub fn gradient_at(stops: &[(f32, Color32)], t: f32) -> Color32 {
    let Some(&(first_offset, first)) = stops.first() else {
        return Color32::TRANSPARENT;
    };
    if t <= first_offset {
        return first;
    }
    for pair in stops.windows(2) {
        let (o0, c0) = pair[0];
        let (o1, c1) = pair[1];
        if t <= o1 {
            let span = (o1 - o0).max(f32::EPSILON);
            return mix(c0, c1, (t - o0) / span);
        }
    }
    stops[stops.len() - 1].1
}

/// Canvas-style transform: rotate about the local origin, then translate.
pub fn local_to_screen(origin: Pos2, angle: f32, local: Vec2) -> Pos2 {
    let (sin, cos) = angle.sin_cos();
    origin + Vec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
}

pub fn ellipse_points(center: Pos2, radii: Vec2, pivot: Pos2, rotation: f32) -> Vec<Pos2> {
    (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let t = i as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
            let p = center + Vec2::new(radii.x * t.cos(), radii.y * t.sin());
            local_to_screen(pivot, rotation, p - pivot)
        })
        .collect()
}

pub fn circle_points(center: Pos2, radius: f32, segments: usize) -> Vec<Pos2> {
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32 * std::f32::consts::TAU;
            center + Vec2::new(radius * t.cos(), radius * t.sin())
        })
        .collect()
}

/// Spacecraft glyph around `origin`: glowing body, two solar panels,
/// antenna with a tip light.
pub fn glyph_shapes(origin: Pos2, angle: f32) -> Vec<Shape> {
    let at = |x: f32, y: f32| local_to_screen(origin, angle, Vec2::new(x, y));
    let rect = |x: f32, y: f32, w: f32, h: f32| vec![at(x, y), at(x + w, y), at(x + w, y + h), at(x, y + h)];

    let mut shapes = Vec::with_capacity(16);
    for i in (1..=5).rev() {
        let alpha = 60 - i as u8 * 10;
        shapes.push(Shape::circle_filled(
            origin,
            10.0 + i as f32 * 2.5,
            Color32::from_rgba_unmultiplied(255, 213, 79, alpha),
        ));
    }
    shapes.push(Shape::circle_filled(origin, 10.0, COLOR_MARKER));

    shapes.push(Shape::convex_polygon(rect(-18.0, -4.0, 12.0, 8.0), COLOR_PANEL, Stroke::NONE));
    shapes.push(Shape::convex_polygon(rect(6.0, -4.0, 12.0, 8.0), COLOR_PANEL, Stroke::NONE));

    let detail = Stroke::new(1.0, COLOR_OCEAN_DEEP);
    shapes.push(Shape::line_segment([at(-12.0, -4.0), at(-12.0, 4.0)], detail));
    shapes.push(Shape::line_segment([at(12.0, -4.0), at(12.0, 4.0)], detail));

    shapes.push(Shape::line_segment([at(0.0, -10.0), at(0.0, -18.0)], Stroke::new(2.0, Color32::WHITE)));
    shapes.push(Shape::circle_filled(at(0.0, -18.0), 2.0, COLOR_ANTENNA_TIP));
    shapes
}

pub struct SceneRenderer {
    geometry: CanvasGeometry,
    stars: StarField,
}

impl SceneRenderer {
    pub fn new(geometry: CanvasGeometry, stars: StarField) -> Self {
        Self { geometry, stars }
    }

    pub fn paint(&self, painter: &egui::Painter, origin: Pos2, rotation: f64, time: f64, markers: &[Marker]) {
        let g = &self.geometry;
        let center = origin + Vec2::new(g.width as f32 / 2.0, g.height as f32 / 2.0);
        let radius = g.earth_radius as f32;

        painter.rect_filled(
            egui::Rect::from_min_size(origin, Vec2::new(g.width as f32, g.height as f32)),
            0.0,
            COLOR_SKY,
        );
        self.paint_stars(painter, origin, time);
        paint_halo(painter, center, radius);
        paint_disc(painter, center, radius);
        paint_surface(painter, center, radius, rotation);

        for marker in markers {
            let pos = origin + Vec2::new(marker.x as f32, marker.y as f32);
            paint_orbit_ring(painter, center, g.orbit_radius as f32);
            painter.extend(glyph_shapes(pos, 0.0));
            paint_labels(painter, pos, marker);
        }
    }

    fn paint_stars(&self, painter: &egui::Painter, origin: Pos2, time: f64) {
        for star in &self.stars.stars {
            let alpha = (star.alpha_at(time) * 255.0) as u8;
            painter.circle_filled(
                origin + Vec2::new(star.x, star.y),
                star.size.max(0.3),
                Color32::from_rgba_unmultiplied(255, 255, 255, alpha),
            );
        }
    }
}

fn paint_halo(painter: &egui::Painter, center: Pos2, radius: f32) {
    let (r, g, b) = HALO_RGB;
    let inner = radius * 0.8;
    let outer = radius * 1.3;
    let band = (outer - inner) / HALO_STEPS as f32;
    for i in 0..HALO_STEPS {
        let t = (i as f32 + 0.5) / HALO_STEPS as f32;
        let alpha = (t * 0.3 * 255.0) as u8;
        painter.circle_stroke(
            center,
            inner + band * (i as f32 + 0.5),
            Stroke::new(band + 0.5, Color32::from_rgba_unmultiplied(r, g, b, alpha)),
        );
    }
}

/// Two-point radial fill: from a small circle up and to the left of the
/// centre out to the full disc, painted outermost first.
fn paint_disc(painter: &egui::Painter, center: Pos2, radius: f32) {
    let stops = [(0.0, COLOR_OCEAN_LIGHT), (0.5, COLOR_OCEAN), (1.0, COLOR_OCEAN_DEEP)];
    let focal = center - Vec2::splat(radius * 0.3);
    let focal_radius = radius * 0.1;
    for i in 0..=DISC_STEPS {
        let t = 1.0 - i as f32 / DISC_STEPS as f32;
        let c = focal + (center - focal) * t;
        let r = focal_radius + (radius - focal_radius) * t;
        painter.circle_filled(c, r, gradient_at(&stops, t));
    }
}

fn paint_surface(painter: &egui::Painter, center: Pos2, radius: f32, rotation: f64) {
    let (r, g, b, a) = LAND_RGBA;
    let land = Color32::from_rgba_unmultiplied(r, g, b, a);
    for (dx, dy, rx, ry) in CONTINENTS {
        let points = ellipse_points(center + Vec2::new(dx, dy), Vec2::new(rx, ry), center, rotation as f32);
        painter.add(Shape::convex_polygon(points, land, Stroke::NONE));
    }

    let ice = Color32::from_rgba_unmultiplied(255, 255, 255, 140);
    for sign in [-1.0, 1.0] {
        let cap = center + Vec2::new(0.0, sign * radius * 0.92);
        let points = ellipse_points(cap, Vec2::new(radius * 0.35, radius * 0.07), center, 0.0);
        painter.add(Shape::convex_polygon(points, ice, Stroke::NONE));
    }

    let cloud = Color32::from_rgba_unmultiplied(255, 255, 255, 30);
    let drift = (rotation * CLOUD_DRIFT) as f32;
    for (dx, dy, rx, ry) in CLOUD_BANDS {
        let points = ellipse_points(center + Vec2::new(dx, dy), Vec2::new(rx, ry), center, drift);
        painter.add(Shape::convex_polygon(points, cloud, Stroke::NONE));
    }
}

fn paint_orbit_ring(painter: &egui::Painter, center: Pos2, orbit_radius: f32) {
    let (r, g, b) = HALO_RGB;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(r, g, b, 51));
    let points = circle_points(center, orbit_radius, RING_SEGMENTS);
    painter.extend(Shape::dashed_line(&points, stroke, 5.0, 5.0));
}

fn paint_labels(painter: &egui::Painter, pos: Pos2, marker: &Marker) {
    let name_pos = pos + Vec2::new(0.0, 30.0);
    let shadow = Color32::from_rgba_unmultiplied(0, 0, 0, 204);
    let font = FontId::proportional(13.0);
    painter.text(name_pos + Vec2::splat(1.0), Align2::CENTER_BOTTOM, &marker.craft, font.clone(), shadow);
    painter.text(name_pos, Align2::CENTER_BOTTOM, &marker.craft, font, Color32::WHITE);

    painter.text(
        pos + Vec2::new(0.0, 45.0),
        Align2::CENTER_BOTTOM,
        format!("{} crew", marker.crew_count),
        FontId::proportional(11.0),
        COLOR_MARKER,
    );
}
