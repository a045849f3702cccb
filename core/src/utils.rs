use palette::{Gradient, LinSrgb};

use crate::map::NoiseMap;

const WATER_THRESHOLD: f32 = 0.3;
const SAND_THRESHOLD: f32 = 0.4;
const GRASS_THRESHOLD: f32 = 0.6;
const ROCK_THRESHOLD: f32 = 0.8;

// Rescale the map in place so its samples span [0.0, 1.0]
// A flat map becomes all zeros
pub fn normalize(map: &mut NoiseMap) {
    let (min, max) = map.min_max();
    let range = (max - min).max(0.001); // prevent zero-division
    for val in map.as_mut_slice() {
        *val = (*val - min) / range;
    }
}

// Colour ramp from deep water up to snow, keyed on height in [0,1]
fn terrain_gradient() -> Gradient<LinSrgb> {
    Gradient::with_domain(vec![
        (0.0, LinSrgb::new(0.0, 0.0, 0.5)), // deep water
        (WATER_THRESHOLD, LinSrgb::new(0.0, 0.5, 1.0)), // shallows
        (SAND_THRESHOLD, LinSrgb::new(0.86, 0.78, 0.63)), // sand
        (GRASS_THRESHOLD, LinSrgb::new(0.2, 0.8, 0.2)), // grass
        (ROCK_THRESHOLD, LinSrgb::new(0.75, 0.75, 0.75)), // rock
        (1.0, LinSrgb::new(1.0, 1.0, 1.0)), // snow
    ])
}

// Convert a map with samples in [0,1] into an RGB byte buffer
// Values outside the range are clamped
pub fn to_terrain_rgb(map: &NoiseMap) -> Vec<u8> {
    let gradient = terrain_gradient();
    let mut buf = Vec::with_capacity(map.as_slice().len() * 3);
    for &h in map.as_slice() {
        let rgb = gradient.get(h.clamp(0.0, 1.0)).into_format::<u8>();
        buf.extend_from_slice(&[rgb.red, rgb.green, rgb.blue]);
    }
    buf
}
