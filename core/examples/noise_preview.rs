use std::error::Error;
use std::path::Path;

use image::{Rgb, RgbImage};
use terrain_noise::{MapConfig, NoiseGenerator, NoiseMap, utils};
use tracing_subscriber::EnvFilter;

// Compute a simple hillshade for a normalised map
// `z_scale` adjusts vertical exaggeration
fn hillshade(map: &NoiseMap, z_scale: f32) -> Vec<f32> {
    let (w, h) = map.dimensions();
    let mut shade = vec![1.0; w * h];
    let azimuth = std::f32::consts::PI / 4.0; // 45°
    let altitude = std::f32::consts::PI / 4.0; // 45°
    let (sin_alt, cos_alt) = altitude.sin_cos();
    let (lx, ly, lz) = (azimuth.cos() * cos_alt, azimuth.sin() * cos_alt, sin_alt);

    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            // Central differences
            let dzdx = (map.get(x + 1, y) - map.get(x - 1, y)) / 2.0 * z_scale;
            let dzdy = (map.get(x, y + 1) - map.get(x, y - 1)) / 2.0 * z_scale;
            let len = (dzdx * dzdx + dzdy * dzdy + 1.0).sqrt();
            // Lambertian dot with the surface normal
            shade[y * w + x] = ((-dzdx * lx - dzdy * ly + lz) / len).max(0.0);
        }
    }
    shade
}

// Usage: cargo run --example noise_preview -- [config.toml] [output-prefix]
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => MapConfig::from_toml(&std::fs::read_to_string(path)?)?,
        None => MapConfig::default(),
    };
    let prefix = args.next().unwrap_or_else(|| "noise".to_string());

    let generator = config.build()?;
    let mut map = generator.generate_map();
    utils::normalize(&mut map);
    let (w, h) = map.dimensions();

    let gray_path = format!("{prefix}_gray.png");
    map.to_gray_image().save(Path::new(&gray_path))?;

    let rgb = utils::to_terrain_rgb(&map);
    let shade = hillshade(&map, 20.0);
    let mut img = RgbImage::new(w as u32, h as u32);
    for (i, px) in rgb.chunks_exact(3).enumerate() {
        let light = (shade[i] * 0.5 + 0.5).clamp(0.0, 1.0);
        let pixel = Rgb([
            (px[0] as f32 * light) as u8,
            (px[1] as f32 * light) as u8,
            (px[2] as f32 * light) as u8,
        ]);
        img.put_pixel((i % w) as u32, (i / w) as u32, pixel);
    }
    let terrain_path = format!("{prefix}_terrain.png");
    img.save(Path::new(&terrain_path))?;

    println!(
        "{:?} {}x{}: wrote {} and {}",
        generator.kind(),
        w,
        h,
        gray_path,
        terrain_path
    );
    Ok(())
}
