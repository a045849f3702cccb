use terrain_noise::{NoiseGenerator, SubdivisionMode, SubdivisionNoise};

fn main() {
    // 32×32 polynomial noise from seed 2025, recursive subdivision
    let noise = SubdivisionNoise::with_seed(2025, 32, 32)
        .expect("valid resolution")
        .mode(SubdivisionMode::Recursive);
    let map = noise.generate_map();

    // Print the top-left 16×16 corner of the map
    for y in 0..16 {
        for x in 0..16 {
            print!("{:>6.3} ", map.get(x, y));
        }
        println!();
    }
}
