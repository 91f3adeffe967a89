use anyhow::{Context, Result};

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const PRODUCTS: [(&str, f64); 3] = [("Basic", 9.5), ("Plus", 19.0), ("Pro", 42.0)];
const CHANNELS: [&str; 2] = ["online", "store"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_data.csv".to_string());
    let rows: usize = 500;
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "region", "product", "channel", "units", "price", "revenue", "rating", "discount",
    ])?;

    for i in 0..rows {
        let region = *rng.pick(&REGIONS);
        let (product, base_price) = *rng.pick(&PRODUCTS);
        let channel = *rng.pick(&CHANNELS);

        let units = rng.gauss(40.0, 12.0).round().max(1.0);
        let price = (base_price + rng.gauss(0.0, base_price * 0.1)).max(0.5);
        let revenue = units * price;
        let discount = rng.next_f64() * 0.3;

        // Every 37th rating is missing; row 250 has an infinite revenue.
        let rating = if i % 37 == 0 {
            String::new()
        } else {
            format!("{:.1}", rng.gauss(3.8, 0.7).clamp(1.0, 5.0))
        };
        let revenue = if i == 250 {
            "inf".to_string()
        } else {
            format!("{revenue:.2}")
        };

        writer.write_record([
            region.to_string(),
            product.to_string(),
            channel.to_string(),
            format!("{units}"),
            format!("{price:.2}"),
            revenue,
            rating,
            format!("{discount:.3}"),
        ])?;
    }
    writer.flush()?;

    log::info!("wrote {rows} rows to {output_path}");
    println!("Wrote {rows} rows to {output_path}");
    Ok(())
}
