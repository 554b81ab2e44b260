use anyhow::{Context, Result};

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// (model, type, base price at 2019, fuel weights: gas/diesel/hybrid/electric/other)
const MODELS: [(&str, &str, f64, [f64; 5]); 8] = [
    ("ford f-150", "truck", 32000.0, [0.85, 0.13, 0.0, 0.0, 0.02]),
    ("chevrolet silverado 1500", "pickup", 30000.0, [0.8, 0.18, 0.0, 0.0, 0.02]),
    ("ram 2500", "truck", 38000.0, [0.35, 0.65, 0.0, 0.0, 0.0]),
    ("toyota camry", "sedan", 21000.0, [0.88, 0.0, 0.12, 0.0, 0.0]),
    ("honda civic", "sedan", 18000.0, [0.95, 0.0, 0.05, 0.0, 0.0]),
    ("jeep wrangler", "SUV", 27000.0, [0.97, 0.0, 0.0, 0.0, 0.03]),
    ("nissan leaf", "hatchback", 17000.0, [0.0, 0.0, 0.0, 1.0, 0.0]),
    ("toyota prius", "hatchback", 19000.0, [0.0, 0.0, 1.0, 0.0, 0.0]),
];
const FUELS: [&str; 5] = ["gas", "diesel", "hybrid", "electric", "other"];
/// (condition, price factor)
const CONDITIONS: [(&str, f64); 6] = [
    ("new", 1.15),
    ("like new", 1.05),
    ("excellent", 1.0),
    ("good", 0.9),
    ("fair", 0.6),
    ("salvage", 0.3),
];
const COLORS: [&str; 7] = ["white", "black", "silver", "grey", "blue", "red", ""];

fn weighted_fuel(rng: &mut SimpleRng, weights: &[f64; 5]) -> &'static str {
    let mut r = rng.next_f64() * weights.iter().sum::<f64>();
    for (fuel, w) in FUELS.iter().zip(weights) {
        if r < *w {
            return *fuel;
        }
        r -= w;
    }
    FUELS[0]
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let n_rows = 5000;

    let output_path = "vehicles_us.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record([
        "price",
        "model_year",
        "model",
        "condition",
        "cylinders",
        "fuel",
        "odometer",
        "transmission",
        "type",
        "paint_color",
        "is_4wd",
        "date_posted",
        "days_listed",
    ])?;

    for i in 0..n_rows {
        let (model, body, base, fuel_weights) = *rng.pick(&MODELS);
        let fuel = weighted_fuel(&mut rng, &fuel_weights);
        let (condition, factor) = *rng.pick(&CONDITIONS);
        let year = 2019 - (rng.next_f64() * 20.0) as i64;
        let age = (2019 - year) as f64;
        let price = (base * factor * 0.88f64.powf(age) * rng.gauss(1.0, 0.12).max(0.2)).round();
        let odometer = (age * 12000.0 * rng.gauss(1.0, 0.3).max(0.05)).round();

        // Blank and junk cells that the loader is expected to drop.
        let price_cell = if rng.chance(0.01) {
            "call for price".to_string()
        } else {
            format!("{price:.0}")
        };
        let year_cell = if rng.chance(0.07) {
            String::new()
        } else {
            format!("{year}.0")
        };
        let cylinders = match fuel {
            "electric" => String::new(),
            _ => rng.pick(&["4.0", "6.0", "8.0"]).to_string(),
        };

        writer.write_record([
            price_cell,
            year_cell,
            model.to_string(),
            condition.to_string(),
            cylinders,
            fuel.to_string(),
            format!("{odometer:.1}"),
            if rng.chance(0.9) { "automatic" } else { "manual" }.to_string(),
            body.to_string(),
            rng.pick(&COLORS).to_string(),
            if rng.chance(0.5) { "1.0" } else { "" }.to_string(),
            format!("2018-{:02}-{:02}", 5 + i % 8, 1 + i % 28),
            ((rng.next_f64() * 100.0) as u32).to_string(),
        ])?;
    }
    writer.flush().context("flushing output file")?;

    println!("Wrote {n_rows} listings to {output_path}");
    Ok(())
}
