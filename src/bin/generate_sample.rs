//! Generate a deterministic synthetic `india_housing_prices.csv` so the
//! dashboard can be exercised without the real dataset. Prices follow a
//! rough per-city rate per sqft plus gaussian noise.

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

    /// Uniform pick from a slice.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Uniform integer in `[lo, hi]`.
    fn range_i64(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // (state, city, rate in rupees per sqft)
    let cities: Vec<(&str, &str, f64)> = vec![
        ("Maharashtra", "Mumbai", 18000.0),
        ("Maharashtra", "Pune", 8000.0),
        ("Karnataka", "Bengaluru", 9500.0),
        ("Karnataka", "Mysuru", 5500.0),
        ("Delhi", "New Delhi", 14000.0),
        ("Telangana", "Hyderabad", 7000.0),
        ("Tamil Nadu", "Chennai", 7500.0),
        ("West Bengal", "Kolkata", 6000.0),
    ];
    let localities = ["Central", "North", "South", "East Side", "West Side"];
    let property_types = ["Apartment", "Independent House", "Villa"];
    let transport = ["Low", "Medium", "High"];
    let yes_no = ["Yes", "No"];
    let furnished = ["Unfurnished", "Semi-Furnished", "Furnished"];
    let amenities = ["Lift", "Gym", "Pool", "Garden", "Clubhouse"];
    let facings = ["East", "West", "North", "South"];
    let owner_types = ["Owner", "Builder", "Broker"];
    let availability = ["Ready_to_Move", "Under_Construction"];

    let output_path = "data/india_housing_prices.csv";
    if let Some(parent) = std::path::Path::new(output_path).parent() {
        std::fs::create_dir_all(parent).expect("Failed to create data directory");
    }
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    writer
        .write_record([
            "State",
            "City",
            "Locality",
            "Property_Type",
            "BHK",
            "Size_in_SqFt",
            "Price_in_Lakhs",
            "Year_Built",
            "Age_of_Property",
            "Nearby_Schools",
            "Nearby_Hospitals",
            "Public_Transport_Accessibility",
            "Parking_Space",
            "Furnished_Status",
            "Floor_No",
            "Total_Floors",
            "Security",
            "Amenities",
            "Facing",
            "Owner_Type",
            "Availability_Status",
        ])
        .expect("Failed to write header");

    let rows_per_city = 250;
    let mut n_rows = 0usize;

    for &(state, city, rate) in &cities {
        for _ in 0..rows_per_city {
            let bhk = rng.range_i64(1, 5);
            let size = (600.0 * bhk as f64 + rng.gauss(0.0, 150.0)).clamp(250.0, 12000.0);
            // rupees → lakhs, with market noise
            let price =
                (size * rate * rng.gauss(1.0, 0.15).max(0.4) / 1e5).clamp(5.0, 4500.0);
            let year_built = rng.range_i64(1985, 2024);
            let total_floors = rng.range_i64(1, 30);

            writer
                .write_record([
                    state.to_string(),
                    city.to_string(),
                    format!("{city} {}", rng.choose(&localities)),
                    rng.choose(&property_types).to_string(),
                    bhk.to_string(),
                    format!("{size:.0}"),
                    format!("{price:.2}"),
                    year_built.to_string(),
                    (2025 - year_built).to_string(),
                    rng.range_i64(0, 12).to_string(),
                    rng.range_i64(0, 8).to_string(),
                    rng.choose(&transport).to_string(),
                    rng.choose(&yes_no).to_string(),
                    rng.choose(&furnished).to_string(),
                    rng.range_i64(0, total_floors).to_string(),
                    total_floors.to_string(),
                    rng.choose(&yes_no).to_string(),
                    rng.choose(&amenities).to_string(),
                    rng.choose(&facings).to_string(),
                    rng.choose(&owner_types).to_string(),
                    rng.choose(&availability).to_string(),
                ])
                .expect("Failed to write row");
            n_rows += 1;
        }
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {n_rows} listings to {output_path}");
}
