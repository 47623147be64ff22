use serde_json::json;

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

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Regions with their map centers: label, lat, lon.
const REGIONS: [(&str, f64, f64); 4] = [
    ("Europe", 48.0, 12.0),
    ("Africa", 8.0, 20.0),
    ("Antarctica", -78.0, 40.0),
    ("Oceania", -25.0, 135.0),
];

const STATUSES: [&str; 2] = ["Official", "Provisional"];
const FALLS: [&str; 2] = ["Fell", "Found"];
const TYPES: [&str; 6] = ["H5", "L6", "L5", "H6", "EH4", "Iron"];

fn main() {
    let mut rng = SimpleRng::new(42);

    // ---- Dataset CSV ----
    let mut writer = csv::Writer::from_path("final_meteorite_data.csv")
        .expect("Failed to create dataset CSV");
    writer
        .write_record([
            "Name",
            "Mass_g",
            "Year_clean",
            "Fall_simplified",
            "Status_simplified",
            "simplified_type",
            "pieces_numeric",
            "Latitude",
            "Longitude",
        ])
        .expect("Failed to write header");

    let n_rows = 600;
    let mut cluster_rows = Vec::new();
    for i in 0..n_rows {
        let (region_idx, (_, lat0, lon0)) = {
            let idx = (rng.next_u64() % REGIONS.len() as u64) as usize;
            (idx, REGIONS[idx])
        };
        let name = format!("MM {i:04}");
        let mass = rng.gauss(5.0, 1.6).exp().max(0.1);
        let year = 1800 + (rng.next_u64() % 225) as i64;
        let fall = rng.pick(&FALLS);
        let status = rng.pick(&STATUSES);
        let mtype = rng.pick(&TYPES);
        let pieces = 1 + (rng.next_u64() % 20) as i64;
        let lat = (lat0 + rng.gauss(0.0, 6.0)).clamp(-89.0, 89.0);
        let lon = (lon0 + rng.gauss(0.0, 9.0)).clamp(-179.0, 179.0);

        // Leave a handful of rows without coordinates or a year, the way the
        // real export does; the loader drops them.
        let (year_s, lat_s, lon_s) = if i % 97 == 0 {
            (String::new(), String::new(), String::new())
        } else {
            (format!("{year}.0"), format!("{lat:.5}"), format!("{lon:.5}"))
        };

        let mass_s = format!("{mass:.2}");
        let pieces_s = pieces.to_string();
        writer
            .write_record([
                name.as_str(),
                mass_s.as_str(),
                year_s.as_str(),
                fall,
                status,
                mtype,
                pieces_s.as_str(),
                lat_s.as_str(),
                lon_s.as_str(),
            ])
            .expect("Failed to write row");

        if !lat_s.is_empty() && cluster_rows.len() < 100 {
            cluster_rows.push(json!({
                "name": name,
                "latitude": lat,
                "longitude": lon,
                "cluster": region_idx,
            }));
        }
    }
    writer.flush().expect("Failed to flush dataset CSV");

    // ---- Model bundle JSON ----
    // Split on Year_clean (feature 2), then Mass_g (feature 4), into the
    // four regions. Regressors are linear with a tiny year term around the
    // region center so outputs stay on the map.
    let leaf = |class: usize| json!({ "kind": "leaf", "class": class });
    let split = |feature: usize, threshold: f64, left: serde_json::Value, right: serde_json::Value| {
        json!({ "kind": "split", "feature": feature, "threshold": threshold,
                "left": left, "right": right })
    };
    let tree = split(
        2,
        1920.0,
        split(4, 1000.0, leaf(0), leaf(1)),
        split(4, 1000.0, leaf(2), leaf(3)),
    );

    let regressor = |lat0: f64, lon0: f64| {
        json!({
            "lat": { "coef": [0.0, 0.0, 0.001, 0.0, 0.0], "intercept": lat0 - 0.001 * 1900.0 },
            "lon": { "coef": [0.0, 0.0, 0.002, 0.0, 0.0], "intercept": lon0 - 0.002 * 1900.0 },
        })
    };
    let reg_model: serde_json::Map<String, serde_json::Value> = REGIONS
        .iter()
        .map(|&(label, lat0, lon0)| (label.to_string(), regressor(lat0, lon0)))
        .collect();

    let bundle = json!({
        "model": {
            "classes": REGIONS.iter().map(|&(label, _, _)| label).collect::<Vec<_>>(),
            "tree": tree,
        },
        "reg_model": reg_model,
        "le_Status": { "classes": STATUSES },
        "le_Fall": { "classes": FALLS },
        "le_type": { "classes": TYPES },
        "features": [
            "Status_simplified",
            "Fall_simplified",
            "Year_clean",
            "simplified_type",
            "Mass_g",
        ],
        "kmeans": {
            "centroids": REGIONS.iter().map(|&(_, lat0, lon0)| [lat0, lon0]).collect::<Vec<_>>(),
        },
        "cluster_df": cluster_rows,
    });

    let text = serde_json::to_string_pretty(&bundle).expect("Failed to serialize bundle");
    std::fs::write("saved_steps.json", text).expect("Failed to write bundle");

    println!("Wrote {n_rows} meteorites to final_meteorite_data.csv and a demo bundle to saved_steps.json");
}
