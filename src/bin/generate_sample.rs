use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const LIFTERS: usize = 5000;
const OUTPUT_PATH: &str = "lift_data.parquet";

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Round to the 2.5 kg plate increment.
fn plates(kg: f64) -> f64 {
    (kg / 2.5).round() * 2.5
}

fn weight_class(sex: &str, bodyweight: f64) -> String {
    let classes: &[f64] = if sex == "F" {
        &[47.0, 52.0, 57.0, 63.0, 69.0, 76.0, 84.0]
    } else {
        &[59.0, 66.0, 74.0, 83.0, 93.0, 105.0, 120.0]
    };
    match classes.iter().find(|&&c| bodyweight <= c) {
        Some(c) => format!("{c}"),
        None => format!("{}+", classes[classes.len() - 1]),
    }
}

fn age_class(age: f64) -> &'static str {
    match age as u32 {
        0..=17 => "16-17",
        18..=19 => "18-19",
        20..=23 => "20-23",
        24..=34 => "24-34",
        35..=39 => "35-39",
        40..=44 => "40-44",
        45..=49 => "45-49",
        _ => "50-54",
    }
}

fn birth_year_class(age: f64) -> &'static str {
    match age as u32 {
        0..=18 => "14-18",
        19..=23 => "19-23",
        24..=39 => "24-39",
        40..=49 => "40-49",
        _ => "50-59",
    }
}

#[derive(Default)]
struct Columns {
    name: Vec<String>,
    sex: Vec<String>,
    event: Vec<String>,
    equipment: Vec<String>,
    age: Vec<f64>,
    age_class: Vec<String>,
    birth_year_class: Vec<String>,
    bodyweight: Vec<f64>,
    weight_class: Vec<String>,
    squat: Vec<Option<f64>>,
    bench: Vec<Option<f64>>,
    deadlift: Vec<Option<f64>>,
    total: Vec<Option<f64>>,
    federation: Vec<String>,
    date: Vec<String>,
    sanctioned: Vec<String>,
    max_lift: Vec<String>,
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let mut cols = Columns::default();

    for i in 0..LIFTERS {
        let sex = rng.pick(&["M", "M", "F"]);
        let equipment = rng.pick(&["Raw", "Raw", "Wraps", "Single-ply", "Multi-ply"]);
        let age = rng.gauss(29.0, 8.0).clamp(16.0, 58.0).floor();
        let (bw_mean, strength) = if sex == "F" { (66.0, 0.62) } else { (88.0, 1.0) };
        let bodyweight = (rng.gauss(bw_mean, 12.0).max(40.0) * 10.0).round() / 10.0;
        let gear = if equipment == "Raw" { 1.0 } else { 1.12 };

        // A bombed lift is recorded as a missing best result.
        let mut best = |mean: f64, sd: f64| -> Option<f64> {
            if rng.next_f64() < 0.03 {
                None
            } else {
                Some(plates(rng.gauss(mean * strength * gear, sd).max(20.0)))
            }
        };
        let squat = best(190.0, 35.0);
        let bench = best(130.0, 25.0);
        let deadlift = best(225.0, 40.0);
        let total = match (squat, bench, deadlift) {
            (Some(s), Some(b), Some(d)) => Some(s + b + d),
            _ => None,
        };

        cols.name.push(format!("Lifter {i:05}"));
        cols.sex.push(sex.to_string());
        cols.event.push("SBD".to_string());
        cols.equipment.push(equipment.to_string());
        cols.age.push(age);
        cols.age_class.push(age_class(age).to_string());
        cols.birth_year_class.push(birth_year_class(age).to_string());
        cols.bodyweight.push(bodyweight);
        cols.weight_class.push(weight_class(sex, bodyweight));
        cols.squat.push(squat);
        cols.bench.push(bench);
        cols.deadlift.push(deadlift);
        cols.total.push(total);
        cols.federation.push(rng.pick(&["IPF", "USAPL", "WRPF", "GPC"]).to_string());
        cols.date.push(format!("2023-{:02}-{:02}", 1 + i % 12, 1 + i % 28));
        cols.sanctioned.push(rng.pick(&["Yes", "Yes", "No"]).to_string());
        cols.max_lift.push(rng.pick(&["Bench", "Squat", "Deadlift"]).to_string());
    }

    cols
}

fn text(values: &[String]) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(values))
}

fn number(values: impl Into<Float64Array>) -> ArrayRef {
    Arc::new(values.into())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);
    let cols = generate(&mut rng);

    let fields: Vec<(&str, DataType, bool, ArrayRef)> = vec![
        ("Name", DataType::Utf8, false, text(&cols.name)),
        ("Sex", DataType::Utf8, false, text(&cols.sex)),
        ("Event", DataType::Utf8, false, text(&cols.event)),
        ("Equipment", DataType::Utf8, false, text(&cols.equipment)),
        ("Age", DataType::Float64, false, number(cols.age)),
        ("AgeClass", DataType::Utf8, false, text(&cols.age_class)),
        ("BirthYearClass", DataType::Utf8, false, text(&cols.birth_year_class)),
        ("BodyweightKg", DataType::Float64, false, number(cols.bodyweight)),
        ("WeightClassKg", DataType::Utf8, false, text(&cols.weight_class)),
        ("Best3SquatKg", DataType::Float64, true, number(cols.squat)),
        ("Best3BenchKg", DataType::Float64, true, number(cols.bench)),
        ("Best3DeadliftKg", DataType::Float64, true, number(cols.deadlift)),
        ("TotalKg", DataType::Float64, true, number(cols.total)),
        ("Federation", DataType::Utf8, false, text(&cols.federation)),
        ("Date", DataType::Utf8, false, text(&cols.date)),
        ("Sanctioned", DataType::Utf8, false, text(&cols.sanctioned)),
        ("MaxLift", DataType::Utf8, false, text(&cols.max_lift)),
    ];

    let schema = Arc::new(Schema::new(
        fields
            .iter()
            .map(|(name, ty, nullable, _)| Field::new(*name, ty.clone(), *nullable))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = fields.into_iter().map(|(_, _, _, array)| array).collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(OUTPUT_PATH).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;

    log::info!("Wrote {LIFTERS} results to {OUTPUT_PATH}");
    println!("Wrote {LIFTERS} lift results to {OUTPUT_PATH}");
    Ok(())
}
