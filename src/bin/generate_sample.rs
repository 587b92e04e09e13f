//! Writes a synthetic hourly air-quality CSV with the station schema,
//! for trying the dashboard without the real export. Deterministic output.

use std::fmt::Write as _;

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
}

const WIND_DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

fn push_value(line: &mut String, rng: &mut SimpleRng, value: f64, missing_rate: f64) {
    if rng.next_f64() < missing_rate {
        line.push(',');
    } else {
        let _ = write!(line, ",{value:.2}");
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut csv = String::from(
        "year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,WSPM,station\n",
    );

    let mut rows = 0usize;
    for year in 2013..=2016 {
        for (month_idx, &days) in DAYS_IN_MONTH.iter().enumerate() {
            let month = month_idx as u32 + 1;
            // Seasonal temperature driver, coldest in January
            let season = -((month as f64 - 7.0) / 6.0 * std::f64::consts::PI).cos();

            for day in 1..=days {
                for hour in 0..24u32 {
                    let mut line = format!("{year},{month},{day},{hour}");

                    // Daily traffic cycle drives the pollutants
                    let rush =
                        1.0 + 0.6 * (((hour as f64 - 8.0) / 24.0 * std::f64::consts::TAU).cos());
                    let pm25 = (60.0 * rush + rng.gauss(0.0, 18.0)).max(1.0);
                    let pm10 = pm25 + (25.0 + rng.gauss(0.0, 10.0)).max(0.0);
                    let so2 = (15.0 * rush + rng.gauss(0.0, 5.0)).max(0.5);
                    let no2 = (45.0 * rush + rng.gauss(0.0, 12.0)).max(1.0);
                    // CO tracks PM so the correlation views have signal
                    let co = (pm25 * 12.0 + rng.gauss(0.0, 150.0)).max(100.0);
                    let o3 = (55.0 / rush + rng.gauss(0.0, 15.0)).max(1.0);
                    let temp = 13.0 + 14.0 * season + rng.gauss(0.0, 3.0);
                    let pres = 1013.0 - 8.0 * season + rng.gauss(0.0, 4.0);
                    let dewp = temp - 8.0 + rng.gauss(0.0, 2.0);
                    let rain = if rng.next_f64() < 0.05 {
                        rng.next_f64() * 6.0
                    } else {
                        0.0
                    };
                    let wspm = (rng.gauss(2.0, 1.2)).max(0.0);

                    // An occasional sensor spike for the outlier loop to chew on
                    let pm25 = if rng.next_f64() < 0.002 {
                        pm25 * 20.0
                    } else {
                        pm25
                    };

                    push_value(&mut line, &mut rng, pm25, 0.02);
                    push_value(&mut line, &mut rng, pm10, 0.02);
                    push_value(&mut line, &mut rng, so2, 0.02);
                    push_value(&mut line, &mut rng, no2, 0.02);
                    push_value(&mut line, &mut rng, co, 0.03);
                    push_value(&mut line, &mut rng, o3, 0.02);
                    push_value(&mut line, &mut rng, temp, 0.01);
                    push_value(&mut line, &mut rng, pres, 0.01);
                    push_value(&mut line, &mut rng, dewp, 0.01);
                    push_value(&mut line, &mut rng, rain, 0.01);

                    if rng.next_f64() < 0.02 {
                        line.push(',');
                    } else {
                        let wd = WIND_DIRECTIONS[(rng.next_u64() % 8) as usize];
                        let _ = write!(line, ",{wd}");
                    }
                    let _ = write!(line, ",{wspm:.1},Aotizhongxin\n");

                    csv.push_str(&line);
                    rows += 1;
                }
            }
        }
    }

    let output_path = "sample_air_quality.csv";
    std::fs::write(output_path, csv).expect("Failed to write sample CSV");
    println!("Wrote {rows} hourly rows to {output_path}");
}
