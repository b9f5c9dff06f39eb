//! Raw similarity search on a single power channel.
//!
//! Shows the MASS distance profile and the matches proposed for a reference
//! job cycle before any statistical verification happens.
//!
//! Run with: cargo run --release --example mass_matching

use job_motifs::{find_matches, mass, MatchOptions};

fn main() {
    // Base load with small ripple, four press cycles of 60 samples.
    let n = 1200;
    let mut ts: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            400.0 + ((t * 7.1).sin() * (t * 11.3).cos()) * 15.0
        })
        .collect();
    let starts = [100, 400, 700, 1000];
    for &s in &starts {
        for j in 0..60 {
            let ramp = (j as f64 / 10.0).min(1.0);
            ts[s + j] += 1200.0 * ramp + 80.0 * (j as f64 * 0.5).sin();
        }
    }

    let reference = &ts[100..160];
    let profile = mass(reference, &ts);

    println!("MASS on a power channel");
    println!("=======================");
    println!("Series length: {n}, reference length: {}", reference.len());
    println!("Distance profile length: {}", profile.len());

    let matches = find_matches(reference, &ts, &MatchOptions::default());
    println!("\nDefault threshold: {} raw matches", matches.len());
    for m in &matches {
        let is_job = starts.iter().any(|&s| m.index.abs_diff(s) < 5);
        let label = if is_job { "job" } else { "other" };
        println!("  offset {:>4}  distance {:.4}  ({label})", m.index, m.distance);
    }

    let strict = MatchOptions {
        max_distance: Some(1.0),
        ..MatchOptions::default()
    };
    println!(
        "\nmax_distance = 1.0: {} raw matches",
        find_matches(reference, &ts, &strict).len()
    );
}
