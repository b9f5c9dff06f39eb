//! End-to-end job detection on a two-channel recording.
//!
//! Registers reference jobs, runs detection, and prints the disjoint labels
//! per channel together with the shared color map.
//!
//! Run with: RUST_LOG=debug cargo run --release --example job_detection

use job_motifs::{ChannelSeries, Dataset, FinderConfig, MotifFinder, ResultOrder};

fn job(len: usize, level: f64, ripple: f64) -> Vec<f64> {
    (0..len)
        .map(|j| {
            let ramp = (j as f64 / (len as f64 / 8.0)).min(1.0);
            level * ramp + ripple * (j as f64 * 0.6).sin()
        })
        .collect()
}

fn recording(n: usize, jobs: &[(usize, &[f64])]) -> Vec<f64> {
    let mut ts: Vec<f64> = (0..n)
        .map(|i| 250.0 + ((i as f64 * 3.7).sin() * (i as f64 * 1.3).cos()) * 10.0)
        .collect();
    for &(start, shape) in jobs {
        for (v, s) in ts[start..].iter_mut().zip(shape) {
            *v += s;
        }
    }
    ts
}

fn main() -> job_motifs::Result<()> {
    env_logger::init();

    let press = job(80, 1500.0, 120.0);
    let mill = job(150, 700.0, 60.0);

    let p1 = recording(
        1500,
        &[(100, &press[..]), (300, &mill[..]), (600, &press[..]), (900, &press[..]), (1200, &mill[..])],
    );
    let p2 = recording(1000, &[(50, &mill[..]), (400, &mill[..]), (700, &press[..])]);

    let dataset = Dataset::new()
        .with_channel("P1", ChannelSeries::new(p1))
        .with_channel("P2", ChannelSeries::new(p2));

    let config = FinderConfig::new().with_order(ResultOrder::Start);
    let mut finder = MotifFinder::with_config(dataset, config);
    finder.add_patterns_json(
        r#"[
            {"channel": "P1", "start": 100, "end": 180, "threshold": 0.1, "job": "press"},
            {"channel": "P1", "start": 300, "end": 450, "threshold": 0.1, "job": "mill"},
            {"channel": "P2", "start": 50, "end": 200, "threshold": 0.1, "job": "mill"}
        ]"#,
    )?;

    let results = finder.find_motifs()?;

    println!("Color map:");
    for (label, idx) in results.color_map.iter() {
        println!("  {idx}: {label}");
    }
    for (channel, records) in results.iter() {
        println!("\n{channel}: {} motifs", records.len());
        for r in records {
            println!("  [{:>5}, {:>5})  {} (color {})", r.start, r.end(), r.job, r.color);
        }
    }
    for s in &results.skipped {
        println!("skipped {} #{} on {}: {:?}", s.job, s.pattern_index, s.channel, s.reason);
    }

    Ok(())
}
