use job_motifs::{
    resolve_overlaps, Candidate, CandidateVerifier, ChannelSeries, Dataset, FinderConfig,
    MotifFinder, ReferenceProfile, Verdict,
};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

fn candidates_strategy() -> impl Strategy<Value = Vec<Candidate>> {
    prop::collection::vec((0usize..400, 1usize..60, 0.0f64..1e4, 0usize..3), 0..40).prop_map(
        |raw| {
            raw.into_iter()
                .map(|(start, len, energy, color)| Candidate {
                    start,
                    len,
                    energy,
                    job: format!("job-{color}"),
                    color,
                })
                .collect()
        },
    )
}

/// Positive, non-constant power-like signal.
fn series_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(50.0f64..150.0, 64..200)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn resolved_motifs_are_disjoint(candidates in candidates_strategy()) {
        let selected = resolve_overlaps(candidates);
        for (i, a) in selected.iter().enumerate() {
            for b in &selected[i + 1..] {
                prop_assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn rejected_candidates_lose_to_higher_energy(candidates in candidates_strategy()) {
        let selected = resolve_overlaps(candidates.clone());
        for c in &candidates {
            let kept = selected.iter().any(|r| r.start == c.start && r.len == c.len && r.job == c.job);
            if !kept {
                let blocked = candidates.iter().any(|other| {
                    other.energy >= c.energy
                        && other.start < c.end()
                        && c.start < other.end()
                        && selected.iter().any(|r| r.start == other.start && r.len == other.len && r.job == other.job)
                });
                prop_assert!(blocked, "{:?} was dropped without a higher-energy blocker", c);
            }
        }
    }

    #[test]
    fn acceptance_is_monotone_in_threshold(
        values in series_strategy(),
        start_frac in 0.0f64..0.5,
        len in 8usize..40,
        t_low in 0.0f64..0.5,
        t_gap in 0.0f64..0.5,
    ) {
        let start = ((values.len() - len) as f64 * start_frac) as usize;
        let reference = &values[start..start + len];
        let job = "job";
        let low = ReferenceProfile::new(reference, t_low, job);
        let high = ReferenceProfile::new(reference, t_low + t_gap, job);
        prop_assume!(low.is_ok() && high.is_ok());
        let low = CandidateVerifier::new(&values, low.unwrap(), job, 0);
        let high = CandidateVerifier::new(&values, high.unwrap(), job, 0);

        for offset in 0..values.len() {
            if matches!(low.evaluate(offset), Verdict::Accepted(_)) {
                prop_assert!(
                    matches!(high.evaluate(offset), Verdict::Accepted(_)),
                    "offset {} accepted at {} but not at {}", offset, t_low, t_low + t_gap
                );
            }
        }
    }

    #[test]
    fn detection_is_deterministic(values in series_strategy(), len in 8usize..32) {
        let dataset = Dataset::new().with_channel("P1", ChannelSeries::new(values.clone()));
        let every_offset = |_: &[f64], series: &[f64]| (0..series.len()).collect::<Vec<usize>>();
        let mut finder = MotifFinder::with_search(dataset, every_offset, FinderConfig::new());
        finder.add_pattern("P1", 0, len, 0.2, "a").unwrap();
        finder.add_pattern("P1", values.len() - len, values.len(), 0.2, "b").unwrap();

        let first = finder.find_motifs().unwrap();
        let second = finder.find_motifs().unwrap();
        prop_assert_eq!(&first, &second);

        let records = first.channel("P1");
        for (i, a) in records.iter().enumerate() {
            prop_assert!(a.end() <= values.len());
            for b in &records[i + 1..] {
                prop_assert!(!a.overlaps(b));
            }
        }
    }
}
