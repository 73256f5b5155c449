//! Basket selection properties over random score sets.

use hobart::factors::ReversalScore;
use hobart::selection::{select_residual, select_reversal};
use hobart::{ResidualStrategyConfig, ReversalStrategyConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;
use std::collections::BTreeSet;

fn random_reversal(rng: &mut StdRng, n: usize) -> Vec<(String, ReversalScore)> {
    (0..n)
        .map(|i| {
            (
                format!("S{i:04}"),
                ReversalScore {
                    yearly_return: rng.gen_range(-0.5..1.0),
                    momentum: rng.gen_range(-0.05..0.08),
                },
            )
        })
        .collect()
}

#[rstest]
#[case(51)]
#[case(87)]
#[case(250)]
#[case(1000)]
fn test_reversal_pooling(#[case] n: usize) {
    let mut rng = StdRng::seed_from_u64(n as u64);
    let rules = ReversalStrategyConfig::default();

    for _ in 0..20 {
        let scores = random_reversal(&mut rng, n);
        let selection = select_reversal(scores.clone(), &rules);

        let mut ranked = scores.clone();
        ranked.sort_by(|a, b| b.1.yearly_return.total_cmp(&a.1.yearly_return));
        let pool = (n as f64 * rules.pool_fraction).floor() as usize;
        let top: BTreeSet<&str> = ranked[..pool].iter().map(|(s, _)| s.as_str()).collect();
        let bottom: BTreeSet<&str> = ranked[n - pool..].iter().map(|(s, _)| s.as_str()).collect();

        assert_eq!(selection.long.len(), 10);
        assert_eq!(selection.short.len(), 10);
        assert!(selection.long.iter().all(|s| top.contains(s.as_str())));
        assert!(selection.short.iter().all(|s| bottom.contains(s.as_str())));

        // Long holds the lowest-momentum winners: nothing left in the pool is lower
        let momentum = |symbol: &str| {
            scores
                .iter()
                .find(|(s, _)| s == symbol)
                .map(|(_, score)| score.momentum)
                .unwrap()
        };
        let worst_long = selection
            .long
            .iter()
            .map(|s| momentum(s.as_str()))
            .fold(f64::MIN, f64::max);
        assert!(
            top.iter()
                .filter(|s| !selection.long.iter().any(|l| l == *s))
                .all(|s| momentum(*s) >= worst_long)
        );
    }
}

#[rstest]
#[case(101)]
#[case(300)]
fn test_residual_disjoint_and_bounded(#[case] n: usize) {
    let mut rng = StdRng::seed_from_u64(n as u64);
    let rules = ResidualStrategyConfig::default();

    for _ in 0..20 {
        let scores: Vec<(String, f64)> = (0..n)
            .map(|i| (format!("S{i:04}"), rng.gen_range(0.0..0.01)))
            .collect();
        let selection = select_residual(scores.clone(), &rules);

        assert_eq!(selection.long.len(), 10);
        assert_eq!(selection.short.len(), 10);
        let long: BTreeSet<&String> = selection.long.iter().collect();
        assert!(selection.short.iter().all(|s| !long.contains(s)));

        let score = |symbol: &String| scores.iter().find(|(s, _)| s == symbol).unwrap().1;
        let lowest_long = selection.long.iter().map(score).fold(f64::MAX, f64::min);
        let highest_short = selection.short.iter().map(score).fold(f64::MIN, f64::max);
        assert!(lowest_long >= highest_short);
    }
}
