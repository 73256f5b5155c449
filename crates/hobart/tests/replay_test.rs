//! End-to-end replays over synthetic panels.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use hobart::data::{CoarseRecord, MarketIndex, PricePanel};
use hobart::factors::ResidualMomentumConfig;
use hobart::{
    HobartConfig, Replay, ReplayOutcome, ResidualMomentumStrategy, ResidualStrategyConfig,
    ReversalMomentumStrategy, ReversalStrategyConfig, Strategy, StrategyError, StrategyKind,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

fn weekdays(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
        day = day + Days::new(1);
    }
    days
}

/// Random-walk prices for `symbols` instruments, always above 10.
fn random_panel(symbols: usize, days: &[NaiveDate], seed: u64) -> Vec<CoarseRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut prices: Vec<f64> = (0..symbols).map(|_| rng.gen_range(20.0..80.0)).collect();
    let drifts: Vec<f64> = (0..symbols).map(|_| rng.gen_range(-0.002..0.002)).collect();

    let mut records = Vec::with_capacity(symbols * days.len());
    for day in days {
        for (i, price) in prices.iter_mut().enumerate() {
            let shock: f64 = rng.gen_range(-0.02..0.02);
            *price = (*price * (1.0 + drifts[i] + shock)).max(10.0);
            records.push(CoarseRecord {
                date: *day,
                symbol: format!("S{i:03}"),
                adjusted_close: *price,
                dollar_volume: 5e7,
                has_fundamentals: true,
            });
        }
    }
    records
}

fn assert_well_formed(outcome: &ReplayOutcome, basket_size: usize) {
    let months: BTreeSet<_> = outcome.cycles.iter().map(|c| c.outcome.month).collect();
    assert_eq!(months.len(), outcome.cycles.len(), "one selection per month");

    for cycle in &outcome.cycles {
        let selection = cycle.selection();
        assert!(selection.long.len() <= basket_size);
        assert!(selection.short.len() <= basket_size);
        assert!(selection.long.iter().all(|s| !selection.short.contains(s)));
        assert_eq!(cycle.plan.is_some(), selection.is_tradable());
    }
}

#[test]
fn test_reversal_replay() {
    let days = weekdays(
        NaiveDate::from_ymd_opt(2016, 1, 4).unwrap(),
        NaiveDate::from_ymd_opt(2017, 2, 28).unwrap(),
    );
    let replay = Replay::from_records(random_panel(70, &days, 7), None);
    let mut strategy = ReversalMomentumStrategy::from_config(&HobartConfig::default()).unwrap();

    let mut seen = 0;
    let outcome = replay
        .run_with_progress(&mut strategy, |done, _| seen = done)
        .unwrap();

    assert_eq!(seen, days.len());
    assert_eq!(outcome.days, days.len());
    // A selection on the second trading day of each of the 14 months
    assert_eq!(outcome.cycles.len(), 14);
    assert!(outcome.cycles[..12].iter().all(|c| c.outcome.ranked == 0));
    assert_eq!(outcome.cycles[12].outcome.ranked, 70);
    assert_eq!(outcome.rebalances(), 2);
    assert_well_formed(&outcome, 10);

    // Held set is exactly the last traded baskets
    let last = outcome.cycles.last().unwrap().selection();
    let expected: BTreeSet<String> = last.symbols().map(str::to_string).collect();
    assert_eq!(outcome.held, expected);
    assert_eq!(strategy.tracked(), 70);

    let exports = outcome.to_exports();
    assert_eq!(exports.len(), 14);
    assert!(exports[13].traded());
    assert_eq!(outcome.summary().traded_cycles(), 2);
}

#[test]
fn test_reversal_degenerate_universe() {
    let days = weekdays(
        NaiveDate::from_ymd_opt(2016, 1, 4).unwrap(),
        NaiveDate::from_ymd_opt(2017, 2, 28).unwrap(),
    );
    let replay = Replay::from_records(random_panel(40, &days, 11), None);
    let mut strategy = ReversalMomentumStrategy::from_config(&HobartConfig::default()).unwrap();
    let outcome = replay.run(&mut strategy).unwrap();

    assert_eq!(outcome.cycles[13].outcome.ranked, 40);
    assert!(outcome.cycles.iter().all(|c| c.selection().is_empty()));
    assert_eq!(outcome.rebalances(), 0);
    assert!(outcome.held.is_empty());
}

fn residual_setup(symbols: usize, days: &[NaiveDate]) -> (Vec<CoarseRecord>, MarketIndex) {
    let mut rng = StdRng::seed_from_u64(42);
    let mut level = 1000.0;
    let mut market_returns = Vec::with_capacity(days.len());
    let mut closes = Vec::with_capacity(days.len() + 5);

    // Five closes before the panel starts, to warm the market window
    for offset in (1..=5).rev() {
        let day = days[0] - Days::new(offset * 7);
        closes.push((day, level));
        level *= 1.0 + rng.gen_range(-0.01..0.01);
    }
    for day in days {
        let r: f64 = rng.gen_range(-0.01..0.01);
        level *= 1.0 + r;
        closes.push((*day, level));
        market_returns.push(r);
    }

    let betas: Vec<f64> = (0..symbols).map(|_| rng.gen_range(0.5..1.5)).collect();
    let noise: Vec<f64> = (0..symbols).map(|i| 0.001 * (i + 1) as f64).collect();
    let mut prices = vec![50.0; symbols];
    let mut records = Vec::new();
    for (t, day) in days.iter().enumerate() {
        for i in 0..symbols {
            let e: f64 = rng.gen_range(-1.0..1.0) * noise[i];
            prices[i] *= 1.0 + betas[i] * market_returns[t] + e;
            records.push(CoarseRecord {
                date: *day,
                symbol: format!("R{i:02}"),
                adjusted_close: if i == 0 { 3.0 } else { prices[i] },
                dollar_volume: 5e7,
                has_fundamentals: true,
            });
        }
    }
    (records, MarketIndex::from_closes(closes))
}

fn residual_config() -> ResidualStrategyConfig {
    ResidualStrategyConfig {
        factor: ResidualMomentumConfig {
            window: 30,
            regression_window: 10,
            ..Default::default()
        },
        min_universe: 20,
        basket_size: 5,
        min_price: 5.0,
    }
}

#[test]
fn test_residual_replay() {
    let days = weekdays(
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2018, 4, 30).unwrap(),
    );
    let (records, market) = residual_setup(30, &days);
    let replay = Replay::from_records(records, Some(market));
    let mut strategy =
        ResidualMomentumStrategy::new(residual_config(), Default::default()).unwrap();

    let outcome = replay.run(&mut strategy).unwrap();
    assert_well_formed(&outcome, 5);
    assert_eq!(outcome.cycles.len(), 4);

    // January and February are warm-up: fewer than 30 returns per instrument
    assert_eq!(outcome.cycles[0].outcome.ranked, 0);
    assert!(outcome.rebalances() >= 1);

    let last = outcome.cycles.last().unwrap();
    // R00 trades below the price floor
    assert_eq!(last.outcome.ranked, 29);
    assert!(!last.selection().contains("R00"));
    assert_eq!(last.selection().long.len(), 5);
    assert_eq!(last.selection().short.len(), 5);
}

#[test]
fn test_residual_needs_market() {
    let days = weekdays(
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2018, 1, 31).unwrap(),
    );
    let replay = Replay::from_records(random_panel(5, &days, 1), None);
    let mut strategy = StrategyKind::Residual
        .build(&HobartConfig::default())
        .unwrap();
    assert!(matches!(
        replay.run(strategy.as_mut()),
        Err(StrategyError::MissingMarket)
    ));
}

#[test]
fn test_replay_from_csv_panel() {
    let dir = std::env::temp_dir().join(format!("hobart-replay-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("panel.csv");

    // Four symbols with constant monthly growth of 1% to 4%, over four months
    let mut csv = String::from("date,symbol,adjusted_close,volume\n");
    let days = weekdays(
        NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2019, 4, 30).unwrap(),
    );
    for day in &days {
        let month = day.month0() as i32;
        for (i, symbol) in ["AAA", "BBB", "CCC", "DDD"].iter().enumerate() {
            let price = 20.0 * (1.0 + 0.01 * (i + 1) as f64).powi(month);
            csv.push_str(&format!("{day},{symbol},{price},1000000\n"));
        }
    }
    std::fs::write(&path, csv).unwrap();

    let panel = PricePanel::from_csv(&path).unwrap();
    let replay = Replay::new(&panel, None).unwrap();
    assert_eq!(replay.len(), days.len());

    let rules = ReversalStrategyConfig {
        factor: hobart::factors::ReversalMomentumConfig { lookback_months: 3 },
        min_universe: 3,
        pool_fraction: 0.5,
        basket_size: 1,
        min_price: Some(5.0),
    };
    let mut strategy = ReversalMomentumStrategy::new(rules, Default::default()).unwrap();
    let outcome = replay.run(&mut strategy).unwrap();

    // Third and fourth months have three month-start prices
    assert_eq!(outcome.rebalances(), 2);
    let last = outcome.cycles.last().unwrap().selection();
    // Winners CCC, DDD: lowest momentum CCC. Losers AAA, BBB: highest momentum BBB.
    assert_eq!(last.long, vec!["CCC"]);
    assert_eq!(last.short, vec!["BBB"]);

    std::fs::remove_dir_all(&dir).unwrap();
}

fn single(symbol: &str, date: NaiveDate, price: f64) -> CoarseRecord {
    CoarseRecord {
        date,
        symbol: symbol.to_string(),
        adjusted_close: price,
        dollar_volume: 5e7,
        has_fundamentals: true,
    }
}

fn small_reversal() -> ReversalMomentumStrategy {
    let rules = ReversalStrategyConfig {
        min_universe: 3,
        basket_size: 1,
        ..Default::default()
    };
    ReversalMomentumStrategy::new(rules, Default::default()).unwrap()
}

#[test]
fn test_duplicate_records_keep_last() {
    let d = |day| NaiveDate::from_ymd_opt(2019, 1, day).unwrap();
    let replay = Replay::from_records(
        vec![
            single("AAA", d(2), 10.0),
            single("AAA", d(3), 11.0),
            single("AAA", d(3), 12.0),
        ],
        None,
    );
    assert_eq!(replay.len(), 2);

    let mut strategy = small_reversal();
    let outcome = replay.run(&mut strategy).unwrap();

    // One month-start observation, taken from the last of the duplicates
    assert_eq!(outcome.cycles.len(), 1);
    assert_eq!(outcome.cycles[0].outcome.eligible, 1);
    let window = strategy.window("AAA").unwrap();
    assert_eq!(window.len(), 1);
    assert_eq!(window.latest(), Some(12.0));
}

#[test]
fn test_duplicate_csv_rows_rejected() {
    let dir = std::env::temp_dir().join(format!("hobart-duplicates-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("panel.csv");
    std::fs::write(
        &path,
        "date,symbol,adjusted_close,volume\n\
         2019-01-02,AAA,10.0,1000000\n\
         2019-01-03,AAA,11.0,1000000\n\
         2019-01-03,AAA,12.0,1000000\n",
    )
    .unwrap();

    let panel = PricePanel::from_csv(&path).unwrap();
    assert!(matches!(
        Replay::new(&panel, None),
        Err(StrategyError::Data(hobart::data::DataError::Parse(_)))
    ));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_mid_month_start_waits_for_next_month() {
    let days = weekdays(
        NaiveDate::from_ymd_opt(2019, 1, 17).unwrap(),
        NaiveDate::from_ymd_opt(2019, 2, 28).unwrap(),
    );
    let records: Vec<CoarseRecord> = days
        .iter()
        .enumerate()
        .map(|(t, day)| single("AAA", *day, 10.0 + t as f64))
        .collect();
    let replay = Replay::from_records(records, None);
    let mut strategy = small_reversal();
    let outcome = replay.run(&mut strategy).unwrap();

    // January was joined mid-month: the first observation is February's
    assert_eq!(outcome.cycles.len(), 1);
    assert_eq!(outcome.cycles[0].outcome.month.to_string(), "2019-02");
    assert_eq!(strategy.window("AAA").unwrap().len(), 1);
}
