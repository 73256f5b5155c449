//! Demonstration of the Hobart factor registry
//!
//! Lists every available factor, groups them by input frequency and scores
//! a sample price window.
//!
//! Run with: cargo run --example factor_registry_demo -p hobart-factors

use hobart_factors::{
    DataFrequency, FactorInfo, ReversalMomentumFactor, available_factors, factors_by_frequency,
    get_factor_info,
};

fn main() {
    println!("Hobart Factor Registry Demo");
    println!("===========================\n");

    let all_factors = available_factors();
    println!("Total factors available: {}\n", all_factors.len());

    for frequency in [DataFrequency::Monthly, DataFrequency::Daily] {
        println!("{} factors:", frequency);
        for info in factors_by_frequency(frequency) {
            print_factor_details(&info);
        }
        println!();
    }

    if let Some(info) = get_factor_info("reversal_momentum") {
        println!("Scoring a sample window with '{}':", info.name);
        let prices = [
            110.0, 108.0, 107.0, 105.0, 104.0, 103.0, 101.0, 100.0, 99.0, 98.0, 97.0, 96.0, 95.0,
        ];
        match ReversalMomentumFactor::default().score_prices(&prices) {
            Ok(score) => {
                println!("  yearly return: {:.4}", score.yearly_return);
                println!("  momentum:      {:.6}", score.momentum);
            }
            Err(e) => println!("  failed: {}", e),
        }
    }
}

fn print_factor_details(info: &FactorInfo) {
    println!("  {:20} [{}] {}", info.name, info.category, info.description);
    println!("  {:20} lookback {} | inputs: {}", "", info.lookback, info.required_inputs.join(", "));
}
