//! Result rendering for the terminal

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use satlink_core::engine::LinkBudgetResult;
use satlink_core::params::LinkConfiguration;
use satlink_core::sweep::{AltitudeSweepResult, PlotBounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns followed by a summary
    Table,
    /// One header line then one row per sample
    Csv,
    /// Single JSON document
    Json,
}

#[derive(Serialize)]
struct SweepReport<'a> {
    #[serde(flatten)]
    result: &'a AltitudeSweepResult,
    closure_altitude_km: Option<f64>,
    plot: &'a PlotBounds,
}

pub fn print_sweep(
    result: &AltitudeSweepResult,
    plot: &PlotBounds,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let report = SweepReport {
                result,
                closure_altitude_km: result.closure_altitude_km(),
                plot,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Csv => {
            println!("altitude_km,slant_range_m,snr_db,margin_db");
            for s in result.samples() {
                println!(
                    "{},{},{},{}",
                    s.altitude_km, s.slant_range_m, s.snr_db, s.margin_db
                );
            }
        }
        OutputFormat::Table => print_sweep_table(result),
    }
    Ok(())
}

fn print_sweep_table(result: &AltitudeSweepResult) {
    println!(
        "{:>14} {:>16} {:>10} {:>10}",
        "altitude (km)", "slant range (km)", "SNR (dB)", "margin (dB)"
    );
    println!("{}", "-".repeat(53));
    for s in result.samples() {
        println!(
            "{:>14.1} {:>16.1} {:>10.2} {:>10.2}",
            s.altitude_km,
            s.slant_range_m / 1000.0,
            s.snr_db,
            s.margin_db
        );
    }
    println!("{}", "-".repeat(53));

    println!("Direction:  {}", result.direction);
    println!("Samples:    {}", result.len());
    println!("Failures:   {}", result.failure_count());
    for failure in result.failures() {
        println!("  #{} at {} km: {}", failure.index, failure.altitude_km, failure.error);
    }
    match result.closure_altitude_km() {
        Some(h) => println!("Closes up to ~{h:.0} km"),
        None => println!("Link does not close at any sampled altitude"),
    }
    println!("Thresholds:");
    for line in result.threshold_lines() {
        println!("  {:>6.1} dB  {}", line.snr_db, line.label);
    }
}

pub fn print_budget(config: &LinkConfiguration, altitude_km: f64, budget: &LinkBudgetResult) {
    let params = config.params();
    let noise = config.noise();

    println!("Link budget ({}) at {altitude_km} km", params.direction);
    println!("{}", "-".repeat(44));
    println!("{:<28} {:>12.3} km", "Slant range", budget.slant_range_m / 1000.0);
    println!("{:<28} {:>12.4} m", "Wavelength", budget.wavelength_m);
    println!("{:<28} {:>12.2} dBm", "Tx power", params.tx_power_dbm);
    println!("{:<28} {:>12.2} dBi", "Tx antenna gain", params.tx_antenna_gain_dbi);
    println!("{:<28} {:>12.2} dBm", "EIRP", budget.eirp_dbm);
    println!("{:<28} {:>12.2} dB", "Free-space path loss", budget.fspl_db);
    for (term, db) in &config.composite_loss().terms {
        println!("  {:<26} {:>12.4} dB", term.name(), db);
    }
    println!("{:<28} {:>12.4} dB", "Composite extra loss", budget.extra_loss_db);
    println!("{:<28} {:>12.2} dBi", "Rx antenna gain", params.rx_antenna_gain_dbi);
    println!("{:<28} {:>12.2} dBm", "Received power", budget.received_power_dbm);
    println!("{:<28} {:>12.1} K", "System noise temperature", noise.total_k);
    println!("{:<28} {:>12.2} dBm", "Noise floor", budget.noise_floor_dbm);
    println!("{}", "-".repeat(44));
    println!("{:<28} {:>12.2} dB", "SNR", budget.snr_db);
    println!("{:<28} {:>12.2} dB-Hz", "C/N0", budget.cn0_dbhz);
    println!(
        "{:<28} {:>12.2} dB ({})",
        "Margin",
        budget.margin_db,
        if budget.closes() { "closes" } else { "does not close" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use satlink_core::sweep::AltitudeSampling;
    use satlink_core::LinkBudgetEngine;

    #[test]
    fn test_json_report_fields() {
        let engine = LinkBudgetEngine::new(LinkConfiguration::downlink().unwrap());
        let result = engine
            .sweep(&AltitudeSampling::linspace(400.0, 1000.0, 3).unwrap())
            .unwrap();
        let plot = PlotBounds::default();
        let report = SweepReport {
            result: &result,
            closure_altitude_km: result.closure_altitude_km(),
            plot: &plot,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["direction"], "downlink");
        assert_eq!(value["samples"].as_array().unwrap().len(), 3);
        assert_eq!(value["failures"].as_array().unwrap().len(), 0);
        assert_eq!(value["plot"]["snr_max_db"], 60.0);
    }
}
