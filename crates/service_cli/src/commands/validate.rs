//! Validate command implementation
//!
//! Runs the benchmark table of European calls through the finite-difference
//! engine and compares every price with the closed form.

use std::io::Write;
use std::path::Path;

use pricer_models::analytical::BlackScholes;
use pricer_models::instruments::VanillaPayoff;
use pricer_pde::{PdeConfig, PdeEngine, ThetaScheme};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{CliConfig, OutputFormat};
use crate::{CliError, Result};

/// Space nodes used by every benchmark case.
pub const VALIDATION_SPACE_STEPS: usize = 250;

/// Time steps used by every benchmark case.
pub const VALIDATION_TIME_STEPS: usize = 2500;

/// One benchmark scenario: (S0, K, T, r, σ).
pub type Case = (f64, f64, f64, f64, f64);

/// The benchmark scenarios, all priced as calls.
pub const CASES: [Case; 20] = [
    (100.0, 100.0, 1.0, 0.05, 0.2),
    (80.0, 100.0, 1.0, 0.05, 0.2),
    (120.0, 100.0, 1.0, 0.05, 0.2),
    (100.0, 90.0, 1.0, 0.05, 0.2),
    (100.0, 110.0, 1.0, 0.05, 0.2),
    (100.0, 100.0, 0.5, 0.05, 0.2),
    (100.0, 100.0, 2.0, 0.05, 0.2),
    (100.0, 100.0, 1.0, 0.01, 0.2),
    (100.0, 100.0, 1.0, 0.1, 0.2),
    (100.0, 100.0, 1.0, 0.05, 0.1),
    (100.0, 100.0, 1.0, 0.05, 0.4),
    (95.0, 100.0, 1.0, 0.03, 0.25),
    (105.0, 100.0, 1.0, 0.03, 0.25),
    (90.0, 100.0, 2.0, 0.02, 0.3),
    (110.0, 100.0, 2.0, 0.02, 0.3),
    (70.0, 100.0, 1.5, 0.04, 0.35),
    (130.0, 100.0, 1.5, 0.04, 0.35),
    (150.0, 100.0, 0.75, 0.06, 0.18),
    (100.0, 120.0, 1.5, 0.04, 0.35),
    (100.0, 80.0, 1.5, 0.04, 0.35),
];

/// One row of the validation report.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationRow {
    /// 1-based case number
    pub id: usize,
    /// Spot price
    #[serde(rename = "S0")]
    pub spot: f64,
    /// Strike
    #[serde(rename = "K")]
    pub strike: f64,
    /// Maturity
    #[serde(rename = "T")]
    pub maturity: f64,
    /// Risk-free rate
    #[serde(rename = "r")]
    pub rate: f64,
    /// Volatility
    #[serde(rename = "sigma")]
    pub volatility: f64,
    /// Closed-form price
    #[serde(rename = "price_BS")]
    pub price_bs: f64,
    /// Finite-difference price
    #[serde(rename = "price_PDE")]
    pub price_pde: f64,
    /// Absolute difference
    pub abs_error: f64,
}

/// Run the validate command
pub fn run(
    format: OutputFormat,
    tolerance: Option<f64>,
    output: Option<&Path>,
    settings: &CliConfig,
) -> Result<()> {
    let tolerance = tolerance.unwrap_or(settings.validation.tolerance);
    info!("Running {} validation cases...", CASES.len());

    let rows = run_cases(&CASES)?;

    let rendered = render(&rows, format, settings.output.precision)?;
    match output {
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            writeln!(file, "{}", rendered)?;
            info!("Wrote validation report to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    let failed = rows.iter().filter(|row| row.abs_error > tolerance).count();
    let max_error = rows.iter().map(|row| row.abs_error).fold(0.0, f64::max);
    info!(max_error, tolerance, "Validation complete");

    if failed > 0 {
        warn!(failed, "Validation cases exceeded tolerance");
        return Err(CliError::ValidationFailed {
            failed,
            total: rows.len(),
            tolerance,
        });
    }
    Ok(())
}

/// Prices every case on its own engine, in parallel.
pub fn run_cases(cases: &[Case]) -> Result<Vec<ValidationRow>> {
    cases
        .par_iter()
        .enumerate()
        .map(|(index, &case)| run_case(index + 1, case))
        .collect()
}

fn run_case(id: usize, (spot, strike, maturity, rate, volatility): Case) -> Result<ValidationRow> {
    let config = PdeConfig::builder()
        .maturity(maturity)
        .rate(rate)
        .volatility(volatility)
        .s_max((5.0 * strike).max(300.0))
        .scheme(ThetaScheme::CrankNicolson)
        .space_steps(VALIDATION_SPACE_STEPS)
        .time_steps(VALIDATION_TIME_STEPS)
        .build()?;

    let payoff = VanillaPayoff::call(strike)?;
    let price_pde = PdeEngine::new(config).solve(&payoff, spot)?.price;
    let price_bs = BlackScholes::new(spot, rate, volatility)?.price_call(strike, maturity);

    Ok(ValidationRow {
        id,
        spot,
        strike,
        maturity,
        rate,
        volatility,
        price_bs,
        price_pde,
        abs_error: (price_pde - price_bs).abs(),
    })
}

/// Renders the report rows.
pub fn render(rows: &[ValidationRow], format: OutputFormat, precision: usize) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for row in rows {
                writer.serialize(row)?;
            }
            let bytes = writer
                .into_inner()
                .map_err(|e| CliError::Io(e.into_error()))?;
            Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
        }
        OutputFormat::Table => {
            let mut out = format!(
                "{:>3} {:>7} {:>7} {:>5} {:>6} {:>6} {:>12} {:>12} {:>12}\n",
                "id", "S0", "K", "T", "r", "sigma", "price_BS", "price_PDE", "abs_error"
            );
            for row in rows {
                out.push_str(&format!(
                    "{:>3} {:>7.2} {:>7.2} {:>5.2} {:>6.3} {:>6.3} {:>12.p$} {:>12.p$} {:>12.p$}\n",
                    row.id,
                    row.spot,
                    row.strike,
                    row.maturity,
                    row.rate,
                    row.volatility,
                    row.price_bs,
                    row.price_pde,
                    row.abs_error,
                    p = precision
                ));
            }
            Ok(out.trim_end().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_case() {
        let rows = run_cases(&CASES[..1]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
        assert!(rows[0].abs_error < 0.05, "abs error {}", rows[0].abs_error);
    }

    #[test]
    fn test_rows_keep_case_order() {
        let rows = run_cases(&CASES[..4]).unwrap();
        let ids: Vec<usize> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(rows[1].spot, 80.0);
    }

    #[test]
    fn test_csv_header() {
        let rows = run_cases(&CASES[..2]).unwrap();
        let csv = render(&rows, OutputFormat::Csv, 5).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,S0,K,T,r,sigma,price_BS,price_PDE,abs_error")
        );
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_table_precision() {
        let rows = run_cases(&CASES[..1]).unwrap();
        let table = render(&rows, OutputFormat::Table, 3).unwrap();
        assert!(table.contains(&format!("{:.3}", rows[0].price_bs)));
    }

    #[test]
    fn test_invalid_case_propagates() {
        let bad: [Case; 1] = [(100.0, 100.0, 1.0, 0.05, -0.2)];
        assert!(matches!(run_cases(&bad), Err(CliError::EngineConfig(_))));
    }
}
