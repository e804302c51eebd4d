//! Price command implementation
//!
//! Prices a single European option with the finite-difference engine and
//! reports the closed-form price alongside it.

use pricer_models::analytical::BlackScholes;
use pricer_models::instruments::{PayoffType, VanillaPayoff};
use pricer_pde::{PdeConfig, PdeEngine, PricingResult, ThetaScheme};
use serde::Serialize;
use tracing::info;

use crate::config::{CliConfig, OutputFormat};
use crate::{CliError, Result};

/// Inputs for one pricing run.
///
/// Grid fields left as `None` fall back to the `[engine]` configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRequest {
    /// Call or put
    pub payoff_type: PayoffType,
    /// Spot price S0
    pub spot: f64,
    /// Strike K
    pub strike: f64,
    /// Maturity T in years
    pub maturity: f64,
    /// Risk-free rate r
    pub rate: f64,
    /// Volatility σ
    pub volatility: f64,
    /// Upper edge of the spot grid
    pub s_max: Option<f64>,
    /// Theta-scheme weight
    pub theta: Option<f64>,
    /// Number of space nodes N
    pub space_steps: Option<usize>,
    /// Number of time steps M
    pub time_steps: Option<usize>,
    /// Estimate theta from the penultimate layer
    pub compute_theta: bool,
}

/// Result of one pricing run, as rendered by every output format.
#[derive(Debug, Clone, Serialize)]
pub struct PriceReport {
    /// Call or put
    pub option: PayoffType,
    /// Spot price S0
    pub spot: f64,
    /// Strike K
    pub strike: f64,
    /// Maturity T
    pub maturity: f64,
    /// Risk-free rate r
    pub rate: f64,
    /// Volatility σ
    pub volatility: f64,
    /// Upper edge of the spot grid
    pub s_max: f64,
    /// Time-stepping scheme
    pub scheme: ThetaScheme,
    /// Number of space nodes
    pub space_steps: usize,
    /// Number of time steps
    pub time_steps: usize,
    /// Finite-difference price and Greeks
    pub pde: PricingResult,
    /// Closed-form reference price
    pub closed_form: f64,
    /// |pde.price - closed_form|
    pub abs_error: f64,
}

/// Run the price command
pub fn run(request: &PriceRequest, format: OutputFormat, settings: &CliConfig) -> Result<()> {
    let report = price(request, settings)?;
    println!("{}", render(&report, format, settings.output.precision)?);
    Ok(())
}

/// Builds the engine configuration for a request.
pub fn engine_config(request: &PriceRequest, settings: &CliConfig) -> Result<PdeConfig> {
    let s_max = request
        .s_max
        .unwrap_or(settings.engine.s_max_multiplier * request.strike);

    let config = PdeConfig::builder()
        .maturity(request.maturity)
        .rate(request.rate)
        .volatility(request.volatility)
        .s_max(s_max)
        .theta(request.theta.unwrap_or(settings.engine.theta))
        .space_steps(request.space_steps.unwrap_or(settings.engine.space_steps))
        .time_steps(request.time_steps.unwrap_or(settings.engine.time_steps))
        .compute_theta(request.compute_theta)
        .build()?;
    Ok(config)
}

/// Prices the request and compares against the closed form.
pub fn price(request: &PriceRequest, settings: &CliConfig) -> Result<PriceReport> {
    let payoff = VanillaPayoff::new(request.payoff_type, request.strike)?;
    let config = engine_config(request, settings)?;

    if request.spot >= config.s_max() {
        return Err(CliError::InvalidArgument(format!(
            "spot {} must lie below S_max {}",
            request.spot,
            config.s_max()
        )));
    }

    info!(
        option = %request.payoff_type,
        spot = request.spot,
        strike = request.strike,
        s_max = config.s_max(),
        scheme = %config.scheme(),
        "Starting pricing..."
    );

    let mut engine = PdeEngine::new(config.clone());
    let pde = engine.solve(&payoff, request.spot)?;

    let closed_form = BlackScholes::new(request.spot, request.rate, request.volatility)?.price(
        request.payoff_type,
        request.strike,
        request.maturity,
    );

    info!("Pricing complete");
    Ok(PriceReport {
        option: request.payoff_type,
        spot: request.spot,
        strike: request.strike,
        maturity: request.maturity,
        rate: request.rate,
        volatility: request.volatility,
        s_max: config.s_max(),
        scheme: config.scheme(),
        space_steps: config.space_steps(),
        time_steps: config.time_steps(),
        abs_error: (pde.price - closed_form).abs(),
        pde,
        closed_form,
    })
}

/// Renders a report in the requested format.
pub fn render(report: &PriceReport, format: OutputFormat, precision: usize) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record([
                "option", "S0", "K", "T", "r", "sigma", "price", "delta", "gamma", "theta",
                "price_BS", "abs_error",
            ])?;
            writer.write_record(&[
                report.option.to_string(),
                fixed(report.spot, precision),
                fixed(report.strike, precision),
                fixed(report.maturity, precision),
                fixed(report.rate, precision),
                fixed(report.volatility, precision),
                fixed(report.pde.price, precision),
                fixed(report.pde.delta, precision),
                fixed(report.pde.gamma, precision),
                fixed(report.pde.theta, precision),
                fixed(report.closed_form, precision),
                fixed(report.abs_error, precision),
            ])?;
            let bytes = writer
                .into_inner()
                .map_err(|e| CliError::Io(e.into_error()))?;
            Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
        }
        OutputFormat::Table => {
            let rows = [
                ("Price", report.pde.price),
                ("Delta", report.pde.delta),
                ("Gamma", report.pde.gamma),
                ("Theta", report.pde.theta),
                ("Closed form", report.closed_form),
                ("Abs error", report.abs_error),
            ];
            let mut out = format!(
                "{} K={} T={} | {} N={} M={} S_max={}\n",
                report.option,
                report.strike,
                report.maturity,
                report.scheme,
                report.space_steps,
                report.time_steps,
                report.s_max
            );
            out.push_str("┌─────────────┬──────────────────┐\n");
            for (label, value) in rows {
                out.push_str(&format!(
                    "│ {:<11} │ {:>16} │\n",
                    label,
                    fixed(value, precision)
                ));
            }
            out.push_str("└─────────────┴──────────────────┘");
            Ok(out)
        }
    }
}

fn fixed(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn request() -> PriceRequest {
        PriceRequest {
            payoff_type: PayoffType::Call,
            spot: 100.0,
            strike: 100.0,
            maturity: 1.0,
            rate: 0.05,
            volatility: 0.2,
            s_max: Some(500.0),
            theta: None,
            space_steps: Some(200),
            time_steps: Some(400),
            compute_theta: false,
        }
    }

    #[test]
    fn test_engine_config_defaults_from_settings() {
        let mut req = request();
        req.s_max = None;
        req.space_steps = None;
        let config = engine_config(&req, &CliConfig::default()).unwrap();
        assert_eq!(config.s_max(), 400.0);
        assert_eq!(config.space_steps(), 250);
        assert_eq!(config.time_steps(), 400);
        assert_eq!(config.theta(), 0.5);
    }

    #[test]
    fn test_price_close_to_closed_form() {
        let report = price(&request(), &CliConfig::default()).unwrap();
        assert_abs_diff_eq!(report.closed_form, 10.4506, epsilon = 1e-4);
        assert!(report.abs_error < 0.05);
    }

    #[test]
    fn test_invalid_strike_rejected() {
        let mut req = request();
        req.strike = -1.0;
        assert!(matches!(
            price(&req, &CliConfig::default()),
            Err(CliError::Instrument(_))
        ));
    }

    #[test]
    fn test_invalid_engine_parameters_rejected() {
        let mut req = request();
        req.volatility = 0.0;
        assert!(matches!(
            price(&req, &CliConfig::default()),
            Err(CliError::EngineConfig(_))
        ));
    }

    #[test]
    fn test_spot_above_grid_rejected() {
        let mut req = request();
        req.spot = 600.0;
        assert!(matches!(
            price(&req, &CliConfig::default()),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_render_formats() {
        let report = price(&request(), &CliConfig::default()).unwrap();

        let table = render(&report, OutputFormat::Table, 5).unwrap();
        assert!(table.contains("Price"));
        assert!(table.contains(&format!("{:.5}", report.pde.price)));

        let json = render(&report, OutputFormat::Json, 5).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["option"], "call");
        assert_eq!(parsed["space_steps"], 200);

        let csv = render(&report, OutputFormat::Csv, 2).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("option,S0,K"));
        assert!(lines[1].starts_with("call,100.00,100.00"));
    }
}
