//! Interactive collection of pricing inputs.
//!
//! Reads one answer per line. Generic over the reader and writer so the
//! dialogue can be driven from tests.

use std::io::{BufRead, Write};
use std::str::FromStr;

use pricer_models::instruments::PayoffType;

use crate::commands::price::PriceRequest;
use crate::config::CliConfig;
use crate::{CliError, Result};

/// Prompts for every pricing input.
///
/// An empty answer to the S_max, grid and theta prompts accepts the
/// suggested value shown in brackets.
pub fn collect<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    settings: &CliConfig,
) -> Result<PriceRequest> {
    let payoff_type: PayoffType = ask(input, output, "Option type (1 = Call, 0 = Put)", None)?;
    let spot: f64 = ask(input, output, "Spot price S0", None)?;
    let strike: f64 = ask(input, output, "Strike K", None)?;
    let maturity: f64 = ask(input, output, "Maturity T (years)", None)?;
    let rate: f64 = ask(input, output, "Risk-free rate r", None)?;
    let volatility: f64 = ask(input, output, "Volatility sigma", None)?;

    let suggested_s_max = settings.engine.s_max_multiplier * strike;
    let s_max: f64 = ask(input, output, "S_max", Some(suggested_s_max))?;
    let time_steps: usize = ask(
        input,
        output,
        "Time steps M",
        Some(settings.engine.time_steps),
    )?;
    let space_steps: usize = ask(
        input,
        output,
        "Space steps N",
        Some(settings.engine.space_steps),
    )?;
    let theta: f64 = ask(
        input,
        output,
        "Theta (0 = explicit, 0.5 = CN, 1 = implicit)",
        Some(settings.engine.theta),
    )?;

    Ok(PriceRequest {
        payoff_type,
        spot,
        strike,
        maturity,
        rate,
        volatility,
        s_max: Some(s_max),
        theta: Some(theta),
        space_steps: Some(space_steps),
        time_steps: Some(time_steps),
        compute_theta: false,
    })
}

fn ask<T, R, W>(input: &mut R, output: &mut W, label: &str, suggested: Option<T>) -> Result<T>
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
    R: BufRead,
    W: Write,
{
    match &suggested {
        Some(value) => write!(output, "{} [{}] = ", label, value)?,
        None => write!(output, "{} = ", label)?,
    }
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(CliError::InvalidArgument(format!(
            "unexpected end of input at '{}'",
            label
        )));
    }

    let answer = line.trim();
    if answer.is_empty() {
        if let Some(value) = suggested {
            return Ok(value);
        }
    }
    answer
        .parse()
        .map_err(|e| CliError::InvalidArgument(format!("{}: '{}' ({})", label, answer, e)))
}
