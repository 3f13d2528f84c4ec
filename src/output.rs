// src/output.rs
use crate::analytics::bs_analytic::{MarketInputs, PricingResult};
use crate::error::BsResult;
use std::fs::File;
use std::io::{self, Write};

pub fn write_quotes_to_csv(
    filename: &str,
    inputs: &[MarketInputs],
    results: &[BsResult<PricingResult>],
) -> io::Result<()> {
    if inputs.len() != results.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} inputs but {} results",
                inputs.len(),
                results.len()
            ),
        ));
    }

    let mut file = File::create(filename)?;
    writeln!(
        file,
        "row,spot,strike,rate,time_to_maturity,volatility,call,put,error"
    )?;
    for (i, (x, result)) in inputs.iter().zip(results).enumerate() {
        write!(
            file,
            "{},{},{},{},{},{},",
            i, x.spot, x.strike, x.rate, x.time_to_maturity, x.volatility
        )?;
        match result {
            Ok(p) => writeln!(file, "{},{},", p.call, p.put)?,
            // Quoted: messages may contain commas
            Err(e) => writeln!(file, ",,\"{}\"", e.to_string().replace('"', "'"))?,
        }
    }
    Ok(())
}

pub fn write_summary_to_csv(filename: &str, summary_data: &[(&str, &str)]) -> io::Result<()> {
    let mut file = File::create(filename)?;
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    Ok(())
}
