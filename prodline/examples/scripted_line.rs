//! Runs the line once with random draws and once with a scripted breakdown,
//! printing both reports.

use prodline::prelude::*;
use prodline_core::{Constant, Scripted};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LineConfig::default().with_horizon(100.0);

    let random = ProductionLine::new(config.clone())?.run_configured()?;
    println!("== random draws ==\n{}", TextReporter.render(&random.summary)?);

    let variates = RandomVariateSource::from_config(&config)?
        .with_inter_breakdown(Scripted::new([10.0, 1000.0])?)
        .with_repair(Constant::new(0.5)?);
    let scripted = ProductionLine::with_variates(config, variates)?.run_configured()?;
    println!("== one breakdown at t=10 ==\n{}", TextReporter.render(&scripted.summary)?);
    Ok(())
}
