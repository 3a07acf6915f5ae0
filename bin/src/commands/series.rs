//! Cached monthly time series inspection command.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use stockpile_cacher::Config;
use stockpile_series::MonthlyTimeSeries;
use stockpile_types::ComponentKind;

/// Execute the series command.
pub(crate) fn series(
    config: &Config,
    ticker: &str,
    date: Option<&str>,
    range: Option<&str>,
) -> Result<()> {
    let ticker = ticker.to_uppercase();
    let path = ComponentKind::MonthlyTimeSeries.artifact_path(&config.data_dir, &ticker);

    if !path.exists() {
        bail!(
            "No cached monthly series for {ticker}; run `stockpile run --once` first \
             (expected {})",
            path.display()
        );
    }

    let series = MonthlyTimeSeries::from_json_file(&path)
        .with_context(|| format!("Failed to parse cached series for {ticker}"))?;

    println!("Symbol:         {}", series.meta().symbol);
    println!("Last refreshed: {}", series.meta().last_refreshed);
    println!("Time zone:      {}", series.meta().time_zone);
    println!("Bars:           {}", series.len());

    if let Some(target) = date {
        let target = parse_date(target)?;
        match series.nearest(target) {
            Some(bar) => println!(
                "\nNearest to {target}: {} close {:.2} volume {}",
                bar.date, bar.close, bar.volume
            ),
            None => println!("\nSeries is empty"),
        }
    }

    if let Some(range) = range {
        let (initial, terminal) = parse_range(range)?;
        match series.period_return(initial, terminal) {
            Some(ret) => println!("\nReturn {initial}..{terminal}: {:.2}%", ret * 100.0),
            None => println!("\nReturn {initial}..{terminal}: unavailable"),
        }
    }

    if date.is_none() && range.is_none() {
        println!();
        for bar in series.bars().iter().rev().take(12) {
            println!(
                "  {}  open {:>10.2}  close {:>10.2}  volume {:>12}",
                bar.date, bar.open, bar.close, bar.volume
            );
        }
    }

    Ok(())
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{input}' (expected YYYY-MM-DD)"))
}

fn parse_range(input: &str) -> Result<(NaiveDate, NaiveDate)> {
    let Some((start, end)) = input.split_once("..") else {
        bail!("Invalid range '{input}' (expected YYYY-MM-DD..YYYY-MM-DD)");
    };
    Ok((parse_date(start)?, parse_date(end)?))
}
