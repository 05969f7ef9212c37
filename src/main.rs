#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod ops;
mod prelude;
mod quantity;
mod statistics;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::Args,
    core::{Endpoint, Fetcher},
    prelude::*,
    statistics::DailyEnergy,
    tables::{build_averages_table, build_daily_table},
};

const ADVICE: &str = "\
Tip: although there are other factors to consider, you can compare your average daily imported
to average daily exported above to gauge the size of battery you could add to reduce your imports.
A battery with a size similar to your average daily exported energy would allow you to import
that much less energy from the grid.";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let range = args.range()?;

    let fetcher = Fetcher::builder()
        .source(args.new_client()?)
        .max_window(args.max_window())
        .query_delay(args.query_delay.into())
        .build();
    let consumption = fetcher.fetch(Endpoint::Consumption, range).await?;
    let production = fetcher.fetch(Endpoint::Production, range).await?;

    let daily = DailyEnergy::try_new(range.start, production, consumption)?;
    let averages = daily.averages()?;

    if args.show_daily {
        println!("{}", build_daily_table(&daily));
    }
    println!("{}", build_averages_table(&averages));
    println!();
    println!("{ADVICE}");

    info!("done!");
    Ok(())
}
