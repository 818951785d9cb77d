// SPDX-License-Identifier: MPL-2.0

use chrono::Utc;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use trash_transit::app::{Startup, TransitApp};
use trash_transit::board::CityBoard;
use trash_transit::config::{BackendConfig, IS_DEVEL};
use trash_transit::error::AppError;
use trash_transit::runtime;

const ACCEPT_TERMS_FLAG: &str = "--accept-terms";

fn init_tracing() {
    let default = if IS_DEVEL { "trash_transit=debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let accept_terms = std::env::args().skip(1).any(|arg| arg == ACCEPT_TERMS_FLAG);
    let config = BackendConfig::from_env();

    let app = match TransitApp::open(&config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime::block_on(run(app, accept_terms)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(app: TransitApp, accept_terms: bool) -> Result<(), AppError> {
    let cities = match app.startup().await? {
        Startup::Ready { cities } => cities,
        Startup::AwaitingConsent if accept_terms => app.accept_terms().await?,
        Startup::AwaitingConsent => {
            println!("Please accept the privacy policy and terms of use first ({ACCEPT_TERMS_FLAG}).");
            return Ok(());
        }
    };
    if let Some(city) = app.preferred_city(&cities) {
        println!("Your city: {city}");
    }

    let mut board = app.city_board();
    let ranking = runtime::spawn(async move { board.refresh().await.map(|()| board) });

    let mut feed = app.comment_feed();
    feed.open().await?;

    match ranking.await {
        Ok(Ok(board)) => print_ranking(&board),
        Ok(Err(e)) => warn!("Failed to load ranking: {e}"),
        Err(e) => warn!("Ranking task failed: {e}"),
    }

    println!("\n{} comments", feed.query().sort.label());
    let now = Utc::now();
    for item in feed.items() {
        let marker = if item.liked { "*" } else { " " };
        println!(
            "{marker}[{:>3}] {}: {} ({})",
            item.upvotes,
            item.city_name,
            item.report_text,
            item.time_ago(now)
        );
    }
    Ok(())
}

fn print_ranking(board: &CityBoard) {
    println!("Longest waits ({})", board.filter().label());
    for (rank, city) in board.cities().iter().enumerate() {
        match city.average_wait_minutes {
            Some(avg) => println!("{:>2}. {} ({avg:.0} min)", rank + 1, city.name),
            None => println!("{:>2}. {}", rank + 1, city.name),
        }
    }
}
