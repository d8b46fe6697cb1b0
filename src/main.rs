mod dashboard;
mod form;
mod geo;
mod parse;
mod record;
mod render;
mod sample;
mod shell;
mod store;
mod util;
mod views;

use crate::dashboard::{Dashboard, write_csv};
use crate::form::FormController;
use crate::geo::IpLocator;
use crate::parse::{Args, Command};
use crate::record::{Status, now_millis};
use crate::render::{
    render_confirmation, render_dashboard, render_detail, render_location_status, render_stats,
};
use crate::shell::render_menu;
use crate::store::{JsonFileStore, Store};
use crate::views::ListFilters;
use clap::Parser;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::time::Duration;

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Asks on stdin; anything but an explicit yes declines.
fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(e) => {
            warn!("Could not read confirmation: {}", e);
            false
        }
    }
}

/// Applies a status change, then redraws the whole dashboard. Unknown ids
/// are ignored without output.
fn change_status<S: Store>(
    dashboard: &Dashboard<'_, S>,
    id: &str,
    next: Status,
) -> Result<(), Box<dyn std::error::Error>> {
    if dashboard.change_status(id, next)? {
        println!("{}", render_dashboard(&dashboard.view(&ListFilters::default(), now_millis())));
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    // Initialize logger
    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let store = JsonFileStore::new(&args.store);
    info!("Using store {}", store.path().display());
    let dashboard = Dashboard::new(&store);

    match &args.command {
        Command::Home => print!("{}", render_menu(args.command.page())),
        Command::Submit(submit) => {
            let locator = if submit.locate {
                match IpLocator::new(&submit.geo_endpoint, Duration::from_secs(submit.geo_timeout)) {
                    Ok(locator) => Some(locator),
                    Err(e) => {
                        println!("! Unable to retrieve location. {}", e);
                        None
                    }
                }
            } else {
                None
            };

            let mut form = FormController::new(&store);
            if let Some(locator) = &locator {
                form = form.with_locator(locator);
                let status = form.locate().await;
                println!("{}", render_location_status(&status));
                debug!("Form state after lookup: {:?}", form.state());
            }

            let id = form.submit(submit.form_input())?;
            println!("{}", render_confirmation(&id));
        }
        Command::Stats => println!("{}", render_stats(&dashboard.stats())),
        Command::List(list) => {
            println!("{}", render_dashboard(&dashboard.view(&list.filters(), now_millis())));
        }
        Command::Show { id } => {
            if let Some(detail) = dashboard.details(id) {
                print!("{}", render_detail(&detail));
            }
        }
        Command::Start { id } => change_status(&dashboard, id, Status::InProgress)?,
        Command::Rescue { id } => change_status(&dashboard, id, Status::Rescued)?,
        Command::Reopen { id } => change_status(&dashboard, id, Status::Pending)?,
        Command::SetStatus { id, status } => change_status(&dashboard, id, *status)?,
        Command::Refresh { list, delay } => {
            let view = Dashboard::new(&store)
                .with_refresh_delay(*delay)
                .refresh(&list.filters(), now_millis())
                .await;
            println!("{}", render_dashboard(&view));
        }
        Command::Clear { yes } => {
            let cleared = dashboard.clear_all(|prompt| *yes || confirm(prompt))?;
            if cleared {
                println!("{}", render_dashboard(&dashboard.view(&ListFilters::default(), now_millis())));
            }
        }
        Command::Seed => {
            let added = dashboard.seed_samples(now_millis())?;
            println!("Sample data added successfully! ({} requests)", added);
        }
        Command::Export { list, output } => {
            let requests = dashboard.requests(&list.filters());
            write_csv(&requests, File::create(output)?)?;
            info!("Data saved to {}", output);
            println!("Exported {} requests to {}", requests.len(), output);
        }
    }

    Ok(())
}
