mod ui;

use std::time::Duration;

use clap::{Parser, Subcommand, arg};
use egui::Vec2;
use log::{info, warn};
use racepace::{
    Dashboard, FetchState, HttpPredictionClient, RacePaceError, View, config::AppConfig,
};
use ui::RacePaceApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the dashboard window
    Dashboard {
        #[arg(short, long)]
        base_url: Option<String>,

        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,

        #[arg(short, long)]
        view: Option<View>,
    },
    /// Check the prediction service from the terminal
    Check {
        #[arg(short, long)]
        base_url: Option<String>,

        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,
    },
    /// Save the prediction service settings to the config file
    Config {
        #[arg(short, long)]
        base_url: Option<String>,

        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,
    },
}

fn load_config(base_url: Option<String>, timeout: Option<u64>) -> AppConfig {
    let mut config = match AppConfig::from_local_file() {
        Ok(Some(config)) => config,
        Ok(None) => AppConfig::default(),
        Err(e) => {
            warn!("Ignoring unreadable config file: {}", e);
            AppConfig::default()
        }
    };
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    if let Some(timeout) = timeout {
        config.request_timeout_s = timeout;
    }
    config
}

fn build_dashboard(config: &AppConfig) -> Result<Dashboard<HttpPredictionClient>, RacePaceError> {
    let client = HttpPredictionClient::new(&config.base_url, config.request_timeout())?;
    Dashboard::new(client)
}

fn dashboard(config: AppConfig, view: Option<View>) -> Result<(), RacePaceError> {
    let mut dashboard = build_dashboard(&config)?;
    dashboard.select_view(view.unwrap_or(config.start_view));

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_title("F1 Race Pace Simulator")
        .with_inner_size(Vec2::new(1200., 800.))
        .with_min_inner_size(Vec2::new(640., 480.));

    let service_url = config.base_url.clone();
    eframe::run_native(
        "Racepace",
        native_options,
        Box::new(|cc| Ok(Box::new(RacePaceApp::new(dashboard, service_url, cc)))),
    )
    .map_err(|e| RacePaceError::UiStartError {
        reason: e.to_string(),
    })
}

fn check(config: AppConfig) -> Result<bool, RacePaceError> {
    let mut dashboard = build_dashboard(&config)?;
    println!("Checking prediction service at {}", config.base_url);

    dashboard.run_connection_tests();
    // leave room for the three requests to time out on their own first
    let settled = dashboard.wait_until_settled(config.request_timeout() + Duration::from_secs(5));
    if !settled {
        warn!("Connection checks did not finish in time");
    }

    let results = dashboard.connection.results();
    for (name, outcome) in &results {
        let status = match outcome {
            Some(true) => "✅ PASS",
            Some(false) => "❌ FAIL",
            None => "⌛ TIMEOUT",
        };
        println!("{name}: {status}");
    }
    if let FetchState::Success(sample) = dashboard.connection.sample_lap_time.state() {
        println!(
            "Sample lap time: {} at {}: {}",
            sample.driver, sample.circuit, sample.predicted_lap_time_formatted
        );
    }
    Ok(results.iter().all(|(_, outcome)| *outcome == Some(true)))
}

fn save_config(config: AppConfig) -> Result<(), RacePaceError> {
    // validates the URL before it gets written
    HttpPredictionClient::new(&config.base_url, config.request_timeout())?;
    let path = config.save()?;
    info!("Saved config to {:?}", path);
    println!("Saved config to {}", path.display());
    Ok(())
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let command = cli.command.unwrap_or(Commands::Dashboard {
        base_url: None,
        timeout: None,
        view: None,
    });
    match command {
        Commands::Dashboard {
            base_url,
            timeout,
            view,
        } => {
            dashboard(load_config(base_url, timeout), view).expect("Error while running dashboard")
        }
        Commands::Check { base_url, timeout } => {
            match check(load_config(base_url, timeout)) {
                Ok(true) => {}
                Ok(false) => std::process::exit(1),
                Err(e) => {
                    eprintln!("Error while checking prediction service: {}", e);
                    std::process::exit(2);
                }
            }
        }
        Commands::Config { base_url, timeout } => {
            save_config(load_config(base_url, timeout)).expect("Error while saving config")
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_is_rejected() {
        for command in ["dashboard", "check", "config"] {
            assert!(Args::try_parse_from(["racepace", command, "--timeout", "0"]).is_err());
        }
        let args = Args::try_parse_from(["racepace", "check", "--timeout", "1"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Commands::Check {
                timeout: Some(1),
                ..
            })
        ));
    }
}

