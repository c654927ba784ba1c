use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::time::{Duration, interval};
use tracing::info;
use voltboard::console::OperatorConsole;
use voltboard::view::{render_session_table, render_station_grid};

#[tokio::main]
async fn main() -> Result<()> {
    let config = voltboard::config::Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    voltboard::logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Voltboard {} starting up", env!("APP_VERSION"));

    let render_interval_ms = config.poll_interval_ms;
    let console =
        OperatorConsole::new(config).map_err(|e| anyhow::anyhow!("Failed to start: {}", e))?;

    if !console.resume() {
        let username = std::env::var("VOLTBOARD_USERNAME")
            .map_err(|_| anyhow::anyhow!("Not signed in and VOLTBOARD_USERNAME is not set"))?;
        let password = std::env::var("VOLTBOARD_PASSWORD")
            .map_err(|_| anyhow::anyhow!("Not signed in and VOLTBOARD_PASSWORD is not set"))?;
        console
            .login(&username, &password)
            .await
            .map_err(|e| anyhow::anyhow!("Login failed: {}", e))?;
    }

    println!("Commands: start <station> <car> | stop <station> | logout | quit");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut render_ticker = interval(Duration::from_millis(render_interval_ms));
    loop {
        tokio::select! {
            _ = render_ticker.tick() => {
                if !console.is_authenticated() {
                    println!("Session expired, please sign in again");
                    break;
                }
                println!("{}", render_station_grid(&console.registry().stations()));
                println!("{}", render_session_table(&console.registry().sessions()));
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(input)) => {
                        if !handle_command(&console, input.trim()).await {
                            break;
                        }
                    }
                    _ => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    console.shutdown();
    Ok(())
}

/// Apply one operator command; returns false when the loop should end
async fn handle_command(console: &OperatorConsole, input: &str) -> bool {
    let parts: Vec<&str> = input.split_whitespace().collect();
    match parts.as_slice() {
        ["start", station, car] => {
            if console.dispatcher().is_busy() {
                println!("A command is already in flight, try again");
            } else {
                console.dispatcher().start_charging(station, car).await;
            }
        }
        ["stop", station] => {
            if console.dispatcher().is_busy() {
                println!("A command is already in flight, try again");
            } else {
                console.dispatcher().stop_charging(station).await;
            }
        }
        ["logout"] => {
            console.logout();
            return false;
        }
        ["quit"] | ["exit"] => return false,
        [] => {}
        _ => println!("Commands: start <station> <car> | stop <station> | logout | quit"),
    }
    true
}
