use std::io::BufRead;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, instrument, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gasbar::app::Application;
use gasbar::config::Config;
use gasbar::display::ConsoleDisplay;
use gasbar::refresh::UserCommand;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries the status line
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,gasbar=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    info!("Starting gasbar with config: {:?}", config);

    let app = Application::build(config, ConsoleDisplay::stdout())?;

    let commands = app.commands();
    {
        // Blocking stdin reads get their own thread so they never hold up shutdown
        let commands = commands.clone();
        std::thread::spawn(move || read_commands(commands));
    }
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = commands.send(UserCommand::Quit);
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    info!("Type 'r' + Enter to refresh, 'q' + Enter to quit");
    app.run_until_stopped().await;

    Ok(())
}

/// Map stdin lines to commands. EOF counts as quit.
fn read_commands(commands: UnboundedSender<UserCommand>) {
    let mut lines = std::io::stdin().lock().lines();

    loop {
        let command = match lines.next() {
            Some(Ok(line)) => match line.trim() {
                "r" | "refresh" => UserCommand::Refresh,
                "q" | "quit" => UserCommand::Quit,
                "" => continue,
                other => {
                    warn!("Unknown command: {}", other);
                    continue;
                }
            },
            None => UserCommand::Quit,
            Some(Err(e)) => {
                warn!("Failed to read stdin: {}", e);
                UserCommand::Quit
            }
        };

        let quit = command == UserCommand::Quit;
        if commands.send(command).is_err() || quit {
            return;
        }
    }
}
