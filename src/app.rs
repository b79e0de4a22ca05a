use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::info;

use crate::config::Config;
use crate::controller::DisplayController;
use crate::display::DisplaySink;
use crate::fetch_error::FetchError;
use crate::fetcher::{GasPriceFetcher, PriceSource};
use crate::refresh::{RefreshEvent, UserCommand};
use crate::scheduler::RefreshScheduler;

/// The fetcher, scheduler and display controller wired together.
///
/// Commands from the display collaborator go in through
/// [`Application::commands`]; the application runs until it receives
/// `Quit` or every command sender has been dropped.
pub struct Application<S, D> {
    scheduler: RefreshScheduler<S>,
    controller: DisplayController<D>,
    events: UnboundedReceiver<RefreshEvent>,
    command_tx: UnboundedSender<UserCommand>,
    commands: UnboundedReceiver<UserCommand>,
}

impl<D: DisplaySink> Application<GasPriceFetcher, D> {
    /// Build the application around the HTTP gas price fetcher.
    pub fn build(config: Config, display: D) -> Result<Self, FetchError> {
        info!("Initializing application components");
        let fetcher = GasPriceFetcher::from_config(&config)?;
        Ok(Self::with_source(fetcher, &config, display))
    }
}

impl<S: PriceSource, D: DisplaySink> Application<S, D> {
    pub fn with_source(source: S, config: &Config, display: D) -> Self {
        let (scheduler, events) = RefreshScheduler::new(source, config.refresh_interval());
        let controller = DisplayController::new(display, config);
        let (command_tx, commands) = mpsc::unbounded_channel();

        Self {
            scheduler,
            controller,
            events,
            command_tx,
            commands,
        }
    }

    pub fn commands(&self) -> UnboundedSender<UserCommand> {
        self.command_tx.clone()
    }

    /// Start the timer and drive the display until quit.
    ///
    /// The timer is stopped on return; fetches already in flight finish in
    /// the background and their results are dropped.
    pub async fn run_until_stopped(self) -> D {
        let Self {
            scheduler,
            controller,
            events,
            command_tx,
            commands,
        } = self;
        // Only external senders keep the command channel open.
        drop(command_tx);

        let timer = scheduler.start();
        let display = controller.run(&scheduler, events, commands).await;
        timer.abort();

        info!("Application stopped");
        display
    }
}
