use chrono::{DateTime, Local};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, instrument, warn};

use crate::config::{Config, RacePolicy};
use crate::display::{DisplaySink, DisplayState};
use crate::fetcher::PriceSource;
use crate::refresh::{FetchResult, RefreshEvent, UserCommand};
use crate::scheduler::RefreshScheduler;

/// Format of the "Last Refresh" line, e.g. `Oct 19, 2026 at 3:04 PM`.
const LAST_REFRESH_FORMAT: &str = "%b %-d, %Y at %-I:%M %p";

pub fn format_last_refresh(timestamp: &DateTime<Local>) -> String {
    format!("Last Refresh: {}", timestamp.format(LAST_REFRESH_FORMAT))
}

/// Sole owner of the display.
///
/// Fetch results and user commands arrive over channels and are applied one
/// at a time on the task running [`DisplayController::run`], so the display
/// is never touched from two places at once.
pub struct DisplayController<D> {
    display: D,
    unit: String,
    race_policy: RacePolicy,
    surface_failures: bool,
    title: String,
    newest_applied: u64,
}

impl<D: DisplaySink> DisplayController<D> {
    /// Take ownership of `display` and reset it to the placeholder state.
    pub fn new(mut display: D, config: &Config) -> Self {
        let placeholder = DisplayState::placeholder(&config.unit);
        display.set_title(&placeholder.title);
        display.set_tooltip(&placeholder.tooltip);
        display.set_last_refresh_label(&placeholder.last_refresh);
        display.commit();

        Self {
            display,
            unit: config.unit.clone(),
            race_policy: config.race_policy,
            surface_failures: config.surface_failures,
            title: placeholder.title,
            newest_applied: 0,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_display(self) -> D {
        self.display
    }

    /// Apply one completed attempt. Returns `false` when the race policy
    /// discarded it.
    pub fn apply(&mut self, event: &RefreshEvent) -> bool {
        if self.race_policy == RacePolicy::LatestTrigger && event.generation < self.newest_applied
        {
            info!(
                generation = event.generation,
                newest_applied = self.newest_applied,
                trigger = ?event.trigger,
                "Discarding result superseded by a newer refresh"
            );
            return false;
        }
        self.newest_applied = self.newest_applied.max(event.generation);

        match &event.result {
            FetchResult::Success { price } => {
                let text = format!("{} {}", price, self.unit);
                debug!(title = %text, "Updating display");
                self.display.set_title(&text);
                self.display.set_tooltip(&text);
                self.title = text;
            }
            FetchResult::Failure { reason } => {
                warn!(
                    generation = event.generation,
                    trigger = ?event.trigger,
                    reason = %reason,
                    "Gas price refresh failed"
                );
                if self.surface_failures {
                    let tooltip = format!(
                        "{} (fetch failed at {})",
                        self.title,
                        event.timestamp.format("%H:%M")
                    );
                    self.display.set_tooltip(&tooltip);
                }
            }
        }

        self.display
            .set_last_refresh_label(&format_last_refresh(&event.timestamp));
        self.display.commit();
        true
    }

    /// Apply events and handle commands until `Quit` arrives or every
    /// command sender is dropped. Returns the display for inspection.
    #[instrument(skip_all)]
    pub async fn run<S: PriceSource>(
        mut self,
        scheduler: &RefreshScheduler<S>,
        mut events: UnboundedReceiver<RefreshEvent>,
        mut commands: UnboundedReceiver<UserCommand>,
    ) -> D {
        info!("Display controller started");

        loop {
            tokio::select! {
                Some(event) = events.recv() => {
                    self.apply(&event);
                }
                command = commands.recv() => match command {
                    Some(UserCommand::Refresh) => {
                        info!("Manual refresh requested");
                        scheduler.refresh_now();
                    }
                    Some(UserCommand::Quit) | None => {
                        info!("Quit requested, stopping display controller");
                        break;
                    }
                },
            }
        }

        self.display
    }
}
