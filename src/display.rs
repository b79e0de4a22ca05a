//! Display surfaces the controller reports to.
//!
//! The status item itself (icon, menu, tooltip widget) lives outside this
//! crate. Anything that can show a title, a tooltip and a "last refresh"
//! line can act as the display by implementing [`DisplaySink`].

use std::io::Write;

use tracing::warn;

pub const LAST_REFRESH_NEVER: &str = "Last Refresh: Never";

/// Operations the core needs from the display collaborator.
///
/// Implementations are only ever driven from the controller task, so they
/// need no internal synchronization.
pub trait DisplaySink: Send + 'static {
    fn set_title(&mut self, title: &str);
    fn set_tooltip(&mut self, tooltip: &str);
    fn set_last_refresh_label(&mut self, label: &str);

    /// Called once after each batch of updates.
    fn commit(&mut self) {}
}

/// Plain in-memory display state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub title: String,
    pub tooltip: String,
    pub last_refresh: String,
}

impl DisplayState {
    pub fn placeholder(unit: &str) -> Self {
        let title = format!("- {unit}");
        Self {
            tooltip: title.clone(),
            title,
            last_refresh: LAST_REFRESH_NEVER.to_string(),
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::placeholder(crate::config::DEFAULT_UNIT)
    }
}

impl DisplaySink for DisplayState {
    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        self.tooltip = tooltip.to_string();
    }

    fn set_last_refresh_label(&mut self, label: &str) {
        self.last_refresh = label.to_string();
    }
}

/// Renders the display state as one line per commit on a writer.
pub struct ConsoleDisplay<W> {
    state: DisplayState,
    out: W,
}

impl ConsoleDisplay<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + 'static> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            state: DisplayState::default(),
            out,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + 'static> DisplaySink for ConsoleDisplay<W> {
    fn set_title(&mut self, title: &str) {
        self.state.set_title(title);
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        self.state.set_tooltip(tooltip);
    }

    fn set_last_refresh_label(&mut self, label: &str) {
        self.state.set_last_refresh_label(label);
    }

    fn commit(&mut self) {
        let line = if self.state.tooltip == self.state.title {
            format!("⛽ {}  [{}]", self.state.title, self.state.last_refresh)
        } else {
            format!(
                "⛽ {}  ({})  [{}]",
                self.state.title, self.state.tooltip, self.state.last_refresh
            )
        };

        if let Err(e) = writeln!(self.out, "{line}").and_then(|_| self.out.flush()) {
            warn!("Failed to write status line: {}", e);
        }
    }
}
