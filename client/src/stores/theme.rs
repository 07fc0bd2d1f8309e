//! Display theme preference.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::core::{Result, Storage};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

pub struct ThemeStore {
    storage: Arc<dyn Storage>,
    current: Mutex<Theme>,
    changes: watch::Sender<Theme>,
}

impl ThemeStore {
    /// Start from the stored theme, or from the system preference when
    /// nothing valid is stored.
    pub fn new(storage: Arc<dyn Storage>, prefers_dark: bool) -> Self {
        let fallback = if prefers_dark { Theme::Dark } else { Theme::Light };
        let theme = match storage.get(THEME_KEY) {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring stored theme");
                fallback
            }),
            None => fallback,
        };

        let (changes, _) = watch::channel(theme);
        Self {
            storage,
            current: Mutex::new(theme),
            changes,
        }
    }

    pub fn current(&self) -> Theme {
        *self.current.lock()
    }

    pub fn toggle(&self) -> Result<Theme> {
        let mut current = self.current.lock();
        let next = current.toggled();
        self.apply(&mut current, next)?;
        Ok(next)
    }

    pub fn set(&self, theme: Theme) -> Result<()> {
        let mut current = self.current.lock();
        self.apply(&mut current, theme)
    }

    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.changes.subscribe()
    }

    fn apply(&self, current: &mut Theme, next: Theme) -> Result<()> {
        self.storage.set(THEME_KEY, next.as_str())?;
        *current = next;
        self.changes.send_replace(next);
        debug!(theme = %next, "Theme applied");
        Ok(())
    }
}
