//! Light/dark theme. The value is owned by [`crate::app::App`] and handed
//! down as a prop; components never look it up themselves.

use std::fmt;
use std::str::FromStr;

/// Key the preference is stored under in `localStorage`.
pub const STORAGE_KEY: &str = "recipebox.theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// CSS class applied to themed containers.
    pub fn class(self) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
        }
    }

    /// Label for the control that switches to the other theme.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Dark mode",
            Theme::Dark => "Light mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Saved preference, or the default when nothing usable is stored.
pub fn load_preference() -> Theme {
    storage()
        .and_then(|s| s.get_item(STORAGE_KEY).ok().flatten())
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

pub fn save_preference(theme: Theme) {
    if let Some(storage) = storage() {
        if storage.set_item(STORAGE_KEY, &theme.to_string()).is_err() {
            gloo_console::warn!("could not persist theme preference");
        }
    }
}
