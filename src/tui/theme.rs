//! Theme configuration for TUI and CLI
//!
//! Maps element classes to ratatui styles for the terminal view and
//! provides ANSI helpers for plain CLI output.

use ratatui::style::{Color, Modifier, Style};

/// Names accepted by [`Theme::by_name`].
pub const THEME_NAMES: [&str; 3] = ["green", "amber", "ocean"];

/// Colors of the terminal view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Regular printed text
    pub text_primary: Color,
    /// Footer hints and other chrome
    pub text_secondary: Color,
    /// Titles, links and options
    pub accent: Color,
    pub error: Color,
    pub success: Color,
    pub background: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::green()
    }
}

impl Theme {
    /// Phosphor green on black.
    pub fn green() -> Self {
        Self {
            text_primary: Color::Green,
            text_secondary: Color::DarkGray,
            accent: Color::LightGreen,
            error: Color::Red,
            success: Color::LightGreen,
            background: Color::Black,
        }
    }

    /// Amber monochrome.
    pub fn amber() -> Self {
        Self {
            text_primary: Color::Yellow,
            text_secondary: Color::DarkGray,
            accent: Color::LightYellow,
            error: Color::LightRed,
            success: Color::LightYellow,
            background: Color::Black,
        }
    }

    /// Cyan/blue theme.
    pub fn ocean() -> Self {
        Self {
            text_primary: Color::Cyan,
            text_secondary: Color::DarkGray,
            accent: Color::LightCyan,
            error: Color::Red,
            success: Color::Green,
            background: Color::Reset,
        }
    }

    /// Look up a theme by its config name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "green" => Some(Self::green()),
            "amber" => Some(Self::amber()),
            "ocean" => Some(Self::ocean()),
            _ => None,
        }
    }

    // Style helpers

    /// Base style of the output area.
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text_primary).bg(self.background)
    }

    pub fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Style for bold accented text (keybindings, etc).
    pub fn accent_bold_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Style for an element carrying `classes`.
    ///
    /// Error text wins over everything else; unknown classes are ignored.
    pub fn class_style<'a>(&self, classes: impl IntoIterator<Item = &'a str>) -> Style {
        let mut style = Style::default().fg(self.text_primary);
        let mut is_error = false;
        for class in classes {
            match class {
                "error-text" => is_error = true,
                "terminal-title" => style = self.accent_bold_style(),
                "terminal-link" | "select-option" => {
                    style = self.accent_style().add_modifier(Modifier::UNDERLINED)
                }
                "terminal-button" => style = self.accent_bold_style().add_modifier(Modifier::REVERSED),
                "terminal-input" => style = self.accent_style(),
                "loading-text" => style = self.text_secondary_style(),
                _ => {}
            }
        }
        if is_error {
            style = self.error_style();
        }
        style
    }

    // ANSI color helpers for CLI output

    pub fn accent_text(&self, text: &str) -> String {
        format!("{}{}{}", color_to_ansi(self.accent), text, ANSI_RESET)
    }

    pub fn primary_text(&self, text: &str) -> String {
        format!("{}{}{}", color_to_ansi(self.text_primary), text, ANSI_RESET)
    }

    pub fn secondary_text(&self, text: &str) -> String {
        format!(
            "{}{}{}",
            color_to_ansi(self.text_secondary),
            text,
            ANSI_RESET
        )
    }

    pub fn error_text(&self, text: &str) -> String {
        format!("{}{}{}", color_to_ansi(self.error), text, ANSI_RESET)
    }

    pub fn success_text(&self, text: &str) -> String {
        format!("{}{}{}", color_to_ansi(self.success), text, ANSI_RESET)
    }
}

/// ANSI escape codes used by CLI output.
pub mod ansi {
    pub const GREEN: &str = "\x1b[32m";
    pub const RESET: &str = "\x1b[0m";
}

const ANSI_RESET: &str = ansi::RESET;

/// Convert a ratatui Color to an ANSI escape code.
fn color_to_ansi(color: Color) -> &'static str {
    match color {
        Color::Black => "\x1b[30m",
        Color::Red => "\x1b[31m",
        Color::Green => "\x1b[32m",
        Color::Yellow => "\x1b[33m",
        Color::Blue => "\x1b[34m",
        Color::Magenta => "\x1b[35m",
        Color::Cyan => "\x1b[36m",
        Color::Gray => "\x1b[37m",
        Color::DarkGray => "\x1b[90m",
        Color::LightRed => "\x1b[91m",
        Color::LightGreen => "\x1b[92m",
        Color::LightYellow => "\x1b[93m",
        Color::LightBlue => "\x1b[94m",
        Color::LightMagenta => "\x1b[95m",
        Color::LightCyan => "\x1b[96m",
        Color::White => "\x1b[97m",
        Color::Reset => "\x1b[0m",
        // RGB and indexed colors get no code
        _ => "",
    }
}
