//! Configuration for the terminal engine
//!
//! Colors used for defaults and cursor rendering, the glyph table used
//! while the DEC special graphics set is designated, and the diagnostic
//! verbosity. Every field is optional in JSON and falls back to its
//! default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::logging::DebugLevel;
use crate::core::{Attributes, Color};

/// First byte translated through the ACS table
pub const ACS_FIRST: u8 = 0x60;

/// Glyphs for 0x60..=0x7f while ACS is designated, in ISO-8859-1
const DEFAULT_ACS_CHARS: [u8; 32] = [
    b'*', // ` diamond
    b'#', // a checkerboard
    b' ', b' ', b' ', b' ', // b..e control pictures
    0xb0, // f degree
    0xb1, // g plus/minus
    b' ', b' ', // h, i
    b'+', b'+', b'+', b'+', b'+', // j..n corners and crossing
    b'-', b'-', b'-', b'-', b'-', // o..s scan lines
    b'+', b'+', b'+', b'+', // t..w tees
    b'|', // x vertical line
    b'<', // y less-or-equal
    b'>', // z greater-or-equal
    b'p', // { pi
    b'!', // | not-equal
    0xa3, // } pound
    0xb7, // ~ centered dot
    b' ',
];

/// Terminal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Foreground of blank cells and of SGR 0 / 39
    pub default_fg: Color,
    /// Background of blank cells and of SGR 0 / 49
    pub default_bg: Color,
    /// Background of the cell under a steady cursor
    pub cursor_color: Color,
    /// Background of the cell under a blinking cursor
    pub blinking_cursor_color: Color,
    /// Foreground of the cell under the cursor
    pub cursor_char_color: Color,
    /// Draw the cursor into `cell_at` results
    pub automatic_cursor: bool,
    /// Show bold text in the bright variant of its base color
    pub bold_is_bright: bool,
    /// Glyphs substituted for 0x60..=0x7f while ACS is designated
    pub acs_chars: [u8; 32],
    /// Diagnostic verbosity
    pub debug: DebugLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_fg: Color::White,
            default_bg: Color::Black,
            cursor_color: Color::BrightGreen,
            blinking_cursor_color: Color::Green,
            cursor_char_color: Color::Black,
            automatic_cursor: true,
            bold_is_bright: false,
            acs_chars: DEFAULT_ACS_CHARS,
            debug: DebugLevel::None,
        }
    }
}

impl Config {
    /// Attribute of blank cells
    pub fn default_attributes(&self) -> Attributes {
        Attributes::new(self.default_fg, self.default_bg)
    }

    /// The glyph stored for `byte` while ACS is designated
    pub fn acs_glyph(&self, byte: u8) -> u8 {
        match byte {
            0x60..=0x7e => self.acs_chars[usize::from(byte - ACS_FIRST)],
            _ => byte,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from the default location or return the default
    pub fn load_or_default() -> Self {
        if let Some(config_path) = default_config_path() {
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(err) => {
                        tracing::warn!("ignoring {}: {}", config_path.display(), err);
                    },
                }
            }
        }
        Self::default()
    }
}

/// `~/.config/virtterm/config.json`
fn default_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("virtterm")
            .join("config.json")
    })
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
