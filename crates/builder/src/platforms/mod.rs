//! Platform specific builders

use serde::Serialize;
use std::fmt;

pub mod tizen;

pub use tizen::{TizenApp, TizenBoard, TizenBuilder, TIZEN_HOME_VAR};

/// Platforms with a builder implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Tizen,
}

impl Platform {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Platform::Tizen => "tizen",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
