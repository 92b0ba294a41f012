//! Tool catalogue
//!
//! Session records store the operation as a plain string so that records
//! written by newer front-ends still load; `Tool` is the set this build knows.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Merge,
    Split,
    Compress,
    Rotate,
    Watermark,
    Redact,
    Sign,
    Crop,
    Metadata,
}

impl Tool {
    pub const ALL: [Tool; 9] = [
        Tool::Merge,
        Tool::Split,
        Tool::Compress,
        Tool::Rotate,
        Tool::Watermark,
        Tool::Redact,
        Tool::Sign,
        Tool::Crop,
        Tool::Metadata,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Merge => "merge",
            Tool::Split => "split",
            Tool::Compress => "compress",
            Tool::Rotate => "rotate",
            Tool::Watermark => "watermark",
            Tool::Redact => "redact",
            Tool::Sign => "sign",
            Tool::Crop => "crop",
            Tool::Metadata => "metadata",
        }
    }

    /// Files needed before the tool can run
    pub fn min_files(&self) -> usize {
        match self {
            Tool::Merge => 2,
            _ => 1,
        }
    }

    /// Whether the tool accepts more than one input file
    pub fn accepts_multiple(&self) -> bool {
        matches!(self, Tool::Merge | Tool::Compress)
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(Tool::Merge),
            "split" => Ok(Tool::Split),
            "compress" => Ok(Tool::Compress),
            "rotate" => Ok(Tool::Rotate),
            "watermark" => Ok(Tool::Watermark),
            "redact" => Ok(Tool::Redact),
            "sign" => Ok(Tool::Sign),
            "crop" => Ok(Tool::Crop),
            "metadata" => Ok(Tool::Metadata),
            _ => Err(format!("Unknown tool: {}", s)),
        }
    }
}
