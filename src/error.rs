use thiserror::Error;

use crate::core::DateGranularity;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("cannot parse date `{input}` at {granularity} granularity")]
    DateParse {
        input: String,
        granularity: DateGranularity,
    },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("anchor value is zero, percent change is undefined")]
    ZeroAnchorValue,

    #[error("render surface has been destroyed")]
    RenderSurfaceDestroyed,
}

impl ChartError {
    /// Errors recovered where they occur instead of being shown to the user.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DateParse { .. } | Self::ZeroAnchorValue | Self::RenderSurfaceDestroyed
        )
    }

    /// Short host-facing status line.
    #[must_use]
    pub fn status_message(&self) -> String {
        match self {
            Self::DataUnavailable(detail) if detail.is_empty() => {
                "No valid historical data available".to_owned()
            }
            Self::DataUnavailable(detail) => format!("No valid historical data available: {detail}"),
            Self::InvalidSelection(detail) => format!("Invalid selection: {detail}"),
            Self::InvalidViewport { .. } | Self::InvalidData(_) => {
                "Unable to draw chart".to_owned()
            }
            Self::DateParse { input, .. } => format!("Error parsing date: {input}"),
            Self::ZeroAnchorValue => "Change unavailable".to_owned(),
            Self::RenderSurfaceDestroyed => String::new(),
        }
    }
}
