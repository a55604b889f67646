mod axis_ticks;
mod chart_renderer;
mod collaborators;
mod config;
mod host;
mod session;

pub use chart_renderer::{ChartRenderer, HoverOverlay, OverlayPrimitives};
pub use collaborators::{
    IndexMapTickerDirectory, RateSource, SeriesKind, SeriesProvider, SeriesRequest,
    TickerDirectory, TickerEntry, conversion_text,
};
pub use config::{
    ChartSessionConfig, ChartSessionConfigJsonContractV1, ChartStyle,
    SESSION_CONFIG_JSON_SCHEMA_V1,
};
pub use host::{COMPOSITE_UNAVAILABLE_MESSAGE, ChartHost, ChartRequest};
pub use session::ChartSession;
