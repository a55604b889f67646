pub mod aligner;
pub mod date_scale;
pub mod format;
pub mod mapper;
pub mod measurement;
pub mod normalizer;
pub mod period;
pub mod primitives;
pub mod projection;
pub mod scale;
pub mod stock_summary;
pub mod types;
pub mod value_scale;

pub use aligner::{AlignedSeries, align, align_pair, align_single};
pub use date_scale::DateScale;
pub use format::ValueTickFormat;
pub use mapper::{CoordinateMapper, ValueAxis};
pub use measurement::{ChangeDirection, Measurement, percent_change};
pub use normalizer::{
    DateGranularity, ProviderShape, RawBatch, RawRecord, normalize, normalize_series,
};
pub use period::{Period, XLabelGranularity};
pub use projection::{
    AreaGeometry, PixelVertex, clip_polyline_x, project_area, project_points,
};
pub use scale::{LinearScale, PixelRange};
pub use stock_summary::StockSummary;
pub use types::{
    ChartMode, PlotArea, PlotInsets, SnappedPoint, TimeSeries, TimeSeriesPoint, Viewport,
};
pub use value_scale::{ValueScale, ValueScaleTuning};
