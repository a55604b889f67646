use finchart::api::{ChartSessionConfigJsonContractV1, SESSION_CONFIG_JSON_SCHEMA_V1};
use finchart::core::{ChartMode, Period, PlotInsets, Viewport};
use finchart::render::Color;
use finchart::{ChartError, ChartSessionConfig, ChartStyle};

#[test]
fn contract_v1_wraps_config_with_schema_version() {
    let config = ChartSessionConfig::new(Viewport::new(1280, 720))
        .with_mode(ChartMode::Currency)
        .with_period(Period::FiveYears)
        .with_title("EUR/USD")
        .with_y_label("Rate");

    let json = config.to_json_contract_v1_pretty().expect("serialize");
    let payload: ChartSessionConfigJsonContractV1 =
        serde_json::from_str(&json).expect("contract payload");

    assert_eq!(payload.schema_version, SESSION_CONFIG_JSON_SCHEMA_V1);
    assert_eq!(payload.config, config);
    assert!(json.contains("\"5Y\""));
    assert_eq!(
        ChartSessionConfig::from_json_compat_str(&json).expect("parse contract"),
        config
    );
}

#[test]
fn bare_config_with_only_viewport_uses_defaults() {
    let config = ChartSessionConfig::from_json_compat_str(
        r#"{"viewport": {"width": 800, "height": 500}}"#,
    )
    .expect("bare config");

    assert_eq!(config.viewport, Viewport::new(800, 500));
    assert_eq!(config.mode, ChartMode::Stock);
    assert_eq!(config.period, Period::OneYear);
    assert_eq!(config.insets, PlotInsets::default());
    assert_eq!(config.style, ChartStyle::default());
}

#[test]
fn partial_style_overrides_keep_other_defaults() {
    let config = ChartSessionConfig::from_json_compat_str(
        r#"{"viewport": {"width": 800, "height": 500}, "style": {"line_width": 3.5, "show_stock_info": false}}"#,
    )
    .expect("config");

    assert_eq!(config.style.line_width, 3.5);
    assert!(!config.style.show_stock_info);
    assert_eq!(config.style.fill_alpha, ChartStyle::default().fill_alpha);
}

#[test]
fn unsupported_schema_version_is_rejected() {
    let json = r#"{"schema_version": 99, "config": {"viewport": {"width": 800, "height": 500}}}"#;
    let err = ChartSessionConfig::from_json_compat_str(json).expect_err("future schema");
    assert!(matches!(err, ChartError::InvalidData(message) if message.contains("99")));
}

#[test]
fn garbage_is_invalid_data() {
    let err = ChartSessionConfig::from_json_compat_str("[]").expect_err("not a config");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn validation_rejects_collapsed_plot_and_bad_style() {
    let config = ChartSessionConfig::new(Viewport::new(120, 600));
    assert!(config.validate().is_err());

    let mut style = ChartStyle::default();
    style.highlight_alpha = 1.5;
    let config = ChartSessionConfig::new(Viewport::new(1000, 600)).with_style(style);
    assert!(matches!(config.validate(), Err(ChartError::InvalidData(_))));

    let mut style = ChartStyle::default();
    style.line_color = Color::rgba(0.0, 0.0, 0.0, -0.1);
    let config = ChartSessionConfig::new(Viewport::new(1000, 600)).with_style(style);
    assert!(config.validate().is_err());

    let config = ChartSessionConfig::new(Viewport::new(1000, 600)).with_insets(PlotInsets {
        left: -1.0,
        ..PlotInsets::default()
    });
    assert!(config.validate().is_err());
}

#[test]
fn default_config_plot_area_matches_insets() {
    let plot = ChartSessionConfig::default().plot_area().expect("plot area");
    assert_eq!(plot.width, 864.0);
    assert_eq!(plot.height, 416.0);
}
