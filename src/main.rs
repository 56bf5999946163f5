use halfgauge::{Color, Gauge, GaugeConfig, GaugeError, SegmentSpec};

fn main() -> Result<(), GaugeError> {
    tracing_subscriber::fmt::init();

    let config = GaugeConfig::builder()
        .title("halfgauge".to_string())
        .window_width(480)
        .window_height(280)
        .build();

    let mut gauge = Gauge::new(config);
    gauge.set_data(vec![
        SegmentSpec::builder()
            .value(35.0)
            .color("#e74c3c".parse::<Color>().unwrap())
            .highlight("#ff6d5b".parse::<Color>().unwrap())
            .label("Red".to_string())
            .build(),
        SegmentSpec::builder()
            .value(45.0)
            .color("#2ecc71".parse::<Color>().unwrap())
            .highlight("#4ce98c".parse::<Color>().unwrap())
            .label("Green".to_string())
            .build(),
        SegmentSpec::builder()
            .value(20.0)
            .color("#3498db".parse::<Color>().unwrap())
            .highlight("#54b6f7".parse::<Color>().unwrap())
            .label("Blue".to_string())
            .build(),
    ])?;

    gauge.show()
}
