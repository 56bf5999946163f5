use halfgauge::{Color, Easing, Gauge, GaugeCommand, GaugeConfig, SegmentSpec};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const PALETTE: [(&str, &str); 4] = [
    ("#f6c85f", "#ffe08a"),
    ("#6f4e7c", "#9b7bb8"),
    ("#0b84a5", "#3fb0d0"),
    ("#ca472f", "#f0705a"),
];

fn random_data(rng: &mut impl Rng) -> Vec<SegmentSpec> {
    PALETTE
        .iter()
        .map(|&(color, highlight)| {
            SegmentSpec::builder()
                .value(rng.random_range(5.0..50.0))
                .color(color.parse::<Color>().unwrap())
                .highlight(highlight.parse::<Color>().unwrap())
                .build()
        })
        .collect()
}

fn main() -> Result<(), halfgauge::GaugeError> {
    tracing_subscriber::fmt::init();

    let config = GaugeConfig::builder()
        .title("halfgauge - channel demo".to_string())
        .animation_steps(45)
        .animation_easing(Easing::EaseInOutQuad)
        .percentage_inner_cutout(60.0)
        .build();
    let mut gauge = Gauge::new(config);

    let (sender, receiver) = mpsc::channel();

    // Feed a fresh data set every couple of seconds; each one restarts the
    // gauge's animation sequence.
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            if sender.send(GaugeCommand::SetData(random_data(&mut rng))).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(2000));
        }
    });

    println!("Displaying gauge fed from a background thread.");
    println!("Hover a segment to see its highlight color; close the window to exit.");

    gauge.show_with_commands(receiver)
}
