use std::path::Path;

use console::Style;
use sunspot_core::detection::Detection;
use sunspot_core::frame::Frame;
use sunspot_core::geometry::CalibrationGeometry;
use sunspot_core::rotation::{Observer, RotationFit, RotationSample};
use sunspot_core::series::Series;
use sunspot_core::tracking::{SessionSummary, TrackPhase};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    good: Style,
    bad: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            good: Style::new().green(),
            bad: Style::new().red(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }

    fn heading(&self, text: &str) {
        println!();
        println!("  {}", self.title.apply_to(text));
        println!(
            "  {}",
            self.title
                .apply_to("\u{2550}".repeat(text.chars().count()))
        );
        println!();
    }

    fn row(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {:<14}{}", self.label.apply_to(label), self.value.apply_to(value));
    }
}

pub fn print_image_summary(
    file: &Path,
    hdu_count: usize,
    frame: &Frame,
    geometry: &CalibrationGeometry,
    observer: Option<&Observer>,
) {
    let s = Styles::new();
    s.heading("Solar Image");

    println!("  {:<14}{}", s.label.apply_to("File"), s.path.apply_to(file.display()));
    s.row("HDUs", hdu_count);
    s.row("Dimensions", format!("{}x{}", frame.width(), frame.height()));
    println!();

    println!("  {}", s.header.apply_to("Disk"));
    s.row("  Radius", format!("{} px", geometry.disk_radius_px));
    s.row(
        "  Center",
        format!("({}, {})", geometry.disk_center_px.0, geometry.disk_center_px.1),
    );
    s.row("  Resolution", format!("{} px", geometry.resolution));
    println!();

    match observer {
        Some(obs) => {
            println!("  {}", s.header.apply_to("Observer"));
            s.row("  B0", format!("{:.3}\u{b0}", obs.b0_deg));
            s.row("  L0", format!("{:.3}\u{b0}", obs.l0_deg));
            s.row("  Roll", format!("{:.3}\u{b0}", obs.crota2_deg));
        }
        None => println!(
            "  {:<14}{}",
            s.header.apply_to("Observer"),
            s.disabled.apply_to("not in header")
        ),
    }
    println!();
}

pub fn print_detection_summary(file: &Path, strategy: &str, detection: &Detection) {
    let s = Styles::new();
    s.heading("Sunspot Detection");

    println!("  {:<14}{}", s.label.apply_to("File"), s.path.apply_to(file.display()));
    s.row("Clustering", strategy);
    s.row("Candidates", detection.raw.len());
    s.row("Spots", detection.spots.len());
    println!();

    if detection.is_empty() {
        println!("  {}", s.disabled.apply_to("No sunspots found"));
        println!();
        return;
    }

    println!(
        "  {:>4}  {:>16}  {:>20}  {:>7}",
        s.header.apply_to("#"),
        s.header.apply_to("Centroid"),
        s.header.apply_to("Box (x, y, w, h)"),
        s.header.apply_to("Members")
    );
    for (i, spot) in detection.spots.iter().enumerate() {
        let b = spot.bbox;
        println!(
            "  {:>4}  {:>16}  {:>20}  {:>7}",
            i + 1,
            format!("({:.1}, {:.1})", spot.centroid.x, spot.centroid.y),
            format!("{}, {}, {}, {}", b.x, b.y, b.width, b.height),
            spot.members
        );
    }
    println!();
}

pub fn print_tracking_summary(series: &Series, summary: &SessionSummary) {
    let s = Styles::new();
    s.heading("Tracking");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Series"),
        s.path.apply_to(series.dir().display())
    );
    s.row("Spots", summary.spots);
    println!(
        "  {:<14}{}",
        s.label.apply_to("Completed"),
        s.good.apply_to(summary.count(TrackPhase::Completed))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Failed"),
        s.bad.apply_to(summary.count(TrackPhase::Failed))
    );
    if summary.cancelled {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Cancelled"),
            s.disabled.apply_to(format!(
                "{} of {} spots not tracked",
                summary.spots.saturating_sub(summary.outcomes.len()),
                summary.spots
            ))
        );
    }
    s.row("Saved", summary.persisted.len());
    println!();

    for (i, outcome) in summary.outcomes.iter().enumerate() {
        let phase = match outcome.phase {
            TrackPhase::Completed => s.good.apply_to(outcome.phase.to_string()),
            _ => s.bad.apply_to(outcome.phase.to_string()),
        };
        let end = outcome
            .end
            .map(|p| format!("({:.1}, {:.1})", p.x, p.y))
            .unwrap_or_else(|| "-".into());
        println!(
            "    {}. {:<10} ({:.1}, {:.1}) -> {}",
            s.label.apply_to(i + 1),
            phase,
            outcome.start.x,
            outcome.start.y,
            end
        );
    }
    println!();
}

pub fn print_fit_summary(samples: &[RotationSample], fit: &RotationFit) {
    let s = Styles::new();
    s.heading("Differential Rotation");

    println!(
        "  {:>10}  {:>14}  {:>12}",
        s.header.apply_to("Latitude"),
        s.header.apply_to("Omega [deg/d]"),
        s.header.apply_to("Period [d]")
    );
    for sample in samples {
        println!(
            "  {:>10.2}  {:>14.3}  {:>12.2}",
            sample.latitude_deg, sample.omega_deg_per_day, sample.period_days
        );
    }
    println!();

    println!("  {}", s.header.apply_to("omega = a + b sin\u{b2}(B)"));
    s.row("  a", format!("{:.4} deg/day", fit.a));
    s.row("  b", format!("{:.4} deg/day", fit.b));
    s.row("  R\u{b2}", format!("{:.4}", fit.r_squared));
    s.row("  Samples", fit.samples);
    if fit.a.abs() > f64::EPSILON {
        s.row("  Period", format!("{:.2} days at the equator", 360.0 / fit.a));
    }
    println!();
}
