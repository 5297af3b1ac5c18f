use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;

use super::ScatterPoint;

const FIGURE_SIZE: (u32, u32) = (800, 600);
const SERIES_COLORS: [RGBColor; 2] = [BLUE, RED];

/// Equal-width bin counts over `[lo, hi]`. The last bin is closed on the right;
/// values outside the range (and NaN) are dropped.
pub fn histogram(values: &[f64], lo: f64, hi: f64, bins: usize) -> Vec<usize> {
    let bins = bins.max(1);
    let mut counts = vec![0usize; bins];
    let width = (hi - lo) / bins as f64;
    for &v in values {
        if !(lo..=hi).contains(&v) {
            continue;
        }
        let idx = if width > 0.0 { ((v - lo) / width) as usize } else { 0 };
        counts[idx.min(bins - 1)] += 1;
    }
    counts
}

fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Widen `(lo, hi)` by `frac` of its span on both sides; a single point gets a unit margin.
fn padded((lo, hi): (f64, f64), frac: f64) -> (f64, f64) {
    let pad = if hi > lo {
        (hi - lo) * frac
    } else {
        (lo.abs() * frac).max(1.0)
    };
    (lo - pad, hi + pad)
}

/// Overlaid, half-transparent histograms of two length samples on shared bins.
pub fn pair_histogram(path: &Path, samples: [(&str, &[f64]); 2], bins: usize) -> Result<()> {
    let (lo, hi) = value_range(samples.iter().flat_map(|(_, v)| v.iter().copied()))
        .context("no finite lengths to plot")?;
    let hi = if hi > lo { hi } else { lo + 1.0 };
    let bins = bins.max(1);
    let width = (hi - lo) / bins as f64;
    let counts: Vec<Vec<usize>> = samples
        .iter()
        .map(|(_, v)| histogram(v, lo, hi, bins))
        .collect();
    let ymax = counts.iter().flatten().copied().max().unwrap_or(0).max(1) as f64 * 1.05;

    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Gene Length Distributions: {} vs {}", samples[0].0, samples[1].0),
            ("sans-serif", 22).into_font(),
        )
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(lo..hi, 0f64..ymax)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Gene Length (bp)")
        .y_desc("Count")
        .draw()?;

    for ((label, _), (counts, color)) in samples.iter().zip(counts.iter().zip(SERIES_COLORS)) {
        let style = color.mix(0.5).filled();
        chart
            .draw_series(counts.iter().enumerate().filter(|&(_, &c)| c > 0).map(|(i, &c)| {
                let x0 = lo + i as f64 * width;
                Rectangle::new([(x0, 0.0), (x0 + width, c as f64)], style)
            }))?
            .label(*label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], style));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()
        .with_context(|| format!("cannot write '{}'", path.display()))?;
    Ok(())
}

/// Genome size against median gene length, one labelled point per genome.
pub fn size_vs_median(path: &Path, points: &[ScatterPoint]) -> Result<()> {
    let (x0, x1) = padded(
        value_range(points.iter().map(|p| p.genome_size_bp as f64)).context("no points to plot")?,
        0.08,
    );
    let (y0, y1) = padded(
        value_range(points.iter().map(|p| p.median_length)).context("no points to plot")?,
        0.08,
    );

    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Genome Size vs. Median Gene Length", ("sans-serif", 22).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)?;
    chart
        .configure_mesh()
        .x_desc("Genome Size (bp)")
        .y_desc("Median Gene Length (bp)")
        .draw()?;

    chart.draw_series(points.iter().filter(|p| p.median_length.is_finite()).map(|p| {
        EmptyElement::at((p.genome_size_bp as f64, p.median_length))
            + Circle::new((0, 0), 5, BLUE.filled())
            + Text::new(p.label.clone(), (7, -14), ("sans-serif", 12).into_font())
    }))?;
    root.present()
        .with_context(|| format!("cannot write '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_cover_closed_range() {
        let counts = histogram(&[0.0, 2.5, 5.0, 7.5, 10.0, 11.0, f64::NAN], 0.0, 10.0, 4);
        assert_eq!(counts, vec![1, 1, 1, 2]);
        assert_eq!(histogram(&[3.0, 3.0], 3.0, 3.0, 5), vec![2, 0, 0, 0, 0]);
        assert_eq!(histogram(&[1.0], 0.0, 2.0, 0), vec![1]);
    }

    #[test]
    fn ranges_skip_non_finite() {
        assert_eq!(value_range([3.0, f64::NAN, -1.0, 8.0].into_iter()), Some((-1.0, 8.0)));
        assert_eq!(value_range(std::iter::empty::<f64>()), None);
        assert_eq!(padded((10.0, 20.0), 0.1), (9.0, 21.0));
        assert_eq!(padded((5.0, 5.0), 0.1), (4.0, 6.0));
    }

    #[test]
    fn writes_svg_figures() {
        let dir = tempfile::tempdir().unwrap();
        let hist = dir.path().join("pair.hist.svg");
        pair_histogram(&hist, [("Buchnera", &[300.0, 450.0, 600.0]), ("Ecoli", &[420.0, 900.0])], 10).unwrap();
        let svg = std::fs::read_to_string(&hist).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Buchnera"));

        let scatter = dir.path().join("scatter.svg");
        let points = vec![
            ScatterPoint { label: "Buchnera".into(), genome_size_bp: 640_681, median_length: 900.0 },
            ScatterPoint { label: "Ecoli_K12".into(), genome_size_bp: 4_641_652, median_length: 1_050.0 },
        ];
        size_vs_median(&scatter, &points).unwrap();
        assert!(std::fs::read_to_string(&scatter).unwrap().contains("Ecoli_K12"));

        assert!(pair_histogram(&dir.path().join("none.svg"), [("a", &[]), ("b", &[])], 10).is_err());
    }
}
