//! Bar chart of hours spent per project. [Visualizer] turns a registry snapshot into a
//! [ChartModel] and hands it to a [ChartRenderer]; it keeps no state besides the renderer.

pub mod terminal;

use anyhow::Result;
use tracing::trace;

use crate::projects::entities::ProjectTotals;

pub const AXIS_TITLE: &str = "Hours worked";

/// Digits kept after the decimal point when converting minutes into hours.
const HOUR_PRECISION: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl Rgba {
    const fn new(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Colors are handed out by project position and wrap around.
pub const PALETTE: [Rgba; 7] = [
    Rgba::new(255, 99, 132, 0.7),
    Rgba::new(54, 162, 235, 0.7),
    Rgba::new(255, 206, 86, 0.7),
    Rgba::new(75, 192, 192, 0.7),
    Rgba::new(153, 102, 255, 0.7),
    Rgba::new(255, 159, 64, 0.7),
    Rgba::new(96, 181, 116, 0.7),
];

pub fn palette_color(index: usize) -> Rgba {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub hours: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub axis_title: &'static str,
    pub bars: Vec<Bar>,
    pub legend: Vec<LegendEntry>,
}

/// Whatever draws the chart. Every call receives the complete chart, there are no partial
/// updates.
#[cfg_attr(test, mockall::automock)]
pub trait ChartRenderer {
    fn draw(&mut self, model: &ChartModel) -> Result<()>;
}

pub struct Visualizer<R> {
    renderer: R,
}

impl<R: ChartRenderer> Visualizer<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn model(totals: &ProjectTotals) -> ChartModel {
        let (bars, legend): (Vec<_>, Vec<_>) = totals
            .iter()
            .enumerate()
            .map(|(index, (name, minutes))| {
                let color = palette_color(index);
                (
                    Bar {
                        label: name.to_owned(),
                        hours: minutes_to_hours(minutes),
                        color,
                    },
                    LegendEntry {
                        label: name.to_owned(),
                        color,
                    },
                )
            })
            .unzip();

        ChartModel {
            axis_title: AXIS_TITLE,
            bars,
            legend,
        }
    }

    /// Redraws the chart from scratch. Callers are expected to invoke this after every registry
    /// change.
    pub fn render(&mut self, totals: &ProjectTotals) -> Result<()> {
        let model = Self::model(totals);
        trace!("Rendering {} bars", model.bars.len());
        self.renderer.draw(&model)
    }
}

pub fn minutes_to_hours(minutes: f64) -> f64 {
    let scale = 10f64.powi(HOUR_PRECISION);
    (minutes / 60. * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::projects::entities::ProjectTotals;

    use super::{minutes_to_hours, palette_color, MockChartRenderer, Visualizer, AXIS_TITLE, PALETTE};

    #[test]
    fn test_model_follows_insertion_order() {
        let totals: ProjectTotals = [("Zeta", 90.), ("Alpha", 30.), ("Mid", 0.)]
            .into_iter()
            .collect();

        let model = Visualizer::<MockChartRenderer>::model(&totals);

        assert_eq!(model.axis_title, AXIS_TITLE);
        let labels = model.bars.iter().map(|b| b.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["Zeta", "Alpha", "Mid"]);
        let hours = model.bars.iter().map(|b| b.hours).collect::<Vec<_>>();
        assert_eq!(hours, vec![1.5, 0.5, 0.]);
        for (index, (bar, entry)) in model.bars.iter().zip(&model.legend).enumerate() {
            assert_eq!(bar.label, entry.label);
            assert_eq!(bar.color, PALETTE[index]);
            assert_eq!(entry.color, bar.color);
        }
    }

    #[test]
    fn test_palette_wraps_around() {
        let totals: ProjectTotals = (0..9).map(|i| (format!("p{i}"), 1.)).collect();
        let model = Visualizer::<MockChartRenderer>::model(&totals);
        assert_eq!(model.bars[7].color, PALETTE[0]);
        assert_eq!(model.bars[8].color, PALETTE[1]);
        assert_eq!(palette_color(14), PALETTE[0]);
    }

    #[test]
    fn test_minutes_to_hours_precision() {
        assert_eq!(minutes_to_hours(1. / 60.), 0.00028);
        assert_eq!(minutes_to_hours(60.), 1.);
        assert_eq!(minutes_to_hours(0.), 0.);
    }

    #[test]
    fn test_render_draws_whole_model() -> Result<()> {
        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_draw()
            .withf(|model| model.bars.len() == 2 && model.legend.len() == 2)
            .times(1)
            .returning(|_| Ok(()));
        let mut visualizer = Visualizer::new(renderer);

        let totals: ProjectTotals = [("Alpha", 6.), ("Beta", 12.)].into_iter().collect();
        visualizer.render(&totals)?;
        Ok(())
    }

    #[test]
    fn test_render_of_empty_registry() -> Result<()> {
        let mut renderer = MockChartRenderer::new();
        renderer
            .expect_draw()
            .withf(|model| model.bars.is_empty() && model.legend.is_empty())
            .times(1)
            .returning(|_| Ok(()));
        Visualizer::new(renderer).render(&ProjectTotals::default())
    }
}
