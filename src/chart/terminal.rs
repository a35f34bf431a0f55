use std::io::Write;

use ansi_term::{Colour, Style};
use anyhow::Result;

use super::{ChartModel, ChartRenderer, Rgba};

const DEFAULT_BAR_WIDTH: usize = 40;
const BAR_BLOCK: &str = "█";
const SWATCH: &str = "■■";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Draws horizontal bars scaled to the largest project, followed by a color legend.
pub struct TerminalChart<W> {
    out: W,
    bar_width: usize,
    colored: bool,
    clear_screen: bool,
}

impl<W: Write> TerminalChart<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bar_width: DEFAULT_BAR_WIDTH,
            colored: true,
            clear_screen: false,
        }
    }

    pub fn with_color(self, colored: bool) -> Self {
        Self { colored, ..self }
    }

    /// Wipe the terminal before every redraw, so a live session keeps a single chart on screen.
    pub fn with_clear_screen(self, clear_screen: bool) -> Self {
        Self {
            clear_screen,
            ..self
        }
    }

    pub fn with_bar_width(self, bar_width: usize) -> Self {
        Self { bar_width, ..self }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn style(&self, color: Rgba) -> Style {
        if self.colored {
            Colour::RGB(color.red, color.green, color.blue).normal()
        } else {
            Style::new()
        }
    }

    fn bar_length(&self, hours: f64, max_hours: f64) -> usize {
        if max_hours <= 0. {
            return 0;
        }
        (hours / max_hours * self.bar_width as f64).round() as usize
    }
}

impl<W: Write> ChartRenderer for TerminalChart<W> {
    fn draw(&mut self, model: &ChartModel) -> Result<()> {
        let mut buffer = String::new();
        if self.clear_screen {
            buffer.push_str(CLEAR_SCREEN);
        }
        buffer.push_str(model.axis_title);
        buffer.push('\n');

        if model.bars.is_empty() {
            buffer.push_str("No projects yet\n");
        }

        let label_width = model
            .bars
            .iter()
            .map(|bar| bar.label.chars().count())
            .max()
            .unwrap_or(0);
        let max_hours = model.bars.iter().map(|bar| bar.hours).fold(0., f64::max);

        for bar in &model.bars {
            let blocks = BAR_BLOCK.repeat(self.bar_length(bar.hours, max_hours));
            buffer.push_str(&format!(
                "{:<label_width$} {} {:.5}\n",
                bar.label,
                self.style(bar.color).paint(blocks),
                bar.hours,
            ));
        }

        if !model.legend.is_empty() {
            buffer.push('\n');
        }
        for entry in &model.legend {
            buffer.push_str(&format!(
                "{} {}\n",
                self.style(entry.color).paint(SWATCH),
                entry.label
            ));
        }

        self.out.write_all(buffer.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::{
        chart::{ChartRenderer, Visualizer},
        projects::entities::ProjectTotals,
    };

    use super::TerminalChart;

    fn draw_plain(totals: &ProjectTotals) -> Result<String> {
        let mut chart = TerminalChart::new(vec![])
            .with_color(false)
            .with_bar_width(10);
        chart.draw(&Visualizer::<TerminalChart<Vec<u8>>>::model(totals))?;
        Ok(String::from_utf8(chart.into_inner())?)
    }

    #[test]
    fn test_draws_bars_and_legend() -> Result<()> {
        let totals: ProjectTotals = [("Alpha", 120.), ("Be", 60.)].into_iter().collect();

        let output = draw_plain(&totals)?;

        assert_eq!(
            output,
            "Hours worked\n\
             Alpha ██████████ 2.00000\n\
             Be    █████ 1.00000\n\
             \n\
             ■■ Alpha\n\
             ■■ Be\n"
        );
        Ok(())
    }

    #[test]
    fn test_all_zero_projects_have_empty_bars() -> Result<()> {
        let totals: ProjectTotals = [("Alpha", 0.)].into_iter().collect();
        let output = draw_plain(&totals)?;
        assert!(output.contains("Alpha  0.00000\n"));
        Ok(())
    }

    #[test]
    fn test_empty_chart() -> Result<()> {
        let output = draw_plain(&ProjectTotals::default())?;
        assert_eq!(output, "Hours worked\nNo projects yet\n");
        Ok(())
    }

    #[test]
    fn test_colored_output_and_clear_screen() -> Result<()> {
        let totals: ProjectTotals = [("Alpha", 30.)].into_iter().collect();
        let mut chart = TerminalChart::new(vec![]).with_clear_screen(true);
        chart.draw(&Visualizer::<TerminalChart<Vec<u8>>>::model(&totals))?;
        let output = String::from_utf8(chart.into_inner())?;

        assert!(output.starts_with("\x1b[2J\x1b[H"));
        assert!(output.contains("\x1b[38;2;255;99;132m"));
        Ok(())
    }
}
