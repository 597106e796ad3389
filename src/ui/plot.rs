//! ASCII plotting of sampled graph series.

use crate::graph::{GraphSettings, Series};

const GLYPHS: [char; 6] = ['*', 'o', '+', 'x', '#', '@'];
const GRID: char = '·';

/// Character cell dimensions of a plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotSize {
    pub width: usize,
    pub height: usize,
}

impl Default for PlotSize {
    fn default() -> Self {
        Self {
            width: 72,
            height: 24,
        }
    }
}

struct Canvas {
    cells: Vec<Vec<char>>,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Canvas {
    fn new(size: PlotSize, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            cells: vec![vec![' '; size.width.max(2)]; size.height.max(2)],
            x_range,
            y_range,
        }
    }

    fn width(&self) -> usize {
        self.cells[0].len()
    }

    fn height(&self) -> usize {
        self.cells.len()
    }

    fn column(&self, x: f64) -> Option<usize> {
        let (min, max) = self.x_range;
        let column = ((x - min) / (max - min) * (self.width() - 1) as f64).round();
        (column.is_finite() && column >= 0.0 && column <= (self.width() - 1) as f64)
            .then_some(column as usize)
    }

    fn row(&self, y: f64) -> Option<usize> {
        let (min, max) = self.y_range;
        let row = ((max - y) / (max - min) * (self.height() - 1) as f64).round();
        (row.is_finite() && row >= 0.0 && row <= (self.height() - 1) as f64).then_some(row as usize)
    }

    /// Dotted lines at every multiple of `spacing` data units.
    fn draw_grid(&mut self, spacing: f64) {
        let columns: Vec<usize> = multiples(self.x_range, spacing)
            .filter_map(|x| self.column(x))
            .collect();
        let rows: Vec<usize> = multiples(self.y_range, spacing)
            .filter_map(|y| self.row(y))
            .collect();

        for (r, line) in self.cells.iter_mut().enumerate() {
            for (c, cell) in line.iter_mut().enumerate() {
                if rows.contains(&r) || columns.contains(&c) {
                    *cell = GRID;
                }
            }
        }
    }

    fn draw_axes(&mut self) {
        let axis_row = self.row(0.0);
        let axis_column = self.column(0.0);

        if let Some(r) = axis_row {
            self.cells[r].iter_mut().for_each(|cell| *cell = '-');
        }
        if let Some(c) = axis_column {
            for line in &mut self.cells {
                line[c] = '|';
            }
        }
        if let (Some(r), Some(c)) = (axis_row, axis_column) {
            self.cells[r][c] = '+';
        }
    }

    fn draw_series(&mut self, series: &Series, glyph: char) {
        for (index, (x, y)) in series.points.defined().enumerate() {
            if series.dashed && index % 2 == 1 {
                continue;
            }
            if let (Some(c), Some(r)) = (self.column(x), self.row(y)) {
                self.cells[r][c] = glyph;
            }
        }
    }

    fn into_string(self) -> String {
        self.cells
            .into_iter()
            .map(|line| line.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn multiples(range: (f64, f64), spacing: f64) -> impl Iterator<Item = f64> {
    let (first, last) = if spacing > 0.0 {
        ((range.0 / spacing).ceil() as i64, (range.1 / spacing).floor() as i64)
    } else {
        (1, 0)
    };
    (first..=last).map(move |k| k as f64 * spacing)
}

/// Render `series` onto a character canvas followed by a legend.
///
/// Axes are drawn where zero lies inside the ranges; grid lines follow
/// `settings.grid_density` in data units when the grid is enabled. Dashed
/// series plot every other defined point.
pub fn render_plot(series: &[Series], settings: &GraphSettings, size: PlotSize) -> String {
    let mut canvas = Canvas::new(size, settings.x_range, settings.y_range);

    if settings.show_grid {
        canvas.draw_grid(f64::from(settings.grid_density));
    }
    canvas.draw_axes();
    for (index, curve) in series.iter().enumerate() {
        canvas.draw_series(curve, GLYPHS[index % GLYPHS.len()]);
    }

    let mut out = canvas.into_string();
    for (index, curve) in series.iter().enumerate() {
        out.push_str(&format!("\n{} {}", GLYPHS[index % GLYPHS.len()], curve.name));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Points;

    fn line(name: &str, dashed: bool) -> Series {
        Series {
            name: name.to_string(),
            color: "hsl(0, 70%, 50%)".to_string(),
            dashed,
            points: Points {
                x: vec![-1.0, 0.0, 1.0],
                y: vec![Some(-1.0), Some(0.0), Some(1.0)],
            },
        }
    }

    fn settings() -> GraphSettings {
        GraphSettings {
            show_grid: false,
            x_range: (-1.0, 1.0),
            y_range: (-1.0, 1.0),
            ..GraphSettings::default()
        }
    }

    const TINY: PlotSize = PlotSize {
        width: 3,
        height: 3,
    };

    #[test]
    fn test_render_identity() {
        let rendered = render_plot(&[line("x", false)], &settings(), TINY);
        assert_eq!(rendered, " |*\n-*-\n*| \n* x");
    }

    #[test]
    fn test_dashed_series_skips_points() {
        let rendered = render_plot(&[line("d/dx(x)", true)], &settings(), TINY);
        assert_eq!(rendered, " |*\n-+-\n*| \n* d/dx(x)");
    }

    #[test]
    fn test_gaps_are_not_drawn() {
        let mut curve = line("1/x", false);
        curve.points.y[1] = None;
        let rendered = render_plot(&[curve], &settings(), TINY);
        assert_eq!(rendered.lines().nth(1), Some("-+-"));
    }

    #[test]
    fn test_grid_lines() {
        let settings = GraphSettings {
            show_grid: true,
            grid_density: 5,
            x_range: (-10.0, 10.0),
            y_range: (-10.0, 10.0),
            ..GraphSettings::default()
        };
        let rendered = render_plot(&[], &settings, PlotSize { width: 5, height: 5 });
        let rows: Vec<&str> = rendered.lines().collect();
        assert_eq!(rows[0], "··|··");
        assert_eq!(rows[2], "--+--");
    }
}
