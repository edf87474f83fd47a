use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_canvas::CanvasBackend;
use yew::prelude::*;
use web_sys::HtmlCanvasElement;
use gloo::utils::window;
use common::format::format_population;
use common::models::{HeatCell, Palette};
use crate::components::plot::{Plottable, PlotError, draw_highlight, clear_highlight};
use std::collections::{BTreeMap, BTreeSet};
use std::cmp::{min, max};
use std::rc::Rc;

#[derive(Clone)]
struct CellMapping {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    label: String,
}

/// The engine for the year by state heat map. Rows are years, oldest at the
/// top, and columns are states in alphabetical order. Colour runs from the
/// smallest to the largest population anywhere in the table.

pub struct HeatMapEngine {
    data: Rc<Vec<HeatCell>>,
    window_width: f64,
    dpr: f64,
    palette: Palette,
    hover_index: Option<usize>,
    cell_mappings: Vec<CellMapping>,
}

impl Plottable<Vec<HeatCell>> for HeatMapEngine {
    fn new() -> Self {
        HeatMapEngine {
            data: Rc::from(vec![]),
            window_width: 0.0,
            dpr: 1.0,
            palette: Palette::default(),
            hover_index: None,
            cell_mappings: vec![],
        }
    }

    fn set_props(&mut self, window_width: f64, palette: Palette) {
        self.window_width = window_width;
        self.palette = palette;
    }

    fn load_data(&mut self, data: Rc<Vec<HeatCell>>) {
        self.data = data;
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn get_width(&self) -> u32 {
        min(max(480, (self.window_width * 0.5) as u32), 900)
    }

    fn get_height(&self) -> u32 {
        let years = self.data.iter().map(|c| c.year).collect::<BTreeSet<i32>>().len() as u32;
        130 + 22 * max(years, 1)
    }

    fn get_heading(&self) -> String {
        "population by year".to_string()
    }

    fn redraw(&mut self, canvas: HtmlCanvasElement, inter_canvas: HtmlCanvasElement) -> Result<(), PlotError> {
        self.dpr = window().device_pixel_ratio().max(1.0);
        let canvas_width = (self.dpr * self.get_width() as f64) as u32;
        let canvas_height = (self.dpr * self.get_height() as f64) as u32;
        canvas.set_height(canvas_height);
        inter_canvas.set_height(canvas_height);
        canvas.set_width(canvas_width);
        inter_canvas.set_width(canvas_width);
        self.hover_index = None;

        let backend = CanvasBackend::with_canvas_object(canvas).ok_or(PlotError)?;
        let drawing_area = backend.into_drawing_area();

        let years = self.data.iter().map(|c| c.year).collect::<BTreeSet<i32>>();
        let states = self.data.iter().map(|c| c.state_name.as_str()).collect::<BTreeSet<&str>>();
        let cells = self.data
            .iter()
            .map(|c| ((c.year, c.state_name.as_str()), c.population))
            .collect::<BTreeMap<(i32, &str), i64>>();
        let low = self.data.iter().map(|c| c.population).min().ok_or(PlotError)?;
        let high = self.data.iter().map(|c| c.population).max().ok_or(PlotError)?;

        let left_margin = (50.0 * self.dpr) as i32;
        let bottom_margin = (120.0 * self.dpr) as i32;
        let top_margin = (4.0 * self.dpr) as i32;
        let cell_width = max(1, (canvas_width as i32 - left_margin) / states.len() as i32);
        let cell_height = max(1, (canvas_height as i32 - bottom_margin - top_margin) / years.len() as i32);
        let grid_bottom = top_margin + cell_height * years.len() as i32;
        let label_size = max((10.0 * self.dpr) as u32, 8);

        let border = ShapeStyle {
            color: BLACK.to_rgba(),
            filled: false,
            stroke_width: 1,
        };

        self.cell_mappings = vec![];
        for (row, year) in years.iter().enumerate() {
            let top = top_margin + row as i32 * cell_height;
            let year_style = TextStyle::from(("sans-serif", label_size).into_font())
                .color(&WHITE)
                .pos(Pos::new(HPos::Right, VPos::Center));
            drawing_area.draw(&Text::new(year.to_string(), (left_margin - 6, top + cell_height / 2), year_style))?;

            for (col, state) in states.iter().enumerate() {
                let Some(population) = cells.get(&(*year, *state)) else { continue };
                let left = left_margin + col as i32 * cell_width;
                let corners = [(left, top), (left + cell_width, top + cell_height)];

                let rgb = self.palette.colour((population - low) as f64, (high - low) as f64);
                drawing_area.draw(&Rectangle::new(corners, RGBColor(rgb.0, rgb.1, rgb.2).filled()))?;
                drawing_area.draw(&Rectangle::new(corners, border))?;

                self.cell_mappings.push(CellMapping {
                    left,
                    top,
                    right: left + cell_width,
                    bottom: top + cell_height,
                    label: format!("{} {}: {}", state, year, format_population(*population)),
                });
            }
        }

        let state_style = TextStyle::from(("sans-serif", label_size).into_font())
            .color(&WHITE)
            .transform(FontTransform::Rotate90)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for (col, state) in states.iter().enumerate() {
            let x = left_margin + col as i32 * cell_width + cell_width / 2;
            drawing_area.draw(&Text::new(state.to_string(), (x, grid_bottom + 6), state_style.clone()))?;
        }

        Ok(())
    }

    fn hover(&mut self, e: MouseEvent, inter_canvas: HtmlCanvasElement) -> Result<(), PlotError> {
        let x = (e.offset_x() as f64 * self.dpr) as i32;
        let y = (e.offset_y() as f64 * self.dpr) as i32;
        let hovered = self.cell_mappings
            .iter()
            .position(|m| x >= m.left && x < m.right && y >= m.top && y < m.bottom);

        if hovered != self.hover_index {
            self.hover_index = hovered;
            match hovered.and_then(|i| self.cell_mappings.get(i)) {
                Some(m) => {
                    let rect = (m.left as f64, m.top as f64, (m.right - m.left) as f64, (m.bottom - m.top) as f64);
                    draw_highlight(&inter_canvas, rect, &m.label, self.dpr)?;
                },
                None => clear_highlight(&inter_canvas)?,
            }
        }
        Ok(())
    }
}
