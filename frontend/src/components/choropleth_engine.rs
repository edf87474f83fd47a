use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_canvas::CanvasBackend;
use yew::prelude::*;
use web_sys::HtmlCanvasElement;
use gloo::utils::window;
use common::format::format_population;
use common::models::{Palette, StatePopulation};
use common::palette::Rgb;
use common::tiles::{tile_position, GRID_COLUMNS, GRID_ROWS};
use crate::components::plot::{Plottable, PlotError, draw_highlight, clear_highlight};
use std::cmp::{min, max};
use std::rc::Rc;
use log::warn;

/// Steps in the colour legend under the map.

const LEGEND_STEPS: i32 = 60;

/// The backend pixel bounds of a drawn state tile, for hover lookups.

#[derive(Clone)]
struct TileMapping {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    name: String,
    population: i64,
}

/// Whether white text reads better than black on the given colour.

pub fn is_dark(rgb: Rgb) -> bool {
    0.299 * rgb.0 as f64 + 0.587 * rgb.1 as f64 + 0.114 * (rgb.2 as f64) < 140.0
}

/// The engine for the tile grid choropleth. Every state is a square placed on
/// a grid roughly matching its position on the map, shaded by population on a
/// scale from zero to the most populous state of the year.

pub struct ChoroplethEngine {
    data: Rc<Vec<StatePopulation>>,
    window_width: f64,
    dpr: f64,
    palette: Palette,
    hover_index: Option<usize>,
    tile_mappings: Vec<TileMapping>,
}

impl ChoroplethEngine {
    fn tile_size(&self) -> i32 {
        (self.dpr * self.get_width() as f64) as i32 / GRID_COLUMNS as i32
    }
}

impl Plottable<Vec<StatePopulation>> for ChoroplethEngine {
    fn new() -> Self {
        ChoroplethEngine {
            data: Rc::from(vec![]),
            window_width: 0.0,
            dpr: 1.0,
            palette: Palette::default(),
            hover_index: None,
            tile_mappings: vec![],
        }
    }

    fn set_props(&mut self, window_width: f64, palette: Palette) {
        self.window_width = window_width;
        self.palette = palette;
    }

    fn load_data(&mut self, data: Rc<Vec<StatePopulation>>) {
        self.data = data;
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn get_width(&self) -> u32 {
        min(max(480, (self.window_width * 0.5) as u32), 900)
    }

    /// The grid plus one more row of tiles for the legend.

    fn get_height(&self) -> u32 {
        self.get_width() * (GRID_ROWS as u32 + 1) / GRID_COLUMNS as u32
    }

    fn get_heading(&self) -> String {
        "total population distribution".to_string()
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

        let tile = self.tile_size();
        let gap = max(1, tile / 20);
        let font_size = max((tile as f64 / 3.2) as u32, (8.0 * self.dpr) as u32);
        let max_population = self.data.iter().map(|s| s.population).max().ok_or(PlotError)? as f64;

        self.tile_mappings = vec![];
        for s in self.data.iter() {
            let Some((col, row)) = tile_position(&s.state_code) else {
                warn!("no map tile for state code {}", s.state_code);
                continue;
            };
            let left = col as i32 * tile + gap;
            let top = row as i32 * tile + gap;
            let right = left + tile - 2 * gap;
            let bottom = top + tile - 2 * gap;

            let rgb = self.palette.colour(s.population as f64, max_population);
            drawing_area.draw(&Rectangle::new([(left, top), (right, bottom)], RGBColor(rgb.0, rgb.1, rgb.2).filled()))?;

            let text_colour = if is_dark(rgb) { WHITE } else { BLACK };
            let style = TextStyle::from(("sans-serif", font_size).into_font())
                .color(&text_colour)
                .pos(Pos::new(HPos::Center, VPos::Center));
            drawing_area.draw(&Text::new(s.state_code.clone(), ((left + right) / 2, (top + bottom) / 2), style))?;

            self.tile_mappings.push(TileMapping {
                left,
                top,
                right,
                bottom,
                name: s.state_name.clone(),
                population: s.population,
            });
        }

        // legend: a strip running over the whole scale, labelled at both ends
        let legend_left = tile;
        let legend_top = GRID_ROWS as i32 * tile + tile / 4;
        let legend_width = canvas_width as i32 - 2 * tile;
        let legend_height = max(4, tile / 5);
        let step_width = max(1, legend_width / LEGEND_STEPS);
        for i in 0..LEGEND_STEPS {
            let rgb = self.palette.colour(i as f64, (LEGEND_STEPS - 1) as f64);
            let x0 = legend_left + i * step_width;
            drawing_area.draw(&Rectangle::new(
                [(x0, legend_top), (x0 + step_width, legend_top + legend_height)],
                RGBColor(rgb.0, rgb.1, rgb.2).filled(),
            ))?;
        }

        let label_style = TextStyle::from(("sans-serif", font_size).into_font()).color(&WHITE);
        let label_top = legend_top + legend_height + gap * 2;
        drawing_area.draw(&Text::new(
            "0".to_string(),
            (legend_left, label_top),
            label_style.pos(Pos::new(HPos::Left, VPos::Top)),
        ))?;
        drawing_area.draw(&Text::new(
            format_population(max_population as i64),
            (legend_left + LEGEND_STEPS * step_width, label_top),
            label_style.pos(Pos::new(HPos::Right, VPos::Top)),
        ))?;

        Ok(())
    }

    fn hover(&mut self, e: MouseEvent, inter_canvas: HtmlCanvasElement) -> Result<(), PlotError> {
        let x = (e.offset_x() as f64 * self.dpr) as i32;
        let y = (e.offset_y() as f64 * self.dpr) as i32;
        let hovered = self.tile_mappings
            .iter()
            .position(|m| x >= m.left && x <= m.right && y >= m.top && y <= m.bottom);

        if hovered != self.hover_index {
            self.hover_index = hovered;
            match hovered.and_then(|i| self.tile_mappings.get(i)) {
                Some(m) => {
                    let label = format!("{}: {}", m.name, format_population(m.population));
                    let rect = (m.left as f64, m.top as f64, (m.right - m.left) as f64, (m.bottom - m.top) as f64);
                    draw_highlight(&inter_canvas, rect, &label, self.dpr)?;
                },
                None => clear_highlight(&inter_canvas)?,
            }
        }
        Ok(())
    }
}
