use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_canvas::CanvasBackend;
use yew::prelude::*;
use web_sys::HtmlCanvasElement;
use gloo::utils::window;
use serde::{Deserialize, Serialize};
use common::models::Palette;
use crate::components::plot::{Plottable, PlotError};
use std::f64::consts::PI;
use std::rc::Rc;

const SIZE: f64 = 130.0;
const INNER_RADIUS: f64 = 45.0;
const ARC_STEPS: usize = 90;
const TEXT_COLOUR: RGBColor = RGBColor(0x29, 0xb5, 0xe8);

/// One percentage to show as a donut, with the name of its colour pair.

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct DonutValue {
    pub label: String,
    pub percentage: u32,
    pub colour: String,
}

/// Returns the bright and dark hex colours for a named donut colour. Unknown
/// names fall back to orange.

fn colour_pair(name: &str) -> (&'static str, &'static str) {
    match name {
        "blue" => ("29b5e8", "155F7A"),
        "green" => ("27AE60", "12783D"),
        "red" => ("E74C3C", "781F16"),
        "purple" => ("8E44AD", "4A235A"),
        _ => ("F39C12", "875A12"),
    }
}

fn hex_colour(hex: &str) -> Result<RGBColor, PlotError> {
    let bytes = hex::decode(hex)?;
    match bytes.as_slice() {
        [r, g, b] => Ok(RGBColor(*r, *g, *b)),
        _ => Err(PlotError),
    }
}

/// The points of a ring segment running clockwise from the top of the circle
/// through the given fraction of a full turn.

fn ring_segment(centre: (f64, f64), inner: f64, outer: f64, fraction: f64) -> Vec<(i32, i32)> {
    let steps = ((ARC_STEPS as f64 * fraction).ceil() as usize).max(1);
    let point = |radius: f64, i: usize| {
        let angle = 2.0 * PI * fraction * i as f64 / steps as f64;
        (
            (centre.0 + radius * angle.sin()).round() as i32,
            (centre.1 - radius * angle.cos()).round() as i32,
        )
    };

    let mut points = (0..=steps).map(|i| point(outer, i)).collect::<Vec<(i32, i32)>>();
    points.extend((0..=steps).rev().map(|i| point(inner, i)));
    points
}

/// The engine for the migration donuts. The dark ring is the whole, and the
/// bright arc over it is the percentage.

pub struct DonutEngine {
    data: Rc<DonutValue>,
    dpr: f64,
}

impl Plottable<DonutValue> for DonutEngine {
    fn new() -> Self {
        DonutEngine {
            data: Rc::from(DonutValue {
                label: String::new(),
                percentage: 0,
                colour: String::new(),
            }),
            dpr: 1.0,
        }
    }

    fn set_props(&mut self, _window_width: f64, _palette: Palette) {}

    fn load_data(&mut self, data: Rc<DonutValue>) {
        self.data = data;
    }

    fn is_empty(&self) -> bool {
        false
    }

    fn get_width(&self) -> u32 {
        SIZE as u32
    }

    fn get_height(&self) -> u32 {
        SIZE as u32
    }

    fn get_heading(&self) -> String {
        self.data.label.clone()
    }

    fn redraw(&mut self, canvas: HtmlCanvasElement, inter_canvas: HtmlCanvasElement) -> Result<(), PlotError> {
        self.dpr = window().device_pixel_ratio().max(1.0);
        let size = (SIZE * self.dpr) as u32;
        canvas.set_height(size);
        inter_canvas.set_height(size);
        canvas.set_width(size);
        inter_canvas.set_width(size);

        let backend = CanvasBackend::with_canvas_object(canvas).ok_or(PlotError)?;
        let drawing_area = backend.into_drawing_area();

        let (bright, dark) = colour_pair(&self.data.colour);
        let centre = (size as f64 / 2.0, size as f64 / 2.0);
        let outer = size as f64 / 2.0 - 1.0;
        let inner = INNER_RADIUS * self.dpr;

        drawing_area.draw(&Polygon::new(ring_segment(centre, inner, outer, 1.0), hex_colour(dark)?.filled()))?;
        let fraction = self.data.percentage.min(100) as f64 / 100.0;
        if fraction > 0.0 {
            drawing_area.draw(&Polygon::new(ring_segment(centre, inner, outer, fraction), hex_colour(bright)?.filled()))?;
        }

        let style = TextStyle::from(("sans-serif", 26.0 * self.dpr).into_font().style(FontStyle::Bold))
            .color(&TEXT_COLOUR)
            .pos(Pos::new(HPos::Center, VPos::Center));
        drawing_area.draw(&Text::new(
            format!("{} %", self.data.percentage),
            (centre.0 as i32, centre.1 as i32),
            style,
        ))?;

        Ok(())
    }

    fn hover(&mut self, _e: MouseEvent, _inter_canvas: HtmlCanvasElement) -> Result<(), PlotError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_pairs_decode() {
        for name in ["blue", "green", "red", "purple", "anything"] {
            let (bright, dark) = colour_pair(name);
            assert!(hex_colour(bright).is_ok());
            assert!(hex_colour(dark).is_ok());
        }
        assert!(hex_colour("12").is_err());
    }

    #[test]
    fn segments_start_at_the_top() {
        let points = ring_segment((100.0, 100.0), 40.0, 60.0, 0.25);
        assert_eq!(points[0], (100, 40));
        assert_eq!(points[points.len() - 1], (100, 60));
    }
}
