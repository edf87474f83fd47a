use common::models::{DashboardSelection, Palette};
use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlCanvasElement, CanvasRenderingContext2d};
use wasm_bindgen::JsCast;
use crate::util::get;
use serde::de::DeserializeOwned;
use std::rc::Rc;
use std::cell::RefCell;
use yew_hooks::prelude::use_window_size;
use std::error::Error;

pub struct PlotError;

impl<E: Error> From<E> for PlotError {
    fn from(_: E) -> Self {
        PlotError
    }
}

/// Describes a valid plottable engine when implemented.

pub trait Plottable<R>
    where R: PartialEq + std::fmt::Debug + 'static
{

    /// Returns a new plot engine.

    fn new() -> Self;

    /// Sets the dynamic properties for this engine. These may need to be reset on rerender.

    fn set_props(&mut self, window_width: f64, palette: Palette);

    /// Loads data into the engine.

    fn load_data(&mut self, data: Rc<R>);

    /// Whether the engine is empty of data.

    fn is_empty(&self) -> bool;

    /// Returns a sane calculated width for the plot.

    fn get_width(&self) -> u32;

    /// Returns a sane calculated height for the plot.

    fn get_height(&self) -> u32;

    /// Returns a heading for the plot.

    fn get_heading(&self) -> String;

    /// Draws the plot on the given canvas element using plotters.

    fn redraw(&mut self, canvas: HtmlCanvasElement, inter_canvas: HtmlCanvasElement) -> Result<(), PlotError>;

    /// Handle a mouse hover event, usually by outlining whatever is under the
    /// pointer on the interaction canvas and labelling it.

    fn hover(&mut self, e: MouseEvent, inter_canvas: HtmlCanvasElement) -> Result<(), PlotError>;
}

/// A source of plot data - either a uri under `/api` to request data from, or
/// a json string.

#[derive(Clone, PartialEq, Debug)]
pub enum PlotSource {
    Uri(String),
    Json(String)
}

/// Properties for the plot component.

#[derive(Properties, PartialEq)]
pub struct PlotProps
{

    /// The source of the plot data. The plot reloads whenever this changes,
    /// which for uri sources means whenever the selected year changes.

    pub source: PlotSource,
}

/// A fail state the plot can be in: either generic or busy.

#[derive(Clone, Copy, PartialEq)]
enum FailState {
    Generic,
    Busy,
}
use FailState::*;

/// A state the plot can be in: one of showing, loading, and failed.

#[derive(PartialEq)]
enum PlotState {
    Showing,
    Loading,
    Failed(FailState),
}
use PlotState::*;

/// A flexible plot component that loads its data and hands it to a plot engine
/// to render.
///
/// The palette comes from the dashboard selection in context, so a palette
/// change only redraws. A source change reloads the data; responses to any
/// request but the latest are dropped. A generic failure is final and the
/// page will need to be refreshed.

#[function_component(Plot)]
pub fn plot<P, R>(props: &PlotProps) -> Html
    where
        P: Plottable<R> + 'static,
        R: PartialEq + std::fmt::Debug + DeserializeOwned + 'static
{
    let state = use_state_eq(|| Loading);
    let data_state: UseStateHandle<Option<Rc<R>>> = use_state(|| None);
    let source_state: UseStateHandle<Option<PlotSource>> = use_state(|| None);
    let generation = use_mut_ref(|| 0u32);
    let canvas = use_node_ref();
    let inter_canvas = use_node_ref();
    let window_width = use_window_size();
    let palette = use_context::<DashboardSelection>()
        .map(|s| s.palette)
        .unwrap_or_default();
    let engine: Rc<RefCell<P>> = use_mut_ref(|| <P as Plottable<R>>::new());

    let mut heading = String::new();
    let mut empty = true;
    let mut size = (0, 0);
    if let Ok(mut eng) = engine.try_borrow_mut() {
        eng.set_props(window_width.0, palette);
        if let Some(d) = data_state.as_ref() {
            eng.load_data(d.clone());
            empty = eng.is_empty();
            size = (eng.get_width(), eng.get_height());
        }
        heading = eng.get_heading();
    }

    {
        let engine = engine.clone();
        let state = state.clone();
        let data_state = data_state.clone();
        let source = props.source.clone();
        let canvas = canvas.clone();
        let inter_canvas = inter_canvas.clone();
        use_effect(move || {
            if data_state.is_some() && !matches!(*state, Failed(_)) {
                if let Ok(mut eng) = engine.try_borrow_mut() {
                    if !eng.is_empty() {
                        if let (Some(canvas), Some(inter_canvas)) = (canvas.cast(), inter_canvas.cast()) {
                            eng.redraw(canvas, inter_canvas).unwrap_or_else(|_| { state.set(Failed(Generic)); });
                        }
                    }
                }
            }

            if source_state.as_ref() != Some(&source) && *state != Failed(Generic) {
                source_state.set(Some(source.clone()));
                match source {
                    PlotSource::Json(json) => {
                        match serde_json::from_str::<R>(&json) {
                            Ok(data) => {
                                data_state.set(Some(Rc::from(data)));
                                state.set(Showing);
                            },
                            Err(_) => state.set(Failed(Generic)),
                        }
                    },
                    PlotSource::Uri(uri) => {
                        state.set(Loading);
                        *generation.borrow_mut() += 1;
                        let request = *generation.borrow();
                        spawn_local(async move {
                            let next = match get(&format!("/api/{}", uri)).await {
                                Ok(resp) => match resp.status() {
                                    200 => match resp.json::<R>().await {
                                        Ok(data) => {
                                            if *generation.borrow() != request { return };
                                            data_state.set(Some(Rc::from(data)));
                                            Showing
                                        },
                                        Err(_) => Failed(Generic),
                                    },
                                    503 => Failed(Busy),
                                    _ => Failed(Generic),
                                },
                                Err(_) => Failed(Generic),
                            };

                            if *generation.borrow() == request {
                                state.set(next);
                            }
                        });
                    },
                }
            }

            || {}
        });
    }

    let onmousemove = {
        let engine = engine.clone();
        let state = state.clone();
        let inter_canvas = inter_canvas.clone();
        Callback::from(move |e : MouseEvent| {
            if let Some(ic) = inter_canvas.cast() {
                if let Ok(mut eng) = engine.try_borrow_mut() {
                    eng.hover(e, ic).unwrap_or_else(|_| { state.set(Failed(Generic)); });
                }
            }
        })
    };

    let mut canvas_style = "display: none".to_string();
    let mut inter_canvas_style = "display: none".to_string();
    let mut message_style = "display: none";
    let mut message = "no data for this year";
    let mut loader_style = "display: none";

    if data_state.is_some() {
        if empty {
            message_style = "display: initial";
        } else {
            let canvas_opacity = if *state == Loading {"0.25"} else {"1"};
            canvas_style = format!("opacity: {}; width: {}px; height: {}px", canvas_opacity, size.0, size.1);
            inter_canvas_style = format!("width: {}px; height: {}px", size.0, size.1);
        }
    }

    match *state {
        Showing => {},
        Loading => {
            loader_style = "display: flex";
        },
        Failed(e) => {
            canvas_style = "display: none".to_string();
            inter_canvas_style = "display: none".to_string();
            message_style = "display: initial";
            message = match e {
                Generic => "an error occurred - please try refreshing",
                Busy => "servers busy - please try again later",
            };
        },
    }

    html! {
        <div class="plot" >
            <div class="loader-wrapper" style={loader_style}>
                <div class="loader"/>
            </div>
            if !heading.is_empty() {
                <h2 class="plot-heading">{heading}</h2>
            }
            <h3 class="plot-message" style={message_style}>{message}</h3>
            <canvas class="inter-canvas" style={inter_canvas_style} {onmousemove} ref={inter_canvas} />
            <canvas class="canvas" style={canvas_style} ref={canvas} />
        </div>
    }
}

/// Returns the CanvasRenderingContext2d object for the given HtmlCanvasElement

pub fn canvas_context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

/// Clears the interaction canvas and draws a highlighted outline with a label
/// above it, keeping the label inside the canvas.

pub fn draw_highlight(inter_canvas: &HtmlCanvasElement, rect: (f64, f64, f64, f64), label: &str, dpr: f64) -> Result<(), PlotError> {
    let context = canvas_context(inter_canvas).ok_or(PlotError)?;
    let (width, height) = (inter_canvas.width() as f64, inter_canvas.height() as f64);
    context.clear_rect(0.0, 0.0, width, height);

    let (left, top, w, h) = rect;
    context.set_line_width(3.0);
    context.set_stroke_style_str("#fee17d");
    context.stroke_rect(left, top, w, h);

    context.set_font(&format!("{}px sans-serif", (12.0 * dpr) as i32));
    let ts = context.measure_text(label).map_err(|_| PlotError)?;
    let text_height = ts.font_bounding_box_ascent() + 2.0;
    let x = left.min(width - ts.width() - 4.0).max(2.0);
    let y = if top - 6.0 > text_height { top - 6.0 } else { top + h + text_height + 4.0 };
    context.set_fill_style_str("#121212");
    context.fill_rect(x - 2.0, y - text_height, ts.width() + 4.0, text_height + 4.0);
    context.set_fill_style_str("#fee17d");
    context.fill_text(label, x, y).map_err(|_| PlotError)?;
    Ok(())
}

/// Clears the interaction canvas.

pub fn clear_highlight(inter_canvas: &HtmlCanvasElement) -> Result<(), PlotError> {
    let context = canvas_context(inter_canvas).ok_or(PlotError)?;
    context.clear_rect(0.0, 0.0, inter_canvas.width() as f64, inter_canvas.height() as f64);
    Ok(())
}
