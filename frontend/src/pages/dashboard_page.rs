use common::models::{DashboardSelection, HeatCell, Palette, StatePopulation};
use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use crate::components::choropleth_engine::ChoroplethEngine;
use crate::components::heat_map_engine::HeatMapEngine;
use crate::components::metrics::Metrics;
use crate::components::plot::{Plot, PlotSource};
use crate::components::rankings::{About, Rankings};
use crate::util::fetch_json;
use std::str::FromStr;
use log::error;

/// The dashboard page.
///
/// This page owns the year and palette selection and hands it down to every
/// panel through context. A year change makes the panels reload; a palette
/// change only redraws them.

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let years: UseStateHandle<Option<Vec<i32>>> = use_state(|| None);
    let palettes: UseStateHandle<Vec<Palette>> = use_state(|| Palette::ALL.to_vec());
    let selection: UseStateHandle<Option<DashboardSelection>> = use_state(|| None);
    let failed = use_state(|| false);

    {
        let years = years.clone();
        let palettes = palettes.clone();
        let selection = selection.clone();
        let failed = failed.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match fetch_json::<Vec<i32>>("/api/years").await {
                    Ok(y) => {
                        if let Some(latest) = y.first() {
                            selection.set(Some(DashboardSelection { year: *latest, palette: Palette::default() }));
                        }
                        years.set(Some(y));
                    },
                    Err(e) => {
                        error!("couldn't load years: {}", e);
                        failed.set(true);
                    },
                }

                match fetch_json::<Vec<Palette>>("/api/palettes").await {
                    Ok(p) if !p.is_empty() => palettes.set(p),
                    Ok(_) => {},
                    Err(e) => error!("couldn't load palettes, using the defaults: {}", e),
                }
            });

            || {}
        });
    }

    let on_year = {
        let selection = selection.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e.target_dyn_into::<HtmlSelectElement>() else { return };
            let (Ok(year), Some(current)) = (select.value().parse::<i32>(), *selection) else { return };
            selection.set(Some(DashboardSelection { year, ..current }));
        })
    };

    let on_palette = {
        let selection = selection.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e.target_dyn_into::<HtmlSelectElement>() else { return };
            let (Ok(palette), Some(current)) = (Palette::from_str(&select.value()), *selection) else { return };
            selection.set(Some(DashboardSelection { palette, ..current }));
        })
    };

    if *failed {
        return html! {
            <div class="dashboard">
                <h3 class="plot-message">{"an error occurred - please try refreshing"}</h3>
            </div>
        };
    }

    let (Some(years), Some(current)) = (years.as_ref(), *selection) else {
        return match years.as_ref() {
            Some(_) => html! {
                <div class="dashboard">
                    <h3 class="plot-message">{"no population data available"}</h3>
                </div>
            },
            None => html! {
                <div class="loader-wrapper" style="display: flex">
                    <div class="loader"/>
                </div>
            },
        };
    };

    html! {
        <ContextProvider<DashboardSelection> context={current}>
            <div class="dashboard">
                <div class="sidebar">
                    <h1>{"USA Population Trends"}</h1>
                    <label for="year">{"year"}</label>
                    <select id="year" onchange={on_year}>
                        { for years.iter().map(|y| html! {
                            <option value={y.to_string()} selected={*y == current.year}>{y.to_string()}</option>
                        }) }
                    </select>
                    <label for="palette">{"colour palette"}</label>
                    <select id="palette" onchange={on_palette}>
                        { for palettes.iter().map(|p| html! {
                            <option value={p.to_string()} selected={*p == current.palette}>{p.to_string()}</option>
                        }) }
                    </select>
                </div>
                <div class="dashboard-columns">
                    <div class="dashboard-column narrow">
                        <Metrics year={current.year} />
                    </div>
                    <div class="dashboard-column wide">
                        <Plot<ChoroplethEngine, Vec<StatePopulation>>
                            source={PlotSource::Uri(format!("populations/{}", current.year))}
                        />
                        <Plot<HeatMapEngine, Vec<HeatCell>>
                            source={PlotSource::Uri("heatmap".to_string())}
                        />
                    </div>
                    <div class="dashboard-column">
                        <Rankings year={current.year} />
                        <About />
                    </div>
                </div>
            </div>
        </ContextProvider<DashboardSelection>>
    }
}
