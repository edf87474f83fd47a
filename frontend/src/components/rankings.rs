use common::aggregate::MIGRATION_THRESHOLD;
use common::format::format_population;
use common::models::StatePopulation;
use crate::util::fetch_json;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use log::error;

#[derive(Properties, PartialEq)]
pub struct RankingsProps {
    pub year: i32,
}

/// The state rankings table. Each row has a bar scaled against the most
/// populous state of the year.

#[function_component(Rankings)]
pub fn rankings(props: &RankingsProps) -> Html {
    let data: UseStateHandle<Option<Vec<StatePopulation>>> = use_state(|| None);
    let failed = use_state(|| false);
    let current_year = use_mut_ref(|| props.year);

    {
        let data = data.clone();
        let failed = failed.clone();
        let current_year = current_year.clone();
        use_effect_with(props.year, move |year| {
            let year = *year;
            *current_year.borrow_mut() = year;
            spawn_local(async move {
                let result = fetch_json::<Vec<StatePopulation>>(&format!("/api/populations/{}", year)).await;
                if *current_year.borrow() != year { return };
                match result {
                    Ok(states) => {
                        failed.set(false);
                        data.set(Some(states));
                    },
                    Err(e) => {
                        error!("couldn't load rankings for {}: {}", year, e);
                        failed.set(true);
                    },
                }
            });

            || {}
        });
    }

    let body = if *failed {
        html! { <h3 class="plot-message">{"an error occurred - please try refreshing"}</h3> }
    } else {
        match data.as_ref() {
            None => html! {
                <div class="loader-wrapper" style="display: flex">
                    <div class="loader"/>
                </div>
            },
            Some(states) if states.is_empty() => html! {
                <h3 class="plot-message">{"no data for this year"}</h3>
            },
            Some(states) => {
                let max = states.iter().map(|s| s.population).max().unwrap_or(1).max(1) as f64;
                html! {
                    <table class="rankings-table">
                        <tr>
                            <th>{"State"}</th>
                            <th>{"Population"}</th>
                        </tr>
                        { for states.iter().map(|s| html! {
                            <tr key={s.state_code.clone()}>
                                <td>{&s.state_name}</td>
                                <td>
                                    <div class="progress">
                                        <div class="progress-bar" style={format!("width: {:.1}%", 100.0 * s.population as f64 / max)} />
                                    </div>
                                    <span class="progress-value">{s.population.to_string()}</span>
                                </td>
                            </tr>
                        }) }
                    </table>
                }
            },
        }
    };

    html! {
        <div class="rankings">
            <h2>{"State Rankings"}</h2>
            {body}
        </div>
    }
}

/// What the dashboard shows and where the numbers come from.

#[function_component(About)]
pub fn about() -> Html {
    html! {
        <details class="about" open={true}>
            <summary>{"About"}</summary>
            <ul>
                <li>
                    {"Data: "}
                    <a href="https://www.census.gov/data/datasets/time-series/demo/popest/2010s-state-total.html" target="_blank">
                        {"U.S. Census Bureau"}
                    </a>
                </li>
                <li><b>{"Population Changes"}</b>{": the states with the largest and smallest population change in the selected year"}</li>
                <li>
                    <b>{"Migration Trends"}</b>
                    {format!(": percentage of states whose population changed by more than {} in a year", format_population(MIGRATION_THRESHOLD))}
                </li>
            </ul>
        </details>
    }
}
