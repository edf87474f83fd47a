use common::models::{MetricsResponse, StateMetric};
use crate::components::donut_engine::{DonutEngine, DonutValue};
use crate::components::plot::{Plot, PlotSource};
use crate::util::fetch_json;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use log::error;

#[derive(Properties, PartialEq)]
pub struct MetricsProps {
    pub year: i32,
}

#[derive(Properties, PartialEq)]
struct MetricCardProps {
    heading: AttrValue,
    metric: StateMetric,
}

/// The text and class for a formatted change. No change gets no arrow, and an
/// empty change isn't shown at all.

fn delta_display(delta: &str) -> Option<(String, &'static str)> {
    if delta.is_empty() {
        None
    } else if let Some(loss) = delta.strip_prefix('-') {
        Some((format!("↓ {}", loss), "metric-delta down"))
    } else if delta.split(' ').next() == Some("0") {
        Some((delta.to_string(), "metric-delta"))
    } else {
        Some((format!("↑ {}", delta), "metric-delta up"))
    }
}

/// A card with one state's population and its change since last year. The
/// change is left off when there's no previous year to compare to.

#[function_component(MetricCard)]
fn metric_card(props: &MetricCardProps) -> Html {
    html! {
        <div class="metric">
            <div class="metric-heading">{&props.heading}</div>
            <div class="metric-label">{&props.metric.label}</div>
            <div class="metric-value">{&props.metric.value}</div>
            if let Some((text, class)) = delta_display(&props.metric.delta) {
                <div {class}>{text}</div>
            }
        </div>
    }
}

fn donut_source(label: &str, percentage: u32, colour: &str) -> PlotSource {
    let value = DonutValue {
        label: label.to_string(),
        percentage,
        colour: colour.to_string(),
    };
    PlotSource::Json(serde_json::to_string(&value).unwrap_or_default())
}

/// The population changes column: the states with the largest and smallest change
/// for the selected year, and the share of states growing or shrinking by more
/// than the migration threshold.

#[function_component(Metrics)]
pub fn metrics(props: &MetricsProps) -> Html {
    let data: UseStateHandle<Option<MetricsResponse>> = use_state(|| None);
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
                let result = fetch_json::<MetricsResponse>(&format!("/api/metrics/{}", year)).await;
                if *current_year.borrow() != year { return };
                match result {
                    Ok(metrics) => {
                        failed.set(false);
                        data.set(Some(metrics));
                    },
                    Err(e) => {
                        error!("couldn't load metrics for {}: {}", year, e);
                        failed.set(true);
                    },
                }
            });

            || {}
        });
    }

    if *failed {
        return html! {
            <div class="metrics">
                <h3 class="plot-message">{"an error occurred - please try refreshing"}</h3>
            </div>
        };
    }

    let Some(metrics) = data.as_ref() else {
        return html! {
            <div class="metrics">
                <div class="loader-wrapper" style="display: flex">
                    <div class="loader"/>
                </div>
            </div>
        };
    };

    html! {
        <div class="metrics">
            <h2>{"Population Changes"}</h2>
            <MetricCard heading="largest change" metric={metrics.top.clone()} />
            <MetricCard heading="smallest change" metric={metrics.bottom.clone()} />
            <h2>{"Migration Trends"}</h2>
            <div class="donuts">
                <Plot<DonutEngine, DonutValue>
                    source={donut_source("Growth", metrics.migration.growth_percentage, "green")}
                />
                <Plot<DonutEngine, DonutValue>
                    source={donut_source("Decline", metrics.migration.decline_percentage, "red")}
                />
            </div>
        </div>
    }
}
