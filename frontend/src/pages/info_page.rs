use yew::prelude::*;
use common::aggregate::MIGRATION_THRESHOLD;
use common::format::format_population;

#[function_component(InfoPage)]
pub fn info_page() -> Html {
    html! {
        <div class="info">
            <h2>{"What is this dashboard?"}</h2>

            <p>{"This dashboard shows how the population of each US state changed from year to year over the 2010s. Pick a year and a colour palette at the top of the dashboard and every panel updates to match."}</p>

            <p>
                {"The numbers are the annual state population estimates published by the "}
                <a href="https://www.census.gov/data/datasets/time-series/demo/popest/2010s-state-total.html" target="_blank">{"U.S. Census Bureau"}</a>
                {"."}
            </p>

            <h2>{"Population Changes"}</h2>

            <p>{"The two cards on the left show the states with the largest and the smallest change in population between the chosen year and the year before it. The arrow under each population shows which way it moved. For the first year in the data there is nothing to compare against, so the cards are left blank."}</p>

            <h2>{"Migration Trends"}</h2>

            <p>{format!(
                "The donuts show the share of states whose population grew by more than {} (growth) or shrank by more than {} (decline) over the year. States that changed by less than that count towards neither.",
                format_population(MIGRATION_THRESHOLD),
                format_population(MIGRATION_THRESHOLD),
            )}</p>

            <h2>{"Total Population Distribution"}</h2>

            <p>{"The map gives every state one tile placed roughly where it sits geographically, shaded from zero up to the most populous state of the year. Below it, the heat map shows every state across every year on one scale, so you can follow a single state's growth along its column. Hover over a tile or a cell to see the exact figure."}</p>

            <h2>{"State Rankings"}</h2>

            <p>{"The table on the right lists the states from most to least populous, with a bar measured against the largest state."}</p>
        </div>
    }
}
