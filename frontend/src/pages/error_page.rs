use yew::prelude::*;

/// A bare error page for when the app can't even get as far as the router.

pub fn error_page() -> Html {
    html! {
        <div style="text-align: center">
            <h2 style="color: #ffffff">{ "the dashboard failed to start" }</h2>
            <h2 style="color: #ffffff">{ "try refreshing the page" }</h2>
        </div>
    }
}
