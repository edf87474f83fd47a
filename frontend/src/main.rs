use yew::prelude::*;
use yew_router::prelude::*;
use components::navbar::*;
use pages::error_page::error_page;
use pages::dashboard_page::DashboardPage;
use pages::info_page::InfoPage;

mod pages;
mod components;
mod util;

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! {
            <DashboardPage />
        },
        Route::Info => html! {
            <InfoPage />
        },
        Route::NotFound => html! {
            <NotFoundPage />
        },
    }
}

#[function_component(NotFoundPage)]
fn not_found_page() -> Html {
    let Some(navigator) = use_navigator() else {return error_page()};
    let onclick = Callback::from(move |_| navigator.push(&Route::Home));

    html! {
        <div>
            <div style="display: flex; justify-content: center">
                <h1 style="color: #ffffff">{ "404 not found" }</h1>
            </div>
            <div style="display: flex; justify-content: center">
                <button {onclick} style="background-color: #3f3f3f; border-color: #3f3f3f; border-radius: 10px; color: #ffffff; margin: 5px;">{ "go to the dashboard" }</button>
            </div>
        </div>
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <BrowserRouter>
            <Navbar />
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
