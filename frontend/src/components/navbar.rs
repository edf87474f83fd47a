use yew::prelude::*;
use yew_router::prelude::*;

/// A route enum containing all the routes in the app.

#[derive(Clone, Routable, PartialEq, Debug)]
pub enum Route {

    /// The route to the dashboard.

    #[at("/")]
    Home,

    /// The route to the info page.

    #[at("/info")]
    Info,

    /// The route to the 404 not found page.

    #[not_found]
    #[at("/404")]
    NotFound,
}

fn button_class(current: &Route, target: &Route) -> &'static str {
    if current == target {"button highlight"} else {"button"}
}

/// A navbar component that allows the user to visit different pages in the
/// app, highlighting the page we're on.

#[function_component(Navbar)]
pub fn navbar() -> Html {
    let route = use_route::<Route>().unwrap_or(Route::NotFound);

    html! {
        <div class="navbar">
            <div class="navbar-item">
                <Link<Route> to={Route::Home}>
                    <button class={button_class(&route, &Route::Home)}>{"dashboard"}</button>
                </Link<Route>>
            </div>
            <div class="navbar-item">
                <Link<Route> to={Route::Info}>
                    <button class={button_class(&route, &Route::Info)}>{"info"}</button>
                </Link<Route>>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_current_page_is_highlighted() {
        assert_eq!(button_class(&Route::Info, &Route::Info), "button highlight");
        assert_eq!(button_class(&Route::Info, &Route::Home), "button");
        assert_eq!(button_class(&Route::NotFound, &Route::Home), "button");
    }

    #[test]
    fn routes_resolve_from_paths() {
        assert_eq!(Route::recognize("/info"), Some(Route::Info));
        assert_eq!(Route::recognize("/"), Some(Route::Home));
        assert_eq!(Route::Info.to_path(), "/info");
    }
}
