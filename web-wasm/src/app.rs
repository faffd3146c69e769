//! ルーティングとガードの組み立て

use crate::components::{header::Header, protected::Protected};
use crate::pages::{
    dashboard::Dashboard, discovery::Discovery, login::Login, logistics::Logistics,
    multi_discovery::MultiDiscovery, register::Register, valuation::Valuation,
    verification::Verification,
};
use crate::session::SessionContext;
use arbitrage_common::Route as AppRoute;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(SessionContext::new());

    view! {
        <Router>
            <Header />
            <main class="main">
                <Routes fallback=|| view! { <p class="container">"Page not found."</p> }>
                    <Route path=path!("/login") view=Login />
                    <Route path=path!("/register") view=Register />
                    <Route
                        path=path!("/")
                        view=|| view! { <Protected route=AppRoute::Dashboard><Dashboard /></Protected> }
                    />
                    <Route
                        path=path!("/discover")
                        view=|| view! { <Protected route=AppRoute::Discover><Discovery /></Protected> }
                    />
                    <Route
                        path=path!("/multi-discover")
                        view=|| view! { <Protected route=AppRoute::MultiDiscover><MultiDiscovery /></Protected> }
                    />
                    <Route
                        path=path!("/logistics")
                        view=|| view! { <Protected route=AppRoute::Logistics><Logistics /></Protected> }
                    />
                    <Route
                        path=path!("/valuation")
                        view=|| view! { <Protected route=AppRoute::Valuation><Valuation /></Protected> }
                    />
                    <Route
                        path=path!("/verification")
                        view=|| view! { <Protected route=AppRoute::Verification><Verification /></Protected> }
                    />
                </Routes>
            </main>
        </Router>
    }
}
