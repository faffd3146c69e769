//! ナビゲーションバー

use crate::session::use_session;
use arbitrage_common::Route;
use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn Header() -> impl IntoView {
    let session = use_session();

    // 保護画面側のガードがシグナル変化でログイン画面へ送る
    let on_logout = move |_| {
        if let Err(e) = session.sign_out() {
            gloo::console::error!(format!("ログアウト失敗: {}", e));
        }
    };

    view! {
        <header class="navbar">
            <A href=Route::Dashboard.path() attr:class="navbar-brand">"Arbitrage OS"</A>
            <Show when=move || session.is_authenticated()>
                <nav class="nav">
                    {Route::navigation()
                        .map(|route| view! { <A href=route.path() attr:class="nav-link">{route.title()}</A> })
                        .collect_view()}
                </nav>
                <button class="btn btn-outline" on:click=on_logout>"Logout"</button>
            </Show>
        </header>
    }
}
