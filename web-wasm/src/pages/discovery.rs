//! 単体URLの発見

use crate::api::use_api;
use crate::components::{alert::Alert, spinner::Spinner};
use arbitrage_common::projection::DISCOVERY_FAILED_MESSAGE;
use arbitrage_common::{validate_listing_url, Liveness, Route, ViewState};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

#[component]
pub fn Discovery() -> impl IntoView {
    let api = use_api();
    let navigate = use_navigate();
    let liveness = Liveness::new();
    on_cleanup({
        let liveness = liveness.clone();
        move || liveness.cancel()
    });

    let (url, set_url) = signal(String::new());
    let state = RwSignal::new(ViewState::<()>::Idle);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let target = match validate_listing_url(&url.get_untracked()) {
            Ok(target) => target,
            Err(e) => {
                state.update(|s| s.reject(e.user_message(DISCOVERY_FAILED_MESSAGE)));
                return;
            }
        };
        if !state.try_update(|s| s.begin()).unwrap_or(false) {
            return;
        }

        let liveness = liveness.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = api.discover(&target).await;
            if !liveness.is_alive() {
                return;
            }
            match result {
                Ok(reference) => {
                    gloo::console::log!(format!("発見開始: {:?}", reference.id));
                    state.update(|s| s.succeed(()));
                    navigate(Route::Dashboard.path(), Default::default());
                }
                Err(e) => state.update(|s| s.fail(e.user_message(DISCOVERY_FAILED_MESSAGE))),
            }
        });
    };

    let is_loading = move || state.with(|s| s.is_loading());
    let error = Signal::derive(move || state.with(|s| s.error().map(str::to_string)));

    view! {
        <div class="container">
            <h1>"Discover a New Item"</h1>
            <p>"Enter the URL of a marketplace listing to scrape and analyze it for silver."</p>
            <Alert message=error />
            <form on:submit=on_submit>
                <div class="form-group">
                    <label for="listing-url">"Marketplace URL"</label>
                    <input
                        type="text"
                        id="listing-url"
                        placeholder="e.g., https://www.facebook.com/marketplace/item/..."
                        required
                        disabled=is_loading
                        prop:value=move || url.get()
                        on:input=move |ev| set_url.set(event_target_value(&ev))
                    />
                </div>
                <button type="submit" class="btn btn-primary" disabled=is_loading>
                    <Show when=is_loading fallback=|| "Discover Item">
                        <Spinner />
                        " Discovering..."
                    </Show>
                </button>
            </form>
        </div>
    }
}
