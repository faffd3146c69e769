//! 複数URLのバッチ発見
//!
//! URLごとの成否をすべて並べる。一部失敗でも打ち切らない。

use crate::api::use_api;
use crate::components::{alert::Alert, spinner::Spinner};
use arbitrage_common::projection::BATCH_DISCOVERY_FAILED_MESSAGE;
use arbitrage_common::{parse_url_list, DiscoveryOutcome, Liveness, ViewState};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn MultiDiscovery() -> impl IntoView {
    let api = use_api();
    let liveness = Liveness::new();
    on_cleanup({
        let liveness = liveness.clone();
        move || liveness.cancel()
    });

    let (urls, set_urls) = signal(String::new());
    let state = RwSignal::new(ViewState::<Vec<DiscoveryOutcome>>::Idle);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let list = match parse_url_list(&urls.get_untracked()) {
            Ok(list) => list,
            Err(e) => {
                state.update(|s| s.reject(e.user_message(BATCH_DISCOVERY_FAILED_MESSAGE)));
                return;
            }
        };
        if !state.try_update(|s| s.begin()).unwrap_or(false) {
            return;
        }

        let liveness = liveness.clone();
        spawn_local(async move {
            let result = api.discover_multiple(list).await;
            liveness.apply(|| match result {
                Ok(outcomes) => state.update(|s| s.succeed(outcomes)),
                Err(e) => state.update(|s| s.fail(e.user_message(BATCH_DISCOVERY_FAILED_MESSAGE))),
            });
        });
    };

    let is_loading = move || state.with(|s| s.is_loading());
    let error = Signal::derive(move || state.with(|s| s.error().map(str::to_string)));
    let outcomes = move || state.with(|s| s.value().cloned().unwrap_or_default());

    view! {
        <div class="container">
            <h1>"Multi-Item Discovery"</h1>
            <p>"Enter multiple marketplace URLs (one per line) to scrape and analyze them in batch."</p>
            <Alert message=error />
            <form on:submit=on_submit>
                <div class="form-group">
                    <label for="listing-urls">"Marketplace URLs"</label>
                    <textarea
                        id="listing-urls"
                        rows="10"
                        placeholder="https://www.facebook.com/marketplace/item/12345/"
                        required
                        disabled=is_loading
                        prop:value=move || urls.get()
                        on:input=move |ev| set_urls.set(event_target_value(&ev))
                    />
                </div>
                <button type="submit" class="btn btn-primary" disabled=is_loading>
                    <Show when=is_loading fallback=|| "Discover Multiple Items">
                        <Spinner />
                        " Discovering Multiple Items..."
                    </Show>
                </button>
            </form>
            <Show when=move || !outcomes().is_empty()>
                <h3>"Discovery Results:"</h3>
                <ul class="list-group">
                    {move || {
                        outcomes()
                            .into_iter()
                            .map(|outcome| {
                                let variant = if outcome.is_success() { "success" } else { "danger" };
                                view! {
                                    <li class=format!("list-group-item list-group-item-{}", variant)>
                                        {outcome.summary()}
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </Show>
        </div>
    }
}
