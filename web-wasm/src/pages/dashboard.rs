//! ダッシュボード（発見アイテム一覧）

use crate::api::use_api;
use crate::components::{alert::Alert, item_card::ItemCard, spinner::Spinner};
use arbitrage_common::projection::FETCH_ITEMS_FAILED_MESSAGE;
use arbitrage_common::{list_projection, ListEntry, Liveness, ViewState};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn Dashboard() -> impl IntoView {
    let api = use_api();
    let liveness = Liveness::new();
    on_cleanup({
        let liveness = liveness.clone();
        move || liveness.cancel()
    });

    // マウント時に一度だけ取得
    let state = RwSignal::new(ViewState::<Vec<ListEntry>>::Loading);
    spawn_local(async move {
        let result = api.list_items().await;
        liveness.apply(|| match result {
            Ok(items) => state.update(|s| s.succeed(list_projection(&items))),
            Err(e) => {
                gloo::console::error!(format!("アイテム取得失敗: {}", e));
                state.update(|s| s.fail(e.user_message(FETCH_ITEMS_FAILED_MESSAGE)));
            }
        });
    });

    let error = Signal::derive(move || state.with(|s| s.error().map(str::to_string)));

    view! {
        <div class="container">
            <h1>"Discovered Items Dashboard"</h1>
            <Show when=move || state.with(|s| s.is_loading())>
                <div class="text-center"><Spinner /></div>
            </Show>
            <Alert message=error />
            {move || state.with(|s| s.value().cloned()).map(|entries| {
                if entries.is_empty() {
                    view! {
                        <div class="alert alert-info">
                            "No items discovered yet. Use the \"Discovery\" page to add some."
                        </div>
                    }
                    .into_any()
                } else {
                    view! {
                        <div class="card-grid">
                            <For
                                each=move || entries.clone()
                                key=|entry| entry.id
                                children=|entry| view! { <ItemCard entry=entry /> }
                            />
                        </div>
                    }
                    .into_any()
                }
            })}
        </div>
    }
}
