//! ロジスティクス（ルート最適化）
//!
//! 住所が読めたアイテムだけを候補に出し、チェックした順にルートを組む。

use crate::api::use_api;
use crate::components::{alert::Alert, spinner::Spinner};
use arbitrage_common::projection::{FETCH_ROUTE_ITEMS_FAILED_MESSAGE, ROUTE_FAILED_MESSAGE};
use arbitrage_common::{
    build_route_request, geocoded_projection, stop_lines, Coordinate, GeocodedItem, Liveness,
    Selection, ViewState,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn Logistics() -> impl IntoView {
    let api = use_api();
    let liveness = Liveness::new();
    on_cleanup({
        let liveness = liveness.clone();
        move || liveness.cancel()
    });

    let items = RwSignal::new(ViewState::<Vec<GeocodedItem>>::Loading);
    let selection = RwSignal::new(Selection::new());
    let route = RwSignal::new(ViewState::<Vec<Coordinate>>::Idle);

    {
        let liveness = liveness.clone();
        spawn_local(async move {
            let result = api.list_items().await;
            liveness.apply(|| match result {
                Ok(fetched) => items.update(|s| s.succeed(geocoded_projection(&fetched))),
                Err(e) => {
                    gloo::console::error!(format!("ルート候補の取得失敗: {}", e));
                    items.update(|s| s.fail(e.user_message(FETCH_ROUTE_ITEMS_FAILED_MESSAGE)));
                }
            });
        });
    }

    let on_optimize = move |_| {
        let request = items.with_untracked(|s| {
            let candidates = s.value().map(Vec::as_slice).unwrap_or_default();
            selection.with_untracked(|sel| build_route_request(sel, candidates))
        });
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                route.update(|s| s.reject(e.user_message(ROUTE_FAILED_MESSAGE)));
                return;
            }
        };
        if !route.try_update(|s| s.begin()).unwrap_or(false) {
            return;
        }

        let liveness = liveness.clone();
        spawn_local(async move {
            let result = api.optimize_route(&request).await;
            liveness.apply(|| match result {
                Ok(optimized) => route.update(|s| s.succeed(optimized.stops())),
                Err(e) => route.update(|s| s.fail(e.user_message(ROUTE_FAILED_MESSAGE))),
            });
        });
    };

    let fetch_error = Signal::derive(move || items.with(|s| s.error().map(str::to_string)));
    let route_error = Signal::derive(move || route.with(|s| s.error().map(str::to_string)));
    let route_loading = move || route.with(|s| s.is_loading());
    let disabled = move || route_loading() || !selection.with(|s| s.can_submit());

    view! {
        <div class="container">
            <h1>"Logistics & Route Optimization"</h1>
            <Show when=move || items.with(|s| s.is_loading())>
                <div class="text-center"><Spinner /></div>
            </Show>
            <Alert message=fetch_error />
            <Alert message=route_error />

            <h3>"Select Items for Route"</h3>
            {move || items.with(|s| s.value().cloned()).map(|candidates| {
                if candidates.is_empty() {
                    view! {
                        <p class="text-muted">"No items with address information available for routing."</p>
                    }
                    .into_any()
                } else {
                    view! {
                        <ul class="list-group">
                            <For
                                each=move || candidates.clone()
                                key=|item| item.id
                                children=move |item| {
                                    let id = item.id;
                                    view! {
                                        <li class="list-group-item">
                                            <label>
                                                <input
                                                    type="checkbox"
                                                    prop:checked=move || selection.with(|s| s.contains(id))
                                                    on:change=move |_| selection.update(|s| s.toggle(id))
                                                />
                                                " " {format!("Item #{}: {}", item.id, item.address)}
                                            </label>
                                        </li>
                                    }
                                }
                            />
                        </ul>
                    }
                    .into_any()
                }
            })}

            <button class="btn btn-primary mt-3" on:click=on_optimize disabled=disabled>
                <Show when=route_loading fallback=|| "Optimize Route">
                    <Spinner />
                    " Optimizing..."
                </Show>
            </button>

            {move || {
                let lines = route.with(|s| s.value().map(Vec::as_slice).map(stop_lines))?;
                Some(view! {
                    <h3>"Optimized Route"</h3>
                    <ol class="list-group">
                        {lines
                            .into_iter()
                            .map(|line| view! { <li class="list-group-item">{line}</li> })
                            .collect_view()}
                    </ol>
                })
            }}
        </div>
    }
}
