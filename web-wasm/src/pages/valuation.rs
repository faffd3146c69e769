//! 査定（ROI計算）

use crate::api::use_api;
use crate::components::{alert::Alert, spinner::Spinner};
use arbitrage_common::projection::ROI_FAILED_MESSAGE;
use arbitrage_common::{Liveness, RoiForm, RoiResult, ViewState};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn Valuation() -> impl IntoView {
    let api = use_api();
    let liveness = Liveness::new();
    on_cleanup({
        let liveness = liveness.clone();
        move || liveness.cancel()
    });

    let form = RwSignal::new(RoiForm::default());
    let state = RwSignal::new(ViewState::<RoiResult>::Idle);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let request = match form.with_untracked(RoiForm::to_request) {
            Ok(request) => request,
            Err(e) => {
                state.update(|s| s.reject(e.user_message(ROI_FAILED_MESSAGE)));
                return;
            }
        };
        if !state.try_update(|s| s.begin()).unwrap_or(false) {
            return;
        }

        let liveness = liveness.clone();
        spawn_local(async move {
            let result = api.calculate_roi(&request).await;
            liveness.apply(|| match result {
                Ok(roi) => state.update(|s| s.succeed(roi)),
                Err(e) => state.update(|s| s.fail(e.user_message(ROI_FAILED_MESSAGE))),
            });
        });
    };

    let is_loading = move || state.with(|s| s.is_loading());
    let error = Signal::derive(move || state.with(|s| s.error().map(str::to_string)));

    let field = move |id: &'static str,
                      label: &'static str,
                      step: &'static str,
                      get: fn(&RoiForm) -> String,
                      set: fn(&mut RoiForm, String)| {
        view! {
            <div class="form-group">
                <label for=id>{label}</label>
                <input
                    type="number"
                    step=step
                    id=id
                    required
                    disabled=is_loading
                    prop:value=move || form.with(get)
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                />
            </div>
        }
    };

    view! {
        <div class="container">
            <h1>"Silver Valuation"</h1>
            <p>"Calculate the melt value and potential ROI of a silver item."</p>
            <Alert message=error />
            <form on:submit=on_submit>
                {field("weight", "Weight (grams)", "0.01",
                    |f| f.weight_grams.clone(), |f, v| f.weight_grams = v)}
                {field("purity", "Purity (e.g., 0.925 for Sterling)", "0.001",
                    |f| f.purity.clone(), |f, v| f.purity = v)}
                {field("price", "Purchase Price ($)", "0.01",
                    |f| f.purchase_price.clone(), |f, v| f.purchase_price = v)}
                <button type="submit" class="btn btn-primary" disabled=is_loading>
                    <Show when=is_loading fallback=|| "Calculate ROI">
                        <Spinner />
                        " Calculating..."
                    </Show>
                </button>
            </form>
            {move || state.with(|s| s.value().copied()).map(|roi| {
                let class = if roi.is_profitable() { "text-success" } else { "text-danger" };
                view! {
                    <div class="card mt-3">
                        <div class="card-body">
                            <h5 class="card-title">"Valuation Result"</h5>
                            <p>"Silver Melt Value: " <strong>{roi.melt_value_label()}</strong></p>
                            <p>"Potential Profit: " <strong class=class>{roi.profit_label()}</strong></p>
                            <p>"ROI: " <strong class=class>{roi.roi_label()}</strong></p>
                        </div>
                    </div>
                }
            })}
        </div>
    }
}
