//! 刻印（ホールマーク）の画像検証

use crate::api::use_api;
use crate::components::{alert::Alert, spinner::Spinner};
use arbitrage_common::projection::{NO_IMAGE_SELECTED_MESSAGE, VERIFICATION_FAILED_MESSAGE};
use arbitrage_common::{Error, HallmarkFinding, Liveness, ViewState};
use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::File;

fn selected_file(input: &NodeRef<Input>) -> Option<File> {
    input.get_untracked()?.files()?.get(0)
}

fn revoke_preview(url: &str) {
    if let Err(e) = web_sys::Url::revoke_object_url(url) {
        gloo::console::warn!(format!("プレビューURLの解放失敗: {:?}", e));
    }
}

#[component]
pub fn Verification() -> impl IntoView {
    let api = use_api();
    let liveness = Liveness::new();
    let input_ref = NodeRef::<Input>::new();
    let (preview, set_preview) = signal(None::<String>);
    let state = RwSignal::new(ViewState::<Vec<HallmarkFinding>>::Idle);

    on_cleanup({
        let liveness = liveness.clone();
        move || {
            liveness.cancel();
            if let Some(url) = preview.get_untracked() {
                revoke_preview(&url);
            }
        }
    });

    // 選び直したら前の結果とプレビューを捨てる
    let on_change = move |_| {
        if let Some(old) = preview.get_untracked() {
            revoke_preview(&old);
        }
        let url = selected_file(&input_ref)
            .and_then(|file| web_sys::Url::create_object_url_with_blob(&file).ok());
        set_preview.set(url);
        state.update(|s| s.reset());
    };

    let on_analyze = move |_| {
        let Some(file) = selected_file(&input_ref) else {
            let error = Error::Validation(NO_IMAGE_SELECTED_MESSAGE.to_string());
            state.update(|s| s.reject(error.user_message(VERIFICATION_FAILED_MESSAGE)));
            return;
        };
        if !state.try_update(|s| s.begin()).unwrap_or(false) {
            return;
        }

        let liveness = liveness.clone();
        spawn_local(async move {
            let result = api.analyze_image(&file).await;
            liveness.apply(|| match result {
                Ok(verification) => state.update(|s| s.succeed(verification.findings())),
                Err(e) => state.update(|s| s.fail(e.user_message(VERIFICATION_FAILED_MESSAGE))),
            });
        });
    };

    let is_loading = move || state.with(|s| s.is_loading());
    let error = Signal::derive(move || state.with(|s| s.error().map(str::to_string)));

    view! {
        <div class="container">
            <h1>"Hallmark Verification"</h1>
            <p>"Upload an image of a hallmark to identify it."</p>
            <Alert message=error />
            <div class="form-group">
                <label for="hallmark-image">"Hallmark Image"</label>
                <input
                    type="file"
                    id="hallmark-image"
                    accept="image/*"
                    node_ref=input_ref
                    on:change=on_change
                    disabled=is_loading
                />
            </div>
            {move || preview.get().map(|src| view! {
                <div class="preview">
                    <h5>"Image Preview:"</h5>
                    <img src=src alt="Preview" class="img-thumbnail" />
                </div>
            })}
            <button class="btn btn-primary" on:click=on_analyze disabled=is_loading>
                <Show when=is_loading fallback=|| "Analyze Image">
                    <Spinner />
                    " Analyzing..."
                </Show>
            </button>
            {move || state.with(|s| s.value().cloned()).map(|findings| view! {
                <div class="card mt-3">
                    <div class="card-body">
                        <h5 class="card-title">"Analysis Result"</h5>
                        {if findings.is_empty() {
                            view! {
                                <p class="text-muted">
                                    "No specific hallmarks recognized, or the API returned an unexpected format."
                                </p>
                            }
                            .into_any()
                        } else {
                            findings
                                .iter()
                                .map(|finding| view! { <p class="card-text">{finding.summary()}</p> })
                                .collect_view()
                                .into_any()
                        }}
                    </div>
                </div>
            })}
        </div>
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_revoke_preview_twice() {
        let blob = web_sys::Blob::new().expect("Blob作成失敗");
        let url = web_sys::Url::create_object_url_with_blob(&blob).expect("URL作成失敗");
        revoke_preview(&url);
        // 解放済みでも落ちない
        revoke_preview(&url);
    }
}
