//! 読み込み中インジケータ

use leptos::prelude::*;

#[component]
pub fn Spinner(#[prop(default = "Loading...")] label: &'static str) -> impl IntoView {
    view! {
        <span class="spinner" role="status">
            <span class="visually-hidden">{label}</span>
        </span>
    }
}
