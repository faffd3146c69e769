//! アラート表示コンポーネント

use leptos::prelude::*;

/// エラー・成功メッセージ。`message` が空なら何も出さない。
#[component]
pub fn Alert(
    #[prop(into)] message: Signal<Option<String>>,
    #[prop(default = "danger")] variant: &'static str,
) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div class=format!("alert alert-{}", variant) role="alert">
                    {text}
                </div>
            }
        })
    }
}
