//! 保護画面のガード

use crate::session::use_session;
use arbitrage_common::{GuardOutcome, Route};
use leptos::prelude::*;
use leptos_router::components::Redirect;

/// トークンがなければログイン画面へリダイレクト、あれば子要素を描画する
#[component]
pub fn Protected(route: Route, children: ChildrenFn) -> impl IntoView {
    let session = use_session();

    move || match session.guard(route) {
        GuardOutcome::Render(_) => children().into_any(),
        GuardOutcome::Redirect(target) => view! { <Redirect path=target.path() /> }.into_any(),
    }
}
