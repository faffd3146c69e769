//! ログイン画面

use crate::api::use_api;
use crate::components::{alert::Alert, spinner::Spinner};
use arbitrage_common::session::LOGIN_FAILED_MESSAGE;
use arbitrage_common::{Liveness, LoginForm, Route, ViewState};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

#[component]
pub fn Login() -> impl IntoView {
    let api = use_api();
    let navigate = use_navigate();
    let liveness = Liveness::new();
    on_cleanup({
        let liveness = liveness.clone();
        move || liveness.cancel()
    });

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let state = RwSignal::new(ViewState::<()>::Idle);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if !state.try_update(|s| s.begin()).unwrap_or(false) {
            return;
        }

        let form = LoginForm::new(username.get_untracked(), password.get_untracked());
        let liveness = liveness.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = api.login(&form).await;
            if !liveness.is_alive() {
                return;
            }
            match result {
                Ok(_) => {
                    state.update(|s| s.succeed(()));
                    navigate(Route::Dashboard.path(), Default::default());
                }
                Err(e) => state.update(|s| s.fail(e.user_message(LOGIN_FAILED_MESSAGE))),
            }
        });
    };

    let is_loading = move || state.with(|s| s.is_loading());
    let error = Signal::derive(move || state.with(|s| s.error().map(str::to_string)));

    view! {
        <div class="container narrow">
            <div class="card">
                <div class="card-body">
                    <h2 class="text-center">"Login to Arbitrage OS"</h2>
                    <Alert message=error />
                    <form on:submit=on_submit>
                        <div class="form-group">
                            <label for="username">"Username"</label>
                            <input
                                type="text"
                                id="username"
                                placeholder="Enter username"
                                required
                                prop:value=move || username.get()
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-group">
                            <label for="password">"Password"</label>
                            <input
                                type="password"
                                id="password"
                                placeholder="Enter password"
                                required
                                prop:value=move || password.get()
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                            />
                        </div>
                        <button type="submit" class="btn btn-primary w-100" disabled=is_loading>
                            <Show when=is_loading fallback=|| "Login">
                                <Spinner />
                            </Show>
                        </button>
                    </form>
                    <p class="text-center">
                        "Don't have an account? "
                        <A href=Route::Register.path()>"Register here"</A>
                    </p>
                </div>
            </div>
        </div>
    }
}
