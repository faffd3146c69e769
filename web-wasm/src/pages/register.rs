//! 新規登録画面

use crate::api::use_api;
use crate::components::{alert::Alert, spinner::Spinner};
use arbitrage_common::session::REGISTER_FAILED_MESSAGE;
use arbitrage_common::{Liveness, RegisterForm, Route, ViewState, REGISTER_REDIRECT_DELAY};
use gloo::timers::callback::Timeout;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

#[component]
pub fn Register() -> impl IntoView {
    let api = use_api();
    let navigate = use_navigate();
    let liveness = Liveness::new();
    on_cleanup({
        let liveness = liveness.clone();
        move || liveness.cancel()
    });

    let form = RwSignal::new(RegisterForm::default());
    let state = RwSignal::new(ViewState::<()>::Idle);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        // パスワード不一致はネットワークに出る前に弾く
        let request = match form.with_untracked(RegisterForm::validate) {
            Ok(request) => request,
            Err(e) => {
                state.update(|s| s.reject(e.user_message(REGISTER_FAILED_MESSAGE)));
                return;
            }
        };
        if !state.try_update(|s| s.begin()).unwrap_or(false) {
            return;
        }

        let liveness = liveness.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = api.register(&request).await;
            if !liveness.is_alive() {
                return;
            }
            match result {
                Ok(()) => {
                    state.update(|s| s.succeed(()));
                    let delay = REGISTER_REDIRECT_DELAY.as_millis() as u32;
                    Timeout::new(delay, move || {
                        if liveness.is_alive() {
                            navigate(Route::Login.path(), Default::default());
                        }
                    })
                    .forget();
                }
                Err(e) => state.update(|s| s.fail(e.user_message(REGISTER_FAILED_MESSAGE))),
            }
        });
    };

    let is_loading = move || state.with(|s| s.is_loading());
    let is_done = move || state.with(|s| s.value().is_some());
    let error = Signal::derive(move || state.with(|s| s.error().map(str::to_string)));
    let success = Signal::derive(move || {
        is_done().then(|| "Registration successful! Redirecting to login...".to_string())
    });

    let field = move |id: &'static str,
                      label: &'static str,
                      input_type: &'static str,
                      placeholder: &'static str,
                      required: bool,
                      get: fn(&RegisterForm) -> String,
                      set: fn(&mut RegisterForm, String)| {
        view! {
            <div class="form-group">
                <label for=id>{label}</label>
                <input
                    type=input_type
                    id=id
                    placeholder=placeholder
                    required=required
                    prop:value=move || form.with(get)
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                />
            </div>
        }
    };

    view! {
        <div class="container narrow">
            <div class="card">
                <div class="card-body">
                    <h2 class="text-center">"Register for Arbitrage OS"</h2>
                    <Alert message=error />
                    <Alert message=success variant="success" />
                    <form on:submit=on_submit>
                        {field("username", "Username", "text", "Enter username", true,
                            |f| f.username.clone(), |f, v| f.username = v)}
                        {field("email", "Email", "email", "Enter email", true,
                            |f| f.email.clone(), |f, v| f.email = v)}
                        {field("fullName", "Full Name (Optional)", "text", "Enter full name", false,
                            |f| f.full_name.clone(), |f, v| f.full_name = v)}
                        {field("password", "Password", "password", "Enter password", true,
                            |f| f.password.clone(), |f, v| f.password = v)}
                        {field("confirmPassword", "Confirm Password", "password", "Confirm password", true,
                            |f| f.confirm_password.clone(), |f, v| f.confirm_password = v)}
                        <button
                            type="submit"
                            class="btn btn-primary w-100"
                            disabled=move || is_loading() || is_done()
                        >
                            <Show when=is_loading fallback=|| "Register">
                                <Spinner />
                            </Show>
                        </button>
                    </form>
                    <p class="text-center">
                        "Already have an account? "
                        <A href=Route::Login.path()>"Login here"</A>
                    </p>
                </div>
            </div>
        </div>
    }
}
