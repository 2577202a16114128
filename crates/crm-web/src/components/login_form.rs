//! API key login

use crate::api::verify_credentials;
use crate::context::use_console;
use crm_core::models::{Credentials, Identity};
use crm_core::Session;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Shown while no valid session is stored
#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_console();
    let (company, set_company) = signal(String::new());
    let (key, set_key) = signal(String::new());
    let (secret, set_secret) = signal(String::new());
    let (error, set_error) = signal(None::<String>);
    let (pending, set_pending) = signal(false);

    let submit = move |e: leptos::ev::SubmitEvent| {
        e.prevent_default();
        let ctx = ctx.clone();
        let company = company.get_untracked().trim().to_string();
        let key = key.get_untracked().trim().to_string();
        let secret = secret.get_untracked().trim().to_string();
        if key.is_empty() || secret.is_empty() {
            set_error.set(Some("API key and secret are required".to_string()));
            return;
        }

        set_pending.set(true);
        set_error.set(None);
        spawn_local(async move {
            let authorization = format!("token {key}:{secret}");
            match verify_credentials(&ctx.console.config.api_base_url, &authorization).await {
                Ok(user) => {
                    let identity = Identity {
                        username: user.clone(),
                        email: user.clone(),
                        full_name: user,
                    };
                    let session = Session::new(company, identity, Credentials::ApiKey { key, secret });
                    ctx.login(session);
                }
                Err(e) => set_error.set(Some(e.to_string())),
            }
            set_pending.set(false);
        });
    };

    view! {
        <div class="login-page">
            <form class="login-form" on:submit=submit>
                <h1 class="logo">"CRM Console"</h1>
                <input
                    type="text"
                    placeholder="Company"
                    prop:value=move || company.get()
                    on:input=move |e| set_company.set(event_target_value(&e))
                />
                <input
                    type="text"
                    placeholder="API key"
                    prop:value=move || key.get()
                    on:input=move |e| set_key.set(event_target_value(&e))
                />
                <input
                    type="password"
                    placeholder="API secret"
                    prop:value=move || secret.get()
                    on:input=move |e| set_secret.set(event_target_value(&e))
                />
                {move || error.get().map(|message| view! { <div class="error">{message}</div> })}
                <button type="submit" class="btn btn-primary" disabled=move || pending.get()>
                    "Log in"
                </button>
            </form>
        </div>
    }
}
