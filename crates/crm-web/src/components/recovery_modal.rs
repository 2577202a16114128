//! Session-expired modal

use crate::context::use_console;
use leptos::prelude::*;

/// Blocking modal shown by the recovery coordinator.
///
/// Once it is on screen the suppression window is closed, so a later
/// failure can raise again.
#[component]
pub fn RecoveryModal() -> impl IntoView {
    let ctx = use_console();
    let modal = ctx.modal;

    let recovery = ctx.console.recovery.clone();
    Effect::new(move |_| {
        if modal.with(|m| m.is_open) {
            recovery.modal_shown();
        }
    });

    let dismiss = {
        let recovery = ctx.console.recovery.clone();
        move |_| recovery.dismiss()
    };
    let logout = {
        let ctx = ctx.clone();
        move |_| ctx.logout()
    };

    view! {
        <Show when=move || modal.with(|m| m.is_open)>
            <div class="modal-overlay">
                <div class="modal-content recovery-modal" role="alertdialog" aria-modal="true">
                    <div class="modal-header">
                        <h2>"Session expired"</h2>
                    </div>
                    <div class="modal-body">
                        <p>
                            {move || {
                                modal
                                    .with(|m| m.message.clone())
                                    .unwrap_or_else(|| {
                                        "Your session is no longer valid. Log in again to continue."
                                            .to_string()
                                    })
                            }}
                        </p>
                    </div>
                    <div class="modal-footer">
                        <button class="btn btn-secondary" on:click=dismiss.clone()>
                            "Stay here"
                        </button>
                        <button class="btn btn-primary" on:click=logout.clone()>
                            "Log in again"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
