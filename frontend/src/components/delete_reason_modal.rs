use yew::prelude::*;
use web_sys::{HtmlTextAreaElement, MouseEvent};
use shared::listing::validate_delete_reason;

#[derive(Properties, PartialEq)]
pub struct DeleteReasonModalProps {
    /// What is being deleted, e.g. "bill Q-1042 (Mehta)".
    pub subject: Option<String>,
    pub on_confirm: Callback<String>,
    pub on_close: Callback<()>,
}

/// Asks for the cancellation reason before a bill is deleted.
#[function_component(DeleteReasonModal)]
pub fn delete_reason_modal(props: &DeleteReasonModalProps) -> Html {
    let reason = use_state(String::new);
    let error = use_state(|| Option::<String>::None);

    // Reset when a new record is chosen
    use_effect_with(props.subject.clone(), {
        let reason = reason.clone();
        let error = error.clone();
        move |_| {
            reason.set(String::new());
            error.set(None);
            || ()
        }
    });

    let Some(subject) = props.subject.clone() else {
        return html! {};
    };

    let on_input = {
        let reason = reason.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            reason.set(input.value());
        })
    };

    let on_submit = {
        let reason = reason.clone();
        let error = error.clone();
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match validate_delete_reason(&reason) {
                Ok(reason) => on_confirm.emit(reason),
                Err(e) => error.set(Some(e.to_string())),
            }
        })
    };

    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_close.emit(());
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div class="modal-backdrop" onclick={on_backdrop_click}>
            <div class="modal" onclick={on_modal_click}>
                <h3>{format!("Delete {}?", subject)}</h3>
                <form onsubmit={on_submit}>
                    <div class="form-group">
                        <label for="delete-reason">{"Reason"}</label>
                        <textarea
                            id="delete-reason"
                            value={(*reason).clone()}
                            oninput={on_input}
                            placeholder="Why is this bill being deleted?"
                        />
                    </div>
                    {if let Some(error) = (*error).as_ref() {
                        html! { <div class="form-message error">{error}</div> }
                    } else { html! {} }}
                    <div class="modal-actions">
                        <button type="button" class="btn btn-secondary" onclick={on_cancel}>{"Cancel"}</button>
                        <button type="submit" class="btn btn-danger">{"Delete"}</button>
                    </div>
                </form>
            </div>
        </div>
    }
}
