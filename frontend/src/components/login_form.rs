use yew::prelude::*;
use web_sys::HtmlInputElement;
use wasm_bindgen_futures::spawn_local;
use shared::session::{check_credentials, verify_login};
use shared::Session;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub api_client: ApiClient,
    pub on_login: Callback<Session>,
}

#[function_component(LoginForm)]
pub fn login_form(props: &LoginFormProps) -> Html {
    let user_name = use_state(String::new);
    let password = use_state(String::new);
    let submitting = use_state(|| false);
    let form_error = use_state(|| Option::<String>::None);

    let on_user_change = {
        let user_name = user_name.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            user_name.set(input.value());
        })
    };

    let on_password_change = {
        let password = password.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_submit = {
        let api_client = props.api_client.clone();
        let on_login = props.on_login.clone();
        let user_name = user_name.clone();
        let password = password.clone();
        let submitting = submitting.clone();
        let form_error = form_error.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let user = (*user_name).clone();
            let pass = (*password).clone();
            if let Err(e) = check_credentials(&user, &pass) {
                form_error.set(Some(e.to_string()));
                return;
            }

            let api_client = api_client.clone();
            let on_login = on_login.clone();
            let submitting = submitting.clone();
            let form_error = form_error.clone();
            submitting.set(true);
            form_error.set(None);

            spawn_local(async move {
                match api_client.login(user.trim(), &pass).await {
                    Ok(body) => match verify_login(&user, &pass, &body) {
                        Ok(session) => {
                            api_client.preferences().save_session(&session);
                            log::info!(target: "login", "Signed in to hotel {}", session.hotel_id);
                            on_login.emit(session);
                        }
                        Err(e) => {
                            log::warn!(target: "login", "Login rejected for {}", user.trim());
                            form_error.set(Some(e.to_string()));
                        }
                    },
                    Err(e) => {
                        log::error!(target: "login", "Login request failed: {}", e);
                        form_error.set(Some(e.to_string()));
                    }
                }
                submitting.set(false);
            });
        })
    };

    html! {
        <section class="login-section">
            <h2>{"Sign in"}</h2>

            {if let Some(error) = form_error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <form class="login-form" onsubmit={on_submit}>
                <div class="form-group">
                    <label for="user-name">{"User name"}</label>
                    <input
                        type="text"
                        id="user-name"
                        autocomplete="username"
                        value={(*user_name).clone()}
                        onchange={on_user_change}
                        disabled={*submitting}
                    />
                </div>
                <div class="form-group">
                    <label for="password">{"Password"}</label>
                    <input
                        type="password"
                        id="password"
                        autocomplete="current-password"
                        value={(*password).clone()}
                        onchange={on_password_change}
                        disabled={*submitting}
                    />
                </div>
                <button type="submit" class="btn btn-primary" disabled={*submitting}>
                    {if *submitting { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </section>
    }
}
