use yew::prelude::*;
use shared::{DeletedKind, Session};
use crate::Screen;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub session: Session,
    pub current: Screen,
    pub on_navigate: Callback<Screen>,
    pub on_logout: Callback<()>,
}

const NAV: [(&str, Screen); 7] = [
    ("Calendar", Screen::Calendar),
    ("Bills", Screen::Bills),
    ("Unsettled", Screen::Unsettled),
    ("Items", Screen::Items),
    ("Deleted Bills", Screen::Deleted(DeletedKind::Bills)),
    ("Deleted Quotations", Screen::Deleted(DeletedKind::Quotations)),
    ("Deleted Companies", Screen::Deleted(DeletedKind::Companies)),
];

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let hotel = if props.session.hotel_name.is_empty() {
        "Banquet Desk".to_string()
    } else {
        props.session.hotel_name.clone()
    };

    html! {
        <header class="header">
            <div class="container">
                <h1>{hotel}</h1>
                <nav class="header-nav">
                    {for NAV.iter().map(|(label, screen)| {
                        let screen = screen.clone();
                        let class = if props.current.section() == screen {
                            "nav-link active"
                        } else {
                            "nav-link"
                        };
                        let on_navigate = props.on_navigate.clone();
                        html! {
                            <button class={class} onclick={Callback::from(move |_: MouseEvent| on_navigate.emit(screen.clone()))}>
                                {*label}
                            </button>
                        }
                    })}
                </nav>
                <div class="header-right">
                    <span class="user-name">{&props.session.user_name}</span>
                    <button class="btn btn-secondary" onclick={{
                        let on_logout = props.on_logout.clone();
                        Callback::from(move |_: MouseEvent| on_logout.emit(()))
                    }}>
                        {"Log out"}
                    </button>
                </div>
            </div>
        </header>
    }
}
