use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::auth::{use_session, use_session_version};
use crate::guard::{
    PATH_ABOUT, PATH_ADMIN_DASHBOARD, PATH_HOME, PATH_LOGIN, PATH_REQUEST_FORM,
    PATH_USER_DASHBOARD, PATH_USER_SETTINGS,
};

#[component]
pub fn Navbar() -> impl IntoView {
    let session = use_session();
    let version = use_session_version();
    let navigate = use_navigate();

    let has_token = {
        let session = session.clone();
        move || {
            version.0.get();
            session.is_authenticated()
        }
    };
    let is_admin = {
        let session = session.clone();
        move || {
            version.0.get();
            session.admin_key().is_some()
        }
    };
    let display_name = {
        let session = session.clone();
        move || {
            version.0.get();
            session
                .user_full_name()
                .or_else(|| session.user_email())
                .unwrap_or_default()
        }
    };

    let on_logout = {
        let session = session.clone();
        move |_| {
            session.clear_auth();
            version.bump();
            navigate(PATH_HOME, Default::default());
        }
    };

    view! {
        <div class="navbar bg-base-100 shadow-sm">
            <div class="flex-1">
                <A href=PATH_HOME attr:class="btn btn-ghost text-xl">
                    "MYFlood"
                </A>
            </div>
            <div class="flex-none">
                <ul class="menu menu-horizontal px-1 items-center">
                    <li>
                        <A href=PATH_ABOUT>"About"</A>
                    </li>
                    <li>
                        <A href=PATH_REQUEST_FORM>"Report Flood"</A>
                    </li>
                    <Show when=is_admin.clone()>
                        <li>
                            <A href=PATH_ADMIN_DASHBOARD>"Admin"</A>
                        </li>
                    </Show>
                    <Show
                        when=has_token.clone()
                        fallback=move || {
                            view! {
                                <li>
                                    <A href=PATH_LOGIN attr:class="btn btn-primary btn-sm">
                                        "Login"
                                    </A>
                                </li>
                            }
                        }
                    >
                        <li>
                            <A href=PATH_USER_DASHBOARD>"My Requests"</A>
                        </li>
                        <li>
                            <A href=PATH_USER_SETTINGS>"Settings"</A>
                        </li>
                        <li class="text-base-content/70 px-2">{display_name.clone()}</li>
                        <li>
                            <button class="btn btn-ghost btn-sm" on:click=on_logout.clone()>
                                "Logout"
                            </button>
                        </li>
                    </Show>
                </ul>
            </div>
        </div>
    }
}
