use leptos::prelude::*;
use leptos_router::components::A;

use crate::guard::PATH_REQUEST_FORM;

#[component]
pub fn AboutPage() -> impl IntoView {
    view! {
        <div class="container mx-auto px-4 py-10 max-w-3xl space-y-6">
            <h1 class="text-3xl font-bold">"About MYFlood"</h1>
            <p class="text-base-content/80">
                "MYFlood is a community platform for flood reporting and alerts \
                 across Malaysia's sixteen states and federal territories. \
                 Citizens report floods or ask for help, expert organizations \
                 publish verified situation reports, and administrators \
                 coordinate responses and broadcast alerts."
            </p>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                <div class="card bg-base-100 shadow-sm">
                    <div class="card-body">
                        <h2 class="card-title text-base">"Report"</h2>
                        <p class="text-sm text-base-content/70">
                            "Submit a flood report or a request for help for your \
                             region. No account needed."
                        </p>
                    </div>
                </div>
                <div class="card bg-base-100 shadow-sm">
                    <div class="card-body">
                        <h2 class="card-title text-base">"Stay informed"</h2>
                        <p class="text-sm text-base-content/70">
                            "Active flood alerts and official announcements appear \
                             on the home page as they are published."
                        </p>
                    </div>
                </div>
                <div class="card bg-base-100 shadow-sm">
                    <div class="card-body">
                        <h2 class="card-title text-base">"Track"</h2>
                        <p class="text-sm text-base-content/70">
                            "Registered users can follow the status of their \
                             requests from pending to resolved."
                        </p>
                    </div>
                </div>
            </div>
            <A href=PATH_REQUEST_FORM attr:class="btn btn-primary">
                "Report a Flood"
            </A>
        </div>
    }
}
