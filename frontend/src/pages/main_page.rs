//! Public landing page: active flood alerts, announcements and expert posts.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use myflood_shared::protocol::{PublicAnnouncementsRequest, PublicNotificationsRequest};
use myflood_shared::{Announcement, FloodNotification, Post};

use crate::api::use_api;
use crate::components::toast_view::use_toasts;
use crate::guard::PATH_REQUEST_FORM;

/// Case-insensitive substring match over title, description and
/// organization. Empty search returns everything.
pub fn filter_posts(posts: &[Post], search: &str) -> Vec<Post> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return posts.to_vec();
    }
    posts
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
                || p.organization.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

#[component]
pub fn MainPage() -> impl IntoView {
    let api = use_api();
    let toasts = use_toasts();

    let (posts, set_posts) = signal(Vec::<Post>::new());
    let (notifications, set_notifications) = signal(Vec::<FloodNotification>::new());
    let (announcements, set_announcements) = signal(Vec::<Announcement>::new());
    let (loading, set_loading) = signal(true);
    let (search, set_search) = signal(String::new());

    Effect::new(move |_| {
        let api = api.clone();
        spawn_local(async move {
            match api.posts().await {
                Ok(items) => set_posts.set(items),
                Err(err) => toasts.error(err.user_message()),
            }
            if let Ok(list) = api.send(&PublicNotificationsRequest).await {
                set_notifications.set(
                    list.notifications
                        .into_iter()
                        .filter(|n| n.is_active)
                        .collect(),
                );
            }
            if let Ok(list) = api.send(&PublicAnnouncementsRequest).await {
                set_announcements.set(
                    list.announcements
                        .into_iter()
                        .filter(|a| a.is_active)
                        .collect(),
                );
            }
            set_loading.set(false);
        });
    });

    let filtered = move || filter_posts(&posts.get(), &search.get());

    view! {
        <div class="container mx-auto px-4 py-6 space-y-8">
            // Active flood alerts, most severe styling per alert.
            <For
                each=move || notifications.get()
                key=|n: &FloodNotification| n.notification_id.clone()
                children=move |n: FloodNotification| {
                    let regions = n
                        .affected_regions
                        .iter()
                        .map(|r| r.label())
                        .collect::<Vec<_>>()
                        .join(", ");
                    view! {
                        <div role="alert" class=format!("alert {}", n.severity.css_class())>
                            <div>
                                <h3 class="font-bold">{n.title.clone()}</h3>
                                <p>{n.message.clone()}</p>
                                <Show when={
                                    let regions = regions.clone();
                                    move || !regions.is_empty()
                                }>
                                    <p class="text-sm opacity-80">
                                        {format!("Affected: {}", regions)}
                                    </p>
                                </Show>
                            </div>
                        </div>
                    }
                }
            />

            <div class="hero bg-base-200 rounded-2xl">
                <div class="hero-content text-center py-10">
                    <div class="max-w-lg">
                        <h1 class="text-4xl font-bold">"MYFlood"</h1>
                        <p class="py-4 text-base-content/70">
                            "Community flood reporting and alerts for Malaysia. \
                             Report a flood, ask for help, and stay informed."
                        </p>
                        <A href=PATH_REQUEST_FORM attr:class="btn btn-primary">
                            "Report a Flood"
                        </A>
                    </div>
                </div>
            </div>

            <Show when=move || !announcements.get().is_empty()>
                <section class="space-y-3">
                    <h2 class="text-2xl font-bold">"Announcements"</h2>
                    <For
                        each=move || announcements.get()
                        key=|a: &Announcement| a.announcement_id.clone()
                        children=move |a: Announcement| {
                            view! {
                                <div class="card bg-base-100 shadow-sm">
                                    <div class="card-body py-4">
                                        <h3 class="card-title text-base">{a.title.clone()}</h3>
                                        <p class="text-sm text-base-content/70">{a.content.clone()}</p>
                                    </div>
                                </div>
                            }
                        }
                    />
                </section>
            </Show>

            <section class="space-y-4">
                <div class="flex items-center justify-between">
                    <h2 class="text-2xl font-bold">"Latest Reports"</h2>
                    <input
                        type="text"
                        placeholder="Search reports..."
                        class="input input-bordered w-64"
                        prop:value=search
                        on:input=move |ev| set_search.set(event_target_value(&ev))
                    />
                </div>

                <Show when=move || loading.get()>
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </Show>

                <Show when=move || !loading.get() && filtered().is_empty()>
                    <p class="text-base-content/60">"No reports match your search."</p>
                </Show>

                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                    <For
                        each=filtered
                        key=|p: &Post| p.post_id.clone()
                        children=move |p: Post| {
                            let image = p.image_url.clone().unwrap_or_default();
                            let alt_title = p.title.clone();
                            view! {
                                <div class="card bg-base-100 shadow-md">
                                    <Show when={
                                        let image = image.clone();
                                        move || !image.is_empty()
                                    }>
                                        <figure>
                                            <img
                                                src=image.clone()
                                                alt=alt_title.clone()
                                                class="h-40 w-full object-cover"
                                            />
                                        </figure>
                                    </Show>
                                    <div class="card-body">
                                        <h3 class="card-title">{p.title.clone()}</h3>
                                        <p class="text-sm text-base-content/70">
                                            {p.description.clone()}
                                        </p>
                                        <div class="card-actions justify-between items-center mt-2">
                                            <span class="badge badge-outline">
                                                {p.organization.clone()}
                                            </span>
                                            <span class="text-xs text-base-content/50">
                                                {p.created_at.format("%Y-%m-%d").to_string()}
                                            </span>
                                        </div>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
            </section>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn post(title: &str, description: &str, organization: &str) -> Post {
        Post {
            post_id: title.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            image_url: None,
            organization: organization.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_search_keeps_everything() {
        let posts = vec![post("a", "b", "c"), post("d", "e", "f")];
        assert_eq!(filter_posts(&posts, "").len(), 2);
        assert_eq!(filter_posts(&posts, "   ").len(), 2);
    }

    #[test]
    fn search_matches_any_field_case_insensitively() {
        let posts = vec![
            post("Klang river rising", "water level up", "JPS Selangor"),
            post("Road closure", "Jalan Ipoh flooded", "DBKL"),
        ];
        assert_eq!(filter_posts(&posts, "KLANG").len(), 1);
        assert_eq!(filter_posts(&posts, "flooded")[0].title, "Road closure");
        assert_eq!(filter_posts(&posts, "jps").len(), 1);
        assert!(filter_posts(&posts, "penang").is_empty());
    }
}
