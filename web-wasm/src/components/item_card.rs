//! ダッシュボードのアイテムカード

use arbitrage_common::ListEntry;
use leptos::prelude::*;

#[component]
pub fn ItemCard(entry: ListEntry) -> impl IntoView {
    let score_label = entry.score_label();
    let location_label = entry.location_label();
    let badge = format!("badge badge-{}", entry.tier.badge_class());

    view! {
        <div class="card">
            {entry.image.clone().map(|src| view! {
                <img class="card-img" src=src alt="Item image" />
            })}
            <div class="card-header">
                <h5>{format!("Item #{}", entry.id)}</h5>
                <span class=badge>{format!("Score: {}", score_label)}</span>
            </div>
            <div class="card-body">
                <p><strong>"Reasoning: "</strong>{entry.reasoning.clone()}</p>
                <p>
                    <strong>"Location: "</strong>
                    {match entry.maps_link() {
                        Some(link) => view! {
                            <a href=link target="_blank" rel="noopener noreferrer">{location_label}</a>
                        }.into_any(),
                        None => location_label.into_any(),
                    }}
                </p>
                <p>
                    <strong>"Status: "</strong>
                    <span class="badge badge-secondary">{entry.status.clone()}</span>
                </p>
            </div>
            <div class="card-footer">
                <a href=entry.url.clone() target="_blank" rel="noopener noreferrer" class="btn btn-primary">
                    "View Listing"
                </a>
            </div>
        </div>
    }
}
