//! Public site pages. No sign-in needed.

use axum::extract::{Path, State};
use axum::response::Html;

use eco_core::entities::{Narrative, Opportunity};
use eco_core::enums::OpportunityStatus;
use eco_core::format::{deadline_label, format_currency, truncate};

use super::today;
use crate::components::{
    Area, badge, card, empty_state, escape, is_web_url, layout, link, path_with_id, stat_card,
    status_dot,
};
use crate::error::WebError;
use crate::state::AppState;

const HOME_STORY_COUNT: u32 = 3;
const EXCERPT_CHARS: usize = 240;

pub(crate) fn amount_html(opportunity: &Opportunity) -> String {
    opportunity.amount_cents.map_or_else(
        || empty_state("Amount not stated"),
        |cents| badge(&format_currency(cents, &opportunity.currency), "money"),
    )
}

fn story_html(narrative: &Narrative) -> String {
    let published = narrative
        .published_at
        .map(|at| at.format("%-d %B %Y").to_string())
        .unwrap_or_default();
    format!(
        "<article><h3>{}</h3><p class=\"meta\">{}</p><p>{}</p></article>",
        escape(&narrative.title),
        escape(&published),
        escape(&truncate(&narrative.body, EXCERPT_CHARS))
    )
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn home(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let svc = &state.service;
    let organizations = svc.count_organizations().await?;
    let practitioners = svc.count_practitioners().await?;
    let open = svc
        .count_opportunities_by_status(OpportunityStatus::Open)
        .await?;
    let stories = svc.list_published_narratives(HOME_STORY_COUNT).await?;

    let region = if state.site.region.is_empty() {
        String::new()
    } else {
        format!(
            "<p class=\"lead\">Mapping the creative economy of {}.</p>",
            escape(&state.site.region)
        )
    };
    let stats = format!(
        "<div class=\"stats\">{}{}{}</div>",
        stat_card("Organizations", &organizations.to_string()),
        stat_card("Practitioners", &practitioners.to_string()),
        stat_card("Open opportunities", &open.to_string()),
    );
    let stories_html = if stories.is_empty() {
        empty_state("No stories published yet.")
    } else {
        stories.iter().map(story_html).collect()
    };

    let body = format!(
        "{region}{stats}{}<p>{}</p>",
        card("Latest stories", &stories_html),
        link("/opportunities", "Browse open opportunities")
    );
    Ok(Html(layout(&state.site.title, "Welcome", Area::Public, &body)))
}

pub async fn opportunities(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let open = state
        .service
        .list_opportunities_by_status(OpportunityStatus::Open, state.site.default_limit)
        .await?;
    let today = today();

    let body = if open.is_empty() {
        empty_state("There are no open opportunities right now.")
    } else {
        open.iter()
            .map(|opp| {
                let funder = opp
                    .funder
                    .as_deref()
                    .map(|f| format!("<p class=\"meta\">{}</p>", escape(f)))
                    .unwrap_or_default();
                format!(
                    "<article><h2>{}</h2>{funder}<p>{} {}</p></article>",
                    link(&path_with_id("/opportunities", &opp.id), &opp.title),
                    amount_html(opp),
                    badge(&deadline_label(opp.deadline, today), "deadline"),
                )
            })
            .collect()
    };
    Ok(Html(layout(&state.site.title, "Opportunities", Area::Public, &body)))
}

pub async fn opportunity_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, WebError> {
    let overview = state
        .service
        .get_opportunity_overview(&id)
        .await
        .map_err(WebError::lookup("Opportunity"))?;
    let opp = &overview.opportunity;
    if opp.status == OpportunityStatus::Draft {
        return Err(WebError::NotFound("Opportunity".into()));
    }

    let description = opp
        .description
        .as_deref()
        .map(|d| format!("<p>{}</p>", escape(d)))
        .unwrap_or_default();
    let external = opp
        .url
        .as_deref()
        .filter(|u| is_web_url(u))
        .map(|u| format!("<p>{}</p>", link(u.trim(), "Full details and application")))
        .unwrap_or_default();
    let interest_form = if opp.status.is_accepting() {
        format!(
            "<form method=\"post\" action=\"{}\">\
<label>Note <input name=\"note\" maxlength=\"500\"></label>\
<button type=\"submit\">I'm interested</button></form>",
            escape(&format!("{}/interest", path_with_id("/actions/opportunities", &opp.id)))
        )
    } else {
        String::new()
    };

    let body = format!(
        "<p>{} {} {}</p>{description}<p class=\"meta\">{} interested</p>{external}{interest_form}",
        status_dot(opp.status.as_str()),
        amount_html(opp),
        badge(&deadline_label(opp.deadline, today()), "deadline"),
        overview.interest_count,
    );
    Ok(Html(layout(&state.site.title, &opp.title, Area::Public, &body)))
}

pub async fn stories(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let narratives = state
        .service
        .list_published_narratives(state.site.default_limit)
        .await?;
    let body = if narratives.is_empty() {
        empty_state("No stories published yet.")
    } else {
        narratives.iter().map(story_html).collect()
    };
    Ok(Html(layout(&state.site.title, "Stories", Area::Public, &body)))
}
