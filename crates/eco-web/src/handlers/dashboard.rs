//! Dashboard pages. Every page requires a signed-in user; anonymous requests
//! get the 401 "Sign in required" page.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use serde::Deserialize;

use eco_core::entities::{AuditEntry, Investment, Practitioner};
use eco_core::enums::{DecisionStatus, OpportunityStatus, SubmissionStatus};
use eco_core::format::{deadline_label, format_currency, truncate};
use eco_core::identity::AuthIdentity;
use eco_db::error::DatabaseError;
use eco_db::service::EcoService;

use super::public::amount_html;
use super::today;
use crate::components::{
    Area, avatar, badge, card, empty_state, escape, external_link, layout, link, path_with_id,
    stat_card, status_dot, table_or_empty,
};
use crate::error::WebError;
use crate::state::AppState;

const RECENT_COUNT: u32 = 5;
const ACTIVITY_COUNT: u32 = 10;

async fn signed_in(state: &AppState, headers: &HeaderMap) -> Result<AuthIdentity, WebError> {
    state
        .auth
        .identify(headers)
        .await
        .ok_or(WebError::Unauthenticated)
}

fn page(state: &AppState, title: &str, body: &str) -> Html<String> {
    Html(layout(&state.site.title, title, Area::Dashboard, body))
}

fn optional_text(value: Option<&str>) -> String {
    value.map(escape).unwrap_or_default()
}

fn date_text(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// `<select>` form posting a new status to `action`.
fn status_form(action: &str, current: &str, options: &[&str]) -> String {
    let choices: String = options
        .iter()
        .map(|option| {
            let selected = if *option == current { " selected" } else { "" };
            format!(
                "<option value=\"{value}\"{selected}>{label}</option>",
                value = escape(option),
                label = escape(&option.replace('_', " "))
            )
        })
        .collect();
    format!(
        "<form method=\"post\" action=\"{}\"><select name=\"status\">{choices}</select>\
<button type=\"submit\">Update</button></form>",
        escape(action)
    )
}

fn activity_line(entry: &AuditEntry) -> String {
    format!(
        "<li><span class=\"meta\">{}</span> {} {} {} <code>{}</code></li>",
        escape(&entry.created_at.format("%Y-%m-%d %H:%M").to_string()),
        escape(entry.actor_id.as_deref().unwrap_or("System")),
        escape(entry.action.verb()),
        escape(entry.entity_type.as_str()),
        escape(&entry.entity_id)
    )
}

/// Organization names for a set of practitioners, one lookup per organization.
async fn practitioner_org_names(
    svc: &EcoService,
    practitioners: &[Practitioner],
) -> Result<HashMap<String, String>, DatabaseError> {
    let mut names = HashMap::new();
    for org_id in practitioners.iter().filter_map(|p| p.organization_id.as_deref()) {
        if names.contains_key(org_id) {
            continue;
        }
        if let Some(name) = svc.organization_name(org_id).await? {
            names.insert(org_id.to_string(), name);
        }
    }
    Ok(names)
}

fn organization_cell(org_id: Option<&str>, name: Option<&str>) -> String {
    match (org_id, name) {
        (Some(id), Some(name)) => link(&path_with_id("/dashboard/organizations", id), name),
        (Some(id), None) => format!("<code>{}</code>", escape(id)),
        (None, _) => String::new(),
    }
}

fn investment_rows(investments: &[Investment]) -> Vec<Vec<String>> {
    investments
        .iter()
        .map(|inv| {
            vec![
                date_text(inv.invested_on),
                organization_cell(inv.organization_id.as_deref(), inv.organization_name.as_deref()),
                optional_text(inv.funder.as_deref()),
                escape(&format_currency(inv.amount_cents, &inv.currency)),
            ]
        })
        .collect()
}

pub async fn overview(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    signed_in(&state, &headers).await?;
    let svc = &state.service;
    let today = today();

    let stats = format!(
        "<div class=\"stats\">{}{}{}{}{}{}</div>",
        stat_card("Organizations", &svc.count_organizations().await?.to_string()),
        stat_card("Practitioners", &svc.count_practitioners().await?.to_string()),
        stat_card(
            "Open opportunities",
            &svc.count_opportunities_by_status(OpportunityStatus::Open)
                .await?
                .to_string()
        ),
        stat_card(
            "Total investment",
            &format_currency(svc.total_investment_cents().await?, &state.site.currency)
        ),
        stat_card("Open decisions", &svc.count_open_decisions().await?.to_string()),
        stat_card(
            "Pending submissions",
            &svc.count_pending_submissions().await?.to_string()
        ),
    );

    let upcoming: Vec<Vec<String>> = svc
        .upcoming_deadlines(today, RECENT_COUNT)
        .await?
        .iter()
        .map(|opp| {
            vec![
                link(&path_with_id("/opportunities", &opp.id), &opp.title),
                amount_html(opp),
                badge(&deadline_label(opp.deadline, today), "deadline"),
            ]
        })
        .collect();

    let recent: Vec<Vec<String>> = svc
        .list_opportunities(RECENT_COUNT)
        .await?
        .iter()
        .map(|opp| {
            vec![
                link(&path_with_id("/opportunities", &opp.id), &opp.title),
                status_dot(opp.status.as_str()),
                escape(&opp.created_at.format("%Y-%m-%d").to_string()),
            ]
        })
        .collect();

    let decisions: Vec<Vec<String>> = svc
        .list_decisions(RECENT_COUNT)
        .await?
        .iter()
        .map(|d| vec![escape(&d.title), status_dot(d.status.as_str())])
        .collect();

    let activity = svc.recent_audit(ACTIVITY_COUNT).await?;
    let activity_html = if activity.is_empty() {
        empty_state("No activity yet.")
    } else {
        format!(
            "<ul class=\"activity\">{}</ul>",
            activity.iter().map(activity_line).collect::<String>()
        )
    };

    let body = format!(
        "{stats}{}{}{}{}",
        card(
            "Upcoming deadlines",
            &table_or_empty(&["Opportunity", "Amount", "Deadline"], &upcoming, "No upcoming deadlines.")
        ),
        card(
            "Recently added opportunities",
            &table_or_empty(&["Opportunity", "Status", "Added"], &recent, "No opportunities yet.")
        ),
        card(
            "Recent decisions",
            &table_or_empty(&["Decision", "Status"], &decisions, "No decisions recorded.")
        ),
        card("Recent activity", &activity_html),
    );
    Ok(page(&state, "Overview", &body))
}

pub async fn organizations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    signed_in(&state, &headers).await?;
    let rows: Vec<Vec<String>> = state
        .service
        .list_organizations(state.site.default_limit)
        .await?
        .iter()
        .map(|org| {
            vec![
                format!(
                    "{} {}",
                    avatar(&org.name),
                    link(&path_with_id("/dashboard/organizations", &org.id), &org.name)
                ),
                optional_text(org.sector.as_deref()),
                optional_text(org.city.as_deref()),
                org.founded_year.map(|y| y.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    let body = table_or_empty(
        &["Name", "Sector", "City", "Founded"],
        &rows,
        "No organizations yet.",
    );
    Ok(page(&state, "Organizations", &body))
}

pub async fn organization_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    signed_in(&state, &headers).await?;
    let svc = &state.service;
    let org = svc
        .get_organization(&id)
        .await
        .map_err(WebError::lookup("Organization"))?;
    let practitioners = svc.list_practitioners_for_organization(&org.id).await?;
    let investments = svc.list_investments_for_organization(&org.id).await?;

    let mut facts = Vec::new();
    if let Some(sector) = org.sector.as_deref() {
        facts.push(badge(sector, "sector"));
    }
    if let Some(city) = org.city.as_deref() {
        facts.push(escape(city));
    }
    if let Some(website) = org.website.as_deref() {
        facts.push(external_link(website, website));
    }
    let description = org
        .description
        .as_deref()
        .map(|d| format!("<p>{}</p>", escape(d)))
        .unwrap_or_default();

    let practitioner_rows: Vec<Vec<String>> = practitioners
        .iter()
        .map(|p| {
            vec![
                link(&path_with_id("/dashboard/practitioners", &p.id), &p.name),
                optional_text(p.discipline.as_deref()),
            ]
        })
        .collect();
    let total: i64 = investments.iter().map(|i| i.amount_cents).sum();

    let body = format!(
        "<p>{} {}</p>{description}{}{}",
        avatar(&org.name),
        facts.join(" · "),
        card(
            "Practitioners",
            &table_or_empty(&["Name", "Discipline"], &practitioner_rows, "No practitioners linked.")
        ),
        card(
            &format!("Investments ({})", format_currency(total, &state.site.currency)),
            &table_or_empty(
                &["Date", "Organization", "Funder", "Amount"],
                &investment_rows(&investments),
                "No investments recorded."
            )
        ),
    );
    Ok(page(&state, &org.name, &body))
}

pub async fn practitioners(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    signed_in(&state, &headers).await?;
    let svc = &state.service;
    let practitioners = svc.list_practitioners(state.site.default_limit).await?;
    let org_names = practitioner_org_names(svc, &practitioners).await?;

    let rows: Vec<Vec<String>> = practitioners
        .iter()
        .map(|p| {
            let org_id = p.organization_id.as_deref();
            vec![
                format!(
                    "{} {}",
                    avatar(&p.name),
                    link(&path_with_id("/dashboard/practitioners", &p.id), &p.name)
                ),
                optional_text(p.discipline.as_deref()),
                optional_text(p.city.as_deref()),
                organization_cell(org_id, org_id.and_then(|id| org_names.get(id)).map(String::as_str)),
            ]
        })
        .collect();
    let body = table_or_empty(
        &["Name", "Discipline", "City", "Organization"],
        &rows,
        "No practitioners yet.",
    );
    Ok(page(&state, "Practitioners", &body))
}

pub async fn practitioner_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    signed_in(&state, &headers).await?;
    let (practitioner, org_name) = state
        .service
        .get_practitioner_with_organization(&id)
        .await
        .map_err(WebError::lookup("Practitioner"))?;

    let organization = organization_cell(practitioner.organization_id.as_deref(), org_name.as_deref());
    let rows = vec![
        vec!["Discipline".to_string(), optional_text(practitioner.discipline.as_deref())],
        vec!["City".to_string(), optional_text(practitioner.city.as_deref())],
        vec!["Organization".to_string(), organization],
        vec!["Email".to_string(), optional_text(practitioner.email.as_deref())],
        vec![
            "Website".to_string(),
            practitioner
                .website
                .as_deref()
                .map(|w| external_link(w, w))
                .unwrap_or_default(),
        ],
    ];
    let bio = practitioner
        .bio
        .as_deref()
        .map(|b| format!("<p>{}</p>", escape(b)))
        .unwrap_or_default();
    let body = format!(
        "<p>{}</p>{bio}{}",
        avatar(&practitioner.name),
        table_or_empty(&["Field", "Value"], &rows, "")
    );
    Ok(page(&state, &practitioner.name, &body))
}

pub async fn opportunities(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    signed_in(&state, &headers).await?;
    let today = today();
    let statuses: Vec<&str> = OpportunityStatus::ALL.iter().map(|s| s.as_str()).collect();

    let rows: Vec<Vec<String>> = state
        .service
        .list_opportunity_overview(state.site.default_limit)
        .await?
        .iter()
        .map(|row| {
            let opp = &row.opportunity;
            let action = format!("{}/status", path_with_id("/actions/opportunities", &opp.id));
            vec![
                link(&path_with_id("/opportunities", &opp.id), &opp.title),
                status_dot(opp.status.as_str()),
                amount_html(opp),
                escape(&deadline_label(opp.deadline, today)),
                row.interest_count.to_string(),
                status_form(&action, opp.status.as_str(), &statuses),
            ]
        })
        .collect();
    let body = table_or_empty(
        &["Title", "Status", "Amount", "Deadline", "Interested", "Change status"],
        &rows,
        "No opportunities yet.",
    );
    Ok(page(&state, "Opportunities", &body))
}

pub async fn investments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    signed_in(&state, &headers).await?;
    let svc = &state.service;
    let investments = svc.list_investments_resolved(state.site.default_limit).await?;
    let totals: Vec<Vec<String>> = svc
        .investment_totals()
        .await?
        .iter()
        .map(|t| {
            vec![
                organization_cell(Some(&t.organization_id), Some(&t.organization_name)),
                t.investment_count.to_string(),
                escape(&format_currency(t.total_cents, &state.site.currency)),
            ]
        })
        .collect();

    let body = format!(
        "{}{}",
        card(
            "Totals by organization",
            &table_or_empty(&["Organization", "Investments", "Total"], &totals, "No investments yet.")
        ),
        card(
            "All investments",
            &table_or_empty(
                &["Date", "Organization", "Funder", "Amount"],
                &investment_rows(&investments),
                "No investments yet."
            )
        ),
    );
    Ok(page(&state, "Investments", &body))
}

pub async fn decisions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    signed_in(&state, &headers).await?;
    let statuses: Vec<&str> = DecisionStatus::ALL.iter().map(|s| s.as_str()).collect();
    let rows: Vec<Vec<String>> = state
        .service
        .list_decisions(state.site.default_limit)
        .await?
        .iter()
        .map(|d| {
            let action = format!("{}/status", path_with_id("/actions/decisions", &d.id));
            vec![
                escape(&d.title),
                optional_text(d.summary.as_deref().map(|s| truncate(s, 120)).as_deref()),
                status_dot(d.status.as_str()),
                date_text(d.decided_on),
                status_form(&action, d.status.as_str(), &statuses),
            ]
        })
        .collect();
    let body = table_or_empty(
        &["Decision", "Summary", "Status", "Decided", "Change status"],
        &rows,
        "No decisions recorded.",
    );
    Ok(page(&state, "Decisions", &body))
}

pub async fn narratives(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    signed_in(&state, &headers).await?;
    let svc = &state.service;
    let mut rows = Vec::new();
    for n in svc.list_narratives(state.site.default_limit).await? {
        let outputs = svc.list_outputs_for_narrative(&n.id).await?;
        let publish = match n.published_at {
            Some(at) => escape(&at.format("%Y-%m-%d").to_string()),
            None => format!(
                "<form method=\"post\" action=\"{}\"><button type=\"submit\">Publish</button></form>",
                escape(&format!("{}/publish", path_with_id("/actions/narratives", &n.id)))
            ),
        };
        rows.push(vec![
            escape(&n.title),
            status_dot(n.status.as_str()),
            escape(&truncate(&n.body, 120)),
            outputs.len().to_string(),
            publish,
        ]);
    }
    let body = table_or_empty(
        &["Title", "Status", "Excerpt", "Outputs", "Published"],
        &rows,
        "No narratives yet.",
    );
    Ok(page(&state, "Narratives", &body))
}

pub async fn outputs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    signed_in(&state, &headers).await?;
    let rows: Vec<Vec<String>> = state
        .service
        .list_outputs(state.site.default_limit)
        .await?
        .iter()
        .map(|o| {
            vec![
                o.url
                    .as_deref()
                    .map_or_else(|| escape(&o.title), |url| external_link(url, &o.title)),
                badge(o.kind.as_str(), "kind"),
                date_text(o.produced_on),
            ]
        })
        .collect();
    let body = table_or_empty(&["Title", "Kind", "Produced"], &rows, "No outputs yet.");
    Ok(page(&state, "Outputs", &body))
}

#[derive(Debug, Default, Deserialize)]
pub struct SubmissionFilter {
    pub status: Option<String>,
}

pub async fn submissions(
    State(state): State<AppState>,
    Query(filter): Query<SubmissionFilter>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    signed_in(&state, &headers).await?;
    let status = match filter.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            raw.parse::<SubmissionStatus>()
                .map_err(|e| WebError::BadRequest(e.to_string()))?,
        ),
        None => None,
    };
    let statuses: Vec<&str> = SubmissionStatus::ALL.iter().map(|s| s.as_str()).collect();

    let filters: String = std::iter::once(link("/dashboard/submissions", "All"))
        .chain(
            SubmissionStatus::ALL
                .iter()
                .map(|s| link(&format!("/dashboard/submissions?status={}", s.as_str()), s.as_str())),
        )
        .collect::<Vec<_>>()
        .join(" | ");

    let rows: Vec<Vec<String>> = state
        .service
        .list_submissions(status, state.site.default_limit)
        .await?
        .iter()
        .map(|s| {
            let action = format!("{}/status", path_with_id("/actions/submissions", &s.id));
            vec![
                badge(s.kind.as_str(), "kind"),
                escape(&s.title),
                optional_text(s.contact_email.as_deref()),
                status_dot(s.status.as_str()),
                optional_text(s.reviewed_by.as_deref()),
                status_form(&action, s.status.as_str(), &statuses),
            ]
        })
        .collect();

    let body = format!(
        "<p class=\"filters\">{filters}</p>{}",
        table_or_empty(
            &["Kind", "Title", "Contact", "Status", "Reviewed by", "Review"],
            &rows,
            "No submissions match."
        )
    );
    Ok(page(&state, "Submissions", &body))
}

pub async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let identity = signed_in(&state, &headers).await?;
    let svc = &state.service;
    let profile = svc
        .ensure_profile(&identity.user_id, identity.email.as_deref())
        .await?;

    let mut interests = Vec::new();
    for engagement in svc.list_engagements_for_profile(&profile.id).await? {
        let opportunity = match svc.get_opportunity(&engagement.opportunity_id).await {
            Ok(opp) => link(&path_with_id("/opportunities", &opp.id), &opp.title),
            Err(DatabaseError::NoResult) => escape(&engagement.opportunity_id),
            Err(e) => return Err(e.into()),
        };
        let withdraw = format!(
            "<form method=\"post\" action=\"{}\"><button type=\"submit\">Withdraw</button></form>",
            escape(&format!(
                "{}/withdraw",
                path_with_id("/actions/opportunities", &engagement.opportunity_id)
            ))
        );
        interests.push(vec![
            opportunity,
            optional_text(engagement.note.as_deref()),
            withdraw,
        ]);
    }

    let display_name = profile.display_name.as_deref().unwrap_or(&profile.id);
    let form = format!(
        "<form method=\"post\" action=\"/actions/profile\">\
<label>Display name <input name=\"display_name\" value=\"{}\"></label>\
<label>Practitioner ID <input name=\"practitioner_id\" value=\"{}\"></label>\
<button type=\"submit\">Save</button></form>",
        escape(profile.display_name.as_deref().unwrap_or_default()),
        escape(profile.practitioner_id.as_deref().unwrap_or_default()),
    );

    let body = format!(
        "<p>{} {} {}</p>{}{}",
        avatar(display_name),
        escape(display_name),
        badge(profile.role.as_str(), "role"),
        card("Your details", &form),
        card(
            "Your interests",
            &table_or_empty(&["Opportunity", "Note", ""], &interests, "You have not expressed interest in anything yet.")
        ),
    );
    Ok(page(&state, "Profile", &body))
}
