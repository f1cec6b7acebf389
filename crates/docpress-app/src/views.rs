/*
[INPUT]:  Session user, wallet address and bridge activity
[OUTPUT]: Plain view models for the dashboard and profile pages
[POS]:    Presentation layer - page data independent of rendering
[UPDATE]: When page content changes
*/

use chrono::{DateTime, NaiveDate};
use docpress_adapter::{Activity, Address, short_address, short_hash};

use crate::routes::Route;
use crate::session::User;

const JOINED_FALLBACK: &str = "Dec 2023";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCard {
    pub title: &'static str,
    pub description: &'static str,
    pub route: Route,
}

const ACTION_CARDS: [ActionCard; 4] = [
    ActionCard {
        title: "My Profile",
        description: "View and manage your account",
        route: Route::Profile,
    },
    ActionCard {
        title: "Issue Certificate",
        description: "Create a new blockchain-verified certificate",
        route: Route::Issue,
    },
    ActionCard {
        title: "Verify Certificate",
        description: "Check the authenticity of a certificate",
        route: Route::Verify,
    },
    ActionCard {
        title: "Revoke Certificate",
        description: "Invalidate a previously issued certificate",
        route: Route::Revoke,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub greeting: String,
    pub wallet: Option<String>,
    pub cards: Vec<ActionCard>,
}

impl DashboardView {
    pub fn build(user: Option<&User>, address: Option<Address>) -> Self {
        let greeting = match user {
            Some(user) => format!("Logged in as: {}", user.name),
            None => "Welcome".to_string(),
        };
        Self {
            greeting,
            wallet: address.as_ref().map(short_address),
            cards: ACTION_CARDS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    pub kind: String,
    pub date: String,
    pub tx_hash: Option<String>,
    pub student_name: String,
}

impl From<&Activity> for ActivityRow {
    fn from(activity: &Activity) -> Self {
        Self {
            kind: activity.kind.to_string(),
            date: activity.at.format("%Y-%m-%d").to_string(),
            tx_hash: activity.tx_hash.as_ref().map(short_hash),
            student_name: activity.student_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub name: Option<String>,
    pub email: Option<String>,
    pub initials: String,
    pub wallet: Option<String>,
    pub role: String,
    pub joined: String,
    pub explorer_link: Option<String>,
    pub history: Vec<ActivityRow>,
}

impl ProfileView {
    pub fn build(
        user: Option<&User>,
        address: Option<Address>,
        activity: &[Activity],
        explorer_url: &str,
    ) -> Self {
        let checksummed = address.map(|address| address.to_checksum(None));
        let initials = checksummed
            .as_deref()
            .and_then(|address| address.get(2..4))
            .map(str::to_uppercase)
            .unwrap_or_else(|| "??".to_string());
        let explorer_link = checksummed.as_deref().map(|address| {
            format!("{}/address/{address}", explorer_url.trim_end_matches('/'))
        });

        Self {
            name: user.map(|user| user.name.clone()),
            email: user.map(|user| user.email.clone()),
            initials,
            wallet: address.as_ref().map(short_address),
            role: user
                .map(|user| user.role.label().to_string())
                .unwrap_or_else(|| "User".to_string()),
            joined: user
                .and_then(|user| joined_label(&user.created_at))
                .unwrap_or_else(|| JOINED_FALLBACK.to_string()),
            explorer_link,
            history: activity.iter().rev().map(ActivityRow::from).collect(),
        }
    }
}

/// `Jan 2023` style label for a stored creation date
fn joined_label(created_at: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(created_at, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(created_at).ok().map(|dt| dt.date_naive()))?;
    Some(date.format("%b %Y").to_string())
}
