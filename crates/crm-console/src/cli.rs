//! Output formatting for the CLI commands

use comfy_table::{Cell, Color, ContentArrangement, Table};
use crm_core::models::Credentials;
use crm_core::{NavigationState, Resolution, Session};
use serde_json::json;

/// One-line summary of how a path resolved
pub fn describe_resolution(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Dashboard => "dashboard".to_string(),
        Resolution::Section(section) => format!("section {}", section.label()),
        Resolution::Detail { kind, id } => format!("{} {}", kind.label(), id),
        Resolution::ListFallback { kind, error } => {
            format!("{} list (record unavailable: {})", kind.label(), error)
        }
        Resolution::Redirected { from } => format!("unknown path {from}, redirected to dashboard"),
        Resolution::Superseded => "superseded by a newer navigation".to_string(),
    }
}

/// Resolved navigation state (human table or JSON)
pub fn format_resolution(
    resolution: &Resolution,
    state: &NavigationState,
    path: &str,
    json: bool,
    no_color: bool,
) -> String {
    if json {
        let value = json!({
            "resolution": describe_resolution(resolution),
            "path": path,
            "state": state,
        });
        return serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if no_color {
        table.set_header(vec!["Field", "Value"]);
    } else {
        table.set_header(vec![
            Cell::new("Field").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    }

    table.add_row(vec![
        "Resolution".to_string(),
        describe_resolution(resolution),
    ]);
    table.add_row(vec!["Path".to_string(), path.to_string()]);
    table.add_row(vec![
        "Section".to_string(),
        state.active_section.label().to_string(),
    ]);
    table.add_row(vec![
        "Selected".to_string(),
        state
            .selected
            .as_ref()
            .map(|s| format!("{} {}", s.kind.label(), s.id()))
            .unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec![
        "Detail view".to_string(),
        state.is_detail_view.to_string(),
    ]);
    table.add_row(vec![
        "Nested view".to_string(),
        state.is_nested_view.to_string(),
    ]);

    if let Some(selected) = &state.selected {
        let mut fields: Vec<_> = selected.record.fields.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in fields {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            table.add_row(vec![format!("  {key}"), truncate(&value, 60)]);
        }
    }

    table.to_string()
}

/// Stored session summary (human or JSON); never prints secrets
pub fn format_status(session: Option<&Session>, json: bool) -> String {
    let Some(session) = session else {
        return if json {
            json!({ "logged_in": false }).to_string()
        } else {
            "Not logged in.".to_string()
        };
    };

    let credential = match &session.credentials {
        Credentials::ApiKey { key, .. } => format!("api key {key}"),
        Credentials::SessionId { .. } => "session cookie".to_string(),
    };

    if json {
        let value = json!({
            "logged_in": true,
            "company": session.company_id,
            "user": session.identity.username,
            "email": session.identity.email,
            "credential": credential,
            "created_at": session.created_at.to_rfc3339(),
        });
        return serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
    }

    let mut lines = vec![];
    lines.push(format!("User:             {}", session.identity.full_name));
    lines.push(format!("Email:            {}", session.identity.email));
    lines.push(format!(
        "Company:          {}",
        if session.company_id.is_empty() {
            "-"
        } else {
            &session.company_id
        }
    ));
    lines.push(format!("Credential:       {}", credential));
    if !session.role_profile.name.is_empty() {
        lines.push(format!("Role profile:     {}", session.role_profile.name));
    }
    lines.push(format!(
        "Logged in:        {}",
        session.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    lines.join("\n")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
