use chrono::{DateTime, Utc};
use shared::entity::users;

pub fn toggle_status(user: &mut users::Model, now: DateTime<Utc>) {
    user.status = user.user_status().toggled().as_str().to_string();
    user.updated_at = Some(now);
}

/// Blank notes clear the field.
pub fn set_admin_note(user: &mut users::Model, note: Option<String>, now: DateTime<Utc>) {
    user.admin_note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    user.updated_at = Some(now);
}
