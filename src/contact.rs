//! Contact form intake (lead pipeline entry point)

use crate::error::AppError;
use crate::feed::{ChangeEvent, ChangeKind, LocalFeed};
use crate::supabase::row_id::deserialize_id;
use crate::supabase::SupabaseClient;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const CONTACT_SUBMISSIONS: &str = "contact_submissions";

/// Status given to new submissions
pub const NEW_STATUS: &str = "baru";

#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct NewSubmission<'a> {
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    company: Option<&'a str>,
    service: Option<&'a str>,
    budget: Option<&'a str>,
    message: &'a str,
    status: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(AppError::BadRequest(format!("invalid email address '{}'", self.email.trim())));
        }
        if self.message.trim().is_empty() {
            return Err(AppError::BadRequest("message is required".to_string()));
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Store a submission and notify local subscribers
pub async fn submit(
    client: &SupabaseClient,
    feed: &LocalFeed,
    form: &ContactForm,
) -> Result<ContactSubmission, AppError> {
    form.validate()?;

    let row = NewSubmission {
        name: form.name.trim(),
        email: form.email.trim(),
        phone: non_blank(&form.phone),
        company: non_blank(&form.company),
        service: non_blank(&form.service),
        budget: non_blank(&form.budget),
        message: form.message.trim(),
        status: NEW_STATUS,
    };

    let stored: ContactSubmission = client.insert(CONTACT_SUBMISSIONS, &row).await?;
    info!(submission_id = %stored.id, "Contact submission stored");

    feed.publish(ChangeEvent::new(CONTACT_SUBMISSIONS, ChangeKind::Insert));
    Ok(stored)
}
