//! Per-project client/admin chat history
//!
//! Delivery to open browsers stays with Supabase Realtime; this module only
//! reads and writes `messages` rows.

use crate::error::AppError;
use crate::supabase::one_or_many;
use crate::supabase::row_id::{deserialize_id, deserialize_opt_id};
use crate::supabase::{Order, Select, SupabaseClient};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MESSAGES: &str = "messages";

const MESSAGE_COLUMNS: &str = "*,profiles(full_name,role,avatar_url)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub project_id: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub sender_id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Sender profile, normalized from object-or-array join
    #[serde(default, deserialize_with = "one_or_many::first")]
    pub profiles: Option<Profile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMessage {
    pub sender_id: Uuid,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct MessageInsert<'a> {
    project_id: Uuid,
    sender_id: Uuid,
    content: &'a str,
}

pub async fn list_messages(client: &SupabaseClient, project_id: Uuid) -> Result<Vec<ChatMessage>, AppError> {
    client
        .select(
            &Select::from(MESSAGES)
                .columns(MESSAGE_COLUMNS)
                .eq("project_id", project_id)
                .order("created_at", Order::Asc),
        )
        .await
}

pub async fn send_message(
    client: &SupabaseClient,
    project_id: Uuid,
    message: &NewMessage,
) -> Result<ChatMessage, AppError> {
    let content = message.content.trim();
    if content.is_empty() {
        return Err(AppError::BadRequest("message content cannot be empty".to_string()));
    }

    client
        .insert(
            MESSAGES,
            &MessageInsert {
                project_id,
                sender_id: message.sender_id,
                content,
            },
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_with_array_profile() {
        let message: ChatMessage = serde_json::from_str(
            r#"{
                "id": "m1",
                "project_id": "p1",
                "sender_id": "u1",
                "content": "Halo, progres desain sudah 80%",
                "created_at": "2024-05-01T10:00:00+00:00",
                "profiles": [{"full_name": "Admin MiraiDev", "role": "admin"}]
            }"#,
        )
        .unwrap();

        let profile = message.profiles.unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("Admin MiraiDev"));
        assert_eq!(profile.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_message_without_profile() {
        let message: ChatMessage =
            serde_json::from_str(r#"{"id": 1, "project_id": 2, "content": "ok"}"#).unwrap();
        assert_eq!(message.id, "1");
        assert!(message.sender_id.is_none());
        assert!(message.profiles.is_none());
    }
}
