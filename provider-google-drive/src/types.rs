//! Google Drive API response types
//!
//! Data structures for deserializing Google Drive API v3 responses. File
//! resources stay untyped ([`Entity`]) because their shape follows the
//! caller's field selector.

use bridge_traits::listing::Entity;
use chrono::{DateTime, Utc};
use core_search::constants::Role;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Google Drive API files.list response
///
/// See: https://developers.google.com/drive/api/v3/reference/files/list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesListResponse {
    #[serde(default)]
    pub files: Vec<Entity>,

    /// Token for next page
    pub next_page_token: Option<String>,
}

/// Collection response paged by `nextPageToken`
pub(crate) trait PagedList: serde::de::DeserializeOwned {
    type Item;
    /// Name of the collection field, also used as the field selector
    const FIELD: &'static str;

    fn into_page(self) -> (Vec<Self::Item>, Option<String>);
}

/// A user as it appears on comments, revisions and permissions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub display_name: Option<String>,
    pub email_address: Option<String>,
    pub permission_id: Option<String>,
    #[serde(default)]
    pub me: bool,
}

/// Permission resource
///
/// See: https://developers.google.com/drive/api/v3/reference/permissions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: String,

    /// `user`, `group`, `domain` or `anyone`
    #[serde(rename = "type")]
    pub kind: Option<String>,

    pub role: Role,
    pub email_address: Option<String>,
    pub domain: Option<String>,
    pub display_name: Option<String>,

    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PermissionList {
    #[serde(default)]
    pub permissions: Vec<Permission>,
    pub next_page_token: Option<String>,
}

impl PagedList for PermissionList {
    type Item = Permission;
    const FIELD: &'static str = "permissions";

    fn into_page(self) -> (Vec<Permission>, Option<String>) {
        (self.permissions, self.next_page_token)
    }
}

/// Comment resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub content: String,
    pub author: Option<User>,
    pub created_time: Option<DateTime<Utc>>,
    pub modified_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentList {
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub next_page_token: Option<String>,
}

impl PagedList for CommentList {
    type Item = Comment;
    const FIELD: &'static str = "comments";

    fn into_page(self) -> (Vec<Comment>, Option<String>) {
        (self.comments, self.next_page_token)
    }
}

/// Reply resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    #[serde(default)]
    pub content: String,
    pub author: Option<User>,
    pub created_time: Option<DateTime<Utc>>,
    pub modified_time: Option<DateTime<Utc>>,
    /// `resolve` or `reopen`
    pub action: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReplyList {
    #[serde(default)]
    pub replies: Vec<Reply>,
    pub next_page_token: Option<String>,
}

impl PagedList for ReplyList {
    type Item = Reply;
    const FIELD: &'static str = "replies";

    fn into_page(self) -> (Vec<Reply>, Option<String>) {
        (self.replies, self.next_page_token)
    }
}

/// Revision resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub id: String,
    pub mime_type: Option<String>,
    pub modified_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub keep_forever: bool,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub size: Option<u64>,
    pub last_modifying_user: Option<User>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RevisionList {
    #[serde(default)]
    pub revisions: Vec<Revision>,
    pub next_page_token: Option<String>,
}

impl PagedList for RevisionList {
    type Item = Revision;
    const FIELD: &'static str = "revisions";

    fn into_page(self) -> (Vec<Revision>, Option<String>) {
        (self.revisions, self.next_page_token)
    }
}

/// Account storage quota in bytes
///
/// `limit` is absent for unlimited accounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageQuota {
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub limit: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub usage: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub usage_in_drive: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_u64")]
    pub usage_in_drive_trash: Option<u64>,
}

impl StorageQuota {
    /// Usage as a percentage of the limit, two decimals
    ///
    /// `None` for unlimited accounts.
    pub fn usage_percent(&self) -> Option<f64> {
        let limit = self.limit.filter(|limit| *limit > 0)?;
        let usage = self.usage.unwrap_or(0);
        let percent = usage as f64 / limit as f64 * 100.0;
        Some((percent * 100.0).round() / 100.0)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AboutQuota {
    #[serde(default)]
    pub storage_quota: StorageQuota,
}

/// Drive encodes int64 values as JSON strings
fn de_opt_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Text(String),
        Number(u64),
    }

    match Option::<Int64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Int64::Number(n)) => Ok(Some(n)),
        Some(Int64::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
