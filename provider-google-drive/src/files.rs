//! File and folder operations
//!
//! Thin wrappers over `files.*`. Every mutation logs at `info` and, when the
//! client has an event bus, publishes a [`DriveEvent`].

use bridge_traits::listing::{Entity, ALL_FIELDS};
use core_runtime::events::DriveEvent;
use core_search::constants::MimeType;
use core_search::{Clause, ListOptions};
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::drive::Drive;
use crate::error::{GoogleDriveError, Result};

/// Fields returned by mutating calls
pub const DEFAULT_FILE_FIELDS: &str = "id, name, mimeType, size, parents, webViewLink, owners";

/// Naming and placement for [`Files::copy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOptions {
    /// Prepended to the source name
    pub prefix: Option<String>,
    /// Appended to the source name
    pub suffix: Option<String>,
    /// Destination folder; the source's folder when `None`
    pub parent_id: Option<String>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            prefix: Some("Copy of ".to_string()),
            suffix: None,
            parent_id: None,
        }
    }
}

impl CopyOptions {
    fn copy_name(&self, source: &str) -> String {
        format!(
            "{}{}{}",
            self.prefix.as_deref().unwrap_or_default(),
            source,
            self.suffix.as_deref().unwrap_or_default()
        )
    }
}

/// Content restriction applied by [`Files::restrict`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRestriction {
    pub read_only: bool,
    /// Only the owner may lift the restriction
    pub owner_restricted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ContentRestriction {
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }
}

pub struct Files<'a> {
    drive: &'a Drive,
}

impl<'a> Files<'a> {
    pub(crate) fn new(drive: &'a Drive) -> Self {
        Self { drive }
    }

    /// Search files, paging through every result
    ///
    /// With `options.recursive`, also lists the contents of every folder
    /// found, depth-first.
    pub async fn list(&self, clauses: &[Clause], options: &ListOptions) -> Result<Vec<Entity>> {
        Ok(self.drive.engine().list(clauses, options).await?)
    }

    /// [`list`](Self::list) that stops when `cancel` fires
    pub async fn list_with_cancel(
        &self,
        clauses: &[Clause],
        options: &ListOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<Entity>> {
        Ok(self
            .drive
            .engine()
            .list_with_cancel(clauses, options, cancel)
            .await?)
    }

    /// File or folder metadata; all fields when `fields` is `None`
    pub async fn get(&self, file_id: &str, fields: Option<&str>) -> Result<Entity> {
        let fields = fields.unwrap_or(ALL_FIELDS);
        self.drive
            .connector()
            .get_json(&file_path(file_id), &[("fields", fields)])
            .await
    }

    /// Create an empty file or a folder
    ///
    /// Shortcuts need a target; use [`create_shortcut`](Self::create_shortcut).
    #[instrument(skip(self, mime_type))]
    pub async fn create(
        &self,
        name: &str,
        mime_type: impl Into<MimeType>,
        parent_id: Option<&str>,
    ) -> Result<Entity> {
        let mime_type = mime_type.into();
        if mime_type == MimeType::Shortcut {
            return Err(GoogleDriveError::InvalidInput(
                "shortcuts need a target, use create_shortcut".to_string(),
            ));
        }

        let mut body = json!({ "name": name, "mimeType": mime_type.as_str() });
        if let Some(parent) = parent_id {
            body["parents"] = json!([parent]);
        }

        let file: Entity = self
            .drive
            .connector()
            .post_json("files", &[("fields", DEFAULT_FILE_FIELDS)], &body)
            .await?;

        info!(file_id = file.id().unwrap_or_default(), mime_type = %mime_type, "Created file");
        self.drive.emit(DriveEvent::FileCreated {
            file_id: file.id().unwrap_or_default().to_string(),
            name: name.to_string(),
            mime_type: mime_type.resolve(),
            parent_id: parent_id.map(str::to_string),
        });
        Ok(file)
    }

    /// Create a shortcut to `target_id`, named after the target by default
    #[instrument(skip(self))]
    pub async fn create_shortcut(
        &self,
        target_id: &str,
        name: Option<&str>,
        parent_id: Option<&str>,
    ) -> Result<Entity> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.source_name(target_id).await?,
        };

        let mut body = json!({
            "name": name,
            "mimeType": MimeType::Shortcut.as_str(),
            "shortcutDetails": { "targetId": target_id },
        });
        if let Some(parent) = parent_id {
            body["parents"] = json!([parent]);
        }

        let fields = format!("{}, shortcutDetails", DEFAULT_FILE_FIELDS);
        let shortcut: Entity = self
            .drive
            .connector()
            .post_json("files", &[("fields", fields.as_str())], &body)
            .await?;

        info!(target_id, name = %name, "Created shortcut");
        self.drive.emit(DriveEvent::FileCreated {
            file_id: shortcut.id().unwrap_or_default().to_string(),
            name,
            mime_type: MimeType::Shortcut.resolve(),
            parent_id: parent_id.map(str::to_string),
        });
        Ok(shortcut)
    }

    #[instrument(skip(self))]
    pub async fn rename(&self, file_id: &str, name: &str) -> Result<Entity> {
        let file = self.update(file_id, &json!({ "name": name }), &[]).await?;
        info!("Renamed file");
        self.drive.emit(DriveEvent::FileRenamed {
            file_id: file_id.to_string(),
            name: name.to_string(),
        });
        Ok(file)
    }

    /// Move into `folder_id`, replacing the file's first parent
    #[instrument(skip(self))]
    pub async fn move_to(&self, file_id: &str, folder_id: &str) -> Result<Entity> {
        let current = self.get(file_id, Some("id, parents")).await?;
        let old_parent = current.parents().first().map(|p| p.to_string());

        let mut params = vec![("addParents", folder_id)];
        if let Some(old) = old_parent.as_deref() {
            params.push(("removeParents", old));
        }
        let file = self.update(file_id, &json!({}), &params).await?;

        info!(from = old_parent.as_deref().unwrap_or("<none>"), "Moved file");
        self.drive.emit(DriveEvent::FileMoved {
            file_id: file_id.to_string(),
            folder_id: folder_id.to_string(),
        });
        Ok(file)
    }

    /// Copy a file (folders cannot be copied)
    #[instrument(skip(self, options))]
    pub async fn copy(&self, file_id: &str, options: &CopyOptions) -> Result<Entity> {
        let name = options.copy_name(&self.source_name(file_id).await?);

        let mut body = json!({ "name": name });
        if let Some(parent) = options.parent_id.as_deref() {
            body["parents"] = json!([parent]);
        }

        let copy: Entity = self
            .drive
            .connector()
            .post_json(
                &format!("{}/copy", file_path(file_id)),
                &[("fields", DEFAULT_FILE_FIELDS)],
                &body,
            )
            .await?;

        info!(name = %name, "Copied file");
        self.drive.emit(DriveEvent::FileCopied {
            source_id: file_id.to_string(),
            file_id: copy.id().unwrap_or_default().to_string(),
            name,
        });
        Ok(copy)
    }

    #[instrument(skip(self))]
    pub async fn restrict(&self, file_id: &str, restriction: &ContentRestriction) -> Result<Entity> {
        let fields = format!("{}, contentRestrictions", DEFAULT_FILE_FIELDS);
        let file: Entity = self
            .drive
            .connector()
            .patch_json(
                &file_path(file_id),
                &[("fields", fields.as_str())],
                &json!({ "contentRestrictions": [restriction] }),
            )
            .await?;

        info!(read_only = restriction.read_only, "Updated content restriction");
        self.drive.emit(DriveEvent::ContentRestricted {
            file_id: file_id.to_string(),
            read_only: restriction.read_only,
        });
        Ok(file)
    }

    #[instrument(skip(self))]
    pub async fn trash(&self, file_id: &str) -> Result<Entity> {
        let file = self.update(file_id, &json!({ "trashed": true }), &[]).await?;
        info!("Moved file to trash");
        self.drive.emit(DriveEvent::FileTrashed {
            file_id: file_id.to_string(),
        });
        Ok(file)
    }

    #[instrument(skip(self))]
    pub async fn restore(&self, file_id: &str) -> Result<Entity> {
        let file = self.update(file_id, &json!({ "trashed": false }), &[]).await?;
        info!("Restored file from trash");
        self.drive.emit(DriveEvent::FileRestored {
            file_id: file_id.to_string(),
        });
        Ok(file)
    }

    /// Delete permanently, skipping the trash
    #[instrument(skip(self))]
    pub async fn delete(&self, file_id: &str) -> Result<()> {
        self.drive.connector().delete(&file_path(file_id)).await?;
        info!("Deleted file");
        self.drive.emit(DriveEvent::FileDeleted {
            file_id: file_id.to_string(),
        });
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn empty_trash(&self) -> Result<()> {
        self.drive.connector().delete("files/trash").await?;
        info!("Emptied the trash");
        self.drive.emit(DriveEvent::TrashEmptied);
        Ok(())
    }

    async fn update(
        &self,
        file_id: &str,
        body: &serde_json::Value,
        extra_params: &[(&str, &str)],
    ) -> Result<Entity> {
        let mut params = vec![("fields", DEFAULT_FILE_FIELDS)];
        params.extend_from_slice(extra_params);
        self.drive
            .connector()
            .patch_json(&file_path(file_id), &params, body)
            .await
    }

    async fn source_name(&self, file_id: &str) -> Result<String> {
        let file = self.get(file_id, Some("id, name")).await?;
        file.name().map(str::to_string).ok_or_else(|| {
            GoogleDriveError::ParseError(format!("file {} has no name", file_id))
        })
    }
}

fn file_path(file_id: &str) -> String {
    format!("files/{}", urlencoding::encode(file_id))
}
