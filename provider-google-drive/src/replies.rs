use core_runtime::events::DriveEvent;
use serde_json::json;
use tracing::{info, instrument};

use crate::comments::{comment_path, preview};
use crate::drive::Drive;
use crate::error::Result;
use crate::types::{Reply, ReplyList};

/// Replies to a comment, addressed by file and comment id
pub struct Replies<'a> {
    drive: &'a Drive,
}

impl<'a> Replies<'a> {
    pub(crate) fn new(drive: &'a Drive) -> Self {
        Self { drive }
    }

    #[instrument(skip(self, content))]
    pub async fn create(&self, file_id: &str, comment_id: &str, content: &str) -> Result<Reply> {
        let reply: Reply = self
            .drive
            .connector()
            .post_json(
                &replies_path(file_id, comment_id),
                &[("fields", "*")],
                &json!({ "content": content }),
            )
            .await?;

        info!(reply_id = %reply.id, content = %preview(content), "Replied to comment");
        self.drive.emit(DriveEvent::ReplyCreated {
            file_id: file_id.to_string(),
            comment_id: comment_id.to_string(),
            reply_id: reply.id.clone(),
        });
        Ok(reply)
    }

    pub async fn get(&self, file_id: &str, comment_id: &str, reply_id: &str) -> Result<Reply> {
        self.drive
            .connector()
            .get_json(
                &reply_path(file_id, comment_id, reply_id),
                &[("fields", "*")],
            )
            .await
    }

    #[instrument(skip(self, content))]
    pub async fn update(
        &self,
        file_id: &str,
        comment_id: &str,
        reply_id: &str,
        content: &str,
    ) -> Result<Reply> {
        let reply: Reply = self
            .drive
            .connector()
            .patch_json(
                &reply_path(file_id, comment_id, reply_id),
                &[("fields", "*")],
                &json!({ "content": content }),
            )
            .await?;

        info!(content = %preview(content), "Updated reply");
        self.drive.emit(DriveEvent::ReplyUpdated {
            file_id: file_id.to_string(),
            comment_id: comment_id.to_string(),
            reply_id: reply_id.to_string(),
        });
        Ok(reply)
    }

    pub async fn list(&self, file_id: &str, comment_id: &str) -> Result<Vec<Reply>> {
        self.drive
            .connector()
            .get_all::<ReplyList>(&replies_path(file_id, comment_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, file_id: &str, comment_id: &str, reply_id: &str) -> Result<()> {
        self.drive
            .connector()
            .delete(&reply_path(file_id, comment_id, reply_id))
            .await?;

        info!("Deleted reply");
        self.drive.emit(DriveEvent::ReplyDeleted {
            file_id: file_id.to_string(),
            comment_id: comment_id.to_string(),
            reply_id: reply_id.to_string(),
        });
        Ok(())
    }
}

fn replies_path(file_id: &str, comment_id: &str) -> String {
    format!("{}/replies", comment_path(file_id, comment_id))
}

fn reply_path(file_id: &str, comment_id: &str, reply_id: &str) -> String {
    format!(
        "{}/{}",
        replies_path(file_id, comment_id),
        urlencoding::encode(reply_id)
    )
}
