use core_runtime::events::DriveEvent;
use serde_json::json;
use tracing::{info, instrument};

use crate::drive::Drive;
use crate::error::Result;
use crate::types::{Comment, CommentList};

const PREVIEW_CHARS: usize = 20;

pub struct Comments<'a> {
    drive: &'a Drive,
}

impl<'a> Comments<'a> {
    pub(crate) fn new(drive: &'a Drive) -> Self {
        Self { drive }
    }

    #[instrument(skip(self, content))]
    pub async fn create(&self, file_id: &str, content: &str) -> Result<Comment> {
        let comment: Comment = self
            .drive
            .connector()
            .post_json(
                &comments_path(file_id),
                &[("fields", "*")],
                &json!({ "content": content }),
            )
            .await?;

        info!(comment_id = %comment.id, content = %preview(content), "Commented on file");
        self.drive.emit(DriveEvent::CommentCreated {
            file_id: file_id.to_string(),
            comment_id: comment.id.clone(),
        });
        Ok(comment)
    }

    pub async fn get(&self, file_id: &str, comment_id: &str) -> Result<Comment> {
        self.drive
            .connector()
            .get_json(&comment_path(file_id, comment_id), &[("fields", "*")])
            .await
    }

    /// Replace the comment's content
    #[instrument(skip(self, content))]
    pub async fn update(&self, file_id: &str, comment_id: &str, content: &str) -> Result<Comment> {
        let comment: Comment = self
            .drive
            .connector()
            .patch_json(
                &comment_path(file_id, comment_id),
                &[("fields", "*")],
                &json!({ "content": content }),
            )
            .await?;

        info!(content = %preview(content), "Updated comment");
        self.drive.emit(DriveEvent::CommentUpdated {
            file_id: file_id.to_string(),
            comment_id: comment_id.to_string(),
        });
        Ok(comment)
    }

    pub async fn list(&self, file_id: &str) -> Result<Vec<Comment>> {
        self.drive
            .connector()
            .get_all::<CommentList>(&comments_path(file_id))
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, file_id: &str, comment_id: &str) -> Result<()> {
        self.drive
            .connector()
            .delete(&comment_path(file_id, comment_id))
            .await?;

        info!("Deleted comment");
        self.drive.emit(DriveEvent::CommentDeleted {
            file_id: file_id.to_string(),
            comment_id: comment_id.to_string(),
        });
        Ok(())
    }
}

pub(crate) fn comments_path(file_id: &str) -> String {
    format!("files/{}/comments", urlencoding::encode(file_id))
}

pub(crate) fn comment_path(file_id: &str, comment_id: &str) -> String {
    format!(
        "{}/{}",
        comments_path(file_id),
        urlencoding::encode(comment_id)
    )
}

/// First characters of user content for log lines
pub(crate) fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{drive, json_response, MockHttp};
    use bridge_traits::http::HttpMethod;
    use core_runtime::events::{CoreEvent, EventBus};
    use serde_json::Value;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("exactly twenty chars"), "exactly twenty chars");
        assert_eq!(
            preview("ééééééééééééééééééééé"),
            "éééééééééééééééééééé..."
        );
    }

    #[tokio::test]
    async fn test_create_comment_emits_event() {
        let mut mock_http = MockHttp::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Post);
            assert!(req.url.contains("/files/f1/comments?fields=%2A"));
            let body: Value = serde_json::from_slice(req.body.as_ref().unwrap()).unwrap();
            assert_eq!(body, json!({ "content": "Please review" }));
            Ok(json_response(
                200,
                json!({ "id": "c1", "content": "Please review" }),
            ))
        });

        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let drive = drive(mock_http).with_event_bus(bus);

        let comment = drive.comments().create("f1", "Please review").await.unwrap();
        assert_eq!(comment.id, "c1");

        match rx.recv().await.unwrap() {
            CoreEvent::Drive(DriveEvent::CommentCreated { file_id, comment_id }) => {
                assert_eq!(file_id, "f1");
                assert_eq!(comment_id, "c1");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_comments() {
        let mut mock_http = MockHttp::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.ends_with("/files/f1/comments?fields=nextPageToken%2C%20comments"));
            Ok(json_response(
                200,
                json!({ "comments": [{ "id": "c1", "content": "a" }, { "id": "c2", "content": "b" }] }),
            ))
        });

        let comments = drive(mock_http).comments().list("f1").await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[1].content, "b");
    }

    #[tokio::test]
    async fn test_update_and_delete_comment() {
        let mut mock_http = MockHttp::new();
        mock_http.expect_execute().times(2).returning(|req| {
            assert!(req.url.contains("/files/f1/comments/c1"));
            match req.method {
                HttpMethod::Patch => Ok(json_response(200, json!({ "id": "c1", "content": "edited" }))),
                HttpMethod::Delete => Ok(json_response(204, Value::Null)),
                other => panic!("unexpected method: {:?}", other),
            }
        });

        let drive = drive(mock_http);
        let updated = drive.comments().update("f1", "c1", "edited").await.unwrap();
        assert_eq!(updated.content, "edited");
        drive.comments().delete("f1", "c1").await.unwrap();
    }
}
