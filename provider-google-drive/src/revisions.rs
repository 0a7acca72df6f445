use core_runtime::events::DriveEvent;
use tracing::{info, instrument};

use crate::drive::Drive;
use crate::error::Result;
use crate::types::{Revision, RevisionList};

pub struct Revisions<'a> {
    drive: &'a Drive,
}

impl<'a> Revisions<'a> {
    pub(crate) fn new(drive: &'a Drive) -> Self {
        Self { drive }
    }

    pub async fn get(&self, file_id: &str, revision_id: &str) -> Result<Revision> {
        self.drive
            .connector()
            .get_json(&revision_path(file_id, revision_id), &[("fields", "*")])
            .await
    }

    pub async fn list(&self, file_id: &str) -> Result<Vec<Revision>> {
        self.drive
            .connector()
            .get_all::<RevisionList>(&revisions_path(file_id))
            .await
    }

    /// Only revisions of blob files can be deleted; the head revision never can
    #[instrument(skip(self))]
    pub async fn delete(&self, file_id: &str, revision_id: &str) -> Result<()> {
        self.drive
            .connector()
            .delete(&revision_path(file_id, revision_id))
            .await?;

        info!("Deleted revision");
        self.drive.emit(DriveEvent::RevisionDeleted {
            file_id: file_id.to_string(),
            revision_id: revision_id.to_string(),
        });
        Ok(())
    }
}

fn revisions_path(file_id: &str) -> String {
    format!("files/{}/revisions", urlencoding::encode(file_id))
}

fn revision_path(file_id: &str, revision_id: &str) -> String {
    format!(
        "{}/{}",
        revisions_path(file_id),
        urlencoding::encode(revision_id)
    )
}
