//! Sharing permissions
//!
//! Who a call targets is a typed choice: [`Grantee`] when adding,
//! [`PermissionSelector`] when reading or changing an existing permission.
//! Email and domain selectors are resolved against `permissions.list`.

use core_runtime::events::DriveEvent;
use core_search::constants::Role;
use serde_json::json;
use tracing::{info, instrument};

use crate::drive::Drive;
use crate::error::{GoogleDriveError, Result};
use crate::types::{Permission, PermissionList};

/// Recipient of a new permission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grantee {
    User(String),
    Domain(String),
}

impl Grantee {
    fn body(&self, role: &Role) -> serde_json::Value {
        match self {
            Grantee::User(email) => {
                json!({ "type": "user", "role": role.as_str(), "emailAddress": email })
            }
            Grantee::Domain(domain) => {
                json!({ "type": "domain", "role": role.as_str(), "domain": domain })
            }
        }
    }
}

/// Existing permission on a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionSelector {
    Id(String),
    /// First permission whose `emailAddress` matches
    Email(String),
    /// First permission whose `domain` matches
    Domain(String),
}

impl PermissionSelector {
    fn matches(&self, permission: &Permission) -> bool {
        match self {
            PermissionSelector::Id(id) => &permission.id == id,
            PermissionSelector::Email(email) => {
                permission.email_address.as_deref() == Some(email.as_str())
            }
            PermissionSelector::Domain(domain) => {
                permission.domain.as_deref() == Some(domain.as_str())
            }
        }
    }

    fn describe(&self) -> &str {
        match self {
            PermissionSelector::Id(value)
            | PermissionSelector::Email(value)
            | PermissionSelector::Domain(value) => value,
        }
    }
}

pub struct Permissions<'a> {
    drive: &'a Drive,
}

impl<'a> Permissions<'a> {
    pub(crate) fn new(drive: &'a Drive) -> Self {
        Self { drive }
    }

    /// Every permission on the file, across pages
    pub async fn list(&self, file_id: &str) -> Result<Vec<Permission>> {
        self.drive
            .connector()
            .get_all::<PermissionList>(&permissions_path(file_id))
            .await
    }

    pub async fn get(&self, file_id: &str, selector: &PermissionSelector) -> Result<Permission> {
        match selector {
            PermissionSelector::Id(id) => {
                self.drive
                    .connector()
                    .get_json(&permission_path(file_id, id), &[("fields", "*")])
                    .await
            }
            other => self.find(file_id, other).await,
        }
    }

    #[instrument(skip(self, role))]
    pub async fn add(
        &self,
        file_id: &str,
        role: impl Into<Role>,
        grantee: &Grantee,
    ) -> Result<Permission> {
        let role = role.into();
        let permission: Permission = self
            .drive
            .connector()
            .post_json(
                &permissions_path(file_id),
                &[("fields", "*")],
                &grantee.body(&role),
            )
            .await?;

        info!(role = %role, permission_id = %permission.id, "Added permission");
        self.drive.emit(DriveEvent::PermissionAdded {
            file_id: file_id.to_string(),
            permission_id: permission.id.clone(),
            role: role.resolve(),
        });
        Ok(permission)
    }

    #[instrument(skip(self, role))]
    pub async fn update(
        &self,
        file_id: &str,
        selector: &PermissionSelector,
        role: impl Into<Role>,
    ) -> Result<Permission> {
        let role = role.into();
        let permission_id = self.resolve_id(file_id, selector).await?;
        let permission: Permission = self
            .drive
            .connector()
            .patch_json(
                &permission_path(file_id, &permission_id),
                &[("fields", "*")],
                &json!({ "role": role.as_str() }),
            )
            .await?;

        info!(role = %role, permission_id = %permission_id, "Updated permission");
        self.drive.emit(DriveEvent::PermissionUpdated {
            file_id: file_id.to_string(),
            permission_id,
            role: role.resolve(),
        });
        Ok(permission)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, file_id: &str, selector: &PermissionSelector) -> Result<()> {
        let permission_id = self.resolve_id(file_id, selector).await?;
        self.drive
            .connector()
            .delete(&permission_path(file_id, &permission_id))
            .await?;

        info!(permission_id = %permission_id, "Removed permission");
        self.drive.emit(DriveEvent::PermissionRemoved {
            file_id: file_id.to_string(),
            permission_id,
        });
        Ok(())
    }

    /// Make `email` the owner of the file
    #[instrument(skip(self))]
    pub async fn transfer_ownership(&self, file_id: &str, email: &str) -> Result<Permission> {
        let permission: Permission = self
            .drive
            .connector()
            .post_json(
                &permissions_path(file_id),
                &[("transferOwnership", "true"), ("fields", "*")],
                &Grantee::User(email.to_string()).body(&Role::Owner),
            )
            .await?;

        info!("Transferred ownership");
        self.drive.emit(DriveEvent::OwnershipTransferred {
            file_id: file_id.to_string(),
        });
        Ok(permission)
    }

    async fn resolve_id(&self, file_id: &str, selector: &PermissionSelector) -> Result<String> {
        match selector {
            PermissionSelector::Id(id) => Ok(id.clone()),
            other => Ok(self.find(file_id, other).await?.id),
        }
    }

    async fn find(&self, file_id: &str, selector: &PermissionSelector) -> Result<Permission> {
        self.list(file_id)
            .await?
            .into_iter()
            .find(|p| selector.matches(p))
            .ok_or_else(|| GoogleDriveError::PermissionNotFound(selector.describe().to_string()))
    }
}

fn permissions_path(file_id: &str) -> String {
    format!("files/{}/permissions", urlencoding::encode(file_id))
}

fn permission_path(file_id: &str, permission_id: &str) -> String {
    format!(
        "{}/{}",
        permissions_path(file_id),
        urlencoding::encode(permission_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{drive, json_response, MockHttp};
    use bridge_traits::http::HttpMethod;
    use serde_json::Value;

    fn permission_list() -> Value {
        json!({ "permissions": [
            { "id": "p-owner", "type": "user", "role": "owner", "emailAddress": "me@corp.io" },
            { "id": "p-ann", "type": "user", "role": "reader", "emailAddress": "ann@corp.io" },
            { "id": "p-dom", "type": "domain", "role": "reader", "domain": "corp.io" }
        ]})
    }

    #[tokio::test]
    async fn test_add_user_permission() {
        let mut mock_http = MockHttp::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.contains("/files/f1/permissions?fields=%2A"));
            let body: Value = serde_json::from_slice(req.body.as_ref().unwrap()).unwrap();
            assert_eq!(
                body,
                json!({ "type": "user", "role": "writer", "emailAddress": "bob@corp.io" })
            );
            Ok(json_response(
                200,
                json!({ "id": "p-bob", "type": "user", "role": "writer", "emailAddress": "bob@corp.io" }),
            ))
        });

        let permission = drive(mock_http)
            .permissions()
            .add("f1", Role::Writer, &Grantee::User("bob@corp.io".into()))
            .await
            .unwrap();

        assert_eq!(permission.id, "p-bob");
        assert_eq!(permission.role, Role::Writer);
    }

    #[tokio::test]
    async fn test_add_domain_permission_with_raw_role() {
        let mut mock_http = MockHttp::new();
        mock_http.expect_execute().times(1).returning(|req| {
            let body: Value = serde_json::from_slice(req.body.as_ref().unwrap()).unwrap();
            assert_eq!(
                body,
                json!({ "type": "domain", "role": "commenter", "domain": "corp.io" })
            );
            Ok(json_response(200, json!({ "id": "p-dom", "role": "commenter" })))
        });

        drive(mock_http)
            .permissions()
            .add("f1", "commenter", &Grantee::Domain("corp.io".into()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_by_email_resolves_through_list() {
        let mut mock_http = MockHttp::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.ends_with("/files/f1/permissions?fields=nextPageToken%2C%20permissions"));
            Ok(json_response(200, permission_list()))
        });

        let permission = drive(mock_http)
            .permissions()
            .get("f1", &PermissionSelector::Email("ann@corp.io".into()))
            .await
            .unwrap();

        assert_eq!(permission.id, "p-ann");
    }

    #[tokio::test]
    async fn test_email_on_second_page_is_found() {
        let mut mock_http = MockHttp::new();
        mock_http.expect_execute().times(2).returning(|req| {
            if req.url.contains("pageToken=NEXT") {
                Ok(json_response(
                    200,
                    json!({ "permissions": [
                        { "id": "p-zed", "type": "user", "role": "writer", "emailAddress": "zed@corp.io" }
                    ]}),
                ))
            } else {
                let mut first = permission_list();
                first["nextPageToken"] = json!("NEXT");
                Ok(json_response(200, first))
            }
        });

        let permission = drive(mock_http)
            .permissions()
            .get("f1", &PermissionSelector::Email("zed@corp.io".into()))
            .await
            .unwrap();

        assert_eq!(permission.id, "p-zed");
    }

    #[tokio::test]
    async fn test_unmatched_selector_is_permission_not_found() {
        let mut mock_http = MockHttp::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(json_response(200, permission_list())));

        let result = drive(mock_http)
            .permissions()
            .remove("f1", &PermissionSelector::Domain("other.org".into()))
            .await;

        assert!(matches!(result, Err(GoogleDriveError::PermissionNotFound(d)) if d == "other.org"));
    }

    #[tokio::test]
    async fn test_update_by_domain() {
        let mut mock_http = MockHttp::new();
        mock_http.expect_execute().times(2).returning(|req| match req.method {
            HttpMethod::Get => Ok(json_response(200, permission_list())),
            _ => {
                assert_eq!(req.method, HttpMethod::Patch);
                assert!(req.url.contains("/files/f1/permissions/p-dom?"));
                Ok(json_response(200, json!({ "id": "p-dom", "role": "writer" })))
            }
        });

        let updated = drive(mock_http)
            .permissions()
            .update("f1", &PermissionSelector::Domain("corp.io".into()), Role::Writer)
            .await
            .unwrap();

        assert_eq!(updated.role, Role::Writer);
    }

    #[tokio::test]
    async fn test_remove_by_id_skips_lookup() {
        let mut mock_http = MockHttp::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Delete);
            assert!(req.url.ends_with("/files/f1/permissions/p-ann"));
            Ok(json_response(204, Value::Null))
        });

        drive(mock_http)
            .permissions()
            .remove("f1", &PermissionSelector::Id("p-ann".into()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_transfer_ownership() {
        let mut mock_http = MockHttp::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.contains("transferOwnership=true"));
            let body: Value = serde_json::from_slice(req.body.as_ref().unwrap()).unwrap();
            assert_eq!(body["role"], "owner");
            assert_eq!(body["emailAddress"], "new@corp.io");
            Ok(json_response(200, json!({ "id": "p-new", "role": "owner" })))
        });

        let permission = drive(mock_http)
            .permissions()
            .transfer_ownership("f1", "new@corp.io")
            .await
            .unwrap();
        assert_eq!(permission.role, Role::Owner);
    }
}
