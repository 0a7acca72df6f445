//! Provider-defined constants accepted by the predicate builders
//!
//! Each constrained field (MIME type, role, visibility) is a closed enum with
//! a `Custom` case for values the provider adds later. A raw string that
//! matches a known value converts to the named variant, so
//! `MimeType::from("application/vnd.google-apps.folder")` and
//! `MimeType::Folder` are the same value and render identically.
//!
//! Values are provider-fixed strings and are never re-cased.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! provider_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value not covered by the named variants, passed through verbatim
            Custom(String),
        }

        impl $name {
            /// Canonical provider string
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $value, )+
                    $name::Custom(value) => value.as_str(),
                }
            }

            /// Resolve to the string interpolated into a clause
            pub fn resolve(&self) -> String {
                self.as_str().to_string()
            }

            fn known(value: &str) -> Option<Self> {
                match value {
                    $( $value => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::known(value).unwrap_or_else(|| $name::Custom(value.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::known(&value).unwrap_or($name::Custom(value))
            }
        }

        impl From<&String> for $name {
            fn from(value: &String) -> Self {
                Self::from(value.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Custom(value) => value,
                    other => other.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

provider_enum! {
    /// File MIME types: Google Workspace types plus the common export formats.
    ///
    /// See <https://developers.google.com/drive/api/guides/mime-types>.
    MimeType {
        Audio => "application/vnd.google-apps.audio",
        Docs => "application/vnd.google-apps.document",
        ThirdPartyShortcut => "application/vnd.google-apps.drive-sdk",
        Drawings => "application/vnd.google-apps.drawing",
        File => "application/vnd.google-apps.file",
        Folder => "application/vnd.google-apps.folder",
        Forms => "application/vnd.google-apps.form",
        FusionTables => "application/vnd.google-apps.fusiontable",
        Jamboard => "application/vnd.google-apps.jam",
        EmailLayout => "application/vnd.google-apps.mail-layout",
        MyMaps => "application/vnd.google-apps.map",
        Photos => "application/vnd.google-apps.photo",
        Slides => "application/vnd.google-apps.presentation",
        AppsScript => "application/vnd.google-apps.script",
        Shortcut => "application/vnd.google-apps.shortcut",
        Sites => "application/vnd.google-apps.site",
        Sheets => "application/vnd.google-apps.spreadsheet",
        Unknown => "application/vnd.google-apps.unknown",
        Video => "application/vnd.google-apps.video",
        Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Pptx => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        Odt => "application/vnd.oasis.opendocument.text",
        Ods => "application/vnd.oasis.opendocument.spreadsheet",
        Odp => "application/vnd.oasis.opendocument.presentation",
        Pdf => "application/pdf",
        Rtf => "application/rtf",
        Epub => "application/epub+zip",
        Zip => "application/zip",
        Json => "application/vnd.google-apps.script+json",
        PlainText => "text/plain",
        Html => "text/html",
        Csv => "text/csv",
        Tsv => "text/tab-separated-values",
        Jpeg => "image/jpeg",
        Png => "image/png",
        Svg => "image/svg+xml",
    }
}

impl MimeType {
    /// Whether the type is a native Google Workspace document
    pub fn is_workspace_type(&self) -> bool {
        self.as_str().starts_with("application/vnd.google-apps.")
    }
}

provider_enum! {
    /// Sharing roles.
    Role {
        Reader => "reader",
        Commenter => "commenter",
        Writer => "writer",
        FileOrganizer => "fileOrganizer",
        Organizer => "organizer",
        Owner => "owner",
    }
}

provider_enum! {
    /// Link-sharing visibility levels used by the `visibility` search term.
    Visibility {
        AnyoneCanFind => "anyoneCanFind",
        AnyoneWithLink => "anyoneWithLink",
        DomainCanFind => "domainCanFind",
        DomainWithLink => "domainWithLink",
        Limited => "limited",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_strings_map_to_variants() {
        assert_eq!(
            MimeType::from("application/vnd.google-apps.folder"),
            MimeType::Folder
        );
        assert_eq!(Role::from("fileOrganizer"), Role::FileOrganizer);
        assert_eq!(
            Visibility::from(String::from("anyoneWithLink")),
            Visibility::AnyoneWithLink
        );
    }

    #[test]
    fn test_no_recasing() {
        // Provider values are case-sensitive
        assert_eq!(
            MimeType::from("Application/PDF"),
            MimeType::Custom("Application/PDF".to_string())
        );
        assert_eq!(Role::from("Writer"), Role::Custom("Writer".to_string()));
        assert_eq!(Role::from("Writer").as_str(), "Writer");
    }

    #[test]
    fn test_resolve_matches_as_str() {
        assert_eq!(MimeType::Sheets.resolve(), "application/vnd.google-apps.spreadsheet");
        assert_eq!(Role::Commenter.resolve(), "commenter");
        assert_eq!(Visibility::Limited.to_string(), "limited");
        assert_eq!(
            MimeType::Custom("application/x-custom".into()).resolve(),
            "application/x-custom"
        );
    }

    #[test]
    fn test_serde_uses_provider_strings() {
        assert_eq!(
            serde_json::to_value(Role::Writer).unwrap(),
            serde_json::json!("writer")
        );
        let role: Role = serde_json::from_value(serde_json::json!("owner")).unwrap();
        assert_eq!(role, Role::Owner);
        let custom: Role = serde_json::from_value(serde_json::json!("publisher")).unwrap();
        assert_eq!(custom, Role::Custom("publisher".to_string()));
    }

    #[test]
    fn test_workspace_type() {
        assert!(MimeType::Docs.is_workspace_type());
        assert!(!MimeType::Pdf.is_workspace_type());
    }
}
