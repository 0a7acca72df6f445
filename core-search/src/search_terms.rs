//! Predicate builders
//!
//! One function per (attribute, operator) pair of the Drive search grammar.
//! Every function is pure and renders exactly one [`Clause`]:
//!
//! - string comparisons: `<field> <op> '<value>'`
//! - boolean comparisons: `<field>=<true|false>`
//! - containment: `'<value>' in <field>`
//!
//! String values are escaped with [`crate::clause::escape`], so no input can
//! break out of its literal.
//!
//! See <https://developers.google.com/drive/api/guides/ref-search-terms>.

use crate::clause::{quote, Clause};
use crate::constants::{MimeType, Visibility};
use chrono::{DateTime, SecondsFormat, Utc};

fn compare(field: &str, op: &str, value: &str) -> Clause {
    Clause::rendered(format!("{} {} {}", field, op, quote(value)))
}

fn flag(field: &str, value: bool) -> Clause {
    Clause::rendered(format!("{}={}", field, value))
}

fn member_of(value: &str, collection: &str) -> Clause {
    Clause::rendered(format!("{} in {}", quote(value), collection))
}

fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// Name and content

/// `name contains 'value'`
pub fn name_contains(value: impl AsRef<str>) -> Clause {
    compare("name", "contains", value.as_ref())
}

/// `name = 'value'`
pub fn name_eq(value: impl AsRef<str>) -> Clause {
    compare("name", "=", value.as_ref())
}

/// `name != 'value'`
pub fn name_ne(value: impl AsRef<str>) -> Clause {
    compare("name", "!=", value.as_ref())
}

/// `fullText contains 'value'`
pub fn full_text_contains(value: impl AsRef<str>) -> Clause {
    compare("fullText", "contains", value.as_ref())
}

// MIME type

/// `mimeType = 'value'`
///
/// Accepts a [`MimeType`] or the provider string it stands for; both render
/// the same clause.
pub fn mime_type_eq(value: impl Into<MimeType>) -> Clause {
    compare("mimeType", "=", value.into().as_str())
}

/// `mimeType != 'value'`
pub fn mime_type_ne(value: impl Into<MimeType>) -> Clause {
    compare("mimeType", "!=", value.into().as_str())
}

// Timestamps

macro_rules! time_terms {
    ($field:literal: $eq:ident, $ne:ident, $lt:ident, $le:ident, $gt:ident, $ge:ident) => {
        #[doc = concat!("`", $field, " = '<rfc3339>'`")]
        pub fn $eq(value: DateTime<Utc>) -> Clause {
            compare($field, "=", &timestamp(&value))
        }

        #[doc = concat!("`", $field, " != '<rfc3339>'`")]
        pub fn $ne(value: DateTime<Utc>) -> Clause {
            compare($field, "!=", &timestamp(&value))
        }

        #[doc = concat!("`", $field, " < '<rfc3339>'`")]
        pub fn $lt(value: DateTime<Utc>) -> Clause {
            compare($field, "<", &timestamp(&value))
        }

        #[doc = concat!("`", $field, " <= '<rfc3339>'`")]
        pub fn $le(value: DateTime<Utc>) -> Clause {
            compare($field, "<=", &timestamp(&value))
        }

        #[doc = concat!("`", $field, " > '<rfc3339>'`")]
        pub fn $gt(value: DateTime<Utc>) -> Clause {
            compare($field, ">", &timestamp(&value))
        }

        #[doc = concat!("`", $field, " >= '<rfc3339>'`")]
        pub fn $ge(value: DateTime<Utc>) -> Clause {
            compare($field, ">=", &timestamp(&value))
        }
    };
}

time_terms!("modifiedTime": modified_time_eq, modified_time_ne, modified_time_lt, modified_time_le, modified_time_gt, modified_time_ge);
time_terms!("createdTime": created_time_eq, created_time_ne, created_time_lt, created_time_le, created_time_gt, created_time_ge);
time_terms!("viewedByMeTime": viewed_by_me_time_eq, viewed_by_me_time_ne, viewed_by_me_time_lt, viewed_by_me_time_le, viewed_by_me_time_gt, viewed_by_me_time_ge);

// Flags

/// `trashed=<bool>`
pub fn trashed(value: bool) -> Clause {
    flag("trashed", value)
}

/// `starred=<bool>`
pub fn starred(value: bool) -> Clause {
    flag("starred", value)
}

/// `sharedWithMe=<bool>`
pub fn shared_with_me(value: bool) -> Clause {
    flag("sharedWithMe", value)
}

/// `hidden=<bool>` (shared drives)
pub fn hidden(value: bool) -> Clause {
    flag("hidden", value)
}

// Containment

/// `'folder_id' in parents`
pub fn in_parents(folder_id: impl AsRef<str>) -> Clause {
    member_of(folder_id.as_ref(), "parents")
}

/// `'email' in owners`
pub fn in_owners(email: impl AsRef<str>) -> Clause {
    member_of(email.as_ref(), "owners")
}

/// `'email' in writers`
pub fn in_writers(email: impl AsRef<str>) -> Clause {
    member_of(email.as_ref(), "writers")
}

/// `'email' in readers`
pub fn in_readers(email: impl AsRef<str>) -> Clause {
    member_of(email.as_ref(), "readers")
}

// Sharing

/// `visibility = 'value'`
pub fn visibility_eq(value: impl Into<Visibility>) -> Clause {
    compare("visibility", "=", value.into().as_str())
}

/// `visibility != 'value'`
pub fn visibility_ne(value: impl Into<Visibility>) -> Clause {
    compare("visibility", "!=", value.into().as_str())
}

// Properties

/// `properties has { key='k' and value='v' }`
pub fn has_property(key: impl AsRef<str>, value: impl AsRef<str>) -> Clause {
    property_match("properties", key.as_ref(), value.as_ref())
}

/// `appProperties has { key='k' and value='v' }`
pub fn has_app_property(key: impl AsRef<str>, value: impl AsRef<str>) -> Clause {
    property_match("appProperties", key.as_ref(), value.as_ref())
}

fn property_match(field: &str, key: &str, value: &str) -> Clause {
    Clause::rendered(format!(
        "{} has {{ key={} and value={} }}",
        field,
        quote(key),
        quote(value)
    ))
}

/// `shortcutDetails.targetId = 'id'`
pub fn shortcut_target_eq(target_id: impl AsRef<str>) -> Clause {
    compare("shortcutDetails.targetId", "=", target_id.as_ref())
}

/// Negate a clause: `not <clause>`
pub fn not(clause: Clause) -> Clause {
    Clause::rendered(format!("not {}", clause))
}
