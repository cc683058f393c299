//! Request vocabulary: statuses, priorities, and history actions.
//!
//! Each enum is stored as lowercase text in the database. The variant names
//! below must match the CHECK constraints in
//! `20260101000002_create_requests.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The database / wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $val => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{other}'. Must be one of: {}",
                        $label,
                        [$($val),+].join(", ")
                    ))),
                }
            }
        }
    };
}

define_text_enum! {
    /// Lifecycle status of a request.
    RequestStatus ("status") {
        Draft = "draft",
        Pending = "pending",
        Approved = "approved",
        Rejected = "rejected",
        Cancelled = "cancelled",
    }
}

define_text_enum! {
    /// How urgently the requester needs the items.
    #[derive(Default)]
    Priority ("priority") {
        Low = "low",
        #[default]
        Medium = "medium",
        High = "high",
    }
}

define_text_enum! {
    /// Closed tag set for entries in the approval history log.
    HistoryAction ("history action") {
        Created = "created",
        Submitted = "submitted",
        Approved = "approved",
        Rejected = "rejected",
        Cancelled = "cancelled",
        Updated = "updated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_accepts_only_the_five_values() {
        for status in RequestStatus::ALL {
            assert_eq!(status.as_str().parse::<RequestStatus>().unwrap(), *status);
        }
        let err = "archived".parse::<RequestStatus>().unwrap_err();
        assert!(err.to_string().contains("Invalid status 'archived'"));
        assert_eq!(RequestStatus::ALL.len(), 5);
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn history_action_serializes_lowercase() {
        let json = serde_json::to_string(&HistoryAction::Submitted).unwrap();
        assert_eq!(json, "\"submitted\"");
    }
}
