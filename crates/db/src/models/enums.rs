//! Closed enumerations for every `TEXT` + `CHECK` column.
//!
//! Each enum maps exhaustively to the literal stored in the database. The
//! `ALL` list of every enum must equal the value set of the matching
//! `ck_<table>_<column>` constraint; widening a domain means adding a variant
//! here and a migration that relaxes the constraint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::{Decode, Encode, Postgres, Type};

/// Error returned when a stored string is not part of an enum's domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {domain}")]
pub struct UnknownVariant {
    pub domain: &'static str,
    pub value: String,
}

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every stored value, in declaration order.
            pub const ALL: &'static [&'static str] = &[$($text),+];

            /// Return the value as stored in the database.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    other => Err(UnknownVariant {
                        domain: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl Type<Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <&str as Type<Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <&str as Type<Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
                <&str as Encode<'q, Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
                let text = <&str as Decode<'r, Postgres>>::decode(value)?;
                Ok(text.parse::<Self>()?)
            }
        }
    };
}

define_text_enum! {
    /// Account role on `users.role`.
    UserRole {
        Student => "student",
        Tutor => "tutor",
        Admin => "admin",
    }
}

define_text_enum! {
    /// RSVP state on `user_events.status`.
    AttendanceStatus {
        Attending => "attending",
        Maybe => "maybe",
        Declined => "declined",
    }
}

define_text_enum! {
    /// Friend request state on `friendships.status`.
    FriendshipStatus {
        Pending => "pending",
        Accepted => "accepted",
        Rejected => "rejected",
    }
}

define_text_enum! {
    /// Severity on `notifications.type`.
    NotificationType {
        Info => "info",
        Success => "success",
        Warning => "warning",
        Error => "error",
    }
}

define_text_enum! {
    /// UI theme on `user_preferences.theme`.
    Theme {
        Light => "light",
        Dark => "dark",
        System => "system",
    }
}

define_text_enum! {
    /// Availability on `user_presences.status`.
    PresenceStatus {
        Active => "active",
        Away => "away",
        Busy => "busy",
    }
}

define_text_enum! {
    /// Membership role on `user_study_rooms.role`.
    RoomRole {
        Owner => "owner",
        Moderator => "moderator",
        Member => "member",
    }
}

define_text_enum! {
    /// Self-assessed level on `user_subjects.proficiency_level`.
    ProficiencyLevel {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
        Expert => "expert",
    }
}

define_text_enum! {
    /// Priority on `study_tasks.priority`.
    TaskPriority {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

define_text_enum! {
    /// Classification on `resources.type`.
    ///
    /// `Link` was added by `20240301000001_widen_resource_type_domain`.
    ResourceType {
        Document => "Document",
        Video => "Video",
        Note => "Note",
        Link => "Link",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_and_from_str_agree_for_every_value() {
        for text in NotificationType::ALL {
            let parsed: NotificationType = text.parse().unwrap();
            assert_eq!(parsed.as_str(), *text);
        }
        for text in ResourceType::ALL {
            let parsed: ResourceType = text.parse().unwrap();
            assert_eq!(parsed.as_str(), *text);
        }
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = "urgent".parse::<NotificationType>().unwrap_err();
        assert_eq!(err.domain, "NotificationType");
        assert_eq!(err.to_string(), "'urgent' is not a valid NotificationType");
    }

    #[test]
    fn resource_type_is_case_sensitive() {
        assert!("link".parse::<ResourceType>().is_err());
        assert_eq!("Link".parse::<ResourceType>().unwrap(), ResourceType::Link);
    }

    #[test]
    fn serde_uses_stored_literal() {
        let json = serde_json::to_string(&RoomRole::Moderator).unwrap();
        assert_eq!(json, "\"moderator\"");
        let parsed: ResourceType = serde_json::from_str("\"Video\"").unwrap();
        assert_eq!(parsed, ResourceType::Video);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(FriendshipStatus::Accepted.to_string(), "accepted");
        assert_eq!(Theme::System.to_string(), "system");
    }
}
