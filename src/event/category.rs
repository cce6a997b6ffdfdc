//! Event category table
//!
//! Five recognized inbound event tags, one category each. Per-category
//! behavior (outbound kind, whether a snapshot re-fetch is needed) lives
//! here as table rows; adding a category is one variant plus its rows.

use serde::{Deserialize, Serialize};

/// Twin create event tag.
pub const TWIN_CREATE_TAG: &str = "Microsoft.DigitalTwins.Twin.Create";
/// Twin delete event tag.
pub const TWIN_DELETE_TAG: &str = "Microsoft.DigitalTwins.Twin.Delete";
/// Twin update event tag.
pub const TWIN_UPDATE_TAG: &str = "Microsoft.DigitalTwins.Twin.Update";
/// Relationship create event tag.
pub const RELATIONSHIP_CREATE_TAG: &str = "Microsoft.DigitalTwins.Relationship.Create";
/// Relationship delete event tag.
pub const RELATIONSHIP_DELETE_TAG: &str = "Microsoft.DigitalTwins.Relationship.Delete";

/// Category of a recognized inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    TwinCreate,
    TwinDelete,
    TwinUpdate,
    RelationshipCreate,
    RelationshipDelete,
}

impl EventCategory {
    /// Look up the category for an inbound event tag.
    ///
    /// `None` means the tag is unrecognized and the event is not processed.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            TWIN_CREATE_TAG => Some(Self::TwinCreate),
            TWIN_DELETE_TAG => Some(Self::TwinDelete),
            TWIN_UPDATE_TAG => Some(Self::TwinUpdate),
            RELATIONSHIP_CREATE_TAG => Some(Self::RelationshipCreate),
            RELATIONSHIP_DELETE_TAG => Some(Self::RelationshipDelete),
            _ => None,
        }
    }

    /// The outbound event kind this category surfaces as.
    ///
    /// Relationship changes surface as UPDATE of the source entity; the
    /// distinction between a property update and a relationship add/remove
    /// is not carried outbound.
    pub fn kind(self) -> EventKind {
        match self {
            Self::TwinCreate => EventKind::Create,
            Self::TwinDelete => EventKind::Delete,
            Self::TwinUpdate | Self::RelationshipCreate | Self::RelationshipDelete => {
                EventKind::Update
            }
        }
    }

    /// Whether this category requires a full snapshot re-fetch.
    ///
    /// Deleted entities can no longer be queried, so deletes carry
    /// metadata only.
    pub fn needs_snapshot(self) -> bool {
        !matches!(self, Self::TwinDelete)
    }
}

/// Kind of a normalized outbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Create,
    Delete,
    Update,
}
