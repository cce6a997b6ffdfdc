//! Inbound event model: envelope, category table, classifier, outbound shape

mod category;
mod classify;
mod normalized;
mod raw;

pub use category::{
    EventCategory, EventKind, RELATIONSHIP_CREATE_TAG, RELATIONSHIP_DELETE_TAG, TWIN_CREATE_TAG,
    TWIN_DELETE_TAG, TWIN_UPDATE_TAG,
};
pub use classify::{ClassifiedEvent, ClassifyError, EventClassifier};
pub use normalized::NormalizedEvent;
pub use raw::RawEvent;
