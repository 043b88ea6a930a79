//! Tag entity model.
//!
//! Tags are named, colored labels attachable to multiple tasks. Each task
//! embeds a copy of its tags by value; the store is responsible for keeping
//! those copies in sync with the tag collection (see `store`).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, colored label for filtering and grouping tasks.
///
/// `color` is an opaque style token carried for the UI; the core never
/// interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Partial update for `TaskStore::update_tag`. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct TagPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl TagPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Merge this patch into a tag, leaving unset fields untouched.
    pub(crate) fn apply(&self, tag: &mut Tag) {
        if let Some(name) = &self.name {
            tag.name = name.clone();
        }
        if let Some(color) = &self.color {
            tag.color = color.clone();
        }
    }
}
