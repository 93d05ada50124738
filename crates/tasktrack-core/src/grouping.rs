//! Task grouping engine.
//!
//! Turns a date-ordered list of a user's open tasks into groups keyed by tag.
//! Groups keep first-occurrence order and items keep their input order, so
//! no re-sorting happens here: ordering is the store's job.

use crate::model::{Task, TaskItem};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Group key used for tasks with an empty tag.
pub const UNTAGGED_KEY: &str = "without tag";

/// Ordered mapping of group key to tasks.
///
/// Serializes as a JSON object whose key order is the group order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskGroups {
    groups: Vec<(String, Vec<TaskItem>)>,
}

impl TaskGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` to the group for `tag`, creating the group if needed.
    pub fn push(&mut self, tag: &str, item: TaskItem) {
        let key = group_key(tag);
        match self.groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, items)) => items.push(item),
            None => self.groups.push((key.to_string(), vec![item])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[TaskItem]> {
        self.groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, items)| items.as_slice())
    }

    /// Group keys in first-occurrence order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TaskItem])> {
        self.groups
            .iter()
            .map(|(k, items)| (k.as_str(), items.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Serialize for TaskGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (key, items) in &self.groups {
            map.serialize_entry(key, items)?;
        }
        map.end()
    }
}

/// Map a task tag to its group key.
pub fn group_key(tag: &str) -> &str {
    if tag.is_empty() { UNTAGGED_KEY } else { tag }
}

/// Group `tasks` (already ordered by date ascending) by tag.
pub fn group_by_tag<'a, I>(tasks: I) -> TaskGroups
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups = TaskGroups::new();
    for task in tasks {
        groups.push(&task.tag, TaskItem::from(task));
    }
    groups
}
