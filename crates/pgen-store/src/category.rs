//! Category views handed out by the store.

use pgen_core::{visible_count, CompiledCategory, CompiledModel, ParameterId, VisibilityCount};

/// Snapshot of one category: members are listed by parameter id in
/// alphabetical order of their display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    /// Position in the alphabetical category listing.
    pub index: usize,
    pub id: i32,
    pub name: String,
    pub members: Vec<ParameterId>,
    /// Per access level, ascending by id.
    pub visibility: Vec<VisibilityCount>,
    /// Access level of each entry in `members`.
    member_access: Vec<i32>,
}

impl CategoryView {
    pub(crate) fn new(model: &CompiledModel, category: &CompiledCategory) -> Self {
        let (members, member_access) = category
            .members
            .iter()
            .filter_map(|index| model.parameter(*index))
            .map(|p| (p.id, p.access_level_id))
            .unzip();
        Self {
            index: category.index,
            id: category.id,
            name: category.name.clone(),
            members,
            visibility: category.visibility.clone(),
            member_access,
        }
    }

    /// Number of members visible at `access_level_id`.
    pub fn visible_count(&self, access_level_id: i32) -> usize {
        visible_count(&self.visibility, access_level_id)
    }

    /// Total number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members visible at `access_level_id`, in listing order.
    pub fn visible_members(&self, access_level_id: i32) -> impl Iterator<Item = ParameterId> + '_ {
        self.members
            .iter()
            .zip(&self.member_access)
            .filter(move |(_, access)| **access <= access_level_id)
            .map(|(id, _)| *id)
    }
}
