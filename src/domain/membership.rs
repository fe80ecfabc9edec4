use serde::{Deserialize, Serialize};

use super::schema::ChoiceOption;

/// A team record as supplied by the organization context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub is_member: bool,
}

impl Membership {
    pub fn new(id: impl Into<String>, slug: impl Into<String>, is_member: bool) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            is_member,
        }
    }
}

/// Teams the user belongs to, in source order.
pub fn member_choices(memberships: &[Membership]) -> Vec<ChoiceOption> {
    memberships
        .iter()
        .filter(|team| team.is_member)
        .map(|team| ChoiceOption::new(team.id.clone(), team.slug.clone()))
        .collect()
}
