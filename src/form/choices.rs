use indexmap::IndexMap;
use tracing::debug;

use crate::domain::{
    ChoiceOption, ChoiceSource, FieldDefinition, FieldKind, FormSchema, Membership, member_choices,
};

/// Options for every choice field, derived once per membership change.
#[derive(Debug, Clone, Default)]
pub struct ChoiceCache {
    memberships: Vec<Membership>,
    options: IndexMap<String, Vec<ChoiceOption>>,
    revision: u64,
}

impl ChoiceCache {
    pub fn new(schema: &FormSchema, memberships: Vec<Membership>) -> Self {
        let mut cache = Self {
            memberships,
            options: IndexMap::new(),
            revision: 0,
        };
        cache.rebuild(schema);
        cache
    }

    /// Replaces the membership source. Options are recomputed only when the
    /// list actually changed; returns whether they were.
    pub fn set_memberships(&mut self, schema: &FormSchema, memberships: Vec<Membership>) -> bool {
        if self.memberships == memberships {
            return false;
        }
        self.memberships = memberships;
        self.rebuild(schema);
        true
    }

    pub fn memberships(&self) -> &[Membership] {
        &self.memberships
    }

    pub fn options(&self, name: &str) -> &[ChoiceOption] {
        self.options.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bumped every time options are recomputed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// A choice field with a single option has nothing to choose between.
    pub fn is_degenerate(&self, field: &FieldDefinition) -> bool {
        matches!(field.kind, FieldKind::Choice(_)) && self.options(&field.name).len() == 1
    }

    fn rebuild(&mut self, schema: &FormSchema) {
        self.options = schema
            .choice_fields()
            .map(|(field, source)| {
                let options = match source {
                    ChoiceSource::Static(options) => options.clone(),
                    ChoiceSource::TeamMemberships => member_choices(&self.memberships),
                };
                (field.name.clone(), options)
            })
            .collect();
        self.revision += 1;
        debug!(revision = self.revision, "choice options recomputed");
    }
}
