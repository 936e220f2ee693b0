//! Group membership: explicit groups claim their members away from the
//! implicit feature groups.

use std::collections::{HashMap, HashSet};

use super::{ResolvedGroup, Resolver};
use crate::emit::naming;
use crate::error::DiagnosticKind;
use crate::model::{ConfigElement, GroupKind};

impl Resolver<'_> {
    /// Returns the resolved groups in declaration order and, per element, the
    /// key of its owning group.
    pub(super) fn resolve_groups(&mut self) -> (Vec<ResolvedGroup>, Vec<String>) {
        let graph = self.graph;
        let mut claimed: HashMap<&str, &str> = HashMap::new();
        let mut explicit: HashMap<&str, Vec<String>> = HashMap::new();

        for group in graph.groups.iter().filter(|g| g.kind == GroupKind::Explicit) {
            let mut listed = HashSet::new();
            let mut members = Vec::with_capacity(group.members.len());
            for member in &group.members {
                let member = member.as_str();
                if !self.index.contains_key(member) {
                    self.report(
                        DiagnosticKind::UnknownGroupMember,
                        [member],
                        group.ordinal,
                        &group.location,
                        format!("group '{}' lists undeclared config '{member}'", group.key),
                    );
                    continue;
                }
                if !listed.insert(member) {
                    self.report(
                        DiagnosticKind::GroupConflict,
                        [member],
                        group.ordinal,
                        &group.location,
                        format!("group '{}' lists '{member}' more than once", group.key),
                    );
                    continue;
                }
                if let Some(owner) = claimed.get(member) {
                    self.report(
                        DiagnosticKind::GroupConflict,
                        [member],
                        group.ordinal,
                        &group.location,
                        format!("'{member}' already belongs to group '{owner}'"),
                    );
                    continue;
                }
                claimed.insert(member, &group.key);
                members.push(member.to_string());
            }
            explicit.insert(&group.key, members);
        }

        let groups = graph
            .groups
            .iter()
            .map(|group| {
                let members = match group.kind {
                    GroupKind::Explicit => explicit.remove(group.key.as_str()).unwrap_or_default(),
                    GroupKind::Feature => group
                        .members
                        .iter()
                        .filter(|m| !claimed.contains_key(m.as_str()))
                        .cloned()
                        .collect(),
                };
                ResolvedGroup {
                    key: group.key.clone(),
                    kind: group.kind,
                    members,
                }
            })
            .collect();

        let owners = graph
            .elements
            .iter()
            .map(|e| {
                claimed
                    .get(e.key())
                    .map_or_else(|| e.common().feature.clone(), |g| (*g).to_string())
            })
            .collect();

        (groups, owners)
    }

    /// Members of one group share a provider unit: their accessor and field
    /// names must be distinct, and their enum types must not shadow the
    /// unit's own types.
    pub(super) fn check_member_names(&mut self, groups: &[ResolvedGroup]) {
        for group in groups {
            let own_types = [
                naming::provider_type(&group.key),
                naming::values_type(&group.key),
            ];
            let mut members: HashMap<String, &str> = HashMap::new();
            for key in &group.members {
                let Some(element) = self.element(key) else {
                    continue;
                };
                let common = element.common();
                let member = naming::member_name(key);
                if let Some(first) = members.get(&member).copied() {
                    let first_location = self
                        .element(first)
                        .map_or("", |e| e.common().location.as_str());
                    self.report(
                        DiagnosticKind::InvalidDeclaration,
                        [first, key.as_str()],
                        common.ordinal,
                        &common.location,
                        format!(
                            "'{key}' and '{first}' at {first_location} both generate \
                             member '{member}' in group '{}'",
                            group.key
                        ),
                    );
                } else {
                    members.insert(member, key);
                }

                if let ConfigElement::Enum(enum_element) = element {
                    if own_types.contains(&enum_element.type_name) {
                        self.report(
                            DiagnosticKind::InvalidDeclaration,
                            [key.as_str()],
                            common.ordinal,
                            &common.location,
                            format!(
                                "enum type {} clashes with a type generated for group '{}'",
                                enum_element.type_name, group.key
                            ),
                        );
                    }
                }
            }
        }
    }
}
