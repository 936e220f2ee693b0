//! Source references and write capability.

use std::collections::HashMap;

use super::Resolver;
use crate::error::DiagnosticKind;

impl Resolver<'_> {
    pub(super) fn check_mutability(&mut self) {
        let graph = self.graph;
        let writable: HashMap<&str, bool> = graph
            .sources
            .iter()
            .map(|s| (s.id.as_str(), s.writable))
            .collect();

        for element in &graph.elements {
            let common = element.common();
            match writable.get(common.source.as_str()) {
                None => self.report(
                    DiagnosticKind::UnknownSource,
                    [common.key.as_str()],
                    common.ordinal,
                    &common.location,
                    format!("source '{}' is not declared", common.source),
                ),
                Some(false) if common.mutable => self.report(
                    DiagnosticKind::ImmutableSource,
                    [common.key.as_str()],
                    common.ordinal,
                    &common.location,
                    format!(
                        "'{}' is mutable but source '{}' does not support writes",
                        common.key, common.source
                    ),
                ),
                Some(_) => {}
            }
        }
    }
}
