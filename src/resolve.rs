use crate::config::ImporterConfig;
use crate::constants;
use crate::error::Result;
use crate::table::Table;
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Seam for the external entity resolution service.
///
/// Given entity names and a type, returns canonical dcids for the subset of
/// names the service could resolve. Missing names are simply absent from
/// the result; no ordering is guaranteed.
pub trait Resolver {
    fn resolve(&self, entities: &[String], entity_type: &str) -> Result<HashMap<String, String>>;
}

/// Outcome of the resolve stage: the rewritten table, the debug trace of
/// every resolution decision, and summary counts for reporting.
#[derive(Debug)]
pub struct ResolveOutcome {
    pub table: Table,
    pub debug_trace: Table,
    pub resolved_count: usize,
    pub pre_resolved_count: usize,
    pub unresolved_count: usize,
}

/// Ordered map keyed by entity name: first-occurrence order, one entry per
/// distinct name. HashMap iteration order would leak into the debug trace,
/// so ordering is kept explicitly.
struct OrderedNames {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedNames {
    fn new() -> Self {
        Self {
            names: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn insert(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.names.push(name.to_string());
        }
    }
}

/// Classifies every entity reference in the configured entity column as
/// pre-resolved, resolved, or unresolved, rewrites the column to canonical
/// dcids, drops rows for unresolved names, and builds the debug trace.
pub fn resolve_entities(
    table: &Table,
    entity_type: &str,
    config: &ImporterConfig,
    resolver: &dyn Resolver,
) -> Result<ResolveOutcome> {
    let column = table.column_values(config.entity_column_index)?;

    // Partition by the override prefix. Prefixed references carry their
    // dcid literally and never reach the resolver; the prefix check is the
    // sole arbiter, so a name can never be in both groups.
    let mut pre_resolved: HashMap<String, String> = HashMap::new();
    let mut pre_resolved_order = OrderedNames::new();
    let mut candidate_order = OrderedNames::new();
    for value in &column {
        if let Some(stripped) = value.strip_prefix(&config.dcid_override_prefix) {
            pre_resolved.insert(value.clone(), stripped.trim().to_string());
            pre_resolved_order.insert(value);
        } else {
            candidate_order.insert(value);
        }
    }
    let candidates = candidate_order.names;

    info!("Found {} entities pre-resolved.", pre_resolved.len());
    info!(
        "Resolving {} entities of type {}.",
        candidates.len(),
        entity_type
    );
    let resolved = if candidates.is_empty() {
        HashMap::new()
    } else {
        resolver.resolve(&candidates, entity_type)?
    };
    info!("Resolved {} of {} entities.", resolved.len(), candidates.len());

    let unresolved: Vec<String> = candidates
        .iter()
        .filter(|name| !resolved.contains_key(*name))
        .cloned()
        .collect();
    if !unresolved.is_empty() {
        warn!(
            "# unresolved entities which will be dropped: {}",
            unresolved.len()
        );
        warn!("Dropped entities: {:?}", unresolved);
    }
    let unresolved_set: HashSet<&String> = unresolved.iter().collect();

    // Rewrite the entity column row by row; rows for unresolved names are
    // dropped entirely, every occurrence.
    let mut rows = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let value = &row[config.entity_column_index];
        let dcid = if let Some(literal) = pre_resolved.get(value) {
            literal.clone()
        } else if let Some(dcid) = resolved.get(value) {
            dcid.clone()
        } else {
            debug_assert!(unresolved_set.contains(value));
            continue;
        };
        let mut row = row.clone();
        row[config.entity_column_index] = dcid;
        rows.push(row);
    }

    let debug_trace = build_debug_trace(
        &resolved,
        &candidates,
        &pre_resolved,
        &pre_resolved_order.names,
        &unresolved,
        config,
    );

    Ok(ResolveOutcome {
        table: Table::new(table.headers.clone(), rows),
        debug_trace,
        resolved_count: resolved.len(),
        pre_resolved_count: pre_resolved.len(),
        unresolved_count: unresolved.len(),
    })
}

/// Debug trace rows in three phases: unresolved first (sentinel dcid, empty
/// link), then pre-resolved, then resolved. Within each phase names appear
/// in first-occurrence order.
fn build_debug_trace(
    resolved: &HashMap<String, String>,
    candidate_order: &[String],
    pre_resolved: &HashMap<String, String>,
    pre_resolved_order: &[String],
    unresolved: &[String],
    config: &ImporterConfig,
) -> Table {
    let mut entries: Vec<(String, String)> = Vec::new();

    for name in unresolved {
        entries.push((name.clone(), config.unresolved_marker.clone()));
    }
    for name in pre_resolved_order {
        entries.push((name.clone(), pre_resolved[name].clone()));
    }
    for name in candidate_order {
        if let Some(dcid) = resolved.get(name) {
            entries.push((name.clone(), dcid.clone()));
        }
    }

    let rows = entries
        .into_iter()
        .map(|(name, dcid)| {
            let link = if dcid == config.unresolved_marker {
                String::new()
            } else {
                config.browser_link(&dcid)
            };
            vec![name, dcid, link]
        })
        .collect();

    Table::new(
        vec![
            constants::DEBUG_COLUMN_NAME.to_string(),
            constants::DEBUG_COLUMN_DCID.to_string(),
            constants::DEBUG_COLUMN_LINK.to_string(),
        ],
        rows,
    )
}
