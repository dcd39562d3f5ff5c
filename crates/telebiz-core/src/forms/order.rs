//! Display ordering for built forms.
//!
//! 1. Title-like independent fields first, in their original order.
//! 2. Other independent fields, stable-sorted by type priority.
//! 3. Each dependent field directly after its parent (recursively);
//!    dependents whose parent is missing go last.

use std::collections::HashMap;

use telebiz_models::FormField;

use super::graph::DependencyGraph;

const TITLE_NAMES: [&str; 3] = ["title", "name", "subject"];

/// True for `title`, `name` or `subject`, ignoring case.
pub fn is_title_like(name: &str) -> bool {
    TITLE_NAMES.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// Orders `fields` for display. `graph` must have been resolved from the
/// same fields.
pub fn order_fields(fields: Vec<FormField>, graph: &DependencyGraph) -> Vec<FormField> {
    let total = fields.len();
    let mut roots: Vec<&FormField> = Vec::new();
    let mut orphans: Vec<&FormField> = Vec::new();

    for field in &fields {
        if field.depends_on.is_none() {
            roots.push(field);
        } else if graph.is_orphan(&field.name) {
            orphans.push(field);
        }
    }

    let (mut head, mut rest): (Vec<&FormField>, Vec<&FormField>) = roots
        .into_iter()
        .partition(|f| is_title_like(&f.name));
    rest.sort_by_key(|f| f.field_type.priority());
    head.append(&mut rest);
    head.append(&mut orphans);

    let order: Vec<String> = head.iter().map(|f| f.name.clone()).collect();

    let mut slots: HashMap<String, FormField> =
        fields.into_iter().map(|f| (f.name.clone(), f)).collect();
    let mut out = Vec::with_capacity(total);
    for name in &order {
        emit(name, graph, &mut slots, &mut out);
    }
    out
}

fn emit(
    name: &str,
    graph: &DependencyGraph,
    slots: &mut HashMap<String, FormField>,
    out: &mut Vec<FormField>,
) {
    let Some(field) = slots.remove(name) else {
        return;
    };
    out.push(field);
    for child in graph.children_of(name) {
        emit(child, graph, slots, out);
    }
}
