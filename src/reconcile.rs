// Element reconciliation between successive layouts.
//
// The reconciler only classifies labels. Elements themselves belong to the
// rendering side, reached through the `ElementSurface` trait.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::layout::{Layout, Placement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementAction {
    /// Keep the existing element and move it to the new placement.
    Reuse,
    /// The label is new; an element must be created at the placement.
    Create,
    /// The label is gone; its element should be removed.
    Remove,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileRecord {
    pub label: String,
    pub action: ElementAction,
    /// Present for `Reuse` and `Create`.
    pub placement: Option<Placement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    pub records: Vec<ReconcileRecord>,
    pub to_create: Vec<String>,
    pub to_remove: Vec<String>,
}

impl Reconciliation {
    pub fn count(&self, action: ElementAction) -> usize {
        self.records.iter().filter(|r| r.action == action).count()
    }

    pub fn record(&self, label: &str) -> Option<&ReconcileRecord> {
        self.records.iter().find(|r| r.label == label)
    }
}

/// Diff the caller's current elements against a freshly computed layout.
///
/// Records for placed labels come first in placement order, followed by
/// removals in label order. Labels the layout dropped count as absent.
pub fn reconcile<H>(old: &BTreeMap<String, H>, new: &Layout) -> Reconciliation {
    let mut out = Reconciliation::default();

    for (label, placement) in new.iter_placed() {
        let action = if old.contains_key(label) {
            ElementAction::Reuse
        } else {
            out.to_create.push(label.to_string());
            ElementAction::Create
        };
        out.records.push(ReconcileRecord {
            label: label.to_string(),
            action,
            placement: Some(*placement),
        });
    }

    for label in old.keys() {
        if new.placements.contains_key(label) {
            continue;
        }
        out.to_remove.push(label.clone());
        out.records.push(ReconcileRecord {
            label: label.clone(),
            action: ElementAction::Remove,
            placement: None,
        });
    }

    tracing::debug!(
        reuse = out.records.len() - out.to_create.len() - out.to_remove.len(),
        create = out.to_create.len(),
        remove = out.to_remove.len(),
        "reconciled elements"
    );

    out
}

/// Owner of the renderable elements a layout is applied to.
pub trait ElementSurface {
    type Handle;

    fn create(&mut self, label: &str, placement: &Placement, animate: bool) -> Self::Handle;

    fn update(
        &mut self,
        label: &str,
        handle: &mut Self::Handle,
        placement: &Placement,
        animate: bool,
    );

    fn remove(&mut self, label: &str, handle: Self::Handle, animate: bool);
}

/// Apply `plan` to `surface`, consuming the previous elements and returning
/// the element map for the new layout.
///
/// Elements the plan does not carry forward are removed from the surface,
/// including any the plan never mentions.
pub fn apply<S: ElementSurface>(
    surface: &mut S,
    mut elements: BTreeMap<String, S::Handle>,
    plan: &Reconciliation,
    animate: bool,
) -> BTreeMap<String, S::Handle> {
    let mut next = BTreeMap::new();
    for record in &plan.records {
        match (record.action, record.placement.as_ref()) {
            (ElementAction::Reuse, Some(placement)) => {
                if let Some(mut handle) = elements.remove(&record.label) {
                    surface.update(&record.label, &mut handle, placement, animate);
                    next.insert(record.label.clone(), handle);
                } else {
                    let handle = surface.create(&record.label, placement, animate);
                    next.insert(record.label.clone(), handle);
                }
            }
            (ElementAction::Create, Some(placement)) => {
                let handle = surface.create(&record.label, placement, animate);
                next.insert(record.label.clone(), handle);
            }
            (ElementAction::Remove, _) => {
                if let Some(handle) = elements.remove(&record.label) {
                    surface.remove(&record.label, handle, animate);
                }
            }
            (_, None) => {
                tracing::warn!(label = %record.label, "record without placement; skipping");
            }
        }
    }
    for (label, handle) in elements {
        tracing::debug!(label = %label, "element missing from plan; removing");
        surface.remove(&label, handle, animate);
    }
    next
}

/// View a layout as an element map, e.g. to reconcile against it later.
pub fn placements_as_elements(layout: &Layout) -> BTreeMap<String, Placement> {
    layout.placements.clone()
}
