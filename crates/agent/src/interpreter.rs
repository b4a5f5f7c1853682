//! Executes tasks against the designer, one operation at a time.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};

use flowbridge_core::protocol::ALIVE_STATUS;
use flowbridge_core::result::{OperationResult, TaskResponse};
use flowbridge_core::task::{ElementRef, Node, Operation, Task, TreeTarget};
use flowbridge_core::types::OrderedMap;

use crate::assets::AssetSource;
use crate::builder;
use crate::document::{Designer, ElementId};
use crate::error::OperationError;
use crate::resolver::resolve_ref;

/// Runs tasks in input order with per-operation failure isolation.
pub struct Interpreter {
    designer: Designer,
    assets: Arc<dyn AssetSource>,
}

impl Interpreter {
    pub fn new(designer: Designer, assets: Arc<dyn AssetSource>) -> Self {
        Self { designer, assets }
    }

    pub fn designer(&self) -> &Designer {
        &self.designer
    }

    pub fn designer_mut(&mut self) -> &mut Designer {
        &mut self.designer
    }

    /// Execute every operation of `task` in order.
    ///
    /// A failing operation is recorded and execution moves on, so the
    /// result list always has one entry per input operation.
    pub async fn execute(&mut self, task: &Task) -> TaskResponse {
        let mut results = Vec::with_capacity(task.ops.len());

        for (index, op) in task.ops.iter().enumerate() {
            let result = match self.execute_one(op).await {
                Ok(value) => OperationResult::succeeded(op.name(), value),
                Err(e) => {
                    tracing::warn!(index, op = op.name(), error = %e, "Operation failed");
                    OperationResult::failed(op.name(), e.to_string())
                }
            };
            results.push(result);
        }

        let failed = results.iter().filter(|r| !r.success).count();
        tracing::info!(ops = results.len(), failed, "Task executed");

        TaskResponse::completed(results)
    }

    async fn execute_one(&mut self, op: &Operation) -> Result<Value, OperationError> {
        match op {
            Operation::CreatePage { name, slug } => self.create_page(name, slug.as_deref()),
            Operation::BuildTree { target, tree } => self.build_tree(*target, tree),
            Operation::SetText {
                oid,
                child_path,
                text,
            } => self.set_text(
                &ElementRef {
                    oid: oid.clone(),
                    child_path: child_path.clone(),
                },
                text,
            ),
            Operation::ApplyStyle {
                style_name,
                properties,
                parent_style_name,
                targets,
            } => self.apply_style(style_name, properties, parent_style_name.as_deref(), targets),
            Operation::AddImage { parent, asset, alt } => {
                self.add_image(parent, asset.as_deref(), alt.as_deref())
                    .await
            }
            Operation::TestConnection => Ok(json!({
                "timestamp": Utc::now().to_rfc3339(),
                "status": ALIVE_STATUS,
            })),
        }
    }

    fn create_page(&mut self, name: &str, slug: Option<&str>) -> Result<Value, OperationError> {
        let page_id = self.designer.create_page(name, slug).id.clone();
        self.designer.switch_to(&page_id);

        tracing::debug!(page_id = %page_id, name, "Page created");
        Ok(json!({ "pageId": page_id }))
    }

    fn build_tree(&mut self, target: TreeTarget, tree: &Node) -> Result<Value, OperationError> {
        let (parent, used) = self.tree_parent(target).ok_or(OperationError::NoValidParent)?;
        if used != target {
            tracing::debug!(requested = target.as_str(), "Selection cannot hold children, using page root");
        }

        let built = builder::build(&mut self.designer, tree)?;
        self.designer.append_child(parent, built)?;

        Ok(json!({
            "elementId": built,
            "parent": used.as_str(),
            "elementsCreated": tree.element_count(),
        }))
    }

    /// Resolve the parent for a new subtree together with the target that
    /// was actually used. `Selected` falls back to the page root when
    /// nothing appendable is selected.
    fn tree_parent(&self, target: TreeTarget) -> Option<(ElementId, TreeTarget)> {
        let selected = match target {
            TreeTarget::Selected => self.designer.selected().filter(|id| self.can_hold_children(*id)),
            TreeTarget::Root => None,
        };
        selected
            .map(|id| (id, TreeTarget::Selected))
            .or_else(|| {
                self.designer
                    .root()
                    .filter(|id| self.can_hold_children(*id))
                    .map(|id| (id, TreeTarget::Root))
            })
    }

    fn set_text(&mut self, target: &ElementRef, text: &str) -> Result<Value, OperationError> {
        let element = resolve_ref(&self.designer, target)
            .ok_or_else(|| OperationError::TargetNotFound(describe(target)))?;

        let candidate = if self.carries_text(element) {
            Some(element)
        } else {
            self.designer
                .children(element)
                .iter()
                .copied()
                .find(|child| self.carries_text(*child))
        };
        let text_holder =
            candidate.ok_or_else(|| OperationError::NoTextTarget(describe(target)))?;

        self.designer.set_text(text_holder, text)?;
        Ok(json!({ "elementId": text_holder }))
    }

    fn apply_style(
        &mut self,
        style_name: &str,
        properties: &OrderedMap,
        parent_style_name: Option<&str>,
        targets: &[ElementRef],
    ) -> Result<Value, OperationError> {
        if let Some(parent) = parent_style_name {
            self.designer.upsert_style(parent);
        }

        let style = self.designer.upsert_style(style_name);
        style.properties = properties.clone();
        if let Some(parent) = parent_style_name {
            style.parent = Some(parent.to_string());
        }

        let mut applied = 0;
        let mut skipped = 0;
        for target in targets {
            match resolve_ref(&self.designer, target) {
                Some(element) => {
                    self.designer.add_class(element, style_name)?;
                    applied += 1;
                }
                None => {
                    tracing::debug!(style = style_name, target = %describe(target), "Style target not found, skipping");
                    skipped += 1;
                }
            }
        }

        Ok(json!({
            "style": style_name,
            "applied": applied,
            "skipped": skipped,
        }))
    }

    async fn add_image(
        &mut self,
        parent: &ElementRef,
        asset: Option<&str>,
        alt: Option<&str>,
    ) -> Result<Value, OperationError> {
        let parent_id = resolve_ref(&self.designer, parent)
            .filter(|id| self.can_hold_children(*id))
            .ok_or_else(|| OperationError::ParentNotFound(describe(parent)))?;

        let image = self.designer.create_element("img");
        self.designer.append_child(parent_id, image)?;

        let mut asset_id = None;
        if let Some(reference) = asset {
            let id = match self.designer.find_asset(reference) {
                Some(existing) => existing.id.clone(),
                None => {
                    let fetched = self.assets.fetch(reference).await?;
                    self.designer.add_asset(fetched)
                }
            };
            if self.designer.set_asset(image, &id)? {
                asset_id = Some(id);
            }
        }

        if let Some(alt) = alt {
            self.designer.set_alt(image, alt)?;
        }

        Ok(json!({
            "elementId": image,
            "assetId": asset_id,
        }))
    }

    fn can_hold_children(&self, id: ElementId) -> bool {
        self.designer
            .element(id)
            .is_some_and(|el| el.capability.holds_children())
    }

    fn carries_text(&self, id: ElementId) -> bool {
        self.designer
            .element(id)
            .is_some_and(|el| el.capability.holds_text())
    }
}

fn describe(target: &ElementRef) -> String {
    match &target.child_path {
        Some(path) => format!("{} > {}", target.oid, path),
        None => target.oid.clone(),
    }
}
