//! Arena-indexed work hierarchy.
//!
//! Works live in a `Vec` and refer to each other by index; `children` is the
//! inverse of `parent`. Every mutation keeps the hierarchy acyclic and
//! company-homogeneous, so traversals never revisit a node.

use std::collections::HashMap;

use tracing::debug;

use stockwork_core::{Context, DomainError, DomainResult, WorkId};

use crate::error::{WorkError, WorkViolation};
use crate::ledger::HourLedger;
use crate::work::Work;

/// Separator between ancestor names in a qualified name.
pub const NAME_SEPARATOR: &str = "\\";

#[derive(Debug, Clone, Default)]
pub struct WorkTree {
    nodes: Vec<Work>,
    index: HashMap<WorkId, usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl WorkTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from records in any order.
    ///
    /// Duplicate ids are a conflict and parents missing from `works` are
    /// reported as not found. The whole set
    /// is validated; the first violation is returned.
    pub fn from_works(works: impl IntoIterator<Item = Work>) -> Result<Self, WorkError> {
        let mut tree = Self::new();
        for work in works {
            if tree.index.contains_key(&work.id) {
                return Err(DomainError::conflict(format!("work {} already exists", work.id)).into());
            }
            tree.push(work);
        }
        for i in 0..tree.nodes.len() {
            if let Some(parent_id) = tree.nodes[i].parent {
                let p = tree.index_of(parent_id)?;
                tree.parent[i] = Some(p);
                tree.children[p].push(i);
            }
        }
        let ids: Vec<WorkId> = tree.nodes.iter().map(|w| w.id).collect();
        if let Some((work, violation)) = tree.validate(&ids).into_iter().next() {
            return Err(WorkError::violation(work, violation));
        }
        Ok(tree)
    }

    fn push(&mut self, work: Work) -> usize {
        let i = self.nodes.len();
        self.index.insert(work.id, i);
        self.nodes.push(work);
        self.parent.push(None);
        self.children.push(Vec::new());
        i
    }

    fn index_of(&self, id: WorkId) -> DomainResult<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or_else(|| DomainError::not_found(format!("work {id}")))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: WorkId) -> Option<&Work> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Work> {
        self.nodes.iter()
    }

    /// Add a work under its (already present) parent.
    pub fn create(&mut self, work: Work) -> Result<WorkId, WorkError> {
        if self.index.contains_key(&work.id) {
            return Err(DomainError::conflict(format!("work {} already exists", work.id)).into());
        }
        let parent = work.parent.map(|p| self.index_of(p)).transpose()?;
        if let Some(p) = parent {
            if self.nodes[p].company != work.company {
                return Err(WorkError::violation(work.id, WorkViolation::ParentCompany));
            }
        }

        let id = work.id;
        let i = self.push(work);
        if let Some(p) = parent {
            self.parent[i] = Some(p);
            self.children[p].push(i);
        }
        debug!(work_id = %id, "created work");
        Ok(id)
    }

    /// Move a work under another parent (or to the top level).
    pub fn write_parent(&mut self, id: WorkId, parent: Option<WorkId>) -> Result<(), WorkError> {
        let i = self.index_of(id)?;
        let new_parent = parent.map(|p| self.index_of(p)).transpose()?;
        if let Some(p) = new_parent {
            if p == i || self.is_ancestor(i, p) {
                return Err(WorkError::violation(id, WorkViolation::RecursiveWorks));
            }
            if self.nodes[p].company != self.nodes[i].company {
                return Err(WorkError::violation(id, WorkViolation::ParentCompany));
            }
        }

        if let Some(old) = self.parent[i] {
            self.children[old].retain(|&c| c != i);
        }
        self.parent[i] = new_parent;
        self.nodes[i].parent = parent;
        if let Some(p) = new_parent {
            self.children[p].push(i);
        }
        Ok(())
    }

    /// Whether `ancestor` is a strict ancestor of `node`.
    fn is_ancestor(&self, ancestor: usize, node: usize) -> bool {
        let mut current = self.parent[node];
        let mut steps = 0;
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = self.parent[p];
        }
        false
    }

    pub fn children(&self, id: WorkId) -> DomainResult<Vec<WorkId>> {
        let i = self.index_of(id)?;
        Ok(self.children[i].iter().map(|&c| self.nodes[c].id).collect())
    }

    /// Indices of `root` and everything below it, parents before children.
    fn subtree(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            out.push(i);
            stack.extend(self.children[i].iter().rev().copied());
        }
        out
    }

    /// `ids` and all of their descendants, without duplicates.
    pub fn child_of(&self, ids: &[WorkId]) -> DomainResult<Vec<WorkId>> {
        let mut seen = vec![false; self.nodes.len()];
        let mut out = Vec::new();
        for &id in ids {
            let root = self.index_of(id)?;
            for i in self.subtree(root) {
                if !seen[i] {
                    seen[i] = true;
                    out.push(self.nodes[i].id);
                }
            }
        }
        Ok(out)
    }

    /// Ancestors of `id`, root first, excluding `id` itself.
    pub fn ancestors(&self, id: WorkId) -> DomainResult<Vec<WorkId>> {
        let i = self.index_of(id)?;
        let mut chain = Vec::new();
        let mut current = self.parent[i];
        while let Some(p) = current {
            chain.push(self.nodes[p].id);
            current = self.parent[p];
        }
        chain.reverse();
        Ok(chain)
    }

    /// Names from the root down to `id`, joined by `\`.
    pub fn qualified_name(&self, id: WorkId) -> DomainResult<String> {
        let i = self.index_of(id)?;
        let name = &self.nodes[i].name;
        match self.nodes[i].parent {
            Some(parent) => Ok(format!("{}{NAME_SEPARATOR}{name}", self.qualified_name(parent)?)),
            None => Ok(name.clone()),
        }
    }

    pub fn rec_names(&self, ids: &[WorkId]) -> DomainResult<HashMap<WorkId, String>> {
        ids.iter()
            .map(|&id| Ok((id, self.qualified_name(id)?)))
            .collect()
    }

    /// Set `active` on `ids`. Deactivation also deactivates every
    /// descendant; activation only touches `ids`.
    ///
    /// Returns the works whose flag changed.
    pub fn set_active(&mut self, ids: &[WorkId], active: bool) -> DomainResult<Vec<WorkId>> {
        let targets = if active {
            for &id in ids {
                self.index_of(id)?;
            }
            ids.to_vec()
        } else {
            self.child_of(ids)?
        };

        let mut changed = Vec::new();
        for id in targets {
            let i = self.index[&id];
            if self.nodes[i].active != active {
                self.nodes[i].active = active;
                changed.push(id);
            }
        }
        debug!(active, changed = changed.len(), "wrote work active flag");
        Ok(changed)
    }

    /// `false` when following parents from any of `ids` comes back to it.
    pub fn check_recursion(&self, ids: &[WorkId]) -> bool {
        ids.iter().all(|&id| match self.index.get(&id) {
            Some(&i) => !self.is_ancestor(i, i),
            None => true,
        })
    }

    /// `false` when any of `ids` belongs to another company than its parent.
    pub fn check_parent_company(&self, ids: &[WorkId]) -> bool {
        ids.iter().all(|&id| match self.index.get(&id) {
            Some(&i) => self.parent[i].is_none_or(|p| self.nodes[p].company == self.nodes[i].company),
            None => true,
        })
    }

    /// Every rule broken by one of `ids`.
    pub fn validate(&self, ids: &[WorkId]) -> Vec<(WorkId, WorkViolation)> {
        let mut violations = Vec::new();
        for &id in ids {
            if !self.check_recursion(&[id]) {
                violations.push((id, WorkViolation::RecursiveWorks));
            }
            if !self.check_parent_company(&[id]) {
                violations.push((id, WorkViolation::ParentCompany));
            }
        }
        violations
    }

    /// Total hours of each of `ids`: its own lines plus those of its active
    /// descendants, within the date window of `ctx`.
    ///
    /// Requested works are included even when inactive. Each node in the
    /// expanded set is summed once however many requested roots share it.
    pub fn hours<L>(&self, ids: &[WorkId], ledger: &L, ctx: &Context) -> DomainResult<HashMap<WorkId, f64>>
    where
        L: HourLedger + ?Sized,
    {
        let n = self.nodes.len();
        let mut requested = Vec::with_capacity(ids.len());
        let mut in_scope = vec![false; n];
        for &id in ids {
            let root = self.index_of(id)?;
            requested.push(root);
            in_scope[root] = true;
            for i in self.subtree(root) {
                if self.nodes[i].active {
                    in_scope[i] = true;
                }
            }
        }

        let scope: Vec<WorkId> = (0..n).filter(|&i| in_scope[i]).map(|i| self.nodes[i].id).collect();
        let own = ledger.hours_by_work(&scope, ctx);

        // Post-order over the scoped subgraph; `resolved` guards shared subtrees.
        let mut total = vec![0.0f64; n];
        let mut resolved = vec![false; n];
        for &root in &requested {
            let mut stack = vec![(root, false)];
            while let Some((i, children_done)) = stack.pop() {
                if resolved[i] {
                    continue;
                }
                if children_done {
                    let below: f64 = self.children[i]
                        .iter()
                        .filter(|&&c| in_scope[c])
                        .map(|&c| total[c])
                        .sum();
                    total[i] = own.get(&self.nodes[i].id).copied().unwrap_or(0.0) + below;
                    resolved[i] = true;
                } else {
                    stack.push((i, true));
                    for &c in &self.children[i] {
                        if in_scope[c] && !resolved[c] {
                            stack.push((c, false));
                        }
                    }
                }
            }
        }

        debug!(requested = ids.len(), scope = scope.len(), "computed work hours");
        Ok(requested
            .into_iter()
            .map(|i| (self.nodes[i].id, total[i]))
            .collect())
    }
}
