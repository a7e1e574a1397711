//! Projects currently in the `Building` state.
//!
//! This is the only collection shared between the engine's event thread and
//! the elapsed-time ticker. It exposes structural updates (insert / remove)
//! and snapshot iteration; callers never get the raw list.
//!
//! ## Locking
//! The lock is held for the structural operation or the snapshot only. Callers
//! must not run coordinator logic or publish to the UI while holding it.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::ids::ProjectId;
use crate::project::ProjectHandle;

/// Elapsed build time of one building project at a given tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElapsedTime {
    pub project: ProjectId,
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
pub struct BuildingProjects {
    items: Mutex<Vec<ProjectHandle>>,
}

impl BuildingProjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `project` unless a project with the same identity is present.
    ///
    /// Returns `false` for a duplicate.
    pub fn insert(&self, project: ProjectHandle) -> bool {
        let mut items = self.lock();
        if items.iter().any(|p| p.id() == project.id()) {
            return false;
        }
        items.push(project);
        true
    }

    pub fn remove(&self, id: &ProjectId) -> Option<ProjectHandle> {
        let mut items = self.lock();
        let pos = items.iter().position(|p| p.id() == id)?;
        Some(items.remove(pos))
    }

    pub fn contains(&self, id: &ProjectId) -> bool {
        self.lock().iter().any(|p| p.id() == id)
    }

    /// Most recently started project that is still building.
    pub fn last(&self) -> Option<ProjectHandle> {
        self.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Remove and return every project, in start order.
    pub fn drain(&self) -> Vec<ProjectHandle> {
        std::mem::take(&mut *self.lock())
    }

    /// Ordered copy of the building projects.
    pub fn snapshot(&self) -> Vec<ProjectHandle> {
        self.lock().clone()
    }

    /// Recompute the elapsed time of every building project.
    ///
    /// Iterates under the collection lock; only per-item reads happen inside.
    pub fn elapsed_tick(&self, now: DateTime<Utc>) -> Vec<ElapsedTime> {
        let items = self.lock();
        items
            .iter()
            .filter_map(|p| {
                p.elapsed(now).map(|elapsed| ElapsedTime {
                    project: p.id().clone(),
                    elapsed,
                })
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ProjectHandle>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
