use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Entity families sharing one cache namespace each. Invalidation is
/// coarse-grained: a mutation on tasks stales every cached tasks page,
/// whatever its page number or search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Tasks,
    Categories,
    Notes,
}

impl Entity {
    fn index(self) -> usize {
        match self {
            Entity::Tasks => 0,
            Entity::Categories => 1,
            Entity::Notes => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Entity::Tasks => "tasks",
            Entity::Categories => "categories",
            Entity::Notes => "notes",
        }
    }
}

/// Shared epoch counters, one per entity family. Cached pages are stamped
/// with the epoch they were fetched under; bumping the epoch stales them all
/// at once without touching the caches themselves.
#[derive(Debug, Clone, Default)]
pub struct InvalidationBus {
    epochs: Arc<[AtomicU64; 3]>,
}

impl InvalidationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self, entity: Entity) -> u64 {
        self.epochs[entity.index()].load(Ordering::SeqCst)
    }

    pub fn invalidate(&self, entity: Entity) {
        let epoch = self.epochs[entity.index()].fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(entity = entity.as_str(), epoch, "cache invalidated");
    }
}
