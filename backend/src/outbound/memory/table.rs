//! Revisioned row storage shared by the in-memory repositories.

use tokio::sync::{RwLock, RwLockWriteGuard};

/// A row addressable by identifier and carrying a revision counter.
pub(super) trait Revisioned: Clone + Send + Sync {
    type Id: PartialEq + Send + Sync;

    fn id(&self) -> &Self::Id;

    fn revision(&self) -> u32;
}

/// Why a compare-and-swap write was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WriteConflict {
    /// The stored revision differs. `expected` is 0 for inserts.
    Stale { expected: u32, actual: u32 },
    /// No row exists with the identifier.
    Missing,
}

/// Rows kept in insertion order behind a single lock.
#[derive(Debug)]
pub(super) struct Table<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Revisioned> Table<T> {
    pub(super) async fn all(&self) -> Vec<T> {
        self.rows.read().await.clone()
    }

    pub(super) async fn find(&self, id: &T::Id) -> Option<T> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id() == id)
            .cloned()
    }

    pub(super) async fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.rows
            .read()
            .await
            .iter()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    /// Exclusive access for writes that must check more than the revision.
    pub(super) async fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.rows.write().await
    }

    /// Insert when `expected` is `None`, otherwise replace the row whose
    /// revision equals `expected`.
    pub(super) async fn upsert(&self, row: &T, expected: Option<u32>) -> Result<(), WriteConflict> {
        let mut rows = self.rows.write().await;
        upsert_locked(&mut rows, row, expected)
    }

    pub(super) async fn remove(&self, id: &T::Id, expected: u32) -> Result<(), WriteConflict> {
        let mut rows = self.rows.write().await;
        let index = rows
            .iter()
            .position(|stored| stored.id() == id)
            .ok_or(WriteConflict::Missing)?;
        let actual = rows.get(index).map_or(0, Revisioned::revision);
        if actual != expected {
            return Err(WriteConflict::Stale { expected, actual });
        }
        rows.remove(index);
        Ok(())
    }
}

fn upsert_locked<T: Revisioned>(
    rows: &mut Vec<T>,
    row: &T,
    expected: Option<u32>,
) -> Result<(), WriteConflict> {
    let Some(index) = rows.iter().position(|stored| stored.id() == row.id()) else {
        return match expected {
            None => {
                rows.push(row.clone());
                Ok(())
            }
            Some(_) => Err(WriteConflict::Missing),
        };
    };
    let stored = rows.get_mut(index).ok_or(WriteConflict::Missing)?;
    let actual = stored.revision();
    match expected {
        None => Err(WriteConflict::Stale {
            expected: 0,
            actual,
        }),
        Some(expected) if expected != actual => Err(WriteConflict::Stale { expected, actual }),
        Some(_) => {
            *stored = row.clone();
            Ok(())
        }
    }
}
