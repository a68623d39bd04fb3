use std::borrow::Borrow;
use std::collections::{HashSet, hash_set};
use std::fmt;
use std::hash::Hash;
use std::ptr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Unordered set that can be shared between threads without external locking.
///
/// Read-only operations run concurrently with each other, mutations get exclusive access.
/// Binary operations ([`intersection`](Set::intersection), [`union`](Set::union),
/// [`difference`](Set::difference)) see a consistent snapshot of both operands and return a new set.
///
/// ```
/// # use shared_collections::prelude::*;
/// let lhs = Set::from_iter([1, 2, 3]);
/// let rhs = Set::from_iter([2, 3, 4]);
///
/// assert_eq!(lhs.intersection(&rhs), Set::from_iter([2, 3]));
/// assert_eq!(lhs.union(&rhs), Set::from_iter([1, 2, 3, 4]));
/// assert_eq!(lhs.difference(&rhs), Set::from_iter([1]));
/// ```
pub struct Set<T>(RwLock<HashSet<T>>);

impl<T> Set<T> {
    fn read(&self) -> RwLockReadGuard<'_, HashSet<T>> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashSet<T>> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with both sets read-locked at the same time.
    /// Locks are taken in address order, and only once when `other` is `self`.
    fn with_both<R, F>(&self, other: &Self, f: F) -> R
    where
        F: FnOnce(&HashSet<T>, &HashSet<T>) -> R,
    {
        if ptr::eq(self, other) {
            let inner = self.read();
            return f(&*inner, &*inner);
        }
        let (lhs, rhs) = if ptr::from_ref(self) < ptr::from_ref(other) {
            let lhs = self.read();
            (lhs, other.read())
        } else {
            let rhs = other.read();
            (self.read(), rhs)
        };
        f(&*lhs, &*rhs)
    }
}

impl<T: Eq + Hash> Set<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(RwLock::new(HashSet::with_capacity(capacity)))
    }

    /// Adds `member` to the set. Returns `false` and leaves the set unchanged if it was already present.
    pub fn insert(&self, member: T) -> bool {
        self.write().insert(member)
    }

    /// Removes `member` from the set. Returns `false` if it wasn't present.
    pub fn remove<Q>(&self, member: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.write().remove(member)
    }

    pub fn contains<Q>(&self, member: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.read().contains(member)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Removes all members and releases the memory held by them.
    pub fn clear(&self) {
        *self.write() = HashSet::new();
    }

    /// Returns a copy of the current members. The order is unspecified and may change between calls.
    pub fn members(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.read().iter().cloned().collect()
    }

    /// Returns a new set with the members present in both `self` and `other`.
    pub fn intersection(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        self.with_both(other, |lhs, rhs| {
            let result: HashSet<T> = lhs.intersection(rhs).cloned().collect();
            log::trace!(
                "intersection of {} and {} members has {} members",
                lhs.len(),
                rhs.len(),
                result.len()
            );
            Self::from(result)
        })
    }

    /// Returns a new set with the members present in `self`, `other` or both.
    pub fn union(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        self.with_both(other, |lhs, rhs| {
            let result: HashSet<T> = lhs.union(rhs).cloned().collect();
            log::trace!(
                "union of {} and {} members has {} members",
                lhs.len(),
                rhs.len(),
                result.len()
            );
            Self::from(result)
        })
    }

    /// Returns a new set with the members of `self` that are not in `other`.
    pub fn difference(&self, other: &Self) -> Self
    where
        T: Clone,
    {
        self.with_both(other, |lhs, rhs| {
            let result: HashSet<T> = lhs.difference(rhs).cloned().collect();
            log::trace!(
                "difference of {} and {} members has {} members",
                lhs.len(),
                rhs.len(),
                result.len()
            );
            Self::from(result)
        })
    }

    pub fn into_inner(self) -> HashSet<T> {
        self.0.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for Set<T> {
    fn default() -> Self {
        Self(RwLock::new(HashSet::default()))
    }
}

impl<T> From<HashSet<T>> for Set<T> {
    fn from(hash_set: HashSet<T>) -> Self {
        Self(RwLock::new(hash_set))
    }
}

impl<T: Eq + Hash> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<HashSet<T>>())
    }
}

impl<T: Eq + Hash> Extend<T> for Set<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(iter);
    }
}

impl<T: Eq + Hash> Extend<T> for &Set<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        // the iterator may borrow this very set, so drain it before taking the write lock
        let members: Vec<T> = iter.into_iter().collect();
        self.write().extend(members);
    }
}

impl<T: Eq + Hash> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        self.with_both(other, |lhs, rhs| lhs == rhs)
    }
}

impl<T: Eq + Hash> Eq for Set<T> {}

impl<T: Clone> Clone for Set<T> {
    fn clone(&self) -> Self {
        Self::from(self.read().clone())
    }
}

impl<T: fmt::Debug> fmt::Debug for Set<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.read().iter()).finish()
    }
}

impl<T> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = hash_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_iter()
    }
}
