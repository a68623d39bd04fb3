use crate::error::EnqueueError;
use std::collections::{VecDeque, vec_deque};
use std::fmt;
use std::sync::Arc;

type Equivalence<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// FIFO queue that can optionally refuse elements equivalent to ones it already holds.
///
/// The queue does no locking of its own: mutation requires `&mut self`, so sharing it between threads
/// takes a `Mutex` or similar on the caller's side.
///
/// ```
/// # use shared_collections::prelude::*;
/// let mut queue: Queue<&str> = Queue::new();
/// queue.suppress_duplicates();
///
/// queue.enqueue("a");
/// queue.enqueue("b");
/// queue.enqueue("a");
///
/// assert_eq!(queue.len(), 2);
/// assert_eq!(queue.dequeue(), Some("a"));
/// assert_eq!(queue.dequeue(), Some("b"));
/// assert_eq!(queue.dequeue(), None);
/// ```
pub struct Queue<T> {
    elements: VecDeque<T>,
    equivalence: Option<Equivalence<T>>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self::from(VecDeque::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from(VecDeque::with_capacity(capacity))
    }

    /// Creates an empty queue that discards elements for which `equivalence(queued, new)` holds.
    pub fn with_duplicate_suppression<F>(equivalence: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let mut queue = Self::new();
        queue.enable_duplicate_suppression(equivalence);
        queue
    }

    /// Makes subsequent enqueues discard an element if `equivalence(queued, new)` returns `true` for any
    /// queued element. Elements already in the queue that are equivalent to an earlier one are dropped.
    /// Replaces the previously registered function, if any.
    pub fn enable_duplicate_suppression<F>(&mut self, equivalence: F)
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let initial_len = self.elements.len();
        self.discard_duplicates(&equivalence);
        log::debug!(
            "duplicate suppression enabled, {} queued duplicates discarded",
            initial_len - self.elements.len()
        );
        self.equivalence = Some(Arc::new(equivalence));
    }

    /// Same as [`enable_duplicate_suppression`](Queue::enable_duplicate_suppression) with `==` as the equivalence.
    pub fn suppress_duplicates(&mut self)
    where
        T: PartialEq + 'static,
    {
        self.enable_duplicate_suppression(<T as PartialEq>::eq);
    }

    pub fn disable_duplicate_suppression(&mut self) {
        if self.equivalence.take().is_some() {
            log::debug!("duplicate suppression disabled");
        }
    }

    pub fn is_suppressing_duplicates(&self) -> bool {
        self.equivalence.is_some()
    }

    /// Appends `element` to the back of the queue, unless duplicate suppression is on and an equivalent
    /// element is already queued, in which case `element` is dropped.
    pub fn enqueue(&mut self, element: T) {
        if self.try_enqueue(element).is_err() {
            log::trace!("duplicate discarded, {} elements queued", self.elements.len());
        }
    }

    /// Like [`enqueue`](Queue::enqueue), but hands a discarded element back to the caller.
    pub fn try_enqueue(&mut self, element: T) -> Result<(), EnqueueError<T>> {
        let is_duplicate = self.equivalence.as_ref().is_some_and(|equivalence| {
            self.elements
                .iter()
                .any(|queued| equivalence(queued, &element))
        });
        if is_duplicate {
            Err(EnqueueError::Duplicate(element))
        } else {
            self.elements.push_back(element);
            Ok(())
        }
    }

    pub fn dequeue(&mut self) -> Option<T> {
        let element = self.elements.pop_front()?;
        if self.elements.is_empty() {
            // don't hold on to the high-water mark
            self.elements = VecDeque::new();
        }
        Some(element)
    }

    pub fn peek(&self) -> Option<&T> {
        self.elements.front()
    }

    pub fn contains(&self, element: &T) -> bool
    where
        T: PartialEq<T>,
    {
        self.elements.contains(element)
    }

    pub fn clear(&mut self) {
        self.elements = VecDeque::new();
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn capacity(&self) -> usize {
        self.elements.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates from front to back.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn into_inner(self) -> VecDeque<T> {
        self.elements
    }

    fn discard_duplicates(&mut self, equivalence: &dyn Fn(&T, &T) -> bool) {
        if self.elements.len() < 2 {
            return;
        }
        let mut kept = VecDeque::with_capacity(self.elements.len());
        for element in self.elements.drain(..) {
            if !kept.iter().any(|queued| equivalence(queued, &element)) {
                kept.push_back(element);
            }
        }
        self.elements = kept;
    }
}

impl<T> From<VecDeque<T>> for Queue<T> {
    fn from(vec_deque: VecDeque<T>) -> Self {
        Self {
            elements: vec_deque,
            equivalence: None,
        }
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<VecDeque<T>>())
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.enqueue(element);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("elements", &self.elements)
            .field("suppress_duplicates", &self.equivalence.is_some())
            .finish()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Queue<T> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
            equivalence: self.equivalence.clone(),
        }
    }
}

impl<T> IntoIterator for Queue<T> {
    type Item = T;
    type IntoIter = vec_deque::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::{assert_impl_all, assert_not_impl_any};
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct User {
        name: &'static str,
        email: &'static str,
    }

    fn by_email(queued: &User, new: &User) -> bool {
        queued.email == new.email
    }

    #[test]
    fn test_queue_is_send() {
        assert_impl_all!(Queue<usize>: std::marker::Send, Sync);
        assert_not_impl_any!(Queue<Rc<usize>>: std::marker::Send, Sync);
    }

    #[test]
    fn test_queue() {
        let mut queue: Queue<i32> = Queue::new();
        assert_eq!(0, queue.len());
        assert!(queue.is_empty());
        assert_eq!(None, queue.peek());

        queue.enqueue(10);
        assert_eq!(1, queue.len());
        assert!(!queue.is_empty());

        assert_eq!(Some(&10), queue.peek());
        assert_eq!(1, queue.len());

        queue.enqueue(20);
        assert_eq!(2, queue.len());
        assert_eq!(Some(&10), queue.peek());
        assert_eq!(2, queue.len());

        assert_eq!(Some(10), queue.dequeue());
        assert_eq!(1, queue.len());
        assert!(!queue.is_empty());
        assert_eq!(Some(&20), queue.peek());

        assert_eq!(Some(20), queue.dequeue());
        assert_eq!(0, queue.len());
        assert!(queue.is_empty());

        assert_eq!(None, queue.dequeue());
        assert_eq!(None, queue.peek());
        assert_eq!(0, queue.len());

        queue.enqueue(30);
        assert_eq!(1, queue.len());
        assert!(!queue.is_empty());
    }

    #[test]
    fn test_fifo_order() {
        let mut queue: Queue<i32> = (1..=100).collect();
        let drained: Vec<i32> = std::iter::from_fn(|| queue.dequeue()).collect();
        assert_eq!((1..=100).collect::<Vec<_>>(), drained);
    }

    #[test]
    fn test_draining_releases_buffer() {
        let mut queue = Queue::with_capacity(64);
        for i in 0..64 {
            queue.enqueue(i);
        }
        assert!(queue.capacity() >= 64);

        while queue.dequeue().is_some() {}
        assert_eq!(0, queue.capacity());

        queue.extend([1, 2, 3]);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(0, queue.capacity());
    }

    #[test]
    fn test_duplicates_by_field_are_suppressed() {
        let mut queue = Queue::with_duplicate_suppression(by_email);
        assert!(queue.is_suppressing_duplicates());

        queue.enqueue(User {
            name: "Alice",
            email: "alice@example.com",
        });
        queue.enqueue(User {
            name: "Alice Smith",
            email: "alice@example.com",
        });
        assert_eq!(1, queue.len());

        // the first element stays, the newcomer is dropped
        assert_eq!(Some("Alice"), queue.peek().map(|user| user.name));
    }

    #[test]
    fn test_try_enqueue_returns_duplicate() {
        let mut queue: Queue<i32> = Queue::new();
        queue.suppress_duplicates();

        assert_eq!(Ok(()), queue.try_enqueue(7));
        assert_eq!(Err(EnqueueError::Duplicate(7)), queue.try_enqueue(7));
        assert_eq!(Ok(()), queue.try_enqueue(8));
        assert_eq!(vec![7, 8], queue.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_dequeued_element_can_be_enqueued_again() {
        let mut queue: Queue<i32> = Queue::new();
        queue.suppress_duplicates();
        queue.enqueue(1);
        queue.enqueue(2);

        assert_eq!(Some(1), queue.dequeue());
        queue.enqueue(1);
        queue.enqueue(2);
        assert_eq!(vec![&2, &1], queue.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_enabling_suppression_prunes_existing_duplicates() {
        let mut queue: Queue<i32> = [1, 2, 1, 3, 2, 4].into_iter().collect();
        assert!(!queue.is_suppressing_duplicates());

        queue.suppress_duplicates();
        assert_eq!(vec![1, 2, 3, 4], queue.clone().into_iter().collect::<Vec<_>>());

        queue.enable_duplicate_suppression(|queued: &i32, new: &i32| queued % 2 == new % 2);
        assert_eq!(vec![1, 2], queue.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_disabling_suppression_allows_duplicates() {
        let mut queue: Queue<&str> = Queue::new();
        queue.suppress_duplicates();
        queue.extend(["a", "a", "b"]);
        assert_eq!(2, queue.len());

        queue.disable_duplicate_suppression();
        assert!(!queue.is_suppressing_duplicates());
        queue.extend(["a", "b"]);
        assert_eq!(
            VecDeque::from(["a", "b", "a", "b"]),
            queue.into_inner()
        );
    }

    #[test]
    fn test_clone_keeps_suppression() {
        let mut original = Queue::with_duplicate_suppression(by_email);
        original.enqueue(User {
            name: "Bob",
            email: "bob@example.com",
        });

        let mut copy = original.clone();
        copy.enqueue(User {
            name: "Robert",
            email: "bob@example.com",
        });
        assert_eq!(1, copy.len());
        assert!(copy.is_suppressing_duplicates());

        original.dequeue();
        assert_eq!(1, copy.len());
        assert!(original.is_empty());
    }

    #[test]
    fn test_contains_and_iter() {
        let queue: Queue<_> = ["x", "y"].into_iter().collect();
        assert!(queue.contains(&"x"));
        assert!(!queue.contains(&"z"));
        assert_eq!(vec![&"x", &"y"], (&queue).into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_debug() {
        let mut queue: Queue<i32> = Queue::new();
        queue.enqueue(1);
        assert_eq!(
            "Queue { elements: [1], suppress_duplicates: false }",
            format!("{queue:?}")
        );
    }
}
