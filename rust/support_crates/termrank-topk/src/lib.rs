use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A bounded collection that retains the `k` greatest elements offered to it.
///
/// `TopK` wraps a binary min-heap of fixed capacity: the heap's head is always
/// the weakest element retained so far, so deciding whether a new element
/// belongs in the collection is a single comparison against the head. Elements
/// are compared through their `Ord` implementation, where "greater" means
/// "ranks earlier in the final output".
///
/// Offering an element to a full `TopK` either evicts the current weakest
/// element (when the new element strictly outranks it) or rejects the new
/// element. A `TopK` with capacity zero rejects everything.
///
/// # Examples
///
/// ```
/// use termrank_topk::TopK;
///
/// let mut top = TopK::new(2);
/// top.insert(5);
/// top.insert(1);
/// top.insert(3);
///
/// assert_eq!(top.weakest(), Some(&3));
/// assert_eq!(top.into_sorted_vec(), vec![5, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct TopK<T> {
    /// Min-heap over `T`: the head is the weakest retained element.
    heap: BinaryHeap<Reverse<T>>,
    capacity: usize,
}

impl<T: Ord> TopK<T> {
    /// Creates an empty `TopK` that will retain at most `capacity` elements.
    ///
    /// The capacity bounds retention, not allocation: the heap grows with the
    /// elements actually retained, so arbitrarily large capacities (including
    /// `usize::MAX`) are legal and cost nothing up front.
    pub fn new(capacity: usize) -> TopK<T> {
        TopK {
            heap: BinaryHeap::new(),
            capacity,
        }
    }

    /// Offers an element to the collection.
    ///
    /// Returns `true` if the element was retained: either the collection had
    /// spare capacity, or the element strictly outranks the current weakest
    /// retained element, which is evicted to make room. Returns `false` if the
    /// element was rejected (it does not outrank the weakest, or the capacity
    /// is zero).
    pub fn insert(&mut self, item: T) -> bool {
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(item));
            return true;
        }
        match self.heap.peek() {
            Some(Reverse(weakest)) if item > *weakest => {
                self.heap.pop();
                self.heap.push(Reverse(item));
                true
            }
            _ => false,
        }
    }

    /// Returns the weakest element retained so far, or `None` if empty.
    pub fn weakest(&self) -> Option<&T> {
        self.heap.peek().map(|Reverse(item)| item)
    }

    /// Returns the number of elements currently retained.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if no elements are retained.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the maximum number of elements the collection retains.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if the collection holds `capacity` elements, i.e. any
    /// further insertion must evict the weakest element or be rejected.
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Consumes the collection and returns the retained elements ordered
    /// strongest first (descending under `T`'s ordering).
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(item)| item)
            .collect()
    }
}
