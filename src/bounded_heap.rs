use std::fmt;

/// A min-heap over `i64` values with a fixed maximum capacity.
///
/// This data structure efficiently tracks the top N largest values by:
/// 1. Maintaining a min-heap of size N (the N largest values seen so far)
/// 2. For each new value, comparing it against the minimum (smallest of the top N)
/// 3. If the new value is larger, evicting the minimum and inserting the new value
///
/// Complexity:
/// - Insert: O(log N) where N is the capacity, O(1) for non-qualifying values
/// - Memory: O(N) instead of O(total values)
///
/// This is much more efficient than collecting all values and sorting:
/// - For 1M values with capacity 10: O(1M * log 10) vs O(1M * log 1M)
/// - Memory: 10 values vs 1M values
///
/// The backing storage is a plain array indexed as a binary tree, so the heap
/// can be sorted in place with [`heap_sort`](BoundedMinHeap::heap_sort) for
/// ordered reporting. The logical `count` is tracked separately from the
/// storage length because the sort shrinks the heap region step by step.
#[derive(Debug, Clone)]
pub struct BoundedMinHeap {
    items: Vec<i64>,
    count: usize,
    capacity: usize,
}

/// Contract violations on heap operations.
///
/// Both variants indicate a caller bug rather than an environmental failure;
/// they are never retried.
#[derive(Debug, PartialEq, Eq)]
pub enum HeapError {
    /// `extract_min` was called on an empty heap.
    Underflow,
    /// A sift target lies outside the current occupancy.
    IndexOutOfRange { index: usize, count: usize },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::Underflow => write!(f, "heap underflow: extract from empty heap"),
            HeapError::IndexOutOfRange { index, count } => {
                write!(f, "index {} out of heap range (count {})", index, count)
            }
        }
    }
}

impl std::error::Error for HeapError {}

impl BoundedMinHeap {
    /// Creates a new bounded min-heap with the specified capacity.
    ///
    /// A zero-capacity heap is valid and discards every value offered to it.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            count: 0,
            capacity,
        }
    }

    /// Attempts to insert a value into the heap.
    ///
    /// If the heap is not full, the value is added unconditionally.
    /// If the heap is full and the value is strictly greater than the minimum,
    /// the minimum is evicted and the value is added.
    /// Otherwise the value is discarded. Ties at the minimum are discarded.
    pub fn insert(&mut self, value: i64) {
        if self.count < self.capacity {
            self.items.push(value);
            self.count += 1;
            self.raise(self.count - 1);
        } else if self.items.first().is_some_and(|&min| value > min) {
            self.evict_min();
            self.items.push(value);
            self.count += 1;
            self.raise(self.count - 1);
        }
    }

    /// Removes and returns the minimum value.
    ///
    /// Returns [`HeapError::Underflow`] on an empty heap.
    pub fn extract_min(&mut self) -> Result<i64, HeapError> {
        if self.count == 0 {
            return Err(HeapError::Underflow);
        }
        let minimum = self.items[0];
        self.evict_min();
        Ok(minimum)
    }

    /// Places `value` at `index` and exchanges it with its parents until the
    /// heap property holds again.
    ///
    /// Returns [`HeapError::IndexOutOfRange`] if `index` is outside the
    /// current occupancy.
    pub fn sift_up(&mut self, index: usize, value: i64) -> Result<(), HeapError> {
        if index >= self.count {
            return Err(HeapError::IndexOutOfRange {
                index,
                count: self.count,
            });
        }
        self.items[index] = value;
        self.raise(index);
        Ok(())
    }

    /// Restores the heap property for the subtree rooted at `index` by
    /// repeatedly swapping with the smaller child. Iterative so very large
    /// capacities cannot grow the stack.
    pub fn heapify(&mut self, mut index: usize) {
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;
            if left < self.count && self.items[left] < self.items[smallest] {
                smallest = left;
            }
            if right < self.count && self.items[right] < self.items[smallest] {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.items.swap(index, smallest);
            index = smallest;
        }
    }

    /// Converts the backing array into a valid min-heap by heapifying from
    /// the middle index down to the root. O(N).
    pub fn build_heap(&mut self) {
        for index in (0..=self.count / 2).rev() {
            self.heapify(index);
        }
    }

    /// Inserts every value currently held into `other`, applying `other`'s
    /// eviction policy. A logical union, not a structural merge.
    pub fn merge_into(&self, other: &mut BoundedMinHeap) {
        for &value in &self.items[..self.count] {
            other.insert(value);
        }
    }

    /// Destructively reorders the backing storage into ascending order.
    ///
    /// The selection pass repeatedly swaps the root minimum to the end of the
    /// shrinking heap region, which leaves the storage in descending order;
    /// the final reversal yields the ascending sequence reports want.
    ///
    /// The logical count is zero afterward: a heap that should be reused
    /// after sorting must be rebuilt or replaced.
    pub fn heap_sort(&mut self) {
        self.build_heap();
        while self.count > 1 {
            let last = self.count - 1;
            self.items.swap(0, last);
            self.count = last;
            self.heapify(0);
        }
        self.count = 0;
        self.items.reverse();
    }

    /// Consumes the heap and returns its values in ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<i64> {
        self.heap_sort();
        self.items
    }

    /// Read-only check that the min-heap property holds over the current
    /// logical range. An empty heap is not a heap for this system's purposes.
    pub fn verify_property(&self) -> bool {
        if self.count == 0 {
            return false;
        }
        for parent in 0..=self.count / 2 {
            let left = 2 * parent + 1;
            if left < self.count && self.items[left] < self.items[parent] {
                return false;
            }
            let right = 2 * parent + 2;
            if right < self.count && self.items[right] < self.items[parent] {
                return false;
            }
        }
        true
    }

    /// Returns the number of values currently in the heap.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the fixed capacity (the N of Top-N).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Evicts the root. Callers guarantee `count > 0`.
    fn evict_min(&mut self) {
        let last = self.count - 1;
        self.items.swap(0, last);
        self.items.truncate(last);
        self.count = last;
        self.heapify(0);
    }

    /// Exchanges `items[index]` with its parents until the heap property
    /// holds. Callers guarantee `index < count`.
    fn raise(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.items[parent] <= self.items[index] {
                break;
            }
            self.items.swap(index, parent);
            index = parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heap_of(capacity: usize, values: &[i64]) -> BoundedMinHeap {
        let mut heap = BoundedMinHeap::new(capacity);
        for &v in values {
            heap.insert(v);
        }
        heap
    }

    #[test]
    fn test_insert_keeps_invariant() {
        let mut heap = BoundedMinHeap::new(5);
        for &v in &[42, -7, 13, 0, 99, 5, -200, 77] {
            heap.insert(v);
            assert!(heap.verify_property());
            assert!(heap.len() <= heap.capacity());
        }
    }

    #[test]
    fn test_fills_below_capacity_unconditionally() {
        // Small values must not be dropped while the heap is still growing.
        let heap = heap_of(3, &[5, 1, 9]);
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.into_sorted_vec(), vec![1, 5, 9]);
    }

    #[test]
    fn test_eviction() {
        let mut heap = heap_of(3, &[5, 2, 8]);

        // 10 evicts the minimum (2)
        heap.insert(10);

        assert!(heap.verify_property());
        assert_eq!(heap.into_sorted_vec(), vec![5, 8, 10]);
    }

    #[test]
    fn test_no_eviction_if_smaller() {
        let mut heap = heap_of(3, &[5, 8, 10]);

        heap.insert(1);

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.into_sorted_vec(), vec![5, 8, 10]);
    }

    #[test]
    fn test_tie_at_minimum_discarded() {
        let mut heap = heap_of(3, &[5, 8, 10]);

        heap.insert(5);

        assert_eq!(heap.into_sorted_vec(), vec![5, 8, 10]);
    }

    #[test]
    fn test_capacity_bound() {
        let mut heap = BoundedMinHeap::new(5);
        for i in 0..100 {
            heap.insert(i);
        }

        assert_eq!(heap.len(), 5);
        assert_eq!(heap.into_sorted_vec(), vec![95, 96, 97, 98, 99]);
    }

    #[test]
    fn test_zero_capacity_discards_everything() {
        let mut heap = BoundedMinHeap::new(0);
        heap.insert(42);
        heap.insert(i64::MAX);

        assert!(heap.is_empty());
        assert_eq!(heap.extract_min(), Err(HeapError::Underflow));
    }

    #[test]
    fn test_extract_min_returns_true_minimum() {
        let mut heap = heap_of(6, &[28, 3, 1, 4, 9, 6]);

        assert_eq!(heap.extract_min(), Ok(1));
        assert_eq!(heap.len(), 5);
        assert!(heap.verify_property());
        assert_eq!(heap.into_sorted_vec(), vec![3, 4, 6, 9, 28]);
    }

    #[test]
    fn test_extract_min_drains_in_order() {
        let mut heap = heap_of(4, &[7, -3, 12, 0]);
        let mut drained = Vec::new();
        while let Ok(v) = heap.extract_min() {
            drained.push(v);
            if !heap.is_empty() {
                assert!(heap.verify_property());
            }
        }

        assert_eq!(drained, vec![-3, 0, 7, 12]);
        assert_eq!(heap.extract_min(), Err(HeapError::Underflow));
    }

    #[test]
    fn test_sift_up_out_of_range() {
        let mut heap = heap_of(4, &[1, 2, 3]);
        let err = heap.sift_up(3, 0).unwrap_err();
        assert_eq!(err, HeapError::IndexOutOfRange { index: 3, count: 3 });
    }

    #[test]
    fn test_heap_sort_ascending_and_multiset_preserving() {
        let mut values = vec![9, -4, 17, 0, 0, 3, -4, 25];
        let mut heap = heap_of(values.len(), &values);

        heap.heap_sort();
        assert_eq!(heap.len(), 0);

        values.sort_unstable();
        assert_eq!(heap.items, values);
    }

    #[test]
    fn test_heap_sort_empty_and_single() {
        let mut heap = BoundedMinHeap::new(3);
        heap.heap_sort();
        assert!(heap.items.is_empty());

        let heap = heap_of(3, &[42]);
        assert_eq!(heap.into_sorted_vec(), vec![42]);
    }

    #[test]
    fn test_merge_respects_target_capacity() {
        let a = heap_of(2, &[1, 2, 3]);
        let mut b = heap_of(2, &[4, 5, 6]);

        a.merge_into(&mut b);

        assert_eq!(b.len(), 2);
        assert_eq!(b.into_sorted_vec(), vec![5, 6]);
    }

    #[test]
    fn test_merge_takes_largest_across_both() {
        let a = heap_of(3, &[10, 40, 20]);
        let mut b = heap_of(3, &[30, 5, 50]);

        a.merge_into(&mut b);

        assert_eq!(b.into_sorted_vec(), vec![30, 40, 50]);
    }

    #[test]
    fn test_verify_property_false_for_empty() {
        let heap = BoundedMinHeap::new(10);
        assert!(!heap.verify_property());
    }

    #[test]
    fn test_mixed_sequence_capacity_three() {
        let heap = heap_of(3, &[5, 1, 9, 2, 8]);
        assert_eq!(heap.into_sorted_vec(), vec![5, 8, 9]);
    }

    #[test]
    fn test_build_heap_from_arbitrary_order() {
        let mut heap = BoundedMinHeap::new(6);
        heap.items = vec![28, 3, 1, 4, 9, 6];
        heap.count = 6;

        heap.build_heap();

        assert!(heap.verify_property());
        assert_eq!(heap.extract_min(), Ok(1));
    }
}
