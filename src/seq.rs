//! Ordered double-ended sequence primitive.
//!
//! [`Deque`] is a growable list supporting O(1) amortized pushes and pops at
//! both ends. Storage is two plain growable arrays holding one logical
//! sequence: `front` keeps the leading elements in reverse, `back` keeps the
//! trailing elements in order, so both ends pop with a plain `Vec::pop` and
//! no slot is ever left vacant. When a pop finds its side empty, half of the
//! other side is shifted across.
//!
//! The triangulator uses it as the edge-legalization work stack (back pushes
//! and pops only, which never rebalance); point samplers driving the
//! triangulator use the same primitive as a candidate queue with
//! swap-with-tail deletion.
//!
//! Logical positions are zero-based.

/// A growable double-ended sequence.
///
/// The logical sequence is `front` reversed, then `back`. A pop on an empty
/// side moves half of the other side across, which keeps both ends O(1)
/// amortized and storage at exactly one slot per live element.
#[derive(Debug, Clone)]
pub struct Deque<T> {
    front: Vec<T>,
    back: Vec<T>,
}

impl<T> Deque<T> {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self {
            front: Vec::new(),
            back: Vec::new(),
        }
    }

    /// Create an empty sequence with room for `capacity` back pushes before
    /// reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            front: Vec::new(),
            back: Vec::with_capacity(capacity),
        }
    }

    /// Number of elements in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }

    /// True if the sequence holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.back.is_empty()
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        self.front.clear();
        self.back.clear();
    }

    /// Append `value` at the back.
    #[inline]
    pub fn push_back(&mut self, value: T) {
        self.back.push(value);
    }

    /// Remove and return the last element, or `None` if empty.
    #[inline]
    pub fn pop_back(&mut self) -> Option<T> {
        if self.back.is_empty() {
            let n = self.front.len();
            if n == 0 {
                return None;
            }
            // front is stored reversed, so its prefix is the logical tail;
            // reversing the drained half puts it in back's order.
            let keep = n / 2;
            self.back.extend(self.front.drain(..n - keep).rev());
        }
        self.back.pop()
    }

    /// Prepend `value` at the front.
    #[inline]
    pub fn push_front(&mut self, value: T) {
        self.front.push(value);
    }

    /// Remove and return the first element, or `None` if empty.
    #[inline]
    pub fn pop_front(&mut self) -> Option<T> {
        if self.front.is_empty() {
            let n = self.back.len();
            if n == 0 {
                return None;
            }
            // back's prefix is the logical head; reversed, it pops in order.
            let keep = n / 2;
            self.front.extend(self.back.drain(..n - keep).rev());
        }
        self.front.pop()
    }

    /// Reference to the element at logical position `index`, or `None` if out
    /// of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        let flen = self.front.len();
        if index < flen {
            self.front.get(flen - 1 - index)
        } else {
            self.back.get(index - flen)
        }
    }

    /// Replace the element at logical position `index`, returning the old
    /// value, or `None` (leaving the sequence unchanged) if out of bounds.
    pub fn set(&mut self, index: usize, value: T) -> Option<T> {
        let flen = self.front.len();
        let slot = if index < flen {
            self.front.get_mut(flen - 1 - index)
        } else {
            self.back.get_mut(index - flen)
        }?;
        Some(std::mem::replace(slot, value))
    }

    /// Remove the element at logical position `index` by swapping the tail
    /// element into its place, returning the removed element.
    ///
    /// Order is not preserved. This is the deletion pattern used by samplers
    /// that retire candidate points in arbitrary order.
    pub fn swap_remove(&mut self, index: usize) -> Option<T> {
        let last = self.len().checked_sub(1)?;
        if index > last {
            return None;
        }
        if index == last {
            return self.pop_back();
        }
        let tail = self.pop_back()?;
        self.set(index, tail)
    }

    /// Iterate over the elements front to back.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.front.iter().rev().chain(self.back.iter())
    }
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_usage() {
        let mut d = Deque::new();
        d.push_back(1);
        d.push_back(2);
        d.push_back(3);
        assert_eq!(d.len(), 3);
        assert_eq!(d.pop_back(), Some(3));
        assert_eq!(d.pop_back(), Some(2));
        assert_eq!(d.pop_back(), Some(1));
        assert_eq!(d.pop_back(), None);
        assert!(d.is_empty());
    }

    #[test]
    fn test_queue_usage() {
        let mut d = Deque::new();
        d.push_back('a');
        d.push_back('b');
        d.push_back('c');
        assert_eq!(d.pop_front(), Some('a'));
        assert_eq!(d.pop_front(), Some('b'));
        d.push_back('d');
        assert_eq!(d.pop_front(), Some('c'));
        assert_eq!(d.pop_front(), Some('d'));
        assert_eq!(d.pop_front(), None);
    }

    #[test]
    fn test_push_front() {
        let mut d = Deque::new();
        for i in 0..100 {
            d.push_front(i);
        }
        assert_eq!(d.len(), 100);
        for i in (0..100).rev() {
            assert_eq!(d.pop_front(), Some(i));
        }
    }

    #[test]
    fn test_pop_back_after_front_pushes() {
        let mut d = Deque::new();
        for i in 0..7 {
            d.push_front(i);
        }
        // Logical order is 6, 5, ..., 0.
        assert_eq!(d.pop_back(), Some(0));
        assert_eq!(d.pop_back(), Some(1));
        assert_eq!(d.pop_front(), Some(6));
        assert_eq!(d.len(), 4);
        let collected: Vec<_> = d.iter().copied().collect();
        assert_eq!(collected, vec![5, 4, 3, 2]);
    }

    #[test]
    fn test_fifo_storage_stays_bounded() {
        let mut d = Deque::new();
        for i in 0..8 {
            d.push_back(i);
        }
        // A long steady-state queue cycle must not accumulate storage.
        for i in 8..10_000 {
            assert_eq!(d.pop_front(), Some(i - 8));
            d.push_back(i);
        }
        assert_eq!(d.len(), 8);
        // One slot per live element, and no runaway reallocation.
        assert_eq!(d.front.len() + d.back.len(), 8);
        assert!(d.front.capacity() + d.back.capacity() <= 64);

        let drained: Vec<_> = std::iter::from_fn(|| d.pop_front()).collect();
        assert_eq!(drained, (9_992..10_000).collect::<Vec<_>>());
    }

    #[test]
    fn test_get_set() {
        let mut d = Deque::new();
        d.push_back(10);
        d.push_back(20);
        d.push_front(5);
        assert_eq!(d.get(0), Some(&5));
        assert_eq!(d.get(1), Some(&10));
        assert_eq!(d.get(2), Some(&20));
        assert_eq!(d.get(3), None);

        assert_eq!(d.set(1, 15), Some(10));
        assert_eq!(d.get(1), Some(&15));
        assert_eq!(d.set(3, 99), None);
    }

    #[test]
    fn test_swap_remove() {
        let mut d = Deque::new();
        for i in 0..5 {
            d.push_back(i);
        }
        // Removing index 1 swaps the tail (4) into its place.
        assert_eq!(d.swap_remove(1), Some(1));
        assert_eq!(d.len(), 4);
        assert_eq!(d.get(1), Some(&4));
        assert_eq!(d.swap_remove(10), None);

        // Draining by repeated swap_remove(0) visits every element once.
        let mut seen = Vec::new();
        while let Some(v) = d.swap_remove(0) {
            seen.push(v);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_mixed_ends() {
        let mut d = Deque::new();
        d.push_back(2);
        d.push_front(1);
        d.push_back(3);
        d.push_front(0);
        let collected: Vec<_> = d.iter().copied().collect();
        assert_eq!(collected, vec![0, 1, 2, 3]);
        assert_eq!(d.pop_back(), Some(3));
        assert_eq!(d.pop_front(), Some(0));
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut d = Deque::new();
        d.push_back(1);
        d.push_front(0);
        d.clear();
        assert!(d.is_empty());
        assert_eq!(d.pop_front(), None);
        d.push_back(7);
        assert_eq!(d.get(0), Some(&7));
    }
}
