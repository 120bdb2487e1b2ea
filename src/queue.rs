//! Array-backed binary min-heap with explicit sift ops and push/pop
//! instrumentation. Shared by the reverse Dijkstra and the k-extraction
//! frontier; smallest `Ord` value pops first.

use serde::{Deserialize, Serialize};

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapStats { pub pushes: u64, pub pops: u64, pub max_size: u64 }

#[derive(Debug, Clone)]
pub struct MinHeap<T> { data: Vec<T>, stats: HeapStats }

impl<T: Ord> MinHeap<T> {
    #[inline] pub fn with_capacity(cap: usize) -> Self { Self { data: Vec::with_capacity(cap), stats: HeapStats::default() } }
    #[inline] pub fn len(&self) -> usize { self.data.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.data.is_empty() }
    #[inline] pub fn stats(&self) -> HeapStats { self.stats }
    #[inline] pub fn peek(&self) -> Option<&T> { self.data.first() }

    #[inline]
    pub fn push(&mut self, item: T) {
        self.data.push(item);
        self.stats.pushes += 1;
        if self.data.len() as u64 > self.stats.max_size { self.stats.max_size = self.data.len() as u64; }
        self.sift_up(self.data.len() - 1);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let len = self.data.len();
        if len == 0 { return None; }
        self.data.swap(0, len - 1);
        let out = self.data.pop();
        self.stats.pops += 1;
        if !self.data.is_empty() { self.sift_down(0); }
        out
    }

    #[inline]
    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.data[idx] < self.data[parent] { self.data.swap(idx, parent); idx = parent; } else { break; }
        }
    }

    #[inline]
    fn sift_down(&mut self, mut idx: usize) {
        let n = self.data.len();
        loop {
            let left = idx * 2 + 1;
            if left >= n { break; }
            let right = left + 1;
            let mut best = left;
            if right < n && self.data[right] < self.data[left] { best = right; }
            if self.data[best] < self.data[idx] { self.data.swap(idx, best); idx = best; } else { break; }
        }
    }
}
