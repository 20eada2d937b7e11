// Copyright 2025 Lars Brubaker
// License: Boost Software License 1.0
//
// Vec-backed slot arena with a free list. Output vertices live here during an
// execute call and are dropped in bulk with `clear`.

use std::ops::{Index, IndexMut};

pub const INVALID: u32 = u32::MAX;

pub struct Arena<T> {
    items: Vec<Option<T>>,
    free_list: Vec<u32>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store `value`, returning its index.
    pub fn alloc(&mut self, value: T) -> u32 {
        if let Some(idx) = self.free_list.pop() {
            self.items[idx as usize] = Some(value);
            idx
        } else {
            let idx = self.items.len() as u32;
            self.items.push(Some(value));
            idx
        }
    }

    /// Return a slot to the free list.
    pub fn free(&mut self, idx: u32) {
        if let Some(slot) = self.items.get_mut(idx as usize) {
            if slot.take().is_some() {
                self.free_list.push(idx);
            }
        }
    }

    pub fn get(&self, idx: u32) -> Option<&T> {
        self.items.get(idx as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, idx: u32) -> Option<&mut T> {
        self.items.get_mut(idx as usize)?.as_mut()
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.items.len() - self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.free_list.clear();
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<u32> for Arena<T> {
    type Output = T;
    #[inline]
    fn index(&self, idx: u32) -> &T {
        match self.items[idx as usize] {
            Some(ref v) => v,
            None => panic!("arena slot {} is free", idx),
        }
    }
}

impl<T> IndexMut<u32> for Arena<T> {
    #[inline]
    fn index_mut(&mut self, idx: u32) -> &mut T {
        match self.items[idx as usize] {
            Some(ref mut v) => v,
            None => panic!("arena slot {} is free", idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_free() {
        let mut a: Arena<u32> = Arena::new();
        let x = a.alloc(1);
        let y = a.alloc(2);
        assert_ne!(x, y);
        a.free(x);
        let z = a.alloc(3);
        // z should reuse x's slot
        assert_eq!(z, x);
        assert_eq!(a[z], 3);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn get_after_free_returns_none() {
        let mut a: Arena<i32> = Arena::new();
        let idx = a.alloc(5);
        a.free(idx);
        a.free(idx);
        assert!(a.get(idx).is_none());
        assert!(a.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let mut a: Arena<i32> = Arena::new();
        a.alloc(1);
        a.alloc(2);
        a.clear();
        assert!(a.is_empty());
        assert!(a.get(0).is_none());
    }
}
