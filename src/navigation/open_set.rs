//! Frontier of an A* search.
//!
//! A binary min-heap of node indices keyed on `(f_cost, h_cost)` so that ties
//! in `f` are broken toward the node closest to the goal. A position table
//! tracks where each node sits in the heap so membership checks are `O(1)`
//! and a node whose cost improves can be sifted up in place rather than being
//! pushed a second time.
//!
//! ```text
//!              (4,2)
//!            /       \
//!        (4,3)       (6,1)
//!        /   \
//!    (5,5)  (7,0)
//! ```
//!

/// Ordering key of an entry, `(f_cost, h_cost)`
type Key = (i32, i32);

/// Indexed binary min-heap of grid node indices
#[derive(Debug, Clone, Default)]
pub struct OpenSet {
	/// Heap ordered entries of `(key, node index)`
	heap: Vec<(Key, usize)>,
	/// For each node index, where it currently sits in `heap`
	positions: Vec<Option<usize>>,
}

impl OpenSet {
	/// Create an empty [OpenSet] able to hold nodes `0..node_count`
	pub fn new(node_count: usize) -> Self {
		OpenSet {
			heap: Vec::new(),
			positions: vec![None; node_count],
		}
	}
	/// Empty the set and make room for nodes `0..node_count`, reusing allocations
	pub fn reset(&mut self, node_count: usize) {
		self.heap.clear();
		self.positions.clear();
		self.positions.resize(node_count, None);
	}
	pub fn len(&self) -> usize {
		self.heap.len()
	}
	pub fn is_empty(&self) -> bool {
		self.heap.is_empty()
	}
	/// Whether `node` is waiting in the set
	pub fn contains(&self, node: usize) -> bool {
		matches!(self.positions.get(node), Some(Some(_)))
	}
	/// Add `node`, if it is already present its key is lowered instead
	pub fn push(&mut self, node: usize, f_cost: i32, h_cost: i32) {
		if self.contains(node) {
			self.decrease_key(node, f_cost, h_cost);
			return;
		}
		if node >= self.positions.len() {
			self.positions.resize(node + 1, None);
		}
		self.heap.push(((f_cost, h_cost), node));
		let last = self.heap.len() - 1;
		self.positions[node] = Some(last);
		self.sift_up(last);
	}
	/// Remove and return the node with the lowest `f_cost`, lowest `h_cost` on ties
	pub fn pop(&mut self) -> Option<usize> {
		if self.heap.is_empty() {
			return None;
		}
		let last = self.heap.len() - 1;
		self.swap(0, last);
		let (_, node) = self.heap.pop()?;
		self.positions[node] = None;
		if !self.heap.is_empty() {
			self.sift_down(0);
		}
		Some(node)
	}
	/// Lower the key of a node already in the set. A key that is not lower
	/// than the current one is ignored
	pub fn decrease_key(&mut self, node: usize, f_cost: i32, h_cost: i32) {
		let Some(Some(index)) = self.positions.get(node).copied() else {
			return;
		};
		let key = (f_cost, h_cost);
		if key < self.heap[index].0 {
			self.heap[index].0 = key;
			self.sift_up(index);
		}
	}
	/// Move the entry at `index` towards the root until its parent is smaller
	fn sift_up(&mut self, mut index: usize) {
		while index > 0 {
			let parent = (index - 1) / 2;
			if self.heap[index].0 < self.heap[parent].0 {
				self.swap(index, parent);
				index = parent;
			} else {
				break;
			}
		}
	}
	/// Move the entry at `index` towards the leaves until both children are larger
	fn sift_down(&mut self, mut index: usize) {
		let len = self.heap.len();
		loop {
			let left = 2 * index + 1;
			let right = left + 1;
			let mut smallest = index;
			if left < len && self.heap[left].0 < self.heap[smallest].0 {
				smallest = left;
			}
			if right < len && self.heap[right].0 < self.heap[smallest].0 {
				smallest = right;
			}
			if smallest == index {
				break;
			}
			self.swap(index, smallest);
			index = smallest;
		}
	}
	/// Swap two heap slots and keep the position table in step
	fn swap(&mut self, a: usize, b: usize) {
		self.heap.swap(a, b);
		let node_a = self.heap[a].1;
		let node_b = self.heap[b].1;
		self.positions[node_a] = Some(a);
		self.positions[node_b] = Some(b);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn pops_lowest_f() {
		let mut open = OpenSet::new(4);
		open.push(0, 9, 0);
		open.push(1, 3, 0);
		open.push(2, 6, 0);
		open.push(3, 1, 0);
		let order: Vec<usize> = std::iter::from_fn(|| open.pop()).collect();
		assert_eq!(vec![3, 1, 2, 0], order);
	}
	#[test]
	fn ties_break_on_h() {
		let mut open = OpenSet::new(3);
		open.push(0, 5, 4);
		open.push(1, 5, 1);
		open.push(2, 5, 2);
		assert_eq!(Some(1), open.pop());
		assert_eq!(Some(2), open.pop());
		assert_eq!(Some(0), open.pop());
		assert_eq!(None, open.pop());
	}
	#[test]
	fn decrease_key_reorders() {
		let mut open = OpenSet::new(3);
		open.push(0, 4, 0);
		open.push(1, 8, 0);
		open.push(2, 6, 0);
		open.decrease_key(1, 2, 0);
		assert_eq!(Some(1), open.pop());
		assert_eq!(2, open.len());
	}
	#[test]
	fn higher_key_ignored() {
		let mut open = OpenSet::new(2);
		open.push(0, 4, 0);
		open.push(1, 5, 0);
		open.decrease_key(0, 10, 0);
		assert_eq!(Some(0), open.pop());
	}
	#[test]
	fn push_twice_keeps_one_entry() {
		let mut open = OpenSet::new(2);
		open.push(1, 7, 0);
		open.push(1, 3, 0);
		assert_eq!(1, open.len());
		open.push(0, 5, 0);
		assert_eq!(Some(1), open.pop());
	}
	#[test]
	fn contains_tracks_membership() {
		let mut open = OpenSet::new(5);
		open.push(4, 1, 1);
		assert!(open.contains(4));
		assert!(!open.contains(2));
		assert!(!open.contains(99));
		open.pop();
		assert!(!open.contains(4));
	}
	#[test]
	fn many_entries_come_out_sorted() {
		let mut open = OpenSet::new(50);
		for i in 0..50 {
			// scatter the keys
			open.push(i, ((i * 37) % 50) as i32, 0);
		}
		let mut last = i32::MIN;
		while let Some(node) = open.pop() {
			let key = ((node * 37) % 50) as i32;
			assert!(key >= last);
			last = key;
		}
	}
	#[test]
	fn reset_empties() {
		let mut open = OpenSet::new(2);
		open.push(0, 1, 1);
		open.reset(10);
		assert!(open.is_empty());
		assert!(!open.contains(0));
	}
}
