//! The ordered chain of segments that makes up the river.

use std::collections::HashSet;
use std::collections::VecDeque;

use serde::Deserialize;
use serde::Serialize;

use crate::coords::CubeCoordinates;
use crate::coords::CubeDirection;
use crate::field::Field;
use crate::field::FieldKind;
use crate::segment::Segment;

/// The river: an append-only, ordered chain of segments plus the direction
/// the next (not-yet-revealed) segment will attach in.
#[derive(Debug, Clone)]
#[derive(Serialize, Deserialize)]
pub struct Board {
	segments: Vec<Segment>,
	next_direction: CubeDirection,
}

impl Board {
	pub fn new(segments: Vec<Segment>, next_direction: CubeDirection) -> Self {
		Self {
			segments,
			next_direction,
		}
	}

	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	pub fn next_direction(&self) -> CubeDirection {
		self.next_direction
	}

	pub fn set_next_direction(&mut self, direction: CubeDirection) {
		self.next_direction = direction;
	}

	/// Appends a newly revealed segment to the tail of the river.
	pub fn push_segment(&mut self, segment: Segment) {
		log::trace!("board: revealing segment at {:?}", segment.center());
		self.segments.push(segment);
	}

	/// The field at `c`, scanning segments in order and returning the first
	/// hit. Every global coordinate maps to at most one segment.
	pub fn get(&self, c: CubeCoordinates) -> Option<&Field> {
		self.segments.iter().find_map(|seg| seg.get(c))
	}

	pub fn get_mut(&mut self, c: CubeCoordinates) -> Option<&mut Field> {
		self.segments.iter_mut().find_map(|seg| seg.get_mut(c))
	}

	/// The segment owning `c`, if any.
	pub fn find_segment(&self, c: CubeCoordinates) -> Option<&Segment> {
		self.segments.iter().find(|seg| seg.contains(c))
	}

	/// The index (within `segments()`) of the segment owning `c`.
	pub fn segment_index(&self, c: CubeCoordinates) -> Option<usize> {
		self.segments.iter().position(|seg| seg.contains(c))
	}

	/// The local grid column `c` projects onto within its owning segment.
	pub fn local_column(&self, c: CubeCoordinates) -> Option<i32> {
		self.find_segment(c).and_then(|seg| seg.local_column(c))
	}

	/// `Some(direction)` when `c` lies on a current-bearing field: its
	/// segment's midline row, excluding the segment's ends.
	pub fn get_field_current_direction(&self, c: CubeCoordinates) -> Option<CubeDirection> {
		self.segments
			.iter()
			.find(|seg| seg.current_fields().contains(&c))
			.map(Segment::direction)
	}

	/// The neighboring field in `direction`.
	pub fn neighbor(&self, c: CubeCoordinates, direction: CubeDirection) -> Option<(CubeCoordinates, &Field)> {
		let n = c + direction.vector();
		self.get(n).map(|f| (n, f))
	}

	/// The (up to six) neighboring fields of `c`, in `CubeDirection` ordinal
	/// order, skipping directions that fall off the board.
	pub fn neighbors(&self, c: CubeCoordinates) -> Vec<(CubeCoordinates, &Field)> {
		CubeDirection::all()
			.into_iter()
			.filter_map(|dir| self.neighbor(c, dir))
			.collect()
	}

	/// Breadth-first search from `start` over board-mapped hex neighbors for
	/// fields of the given kind. Returns every tied-minimum-distance
	/// coordinate, in BFS discovery order. Fails soft to an empty `Vec` when
	/// no matching field exists within the board.
	pub fn find_nearest_field_types(&self, start: CubeCoordinates, kind: FieldKind) -> Vec<CubeCoordinates> {
		let mut visited: HashSet<CubeCoordinates> = HashSet::new();
		let mut queue: VecDeque<CubeCoordinates> = VecDeque::new();
		visited.insert(start);
		queue.push_back(start);

		let mut found = Vec::new();
		let mut found_distance: Option<u32> = None;

		while let Some(current) = queue.pop_front() {
			if let Some(distance) = found_distance {
				if current.distance_to(start) > distance {
					break;
				}
			}

			if let Some(field) = self.get(current) {
				if field.kind() == kind {
					let distance = current.distance_to(start);
					if found_distance.is_none() {
						found_distance = Some(distance);
					}
					found.push(current);
				}
			}

			for (next, _) in self.neighbors(current) {
				if visited.insert(next) {
					queue.push_back(next);
				}
			}
		}

		log::trace!("find_nearest_field_types({:?}, {:?}) -> {} hits", start, kind, found.len());
		found
	}

	/// `|segment_index(a) - segment_index(b)|`, panicking if either
	/// coordinate does not map to a segment on this board.
	pub fn segment_distance(&self, a: CubeCoordinates, b: CubeCoordinates) -> usize {
		let ia = self.segment_index(a).expect("a must be on the board");
		let ib = self.segment_index(b).expect("b must be on the board");
		ia.abs_diff(ib)
	}
}
