//! Cube-coordinate hex algebra and the six board-facing directions.

use enum_map::Enum;
use serde::Deserialize;
use serde::Serialize;
use strum::EnumIter;

use crate::SEGMENT_HEIGHT;
use crate::SEGMENT_WIDTH;

/// A hex position in cube coordinates.
///
/// Invariant: `q + r + s == 0` always holds. `s` is kept explicit (rather than
/// derived on every access) because it is cheap to maintain at construction
/// and makes [`CubeCoordinates::rotated_by`] a pure permutation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[derive(Serialize, Deserialize)]
pub struct CubeCoordinates {
	pub q: i32,
	pub r: i32,
	pub s: i32,
}

impl CubeCoordinates {
	/// Creates a new cube coordinate. Panics if `q + r + s != 0`.
	pub fn new(q: i32, r: i32, s: i32) -> Self {
		debug_assert_eq!(q + r + s, 0, "cube coordinate invariant violated");
		Self {
			q,
			r,
			s,
		}
	}

	/// Creates a cube coordinate from just `q` and `r`, deriving `s`.
	pub fn from_axial(q: i32, r: i32) -> Self {
		Self {
			q,
			r,
			s: -q - r,
		}
	}

	pub const ORIGIN: Self = Self {
		q: 0,
		r: 0,
		s: 0,
	};

	/// Manhattan distance between two hexes.
	pub fn distance_to(self, other: Self) -> u32 {
		let d = self - other;
		((d.q.abs() + d.r.abs() + d.s.abs()) / 2) as u32
	}

	/// Rotates this coordinate by `n` clockwise 60° steps (negative = counter
	/// clockwise), per spec.md §4.1: each step is `(q, r, s) -> (-r, -s, -q)`.
	pub fn rotated_by(self, n: i32) -> Self {
		let steps = n.rem_euclid(6);
		let mut c = self;
		for _ in 0..steps {
			c = Self {
				q: -c.r,
				r: -c.s,
				s: -c.q,
			};
		}
		c
	}
}

impl std::ops::Add for CubeCoordinates {
	type Output = Self;

	fn add(self, rhs: Self) -> Self::Output {
		Self {
			q: self.q + rhs.q,
			r: self.r + rhs.r,
			s: self.s + rhs.s,
		}
	}
}

impl std::ops::Sub for CubeCoordinates {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self::Output {
		Self {
			q: self.q - rhs.q,
			r: self.r - rhs.r,
			s: self.s - rhs.s,
		}
	}
}

impl std::ops::Neg for CubeCoordinates {
	type Output = Self;

	fn neg(self) -> Self::Output {
		Self {
			q: -self.q,
			r: -self.r,
			s: -self.s,
		}
	}
}

impl std::ops::Mul<i32> for CubeCoordinates {
	type Output = Self;

	fn mul(self, rhs: i32) -> Self::Output {
		Self {
			q: self.q * rhs,
			r: self.r * rhs,
			s: self.s * rhs,
		}
	}
}

/// An offset coordinate used for segment-local indexing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[derive(Serialize, Deserialize)]
pub struct CartesianCoordinate {
	pub x: i32,
	pub y: i32,
}

impl CartesianCoordinate {
	pub fn new(x: i32, y: i32) -> Self {
		Self {
			x,
			y,
		}
	}

	/// Converts to the equivalent axial cube coordinate.
	pub fn to_cube(self) -> CubeCoordinates {
		let q = self.x - (self.y - (self.y & 1)) / 2;
		let r = self.y;
		CubeCoordinates::from_axial(q, r)
	}

	/// Converts a cube coordinate back to cartesian.
	pub fn from_cube(c: CubeCoordinates) -> Self {
		let x = c.q + (c.r - (c.r & 1)) / 2;
		let y = c.r;
		Self {
			x,
			y,
		}
	}

	/// Packs `(x, y)` into a row-major index within a [`SEGMENT_WIDTH`] x
	/// [`SEGMENT_HEIGHT`] segment, or `None` if out of range.
	pub fn to_index(self) -> Option<usize> {
		if self.x < 0 || self.y < 0 {
			return None;
		}
		let (x, y) = (self.x as usize, self.y as usize);
		if x >= SEGMENT_WIDTH || y >= SEGMENT_HEIGHT {
			return None;
		}
		Some(y * SEGMENT_WIDTH + x)
	}

	/// Inverse of [`to_index`](Self::to_index).
	pub fn from_index(index: usize) -> Option<Self> {
		if index >= SEGMENT_WIDTH * SEGMENT_HEIGHT {
			return None;
		}
		Some(Self {
			x: (index % SEGMENT_WIDTH) as i32,
			y: (index / SEGMENT_WIDTH) as i32,
		})
	}
}

/// One of the six directions a ship can face, ordered clockwise starting at
/// `Right`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[derive(EnumIter)]
#[derive(Enum)]
pub enum CubeDirection {
	Right,
	DownRight,
	DownLeft,
	Left,
	UpLeft,
	UpRight,
}

impl CubeDirection {
	/// All six directions in ordinal order.
	pub const fn all() -> [CubeDirection; 6] {
		[
			Self::Right,
			Self::DownRight,
			Self::DownLeft,
			Self::Left,
			Self::UpLeft,
			Self::UpRight,
		]
	}

	fn ordinal(self) -> i32 {
		match self {
			Self::Right => 0,
			Self::DownRight => 1,
			Self::DownLeft => 2,
			Self::Left => 3,
			Self::UpLeft => 4,
			Self::UpRight => 5,
		}
	}

	fn from_ordinal(n: i32) -> Self {
		match n.rem_euclid(6) {
			0 => Self::Right,
			1 => Self::DownRight,
			2 => Self::DownLeft,
			3 => Self::Left,
			4 => Self::UpLeft,
			5 => Self::UpRight,
			_ => unreachable!(),
		}
	}

	/// The unit cube vector this direction points towards.
	pub const fn vector(self) -> CubeCoordinates {
		match self {
			Self::Right => CubeCoordinates { q: 1, r: 0, s: -1 },
			Self::DownRight => CubeCoordinates { q: 0, r: 1, s: -1 },
			Self::DownLeft => CubeCoordinates { q: -1, r: 1, s: 0 },
			Self::Left => CubeCoordinates { q: -1, r: 0, s: 1 },
			Self::UpLeft => CubeCoordinates { q: 0, r: -1, s: 1 },
			Self::UpRight => CubeCoordinates { q: 1, r: -1, s: 0 },
		}
	}

	/// Rotates this direction by `n` clockwise 60° steps.
	pub fn rotated_by(self, n: i32) -> Self {
		Self::from_ordinal(self.ordinal() + n)
	}

	/// The direction one step clockwise.
	pub fn clockwise(self) -> Self {
		self.rotated_by(1)
	}

	/// The direction one step counter clockwise.
	pub fn counter_clockwise(self) -> Self {
		self.rotated_by(-1)
	}

	/// The signed minimal turn count in `[-3, 3]` to reach `target`, with
	/// ties broken towards the negative (counterclockwise) direction.
	pub fn turn_count_to(self, target: Self) -> i32 {
		let diff = (target.ordinal() - self.ordinal()).rem_euclid(6);
		if diff > 3 {
			diff - 6
		} else if diff == 3 {
			-3
		} else {
			diff
		}
	}

	/// `[counter_clockwise, self, clockwise]`.
	pub fn with_neighbors(self) -> [Self; 3] {
		[self.rotated_by(-1), self, self.rotated_by(1)]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cube_coordinates_always_sum_to_zero() {
		// Arrange
		let a = CubeCoordinates::from_axial(3, -2);

		// Act
		let sum = a.q + a.r + a.s;

		// Assert
		assert_eq!(sum, 0);
	}

	#[test]
	fn rotation_is_cyclic() {
		// Arrange
		let d = CubeDirection::Right;

		// Act
		let back = d.rotated_by(4).rotated_by(-4);

		// Assert
		assert_eq!(back, d);
	}

	#[test]
	fn rotated_by_six_is_identity() {
		for d in CubeDirection::all() {
			assert_eq!(d.rotated_by(6), d);
		}
	}

	#[test]
	fn turn_count_to_reaches_target() {
		for a in CubeDirection::all() {
			for b in CubeDirection::all() {
				let d = a.turn_count_to(b);
				assert!((-3..=3).contains(&d));
				assert_eq!(a.rotated_by(d), b);
			}
		}
	}

	#[test]
	fn turn_count_to_opposite_prefers_negative() {
		// Arrange
		let d = CubeDirection::Right;

		// Act
		let turns = d.turn_count_to(CubeDirection::Left);

		// Assert
		assert_eq!(turns, -3);
	}

	#[test]
	fn distance_is_symmetric() {
		// Arrange
		let a = CubeCoordinates::from_axial(1, -3);
		let b = CubeCoordinates::from_axial(-2, 4);

		// Act & Assert
		assert_eq!(a.distance_to(b), b.distance_to(a));
	}

	#[test]
	fn distance_satisfies_triangle_inequality() {
		// Arrange
		let a = CubeCoordinates::from_axial(0, 0);
		let b = CubeCoordinates::from_axial(2, -1);
		let c = CubeCoordinates::from_axial(-1, 3);

		// Act & Assert
		assert!(a.distance_to(c) <= a.distance_to(b) + b.distance_to(c));
	}

	#[test]
	fn cartesian_index_round_trips() {
		for y in 0..SEGMENT_HEIGHT {
			for x in 0..SEGMENT_WIDTH {
				let c = CartesianCoordinate::new(x as i32, y as i32);
				let idx = c.to_index().unwrap();
				assert_eq!(CartesianCoordinate::from_index(idx).unwrap(), c);
			}
		}
	}

	#[test]
	fn cartesian_to_index_out_of_range_is_none() {
		assert_eq!(CartesianCoordinate::new(-1, 0).to_index(), None);
		assert_eq!(CartesianCoordinate::new(0, -1).to_index(), None);
		assert_eq!(CartesianCoordinate::new(SEGMENT_WIDTH as i32, 0).to_index(), None);
	}

	#[test]
	fn cartesian_cube_round_trips() {
		// Arrange
		let c = CartesianCoordinate::new(2, 3);

		// Act
		let cube = c.to_cube();
		let back = CartesianCoordinate::from_cube(cube);

		// Assert
		assert_eq!(back, c);
	}
}
