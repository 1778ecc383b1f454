//! Oriented 4x5 patches of river that chain together into a [`crate::board::Board`].

use serde::Deserialize;
use serde::Serialize;

use crate::coords::CartesianCoordinate;
use crate::coords::CubeCoordinates;
use crate::coords::CubeDirection;
use crate::field::Field;
use crate::SEGMENT_HEIGHT;
use crate::SEGMENT_WIDTH;

/// The local-grid cell that maps to cube-coordinate `(0, 0, 0)` before
/// rotation/translation: one column left of center, on the midline row.
/// Placing it here means `tip()` (two steps forward) lands on the last
/// column, the far edge, matching the "forward edge midpoint" reading of
/// spec.md's `tip()`.
fn local_origin() -> CartesianCoordinate {
	CartesianCoordinate::new(1, (SEGMENT_HEIGHT / 2) as i32)
}

/// An oriented rectangular patch of the river.
#[derive(Debug, Clone)]
#[derive(Serialize, Deserialize)]
pub struct Segment {
	/// The segment's forward axis.
	direction: CubeDirection,
	/// Global cube coordinates of the segment's logical center.
	center: CubeCoordinates,
	/// Local field grid, row-major: index `y * SEGMENT_WIDTH + x`.
	fields: Vec<Field>,
	/// Precomputed `Right.turn_count_to(direction)`: the rotation applied
	/// when mapping local coordinates to global ones. Computed once here
	/// rather than on every lookup, per spec.md §9.
	rotation_steps: i32,
}

impl Segment {
	/// Creates a new segment. `fields` must have exactly
	/// `SEGMENT_WIDTH * SEGMENT_HEIGHT` entries in row-major order.
	pub fn new(direction: CubeDirection, center: CubeCoordinates, fields: Vec<Field>) -> Self {
		assert_eq!(
			fields.len(),
			SEGMENT_WIDTH * SEGMENT_HEIGHT,
			"segment field grid has the wrong size"
		);
		let rotation_steps = CubeDirection::Right.turn_count_to(direction);
		Self {
			direction,
			center,
			fields,
			rotation_steps,
		}
	}

	pub fn direction(&self) -> CubeDirection {
		self.direction
	}

	pub fn center(&self) -> CubeCoordinates {
		self.center
	}

	/// The forward edge midpoint, the anchor the next segment attaches to.
	pub fn tip(&self) -> CubeCoordinates {
		self.center + self.direction.vector() * 2
	}

	/// The row index shared by every current-bearing field in this segment.
	pub fn midline_row(&self) -> i32 {
		(SEGMENT_HEIGHT / 2) as i32
	}

	fn local_origin_cube() -> CubeCoordinates {
		local_origin().to_cube()
	}

	/// Maps a local cartesian grid cell to its global cube coordinate.
	fn local_to_global(&self, cart: CartesianCoordinate) -> CubeCoordinates {
		let local = cart.to_cube() - Self::local_origin_cube();
		self.center + local.rotated_by(self.rotation_steps)
	}

	/// Maps a global cube coordinate to the local cartesian grid cell it
	/// would occupy in this segment (regardless of whether it is in range).
	fn global_to_local(&self, global: CubeCoordinates) -> CartesianCoordinate {
		let local = (global - self.center).rotated_by(-self.rotation_steps);
		CartesianCoordinate::from_cube(Self::local_origin_cube() + local)
	}

	/// `true` when `global` falls within this segment's 4x5 grid.
	pub fn contains(&self, global: CubeCoordinates) -> bool {
		self.global_to_local(global).to_index().is_some()
	}

	/// The local grid column (`0..SEGMENT_WIDTH`) `global` projects onto,
	/// i.e. how far along this segment's forward axis it lies. Used for
	/// point scoring, which ranks ships by progress within a segment.
	pub fn local_column(&self, global: CubeCoordinates) -> Option<i32> {
		let local = self.global_to_local(global);
		(local.x >= 0 && (local.x as usize) < SEGMENT_WIDTH).then_some(local.x)
	}

	/// The field at `global`, if it falls within this segment.
	pub fn get(&self, global: CubeCoordinates) -> Option<&Field> {
		let idx = self.global_to_local(global).to_index()?;
		self.fields.get(idx)
	}

	pub fn get_mut(&mut self, global: CubeCoordinates) -> Option<&mut Field> {
		let idx = self.global_to_local(global).to_index()?;
		self.fields.get_mut(idx)
	}

	/// Iterates over every `(global coordinate, field)` pair in this segment.
	pub fn iter(&self) -> impl Iterator<Item = (CubeCoordinates, &Field)> {
		(0..self.fields.len()).map(move |idx| {
			let cart = CartesianCoordinate::from_index(idx).expect("index within grid bounds");
			(self.local_to_global(cart), &self.fields[idx])
		})
	}

	/// The global coordinates of every field on this segment's midline row,
	/// excluding the first and last column (the segment's ends) — the fields
	/// that carry current, per spec.md §4.2.
	pub fn current_fields(&self) -> Vec<CubeCoordinates> {
		let row = self.midline_row();
		(1..SEGMENT_WIDTH as i32 - 1)
			.map(|x| self.local_to_global(CartesianCoordinate::new(x, row)))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn flat_segment(direction: CubeDirection, center: CubeCoordinates) -> Segment {
		Segment::new(direction, center, vec![Field::Water; SEGMENT_WIDTH * SEGMENT_HEIGHT])
	}

	#[test]
	fn local_global_round_trips() {
		for direction in CubeDirection::all() {
			let seg = flat_segment(direction, CubeCoordinates::from_axial(2, -1));
			for y in 0..SEGMENT_HEIGHT as i32 {
				for x in 0..SEGMENT_WIDTH as i32 {
					let cart = CartesianCoordinate::new(x, y);
					let global = seg.local_to_global(cart);
					let back = seg.global_to_local(global);
					assert_eq!(back, cart, "round trip failed for direction {:?}", direction);
				}
			}
		}
	}

	#[test]
	fn tip_is_two_steps_from_center_along_direction() {
		// Arrange
		let center = CubeCoordinates::ORIGIN;
		let seg = flat_segment(CubeDirection::Right, center);

		// Act
		let tip = seg.tip();

		// Assert
		assert_eq!(tip, center + CubeDirection::Right.vector() * 2);
	}

	#[test]
	fn contains_is_false_outside_grid() {
		// Arrange
		let seg = flat_segment(CubeDirection::Right, CubeCoordinates::ORIGIN);

		// Act & Assert
		assert!(!seg.contains(CubeCoordinates::from_axial(100, 100)));
	}

	#[test]
	fn current_fields_excludes_end_columns() {
		// Arrange
		let seg = flat_segment(CubeDirection::Right, CubeCoordinates::ORIGIN);

		// Act
		let current = seg.current_fields();

		// Assert
		assert_eq!(current.len(), SEGMENT_WIDTH - 2);
	}
}
