//! The mutable actor state each player drives around the board.

use serde::Deserialize;
use serde::Serialize;

use crate::action::Action;
use crate::action::AccelerationProblem;
use crate::coords::CubeCoordinates;
use crate::coords::CubeDirection;
use crate::field::Field;
use crate::FREE_TURNS_PER_TURN;
use crate::MAX_FREE_TURNS;
use crate::MAX_SPEED;
use crate::MIN_SPEED;

/// Which of the two players a ship belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
pub enum Team {
	One,
	Two,
}

impl Team {
	pub fn opponent(self) -> Self {
		match self {
			Self::One => Self::Two,
			Self::Two => Self::One,
		}
	}
}

/// A player's ship. Value-semantic: a [`crate::state::GameState`] holds the
/// move history, rather than the ship itself, so search code can clone a
/// `Ship` freely without worrying about aliased history.
#[derive(Debug, Clone)]
#[derive(Serialize, Deserialize)]
pub struct Ship {
	pub team: Team,
	pub position: CubeCoordinates,
	pub direction: CubeDirection,
	pub speed: i32,
	pub coal: u32,
	pub passengers: u8,
	/// Free turning steps left this turn, in `0..=2`.
	pub free_turns: u32,
	pub points: u32,
	/// Whether this ship still has its one free acceleration this turn.
	pub free_acc: bool,
	/// Movement points remaining to spend this turn.
	pub movement: i32,
	/// Actions performed so far, one entry per completed Move.
	pub moves: Vec<Vec<Action>>,
	/// Set when an Advance halted on the opponent's field this Move; cleared
	/// by a subsequent Push. If still set at Move end, the Move is rejected.
	pub must_push: bool,
	/// Set when an Advance landed this ship on a Sandbank this Move,
	/// forbidding any further Advance in the same Move.
	pub sandbank_forfeit: bool,
}

impl Ship {
	pub fn new(team: Team, position: CubeCoordinates, direction: CubeDirection) -> Self {
		Self {
			team,
			position,
			direction,
			speed: MIN_SPEED,
			coal: 0,
			passengers: 0,
			free_turns: FREE_TURNS_PER_TURN,
			points: 0,
			free_acc: true,
			movement: MIN_SPEED,
			moves: Vec::new(),
			must_push: false,
			sandbank_forfeit: false,
		}
	}

	/// The maximum additional acceleration this ship can afford, symmetric
	/// for deceleration with a floor of 1 (a ship may never decelerate below
	/// [`MIN_SPEED`]).
	pub fn max_acc(&self) -> i32 {
		let up = MAX_SPEED - self.speed;
		let down = self.speed - MIN_SPEED + self.coal as i32 + i32::from(self.free_acc);
		up.min(down)
	}

	/// `false` while the ship sits on a Sandbank: it may not turn.
	pub fn can_turn(&self, current_field: &Field) -> bool {
		!current_field.is_sandbank()
	}

	/// Checks `diff` against the `[MIN_SPEED, MAX_SPEED]` bounds without
	/// touching `coal` or the Sandbank rule, and returns the resulting speed
	/// on success. Exposed so callers (action validation) can run this part
	/// of the precondition cascade before their own Sandbank check, per
	/// spec.md §4.4's ordering: ZeroAcc, then Above/BelowMaxSpeed, before
	/// OnSandbank.
	pub fn check_speed_bounds(&self, diff: i32) -> Result<i32, AccelerationProblem> {
		if diff == 0 {
			return Err(AccelerationProblem::ZeroAcc);
		}
		let new_speed = self.speed + diff;
		if new_speed > MAX_SPEED {
			return Err(AccelerationProblem::AboveMaxSpeed);
		}
		if new_speed < MIN_SPEED {
			return Err(AccelerationProblem::BelowMinSpeed);
		}
		Ok(new_speed)
	}

	/// Adjusts speed by `diff`, consuming the free acceleration first, then
	/// coal. Mutates in place; callers on an immutable [`crate::state::GameState`]
	/// clone first.
	pub fn accelerate_by(&mut self, diff: i32) -> Result<(), AccelerationProblem> {
		let new_speed = self.check_speed_bounds(diff)?;

		let magnitude = diff.unsigned_abs() as i32;
		let free = i32::from(self.free_acc).min(magnitude);
		let coal_cost = (magnitude - free).max(0);
		if coal_cost as u32 > self.coal {
			return Err(AccelerationProblem::InsufficientCoal);
		}

		self.speed = new_speed;
		if free > 0 {
			self.free_acc = false;
		}
		self.coal -= coal_cost as u32;
		Ok(())
	}

	/// Restores the invariants a freshly deserialized `Ship` must hold:
	/// `movement` is recomputed from `speed` and `free_turns` is clamped to
	/// `0..=MAX_FREE_TURNS`. This is the §9 interpretation of the source's
	/// ambiguous `readResolve` — a post-deserialization invariant check, not
	/// the per-turn reset (see [`crate::state::GameState::advance_turn`]).
	pub fn read_resolve(&mut self) {
		self.movement = self.speed;
		self.free_turns = self.free_turns.min(MAX_FREE_TURNS);
	}
}
