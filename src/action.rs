//! The four action variants a Move sequences, and their rejection taxonomies.

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::coords::CubeDirection;
use crate::state::GameState;

/// One step of a Move. A Move is an ordered sequence of these, applied
/// left-to-right and atomic on success (spec.md §4.4, §5).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub enum Action {
	Accelerate(i32),
	Turn(CubeDirection),
	Advance(i32),
	Push(CubeDirection),
}

/// Rejection taxonomy for [`Action::Accelerate`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[derive(Error)]
pub enum AccelerationProblem {
	#[error("acceleration of zero is not a valid action")]
	ZeroAcc,
	#[error("acceleration would raise speed above the maximum")]
	AboveMaxSpeed,
	#[error("deceleration would lower speed below the minimum")]
	BelowMinSpeed,
	#[error("not enough coal to pay for this acceleration")]
	InsufficientCoal,
	#[error("a ship on a sandbank may not accelerate")]
	OnSandbank,
	#[error("accelerate may only be the first action in a move")]
	MustBeFirstAction,
}

/// Rejection taxonomy for [`Action::Turn`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[derive(Error)]
pub enum TurnProblem {
	#[error("a ship on a sandbank may not rotate")]
	RotationOnSandbankNotAllowed,
	#[error("not enough coal to pay for this rotation")]
	NotEnoughCoalForRotation,
	#[error("cannot rotate: the ship's current field does not exist")]
	RotationOnNonExistingField,
}

/// Rejection taxonomy for [`Action::Advance`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[derive(Error)]
pub enum AdvanceProblem {
	#[error("not enough movement points left for this advance")]
	MovementPointsMissing,
	#[error("the opponent was not pushed after the advance ended on their field")]
	InsufficientPush,
	#[error("the requested distance is not a valid advance")]
	InvalidDistance,
	#[error("the advance's final step would land exactly on the opponent's ship")]
	ShipAlreadyInTarget,
	#[error("a field along the path is blocked")]
	FieldIsBlocked,
	#[error("the ship already ended its move on a sandbank and may not advance again")]
	MoveEndOnSandbank,
}

/// Rejection taxonomy for [`Action::Push`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[derive(Error)]
pub enum PushProblem {
	#[error("not enough movement points left to push")]
	MovementPointsMissing,
	#[error("there is no opponent ship on this field to push")]
	SameFieldPush,
	#[error("the push target field does not exist")]
	InvalidFieldPush,
	#[error("the push target field is blocked")]
	BlockedFieldPush,
	#[error("a ship on a sandbank may not push")]
	SandbankPush,
	#[error("may not push directly backward relative to the pusher's heading")]
	BackwardPushingRestricted,
}

/// The rejection an [`Action::perform`] or [`GameState::perform_move`] call
/// can return: the four per-action taxonomies, uniformly wrapped.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[derive(Error)]
pub enum ActionProblem {
	#[error(transparent)]
	Acceleration(#[from] AccelerationProblem),
	#[error(transparent)]
	Turn(#[from] TurnProblem),
	#[error(transparent)]
	Advance(#[from] AdvanceProblem),
	#[error(transparent)]
	Push(#[from] PushProblem),
}

impl Action {
	/// Applies this action to `state`, returning the resulting state or the
	/// typed reason the action could not be performed. `state` is not
	/// mutated; a new value is returned.
	pub fn perform(&self, state: &GameState) -> Result<GameState, ActionProblem> {
		match *self {
			Self::Accelerate(acc) => perform_accelerate(acc, state),
			Self::Turn(direction) => perform_turn(direction, state),
			Self::Advance(distance) => perform_advance(distance, state),
			Self::Push(direction) => perform_push(direction, state),
		}
	}
}

fn perform_accelerate(acc: i32, state: &GameState) -> Result<GameState, ActionProblem> {
	let mut next = state.clone();
	let ship = next.current_ship_mut();

	// spec.md §4.4 precondition cascade: ZeroAcc / Above-BelowMaxSpeed before OnSandbank.
	ship.check_speed_bounds(acc)?;

	let current_field = state
		.board
		.get(ship.position)
		.expect("a ship always stands on an existing field");
	if current_field.is_sandbank() {
		return Err(AccelerationProblem::OnSandbank.into());
	}

	ship.accelerate_by(acc)?;
	ship.movement += acc;
	log::trace!("accelerate({acc}) applied, new speed {}", ship.speed);
	Ok(next)
}

fn perform_turn(direction: CubeDirection, state: &GameState) -> Result<GameState, ActionProblem> {
	let mut next = state.clone();
	let ship = next.current_ship_mut();

	let current_field = state.board.get(ship.position).ok_or(TurnProblem::RotationOnNonExistingField)?;
	if !ship.can_turn(current_field) {
		return Err(TurnProblem::RotationOnSandbankNotAllowed.into());
	}

	let turns = ship.direction.turn_count_to(direction);
	let magnitude = turns.unsigned_abs();
	let free_used = magnitude.min(ship.free_turns);
	let coal_cost = magnitude - free_used;
	if coal_cost > ship.coal {
		return Err(TurnProblem::NotEnoughCoalForRotation.into());
	}

	ship.direction = direction;
	ship.free_turns -= free_used;
	ship.coal -= coal_cost;
	log::trace!("turn to {:?} applied, {coal_cost} coal spent", direction);
	Ok(next)
}

fn perform_push(direction: CubeDirection, state: &GameState) -> Result<GameState, ActionProblem> {
	let mut next = state.clone();
	let position = next.current_ship().position;
	let heading = next.current_ship().direction;

	if next.other_ship().position != position {
		return Err(PushProblem::SameFieldPush.into());
	}
	if next.current_ship().movement < 1 {
		return Err(PushProblem::MovementPointsMissing.into());
	}
	if direction == heading.rotated_by(3) {
		return Err(PushProblem::BackwardPushingRestricted.into());
	}
	let current_field = next.board.get(position).expect("ship stands on an existing field");
	if current_field.is_sandbank() {
		return Err(PushProblem::SandbankPush.into());
	}

	let target = position + direction.vector();
	let target_field = next.board.get(target).ok_or(PushProblem::InvalidFieldPush)?;
	if target_field.is_island() {
		return Err(PushProblem::BlockedFieldPush.into());
	}
	let lands_on_sandbank = target_field.is_sandbank();

	{
		let opponent = next.other_ship_mut();
		opponent.position = target;
		if lands_on_sandbank {
			opponent.speed = 1;
			opponent.free_turns = 1;
		}
	}

	let ship = next.current_ship_mut();
	ship.movement -= 1;
	ship.must_push = false;

	log::trace!("push to {:?} applied", direction);
	Ok(next)
}

fn perform_advance(distance: i32, state: &GameState) -> Result<GameState, ActionProblem> {
	if distance == 0 {
		return Err(AdvanceProblem::InvalidDistance.into());
	}

	let mut next = state.clone();
	let ship_start = next.current_ship().clone();

	if ship_start.sandbank_forfeit {
		return Err(AdvanceProblem::MoveEndOnSandbank.into());
	}

	let start_field = next.board.get(ship_start.position).expect("ship stands on an existing field");
	let on_sandbank = start_field.is_sandbank();

	if distance < 0 {
		if !on_sandbank || distance != -1 {
			return Err(AdvanceProblem::InvalidDistance.into());
		}
	} else if on_sandbank && distance > 2 {
		return Err(AdvanceProblem::InvalidDistance.into());
	}

	let step_sign = distance.signum();
	let steps = distance.unsigned_abs();
	let opponent_position = next.other_ship().position;

	let mut position = ship_start.position;
	let mut movement_left = ship_start.movement;
	let mut halted_on_opponent = false;
	let mut ended_on_sandbank = false;

	for step in 1..=steps {
		let candidate = position + ship_start.direction.vector() * step_sign;
		let field = next
			.board
			.get(candidate)
			.ok_or(AdvanceProblem::FieldIsBlocked)?;
		if field.is_island() {
			return Err(AdvanceProblem::FieldIsBlocked.into());
		}

		let current_direction = next.board.get_field_current_direction(candidate);
		let motion_direction = if step_sign >= 0 {
			ship_start.direction
		} else {
			ship_start.direction.rotated_by(3)
		};
		let against_current = current_direction == Some(motion_direction.rotated_by(3));
		let cost = 1 + i32::from(against_current);

		if movement_left < cost {
			return Err(AdvanceProblem::MovementPointsMissing.into());
		}
		movement_left -= cost;
		position = candidate;

		if candidate == opponent_position {
			if step == steps {
				return Err(AdvanceProblem::ShipAlreadyInTarget.into());
			}
			halted_on_opponent = true;
			break;
		}
		if field.is_sandbank() {
			ended_on_sandbank = true;
			break;
		}
	}

	let ship = next.current_ship_mut();
	ship.position = position;
	if ended_on_sandbank {
		ship.movement = 0;
		ship.speed = 1;
		ship.sandbank_forfeit = true;
	} else {
		ship.movement = movement_left;
	}
	if halted_on_opponent {
		ship.must_push = true;
	}

	log::trace!("advance({distance}) applied, new position {:?}", position);
	Ok(next)
}
