//! Enumeration of the legal Move space from a given state, for search.

use crate::action::Action;
use crate::coords::CubeDirection;
use crate::state::GameState;

/// All Moves of at most `rank` actions that spend at most `max_coal` coal,
/// per spec.md §4.6. Candidates are built from the (accel, turn, advance,
/// push) nesting and kept only if they actually replay via
/// [`GameState::perform_move`] — so every returned Move is replay-verified
/// by construction.
pub fn get_actions(state: &GameState, rank: usize, max_coal: u32) -> Vec<Vec<Action>> {
	let ship = state.current_ship();
	let max_acc = ship.max_acc();

	let accel_options: Vec<Option<i32>> = std::iter::once(None)
		.chain((-max_acc..=max_acc).filter(|&d| d != 0).map(Some))
		.collect();
	let turn_options: Vec<Option<CubeDirection>> = std::iter::once(None).chain(CubeDirection::all().into_iter().map(Some)).collect();
	let advance_distances: Vec<i32> = (-2..=6).filter(|&d| d != 0).collect();

	let mut moves = Vec::new();

	for accel in &accel_options {
		for turn in &turn_options {
			for &distance in &advance_distances {
				let mut prefix = Vec::with_capacity(rank);
				if let Some(a) = accel {
					prefix.push(Action::Accelerate(*a));
				}
				if let Some(t) = turn {
					prefix.push(Action::Turn(*t));
				}
				if prefix.len() >= rank {
					continue;
				}
				let mut without_push = prefix.clone();
				without_push.push(Action::Advance(distance));
				try_candidate(state, without_push, max_coal, rank, &mut moves);

				if prefix.len() + 2 <= rank {
					for push_dir in CubeDirection::all() {
						let mut with_push = prefix.clone();
						with_push.push(Action::Advance(distance));
						with_push.push(Action::Push(push_dir));
						try_candidate(state, with_push, max_coal, rank, &mut moves);
					}
				}
			}
		}
	}

	moves
}

/// `get_actions(state, 4, max_coal)`: the full Move length used outside of
/// deliberately truncated search.
pub fn get_simple_moves(state: &GameState, max_coal: u32) -> Vec<Vec<Action>> {
	get_actions(state, 4, max_coal)
}

fn try_candidate(state: &GameState, actions: Vec<Action>, max_coal: u32, rank: usize, out: &mut Vec<Vec<Action>>) {
	if actions.len() > rank || actions.is_empty() {
		return;
	}
	let Ok(result) = state.perform_move(&actions) else {
		return;
	};

	let team = state.current_team();
	let coal_spent = state.ship(team).coal.saturating_sub(result.ship(team).coal);
	if coal_spent > max_coal {
		return;
	}
	if !out.contains(&actions) {
		log::trace!("get_actions: accepted candidate {:?}", actions);
		out.push(actions);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::board::Board;
	use crate::coords::CartesianCoordinate;
	use crate::coords::CubeCoordinates;
	use crate::field::Field;
	use crate::segment::Segment;
	use crate::ship::Ship;
	use crate::ship::Team;
	use crate::SEGMENT_HEIGHT;
	use crate::SEGMENT_WIDTH;

	fn canonical_state() -> GameState {
		let fields = vec![Field::Water; SEGMENT_WIDTH * SEGMENT_HEIGHT];
		let segment = Segment::new(CubeDirection::Right, CubeCoordinates::ORIGIN, fields);
		let board = Board::new(vec![segment], CubeDirection::Right);
		let one = Ship::new(Team::One, CartesianCoordinate::new(0, 2).to_cube(), CubeDirection::Right);
		let two = Ship::new(Team::Two, CartesianCoordinate::new(2, 2).to_cube(), CubeDirection::Right);
		GameState::new(board, one, two)
	}

	#[test]
	fn simple_moves_are_all_replayable_and_deduplicated() {
		// Arrange: spec.md §8 scenario 6
		let state = canonical_state();

		// Act
		let moves = get_simple_moves(&state, 1);

		// Assert
		assert!(!moves.is_empty());
		let mover = state.current_team();
		for actions in &moves {
			let result = state.perform_move(actions);
			assert!(result.is_ok(), "generated move {:?} failed to replay", actions);
			let result = result.unwrap();
			assert_eq!(
				result.ship(mover).movement,
				0,
				"generated move {:?} left movement unconsumed",
				actions
			);
		}
		let mut seen = std::collections::HashSet::new();
		for actions in &moves {
			assert!(seen.insert(format!("{:?}", actions)), "duplicate move {:?}", actions);
		}
	}

	#[test]
	fn get_actions_never_exceeds_the_requested_rank() {
		// Arrange
		let state = canonical_state();

		// Act
		let moves = get_actions(&state, 2, 6);

		// Assert
		assert!(moves.iter().all(|m| m.len() <= 2));
	}
}
