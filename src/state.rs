//! Turn ownership, the move execution pipeline, and point/termination rules.

use serde::Deserialize;
use serde::Serialize;

use crate::action::Action;
use crate::action::AccelerationProblem;
use crate::action::ActionProblem;
use crate::action::AdvanceProblem;
use crate::board::Board;
use crate::coords::CubeDirection;
use crate::field::FieldKind;
use crate::ship::Ship;
use crate::ship::Team;
use crate::FINISH_BONUS_POINTS;
use crate::FINISH_MIN_PASSENGERS;
use crate::FINISH_MIN_SPEED;
use crate::FREE_TURNS_PER_TURN;
use crate::MAX_PASSENGERS;
use crate::POINTS_PER_PASSENGER;
use crate::POINTS_PER_SEGMENT;
use crate::ROUND_LIMIT_TURNS;

/// A split readout of a ship's score, per spec.md §3.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[derive(Serialize, Deserialize)]
pub struct TeamPoints {
	/// Points from segment/field advance.
	pub ship_points: u32,
	/// Points from coal left unspent at game end.
	pub coal_points: u32,
	/// Points for reaching the Goal field under finishing conditions.
	pub finish_points: u32,
}

impl TeamPoints {
	pub fn total(&self) -> u32 {
		self.ship_points + self.coal_points + self.finish_points
	}
}

/// The full game position: the river, both ships, and whose turn it is.
#[derive(Debug, Clone)]
#[derive(Serialize, Deserialize)]
pub struct GameState {
	pub board: Board,
	/// 0-based; even means team One is to move.
	pub turn: u32,
	pub team_one: Ship,
	pub team_two: Ship,
	pub last_move: Option<Vec<Action>>,
}

impl GameState {
	pub fn new(board: Board, team_one: Ship, team_two: Ship) -> Self {
		Self {
			board,
			turn: 0,
			team_one,
			team_two,
			last_move: None,
		}
	}

	pub fn current_team(&self) -> Team {
		if self.turn % 2 == 0 {
			Team::One
		} else {
			Team::Two
		}
	}

	pub fn ship(&self, team: Team) -> &Ship {
		match team {
			Team::One => &self.team_one,
			Team::Two => &self.team_two,
		}
	}

	pub fn ship_mut(&mut self, team: Team) -> &mut Ship {
		match team {
			Team::One => &mut self.team_one,
			Team::Two => &mut self.team_two,
		}
	}

	pub fn current_ship(&self) -> &Ship {
		self.ship(self.current_team())
	}

	pub fn current_ship_mut(&mut self) -> &mut Ship {
		let team = self.current_team();
		self.ship_mut(team)
	}

	pub fn other_ship(&self) -> &Ship {
		self.ship(self.current_team().opponent())
	}

	pub fn other_ship_mut(&mut self) -> &mut Ship {
		let team = self.current_team().opponent();
		self.ship_mut(team)
	}

	/// Validates and applies a full Move: an ordered, atomic sequence of
	/// actions. Returns the resulting state, or the first problem
	/// encountered, in which case no partial state is observable.
	pub fn perform_move(&self, actions: &[Action]) -> Result<Self, ActionProblem> {
		for (index, action) in actions.iter().enumerate() {
			if index > 0 && matches!(action, Action::Accelerate(_)) {
				return Err(AccelerationProblem::MustBeFirstAction.into());
			}
		}

		let mut next = self.clone();
		for action in actions {
			next = action.perform(&next)?;
		}

		if next.current_ship().movement != 0 {
			return Err(AdvanceProblem::MovementPointsMissing.into());
		}
		if next.current_ship().must_push {
			return Err(AdvanceProblem::InsufficientPush.into());
		}

		next.try_pick_up_passenger();

		let team = next.current_team();
		next.ship_mut(team).moves.push(actions.to_vec());
		next.last_move = Some(actions.to_vec());
		next.advance_turn();

		log::debug!("move of {} actions applied for {:?}", actions.len(), team);
		Ok(next)
	}

	/// Boards a waiting passenger if the current ship sits adjacent to a
	/// Passenger field whose facing points back at it, per spec.md §4.5 step 4.
	fn try_pick_up_passenger(&mut self) {
		let team = self.current_team();
		let position = self.ship(team).position;
		if self.ship(team).passengers >= MAX_PASSENGERS {
			return;
		}

		for direction in CubeDirection::all() {
			let neighbor = position + direction.vector();
			let Some(field) = self.board.get_mut(neighbor) else {
				continue;
			};
			let facing_back = direction.rotated_by(3);
			let boarded = match field.passenger_mut() {
				Some(passenger) if passenger.direction == facing_back && passenger.count > 0 => {
					passenger.count -= 1;
					true
				}
				_ => false,
			};
			if boarded {
				self.ship_mut(team).passengers += 1;
				log::trace!("{:?} picked up a passenger at {:?}", team, neighbor);
				return;
			}
		}
	}

	/// Flips turn ownership and resets the now-current ship's per-turn
	/// bookkeeping, applying current displacement at the new turn's start.
	fn advance_turn(&mut self) {
		self.turn += 1;
		let team = self.current_team();

		{
			let ship = self.ship_mut(team);
			ship.free_acc = true;
			ship.free_turns = FREE_TURNS_PER_TURN;
			ship.movement = ship.speed;
			ship.must_push = false;
			ship.sandbank_forfeit = false;
		}

		let position = self.ship(team).position;
		if let Some(direction) = self.board.get_field_current_direction(position) {
			let displaced = position + direction.vector();
			let blocked = self.board.get(displaced).is_some_and(|f| f.is_island());
			if !blocked {
				self.ship_mut(team).position = displaced;
				log::trace!("{:?} displaced by current to {:?}", team, displaced);
			}
		}
	}

	/// `segment_index * POINTS_PER_SEGMENT + column`, the ship's progress
	/// score along the river.
	pub fn ship_advance_points(&self, team: Team) -> u32 {
		let position = self.ship(team).position;
		let segment_index = self.board.segment_index(position).unwrap_or(0) as u32;
		let column = self.board.local_column(position).unwrap_or(0) as u32;
		segment_index * POINTS_PER_SEGMENT + column
	}

	/// The full point breakdown for `team`.
	pub fn calculate_points(&self, team: Team) -> TeamPoints {
		let ship = self.ship(team);
		let position = ship.position;
		let on_goal = self.board.get(position).is_some_and(|f| f.is_goal());
		let finished = on_goal && ship.speed <= FINISH_MIN_SPEED && ship.passengers >= FINISH_MIN_PASSENGERS;

		TeamPoints {
			ship_points: self.ship_advance_points(team),
			coal_points: ship.coal,
			finish_points: ship.passengers as u32 * POINTS_PER_PASSENGER + if finished { FINISH_BONUS_POINTS } else { 0 },
		}
	}

	/// `true` once the game has ended: a ship has finished, the round limit
	/// has elapsed, or the ship to move has no legal Move.
	pub fn is_over(&self) -> bool {
		let finished = [Team::One, Team::Two].into_iter().any(|team| {
			let ship = self.ship(team);
			let on_goal = self.board.get(ship.position).is_some_and(|f| f.is_goal());
			on_goal && ship.speed <= FINISH_MIN_SPEED && ship.passengers >= FINISH_MIN_PASSENGERS
		});
		if finished {
			return true;
		}
		if self.turn >= ROUND_LIMIT_TURNS {
			return true;
		}

		crate::generator::get_simple_moves(self, self.current_ship().coal).is_empty()
	}

	/// Compares total points, tie-breaking on passengers then coal.
	pub fn is_winner(&self, team: Team) -> bool {
		let mine = self.calculate_points(team);
		let theirs = self.calculate_points(team.opponent());
		(mine.total(), self.ship(team).passengers, self.ship(team).coal)
			> (theirs.total(), self.ship(team.opponent()).passengers, self.ship(team.opponent()).coal)
	}

	/// The team with the greater advance score; ties favor `One`, per
	/// spec.md §4.5's turn-ordering tie-break.
	pub fn determine_ahead_team(&self) -> Team {
		if self.ship_advance_points(Team::Two) > self.ship_advance_points(Team::One) {
			Team::Two
		} else {
			Team::One
		}
	}

	pub fn find_nearest(&self, team: Team, kind: FieldKind) -> Vec<crate::coords::CubeCoordinates> {
		self.board.find_nearest_field_types(self.ship(team).position, kind)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::coords::CartesianCoordinate;
	use crate::coords::CubeCoordinates;
	use crate::field::Field;
	use crate::field::Passenger;
	use crate::segment::Segment;
	use crate::SEGMENT_HEIGHT;
	use crate::SEGMENT_WIDTH;

	fn water_board() -> Board {
		let fields = vec![Field::Water; SEGMENT_WIDTH * SEGMENT_HEIGHT];
		let segment = Segment::new(CubeDirection::Right, CubeCoordinates::ORIGIN, fields);
		Board::new(vec![segment], CubeDirection::Right)
	}

	#[test]
	fn game_is_over_when_a_ship_finishes() {
		// Arrange: spec.md §8 scenario 4
		let mut board = water_board();
		let goal = CartesianCoordinate::new(2, 2).to_cube();
		*board.get_mut(goal).unwrap() = Field::Goal;
		let mut one = Ship::new(Team::One, goal, CubeDirection::Right);
		one.speed = 1;
		one.passengers = 2;
		let two = Ship::new(Team::Two, CartesianCoordinate::new(0, 0).to_cube(), CubeDirection::Right);
		let state = GameState::new(board, one, two);

		// Act & Assert
		assert!(state.is_over());
		assert!(state.is_winner(Team::One));
	}

	#[test]
	fn advance_turn_flips_parity_and_resets_bookkeeping() {
		// Arrange
		let board = water_board();
		let mut one = Ship::new(Team::One, CartesianCoordinate::new(0, 2).to_cube(), CubeDirection::Right);
		one.movement = 0;
		let mut two = Ship::new(Team::Two, CartesianCoordinate::new(3, 2).to_cube(), CubeDirection::Right);
		two.free_acc = false;
		let state = GameState::new(board, one, two);

		// Act
		let result = state.perform_move(&[]).unwrap();

		// Assert
		assert_eq!(result.turn, 1);
		assert_eq!(result.current_team(), Team::Two);
		assert!(result.team_two.free_acc);
	}

	#[test]
	fn passenger_is_picked_up_when_facing_correctly() {
		// Arrange
		let mut board = water_board();
		let ship_pos = CartesianCoordinate::new(1, 2).to_cube();
		let passenger_pos = ship_pos + CubeDirection::Right.vector();
		*board.get_mut(passenger_pos).unwrap() = Field::Passenger(Passenger {
			direction: CubeDirection::Left,
			count: 1,
		});
		let mut one = Ship::new(Team::One, ship_pos, CubeDirection::Right);
		one.movement = 0;
		let two = Ship::new(Team::Two, CartesianCoordinate::new(0, 0).to_cube(), CubeDirection::Right);
		let state = GameState::new(board, one, two);

		// Act
		let result = state.perform_move(&[]).unwrap();

		// Assert
		assert_eq!(result.team_one.passengers, 1);
	}

	#[test]
	fn unfulfilled_push_obligation_rejects_the_move() {
		// Arrange
		let board = water_board();
		let pos = CartesianCoordinate::new(0, 2).to_cube();
		let mut one = Ship::new(Team::One, pos, CubeDirection::Right);
		one.must_push = true;
		one.movement = 0;
		let two = Ship::new(Team::Two, CartesianCoordinate::new(2, 0).to_cube(), CubeDirection::Right);
		let state = GameState::new(board, one, two);

		// Act
		let result = state.perform_move(&[]);

		// Assert
		assert_eq!(result, Err(ActionProblem::Advance(AdvanceProblem::InsufficientPush)));
	}

	#[test]
	fn unconsumed_movement_rejects_the_move() {
		// Arrange: spec.md §4.5 step 3 — consumed movement must equal speed
		let board = water_board();
		let pos = CartesianCoordinate::new(0, 2).to_cube();
		let one = Ship::new(Team::One, pos, CubeDirection::Right);
		let two = Ship::new(Team::Two, CartesianCoordinate::new(2, 0).to_cube(), CubeDirection::Right);
		let state = GameState::new(board, one, two);

		// Act: speed 1, no actions spend the one available movement point
		let result = state.perform_move(&[]);

		// Assert
		assert_eq!(result, Err(ActionProblem::Advance(AdvanceProblem::MovementPointsMissing)));
	}

	#[test]
	fn accelerate_must_be_the_first_action() {
		// Arrange: spec.md §4.5 step 3 — Accelerate may only lead a Move
		let board = water_board();
		let pos = CartesianCoordinate::new(0, 2).to_cube();
		let mut one = Ship::new(Team::One, pos, CubeDirection::Right);
		one.coal = 6;
		let two = Ship::new(Team::Two, CartesianCoordinate::new(2, 0).to_cube(), CubeDirection::Right);
		let state = GameState::new(board, one, two);

		// Act
		let result = state.perform_move(&[Action::Advance(1), Action::Accelerate(1)]);

		// Assert
		assert_eq!(result, Err(ActionProblem::Acceleration(AccelerationProblem::MustBeFirstAction)));
	}
}
