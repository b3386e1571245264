use std::collections::VecDeque;

use crate::infra::{Command, Heading, Position};

/// Convert a coordinate path into motion commands.
///
/// The agent commits to one acceleration (forward or reverse) per sequence
/// and only changes direction by turning at pivot cells. While reversing,
/// a turn leaves the agent facing away from the direction it now travels.
/// Every sequence ends with a brake.
pub fn command_sequence(path: &[Position], heading: Heading) -> VecDeque<Command> {
    let mut commands = VecDeque::with_capacity(path.len() + 1);
    let mut heading = heading;
    let mut accelerating = false;
    let mut face_forward = false;

    for hop in path.windows(2) {
        match Heading::between(hop[0], hop[1]) {
            Some(direction) if direction == heading && !accelerating => {
                commands.push_back(Command::Forward);
                accelerating = true;
                face_forward = true;
            }
            Some(direction) if direction == heading.opposite() && !accelerating => {
                commands.push_back(Command::Reverse);
                accelerating = true;
            }
            Some(direction) if direction == heading.right() || direction == heading.left() => {
                let turn = if direction == heading.right() {
                    Command::TurnRight
                } else {
                    Command::TurnLeft
                };
                commands.push_back(turn);
                heading = if face_forward {
                    direction
                } else {
                    direction.opposite()
                };
            }
            _ if accelerating => commands.push_back(Command::Idle),
            _ => {}
        }
    }

    commands.push_back(Command::Brake);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use Command::*;

    fn path(cells: &[(i32, i32)]) -> Vec<Position> {
        cells.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    #[test]
    fn test_no_movement_is_just_brake() {
        let commands = command_sequence(&path(&[(3, 3)]), Heading::West);
        assert_eq!(commands, [Brake]);
        assert_eq!(command_sequence(&[], Heading::West), [Brake]);
    }

    #[test]
    fn test_straight_run_accelerates_once() {
        let commands = command_sequence(&path(&[(0, 0), (0, 1), (0, 2), (0, 3)]), Heading::North);
        assert_eq!(commands, [Forward, Idle, Idle, Brake]);
    }

    #[test]
    fn test_reverse_run() {
        let commands = command_sequence(&path(&[(3, 0), (2, 0), (1, 0)]), Heading::East);
        assert_eq!(commands, [Reverse, Idle, Brake]);
    }

    #[test]
    fn test_forward_turns_follow_path_direction() {
        let commands = command_sequence(
            &path(&[(0, 0), (1, 0), (1, 1), (1, 2), (0, 2)]),
            Heading::East,
        );
        assert_eq!(commands, [Forward, TurnLeft, Idle, TurnLeft, Brake]);
    }

    #[test]
    fn test_reversing_turn_flips_resulting_heading() {
        // Backing west then south: the right turn leaves the agent facing north,
        // so continuing south is a straight reverse run
        let commands = command_sequence(&path(&[(2, 2), (1, 2), (1, 1), (1, 0)]), Heading::East);
        assert_eq!(commands, [Reverse, TurnRight, Idle, Brake]);

        // Another hop west from facing north is a left turn, now facing east
        let commands = command_sequence(
            &path(&[(2, 2), (1, 2), (1, 1), (0, 1), (0, 0)]),
            Heading::East,
        );
        assert_eq!(commands, [Reverse, TurnRight, TurnLeft, TurnRight, Brake]);
    }

    #[test]
    fn test_non_adjacent_hop_coasts() {
        let commands = command_sequence(&path(&[(0, 0), (1, 0), (3, 0)]), Heading::East);
        assert_eq!(commands, [Forward, Idle, Brake]);
    }
}
