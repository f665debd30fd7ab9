use fleet_core::{Command, CommandEnvelope, CommandId, Dispatch, World};

use crate::directive::{parse_directive, Directive};
use crate::error::ControlError;

/// What a directive produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Applied {
        id: CommandId,
        dispatch: Dispatch,
    },
    Advanced {
        time: u64,
    },
    Status(Vec<String>),
    Description(String),
    Quit,
}

/// Applies directives to a world in the order they arrive.
///
/// Commands take effect at once at the current time; `go` runs one update.
#[derive(Debug, Default)]
pub struct Controller {
    next_command_id: u64,
    applied: u64,
    rejected: u64,
}

/// Allocates a command ID and builds a `CommandEnvelope` due now.
fn make_cmd(tick: u64, next_id: &mut u64, command: Command) -> CommandEnvelope {
    let cmd_id = CommandId(format!("cmd_{:06}", *next_id));
    *next_id += 1;
    CommandEnvelope {
        id: cmd_id,
        issued_tick: tick,
        execute_at_tick: tick,
        command,
    }
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands the world accepted so far.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Commands the world refused so far. Parse errors are not counted.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Parses and handles one line. Blank and comment lines yield `None`.
    pub fn run_line(&mut self, world: &mut World, line: &str) -> Result<Option<Response>, ControlError> {
        match parse_directive(line)? {
            Some(directive) => self.handle(world, directive).map(Some),
            None => Ok(None),
        }
    }

    pub fn handle(&mut self, world: &mut World, directive: Directive) -> Result<Response, ControlError> {
        match directive {
            Directive::Command(command) => self.apply(world, command),
            Directive::Go => {
                world.update();
                Ok(Response::Advanced { time: world.time() })
            }
            Directive::Status => Ok(Response::Status(world.status())),
            Directive::Describe(name) => Ok(Response::Description(world.describe(&name)?)),
            Directive::Quit => Ok(Response::Quit),
        }
    }

    fn apply(&mut self, world: &mut World, command: Command) -> Result<Response, ControlError> {
        let envelope = make_cmd(world.time(), &mut self.next_command_id, command);
        match world.execute(&envelope.command) {
            Ok(dispatch) => {
                self.applied += 1;
                tracing::debug!(command = %envelope.id, tick = envelope.issued_tick, "command applied");
                Ok(Response::Applied {
                    id: envelope.id,
                    dispatch,
                })
            }
            Err(err) => {
                self.rejected += 1;
                tracing::warn!(command = %envelope.id, error = %err, "command rejected");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::test_fixtures::{harbor, ALPHA};
    use fleet_core::{ErrorKind, FleetError, Movement};

    fn run(controller: &mut Controller, world: &mut World, line: &str) -> Response {
        controller
            .run_line(world, line)
            .unwrap_or_else(|err| panic!("'{line}' failed: {err}"))
            .expect("line should produce a response")
    }

    #[test]
    fn test_commands_get_sequential_ids() {
        let mut world = harbor();
        let mut controller = Controller::new();

        let first = run(&mut controller, &mut world, "create Ajax cruiser 0 0");
        let second = run(&mut controller, &mut world, "create_group Navy");

        assert_eq!(
            first,
            Response::Applied {
                id: CommandId("cmd_000000".to_string()),
                dispatch: Dispatch::Structural,
            }
        );
        assert!(matches!(
            second,
            Response::Applied { id, .. } if id.0 == "cmd_000001"
        ));
        assert_eq!(controller.applied(), 2);
    }

    #[test]
    fn test_go_advances_one_hour() {
        let mut world = harbor();
        let mut controller = Controller::new();
        run(&mut controller, &mut world, "create Ajax cruiser 0 0");
        run(&mut controller, &mut world, "Ajax course 0 20");

        assert_eq!(
            run(&mut controller, &mut world, "go"),
            Response::Advanced { time: 1 }
        );
        let ajax = world.vessel("Ajax").unwrap();
        assert!((ajax.location().y - 20.0).abs() < 1e-9);
        assert_eq!(ajax.hull().movement(), &Movement::OnCourse);
    }

    #[test]
    fn test_rejections_are_counted_and_returned() {
        let mut world = harbor();
        let mut controller = Controller::new();
        run(&mut controller, &mut world, "create Valdez tanker 0 0");

        let err = controller
            .run_line(&mut world, "Valdez course 0 11")
            .unwrap_err();

        assert!(matches!(
            err,
            ControlError::Fleet(ref inner) if inner.kind() == ErrorKind::SpeedExceeded
        ));
        assert_eq!(controller.rejected(), 1);
        assert_eq!(controller.applied(), 1);
    }

    #[test]
    fn test_parse_errors_do_not_count_as_rejections() {
        let mut world = harbor();
        let mut controller = Controller::new();
        assert!(controller.run_line(&mut world, "Valdez course").is_err());
        assert_eq!(controller.rejected(), 0);
    }

    #[test]
    fn test_queries() {
        let mut world = harbor();
        let mut controller = Controller::new();

        match run(&mut controller, &mut world, "status") {
            Response::Status(lines) => assert_eq!(lines.len(), 3),
            other => panic!("unexpected response {other:?}"),
        }
        match run(&mut controller, &mut world, &format!("describe {ALPHA}")) {
            Response::Description(text) => assert!(text.starts_with("Depot Alpha")),
            other => panic!("unexpected response {other:?}"),
        }
        assert_eq!(
            controller.run_line(&mut world, "describe Nobody").unwrap_err(),
            ControlError::Fleet(FleetError::UnknownEntity("Nobody".to_string()))
        );
        assert_eq!(run(&mut controller, &mut world, "quit"), Response::Quit);
        assert_eq!(controller.run_line(&mut world, "# nothing").unwrap(), None);
    }
}
