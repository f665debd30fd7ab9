//! Line-oriented directives.
//!
//! A line is either a world-level keyword (`create`, `go`, `status`, ...) or a
//! target name followed by an order verb (`Ajax course 90 10`). Everything
//! after `#` is a comment.

use std::str::SplitWhitespace;

use fleet_core::{Command, DepotId, Order, Point};

use crate::error::ControlError;

#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Command(Command),
    Go,
    Status,
    Describe(String),
    Quit,
}

/// Parses one line. Blank lines and comment lines yield `None`.
pub fn parse_directive(line: &str) -> Result<Option<Directive>, ControlError> {
    let text = line.split_once('#').map_or(line, |(code, _)| code);
    let mut rest = text.split_whitespace();
    let Some(first) = rest.next() else {
        return Ok(None);
    };
    let mut words = Words {
        directive: first.to_string(),
        rest,
    };

    let directive = match first {
        "go" => Directive::Go,
        "status" => Directive::Status,
        "quit" => Directive::Quit,
        "describe" => Directive::Describe(words.name("name")?),
        "create" => Directive::Command(Command::Create {
            name: words.name("name")?,
            type_tag: words.name("type")?,
            position: words.point()?,
        }),
        "create_group" => Directive::Command(Command::CreateGroup {
            name: words.name("name")?,
        }),
        "add_to_group" => Directive::Command(Command::AddToGroup {
            group: words.name("group")?,
            member: words.name("member")?,
        }),
        "remove_from_group" => Directive::Command(Command::RemoveFromGroup {
            group: words.name("group")?,
            member: words.name("member")?,
        }),
        "remove_group" => Directive::Command(Command::RemoveGroup {
            name: words.name("name")?,
        }),
        "remove" => Directive::Command(Command::RemoveVessel {
            name: words.name("name")?,
        }),
        target => {
            let verb = words.name("order")?;
            words.directive = format!("{target} {verb}");
            let order = parse_order(target, &verb, &mut words)?;
            Directive::Command(Command::Issue {
                target: target.to_string(),
                order,
            })
        }
    };
    words.finish()?;
    Ok(Some(directive))
}

fn parse_order(target: &str, verb: &str, words: &mut Words<'_>) -> Result<Order, ControlError> {
    let order = match verb {
        "course" => Order::CourseAndSpeed {
            course: words.course()?,
            speed: words.speed()?,
        },
        "position" => Order::PositionAndSpeed {
            position: words.point()?,
            speed: words.speed()?,
        },
        "destination" => Order::DepotAndSpeed {
            depot: words.depot()?,
            speed: words.speed()?,
        },
        "load_at" => Order::LoadAt {
            depot: words.depot()?,
        },
        "unload_at" => Order::UnloadAt {
            depot: words.depot()?,
        },
        "dock_at" => Order::DockAt {
            depot: words.depot()?,
        },
        "attack" => Order::Attack {
            target: words.name("target")?,
        },
        "refuel" => Order::Refuel,
        "stop" => Order::Stop,
        "stop_attack" => Order::StopAttack,
        "start_skimming" => Order::StartSkimming {
            corner: words.point()?,
            size: words.integer("size")?,
        },
        _ => {
            return Err(ControlError::UnknownOrder {
                target: target.to_string(),
                verb: verb.to_string(),
            })
        }
    };
    Ok(order)
}

/// Remaining words of a line, with the directive name for error messages.
struct Words<'a> {
    directive: String,
    rest: SplitWhitespace<'a>,
}

impl<'a> Words<'a> {
    fn word(&mut self, argument: &'static str) -> Result<&'a str, ControlError> {
        self.rest.next().ok_or_else(|| ControlError::MissingArgument {
            directive: self.directive.clone(),
            argument,
        })
    }

    fn name(&mut self, argument: &'static str) -> Result<String, ControlError> {
        self.word(argument).map(str::to_string)
    }

    fn depot(&mut self) -> Result<DepotId, ControlError> {
        self.word("depot").map(DepotId::from)
    }

    fn number(&mut self, argument: &'static str) -> Result<f64, ControlError> {
        let word = self.word(argument)?;
        word.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ControlError::InvalidNumber {
                argument,
                value: word.to_string(),
            })
    }

    fn integer(&mut self, argument: &'static str) -> Result<i64, ControlError> {
        let word = self.word(argument)?;
        word.parse::<i64>().map_err(|_| ControlError::InvalidNumber {
            argument,
            value: word.to_string(),
        })
    }

    fn point(&mut self) -> Result<Point, ControlError> {
        Ok(Point::new(self.number("x")?, self.number("y")?))
    }

    fn course(&mut self) -> Result<f64, ControlError> {
        let course = self.number("course")?;
        if (0.0..360.0).contains(&course) {
            Ok(course)
        } else {
            Err(ControlError::CourseOutOfRange(course))
        }
    }

    fn speed(&mut self) -> Result<f64, ControlError> {
        let speed = self.number("speed")?;
        if speed < 0.0 {
            return Err(ControlError::NegativeSpeed(speed));
        }
        Ok(speed)
    }

    fn finish(mut self) -> Result<(), ControlError> {
        match self.rest.next() {
            Some(extra) => Err(ControlError::TrailingArgument {
                directive: self.directive,
                extra: extra.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Directive {
        parse_directive(line)
            .expect("line should parse")
            .expect("line should not be blank")
    }

    fn issue(target: &str, order: Order) -> Directive {
        Directive::Command(Command::Issue {
            target: target.to_string(),
            order,
        })
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_directive("").unwrap(), None);
        assert_eq!(parse_directive("   ").unwrap(), None);
        assert_eq!(parse_directive("# harbor patrol").unwrap(), None);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse("go"), Directive::Go);
        assert_eq!(parse("status  # everyone"), Directive::Status);
        assert_eq!(parse("quit"), Directive::Quit);
        assert_eq!(parse("describe Ajax"), Directive::Describe("Ajax".to_string()));
    }

    #[test]
    fn test_create_reads_type_and_position() {
        assert_eq!(
            parse("create Queen cruise_ship 3 -4.5"),
            Directive::Command(Command::Create {
                name: "Queen".to_string(),
                type_tag: "cruise_ship".to_string(),
                position: Point::new(3.0, -4.5),
            })
        );
    }

    #[test]
    fn test_group_structure_directives() {
        assert_eq!(
            parse("add_to_group Navy Ajax"),
            Directive::Command(Command::AddToGroup {
                group: "Navy".to_string(),
                member: "Ajax".to_string(),
            })
        );
        assert_eq!(
            parse("remove_group Navy"),
            Directive::Command(Command::RemoveGroup {
                name: "Navy".to_string()
            })
        );
    }

    #[test]
    fn test_orders() {
        assert_eq!(
            parse("Ajax course 90 10"),
            issue(
                "Ajax",
                Order::CourseAndSpeed {
                    course: 90.0,
                    speed: 10.0
                }
            )
        );
        assert_eq!(
            parse("Valdez load_at Exxon"),
            issue(
                "Valdez",
                Order::LoadAt {
                    depot: DepotId::from("Exxon")
                }
            )
        );
        assert_eq!(
            parse("Skimpy start_skimming 10 10 3"),
            issue(
                "Skimpy",
                Order::StartSkimming {
                    corner: Point::new(10.0, 10.0),
                    size: 3
                }
            )
        );
        assert_eq!(parse("Navy stop"), issue("Navy", Order::Stop));
    }

    #[test]
    fn test_course_must_be_within_one_turn() {
        assert_eq!(
            parse_directive("Ajax course 360 5").unwrap_err(),
            ControlError::CourseOutOfRange(360.0)
        );
        assert_eq!(
            parse_directive("Ajax course -1 5").unwrap_err(),
            ControlError::CourseOutOfRange(-1.0)
        );
    }

    #[test]
    fn test_negative_speed_is_a_parse_error() {
        assert_eq!(
            parse_directive("Ajax position 1 1 -2").unwrap_err(),
            ControlError::NegativeSpeed(-2.0)
        );
    }

    #[test]
    fn test_argument_errors_name_the_directive() {
        assert_eq!(
            parse_directive("Ajax destination Exxon").unwrap_err(),
            ControlError::MissingArgument {
                directive: "Ajax destination".to_string(),
                argument: "speed",
            }
        );
        assert_eq!(
            parse_directive("go now").unwrap_err(),
            ControlError::TrailingArgument {
                directive: "go".to_string(),
                extra: "now".to_string(),
            }
        );
        assert_eq!(
            parse_directive("create Ajax cruiser x 1").unwrap_err(),
            ControlError::InvalidNumber {
                argument: "x",
                value: "x".to_string(),
            }
        );
        assert!(matches!(
            parse_directive("Ajax start_skimming 1 1 2.5").unwrap_err(),
            ControlError::InvalidNumber { argument: "size", .. }
        ));
    }

    #[test]
    fn test_unknown_order_verb() {
        assert_eq!(
            parse_directive("Ajax fly 3").unwrap_err(),
            ControlError::UnknownOrder {
                target: "Ajax".to_string(),
                verb: "fly".to_string(),
            }
        );
        assert!(matches!(
            parse_directive("Ajax").unwrap_err(),
            ControlError::MissingArgument { argument: "order", .. }
        ));
    }
}
