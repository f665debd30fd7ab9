//! Change notifications for views and loggers attached to a [`World`](crate::World).
//!
//! Observers are shared handles so that the caller can keep reading one after
//! attaching it. Every callback defaults to a no-op.

use std::cell::RefCell;
use std::rc::Rc;

use crate::navigation::Point;
use crate::types::Notification;

pub trait Observer {
    fn on_location(&mut self, _name: &str, _location: Point) {}
    fn on_course(&mut self, _name: &str, _course: f64) {}
    fn on_speed(&mut self, _name: &str, _speed: f64) {}
    fn on_fuel(&mut self, _name: &str, _fuel: f64) {}
    fn on_removed(&mut self, _name: &str) {}
}

pub type SharedObserver = Rc<RefCell<dyn Observer>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

pub(crate) fn deliver(notification: &Notification, observer: &mut dyn Observer) {
    match notification {
        Notification::Location { name, location } => observer.on_location(name, *location),
        Notification::Course { name, course } => observer.on_course(name, *course),
        Notification::Speed { name, speed } => observer.on_speed(name, *speed),
        Notification::Fuel { name, fuel } => observer.on_fuel(name, *fuel),
        Notification::Removed { name } => observer.on_removed(name),
    }
}

/// Records every notification in arrival order.
#[derive(Debug, Default)]
pub struct NotificationLog {
    pub entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn about<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Notification> + 'a {
        self.entries.iter().filter(move |n| n.subject() == name)
    }

    pub fn removed(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|n| match n {
                Notification::Removed { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Observer for NotificationLog {
    fn on_location(&mut self, name: &str, location: Point) {
        self.entries.push(Notification::Location {
            name: name.to_string(),
            location,
        });
    }

    fn on_course(&mut self, name: &str, course: f64) {
        self.entries.push(Notification::Course {
            name: name.to_string(),
            course,
        });
    }

    fn on_speed(&mut self, name: &str, speed: f64) {
        self.entries.push(Notification::Speed {
            name: name.to_string(),
            speed,
        });
    }

    fn on_fuel(&mut self, name: &str, fuel: f64) {
        self.entries.push(Notification::Fuel {
            name: name.to_string(),
            fuel,
        });
    }

    fn on_removed(&mut self, name: &str) {
        self.entries.push(Notification::Removed {
            name: name.to_string(),
        });
    }
}
