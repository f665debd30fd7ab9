use crate::error::{FleetError, Result};
use crate::navigation::{CompassVector, Point};
use crate::types::{Outbox, VesselId};
use crate::vessel::Hull;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    Idle,
    ToSpill,
    North,
    East,
    South,
    West,
}

impl Sweep {
    /// The edge that follows this one in the clockwise spiral, with its heading.
    fn turn(self) -> (Sweep, f64) {
        match self {
            Self::Idle | Self::ToSpill | Self::West => (Self::North, 0.0),
            Self::North => (Self::East, 90.0),
            Self::East => (Self::South, 180.0),
            Self::South => (Self::West, 270.0),
        }
    }
}

/// Inward square spiral over an `n`-by-`n` spill starting at its corner.
#[derive(Debug, Clone)]
pub struct Skimming {
    sweep: Sweep,
    corner: Point,
    size: u32,
    edges_left: u32,
}

impl Default for Skimming {
    fn default() -> Self {
        Self {
            sweep: Sweep::Idle,
            corner: Point::default(),
            size: 0,
            edges_left: 0,
        }
    }
}

impl Skimming {
    pub fn sweep(&self) -> Sweep {
        self.sweep
    }

    pub fn edges_left(&self) -> u32 {
        self.edges_left
    }

    pub fn is_skimming(&self) -> bool {
        self.sweep != Sweep::Idle
    }

    pub fn start(&mut self, hull: &mut Hull, corner: Point, size: i64, outbox: &mut Outbox) -> Result<()> {
        if !hull.can_move() {
            return Err(FleetError::CannotMove(hull.id().0.clone()));
        }
        let size = u32::try_from(size)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(FleetError::InvalidSpillSize(size))?;
        hull.set_destination_position_and_speed(corner, hull.maximum_speed(), outbox)?;
        *self = Self {
            sweep: Sweep::ToSpill,
            corner,
            size,
            edges_left: size.saturating_mul(2) - 1,
        };
        tracing::info!(vessel = %hull.id(), corner = %corner, size, "will skim spill");
        Ok(())
    }

    pub fn cancel(&mut self, vessel: &VesselId) {
        if self.is_skimming() {
            tracing::info!(vessel = %vessel, "skimming interrupted");
        }
        *self = Self::default();
    }

    pub(crate) fn update(&mut self, hull: &mut Hull, outbox: &mut Outbox) {
        if !self.is_skimming() {
            return;
        }
        if !hull.can_move() {
            self.cancel(hull.id());
            return;
        }
        if hull.is_moving() {
            return;
        }
        if self.edges_left == 0 {
            tracing::info!(vessel = %hull.id(), corner = %self.corner, "finished skimming spill");
            *self = Self::default();
            return;
        }

        let (next, heading) = self.sweep.turn();
        let length = if self.sweep == Sweep::ToSpill {
            self.size
        } else {
            (self.edges_left + 3) / 2
        };
        self.edges_left -= 1;
        self.sweep = next;

        let destination = hull.location() + CompassVector::new(heading, f64::from(length));
        if let Err(err) =
            hull.set_destination_position_and_speed(destination, hull.maximum_speed(), outbox)
        {
            tracing::warn!(vessel = %hull.id(), error = %err, "skimming edge failed");
            self.cancel(hull.id());
        }
    }

    pub fn describe(&self) -> String {
        match self.sweep {
            Sweep::Idle => "Not skimming".to_string(),
            Sweep::ToSpill => format!("Heading to spill at {}", self.corner),
            Sweep::North | Sweep::East | Sweep::South | Sweep::West => format!(
                "Skimming spill at {}, {} edges left",
                self.corner, self.edges_left
            ),
        }
    }
}
