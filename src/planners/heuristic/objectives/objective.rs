use std::fmt;

use crate::infra::{PathFinder, Position};
use crate::planners::heuristic::objectives::CoordinateTracker;
use crate::planners::heuristic::objectives::exit::ExitObjective;
use crate::planners::heuristic::objectives::explore::ExploreObjective;
use crate::planners::heuristic::objectives::fetch_key::FetchKeyObjective;
use crate::planners::heuristic::objectives::heal::HealObjective;
use crate::state::{AgentState, GridMap, NavigatorConfig};

/// Everything an objective may consult or update while choosing a target.
pub struct ObjectiveContext<'a> {
    pub grid: &'a mut GridMap,
    pub finder: &'a mut PathFinder,
    pub agent: &'a AgentState,
    pub config: &'a NavigatorConfig,
}

/// Trait for objective behaviour
pub trait ExecuteObjective {
    /// Next coordinate of interest, or `None` when nothing reachable remains.
    fn next_coordinate(&mut self, ctx: &mut ObjectiveContext) -> Option<Position>;

    fn is_finished(&mut self, ctx: &ObjectiveContext) -> bool;

    /// Tracked targets; objectives without a target set return `None`.
    fn tracker(&self) -> Option<&CoordinateTracker> {
        None
    }

    fn tracker_mut(&mut self) -> Option<&mut CoordinateTracker> {
        None
    }

    fn offer_coordinate(&mut self, pos: Position) -> bool {
        self.tracker_mut().is_some_and(|tracker| tracker.offer(pos))
    }

    fn remove_coordinate(&mut self, pos: Position) {
        if let Some(tracker) = self.tracker_mut() {
            tracker.remove(pos);
        }
    }

    /// Put back a coordinate that was handed out but never reached.
    fn restore_coordinate(&mut self, pos: Position) -> bool {
        self.tracker_mut().is_some_and(|tracker| tracker.restore(pos))
    }

    /// Untracked objectives always have something to do.
    fn has_targets(&self) -> bool {
        self.tracker().is_none_or(|tracker| tracker.has_targets())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Objective {
    Explore,
    FetchKey,
    Heal,
    Exit,
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Objective::Explore => "explore",
            Objective::FetchKey => "fetch-key",
            Objective::Heal => "heal",
            Objective::Exit => "exit",
        };
        f.write_str(name)
    }
}

/// State of all four objectives, dispatched by [`Objective`] tag.
#[derive(Clone, Debug, Default)]
pub struct ObjectiveStates {
    pub explore: ExploreObjective,
    pub fetch_key: FetchKeyObjective,
    pub heal: HealObjective,
    pub exit: ExitObjective,
}

impl ObjectiveStates {
    pub fn new() -> Self {
        Self::default()
    }

    #[tracing::instrument(level = "debug", skip(self, ctx))]
    pub fn next_coordinate(
        &mut self,
        objective: Objective,
        ctx: &mut ObjectiveContext,
    ) -> Option<Position> {
        match objective {
            Objective::Explore => self.explore.next_coordinate(ctx),
            Objective::FetchKey => self.fetch_key.next_coordinate(ctx),
            Objective::Heal => self.heal.next_coordinate(ctx),
            Objective::Exit => self.exit.next_coordinate(ctx),
        }
    }

    pub fn is_finished(&mut self, objective: Objective, ctx: &ObjectiveContext) -> bool {
        match objective {
            Objective::Explore => self.explore.is_finished(ctx),
            Objective::FetchKey => self.fetch_key.is_finished(ctx),
            Objective::Heal => self.heal.is_finished(ctx),
            Objective::Exit => self.exit.is_finished(ctx),
        }
    }

    pub fn has_targets(&self, objective: Objective) -> bool {
        match objective {
            Objective::Explore => self.explore.has_targets(),
            Objective::FetchKey => self.fetch_key.has_targets(),
            Objective::Heal => self.heal.has_targets(),
            Objective::Exit => self.exit.has_targets(),
        }
    }

    pub fn offer_coordinate(&mut self, objective: Objective, pos: Position) -> bool {
        match objective {
            Objective::Explore => self.explore.offer_coordinate(pos),
            Objective::FetchKey => self.fetch_key.offer_coordinate(pos),
            Objective::Heal => self.heal.offer_coordinate(pos),
            Objective::Exit => self.exit.offer_coordinate(pos),
        }
    }

    pub fn remove_coordinate(&mut self, objective: Objective, pos: Position) {
        match objective {
            Objective::Explore => self.explore.remove_coordinate(pos),
            Objective::FetchKey => self.fetch_key.remove_coordinate(pos),
            Objective::Heal => self.heal.remove_coordinate(pos),
            Objective::Exit => self.exit.remove_coordinate(pos),
        }
    }

    pub fn restore_coordinate(&mut self, objective: Objective, pos: Position) -> bool {
        match objective {
            Objective::Explore => self.explore.restore_coordinate(pos),
            Objective::FetchKey => self.fetch_key.restore_coordinate(pos),
            Objective::Heal => self.heal.restore_coordinate(pos),
            Objective::Exit => self.exit.restore_coordinate(pos),
        }
    }
}
