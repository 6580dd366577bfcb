//! Walkability and route finding over the terrain.
//!
//! The [grid::GridManager] lays a coarse grid of [node::GridNode]s over the
//! terrain. Each node samples the terrain height at its corner to find where
//! an agent would stand, and is marked non-walkable when an obstacle
//! occupies its cell:
//!
//! ```text
//!  z
//!  ^  ___________________
//!  | |    |    |    |    |
//!  | |____|____|____|____|
//!  | |    |    |////|    |      //// obstacle
//!  | |____|____|////|____|
//!  | |    |    |    |    |
//!  | |____|____|____|____|
//!  | |    |    |    |    |
//!  | |____|____|____|____|
//!  o--------------------------> x
//! ```
//!
//! The [pathfinder::Pathfinder] searches the grid with A*, moving in any of
//! the 8 [utilities::Ordinal] directions. Whenever the terrain changes the
//! [invalidation::PathInvalidationCoordinator] walks through every registered
//! [agent::NavAgent] a few at a time asking it to find a fresh route.
//!

pub mod agent;
pub mod grid;
pub mod invalidation;
pub mod node;
pub mod open_set;
pub mod pathfinder;
pub mod utilities;
