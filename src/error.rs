//! Error types used across the terrain pipeline, grid and pathfinder
//!
//! Only failures a caller can act on are surfaced. Missing depth samples are
//! repaired where they are found and out of bounds grid queries simply yield
//! [None], so neither has a variant here.
//!

use thiserror::Error;

/// Raised when terrain height storage rejects a read or write
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeightfieldWriteError {
	/// The requested rectangle does not fit inside the storage
	#[error(
		"height rectangle {width}x{height} at ({x}, {y}) does not fit storage of {storage_width}x{storage_height}"
	)]
	OutOfBounds {
		/// Column of the rectangle origin
		x: usize,
		/// Row of the rectangle origin
		y: usize,
		/// Width of the rectangle
		width: usize,
		/// Height of the rectangle
		height: usize,
		/// Width of the storage
		storage_width: usize,
		/// Height of the storage
		storage_height: usize,
	},
	/// A zero sized rectangle was supplied
	#[error("height rectangle is empty")]
	Empty,
}

/// Why a search could not produce a path. This is an expected outcome while
/// terrain is being reshaped and callers should hold position or retry
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPathFound {
	/// The start position resolved to a missing or blocked node
	#[error("start node is missing or not walkable")]
	StartBlocked,
	/// The goal position resolved to a missing or blocked node
	#[error("goal node is missing or not walkable")]
	GoalBlocked,
	/// Every reachable node was explored without meeting the goal
	#[error("open set exhausted before reaching the goal")]
	Exhausted,
}

/// Crate level error
#[derive(Error, Debug)]
pub enum NavError {
	/// Terrain storage rejected a heightfield
	#[error("heightfield write failed: {0}")]
	HeightfieldWrite(#[from] HeightfieldWriteError),
	/// A depth frame was built from the wrong number of samples
	#[error("depth frame of {width}x{height} needs {expected} samples, found {found}")]
	FrameLength {
		/// Frame width
		width: usize,
		/// Frame height
		height: usize,
		/// `width * height`
		expected: usize,
		/// Number of samples supplied
		found: usize,
	},
	/// A configuration value is unusable
	#[error("invalid settings: {0}")]
	InvalidSettings(String),
	/// A persisted heightfield could not be read or written, or its heights
	/// do not match its dimensions
	#[error("snapshot error: {0}")]
	Snapshot(String),
	/// Recorded depth frames or a heightmap image could not be imported
	#[error("import error: {0}")]
	Import(String),
	/// File access failed
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}

/// Convenience alias for results carrying a [NavError]
pub type NavResult<T> = std::result::Result<T, NavError>;
