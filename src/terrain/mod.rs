//! Converting a depth sensor feed into terrain heights.
//!
//! A depth sensor mounted above a physical sandbox reports, for every pixel,
//! the distance to whatever surface it sees. Sand that is piled up sits closer
//! to the sensor than sand that has been dug away, so inverting the depth
//! gives a height.
//!
//! Each tick a frame flows through:
//!
//! ```text
//!  DepthFrame ──> DepthSmoother ──> ChangeDetector ──┬── unchanged: stop
//!                                                    │
//!                                                    └── changed ──> HeightfieldBuilder ──> TerrainHeights
//! ```
//!
//! * [depth_frame::DepthFrame] - a `width x height` array of `u16` readings where `0` means the
//! sensor saw nothing (reflective or occluded surfaces)
//! * [smoother::DepthSmoother] - one pass of neighbour averaging to take the jitter out of readings
//! * [change_detector::ChangeDetector] - probes a handful of samples to decide whether the frame
//! is worth turning into a new heightfield, the sensor streams at 30Hz and most frames are
//! identical to within noise
//! * [heightfield::HeightfieldBuilder] - fills holes, normalises depth into `[0, 1]` heights and
//! writes them to a [storage::TerrainHeights] implementation in a single call
//!

pub mod change_detector;
pub mod depth_frame;
pub mod heightfield;
pub mod pipeline;
pub mod smoother;
pub mod storage;
