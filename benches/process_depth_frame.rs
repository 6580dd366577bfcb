//! Measure pushing a full resolution depth frame through the terrain pipeline
//!
//! Frame is 512x424 samples of noisy sand with a few holes
//!

use bevy_heightfield_nav_plugin::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Build a frame of sand at mid depth with sensor noise and missing samples
fn noisy_frame(rng: &mut StdRng, width: usize, height: usize) -> DepthFrame {
	let mut frame = DepthFrame::filled(width, height, 1075);
	for sample in frame.get_mut().iter_mut() {
		if rng.random_range(0..100) == 0 {
			*sample = 0;
		} else {
			*sample = rng.random_range(950..1200);
		}
	}
	frame
}

/// Every frame differs from the last so each one is smoothed, built and written
fn process_frames(
	pipeline: &mut TerrainPipeline,
	storage: &mut HeightStorage,
	frames: &[DepthFrame],
) {
	for frame in frames {
		let _ = pipeline.process(frame, storage);
	}
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let settings = NavSettings::default();
	let mut rng = StdRng::seed_from_u64(42);
	let frames: Vec<DepthFrame> = (0..4)
		.map(|_| noisy_frame(&mut rng, settings.depth_width, settings.depth_height))
		.collect();
	let mut pipeline = TerrainPipeline::from_settings(&settings);
	let mut storage = HeightStorage::from_settings(&settings);

	let mut group = c.benchmark_group("terrain");
	group.significance_level(0.1).sample_size(50);
	group.bench_function("process_depth_frame", |b| {
		b.iter(|| process_frames(black_box(&mut pipeline), &mut storage, black_box(&frames)))
	});
	// an unchanged frame should only cost the smoothing pass and a few probes
	let still = frames[0].clone();
	let _ = pipeline.process(&still, &mut storage);
	group.bench_function("process_unchanged_frame", |b| {
		b.iter(|| pipeline.process(black_box(&still), &mut storage))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
