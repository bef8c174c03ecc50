use crate::alignment::aligner::AlignmentPlan;
use crate::array::dataset::SensorDataset;
use crate::prelude::{BeamError, BeamResult, BeamType};
use crate::processing::beam::Beam;
use crate::processing::buffer::BeamBuffer;
use crate::processing::partition::{partition, Segment};
use crate::telemetry::log::LogManager;
use rayon::ThreadPoolBuilder;

/// Delay-and-sum beamformer backed by a per-run pool of `workers` threads.
///
/// With zero workers the whole beam is accumulated on the calling thread.
pub struct Beamformer {
    workers: usize,
    max_samples: Option<usize>,
    logger: LogManager,
}

impl Beamformer {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            max_samples: None,
            logger: LogManager::new("beamformer"),
        }
    }

    /// Caps the number of beam slots a single run may allocate.
    pub fn with_max_samples(mut self, limit: usize) -> Self {
        self.max_samples = Some(limit);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn form(
        &self,
        kind: BeamType,
        dataset: &SensorDataset,
        plan: &AlignmentPlan,
    ) -> BeamResult<Beam> {
        validate_plan(dataset, plan)?;

        let segments = partition(plan.length, self.workers);
        let mut buffer = BeamBuffer::zeroed(plan.length, self.max_samples)?;

        if self.workers == 0 {
            for (segment, slots) in buffer.split_segments(&segments)? {
                accumulate_segment(kind, dataset, plan, segment, slots);
            }
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .thread_name(|index| format!("beam-worker-{}", index))
                .build()
                .map_err(|err| BeamError::WorkerPool(err.to_string()))?;
            let parts = buffer.split_segments(&segments)?;
            for (segment, _) in &parts {
                self.logger
                    .detail(&format!("{} segment {:?}", kind, segment.range()));
            }

            pool.scope(|scope| {
                for (segment, slots) in parts {
                    scope.spawn(move |_| accumulate_segment(kind, dataset, plan, segment, slots));
                }
            });
        }

        self.logger.record(&format!(
            "{} beam formed: {} samples from {} sensors on {} workers",
            kind,
            plan.length,
            plan.sensor_count(),
            self.workers
        ));

        Ok(Beam::new(
            kind,
            plan.window.beam_start,
            plan.sample_rate,
            buffer.into_samples(),
        ))
    }
}

fn validate_plan(dataset: &SensorDataset, plan: &AlignmentPlan) -> BeamResult<()> {
    if plan.length == 0 || plan.window.is_degenerate() {
        return Err(BeamError::Geometry(format!(
            "degenerate window {:.6}..{:.6}",
            plan.window.beam_start, plan.window.beam_end
        )));
    }
    if plan.sensor_count() != dataset.sensor_count() {
        return Err(BeamError::Parameter(format!(
            "plan covers {} sensors, dataset holds {}",
            plan.sensor_count(),
            dataset.sensor_count()
        )));
    }
    if plan.sample_rate != dataset.sample_rate() {
        return Err(BeamError::Parameter(format!(
            "plan sample rate {} differs from dataset rate {}",
            plan.sample_rate,
            dataset.sample_rate()
        )));
    }
    for sensor in &plan.sensors {
        let overruns = sensor.valid_outputs.end > plan.length
            || (!sensor.valid_outputs.is_empty()
                && sensor.input_index(sensor.valid_outputs.end - 1) >= dataset.sample_count());
        if sensor.index >= dataset.sensor_count() || overruns {
            return Err(BeamError::Geometry(format!(
                "sensor {} alignment falls outside its recording",
                sensor.index
            )));
        }
    }
    Ok(())
}

/// Sums every sensor into `slots`, then turns the sums into means.
///
/// Sensors are visited in index order, so each slot sees the same sequence
/// of additions whatever the segment layout.
fn accumulate_segment(
    kind: BeamType,
    dataset: &SensorDataset,
    plan: &AlignmentPlan,
    segment: Segment,
    slots: &mut [f64],
) {
    for sensor in &plan.sensors {
        let row = dataset.row(sensor.index);
        let first = segment.start.max(sensor.valid_outputs.start);
        let last = segment.end.min(sensor.valid_outputs.end);
        for output in first..last {
            slots[output - segment.start] += kind.contribution(row[sensor.input_index(output)]);
        }
    }

    let count = plan.sensor_count() as f64;
    for slot in slots.iter_mut() {
        *slot /= count;
    }
}
