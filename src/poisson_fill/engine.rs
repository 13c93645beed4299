//! Iteration driver: mask setup, ping-pong sweeps and buffer reuse.

use crate::error::{FillError, FillResult};
use crate::poisson_fill::hole_mask::HoleMask;
use crate::poisson_fill::pixel_buffer::PixelBuffer;
use crate::poisson_fill::relaxation::{relax, SweepParams};
use tracing::{debug, trace};

/// Tuning knobs of the filling engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillConfig {
    /// Sweep cap; a request runs at most `max_iterations + 1` sweeps
    pub max_iterations: usize,
    /// Per-channel tolerance when matching samples against the hole value
    pub match_threshold: f32,
}

impl FillConfig {
    pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
    pub const DEFAULT_MATCH_THRESHOLD: f32 = 1e-4;

    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub const fn with_match_threshold(mut self, match_threshold: f32) -> Self {
        self.match_threshold = match_threshold;
        self
    }

    /// Checks that the threshold is finite and non-negative
    ///
    /// # Errors
    ///
    /// * `FillError::InvalidParameter` - If the threshold is negative, NaN or infinite
    pub fn validate(&self) -> FillResult<()> {
        if !self.match_threshold.is_finite() || self.match_threshold < 0.0 {
            return Err(FillError::InvalidParameter(format!(
                "match threshold must be finite and non-negative, got {}",
                self.match_threshold
            )));
        }
        Ok(())
    }
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            match_threshold: Self::DEFAULT_MATCH_THRESHOLD,
        }
    }
}

/// Outcome of the most recent fill request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillReport {
    /// Relaxation sweeps performed
    pub sweeps: usize,
    /// `true` when every hole received a value before the cap
    pub converged: bool,
    /// Pixels still marked as holes when the loop stopped
    pub remaining_holes: usize,
}

/// Poisson hole filling engine
///
/// Holes are pixels whose every channel matches a sentinel value. Each sweep
/// seeds holes that border known pixels with the mean of those neighbours,
/// then keeps relaxing every originally missing pixel towards the mean of
/// its neighbours so the fill becomes smooth (harmonic) instead of a flat
/// copy of the nearest border.
///
/// The engine keeps its scratch buffer and masks between requests and only
/// reallocates them when the source shape changes. A single engine must not
/// be shared between concurrent requests; `fill` takes `&mut self`.
///
/// # Examples
///
/// ```rust
/// use poisson_fill::{PixelBuffer, PoissonFilling};
///
/// let mut source = PixelBuffer::from_pixel(4, 4, &[1.0]);
/// source.at_mut(1, 1).unwrap()[0] = 0.0;
///
/// let mut engine = PoissonFilling::new();
/// let filled = engine.fill(&source, None, 0.0).unwrap();
///
/// assert_eq!(filled.at(1, 1), Some(&[1.0][..]));
/// assert_eq!(engine.last_report().unwrap().sweeps, 1);
/// ```
#[derive(Debug, Default)]
pub struct PoissonFilling {
    config: FillConfig,
    scratch: Option<PixelBuffer>,
    holes: Option<HoleMask>,
    eligible: Option<HoleMask>,
    scratch_allocations: usize,
    last_report: Option<FillReport>,
}

impl PoissonFilling {
    /// Creates an engine with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with a custom configuration
    ///
    /// # Errors
    ///
    /// * `FillError::InvalidParameter` - If the configuration is rejected by
    ///   [`FillConfig::validate`]
    pub fn with_config(config: FillConfig) -> FillResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// How many times the scratch buffer has been (re)allocated
    pub fn scratch_allocations(&self) -> usize {
        self.scratch_allocations
    }

    /// Outcome of the latest successful request
    pub fn last_report(&self) -> Option<FillReport> {
        self.last_report
    }

    /// Fills the holes of `source` into a new or supplied buffer
    ///
    /// # Arguments
    ///
    /// * `source` - Image to fill; never modified
    /// * `output` - Buffer to reuse for the result; its previous contents and
    ///   shape are discarded. A clone of `source` is allocated when `None`.
    ///   The buffer is moved in and dropped if the request fails; use
    ///   [`PoissonFilling::fill_into`] to keep ownership on error
    /// * `hole_value` - Sentinel marking missing samples, broadcast to every channel
    ///
    /// # Returns
    ///
    /// The filled image. When the sweep cap is reached before every hole is
    /// seeded, the partial fill is returned and [`FillReport::converged`] is
    /// `false`.
    ///
    /// # Errors
    ///
    /// * `FillError::InvalidInput` - If `source` has a zero dimension, no
    ///   channels or inconsistent storage; the engine is left untouched
    pub fn fill(
        &mut self,
        source: &PixelBuffer,
        output: Option<PixelBuffer>,
        hole_value: f32,
    ) -> FillResult<PixelBuffer> {
        validate_source(source)?;
        let mut output = output.unwrap_or_else(|| source.clone());
        self.fill_into(source, &mut output, hole_value)?;
        Ok(output)
    }

    /// Fills the holes of `source` into a caller-owned buffer
    ///
    /// `output` takes the shape of `source`, reusing its storage when the
    /// size fits. On error `output` is left as it was.
    ///
    /// # Errors
    ///
    /// * `FillError::InvalidInput` - If `source` has a zero dimension, no
    ///   channels or inconsistent storage; the engine is left untouched
    pub fn fill_into(
        &mut self,
        source: &PixelBuffer,
        output: &mut PixelBuffer,
        hole_value: f32,
    ) -> FillResult<()> {
        validate_source(source)?;

        let (width, height) = source.dimensions();
        debug!(width, height, channels = source.channels(), hole_value, "poisson fill");

        let target = vec![hole_value; source.channels()];
        let mut scratch = self.prepare_scratch(source);
        let mut holes = self.holes.take().unwrap_or_else(|| HoleMask::new(width, height));
        holes.rebuild(source, &target, self.config.match_threshold)?;
        let eligible = HoleMask::clone_mask(&holes, self.eligible.take());
        output.assign(source);

        let params = SweepParams {
            hole_value,
            threshold: self.config.match_threshold,
        };

        let mut sweeps = 0;
        {
            let mut work: [&mut PixelBuffer; 2] = [&mut scratch, &mut *output];
            while !holes.is_empty() {
                let (first, second) = work.split_at_mut(1);
                let (dst, src) = if sweeps % 2 == 0 {
                    (&mut *first[0], &*second[0])
                } else {
                    (&mut *second[0], &*first[0])
                };

                let seeded = relax(src, dst, &mut holes, &eligible, params);
                sweeps += 1;
                trace!(sweep = sweeps, seeded, "relaxation sweep");

                if sweeps > self.config.max_iterations {
                    break;
                }
            }
        }

        if sweeps % 2 == 1 {
            output.assign(&scratch);
        }

        let remaining_holes = holes.hole_count();
        let report = FillReport {
            sweeps,
            converged: remaining_holes == 0,
            remaining_holes,
        };
        debug!(
            sweeps,
            converged = report.converged,
            remaining_holes,
            "poisson fill finished"
        );

        self.scratch = Some(scratch);
        self.holes = Some(holes);
        self.eligible = Some(eligible);
        self.last_report = Some(report);

        Ok(())
    }

    /// Releases the scratch buffer and both masks
    pub fn clean_up(&mut self) {
        self.scratch = None;
        self.holes = None;
        self.eligible = None;
    }

    /// Hands out the cached scratch buffer, replacing it when its shape no
    /// longer matches `source`. A stale buffer also invalidates the masks.
    fn prepare_scratch(&mut self, source: &PixelBuffer) -> PixelBuffer {
        match self.scratch.take() {
            Some(scratch) if scratch.similar_shape(source) => scratch,
            stale => {
                if stale.is_some() {
                    trace!("scratch buffer shape changed, reallocating");
                    self.clean_up();
                }
                self.scratch_allocations += 1;
                source.clone()
            }
        }
    }
}

fn validate_source(source: &PixelBuffer) -> FillResult<()> {
    if source.is_valid() {
        Ok(())
    } else {
        Err(FillError::InvalidInput {
            width: source.width(),
            height: source.height(),
            channels: source.channels(),
        })
    }
}
