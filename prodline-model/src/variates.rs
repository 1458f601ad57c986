//! The five delay draws of the line.
//!
//! Each draw site has its own seeded stream, derived from the run seed, so
//! swapping one distribution for a scripted one leaves the others' sequences
//! untouched.

use prodline_core::{DrawSite, RandomStreams, SimError, TimeDistribution};

use crate::config::LineConfig;

pub const INTER_ARRIVAL_SITE: DrawSite = DrawSite::new("line.inter_arrival");
pub const PROCESSING_SITE: DrawSite = DrawSite::new("line.processing");
pub const PREPARATION_SITE: DrawSite = DrawSite::new("line.preparation");
pub const BREAKDOWN_SITE: DrawSite = DrawSite::new("line.inter_breakdown");
pub const REPAIR_SITE: DrawSite = DrawSite::new("line.repair");

pub struct RandomVariateSource {
    inter_arrival: Box<dyn TimeDistribution>,
    processing: Box<dyn TimeDistribution>,
    preparation: Box<dyn TimeDistribution>,
    inter_breakdown: Box<dyn TimeDistribution>,
    repair: Box<dyn TimeDistribution>,
}

impl std::fmt::Debug for RandomVariateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomVariateSource")
            .field("inter_arrival_mean", &self.inter_arrival.mean())
            .field("processing_mean", &self.processing.mean())
            .field("preparation_mean", &self.preparation.mean())
            .field("inter_breakdown_mean", &self.inter_breakdown.mean())
            .field("repair_mean", &self.repair.mean())
            .finish()
    }
}

impl RandomVariateSource {
    /// Builds the configured distributions, each on its own stream.
    pub fn from_config(config: &LineConfig) -> Result<Self, SimError> {
        config.validate()?;
        let streams = RandomStreams::new(config.seed);
        Ok(Self {
            inter_arrival: config
                .inter_arrival_spec()
                .build(streams.seed_for(INTER_ARRIVAL_SITE))?,
            processing: config.processing_spec().build(streams.seed_for(PROCESSING_SITE))?,
            preparation: config.preparation_spec().build(streams.seed_for(PREPARATION_SITE))?,
            inter_breakdown: config.breakdown_spec().build(streams.seed_for(BREAKDOWN_SITE))?,
            repair: config.repair_spec().build(streams.seed_for(REPAIR_SITE))?,
        })
    }

    pub fn with_inter_arrival(mut self, dist: impl TimeDistribution + 'static) -> Self {
        self.inter_arrival = Box::new(dist);
        self
    }

    pub fn with_processing(mut self, dist: impl TimeDistribution + 'static) -> Self {
        self.processing = Box::new(dist);
        self
    }

    pub fn with_preparation(mut self, dist: impl TimeDistribution + 'static) -> Self {
        self.preparation = Box::new(dist);
        self
    }

    pub fn with_inter_breakdown(mut self, dist: impl TimeDistribution + 'static) -> Self {
        self.inter_breakdown = Box::new(dist);
        self
    }

    pub fn with_repair(mut self, dist: impl TimeDistribution + 'static) -> Self {
        self.repair = Box::new(dist);
        self
    }

    pub fn inter_arrival(&mut self) -> f64 {
        self.inter_arrival.sample()
    }

    pub fn processing(&mut self) -> f64 {
        self.processing.sample()
    }

    pub fn preparation(&mut self) -> f64 {
        self.preparation.sample()
    }

    pub fn inter_breakdown(&mut self) -> f64 {
        self.inter_breakdown.sample()
    }

    pub fn repair(&mut self) -> f64 {
        self.repair.sample()
    }
}
