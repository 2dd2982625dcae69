use std::sync::Arc;

use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::domain::{DockPose, Individual};
use crate::engine::codec::StructureCodec;
use crate::engine::metrics::QualityEvaluator;
use crate::engine::monitor::StructureMonitor;
use crate::engine::refine::{
    McmConfig, McmProtocol, ProtocolError, RefinementEngine, SymmetricMcm,
};
use crate::engine::scoring::ScoreFunction;
use crate::engine::slide::{ContactSlider, PairwiseSlide, SlideCriterion, SymmetricSlide};

/// What the per-candidate pipeline does between scoring passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Only score and return the candidate.
    None,
    /// Contact resolution without refinement.
    SlideOnly,
    /// Contact resolution followed by Monte-Carlo-minimization.
    Full,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("strategy {0:?} requires a refinement protocol, but none was configured")]
    MissingProtocol(Strategy),
    #[error("slide criterion {0:?} is only meaningful for a symmetric assembly")]
    SymmetryMismatch(SlideCriterion),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalSearchConfig {
    pub strategy: Strategy,
    /// Slide into contact before refinement.
    pub slide: bool,
    /// Stop condition for the symmetric slide. Must be left unset for
    /// asymmetric systems; defaults to first contact when symmetric.
    pub slide_criterion: Option<SlideCriterion>,
    /// Refinement protocol; required when `strategy` is [`Strategy::Full`].
    pub protocol: Option<McmConfig>,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Full,
            slide: true,
            slide_criterion: None,
            protocol: Some(McmConfig::default()),
        }
    }
}

/// The result of one pipeline invocation.
#[derive(Debug, Clone)]
pub struct LocalSearchOutcome {
    pub individual: Individual,
    /// Score immediately after decoding, before any mutation.
    pub before: f64,
    /// Score after the pipeline; equals `before` when nothing ran.
    pub after: f64,
}

/// Per-candidate refinement pipeline: decode, score, resolve contact,
/// refine, re-score, compute quality metrics, encode.
///
/// The contact-slider and refinement-engine variants are chosen once at
/// construction from the native structure's symmetry and the configured
/// strategy, and stay fixed for the orchestrator's lifetime. Each call
/// decodes its own pose, so concurrent `process` calls are independent.
///
/// Refinement draws on a random source: repeated calls on the same
/// genotype may yield different `after` scores unless the caller goes
/// through [`LocalSearch::process_with_rng`] with a seeded generator.
pub struct LocalSearch {
    codec: Arc<dyn StructureCodec>,
    strategy: Strategy,
    slider: Option<ContactSlider>,
    engine: Option<RefinementEngine>,
    quality: QualityEvaluator,
    monitor: Option<StructureMonitor>,
    symmetric: bool,
}

impl LocalSearch {
    pub fn new(
        codec: Arc<dyn StructureCodec>,
        score: Arc<ScoreFunction>,
        config: LocalSearchConfig,
        monitor: Option<StructureMonitor>,
    ) -> Result<Self, ConfigError> {
        let native = codec.native();
        let symmetric = native.symmetry().is_some();

        if !symmetric {
            if let Some(criterion) = config.slide_criterion {
                return Err(ConfigError::SymmetryMismatch(criterion));
            }
        }

        let slider = if config.strategy != Strategy::None && config.slide {
            Some(if symmetric {
                let criterion = config.slide_criterion.unwrap_or(SlideCriterion::Contact);
                ContactSlider::Symmetric(SymmetricSlide::new(criterion, Arc::clone(&score)))
            } else {
                ContactSlider::Pairwise(PairwiseSlide::new(Arc::clone(&score)))
            })
        } else {
            None
        };

        let engine = match config.strategy {
            Strategy::Full => {
                let cfg = config
                    .protocol
                    .ok_or(ConfigError::MissingProtocol(Strategy::Full))?;
                Some(match native.symmetry() {
                    Some(sym) => RefinementEngine::Symmetric(SymmetricMcm::new(
                        cfg,
                        sym.order(),
                        Arc::clone(&score),
                    )?),
                    None => RefinementEngine::Pairwise(McmProtocol::new(cfg, Arc::clone(&score))?),
                })
            }
            _ => None,
        };

        let quality = QualityEvaluator::new(native, score);

        Ok(Self {
            codec,
            strategy: config.strategy,
            slider,
            engine,
            quality,
            monitor,
            symmetric,
        })
    }

    /// Symmetry mode, read once from the native structure at construction.
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Genotype arity the codec expects.
    pub fn genotype_len(&self) -> usize {
        self.codec.native().placement().dof()
    }

    /// Runs the pipeline with a thread-local random source.
    pub fn process(&self, genotype: &[f64], local_search: bool) -> Result<LocalSearchOutcome> {
        self.process_with_rng(genotype, local_search, &mut rand::thread_rng())
    }

    /// Runs the pipeline with a caller-supplied random source, making the
    /// stochastic refinement reproducible for a seeded generator.
    ///
    /// Decode failures and other unexpected faults propagate; a slide or
    /// refinement that fails to converge is reflected only in the scores.
    pub fn process_with_rng(
        &self,
        genotype: &[f64],
        local_search: bool,
        rng: &mut impl Rng,
    ) -> Result<LocalSearchOutcome> {
        let mut pose = self.codec.decode(genotype)?;
        let before = self.codec.score(&pose);

        let mut refined = false;
        if local_search && self.strategy != Strategy::None {
            self.emit(&pose, "init");
            if let Some(slider) = &self.slider {
                slider.apply(&mut pose);
                self.emit(&pose, "post_slide");
                refined = true;
            }
            if let Some(engine) = &self.engine {
                engine.apply(&mut pose, rng);
                self.emit(&pose, "post_refinement");
                refined = true;
            }
        }
        let after = if refined { self.codec.score(&pose) } else { before };

        let metrics = self.quality.evaluate(&pose);
        let genotype_out = self.codec.encode(&pose);
        let individual = Individual::new(
            genotype_out,
            after,
            metrics.rmsd,
            metrics.interaction_energy,
            metrics.interface_rmsd,
        );

        log::debug!(
            "local search: before {:.3} after {:.3} rmsd {:.3}",
            before,
            after,
            metrics.rmsd
        );

        Ok(LocalSearchOutcome {
            individual,
            before,
            after,
        })
    }

    fn emit(&self, pose: &DockPose, label: &str) {
        if let Some(monitor) = &self.monitor {
            monitor.emit(pose, label);
        }
    }
}
