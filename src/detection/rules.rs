use std::sync::Arc;

use image::GrayImage;
use log::debug;

use crate::config::{ClassificationConfig, RuleToggles};
use crate::detection::xray::PinXRay;
use crate::models::{Candidate, Classified, Verdict};

/// Read-only inputs shared by every rule evaluation of a run.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub gray: &'a GrayImage,
    pub image_area: f64,
}

impl<'a> RuleContext<'a> {
    pub fn new(gray: &'a GrayImage) -> Self {
        Self {
            gray,
            image_area: gray.width() as f64 * gray.height() as f64,
        }
    }
}

/// What a single rule decided about a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// No opinion; the next rule decides.
    Pass,
    Accept,
    Reject(Verdict),
}

/// Side measurements a rule made while evaluating one candidate.
#[derive(Debug, Clone, Default)]
pub struct Observations {
    pub pin_count: Option<usize>,
}

/// One named accept/reject check of the cascade.
pub trait ClassificationRule: Send + Sync {
    fn evaluate(&self, candidate: &Candidate, ctx: &RuleContext, observed: &mut Observations) -> RuleOutcome;

    /// Human-readable rule name, reported with each verdict.
    fn name(&self) -> &'static str;
}

/// Too small to be a part, or so large it is a shadow or the board edge.
pub struct SizeGate {
    pub min_area: f64,
    pub max_area_fraction: f64,
}

impl ClassificationRule for SizeGate {
    fn evaluate(&self, c: &Candidate, ctx: &RuleContext, _: &mut Observations) -> RuleOutcome {
        if c.area < self.min_area || c.area > self.max_area_fraction * ctx.image_area {
            RuleOutcome::Reject(Verdict::RejectedNoise)
        } else {
            RuleOutcome::Pass
        }
    }

    fn name(&self) -> &'static str {
        "Size Gate"
    }
}

pub struct DimensionGate {
    pub min_dim: u32,
}

impl ClassificationRule for DimensionGate {
    fn evaluate(&self, c: &Candidate, _: &RuleContext, _: &mut Observations) -> RuleOutcome {
        if c.width() < self.min_dim || c.height() < self.min_dim {
            RuleOutcome::Reject(Verdict::RejectedNoise)
        } else {
            RuleOutcome::Pass
        }
    }

    fn name(&self) -> &'static str {
        "Dimension Gate"
    }
}

/// Silkscreen ink is brighter than any real part surface.
pub struct BrightnessGate {
    pub bright_threshold: f64,
}

impl ClassificationRule for BrightnessGate {
    fn evaluate(&self, c: &Candidate, _: &RuleContext, _: &mut Observations) -> RuleOutcome {
        if c.mean_intensity > self.bright_threshold {
            RuleOutcome::Reject(Verdict::RejectedText)
        } else {
            RuleOutcome::Pass
        }
    }

    fn name(&self) -> &'static str {
        "Brightness Gate"
    }
}

/// Large and bright: a printed logo rather than a part.
pub struct LogoGate {
    pub min_area: f64,
    pub brightness: f64,
}

impl ClassificationRule for LogoGate {
    fn evaluate(&self, c: &Candidate, _: &RuleContext, _: &mut Observations) -> RuleOutcome {
        if c.area > self.min_area && c.mean_intensity > self.brightness {
            RuleOutcome::Reject(Verdict::RejectedText)
        } else {
            RuleOutcome::Pass
        }
    }

    fn name(&self) -> &'static str {
        "Logo Gate"
    }
}

/// Small and not dark: an exposed metal lead or pad.
pub struct PinGate {
    pub max_area: f64,
    pub metal_threshold: f64,
}

impl ClassificationRule for PinGate {
    fn evaluate(&self, c: &Candidate, _: &RuleContext, _: &mut Observations) -> RuleOutcome {
        if c.area < self.max_area && c.mean_intensity > self.metal_threshold {
            RuleOutcome::Reject(Verdict::RejectedPin)
        } else {
            RuleOutcome::Pass
        }
    }

    fn name(&self) -> &'static str {
        "Pin Gate"
    }
}

/// Round and fairly bright: a plated mounting hole.
pub struct ScrewHoleGate {
    pub round_threshold: f64,
    pub brightness: f64,
}

impl ClassificationRule for ScrewHoleGate {
    fn evaluate(&self, c: &Candidate, _: &RuleContext, _: &mut Observations) -> RuleOutcome {
        if c.circularity > self.round_threshold && c.mean_intensity > self.brightness {
            RuleOutcome::Reject(Verdict::RejectedScrewHole)
        } else {
            RuleOutcome::Pass
        }
    }

    fn name(&self) -> &'static str {
        "Screw Hole Gate"
    }
}

pub struct ShapeGate {
    pub max_aspect: f64,
    pub min_solidity: f64,
}

impl ClassificationRule for ShapeGate {
    fn evaluate(&self, c: &Candidate, _: &RuleContext, _: &mut Observations) -> RuleOutcome {
        if c.aspect_ratio > self.max_aspect || c.solidity < self.min_solidity {
            RuleOutcome::Reject(Verdict::RejectedNoise)
        } else {
            RuleOutcome::Pass
        }
    }

    fn name(&self) -> &'static str {
        "Shape Gate"
    }
}

/// Dark and large enough to be a connector: look for rows of bright pins inside it.
pub struct HeaderXRayGate {
    pub dark_threshold: f64,
    pub min_area: f64,
    pub min_pins: usize,
    pub xray: PinXRay,
}

impl ClassificationRule for HeaderXRayGate {
    fn evaluate(&self, c: &Candidate, ctx: &RuleContext, observed: &mut Observations) -> RuleOutcome {
        if c.mean_intensity >= self.dark_threshold || c.area <= self.min_area {
            return RuleOutcome::Pass;
        }
        let pins = self.xray.inspect(ctx.gray, &c.bbox);
        observed.pin_count = Some(pins);
        if pins >= self.min_pins {
            RuleOutcome::Reject(Verdict::RejectedHeader)
        } else {
            RuleOutcome::Pass
        }
    }

    fn name(&self) -> &'static str {
        "Header X-Ray Gate"
    }
}

/// Final acceptance: dark bodies, sizeable mid-tone bodies, or oversized structures.
pub struct Whitelist {
    pub dark_threshold: f64,
    pub mid_tone_max: f64,
    pub mid_area_min: f64,
    pub large_area_min: f64,
}

impl ClassificationRule for Whitelist {
    fn evaluate(&self, c: &Candidate, _: &RuleContext, _: &mut Observations) -> RuleOutcome {
        let dark_body = c.mean_intensity < self.dark_threshold;
        let mid_tone_body = c.mean_intensity >= self.dark_threshold
            && c.mean_intensity <= self.mid_tone_max
            && c.area > self.mid_area_min;
        let oversized = c.area > self.large_area_min;

        if dark_body || mid_tone_body || oversized {
            RuleOutcome::Accept
        } else {
            RuleOutcome::Reject(Verdict::RejectedNoise)
        }
    }

    fn name(&self) -> &'static str {
        "Whitelist"
    }
}

/// Ordered, short-circuiting list of rules.
///
/// Candidates that pass every rule without an explicit decision are accepted.
#[derive(Clone, Default)]
pub struct Cascade {
    rules: Vec<Arc<dyn ClassificationRule>>,
}

impl Cascade {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The standard rule order, skipping rules switched off in `toggles`.
    pub fn from_config(config: &ClassificationConfig, toggles: &RuleToggles) -> Self {
        let mut cascade = Self::new();
        if toggles.size_gate {
            cascade = cascade.add_rule(Arc::new(SizeGate {
                min_area: config.min_area,
                max_area_fraction: config.max_area_fraction,
            }));
        }
        if toggles.dimension_gate {
            cascade = cascade.add_rule(Arc::new(DimensionGate {
                min_dim: config.min_dim,
            }));
        }
        if toggles.brightness_gate {
            cascade = cascade.add_rule(Arc::new(BrightnessGate {
                bright_threshold: config.bright_threshold,
            }));
        }
        if toggles.logo_gate {
            cascade = cascade.add_rule(Arc::new(LogoGate {
                min_area: config.logo_min_area,
                brightness: config.logo_brightness,
            }));
        }
        if toggles.pin_gate {
            cascade = cascade.add_rule(Arc::new(PinGate {
                max_area: config.mid_area_threshold,
                metal_threshold: config.metal_threshold,
            }));
        }
        if toggles.screw_hole_gate {
            cascade = cascade.add_rule(Arc::new(ScrewHoleGate {
                round_threshold: config.round_threshold,
                brightness: config.hole_brightness_threshold,
            }));
        }
        if toggles.shape_gate {
            cascade = cascade.add_rule(Arc::new(ShapeGate {
                max_aspect: config.max_aspect,
                min_solidity: config.min_solidity,
            }));
        }
        if toggles.header_xray_gate {
            cascade = cascade.add_rule(Arc::new(HeaderXRayGate {
                dark_threshold: config.dark_threshold,
                min_area: config.xray_min_area,
                min_pins: config.header_min_pins,
                xray: PinXRay::new(config.pin_brightness, config.pin_noise_area),
            }));
        }
        if toggles.whitelist {
            cascade = cascade.add_rule(Arc::new(Whitelist {
                dark_threshold: config.dark_threshold,
                mid_tone_max: config.mid_tone_max,
                mid_area_min: config.mid_area_min,
                large_area_min: config.large_area_min,
            }));
        }
        cascade
    }

    pub fn add_rule(mut self, rule: Arc<dyn ClassificationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn classify(&self, candidate: Candidate, ctx: &RuleContext) -> Classified {
        let mut observed = Observations::default();
        let mut decided = (Verdict::Accepted, "Default Accept");

        for rule in &self.rules {
            match rule.evaluate(&candidate, ctx, &mut observed) {
                RuleOutcome::Pass => continue,
                RuleOutcome::Accept => {
                    decided = (Verdict::Accepted, rule.name());
                    break;
                }
                RuleOutcome::Reject(verdict) => {
                    decided = (verdict, rule.name());
                    break;
                }
            }
        }

        let (verdict, rule) = decided;
        debug!(
            "Candidate {} at ({}, {}) {}x{}: area={:.0}, mean={:.1}, solidity={:.2}, circ={:.2} -> {:?} by {}",
            candidate.index,
            candidate.bbox.x,
            candidate.bbox.y,
            candidate.bbox.width,
            candidate.bbox.height,
            candidate.area,
            candidate.mean_intensity,
            candidate.solidity,
            candidate.circularity,
            verdict,
            rule
        );

        Classified {
            candidate,
            verdict,
            rule,
            pin_count: observed.pin_count,
        }
    }
}
