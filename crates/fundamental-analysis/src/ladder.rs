//! Threshold ladders
//!
//! A ladder is an ordered list of bands evaluated top-down; the first band
//! whose bound holds wins. Each evaluation yields the awarded points and one
//! rationale line, so every criterion is documented exactly once.

/// Bound on the metric value. Strict variants exclude the cutoff itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Above(f64),
    AtLeast(f64),
    Below(f64),
    AtMost(f64),
}

impl Bound {
    pub fn holds(&self, value: f64) -> bool {
        match *self {
            Bound::Above(cut) => value > cut,
            Bound::AtLeast(cut) => value >= cut,
            Bound::Below(cut) => value < cut,
            Bound::AtMost(cut) => value <= cut,
        }
    }
}

/// How a metric value is rendered in the rationale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Percent,
    Multiple,
    Plain,
    Count,
}

impl Unit {
    pub fn format(&self, value: f64) -> String {
        match self {
            Unit::Percent => format!("{:.1}%", value),
            Unit::Multiple => format!("{:.2}x", value),
            Unit::Plain => format!("{:.2}", value),
            Unit::Count => format!("{:.0}", value),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub bound: Bound,
    pub points: i32,
    pub verdict: &'static str,
}

impl Band {
    pub const fn new(bound: Bound, points: i32, verdict: &'static str) -> Self {
        Self { bound, points, verdict }
    }
}

/// Outcome of one criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub points: i32,
    pub rationale: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Ladder<'a> {
    pub metric: &'a str,
    pub unit: Unit,
    pub bands: &'a [Band],
    /// Verdict when no band matches (0 points)
    pub otherwise: &'a str,
}

impl<'a> Ladder<'a> {
    pub const fn new(metric: &'a str, unit: Unit, bands: &'a [Band], otherwise: &'a str) -> Self {
        Self { metric, unit, bands, otherwise }
    }

    pub fn evaluate(&self, value: f64) -> Assessment {
        let shown = self.unit.format(value);
        match self.bands.iter().find(|band| band.bound.holds(value)) {
            Some(band) => Assessment {
                points: band.points,
                rationale: rationale_line(band.points, &format!("{} {} ({})", self.metric, band.verdict, shown)),
            },
            None => Assessment {
                points: 0,
                rationale: rationale_line(0, &format!("{} {} ({})", self.metric, self.otherwise, shown)),
            },
        }
    }
}

/// Render a rationale entry: marker, description, awarded points.
pub fn rationale_line(points: i32, text: &str) -> String {
    let marker = if points > 0 {
        "✅"
    } else if points < 0 {
        "❌"
    } else {
        "⚪"
    };
    format!("{} {} ({:+} pts)", marker, text, points)
}

/// Accumulates criteria for one pillar and enforces its maximum.
#[derive(Debug)]
pub struct PillarTally {
    pub name: &'static str,
    pub max: i32,
    pub points: i32,
    pub rationale: Vec<String>,
}

impl PillarTally {
    pub fn new(name: &'static str, max: i32) -> Self {
        Self {
            name,
            max,
            points: 0,
            rationale: Vec::new(),
        }
    }

    pub fn add(&mut self, assessment: Assessment) {
        self.points += assessment.points;
        self.rationale.push(assessment.rationale);
    }

    /// Points capped at the pillar maximum. The floor is left alone so that
    /// penalties can drive a pillar negative.
    pub fn capped(&self) -> i32 {
        self.points.min(self.max)
    }
}
