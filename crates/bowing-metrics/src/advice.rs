//! Coaching hint selection.
//!
//! Rules are checked in table order (straightness, then elbow, then shoulder)
//! and the first match wins. When nothing matches, the hint is positive.

use crate::elbow::ElbowPosition;
use crate::record::{MetricsRecord, Status};
use crate::shoulder::ShoulderLabel;

pub struct AdviceRule {
    pub name: &'static str,
    pub applies: fn(&MetricsRecord) -> bool,
    pub message: &'static str,
}

pub const ADVICE_EVEN_BOW: &str = "Excellent: straight bow and good use of the whole bow length.";
pub const ADVICE_ALL_GOOD: &str = "Good posture, keep it up.";

fn straightness_bad(r: &MetricsRecord) -> bool {
    r.straightness.status == Status::Bad
}

fn straightness_warn(r: &MetricsRecord) -> bool {
    r.straightness.status == Status::Warn
}

fn elbow_too_high(r: &MetricsRecord) -> bool {
    r.elbow.label == ElbowPosition::TooHigh
}

fn elbow_too_low(r: &MetricsRecord) -> bool {
    r.elbow.label == ElbowPosition::TooLow
}

fn elbow_slightly_low(r: &MetricsRecord) -> bool {
    r.elbow.label == ElbowPosition::SlightlyLow
}

fn shoulders_raised(r: &MetricsRecord) -> bool {
    r.shoulder.status == Status::Bad
}

fn shoulders_uneven(r: &MetricsRecord) -> bool {
    r.shoulder.label == ShoulderLabel::Uneven
}

fn shoulders_creeping(r: &MetricsRecord) -> bool {
    r.shoulder.status == Status::Warn
}

pub const ADVICE_RULES: &[AdviceRule] = &[
    AdviceRule {
        name: "straightness_bad",
        applies: straightness_bad,
        message: "The bow path is curving: keep the bow parallel to the bridge.",
    },
    AdviceRule {
        name: "straightness_warn",
        applies: straightness_warn,
        message: "Slight curve in the stroke: guide the bow in a straight line.",
    },
    AdviceRule {
        name: "elbow_too_high",
        applies: elbow_too_high,
        message: "Right elbow is too high: let it drop toward the bow's level.",
    },
    AdviceRule {
        name: "elbow_too_low",
        applies: elbow_too_low,
        message: "Right elbow is too low: lift it to the plane of the string.",
    },
    AdviceRule {
        name: "elbow_slightly_low",
        applies: elbow_slightly_low,
        message: "Elbow is a little low: raise it slightly.",
    },
    AdviceRule {
        name: "shoulders_raised",
        applies: shoulders_raised,
        message: "Shoulders are tense: breathe out and let them drop.",
    },
    AdviceRule {
        name: "shoulders_uneven",
        applies: shoulders_uneven,
        message: "Shoulders are uneven: level them and relax the neck.",
    },
    AdviceRule {
        name: "shoulders_creeping",
        applies: shoulders_creeping,
        message: "Shoulders are creeping up: relax them.",
    },
];

/// Returns exactly one hint for the record.
pub fn select_advice(record: &MetricsRecord) -> &'static str {
    ADVICE_RULES
        .iter()
        .find(|rule| (rule.applies)(record))
        .map(|rule| rule.message)
        .unwrap_or_else(|| {
            if record.distribution.label.is_even() {
                ADVICE_EVEN_BOW
            } else {
                ADVICE_ALL_GOOD
            }
        })
}
