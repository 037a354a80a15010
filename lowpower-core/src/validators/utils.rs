//! Shared helpers for the measurement validator
//!
//! Pure functions with no side effects, so every rule can be tested on its
//! own.
//!
//! ## Delta Computation
//!
//! The drop check compares whole units, not raw floats:
//!
//! ```text
//! delta = trunc(persisted) - trunc(new)
//!
//! persisted 20.9, new 10.1  →  20 - 10 = 10  → not above 10
//! persisted 21.0, new 10.9  →  21 - 10 = 11  → above 10
//! ```
//!
//! Sub-degree precision is discarded: the DHT22 glitches it
//! guards against are jumps of tens of degrees, not fractions.

use crate::config::{DropDirection, DropPolicy, DropRule};

/// Whole-unit change from `persisted` to `new` (positive = fell)
pub fn truncated_delta(persisted: f32, new: f32) -> i32 {
    (persisted as i32).saturating_sub(new as i32)
}

/// Whether one channel's delta counts toward a drop
pub fn exceeds(delta: i32, policy: &DropPolicy) -> bool {
    match policy.direction {
        DropDirection::Falling => delta > policy.threshold,
        DropDirection::Either => delta.saturating_abs() > policy.threshold,
    }
}

/// Combine per-channel `(persisted, new)` pairs under the policy's rule
///
/// An empty set of channels never counts as a drop.
pub fn is_drop<I>(policy: &DropPolicy, pairs: I) -> bool
where
    I: IntoIterator<Item = (f32, f32)>,
{
    let mut seen = false;
    let mut all = true;
    let mut any = false;

    for (persisted, new) in pairs {
        seen = true;
        let hit = exceeds(truncated_delta(persisted, new), policy);
        all &= hit;
        any |= hit;
    }

    match policy.rule {
        DropRule::Disabled => false,
        DropRule::All => seen && all,
        DropRule::Any => any,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(rule: DropRule, direction: DropDirection) -> DropPolicy {
        DropPolicy { threshold: 10, rule, direction }
    }

    #[test]
    fn delta_truncates_before_subtracting() {
        assert_eq!(truncated_delta(20.9, 10.1), 10);
        assert_eq!(truncated_delta(21.0, 10.9), 11);
        assert_eq!(truncated_delta(20.0, 5.0), 15);
        assert_eq!(truncated_delta(5.0, 20.0), -15);
        // Truncation is toward zero
        assert_eq!(truncated_delta(0.5, -10.9), 10);
    }

    #[test]
    fn falling_ignores_rises() {
        let falling = policy(DropRule::Any, DropDirection::Falling);
        assert!(exceeds(11, &falling));
        assert!(!exceeds(10, &falling));
        assert!(!exceeds(-30, &falling));

        let either = policy(DropRule::Any, DropDirection::Either);
        assert!(exceeds(-30, &either));
        assert!(!exceeds(-10, &either));
    }

    #[test]
    fn all_rule_needs_every_channel() {
        let all = policy(DropRule::All, DropDirection::Falling);
        assert!(is_drop(&all, [(20.0, 5.0), (60.0, 40.0)]));
        assert!(!is_drop(&all, [(20.0, 5.0), (60.0, 58.0)]));
        assert!(!is_drop(&all, core::iter::empty()));
    }

    #[test]
    fn any_rule_needs_one_channel() {
        let any = policy(DropRule::Any, DropDirection::Falling);
        assert!(is_drop(&any, [(20.0, 5.0), (60.0, 58.0)]));
        assert!(!is_drop(&any, [(20.0, 19.0), (60.0, 58.0)]));
    }

    #[test]
    fn disabled_rule_never_fires() {
        let disabled = policy(DropRule::Disabled, DropDirection::Either);
        assert!(!is_drop(&disabled, [(100.0, -40.0)]));
    }
}
