/// The Boolean operator applied between subject and clip regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    Intersection,
    Union,
    Difference,
    Xor,
}

/// Rule deciding which winding numbers count as "inside".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Odd winding numbers are inside.
    #[default]
    EvenOdd,
    /// Any non-zero winding number is inside.
    NonZero,
    /// Winding numbers above zero are inside.
    Positive,
    /// Winding numbers below zero are inside.
    Negative,
}

impl FillRule {
    /// `true` when a region with winding count `wind` is filled under this rule.
    ///
    /// Even-odd counts are kept as 0/1 by the sweep, so any non-zero value is
    /// filled.
    #[must_use]
    pub fn is_inside(self, wind: i32) -> bool {
        match self {
            Self::EvenOdd | Self::NonZero => wind != 0,
            Self::Positive => wind > 0,
            Self::Negative => wind < 0,
        }
    }

    /// Winding count folded so that "entering a filled region" reads as 1.
    pub(crate) fn normalized(self, wind: i32) -> i32 {
        match self {
            Self::Positive => wind,
            Self::Negative => -wind,
            Self::EvenOdd | Self::NonZero => wind.abs(),
        }
    }
}

/// Role a path plays in a Boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    Subject,
    Clip,
}

/// Fill rules for both roles of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillRules {
    pub subject: FillRule,
    pub clip: FillRule,
}

impl FillRules {
    /// Creates a pair of fill rules.
    #[must_use]
    pub fn new(subject: FillRule, clip: FillRule) -> Self {
        Self { subject, clip }
    }

    /// Returns `(own, other)` fill rules for an edge of `role`.
    pub(crate) fn for_role(self, role: PathRole) -> (FillRule, FillRule) {
        match role {
            PathRole::Subject => (self.subject, self.clip),
            PathRole::Clip => (self.clip, self.subject),
        }
    }
}

/// Decides whether an edge with the given winding state bounds the result.
///
/// `wind_cnt` is the edge's own-role winding count, `wind_cnt2` the winding of
/// the other role at the edge. Open-path edges have `wind_delta == 0`.
///
/// | Operator     | own region filled and other role is... |
/// |--------------|-----------------------------------------|
/// | Intersection | inside                                  |
/// | Union        | outside                                 |
/// | Difference   | outside (subject), inside (clip)        |
/// | Xor          | anything (closed), outside (open)       |
#[must_use]
pub(crate) fn is_contributing(
    op: BoolOp,
    role: PathRole,
    fills: FillRules,
    wind_delta: i32,
    wind_cnt: i32,
    wind_cnt2: i32,
) -> bool {
    let (own, other) = fills.for_role(role);
    let filled = match own {
        // An open subject line flagged as inside a subject polygon.
        FillRule::EvenOdd => wind_delta != 0 || wind_cnt == 1,
        FillRule::NonZero => wind_cnt.abs() == 1,
        FillRule::Positive => wind_cnt == 1,
        FillRule::Negative => wind_cnt == -1,
    };
    if !filled {
        return false;
    }

    let inside_other = other.is_inside(wind_cnt2);
    match op {
        BoolOp::Intersection => inside_other,
        BoolOp::Union => !inside_other,
        BoolOp::Difference => match role {
            PathRole::Subject => !inside_other,
            PathRole::Clip => inside_other,
        },
        BoolOp::Xor => wind_delta != 0 || !inside_other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVEN_ODD: FillRules = FillRules {
        subject: FillRule::EvenOdd,
        clip: FillRule::EvenOdd,
    };

    #[test]
    fn union_keeps_edges_outside_other_role() {
        assert!(is_contributing(BoolOp::Union, PathRole::Subject, EVEN_ODD, 1, 1, 0));
        assert!(!is_contributing(BoolOp::Union, PathRole::Subject, EVEN_ODD, 1, 1, 1));
        assert!(is_contributing(BoolOp::Union, PathRole::Clip, EVEN_ODD, -1, 1, 0));
    }

    #[test]
    fn intersection_keeps_edges_inside_other_role() {
        assert!(is_contributing(BoolOp::Intersection, PathRole::Subject, EVEN_ODD, 1, 1, 1));
        assert!(!is_contributing(BoolOp::Intersection, PathRole::Clip, EVEN_ODD, 1, 1, 0));
    }

    #[test]
    fn difference_is_asymmetric() {
        assert!(is_contributing(BoolOp::Difference, PathRole::Subject, EVEN_ODD, 1, 1, 0));
        assert!(!is_contributing(BoolOp::Difference, PathRole::Subject, EVEN_ODD, 1, 1, 1));
        assert!(is_contributing(BoolOp::Difference, PathRole::Clip, EVEN_ODD, 1, 1, 1));
        assert!(!is_contributing(BoolOp::Difference, PathRole::Clip, EVEN_ODD, 1, 1, 0));
    }

    #[test]
    fn xor_keeps_all_closed_edges() {
        assert!(is_contributing(BoolOp::Xor, PathRole::Subject, EVEN_ODD, 1, 1, 1));
        assert!(is_contributing(BoolOp::Xor, PathRole::Clip, EVEN_ODD, -1, 1, 0));
        assert!(!is_contributing(BoolOp::Xor, PathRole::Subject, EVEN_ODD, 0, 1, 1));
    }

    #[test]
    fn own_fill_rule_gates_contribution() {
        let non_zero = FillRules::new(FillRule::NonZero, FillRule::NonZero);
        assert!(is_contributing(BoolOp::Union, PathRole::Subject, non_zero, 1, -1, 0));
        assert!(!is_contributing(BoolOp::Union, PathRole::Subject, non_zero, 1, 2, 0));

        let positive = FillRules::new(FillRule::Positive, FillRule::EvenOdd);
        assert!(is_contributing(BoolOp::Union, PathRole::Subject, positive, 1, 1, 0));
        assert!(!is_contributing(BoolOp::Union, PathRole::Subject, positive, 1, -1, 0));

        let negative = FillRules::new(FillRule::Negative, FillRule::EvenOdd);
        assert!(is_contributing(BoolOp::Union, PathRole::Subject, negative, -1, -1, 0));
    }

    #[test]
    fn open_line_inside_even_odd_subject_is_suppressed() {
        assert!(!is_contributing(BoolOp::Union, PathRole::Subject, EVEN_ODD, 0, 0, 0));
        assert!(is_contributing(BoolOp::Union, PathRole::Subject, EVEN_ODD, 0, 1, 0));
    }

    #[test]
    fn other_role_fill_rule_sign() {
        let rules = FillRules::new(FillRule::EvenOdd, FillRule::Positive);
        assert!(is_contributing(BoolOp::Intersection, PathRole::Subject, rules, 1, 1, 2));
        assert!(!is_contributing(BoolOp::Intersection, PathRole::Subject, rules, 1, 1, -1));
        assert_eq!(FillRule::Negative.normalized(-3), 3);
        assert_eq!(FillRule::NonZero.normalized(-3), 3);
        assert_eq!(FillRule::Positive.normalized(-3), -3);
    }
}
