//! A small rule algebra evaluated over the children of one element.
//!
//! Rules never look at the source tree through anything but a [`Cursor`]. A
//! trial match runs on a cursor copy and consults only the identity guards of
//! literals; content checks run once, when a match is committed against the
//! real cursor, and are the only source of diagnostics.

use super::*;

/// Identity test (tag, id, class) deciding whether a literal matches.
pub type NodeGuard = Box<dyn Fn(&Node) -> bool>;
/// Content check run on a committed match.
pub type NodeCheck = Box<dyn Fn(&Node, &mut Diagnostics)>;

/// Position within an ordered run of sibling elements.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    nodes: &'a [Node],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        Self { nodes, position: 0 }
    }

    pub fn peek(&self) -> Option<&'a Node> {
        self.nodes.get(self.position)
    }

    pub fn advance(&mut self) {
        if self.position < self.nodes.len() {
            self.position += 1;
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.nodes.len()
    }

    pub fn remaining(&self) -> &'a [Node] {
        &self.nodes[self.position.min(self.nodes.len())..]
    }

    pub fn skip_remaining(&mut self) {
        self.position = self.nodes.len();
    }
}

pub enum GrammarRule {
    /// Consumes one element accepted by `guard`, then reports problems with
    /// its content through `check`.
    Literal {
        name: String,
        guard: NodeGuard,
        check: Option<NodeCheck>,
    },
    /// Rules applied in order against one cursor. Leftover elements fail the
    /// sequence and are reported under `name`.
    Sequence { name: String, rules: Vec<GrammarRule> },
    /// Between `min` and `max` consecutive matches of `rule`. Nothing is
    /// consumed unless the count is satisfied.
    Repeat {
        rule: Box<GrammarRule>,
        min: usize,
        max: Option<usize>,
        missing: Option<String>,
    },
    /// Non-consuming classifier: true when any alternative would match.
    OneOf(Vec<GrammarRule>),
}

impl GrammarRule {
    pub fn literal<G>(name: impl Into<String>, guard: G) -> Self
    where
        G: Fn(&Node) -> bool + 'static,
    {
        Self::Literal {
            name: name.into(),
            guard: Box::new(guard),
            check: None,
        }
    }

    /// Content check for a literal; other rules are returned unchanged.
    pub fn with_check<C>(self, check: C) -> Self
    where
        C: Fn(&Node, &mut Diagnostics) + 'static,
    {
        match self {
            Self::Literal { name, guard, .. } => Self::Literal {
                name,
                guard,
                check: Some(Box::new(check)),
            },
            other => other,
        }
    }

    pub fn sequence(name: impl Into<String>, rules: Vec<GrammarRule>) -> Self {
        Self::Sequence {
            name: name.into(),
            rules,
        }
    }

    pub fn repeat(rule: GrammarRule, min: usize, max: Option<usize>) -> Self {
        Self::Repeat {
            rule: Box::new(rule),
            min,
            max,
            missing: None,
        }
    }

    pub fn optional(rule: GrammarRule) -> Self {
        Self::repeat(rule, 0, Some(1))
    }

    pub fn zero_or_more(rule: GrammarRule) -> Self {
        Self::repeat(rule, 0, None)
    }

    pub fn one_or_more(rule: GrammarRule) -> Self {
        Self::repeat(rule, 1, None)
    }

    pub fn exactly_one(rule: GrammarRule) -> Self {
        Self::repeat(rule, 1, Some(1))
    }

    pub fn one_of(rules: Vec<GrammarRule>) -> Self {
        Self::OneOf(rules)
    }

    /// Message reported instead of the count mismatch when a `Repeat` finds
    /// no match at all.
    pub fn or_missing(self, message: impl Into<String>) -> Self {
        match self {
            Self::Repeat { rule, min, max, .. } => Self::Repeat {
                rule,
                min,
                max,
                missing: Some(message.into()),
            },
            other => other,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Literal { name, .. } | Self::Sequence { name, .. } => name.clone(),
            Self::Repeat { rule, .. } => rule.describe(),
            Self::OneOf(rules) => rules
                .iter()
                .map(GrammarRule::describe)
                .collect::<Vec<String>>()
                .join(" or "),
        }
    }

    pub fn evaluate(&self, cursor: &mut Cursor<'_>, diagnostics: &mut Diagnostics) -> bool {
        match self {
            Self::Literal { guard, check, .. } => match cursor.peek() {
                Some(node) if guard(node) => {
                    if let Some(check) = check {
                        check(node, diagnostics);
                    }
                    cursor.advance();
                    true
                }
                _ => false,
            },
            Self::Sequence { name, rules } => evaluate_sequence(name, rules, cursor, diagnostics),
            Self::Repeat {
                rule,
                min,
                max,
                missing,
            } => evaluate_repeat(rule, *min, *max, missing.as_deref(), cursor, diagnostics),
            Self::OneOf(_) => self.select(cursor).is_some(),
        }
    }

    /// First alternative of a `OneOf` that matches at the cursor, with its
    /// index. Any other rule is treated as a single alternative.
    pub fn select(&self, cursor: &Cursor<'_>) -> Option<(usize, &GrammarRule)> {
        let alternatives = match self {
            Self::OneOf(rules) => rules.as_slice(),
            other => std::slice::from_ref(other),
        };

        alternatives
            .iter()
            .enumerate()
            .find(|(_, alternative)| alternative.matches_at(cursor))
    }

    /// Trial application on a copy of the cursor; nothing is logged or consumed.
    pub fn matches_at(&self, cursor: &Cursor<'_>) -> bool {
        let mut trial = *cursor;
        self.try_match(&mut trial)
    }

    /// Same acceptance as [`GrammarRule::evaluate`], decided on guards alone.
    fn try_match(&self, cursor: &mut Cursor<'_>) -> bool {
        match self {
            Self::Literal { guard, .. } => match cursor.peek() {
                Some(node) if guard(node) => {
                    cursor.advance();
                    true
                }
                _ => false,
            },
            Self::Sequence { rules, .. } => {
                let mut matched = true;
                for rule in rules {
                    matched &= rule.try_match(cursor);
                }
                matched &= cursor.is_exhausted();
                cursor.skip_remaining();
                matched
            }
            Self::Repeat { rule, min, max, .. } => {
                let (count, end) = count_matches(rule, *max, *cursor);
                if count < *min {
                    return false;
                }
                *cursor = end;
                true
            }
            Self::OneOf(_) => self.select(cursor).is_some(),
        }
    }

    fn reports_own_failure(&self) -> bool {
        matches!(self, Self::Repeat { .. } | Self::Sequence { .. })
    }
}

fn evaluate_sequence(
    name: &str,
    rules: &[GrammarRule],
    cursor: &mut Cursor<'_>,
    diagnostics: &mut Diagnostics,
) -> bool {
    let mut matched = true;

    // A failed rule does not stop the scan; later rules still get their chance.
    for rule in rules {
        if rule.evaluate(cursor, diagnostics) {
            continue;
        }
        matched = false;
        if !rule.reports_own_failure() {
            diagnostics.error(
                format!("{name}: expected {}", rule.describe()),
                cursor.peek(),
            );
        }
    }

    if !cursor.is_exhausted() {
        let remaining = cursor.remaining();
        let unknown = remaining
            .iter()
            .map(Node::label)
            .collect::<Vec<&str>>()
            .join(" ");
        diagnostics.error(
            format!("{name} contains out of order or unknown elements: {unknown}"),
            remaining.first(),
        );
        cursor.skip_remaining();
        matched = false;
    }

    matched
}

fn evaluate_repeat(
    rule: &GrammarRule,
    min: usize,
    max: Option<usize>,
    missing: Option<&str>,
    cursor: &mut Cursor<'_>,
    diagnostics: &mut Diagnostics,
) -> bool {
    let (count, _) = count_matches(rule, max, *cursor);

    if count < min {
        let message = match missing {
            Some(message) if count == 0 => message.to_string(),
            _ => format!(
                "expected {} {}, found {count}",
                bounds_label(min, max),
                rule.describe()
            ),
        };
        diagnostics.error(message, cursor.peek());
        return false;
    }

    // Replay against the real cursor so committed matches report their findings.
    for _ in 0..count {
        rule.evaluate(cursor, diagnostics);
    }

    true
}

/// Consecutive trial matches of `rule` from `start`, capped at `max`, with the
/// cursor after the last one.
fn count_matches<'a>(
    rule: &GrammarRule,
    max: Option<usize>,
    start: Cursor<'a>,
) -> (usize, Cursor<'a>) {
    let mut trial = start;
    let mut count = 0_usize;

    // Trials stop at `max`; surplus siblings are left for the enclosing rule.
    while !trial.is_exhausted() && max.is_none_or(|limit| count < limit) {
        let mut attempt = trial;
        if !rule.try_match(&mut attempt) {
            break;
        }
        let progressed = attempt.position() > trial.position();
        trial = attempt;
        count += 1;
        if !progressed {
            break;
        }
    }

    (count, trial)
}

fn bounds_label(min: usize, max: Option<usize>) -> String {
    match max {
        Some(max) if max == min => format!("exactly {min}"),
        Some(max) if min == 0 => format!("at most {max}"),
        Some(max) => format!("between {min} and {max}"),
        None => format!("at least {min}"),
    }
}
