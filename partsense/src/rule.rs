//! Pattern rules and specificity scoring
//!
//! A [`Rule`] binds one regular expression to a category and to the provider
//! that contributed it. Each rule carries a [`Specificity`] derived from the
//! structure of its pattern, so that when several rules match the same MPN
//! the narrowest one wins without anybody enumerating the conflicts.
//!
//! Patterns are matched against the normalized (upper-case) MPN and should
//! be written in upper case. Named capture groups feed attribute extraction:
//!
//! | capture   | meaning                                      |
//! |-----------|----------------------------------------------|
//! | `series`  | product series                               |
//! | `package` | package / ordering suffix                    |
//! | `rating`  | ordering attribute (voltage, grade, ...)     |
//! | `density` | memory density in Mbit                       |
//! | `pins`    | pin or position count                        |
//! | `flash`   | on-chip flash size code or KiB               |
//! | `temp`    | temperature grade code                       |

use regex::{Captures, Regex};
use regex_syntax::hir::{Class, ClassUnicode, Hir, HirKind, Look};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::ComponentCategory;
use crate::core::PartSenseError;
use crate::identifier::PartIdentifier;
use crate::provider::ProviderId;

const LITERAL_WEIGHT: u32 = 4;
const ANCHOR_WEIGHT: u32 = 6;
const MAX_REPEAT_FACTOR: u32 = 16;

/// How narrowly a pattern constrains the strings it accepts. Higher wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Specificity(pub u32);

impl Specificity {
    /// Score a pattern from its syntax tree.
    ///
    /// Literals weigh most, then narrow classes (`\d`, `[1-7]`), then broad
    /// ones (`[A-Z0-9]`, `.`). Anchors add weight, required repetitions
    /// multiply, optional parts add nothing and an alternation is only as
    /// specific as its weakest branch.
    pub fn of_pattern(pattern: &str) -> Result<Self, regex_syntax::Error> {
        // ASCII semantics first so that `\d` counts as ten digits, not every
        // Unicode decimal digit. Unicode classes such as `\p{Lu}` only parse
        // with Unicode on.
        let ascii = regex_syntax::ParserBuilder::new()
            .unicode(false)
            .utf8(false)
            .build()
            .parse(pattern);
        let hir = match ascii {
            Ok(hir) => hir,
            Err(_) => regex_syntax::ParserBuilder::new().build().parse(pattern)?,
        };
        Ok(Specificity(score(&hir)))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn score(hir: &Hir) -> u32 {
    match hir.kind() {
        HirKind::Empty => 0,
        HirKind::Literal(lit) => LITERAL_WEIGHT.saturating_mul(lit.0.len() as u32),
        HirKind::Class(class) => class_weight(class),
        HirKind::Look(Look::Start) | HirKind::Look(Look::End) => ANCHOR_WEIGHT,
        HirKind::Look(_) => 1,
        HirKind::Repetition(rep) => {
            if rep.min == 0 {
                return 0;
            }
            let bounded = u32::from(rep.max.is_some());
            score(&rep.sub)
                .saturating_mul(rep.min.min(MAX_REPEAT_FACTOR))
                .saturating_add(bounded)
        }
        HirKind::Capture(cap) => score(&cap.sub),
        HirKind::Concat(subs) => subs.iter().map(score).fold(0, u32::saturating_add),
        HirKind::Alternation(subs) => subs.iter().map(score).min().unwrap_or(0),
    }
}

fn class_weight(class: &Class) -> u32 {
    let breadth: u32 = match class {
        // Weighed by ASCII members, the alphabet MPNs are written in.
        Class::Unicode(cls) => match unicode_breadth(cls, 0x7F) {
            0 => unicode_breadth(cls, u32::MAX),
            ascii => ascii,
        },
        Class::Bytes(cls) => cls
            .ranges()
            .iter()
            .map(|r| u32::from(r.end() - r.start()) + 1)
            .sum(),
    };
    match breadth {
        0 | 1 => LITERAL_WEIGHT,
        2..=10 => 3,
        11..=36 => 2,
        _ => 1,
    }
}

fn unicode_breadth(cls: &ClassUnicode, limit: u32) -> u32 {
    cls.ranges()
        .iter()
        .filter(|r| r.start() as u32 <= limit)
        .map(|r| (r.end() as u32).min(limit) - r.start() as u32 + 1)
        .fold(0, u32::saturating_add)
}

/// One pattern bound to a category and its owning provider.
#[derive(Debug, Clone)]
pub struct Rule {
    provider: ProviderId,
    category: ComponentCategory,
    pattern: Regex,
    specificity: Specificity,
}

impl Rule {
    pub fn new(
        provider: &ProviderId,
        category: ComponentCategory,
        pattern: &str,
    ) -> Result<Self, PartSenseError> {
        let invalid = |message: String| PartSenseError::InvalidPattern {
            provider: provider.to_string(),
            pattern: pattern.to_string(),
            message,
        };
        let regex = Regex::new(pattern).map_err(|e| invalid(e.to_string()))?;
        let specificity = Specificity::of_pattern(pattern).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            provider: provider.clone(),
            category,
            pattern: regex,
            specificity,
        })
    }

    /// Replace the computed specificity with an explicit score.
    pub fn with_specificity(mut self, specificity: Specificity) -> Self {
        self.specificity = specificity;
        self
    }

    pub fn provider(&self) -> &ProviderId {
        &self.provider
    }

    pub fn category(&self) -> ComponentCategory {
        self.category
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    pub fn is_match(&self, id: &PartIdentifier) -> bool {
        !id.is_empty() && self.pattern.is_match(id.normalized())
    }

    pub fn captures<'r, 'h>(&'r self, id: &'h PartIdentifier) -> Option<RuleMatch<'r, 'h>> {
        if id.is_empty() {
            return None;
        }
        self.pattern
            .captures(id.normalized())
            .map(|captures| RuleMatch { rule: self, captures })
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.provider == other.provider
            && self.category == other.category
            && self.pattern.as_str() == other.pattern.as_str()
            && self.specificity == other.specificity
    }
}

impl Eq for Rule {}

/// A successful match of a rule against an identifier.
#[derive(Debug)]
pub struct RuleMatch<'r, 'h> {
    rule: &'r Rule,
    captures: Captures<'h>,
}

impl<'r, 'h> RuleMatch<'r, 'h> {
    pub fn rule(&self) -> &'r Rule {
        self.rule
    }

    pub fn category(&self) -> ComponentCategory {
        self.rule.category
    }

    /// Text of a named capture; `None` when absent or empty.
    pub fn get(&self, name: &str) -> Option<&'h str> {
        self.captures
            .name(name)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
    }

    /// A named capture parsed as a number.
    pub fn get_number(&self, name: &str) -> Option<u32> {
        self.get(name).and_then(|s| s.parse().ok())
    }
}

/// The most specific rule in `rules` that matches `id`. Ties go to the
/// earlier rule.
pub fn best_match<'r, 'h>(
    rules: impl IntoIterator<Item = &'r Rule>,
    id: &'h PartIdentifier,
) -> Option<RuleMatch<'r, 'h>> {
    let mut best: Option<RuleMatch<'r, 'h>> = None;
    for rule in rules {
        if best
            .as_ref()
            .is_some_and(|b| b.rule.specificity >= rule.specificity)
        {
            continue;
        }
        if let Some(m) = rule.captures(id) {
            best = Some(m);
        }
    }
    best
}
