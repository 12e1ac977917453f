use crate::classifier::Rule;
use crate::types::ItemKind;

// ---------------------------------------------------------------------------
// Helper macro for concise rule definitions
// ---------------------------------------------------------------------------

macro_rules! rule {
    (id: $id:expr, kind: $kind:expr, matches: $matches:expr $(,)?) => {
        Rule {
            id: $id,
            kind: $kind,
            matches: $matches,
        }
    };
}

// ---------------------------------------------------------------------------
// Line shape helpers
//
// Every predicate receives a line that has already been trimmed.
// ---------------------------------------------------------------------------

/// Markdown heading with one to four leading `#`.
fn is_heading(line: &str) -> bool {
    regex!(r"^#{1,4}([^#]|$)").is_match(line)
}

fn is_numbered(line: &str) -> bool {
    regex!(r"^(\*\*)?\d+[.)]").is_match(line)
}

fn is_bullet(line: &str) -> bool {
    regex!(r"^[-*•+]\s+").is_match(line)
}

fn has_emphasis(line: &str) -> bool {
    regex!(r"\*\*[^*]+\*\*|__[^_]+__").is_match(line)
}

fn is_emphasized_bullet(line: &str) -> bool {
    is_bullet(line) && has_emphasis(line)
}

fn has_percentage(line: &str) -> bool {
    regex!(r"\d+(\.\d+)?\s*%").is_match(line)
}

fn mentions_learning_objective(line: &str) -> bool {
    regex!(r"(?i)learning\s+objective").is_match(line)
}

// ---------------------------------------------------------------------------
// Business objective
// ---------------------------------------------------------------------------

fn bo_heading_keyword(line: &str) -> bool {
    is_heading(line)
        && regex!(r"(?i)business\s+objective|intended\s+business\s+outcome|\bibos?\b")
            .is_match(line)
}

fn bo_heading_code(line: &str) -> bool {
    regex!(r"^#{1,4}\s*(\*\*)?\s*BO\d+").is_match(line)
}

fn bo_heading_numbered(line: &str) -> bool {
    regex!(r"(?i)^#{1,4}\s*(\*\*)?\s*\d+\.\s*(\*\*)?\s*business").is_match(line)
}

// ---------------------------------------------------------------------------
// WIIFM
// ---------------------------------------------------------------------------

fn wiifm_heading(line: &str) -> bool {
    is_heading(line)
        && regex!(r"(?i)wiifm|what['’]s\s+in\s+it\s+for\s+me|value\s+proposition").is_match(line)
}

// ---------------------------------------------------------------------------
// Performance metric
// ---------------------------------------------------------------------------

fn pm_heading(line: &str) -> bool {
    is_heading(line)
        && regex!(r"(?i)performance\s+metric|success\s+metric|\bkpis?\b").is_match(line)
}

fn pm_list_percentage(line: &str) -> bool {
    (is_numbered(line) || is_bullet(line)) && has_percentage(line)
}

fn pm_numbered_change(line: &str) -> bool {
    regex!(r"(?i)^(\*\*)?\d+[.)]\s*(\*\*)?\s*(increase|improvement|reduction|enhancement)")
        .is_match(line)
}

fn pm_percent_increase(line: &str) -> bool {
    line.contains('%') && regex!(r"(?i)increase|improvement").is_match(line)
}

// ---------------------------------------------------------------------------
// Observable behavior
// ---------------------------------------------------------------------------

fn ob_heading(line: &str) -> bool {
    is_heading(line)
        && !mentions_learning_objective(line)
        && regex!(r"(?i)observable\s+behaviou?r").is_match(line)
}

fn ob_bullet_label(line: &str) -> bool {
    is_emphasized_bullet(line)
        && !mentions_learning_objective(line)
        && regex!(r"(?i)observable\s+behaviou?r").is_match(line)
}

fn ob_bullet_verb(line: &str) -> bool {
    is_emphasized_bullet(line)
        && !mentions_learning_objective(line)
        && regex!(r"(?i)demonstrate|exhibit|show").is_match(line)
}

fn ob_bullet_emphasis(line: &str) -> bool {
    is_emphasized_bullet(line) && !mentions_learning_objective(line) && !lo_bullet(line)
}

// ---------------------------------------------------------------------------
// Learning objective
// ---------------------------------------------------------------------------

fn lo_heading(line: &str) -> bool {
    is_heading(line) && mentions_learning_objective(line)
}

fn lo_bullet(line: &str) -> bool {
    is_emphasized_bullet(line)
        && regex!(r"(?i)learning\s+objective|learn|understand|apply").is_match(line)
}

// ---------------------------------------------------------------------------
// Default rules (priority-ordered)
// ---------------------------------------------------------------------------

/// The ordered rule table. Rules are grouped by kind in priority order
/// (business objective, WIIFM, performance metric, observable behavior,
/// learning objective); the first matching rule decides a line's kind.
pub fn default_rules() -> Vec<Rule> {
    vec![
        // 1. Business objective headings
        rule! {
            id: "bo_heading_keyword",
            kind: ItemKind::BusinessObjective,
            matches: bo_heading_keyword,
        },
        rule! {
            id: "bo_heading_code",
            kind: ItemKind::BusinessObjective,
            matches: bo_heading_code,
        },
        rule! {
            id: "bo_heading_numbered",
            kind: ItemKind::BusinessObjective,
            matches: bo_heading_numbered,
        },
        // 2. WIIFM
        rule! {
            id: "wiifm_heading",
            kind: ItemKind::Wiifm,
            matches: wiifm_heading,
        },
        // 3. Performance metrics: tested before behaviors so percentage
        //    bullets with bold markup stay metrics
        rule! {
            id: "pm_heading",
            kind: ItemKind::PerformanceMetric,
            matches: pm_heading,
        },
        rule! {
            id: "pm_list_percentage",
            kind: ItemKind::PerformanceMetric,
            matches: pm_list_percentage,
        },
        rule! {
            id: "pm_numbered_change",
            kind: ItemKind::PerformanceMetric,
            matches: pm_numbered_change,
        },
        rule! {
            id: "pm_percent_increase",
            kind: ItemKind::PerformanceMetric,
            matches: pm_percent_increase,
        },
        // 4. Observable behaviors
        rule! {
            id: "ob_heading",
            kind: ItemKind::ObservableBehavior,
            matches: ob_heading,
        },
        rule! {
            id: "ob_bullet_label",
            kind: ItemKind::ObservableBehavior,
            matches: ob_bullet_label,
        },
        rule! {
            id: "ob_bullet_verb",
            kind: ItemKind::ObservableBehavior,
            matches: ob_bullet_verb,
        },
        rule! {
            id: "ob_bullet_emphasis",
            kind: ItemKind::ObservableBehavior,
            matches: ob_bullet_emphasis,
        },
        // 5. Learning objectives
        rule! {
            id: "lo_heading",
            kind: ItemKind::LearningObjective,
            matches: lo_heading,
        },
        rule! {
            id: "lo_bullet",
            kind: ItemKind::LearningObjective,
            matches: lo_bullet,
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
