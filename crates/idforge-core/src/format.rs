use crate::classifier::{ClassifiedItem, Classifier};
use crate::types::ItemKind;
use serde::Serialize;

/// Result of formatting AI-authored IBO text for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum FormattedIbos {
    Structured { items: Vec<ClassifiedItem> },
    /// Nothing recognisable was found; show the text as-is with a notice.
    Raw { text: String },
}

impl FormattedIbos {
    pub fn is_structured(&self) -> bool {
        matches!(self, FormattedIbos::Structured { .. })
    }
}

pub fn format_ibo_text(raw: &str) -> FormattedIbos {
    format_with(&Classifier::default(), raw)
}

pub fn format_with(classifier: &Classifier, raw: &str) -> FormattedIbos {
    let items = classifier.classify(raw);
    if items.is_empty() {
        FormattedIbos::Raw {
            text: raw.to_string(),
        }
    } else {
        FormattedIbos::Structured { items }
    }
}

/// Render classified items as an indented outline with dotted numbering.
pub fn render_outline(items: &[ClassifiedItem]) -> String {
    let mut out = String::new();
    for item in items {
        let indent = "  ".repeat(usize::from(item.depth.saturating_sub(1)));
        let line = match (item.kind, item.path) {
            (ItemKind::Wiifm, _) | (_, None) => format!("WIIFM: {}", item.title),
            (ItemKind::BusinessObjective, Some(p)) => {
                format!("{p}. Business Objective: {}", item.title)
            }
            (ItemKind::PerformanceMetric, Some(p)) => format!("{p} Metric: {}", item.title),
            (ItemKind::ObservableBehavior, Some(p)) => format!("{p} Behavior: {}", item.title),
            (ItemKind::LearningObjective, Some(p)) => format!("{p} Objective: {}", item.title),
        };
        out.push_str(&indent);
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstructured_text_falls_back_to_raw() {
        let formatted = format_ibo_text("Just some unrelated paragraph text.");
        assert_eq!(
            formatted,
            FormattedIbos::Raw {
                text: "Just some unrelated paragraph text.".to_string()
            }
        );
        assert!(!formatted.is_structured());
    }

    #[test]
    fn outline_indents_by_depth() {
        let text = "# Business Objective 1: Improve Sales\n\
## WIIFM: You will close more deals\n\
### Performance Metric: 20% increase in close rate\n\
- **Observable Behavior**: Demonstrates active listening\n\
- **Learning Objective**: Understand objection handling";
        let FormattedIbos::Structured { items } = format_ibo_text(text) else {
            panic!("expected structured output");
        };
        let outline = render_outline(&items);
        let lines: Vec<&str> = outline.lines().collect();
        assert_eq!(lines[0], "1. Business Objective: Improve Sales");
        assert_eq!(lines[1], "  WIIFM: You will close more deals");
        assert_eq!(lines[2], "  1.1 Metric: 20% increase in close rate");
        assert_eq!(lines[3], "    1.1.1 Behavior: Demonstrates active listening");
        assert_eq!(lines[4], "      1.1.1.1 Objective: Understand objection handling");
    }

    #[test]
    fn raw_variant_serializes_with_tag() {
        let json = serde_json::to_value(format_ibo_text("nothing here")).unwrap();
        assert_eq!(json["format"], "raw");
        assert_eq!(json["text"], "nothing here");
    }
}
