//! Task modes for the study assistant.
//!
//! Each mode is a row in a static table; adding a mode means adding a variant
//! and a row, not a new branch in the session logic.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A user-selected task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Find bugs in a code snippet and suggest fixes.
    #[default]
    CodeDebugger,

    /// Explain a topic in plain language.
    TopicExplainer,

    /// Explain data analysis concepts.
    DataAnalysisConcepts,
}

/// How the input for a mode is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputWidget {
    /// One line of text.
    SingleLine { placeholder: &'static str },

    /// Several lines, ended by a line that equals `terminator`.
    MultiLine {
        placeholder: &'static str,
        terminator: &'static str,
    },
}

impl InputWidget {
    pub fn placeholder(&self) -> &'static str {
        match self {
            InputWidget::SingleLine { placeholder } => placeholder,
            InputWidget::MultiLine { placeholder, .. } => placeholder,
        }
    }
}

/// Everything that differs between modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSpec {
    /// The command-line name, as accepted by `/mode`.
    pub name: &'static str,

    /// Human-readable label.
    pub label: &'static str,

    /// One-line description shown by `/modes`.
    pub description: &'static str,

    /// Instruction placed before the user's input.
    pub prefix: &'static str,

    /// Instruction placed after the user's input, if any.
    pub suffix: Option<&'static str>,

    /// How input is collected.
    pub widget: InputWidget,
}

static MODE_TABLE: [(Mode, ModeSpec); 3] = [
    (
        Mode::CodeDebugger,
        ModeSpec {
            name: "debug",
            label: "Code Debugger",
            description: "Paste code and get the errors it contains with suggested fixes.",
            prefix: "Analyze the following code for errors and suggest fixes:\n",
            suffix: None,
            widget: InputWidget::MultiLine {
                placeholder: "Paste your code, then a line containing only /end",
                terminator: "/end",
            },
        },
    ),
    (
        Mode::TopicExplainer,
        ModeSpec {
            name: "explain",
            label: "Topic Explainer",
            description: "Name a topic and get a plain-language explanation.",
            prefix: "Explain the following topic in simple terms: ",
            suffix: Some("\nUse an example a student would relate to."),
            widget: InputWidget::SingleLine {
                placeholder: "Enter a topic, e.g. recursion",
            },
        },
    ),
    (
        Mode::DataAnalysisConcepts,
        ModeSpec {
            name: "data",
            label: "Data Analysis Concepts",
            description: "Ask about a statistics or data analysis concept.",
            prefix: "Explain the following data analysis concept and when to use it: ",
            suffix: None,
            widget: InputWidget::SingleLine {
                placeholder: "Enter a concept, e.g. standard deviation",
            },
        },
    ),
];

impl Mode {
    /// Every mode, in menu order.
    pub const ALL: [Mode; 3] = [
        Mode::CodeDebugger,
        Mode::TopicExplainer,
        Mode::DataAnalysisConcepts,
    ];

    /// The table row for this mode.
    ///
    /// Rows are stored in variant order.
    pub fn spec(&self) -> &'static ModeSpec {
        let row = match self {
            Mode::CodeDebugger => 0,
            Mode::TopicExplainer => 1,
            Mode::DataAnalysisConcepts => 2,
        };
        let (mode, spec) = &MODE_TABLE[row];
        debug_assert_eq!(mode, self, "mode table row {row} is out of order");
        spec
    }

    pub fn label(&self) -> &'static str {
        self.spec().label
    }

    pub fn widget(&self) -> InputWidget {
        self.spec().widget
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().label)
    }
}

impl FromStr for Mode {
    type Err = Error;

    /// Accepts the short name, the label, or the variant name, ignoring case,
    /// spaces, dashes and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn normalize(s: &str) -> String {
            s.chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_'))
                .flat_map(char::to_lowercase)
                .collect()
        }

        let wanted = normalize(s);
        MODE_TABLE
            .iter()
            .find(|(mode, spec)| {
                normalize(spec.name) == wanted
                    || normalize(spec.label) == wanted
                    || normalize(&format!("{mode:?}")) == wanted
            })
            .map(|(mode, _)| *mode)
            .ok_or_else(|| {
                let names: Vec<_> = MODE_TABLE.iter().map(|(_, spec)| spec.name).collect();
                Error::validation(
                    format!("unknown mode '{}'; expected one of {}", s.trim(), names.join(", ")),
                    Some("mode".to_string()),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_has_a_row() {
        for mode in Mode::ALL {
            let spec = mode.spec();
            assert!(MODE_TABLE.iter().any(|(m, s)| *m == mode && s == spec));
            assert!(!spec.prefix.is_empty());
        }
    }

    #[test]
    fn table_rows_follow_variant_order() {
        assert_eq!(MODE_TABLE.len(), Mode::ALL.len());
        for (row, mode) in Mode::ALL.iter().enumerate() {
            assert_eq!(MODE_TABLE[row].0, *mode);
            assert!(std::ptr::eq(mode.spec(), &MODE_TABLE[row].1));
        }
    }

    #[test]
    fn exactly_one_mode_has_a_suffix() {
        let with_suffix = Mode::ALL
            .iter()
            .filter(|mode| mode.spec().suffix.is_some())
            .count();
        assert_eq!(with_suffix, 1);
    }

    #[test]
    fn parse_names_labels_and_variants() {
        assert_eq!("debug".parse::<Mode>().unwrap(), Mode::CodeDebugger);
        assert_eq!("Topic Explainer".parse::<Mode>().unwrap(), Mode::TopicExplainer);
        assert_eq!(
            "data_analysis_concepts".parse::<Mode>().unwrap(),
            Mode::DataAnalysisConcepts
        );
        assert_eq!("CodeDebugger".parse::<Mode>().unwrap(), Mode::CodeDebugger);
    }

    #[test]
    fn parse_unknown_mode() {
        let err = "poetry".parse::<Mode>().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("debug, explain, data"));
    }

    #[test]
    fn code_debugger_reads_multiple_lines() {
        assert!(matches!(
            Mode::CodeDebugger.widget(),
            InputWidget::MultiLine { terminator: "/end", .. }
        ));
        assert!(matches!(
            Mode::TopicExplainer.widget(),
            InputWidget::SingleLine { .. }
        ));
    }
}
