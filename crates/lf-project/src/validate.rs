//! Document validation.

use std::collections::HashSet;

use lf_components::{ComponentSpec, DisplayVariant};

use crate::schema::{CircuitDoc, DisplayDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Duplicate node key: {key} in {section}[{index}]")]
    DuplicateKey {
        key: u32,
        section: &'static str,
        index: usize,
    },

    #[error("{section}[{index}] lists {found} {what} key(s), component has {expected}")]
    PinCountMismatch {
        section: &'static str,
        index: usize,
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid component in {section}[{index}]: {message}")]
    InvalidComponent {
        section: &'static str,
        index: usize,
        message: String,
    },
}

/// One descriptor flattened to what validation needs.
pub(crate) struct Entry<'a> {
    pub(crate) section: &'static str,
    pub(crate) index: usize,
    pub(crate) spec: ComponentSpec,
    pub(crate) inputs: &'a [u32],
    pub(crate) outputs: &'a [u32],
}

/// Every descriptor in load order: in, out, displays (three variants),
/// clocks, gates.
pub(crate) fn entries(doc: &CircuitDoc) -> Vec<Entry<'_>> {
    let mut out = Vec::with_capacity(doc.component_count());
    for (index, def) in doc.inputs.iter().enumerate() {
        out.push(Entry {
            section: "in",
            index,
            spec: def.spec(),
            inputs: &[],
            outputs: &def.outputs,
        });
    }
    for (index, def) in doc.outputs.iter().enumerate() {
        out.push(Entry {
            section: "out",
            index,
            spec: ComponentSpec::Probe,
            inputs: &def.inputs,
            outputs: &[],
        });
    }
    let displays = [
        ("displays", &doc.displays, DisplayVariant::SevenSegment),
        ("displaysA", &doc.displays_a, DisplayVariant::Hex),
        ("displaysB", &doc.displays_b, DisplayVariant::Byte),
    ];
    for (section, defs, variant) in displays {
        for (index, def) in defs.iter().enumerate() {
            out.push(Entry {
                section,
                index,
                spec: DisplayDef::spec(variant),
                inputs: &def.inputs,
                outputs: &[],
            });
        }
    }
    for (index, def) in doc.clocks.iter().enumerate() {
        out.push(Entry {
            section: "clocks",
            index,
            spec: def.spec(),
            inputs: &[],
            outputs: &def.outputs,
        });
    }
    for (index, def) in doc.gates.iter().enumerate() {
        out.push(Entry {
            section: "gates",
            index,
            spec: def.spec.clone(),
            inputs: &def.inputs,
            outputs: &def.outputs,
        });
    }
    out
}

fn check_count(
    entry: &Entry<'_>,
    what: &'static str,
    keys: &[u32],
    expected: usize,
) -> Result<(), ValidationError> {
    // An empty key list leaves those pins unaddressable but is legal.
    if !keys.is_empty() && keys.len() != expected {
        return Err(ValidationError::PinCountMismatch {
            section: entry.section,
            index: entry.index,
            what,
            expected,
            found: keys.len(),
        });
    }
    Ok(())
}

/// Check parameters, pin key counts and key uniqueness. Wires are not
/// checked: dangling wire entries are skipped at load time.
pub fn validate_doc(doc: &CircuitDoc) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for entry in entries(doc) {
        let model = entry
            .spec
            .build()
            .map_err(|e| ValidationError::InvalidComponent {
                section: entry.section,
                index: entry.index,
                message: e.to_string(),
            })?;
        let arity = model.arity();
        check_count(&entry, "input", entry.inputs, arity.inputs)?;
        check_count(&entry, "output", entry.outputs, arity.outputs)?;

        for key in entry.inputs.iter().chain(entry.outputs) {
            if !seen.insert(*key) {
                return Err(ValidationError::DuplicateKey {
                    key: *key,
                    section: entry.section,
                    index: entry.index,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GateDef, ProbeDef, SwitchDef};
    use lf_components::GateOp;
    use lf_core::HighZPolicy;

    fn and_gate(inputs: Vec<u32>, outputs: Vec<u32>) -> GateDef {
        GateDef {
            spec: ComponentSpec::Gate {
                op: GateOp::And,
                fan_in: None,
                high_z: HighZPolicy::Unknown,
            },
            inputs,
            outputs,
        }
    }

    #[test]
    fn empty_doc_is_valid() {
        assert!(validate_doc(&CircuitDoc::default()).is_ok());
    }

    #[test]
    fn pin_counts_must_match() {
        let doc = CircuitDoc {
            gates: vec![and_gate(vec![1, 2, 3], vec![4])],
            ..CircuitDoc::default()
        };
        assert_eq!(
            validate_doc(&doc),
            Err(ValidationError::PinCountMismatch {
                section: "gates",
                index: 0,
                what: "input",
                expected: 2,
                found: 3,
            })
        );
    }

    #[test]
    fn keys_are_unique_across_sections() {
        let doc = CircuitDoc {
            inputs: vec![SwitchDef {
                outputs: vec![7],
                ..SwitchDef::default()
            }],
            outputs: vec![ProbeDef { inputs: vec![7] }],
            ..CircuitDoc::default()
        };
        assert!(matches!(
            validate_doc(&doc),
            Err(ValidationError::DuplicateKey {
                key: 7,
                section: "out",
                ..
            })
        ));
    }

    #[test]
    fn bad_params_are_reported() {
        let doc = CircuitDoc {
            gates: vec![GateDef {
                spec: ComponentSpec::Passthrough { width: 0 },
                inputs: vec![],
                outputs: vec![],
            }],
            ..CircuitDoc::default()
        };
        assert!(matches!(
            validate_doc(&doc),
            Err(ValidationError::InvalidComponent { .. })
        ));
    }

    #[test]
    fn entries_follow_load_order() {
        let doc = CircuitDoc {
            gates: vec![and_gate(vec![], vec![])],
            outputs: vec![ProbeDef::default()],
            inputs: vec![SwitchDef::default()],
            ..CircuitDoc::default()
        };
        let sections: Vec<_> = entries(&doc).iter().map(|e| e.section).collect();
        assert_eq!(sections, vec!["in", "out", "gates"]);
    }
}
