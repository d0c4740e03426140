//! Difference calculation between two calculated models
//!
//! Longest common subsequence alignment over model atoms. Equality is
//! exact: kind and text for tokens, identity for child references. The
//! reconstruction is deterministic: equal heads are always kept, and on
//! cost ties a removal is emitted before an addition, so the same pair
//! of models always produces the same script.

use crate::csm::{CalculatedElement, CalculatedModel};

/// One step of an edit script
///
/// Scripts are ordered like the after model, with removals interleaved
/// where the before model lost atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DifferenceElement {
    /// Atom present on both sides
    Kept(CalculatedElement),
    /// Atom only present in the after model
    Added(CalculatedElement),
    /// Atom only present in the before model
    Removed(CalculatedElement),
}

impl DifferenceElement {
    pub fn is_kept(&self) -> bool {
        matches!(self, DifferenceElement::Kept(_))
    }
}

/// Compute the minimal edit script turning `before` into `after`
pub fn calculate(before: &CalculatedModel, after: &CalculatedModel) -> Vec<DifferenceElement> {
    let a = before.elements();
    let b = after.elements();
    let n = a.len();
    let m = b.len();

    // lcs[i][j] holds the LCS length of a[i..] and b[j..]
    let mut lcs = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut script = Vec::with_capacity(n.max(m));
    let mut i = 0;
    let mut j = 0;
    while i < n && j < m {
        if a[i] == b[j] {
            // Matching equal heads never loses optimality
            script.push(DifferenceElement::Kept(a[i].clone()));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            script.push(DifferenceElement::Removed(a[i].clone()));
            i += 1;
        } else {
            script.push(DifferenceElement::Added(b[j].clone()));
            j += 1;
        }
    }
    while i < n {
        script.push(DifferenceElement::Removed(a[i].clone()));
        i += 1;
    }
    while j < m {
        script.push(DifferenceElement::Added(b[j].clone()));
        j += 1;
    }
    script
}

/// Number of additions and removals in a script
pub fn edit_cost(script: &[DifferenceElement]) -> usize {
    script.iter().filter(|step| !step.is_kept()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeId, Property, PropertyValue};
    use crate::csm;
    use crate::lexical::Change;
    use crate::syntax::parse_source;

    fn models_for(
        source: &str,
        change: Change,
    ) -> (CalculatedModel, CalculatedModel) {
        let parsed = parse_source(source).unwrap();
        let class = parsed.tree.children(parsed.root, Property::Types)[0];
        let before = csm::calculate(&parsed.tree, class).unwrap();
        let after = csm::calculate_with_change(&parsed.tree, class, &change).unwrap();
        (before, after)
    }

    #[test]
    fn identical_models_are_all_kept() {
        let (before, after) = models_for("class A{ }", Change::None);
        let script = calculate(&before, &after);
        assert!(script.iter().all(DifferenceElement::is_kept));
        assert_eq!(edit_cost(&script), 0);
    }

    #[test]
    fn renaming_replaces_one_token() {
        let (before, after) = models_for(
            "class A{ }",
            Change::Property {
                property: Property::Name,
                old: PropertyValue::ident("A"),
                new: PropertyValue::ident("B"),
            },
        );
        let script = calculate(&before, &after);
        assert_eq!(edit_cost(&script), 2);

        // Removal comes before the addition at the same spot
        let position = script.iter().position(|s| !s.is_kept()).unwrap();
        assert!(matches!(script[position], DifferenceElement::Removed(_)));
        assert!(matches!(script[position + 1], DifferenceElement::Added(_)));
    }

    #[test]
    fn empty_before_model_is_all_additions() {
        let parsed = parse_source("class A{ }").unwrap();
        let class = parsed.tree.children(parsed.root, Property::Types)[0];
        let model = csm::calculate(&parsed.tree, class).unwrap();
        let empty = CalculatedModel::default();
        let script = calculate(&empty, &model);
        assert!(script.iter().all(|s| matches!(s, DifferenceElement::Added(_))));
        assert_eq!(script.len(), model.len());
    }

    #[test]
    fn insertion_in_the_middle_keeps_the_rest() {
        let (before, after) = models_for(
            "class A extends B{ }",
            Change::ListAdd {
                property: Property::ExtendedTypes,
                index: 1,
                element: PropertyValue::Node(NodeId::new(999)),
            },
        );
        let script = calculate(&before, &after);
        // Inserted child plus its comma and space separator
        assert_eq!(edit_cost(&script), 3);
        assert!(script.iter().any(|s| matches!(s, DifferenceElement::Added(_))));
        assert!(!script.iter().any(|s| matches!(s, DifferenceElement::Removed(_))));
    }
}
