// Operator selection grammar - validation of comma-separated global ids

use thiserror::Error;

use crate::domain::model::GlobalTrackId;

/// Why an operator answer was rejected; always answered with a re-prompt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("The ID provided, {0}, is not of the form int:int.")]
    InvalidGlobalId(String),

    #[error("The ID provided, {0}, is not one of the present IDs.")]
    IdNotInCandidateSet(String),

    #[error("You may only choose one track to be {0}.")]
    ExclusivityViolation(String),

    #[error("You must choose a track to be {0}.")]
    MandatorySelectionMissing(String),
}

/// Rules an answer must satisfy
#[derive(Debug, Clone)]
pub struct SelectionConstraints<'a> {
    pub candidates: &'a [GlobalTrackId],
    /// At most one id may be given
    pub exclusive: bool,
    /// At least one id must be given
    pub mandatory: bool,
    /// Human wording used in diagnostics, e.g. "DEFAULT"
    pub description: &'a str,
}

impl<'a> SelectionConstraints<'a> {
    pub fn new(candidates: &'a [GlobalTrackId], description: &'a str) -> Self {
        Self {
            candidates,
            exclusive: false,
            mandatory: false,
            description,
        }
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// The single candidate, when a mandatory choice leaves nothing to ask
    pub fn automatic_choice(&self) -> Option<GlobalTrackId> {
        match self.candidates {
            [only] if self.mandatory => Some(*only),
            _ => None,
        }
    }
}

/// Validate one line of operator input against the constraints.
///
/// Ids are separated by commas, blanks between separators are ignored and
/// repeated ids keep their first position.
pub fn parse_selection(
    input: &str,
    constraints: &SelectionConstraints<'_>,
) -> Result<Vec<GlobalTrackId>, SelectionError> {
    let tokens: Vec<&str> = input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.is_empty() {
        if constraints.mandatory {
            return Err(SelectionError::MandatorySelectionMissing(
                constraints.description.to_string(),
            ));
        }
        return Ok(Vec::new());
    }

    if constraints.exclusive && tokens.len() > 1 {
        return Err(SelectionError::ExclusivityViolation(
            constraints.description.to_string(),
        ));
    }

    let mut selected = Vec::with_capacity(tokens.len());
    for token in tokens {
        let id: GlobalTrackId = token
            .parse()
            .map_err(|_| SelectionError::InvalidGlobalId(token.to_string()))?;
        if !constraints.candidates.contains(&id) {
            return Err(SelectionError::IdNotInCandidateSet(token.to_string()));
        }
        if !selected.contains(&id) {
            selected.push(id);
        }
    }

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<GlobalTrackId> {
        vec![GlobalTrackId::new(0, 1), GlobalTrackId::new(0, 2), GlobalTrackId::new(1, 0)]
    }

    #[test]
    fn test_parse_order() {
        let candidates = ids();
        let constraints = SelectionConstraints::new(&candidates, "ordered").mandatory();
        let selected = parse_selection("1:0, 0:2,0:1", &constraints).unwrap();
        assert_eq!(
            selected,
            vec![GlobalTrackId::new(1, 0), GlobalTrackId::new(0, 2), GlobalTrackId::new(0, 1)]
        );
    }

    #[test]
    fn test_rejects_malformed_id() {
        let candidates = ids();
        let constraints = SelectionConstraints::new(&candidates, "ordered");
        assert_eq!(
            parse_selection("0-1", &constraints),
            Err(SelectionError::InvalidGlobalId("0-1".to_string()))
        );
    }

    #[test]
    fn test_rejects_id_outside_candidates() {
        let candidates = ids();
        let constraints = SelectionConstraints::new(&candidates, "ordered");
        assert_eq!(
            parse_selection("0:1,3:3", &constraints),
            Err(SelectionError::IdNotInCandidateSet("3:3".to_string()))
        );
    }

    #[test]
    fn test_exclusive_rejects_multiple() {
        let candidates = ids();
        let constraints = SelectionConstraints::new(&candidates, "DEFAULT").exclusive();
        assert!(matches!(
            parse_selection("0:1,0:2", &constraints),
            Err(SelectionError::ExclusivityViolation(_))
        ));
    }

    #[test]
    fn test_mandatory_rejects_empty() {
        let candidates = ids();
        let constraints = SelectionConstraints::new(&candidates, "DEFAULT").mandatory();
        assert!(matches!(
            parse_selection("  ", &constraints),
            Err(SelectionError::MandatorySelectionMissing(_))
        ));
    }

    #[test]
    fn test_optional_accepts_empty() {
        let candidates = ids();
        let constraints = SelectionConstraints::new(&candidates, "FORCED");
        assert_eq!(parse_selection("", &constraints), Ok(vec![]));
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let candidates = ids();
        let constraints = SelectionConstraints::new(&candidates, "ordered");
        let selected = parse_selection("0:2,0:1,0:2", &constraints).unwrap();
        assert_eq!(selected, vec![GlobalTrackId::new(0, 2), GlobalTrackId::new(0, 1)]);
    }

    #[test]
    fn test_automatic_choice_only_for_single_mandatory_candidate() {
        let single = vec![GlobalTrackId::new(0, 1)];
        assert_eq!(
            SelectionConstraints::new(&single, "DEFAULT").mandatory().automatic_choice(),
            Some(GlobalTrackId::new(0, 1))
        );
        assert_eq!(SelectionConstraints::new(&single, "FORCED").automatic_choice(), None);
        let many = ids();
        assert_eq!(
            SelectionConstraints::new(&many, "DEFAULT").mandatory().automatic_choice(),
            None
        );
    }
}
