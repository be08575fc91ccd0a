use crate::detection::domain::embedding::Embedding;
use crate::matching::domain::face_matcher::FaceMatcher;
use crate::shared::constants::{MATCH_COLOR, MATCH_LABEL, NO_MATCH_COLOR, NO_MATCH_LABEL};

/// Outcome of comparing one detected face with the reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceVerdict {
    Match,
    NoMatch,
}

impl FaceVerdict {
    /// Without a reference every face is a non-match.
    pub fn judge(
        matcher: &dyn FaceMatcher,
        reference: Option<&Embedding>,
        candidate: &Embedding,
    ) -> Self {
        match reference {
            Some(reference) if matcher.is_match(reference, candidate) => FaceVerdict::Match,
            _ => FaceVerdict::NoMatch,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FaceVerdict::Match => MATCH_LABEL,
            FaceVerdict::NoMatch => NO_MATCH_LABEL,
        }
    }

    /// RGB drawing color.
    pub fn color(self) -> [u8; 3] {
        match self {
            FaceVerdict::Match => MATCH_COLOR,
            FaceVerdict::NoMatch => NO_MATCH_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysMatch;

    impl FaceMatcher for AlwaysMatch {
        fn is_match(&self, _reference: &Embedding, _candidate: &Embedding) -> bool {
            true
        }
    }

    #[test]
    fn test_judge_without_reference_is_no_match() {
        let candidate = Embedding::new(vec![1.0]);
        assert_eq!(
            FaceVerdict::judge(&AlwaysMatch, None, &candidate),
            FaceVerdict::NoMatch
        );
    }

    #[test]
    fn test_judge_defers_to_matcher() {
        let e = Embedding::new(vec![1.0]);
        assert_eq!(
            FaceVerdict::judge(&AlwaysMatch, Some(&e), &e),
            FaceVerdict::Match
        );
    }

    #[test]
    fn test_label_and_color() {
        assert_eq!(FaceVerdict::Match.label(), "MATCH");
        assert_eq!(FaceVerdict::Match.color(), [0, 255, 0]);
        assert_eq!(FaceVerdict::NoMatch.label(), "NO MATCH");
        assert_eq!(FaceVerdict::NoMatch.color(), [255, 0, 0]);
    }
}
