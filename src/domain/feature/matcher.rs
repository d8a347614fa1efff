//! Feature matching
//!
//! Decides whether a concrete request `(method, path, params)` is covered by a
//! list of feature templates.
//!
//! Without params the template must be fully literal and equal the request path.
//! With params, segment counts must agree, the template's parameter count must
//! equal the number of supplied params, and every parameter segment must be bound
//! to the value that actually appears in the request path. A caller therefore
//! cannot pass an arbitrary params map to disguise an unauthorized literal path as
//! an authorized templated one.

use std::collections::HashMap;

use super::entity::Feature;
use super::path::{split_segments, PathTemplate, Segment, PARAM_PREFIX};

/// A concrete action a caller wants to perform
#[derive(Debug, Clone, Copy)]
pub struct RequestedAction<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub params: Option<&'a HashMap<String, String>>,
}

impl<'a> RequestedAction<'a> {
    pub fn new(method: &'a str, path: &'a str) -> Self {
        Self {
            method,
            path,
            params: None,
        }
    }

    pub fn with_params(mut self, params: &'a HashMap<String, String>) -> Self {
        self.params = Some(params);
        self
    }

    /// Params supplied and non-empty
    fn bound_params(&self) -> Option<&'a HashMap<String, String>> {
        self.params.filter(|p| !p.is_empty())
    }
}

/// Check whether any feature in the list authorizes the action
pub fn any_feature_matches(features: &[Feature], action: &RequestedAction<'_>) -> bool {
    features.iter().any(|feature| feature_matches(feature, action))
}

/// Check a single feature against the action
pub fn feature_matches(feature: &Feature, action: &RequestedAction<'_>) -> bool {
    if feature.method != action.method {
        return false;
    }

    let template = feature.template();
    let requested = split_segments(action.path);

    match action.bound_params() {
        None => literal_matches(&template, &requested),
        Some(params) => templated_matches(&template, &requested, params),
    }
}

fn literal_matches(template: &PathTemplate<'_>, requested: &[&str]) -> bool {
    if !template.is_literal() || template.segment_count() != requested.len() {
        return false;
    }

    template
        .segments()
        .iter()
        .zip(requested)
        .all(|(segment, value)| matches!(segment, Segment::Literal(lit) if lit == value))
}

fn templated_matches(
    template: &PathTemplate<'_>,
    requested: &[&str],
    params: &HashMap<String, String>,
) -> bool {
    if template.segment_count() != requested.len() {
        return false;
    }

    if template.param_count() != params.len() {
        return false;
    }

    template
        .segments()
        .iter()
        .zip(requested)
        .all(|(segment, value)| segment_accepts(segment, value, params))
}

fn segment_accepts(segment: &Segment<'_>, value: &str, params: &HashMap<String, String>) -> bool {
    match segment {
        Segment::Literal(lit) => *lit == value,
        Segment::Param(name) => {
            value.strip_prefix(PARAM_PREFIX) == Some(*name)
                || params.get(*name).is_some_and(|bound| bound == value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_literal_path_matches_exactly() {
        let feature = Feature::new("GET", "/a/b");

        assert!(feature_matches(&feature, &RequestedAction::new("GET", "/a/b")));
        assert!(!feature_matches(&feature, &RequestedAction::new("GET", "/a/b/c")));
        assert!(!feature_matches(&feature, &RequestedAction::new("GET", "/a")));
    }

    #[test]
    fn test_literal_request_does_not_match_param_template() {
        let feature = Feature::new("GET", "/a/:b");

        assert!(!feature_matches(&feature, &RequestedAction::new("GET", "/a/b")));
    }

    #[test]
    fn test_literal_request_only_matches_identical_template() {
        let features = vec![
            Feature::new("GET", "/a/:b"),
            Feature::new("GET", "/a/b/c"),
        ];
        let action = RequestedAction::new("GET", "/a/b");

        assert!(!any_feature_matches(&features, &action));
    }

    #[test]
    fn test_method_is_case_sensitive() {
        let feature = Feature::new("GET", "/authorization");

        assert!(!feature_matches(&feature, &RequestedAction::new("get", "/authorization")));
        assert!(!feature_matches(&feature, &RequestedAction::new("POST", "/authorization")));
    }

    #[test]
    fn test_empty_segments_are_ignored() {
        let feature = Feature::new("GET", "/authorization");

        assert!(feature_matches(&feature, &RequestedAction::new("GET", "authorization/")));
        assert!(feature_matches(&feature, &RequestedAction::new("GET", "//authorization")));
    }

    #[test]
    fn test_params_bind_to_path_values() {
        let feature = Feature::new("GET", "/users/:id/log/:entry");
        let bound = params(&[("id", "42"), ("entry", "7")]);
        let action = RequestedAction::new("GET", "/users/42/log/7").with_params(&bound);

        assert!(feature_matches(&feature, &action));
    }

    #[test]
    fn test_missing_param_is_a_count_mismatch() {
        let feature = Feature::new("GET", "/users/:id/log/:entry");
        let bound = params(&[("id", "42")]);
        let action = RequestedAction::new("GET", "/users/42/log/7").with_params(&bound);

        assert!(!feature_matches(&feature, &action));
    }

    #[test]
    fn test_extra_param_is_a_count_mismatch() {
        let feature = Feature::new("GET", "/users/:id");
        let bound = params(&[("id", "42"), ("other", "1")]);
        let action = RequestedAction::new("GET", "/users/42").with_params(&bound);

        assert!(!feature_matches(&feature, &action));
    }

    #[test]
    fn test_param_value_must_equal_path_segment() {
        let feature = Feature::new("GET", "/users/:id");
        let bound = params(&[("id", "43")]);
        let action = RequestedAction::new("GET", "/users/42").with_params(&bound);

        assert!(!feature_matches(&feature, &action));
    }

    #[test]
    fn test_param_name_must_exist_in_map() {
        let feature = Feature::new("GET", "/users/:id");
        let bound = params(&[("user", "42")]);
        let action = RequestedAction::new("GET", "/users/42").with_params(&bound);

        assert!(!feature_matches(&feature, &action));
    }

    #[test]
    fn test_literal_template_never_matches_with_params() {
        let feature = Feature::new("GET", "/users/42");
        let bound = params(&[("id", "42")]);
        let action = RequestedAction::new("GET", "/users/42").with_params(&bound);

        assert!(!feature_matches(&feature, &action));
    }

    #[test]
    fn test_segment_count_must_agree_with_params() {
        let feature = Feature::new("GET", "/logs/:akey");
        let bound = params(&[("akey", "123456")]);
        let action = RequestedAction::new("GET", "/logs/123456/latest").with_params(&bound);

        assert!(!feature_matches(&feature, &action));
    }

    #[test]
    fn test_literal_segments_must_match_with_params() {
        let feature = Feature::new("GET", "/logs/:akey/latest");
        let bound = params(&[("akey", "123456")]);
        let action = RequestedAction::new("GET", "/logs/123456/current").with_params(&bound);

        assert!(!feature_matches(&feature, &action));
    }

    #[test]
    fn test_empty_params_behave_as_no_params() {
        let feature = Feature::new("GET", "/x");
        let empty = HashMap::new();
        let action = RequestedAction::new("GET", "/x").with_params(&empty);

        assert!(feature_matches(&feature, &action));
    }

    #[test]
    fn test_any_feature_matches_scans_list() {
        let features = vec![
            Feature::new("POST", "/authentication/:akey/login"),
            Feature::new("GET", "/settings/:akey"),
            Feature::new("GET", "/logs/:akey/:id"),
        ];
        let bound = params(&[("akey", "123456"), ("id", "99")]);
        let action = RequestedAction::new("GET", "/logs/123456/99").with_params(&bound);

        assert!(any_feature_matches(&features, &action));
        assert!(!any_feature_matches(&[], &action));
    }
}
