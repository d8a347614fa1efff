//! Feature set granted to newly provisioned keys

use crate::domain::feature::Feature;

const DEFAULT_FEATURES: &[(&str, &str)] = &[
    ("POST", "/authentication/:akey/verify"),
    ("POST", "/authentication/:akey/login"),
    ("POST", "/authorization/:key"),
    ("GET", "/settings/:akey"),
    ("PATCH", "/settings/:akey"),
    ("DELETE", "/settings/:akey"),
    ("GET", "/sync/:akey"),
    ("POST", "/sync/:akey"),
    ("POST", "/logs/:akey/latest"),
    ("GET", "/logs/:akey"),
    ("GET", "/logs/:akey/:id"),
    ("GET", "/logs/:akey/latest"),
    ("GET", "/logs/:akey/current"),
];

/// Features for a default (non-paid) key
pub fn default_features() -> Vec<Feature> {
    DEFAULT_FEATURES
        .iter()
        .map(|(method, path)| Feature::new(*method, *path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feature::{any_feature_matches, RequestedAction};
    use std::collections::HashMap;

    #[test]
    fn test_default_feature_count() {
        assert_eq!(default_features().len(), 13);
    }

    #[test]
    fn test_default_features_are_all_templated() {
        assert!(default_features().iter().all(|f| !f.template().is_literal()));
    }

    #[test]
    fn test_default_features_allow_log_lookup() {
        let features = default_features();
        let params: HashMap<String, String> = [("akey", "123456"), ("id", "17")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let action = RequestedAction::new("GET", "/logs/123456/17").with_params(&params);

        assert!(any_feature_matches(&features, &action));
    }
}
