//! Navigation structure depth lookup.

use crate::application::repos::ResourceResolver;

/// Location of the navigation component relative to the header fragment root.
pub const NAVIGATION_RELATIVE_PATH: &str = "jcr:content/root/navigation";
/// Property holding the number of category levels rendered in navigation.
pub const STRUCTURE_DEPTH_PROPERTY: &str = "structureDepth";

/// Reads the configured navigation depth from the header experience fragment.
#[derive(Debug, Clone)]
pub struct NavigationDepthResolver {
    path: String,
    property: String,
}

impl NavigationDepthResolver {
    pub fn new(header_fragment_root: &str, property: impl Into<String>) -> Self {
        let root = header_fragment_root.trim_end_matches('/');
        Self {
            path: format!("{root}/{NAVIGATION_RELATIVE_PATH}"),
            property: property.into(),
        }
    }

    /// Absolute path of the navigation resource.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The configured depth, or `None` when the resource or property is missing.
    ///
    /// Numeric strings are accepted; negative or non-numeric values count as unset.
    pub fn resolve(&self, resources: &dyn ResourceResolver) -> Option<u32> {
        let resource = resources.resolve(&self.path)?;
        resource.value::<u32>(&self.property).or_else(|| {
            resource
                .value::<String>(&self.property)
                .and_then(|text| text.trim().parse().ok())
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use serde_json::{Map, Value, json};

    use super::*;
    use crate::domain::resource::Resource;

    pub(crate) const HEADER_ROOT: &str = "/content/experience-fragments/venia/header/master";

    #[derive(Default)]
    pub(crate) struct StubResources {
        resources: HashMap<String, Resource>,
    }

    impl StubResources {
        pub(crate) fn with(mut self, path: &str, properties: Value) -> Self {
            let properties = match properties {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            self.resources
                .insert(path.to_string(), Resource::new(path, properties));
            self
        }

        /// Navigation resource under [`HEADER_ROOT`] with the given depth value.
        pub(crate) fn navigation(depth: Value) -> Self {
            Self::default().with(
                &format!("{HEADER_ROOT}/{NAVIGATION_RELATIVE_PATH}"),
                json!({ STRUCTURE_DEPTH_PROPERTY: depth }),
            )
        }
    }

    impl ResourceResolver for StubResources {
        fn resolve(&self, path: &str) -> Option<Resource> {
            self.resources.get(path).cloned()
        }
    }

    fn resolver() -> NavigationDepthResolver {
        NavigationDepthResolver::new(HEADER_ROOT, STRUCTURE_DEPTH_PROPERTY)
    }

    #[test]
    fn builds_navigation_path_from_root() {
        let resolver =
            NavigationDepthResolver::new("/content/xf/header/", STRUCTURE_DEPTH_PROPERTY);
        assert_eq!(resolver.path(), "/content/xf/header/jcr:content/root/navigation");
    }

    #[test]
    fn reads_configured_depth() {
        assert_eq!(resolver().resolve(&StubResources::navigation(json!(2))), Some(2));
    }

    #[test]
    fn accepts_numeric_strings() {
        assert_eq!(resolver().resolve(&StubResources::navigation(json!(" 3 "))), Some(3));
    }

    #[test]
    fn absent_when_resource_missing() {
        assert_eq!(resolver().resolve(&StubResources::default()), None);
    }

    #[test]
    fn absent_when_property_unset() {
        let resources = StubResources::default().with(
            &format!("{HEADER_ROOT}/{NAVIGATION_RELATIVE_PATH}"),
            json!({ "sling:resourceType": "venia/components/structure/navigation" }),
        );
        assert_eq!(resolver().resolve(&resources), None);
    }

    #[test]
    fn absent_when_value_is_not_a_depth() {
        assert_eq!(resolver().resolve(&StubResources::navigation(json!(-1))), None);
        assert_eq!(resolver().resolve(&StubResources::navigation(json!("deep"))), None);
        assert_eq!(resolver().resolve(&StubResources::navigation(json!(true))), None);
        assert_eq!(
            resolver().resolve(&StubResources::navigation(json!(5_000_000_000u64))),
            None
        );
    }
}
