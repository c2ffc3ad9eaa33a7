use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Provides some conveniences for querying a `kube-rs` object.
pub trait CrdExt {
    /// Returns this objects `ObjectMeta` information (i.e. the `metadata` field). You implement
    /// this be returning `&self.metadata`. This allows the rest of this trait's functions to be
    /// implemented for you.
    fn object_meta(&self) -> &ObjectMeta;

    /// Returns the object.metadata.name field, unwrapping a potential `None` with `""`. An account
    /// read from a nameless object fails its format check later. This is named `object_name` to
    /// avoid confusion with `ResourceExt`.
    fn object_name(&self) -> &str {
        self.object_meta().name.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Named(ObjectMeta);

    impl CrdExt for Named {
        fn object_meta(&self) -> &ObjectMeta {
            &self.0
        }
    }

    #[test]
    fn missing_name_is_empty() {
        assert_eq!(Named(ObjectMeta::default()).object_name(), "");
        let named = Named(ObjectMeta {
            name: Some("prod".to_string()),
            ..ObjectMeta::default()
        });
        assert_eq!(named.object_name(), "prod");
    }
}
