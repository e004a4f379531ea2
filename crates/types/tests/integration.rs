//! Integration tests for types

#[cfg(test)]
mod tests {
    use ghfetch_types::*;

    #[test]
    fn test_package_ref_display() {
        let pkg = PackageRef::new("wukong", Some("0.0.1-dev".into()));
        assert_eq!(pkg.to_string(), "wukong 0.0.1-dev");

        let pkg = PackageRef::new("wukong", None);
        assert_eq!(pkg.to_string(), "wukong");
    }

    #[test]
    fn test_asset_id_serializes_as_number() {
        let json = serde_json::to_string(&AssetId::from(42)).unwrap();
        assert_eq!(json, "42");
        assert_eq!(AssetId::from(42).to_string(), "42");
        assert_eq!(serde_json::to_string(&AssetId::from("a1")).unwrap(), r#""a1""#);
    }

    #[test]
    fn test_color_choice_serialization() {
        let json = serde_json::to_string(&ColorChoice::Never).unwrap();
        assert_eq!(json, r#""never""#);
        assert_eq!(ColorChoice::default(), ColorChoice::Auto);
    }

    #[test]
    fn test_default_token_env() {
        assert_eq!(DEFAULT_TOKEN_ENV, "HOMEBREW_GITHUB_API_TOKEN");
    }
}
