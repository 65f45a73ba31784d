//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# prop-lint configuration
# See https://github.com/ynishi/prop-lint for documentation

# Used verbatim in the "not annotated" diagnostic message.
domain-label = "property type annotation"

# Primary categories, in precedence order. The order decides how conflicting
# markers are listed and which one wins as the nominal category.
primary = [
    "Input",
    "InputFile",
    "InputDirectory",
    "OutputFile",
    "OutputDirectory",
    "Console",
]

# Markers that carry auxiliary metadata but never determine a category.
supporting = ["Hint"]

# Markers recognized as part of the domain but mapped to no category.
# Their presence is always reported.
unsupported = ["Unmanaged"]

# Severity threshold for a failing exit code (error, warning, info).
# fail-on = "warning"

# Narrowing a base category to a more specific one is never a conflict.
[[override]]
base = "Input"
narrower = ["InputFile", "InputDirectory"]

# Members of these root types never become property candidates.
[ignored-roots]
classes = ["Object"]
interfaces = ["DynamicObject"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("prop-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created prop-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit prop-lint.toml to declare your marker sets");
    println!("  2. Run: prop-lint check <descriptions>");

    Ok(())
}

#[cfg(test)]
mod tests {
    use prop_lint_core::LoadedConfig;

    #[test]
    fn default_config_is_loadable() {
        let loaded = LoadedConfig::parse(super::DEFAULT_CONFIG).expect("starter config loads");
        assert_eq!(loaded.markers.primary().len(), 6);
        assert!(loaded.markers.is_ignored_class_root("Object"));
    }
}
