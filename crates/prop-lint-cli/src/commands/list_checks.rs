//! List checks command implementation.

use prop_lint_core::DiagnosticKind;

/// Runs the list-checks command.
pub fn run() {
    println!("Available checks:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for (code, name, description) in DiagnosticKind::CATALOG {
        println!("{code:<10} {name:<25} {description}");
    }

    println!("\nAll checks run on every extraction; severity defaults to warning.");
    println!("Use `fail-on` in prop-lint.toml to pick the failing threshold.");
}
