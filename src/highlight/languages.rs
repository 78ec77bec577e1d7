use tree_sitter_highlight::HighlightConfiguration;

/// Map a path to the grammar name used for its highlight configuration.
pub fn detect_language(path: &std::path::Path) -> Option<&'static str> {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        let name = match ext {
            "rs" => "rust",
            "js" | "jsx" | "mjs" | "cjs" => "javascript",
            "ts" | "tsx" => "typescript",
            "py" | "pyi" => "python",
            "json" | "jsonc" => "json",
            "toml" => "toml",
            "css" => "css",
            "html" | "htm" => "html",
            "go" => "go",
            "rb" | "rake" | "gemspec" => "ruby",
            "sh" | "bash" | "zsh" => "bash",
            "yml" | "yaml" => "yaml",
            _ => return detect_by_filename(path),
        };
        return Some(name);
    }
    detect_by_filename(path)
}

fn detect_by_filename(path: &std::path::Path) -> Option<&'static str> {
    match path.file_name()?.to_str()? {
        "Makefile" | "makefile" | "GNUmakefile" | "Dockerfile" => Some("bash"),
        "Gemfile" | "Rakefile" => Some("ruby"),
        _ => None,
    }
}

pub const LANGUAGE_NAMES: &[&str] = &[
    "rust",
    "javascript",
    "typescript",
    "python",
    "json",
    "toml",
    "css",
    "html",
    "go",
    "ruby",
    "bash",
    "yaml",
];

/// Build the highlight configuration for a grammar, with our capture
/// names already applied.
pub fn configuration(name: &str, highlight_names: &[String]) -> Option<HighlightConfiguration> {
    let mut config = match name {
        "rust" => HighlightConfiguration::new(
            tree_sitter_rust::LANGUAGE.into(),
            name,
            tree_sitter_rust::HIGHLIGHTS_QUERY,
            "",
            "",
        ),
        "javascript" => HighlightConfiguration::new(
            tree_sitter_javascript::LANGUAGE.into(),
            name,
            tree_sitter_javascript::HIGHLIGHT_QUERY,
            "",
            "",
        ),
        "typescript" => HighlightConfiguration::new(
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            name,
            tree_sitter_typescript::HIGHLIGHTS_QUERY,
            "",
            "",
        ),
        "python" => HighlightConfiguration::new(
            tree_sitter_python::LANGUAGE.into(),
            name,
            tree_sitter_python::HIGHLIGHTS_QUERY,
            "",
            "",
        ),
        "json" => HighlightConfiguration::new(
            tree_sitter_json::LANGUAGE.into(),
            name,
            tree_sitter_json::HIGHLIGHTS_QUERY,
            "",
            "",
        ),
        "toml" => HighlightConfiguration::new(
            tree_sitter_toml_ng::LANGUAGE.into(),
            name,
            tree_sitter_toml_ng::HIGHLIGHTS_QUERY,
            "",
            "",
        ),
        "css" => HighlightConfiguration::new(
            tree_sitter_css::LANGUAGE.into(),
            name,
            tree_sitter_css::HIGHLIGHTS_QUERY,
            "",
            "",
        ),
        "html" => HighlightConfiguration::new(
            tree_sitter_html::LANGUAGE.into(),
            name,
            tree_sitter_html::HIGHLIGHTS_QUERY,
            "",
            "",
        ),
        "go" => HighlightConfiguration::new(
            tree_sitter_go::LANGUAGE.into(),
            name,
            tree_sitter_go::HIGHLIGHTS_QUERY,
            "",
            "",
        ),
        "ruby" => HighlightConfiguration::new(
            tree_sitter_ruby::LANGUAGE.into(),
            name,
            tree_sitter_ruby::HIGHLIGHTS_QUERY,
            "",
            "",
        ),
        "bash" => HighlightConfiguration::new(
            tree_sitter_bash::LANGUAGE.into(),
            name,
            tree_sitter_bash::HIGHLIGHT_QUERY,
            "",
            "",
        ),
        "yaml" => HighlightConfiguration::new(
            tree_sitter_yaml::LANGUAGE.into(),
            name,
            tree_sitter_yaml::HIGHLIGHTS_QUERY,
            "",
            "",
        ),
        _ => return None,
    }
    .ok()?;

    config.configure(highlight_names);
    Some(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn detects_by_extension_and_filename() {
        assert_eq!(detect_language(Path::new("src/main.rs")), Some("rust"));
        assert_eq!(detect_language(Path::new("web/app.tsx")), Some("typescript"));
        assert_eq!(detect_language(Path::new("Dockerfile")), Some("bash"));
        assert_eq!(detect_language(Path::new("README.md")), None);
    }
}
