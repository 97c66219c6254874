const SOURCE_MAPPING_URL: &str = "//# sourceMappingURL=";

/// Returns the URL of the first `//# sourceMappingURL=` comment that starts
/// a line of `script`.
pub fn source_mapping_url(script: &str) -> Option<&str> {
    script
        .lines()
        .find_map(|line| line.strip_prefix(SOURCE_MAPPING_URL))
        .map(str::trim)
        .filter(|url| !url.is_empty())
}
