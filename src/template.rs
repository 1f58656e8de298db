use crate::resolver::Resolution;

pub const VERSION_PLACEHOLDER: &str = "@VERSION@";
pub const TIMESTAMP_PLACEHOLDER: &str = "@TIMESTAMP@";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Category placeholders replaced with a real URL. The mandatory
    /// version/timestamp substitutions are not counted.
    pub updated: usize,
    /// Configured category keys whose placeholder was not found verbatim in
    /// the template. A configuration-mismatch signal, not an error.
    pub missing: Vec<String>,
}

/// Pure text transform: replace `@VERSION@`, `@TIMESTAMP@` and one `@KEY@`
/// placeholder per category. Unresolved categories become an inert comment
/// marker so the output stays consumable downstream.
pub fn materialize(
    template: &str,
    resolution: &Resolution,
    version: &str,
    timestamp: &str,
) -> (String, MaterializeReport) {
    let mut content = template.replace(VERSION_PLACEHOLDER, version);
    content = content.replace(TIMESTAMP_PLACEHOLDER, timestamp);

    let mut report = MaterializeReport::default();

    for (key, url) in resolution {
        let placeholder = format!("@{}@", key);
        if !content.contains(&placeholder) {
            report.missing.push(key.clone());
            continue;
        }
        match url {
            Some(url) => {
                content = content.replace(&placeholder, url);
                report.updated += 1;
            }
            None => {
                content = content.replace(&placeholder, &not_found_marker(key));
            }
        }
    }

    (content, report)
}

fn not_found_marker(key: &str) -> String {
    format!("# {}: Not Found", key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution(urls: &[(&str, Option<&str>)]) -> Resolution {
        urls.iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    const TEMPLATE: &str = "\
Version: @VERSION@
# Generated: @TIMESTAMP@
Source0: @A@
Source1: @B@
";

    #[test]
    fn substitutes_urls_and_marks_absences() {
        let resolution = resolution(&[("A", Some("http://x/file.zip")), ("B", None)]);
        let (out, report) = materialize(TEMPLATE, &resolution, "20231215", "2023-12-15T12:00:00Z");

        assert_eq!(
            out,
            "\
Version: 20231215
# Generated: 2023-12-15T12:00:00Z
Source0: http://x/file.zip
Source1: # B: Not Found
"
        );
        assert_eq!(report.updated, 1);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn version_and_timestamp_replace_every_occurrence() {
        let resolution = Resolution::new();
        let (out, report) = materialize("@VERSION@ @VERSION@ @TIMESTAMP@", &resolution, "v", "t");
        assert_eq!(out, "v v t");
        assert_eq!(report.updated, 0);
    }

    #[test]
    fn absent_placeholder_is_reported_not_fatal() {
        let resolution = resolution(&[("A", Some("http://x/a.zip")), ("MISSING", Some("http://x/m.zip"))]);
        let (out, report) = materialize("Source0: @A@\n", &resolution, "v", "t");

        assert_eq!(out, "Source0: http://x/a.zip\n");
        assert_eq!(report.updated, 1);
        assert_eq!(report.missing, ["MISSING"]);
    }

    #[test]
    fn materialize_is_idempotent_on_its_own_output() {
        let resolution = resolution(&[("A", Some("http://x/file.zip")), ("B", None)]);
        let (first, _) = materialize(TEMPLATE, &resolution, "20231215", "ts");
        let (second, report) = materialize(&first, &resolution, "20231215", "ts");

        assert_eq!(first, second);
        assert_eq!(report.updated, 0);
        assert_eq!(report.missing, ["A", "B"]);
    }
}
