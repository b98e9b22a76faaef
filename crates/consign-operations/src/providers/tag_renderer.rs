use crate::traits::{TagContext, TagRenderer};

/// Substitutes `{package}`, `{version}`, `{stage}` and `{counter}`.
///
/// Outside a pre-release, `{stage}` and `{counter}` render empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderTagRenderer;

impl TagRenderer for PlaceholderTagRenderer {
    fn render(&self, template: &str, context: &TagContext<'_>) -> String {
        let mut rendered = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            rest = &rest[open..];
            let Some(close) = rest.find('}') else {
                break;
            };
            let placeholder = &rest[..=close];
            match placeholder {
                "{package}" => rendered.push_str(context.package),
                "{version}" => rendered.push_str(&context.version.to_string()),
                "{stage}" => rendered.push_str(context.stage.unwrap_or_default()),
                "{counter}" => {
                    if let Some(counter) = context.counter {
                        rendered.push_str(&counter.to_string());
                    }
                }
                _ => {
                    // Not a placeholder; keep the brace and rescan after it.
                    rendered.push('{');
                    rest = &rest[1..];
                    continue;
                }
            }
            rest = &rest[close + 1..];
        }

        rendered.push_str(rest);
        rendered
    }
}

#[cfg(test)]
mod tests {
    use semver::Version;

    use super::*;

    #[test]
    fn renders_all_placeholders() {
        let version = Version::parse("1.2.0-beta.3").expect("valid version");
        let context = TagContext {
            package: "core",
            version: &version,
            stage: Some("beta"),
            counter: Some(3),
        };

        let tag = PlaceholderTagRenderer.render("{package}/{stage}-{counter}/v{version}", &context);

        assert_eq!(tag, "core/beta-3/v1.2.0-beta.3");
    }

    #[test]
    fn stable_release_leaves_stage_placeholders_empty() {
        let version = Version::new(2, 0, 0);
        let context = TagContext {
            package: "api",
            version: &version,
            stage: None,
            counter: None,
        };

        assert_eq!(
            PlaceholderTagRenderer.render("{package}@{version}{stage}", &context),
            "api@2.0.0"
        );
    }

    #[test]
    fn unknown_placeholders_are_kept() {
        let version = Version::new(1, 0, 0);
        let context = TagContext {
            package: "api",
            version: &version,
            stage: None,
            counter: None,
        };

        assert_eq!(
            PlaceholderTagRenderer.render("{name}-{version}", &context),
            "{name}-1.0.0"
        );
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        let version = Version::parse("1.0.0-x.1").expect("valid version");
        let context = TagContext {
            package: "{version}",
            version: &version,
            stage: Some("{counter}"),
            counter: Some(1),
        };

        assert_eq!(
            PlaceholderTagRenderer.render("{package}/{stage}/{version}", &context),
            "{version}/{counter}/1.0.0-x.1"
        );
    }

    #[test]
    fn stray_braces_are_kept() {
        let version = Version::new(1, 0, 0);
        let context = TagContext {
            package: "api",
            version: &version,
            stage: None,
            counter: None,
        };

        assert_eq!(
            PlaceholderTagRenderer.render("{{package}-{version", &context),
            "{api-{version"
        );
    }
}
