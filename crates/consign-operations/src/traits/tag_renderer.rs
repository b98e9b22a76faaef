use semver::Version;

/// Values available to a tag template.
#[derive(Debug, Clone, Copy)]
pub struct TagContext<'a> {
    pub package: &'a str,
    pub version: &'a Version,
    pub stage: Option<&'a str>,
    pub counter: Option<u32>,
}

pub trait TagRenderer: Send + Sync {
    fn render(&self, template: &str, context: &TagContext<'_>) -> String;
}
