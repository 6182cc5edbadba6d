//! SCSS compilation using the grass crate.

use std::path::Path;

use grass::{Options, OutputStyle};
use serde::Serialize;

use crate::domain::action::StylesheetStyle;

/// Compile SCSS source to CSS.
///
/// `load_path` is searched for `@use` / `@import` targets, normally the
/// directory of the source file.
pub fn compile_scss(
    scss: &str,
    load_path: Option<&Path>,
    style: StylesheetStyle,
) -> Result<String, String> {
    let style = match style {
        StylesheetStyle::Expanded => OutputStyle::Expanded,
        StylesheetStyle::Compressed => OutputStyle::Compressed,
    };

    let mut options = Options::default().style(style);
    if let Some(path) = load_path {
        options = options.load_path(path);
    }

    grass::from_string(scss.to_owned(), &options).map_err(|e| e.to_string())
}

/// Minimal revision 3 source map.
///
/// grass does not emit mappings, so the map carries the original source
/// inline, which is enough for browser devtools to show it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceMap<'a> {
    version: u8,
    file: &'a str,
    sources: [&'a str; 1],
    sources_content: [&'a str; 1],
    names: [&'a str; 0],
    mappings: &'a str,
}

pub fn source_map(file: &str, source: &str, scss: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string(&SourceMap {
        version: 3,
        file,
        sources: [source],
        sources_content: [scss],
        names: [],
        mappings: "",
    })
}

/// Point an existing source map at a renamed output file.
pub fn retarget_source_map(map: &str, file: &str) -> Result<String, serde_json::Error> {
    let mut value: serde_json::Value = serde_json::from_str(map)?;
    if let Some(fields) = value.as_object_mut() {
        fields.insert("file".to_owned(), file.into());
    }
    serde_json::to_string(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn compiles_nested_rules() {
        let css = compile_scss(
            "$c: red;\n.a { .b { color: $c; } }\n",
            None,
            StylesheetStyle::Compressed,
        )
        .expect("compile");
        assert_eq!(css.trim(), ".a .b{color:red}");
    }

    #[test]
    fn expanded_style_keeps_whitespace() {
        let css = compile_scss(".a { color: red; }", None, StylesheetStyle::Expanded)
            .expect("compile");
        assert!(css.contains(".a {\n  color: red;\n}"));
    }

    #[test]
    fn resolves_imports_from_load_path() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempfile::tempdir()?;
        fs::write(temp.path().join("_vars.scss"), "$w: 10px;")?;
        let css = compile_scss(
            "@import 'vars';\n.a { width: $w; }",
            Some(temp.path()),
            StylesheetStyle::Compressed,
        )?;
        assert_eq!(css.trim(), ".a{width:10px}");
        Ok(())
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = compile_scss(".a { color: ", None, StylesheetStyle::Compressed).unwrap_err();
        assert!(!err.is_empty());
    }

    #[test]
    fn source_map_embeds_original() -> Result<(), serde_json::Error> {
        let map = source_map("site.css", "styles/site.scss", ".a{}")?;
        let value: serde_json::Value = serde_json::from_str(&map)?;
        assert_eq!(value["version"], 3);
        assert_eq!(value["file"], "site.css");
        assert_eq!(value["sourcesContent"][0], ".a{}");
        Ok(())
    }

    #[test]
    fn retargeting_keeps_sources() -> Result<(), serde_json::Error> {
        let map = source_map("site.scss", "styles/site.scss", ".a{}")?;
        let value: serde_json::Value =
            serde_json::from_str(&retarget_source_map(&map, "site.css")?)?;
        assert_eq!(value["file"], "site.css");
        assert_eq!(value["sources"][0], "styles/site.scss");
        assert_eq!(value["mappings"], "");
        Ok(())
    }

    #[test]
    fn retargeting_rejects_non_json() {
        assert!(retarget_source_map("", "site.css").is_err());
    }
}
