//! Tag injection
//!
//! Decides which `<script>`, `<link rel="stylesheet">` and
//! `<link rel="preload">` tags reference the bundle, and where they go:
//!
//! 1. externals positioned `before`, in configuration order
//! 2. generated files in bundle order (unless `inject: false`)
//! 3. externals positioned `after`, in configuration order

use tracing::debug;

use crate::classify::{NameIndex, OutputFile};
use crate::document::Document;
use crate::dom::Attribute;
use crate::normalize::{
    CrossOrigin, External, InjectMode, InsertPoint, ModuleMode, Position, PreloadSet,
    ResourceType,
};

/// Settings the injector needs from the normalized options
#[derive(Debug, Clone, Copy)]
pub struct InjectContext<'a> {
    pub inject: InjectMode,
    pub module_mode: ModuleMode,
    pub preload: &'a PreloadSet,
    pub externals: &'a [External],
    /// Prefix of every generated file URL
    pub online_path: &'a str,
}

/// Inject every tag into the document
pub fn inject_tags(
    document: &mut Document,
    outputs: &[OutputFile],
    index: &NameIndex,
    ctx: &InjectContext<'_>,
) {
    inject_externals(document, ctx, Position::Before);

    if ctx.inject != InjectMode::Disabled {
        inject_generated(document, outputs, index, ctx);
    }

    inject_externals(document, ctx, Position::After);
}

fn inject_externals(document: &mut Document, ctx: &InjectContext<'_>, position: Position) {
    for external in ctx.externals.iter().filter(|e| e.position == position) {
        debug!(
            "[fob-html] External {} -> {}",
            external.file_path,
            external.insert_point().as_str()
        );
        insert_resource(
            document,
            external.resource,
            external.insert_point(),
            &external.file_path,
            external.cross_origin,
            ctx.module_mode,
        );
    }
}

fn inject_generated(
    document: &mut Document,
    outputs: &[OutputFile],
    index: &NameIndex,
    ctx: &InjectContext<'_>,
) {
    for output in outputs {
        let stem = output.stem();
        let extension = output.extension();
        let url = format!("{}{}", ctx.online_path, output.file_name);

        if index.entry(stem).is_some() {
            let resource = ResourceType::for_injection(extension);
            let point = ctx.inject.placement(resource);
            debug!("[fob-html] Entry {} -> {}", output.file_name, point.as_str());
            insert_resource(document, resource, point, &url, None, ctx.module_mode);
        } else if let Some(name) = index.dynamic_entry(stem) {
            if !ctx.preload.contains(name) {
                continue;
            }
            match ResourceType::for_preload(extension) {
                Some(resource) => {
                    debug!("[fob-html] Preload {} as {}", output.file_name, resource.as_str());
                    let head = document.head();
                    document.insert_element(
                        head,
                        "link",
                        vec![
                            Attribute::new("rel", "preload"),
                            Attribute::new("href", url),
                            Attribute::new("as", resource.as_str()),
                        ],
                    );
                }
                None => debug!(
                    "[fob-html] Skipping preload of {}, unknown file type",
                    output.file_name
                ),
            }
        }
    }
}

fn insert_resource(
    document: &mut Document,
    resource: ResourceType,
    point: InsertPoint,
    url: &str,
    cross_origin: Option<CrossOrigin>,
    module_mode: ModuleMode,
) {
    let parent = document.target(point);
    match resource {
        ResourceType::Style => {
            let mut attrs = vec![Attribute::new("rel", "stylesheet")];
            attrs.extend(cross_origin_attr(cross_origin));
            attrs.push(Attribute::new("href", url));
            document.insert_element(parent, "link", attrs);
        }
        ResourceType::Script => {
            let mut attrs = Vec::with_capacity(3);
            match module_mode {
                ModuleMode::Module => attrs.push(Attribute::new("type", "module")),
                ModuleMode::NoModule => attrs.push(Attribute::boolean("nomodule")),
                ModuleMode::Classic => {}
            }
            attrs.extend(cross_origin_attr(cross_origin));
            attrs.push(Attribute::new("src", url));
            document.insert_element(parent, "script", attrs);
        }
    }
}

fn cross_origin_attr(cross_origin: Option<CrossOrigin>) -> Option<Attribute> {
    cross_origin.map(|policy| Attribute::new("crossorigin", policy.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;

    const TEMPLATE: &str = "<html><head></head><body></body></html>";

    fn run(outputs: &[OutputFile], ctx: &InjectContext<'_>) -> String {
        let mut document = Document::parse(TEMPLATE);
        inject_tags(&mut document, outputs, &classify(outputs), ctx);
        document.serialize()
    }

    fn ctx<'a>(preload: &'a PreloadSet, externals: &'a [External]) -> InjectContext<'a> {
        InjectContext {
            inject: InjectMode::Auto,
            module_mode: ModuleMode::Classic,
            preload,
            externals,
            online_path: "",
        }
    }

    fn external(position: Position, file_path: &str, resource: ResourceType) -> External {
        External {
            position,
            file_path: file_path.to_string(),
            resource,
            insert_point: None,
            cross_origin: None,
        }
    }

    #[test]
    fn test_default_placement() {
        let preload = PreloadSet::default();
        let html = run(
            &[OutputFile::entry("main.js", "main"), OutputFile::asset("main.css")],
            &ctx(&preload, &[]),
        );

        assert_eq!(
            html,
            "<!doctype html>\n<html><head>\n  <link rel=\"stylesheet\" href=\"main.css\"></head><body>\n  <script src=\"main.js\"></script></body></html>"
        );
    }

    #[test]
    fn test_inject_head_moves_scripts_only() {
        let preload = PreloadSet::default();
        let mut context = ctx(&preload, &[]);
        context.inject = InjectMode::Target(InsertPoint::Head);

        let html = run(
            &[OutputFile::entry("main.js", "main"), OutputFile::asset("main.css")],
            &context,
        );

        assert!(html.contains(
            "<head>\n  <script src=\"main.js\"></script>\n  <link rel=\"stylesheet\" href=\"main.css\"></head><body></body>"
        ));
    }

    #[test]
    fn test_preload_only_listed_dynamic_entries() {
        let preload: PreloadSet = ["chunkA"].into_iter().collect();
        let html = run(
            &[
                OutputFile::dynamic_entry("chunkA.js", "chunkA"),
                OutputFile::dynamic_entry("chunkB.js", "chunkB"),
            ],
            &ctx(&preload, &[]),
        );

        assert!(html.contains("<link rel=\"preload\" href=\"chunkA.js\" as=\"script\">"));
        assert!(!html.contains("chunkB"));
    }

    #[test]
    fn test_preload_unknown_type_skipped() {
        let preload: PreloadSet = ["lazy"].into_iter().collect();
        let html = run(
            &[OutputFile::dynamic_entry("lazy.wasm", "lazy")],
            &ctx(&preload, &[]),
        );

        assert!(!html.contains("preload"));
    }

    #[test]
    fn test_disabled_still_runs_externals() {
        let preload = PreloadSet::default();
        let externals = vec![external(Position::After, "https://cdn.test/x.js", ResourceType::Script)];
        let mut context = ctx(&preload, &externals);
        context.inject = InjectMode::Disabled;

        let html = run(&[OutputFile::entry("main.js", "main")], &context);

        assert!(!html.contains("main.js"));
        assert!(html.contains("<script src=\"https://cdn.test/x.js\"></script>"));
    }

    #[test]
    fn test_external_order_and_attributes() {
        let preload = PreloadSet::default();
        let mut before = external(Position::Before, "https://cdn.test/a.js", ResourceType::Script);
        before.cross_origin = Some(CrossOrigin::Anonymous);
        let mut after = external(Position::After, "theme.css", ResourceType::Style);
        after.insert_point = Some(InsertPoint::Body);
        let externals = vec![after, before];

        let mut context = ctx(&preload, &externals);
        context.module_mode = ModuleMode::Module;
        context.online_path = "/static/";

        let html = run(&[OutputFile::entry("main.js", "main")], &context);

        let a = html
            .find("<script type=\"module\" crossorigin=\"anonymous\" src=\"https://cdn.test/a.js\">")
            .unwrap();
        let main = html
            .find("<script type=\"module\" src=\"/static/main.js\">")
            .unwrap();
        let theme = html.find("<link rel=\"stylesheet\" href=\"theme.css\">").unwrap();
        assert!(a < main && main < theme);
    }

    #[test]
    fn test_nomodule_is_bare() {
        let preload = PreloadSet::default();
        let mut context = ctx(&preload, &[]);
        context.module_mode = ModuleMode::NoModule;

        let html = run(&[OutputFile::entry("legacy.js", "legacy")], &context);

        assert!(html.contains("<script nomodule src=\"legacy.js\"></script>"));
    }
}
