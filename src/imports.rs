use swc_core::{
    common::{SyntaxContext, DUMMY_SP},
    ecma::ast::*,
};

use crate::config::ReportConfig;

fn as_import(item: &ModuleItem) -> Option<&ImportDecl> {
    match item {
        ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) => Some(decl),
        _ => None,
    }
}

/// Whether a top-level import already pulls from `source_name`.
pub fn has_import(module: &Module, source_name: &str) -> bool {
    module
        .body
        .iter()
        .filter_map(as_import)
        .any(|decl| &*decl.src.value == source_name)
}

/// Number of top-level imports from `source_name`.
pub fn count_imports(module: &Module, source_name: &str) -> usize {
    module
        .body
        .iter()
        .filter_map(as_import)
        .filter(|decl| &*decl.src.value == source_name)
        .count()
}

/// `import BuriedReport from "buried-component-report";`
pub fn build_import(config: &ReportConfig) -> ModuleItem {
    ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
        span: DUMMY_SP,
        specifiers: vec![ImportSpecifier::Default(ImportDefaultSpecifier {
            span: DUMMY_SP,
            local: Ident::new(config.tag_name.clone().into(), DUMMY_SP, SyntaxContext::empty()),
        })],
        src: Box::new(Str {
            span: DUMMY_SP,
            value: config.source_name.clone().into(),
            raw: None,
        }),
        type_only: false,
        with: None,
        phase: ImportPhase::Evaluation,
    }))
}

/// Insert the report import right after the last top-level import, or at the
/// top when there is none. Existing duplicates are left alone. Returns
/// whether an import was added.
pub fn ensure_import(module: &mut Module, config: &ReportConfig) -> bool {
    if has_import(module, &config.source_name) {
        tracing::debug!(source = %config.source_name, "import already present");
        return false;
    }
    let index = module
        .body
        .iter()
        .rposition(|item| as_import(item).is_some())
        .map_or(0, |last| last + 1);
    module.body.insert(index, build_import(config));
    tracing::debug!(source = %config.source_name, index, "inserted import");
    true
}
