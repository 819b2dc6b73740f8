use swc_core::{
    common::Span,
    ecma::{
        ast::*,
        visit::{Visit, VisitWith},
    },
};

use crate::source::ParsedSource;

/// Start of an element's opening tag: 1-based line, 0-based column.
///
/// Deserializes from the `{"lineNumer": .., "columnNumber": ..}` shape build
/// tools hand over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SourcePosition {
    #[serde(rename = "lineNumer")]
    pub line: usize,
    #[serde(rename = "columnNumber")]
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Where the matched element sits in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSlot {
    /// Direct child of an element or fragment.
    Children,
    /// Anywhere an expression goes: a returned root, `{...}`, an attribute value.
    Expression,
}

/// Handle on the element found at a position. The opening-tag span is its
/// identity when the rewrite step looks it up again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementMatch {
    pub opening_span: Span,
    pub position: SourcePosition,
    pub slot: MatchSlot,
    pub name: String,
}

pub fn element_name(name: &JSXElementName) -> String {
    fn object(obj: &JSXObject) -> String {
        match obj {
            JSXObject::Ident(i) => i.sym.to_string(),
            JSXObject::JSXMemberExpr(m) => format!("{}.{}", object(&m.obj), m.prop.sym),
        }
    }
    match name {
        JSXElementName::Ident(i) => i.sym.to_string(),
        JSXElementName::JSXMemberExpr(m) => format!("{}.{}", object(&m.obj), m.prop.sym),
        JSXElementName::JSXNamespacedName(n) => format!("{}:{}", n.ns.sym, n.name.sym),
    }
}

// -----------------------------------------------------------------------------
// Walk
// -----------------------------------------------------------------------------

struct Locator<'a> {
    parsed: &'a ParsedSource,
    target: Option<SourcePosition>,
    sites: Vec<ElementMatch>,
}

impl Locator<'_> {
    fn done(&self) -> bool {
        self.target.is_some() && !self.sites.is_empty()
    }

    fn site(&self, el: &JSXElement, slot: MatchSlot) -> Option<ElementMatch> {
        let span = el.opening.span;
        // Synthesized elements carry no location.
        if span.is_dummy() {
            return None;
        }
        let (line, column) = self.parsed.line_col(span.lo());
        Some(ElementMatch {
            opening_span: span,
            position: SourcePosition::new(line, column),
            slot,
            name: element_name(&el.opening.name),
        })
    }

    fn visit_candidate(&mut self, el: &JSXElement, slot: MatchSlot) {
        if self.done() {
            return;
        }
        if let Some(site) = self.site(el, slot) {
            match self.target {
                Some(target) if site.position == target => {
                    self.sites.push(site);
                    return;
                }
                Some(_) => {}
                None => self.sites.push(site),
            }
        }
        el.visit_children_with(self);
    }
}

impl Visit for Locator<'_> {
    fn visit_jsx_element_child(&mut self, child: &JSXElementChild) {
        match child {
            JSXElementChild::JSXElement(el) => self.visit_candidate(el, MatchSlot::Children),
            _ => child.visit_children_with(self),
        }
    }

    fn visit_jsx_element(&mut self, el: &JSXElement) {
        self.visit_candidate(el, MatchSlot::Expression);
    }
}

/// First element, in document order, whose opening tag starts exactly at
/// `target`.
pub fn find_element(parsed: &ParsedSource, target: SourcePosition) -> Option<ElementMatch> {
    let mut locator = Locator {
        parsed,
        target: Some(target),
        sites: vec![],
    };
    parsed.module.visit_with(&mut locator);
    let found = locator.sites.pop();
    match &found {
        Some(m) => tracing::debug!(position = %target, element = %m.name, slot = ?m.slot, "matched element"),
        None => tracing::debug!(position = %target, "no element at position"),
    }
    found
}

/// Every element with a recorded location, in document order.
pub fn list_elements(parsed: &ParsedSource) -> Vec<ElementMatch> {
    let mut locator = Locator {
        parsed,
        target: None,
        sites: vec![],
    };
    parsed.module.visit_with(&mut locator);
    locator.sites
}
