use swc_core::{
    common::{SyntaxContext, DUMMY_SP},
    ecma::{
        ast::*,
        visit::{VisitMut, VisitMutWith},
    },
};

use crate::{
    config::ReportConfig,
    inputs::ReportInputs,
    locate::{ElementMatch, MatchSlot},
};

fn tag(config: &ReportConfig) -> JSXElementName {
    JSXElementName::Ident(Ident::new(
        config.tag_name.clone().into(),
        DUMMY_SP,
        SyntaxContext::empty(),
    ))
}

fn spacer() -> JSXElementChild {
    JSXElementChild::JSXText(JSXText {
        span: DUMMY_SP,
        value: "\n ".into(),
        raw: "\n ".into(),
    })
}

/// `<BuriedReport ...inputs>{element}</BuriedReport>`
pub fn build_wrapper(element: JSXElement, inputs: &ReportInputs, config: &ReportConfig) -> JSXElement {
    JSXElement {
        span: DUMMY_SP,
        opening: JSXOpeningElement {
            name: tag(config),
            attrs: inputs.to_jsx_attrs(),
            self_closing: false,
            type_args: None,
            span: DUMMY_SP,
        },
        children: vec![JSXElementChild::JSXElement(Box::new(element))],
        closing: Some(JSXClosingElement {
            span: DUMMY_SP,
            name: tag(config),
        }),
    }
}

struct Rewriter<'a> {
    target: &'a ElementMatch,
    inputs: &'a ReportInputs,
    config: &'a ReportConfig,
    applied: bool,
}

impl Rewriter<'_> {
    fn is_target(&self, el: &JSXElement) -> bool {
        !el.opening.span.is_dummy() && el.opening.span == self.target.opening_span
    }

    // The whole child list is replaced, so siblings of the target are dropped.
    fn overwrite_children(&mut self, children: &mut Vec<JSXElementChild>) -> bool {
        let idx = children.iter().position(|c| match c {
            JSXElementChild::JSXElement(el) => self.is_target(el),
            _ => false,
        });
        let Some(idx) = idx else {
            return false;
        };
        let JSXElementChild::JSXElement(el) = children.swap_remove(idx) else {
            return false;
        };
        let dropped = children.len();
        let wrapper = build_wrapper(*el, self.inputs, self.config);
        *children = vec![
            spacer(),
            JSXElementChild::JSXElement(Box::new(wrapper)),
            spacer(),
        ];
        tracing::debug!(element = %self.target.name, dropped, "wrapped element in child list");
        self.applied = true;
        true
    }

    fn wrap_in_place(&mut self, el: &mut JSXElement) {
        let wrapper = build_wrapper(el.clone(), self.inputs, self.config);
        *el = wrapper;
        tracing::debug!(element = %self.target.name, "wrapped element in place");
        self.applied = true;
    }
}

impl VisitMut for Rewriter<'_> {
    fn visit_mut_jsx_element(&mut self, node: &mut JSXElement) {
        if self.applied {
            return;
        }
        if self.target.slot == MatchSlot::Expression && self.is_target(node) {
            self.wrap_in_place(node);
            return;
        }
        if self.overwrite_children(&mut node.children) {
            return;
        }
        node.visit_mut_children_with(self);
    }

    fn visit_mut_jsx_fragment(&mut self, node: &mut JSXFragment) {
        if self.applied {
            return;
        }
        if self.overwrite_children(&mut node.children) {
            return;
        }
        node.visit_mut_children_with(self);
    }
}

/// Wrap the element identified by `target`. Returns whether it was found.
pub fn wrap_element(
    module: &mut Module,
    target: &ElementMatch,
    inputs: &ReportInputs,
    config: &ReportConfig,
) -> bool {
    let mut rewriter = Rewriter {
        target,
        inputs,
        config,
        applied: false,
    };
    module.visit_mut_with(&mut rewriter);
    rewriter.applied
}
