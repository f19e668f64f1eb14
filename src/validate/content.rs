use super::*;

/// Inline elements that must not contain other elements.
const TERMINAL_PHRASING: [&str; 11] = [
    "br", "code", "dfn", "kbd", "q", "samp", "strong", "time", "var", "wbr", "a",
];

/// Inline elements whose children must themselves be phrasing content.
const CONTAINER_PHRASING: [&str; 10] = [
    "b", "bdo", "bdi", "em", "i", "s", "span", "sub", "sup", "u",
];

pub type ContentCheck = fn(&ContentModel, &Node, &mut Diagnostics) -> bool;

/// Phrasing and block content rules. Each check answers whether the element
/// belongs to its category and reports problems with the element's children.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentModel {
    pub table_bodies: TableBodyRule,
}

impl ContentModel {
    pub fn new(table_bodies: TableBodyRule) -> Self {
        Self { table_bodies }
    }

    pub fn is_phrasing(&self, node: &Node, diagnostics: &mut Diagnostics) -> bool {
        let tag = node.tag.as_str();

        // MathML is opaque.
        if tag == "math" {
            return true;
        }

        if TERMINAL_PHRASING.contains(&tag) {
            if node.has_element_children() {
                diagnostics.error(
                    format!("{} must not contain elements", node.describe()),
                    Some(node),
                );
            }
            return true;
        }

        if CONTAINER_PHRASING.contains(&tag) {
            self.check_children(node, diagnostics, Self::is_phrasing);
            return true;
        }

        false
    }

    pub fn is_block(&self, node: &Node, diagnostics: &mut Diagnostics) -> bool {
        match node.tag.as_str() {
            "p" | "dt" | "dd" => self.check_children(node, diagnostics, Self::is_phrasing),
            "div" if node.has_class("formula") => check_formula(node, diagnostics),
            "div" | "li" => self.check_children(node, diagnostics, Self::is_flow),
            "ul" | "ol" => self.check_list(node, diagnostics),
            "dl" => self.check_description_list(node, diagnostics),
            "pre" | "blockquote" => {
                if node.has_element_children() {
                    diagnostics.error(
                        format!("{} must contain text only", node.describe()),
                        Some(node),
                    );
                }
            }
            "figure" | "aside" => {}
            "table" => self.check_table(node, diagnostics),
            _ => return false,
        }

        true
    }

    pub fn is_flow(&self, node: &Node, diagnostics: &mut Diagnostics) -> bool {
        self.is_phrasing(node, diagnostics) || self.is_block(node, diagnostics)
    }

    /// Reports every child rejected by `accept`. Always scans all children.
    pub fn check_children(&self, node: &Node, diagnostics: &mut Diagnostics, accept: ContentCheck) {
        for child in &node.children {
            if !accept(self, child, diagnostics) {
                diagnostics.error(
                    format!(
                        "{} is not permitted in {}",
                        child.describe(),
                        node.describe()
                    ),
                    Some(child),
                );
            }
        }
    }

    fn check_list(&self, list: &Node, diagnostics: &mut Diagnostics) {
        for child in &list.children {
            if child.is("li") {
                self.is_block(child, diagnostics);
            } else {
                diagnostics.error(
                    format!(
                        "{} is not permitted in {}; expected <li>",
                        child.describe(),
                        list.describe()
                    ),
                    Some(child),
                );
            }
        }
    }

    fn check_description_list(&self, list: &Node, diagnostics: &mut Diagnostics) {
        let model = *self;
        let label = list.describe();
        let terms = GrammarRule::one_or_more(model.block_literal("dt"))
            .or_missing(format!("Each group of {label} must start with a <dt> element"));
        let definitions = GrammarRule::one_or_more(model.block_literal("dd"))
            .or_missing(format!("Each group of {label} must contain a <dd> element"));

        check_definition_groups(list, diagnostics, &[terms, definitions]);
    }

    /// Literal for one `<tag>` whose children are checked as block content.
    pub fn block_literal(&self, tag: &'static str) -> GrammarRule {
        let model = *self;
        GrammarRule::literal(format!("<{tag}>"), move |node| node.is(tag)).with_check(
            move |node, diagnostics| {
                model.is_block(node, diagnostics);
            },
        )
    }
}

/// Whether `node` is phrasing content, judged on its tag alone.
pub fn is_phrasing_element(node: &Node) -> bool {
    let tag = node.tag.as_str();
    tag == "math" || TERMINAL_PHRASING.contains(&tag) || CONTAINER_PHRASING.contains(&tag)
}

/// Whether `node` is block content, judged on its tag alone.
pub fn is_block_element(node: &Node) -> bool {
    matches!(
        node.tag.as_str(),
        "p" | "dt"
            | "dd"
            | "div"
            | "li"
            | "ul"
            | "ol"
            | "dl"
            | "pre"
            | "blockquote"
            | "figure"
            | "aside"
            | "table"
    )
}

pub fn is_flow_element(node: &Node) -> bool {
    is_phrasing_element(node) || is_block_element(node)
}

/// Walks `dt`/`dd` groups of a description list. Elements other than `dt` and
/// `dd` are reported and skipped so the remaining groups are still checked.
pub fn check_definition_groups(list: &Node, diagnostics: &mut Diagnostics, group: &[GrammarRule]) {
    let mut cursor = Cursor::new(&list.children);

    while let Some(child) = cursor.peek() {
        if !(child.is("dt") || child.is("dd")) {
            diagnostics.error(
                format!(
                    "{} is not permitted in {}",
                    child.describe(),
                    list.describe()
                ),
                Some(child),
            );
            cursor.advance();
            continue;
        }

        let before = cursor.position();
        for rule in group {
            rule.evaluate(&mut cursor, diagnostics);
        }
        if cursor.position() == before {
            cursor.advance();
        }
    }
}

fn check_formula(formula: &Node, diagnostics: &mut Diagnostics) {
    if formula.non_empty_attr("id").is_none() {
        diagnostics.error("Formula must carry an id attribute", Some(formula));
    }

    let single_math = formula.children.len() == 1 && formula.children[0].is("math");
    if !single_math {
        diagnostics.error(
            format!(
                "Formula {} must contain exactly one <math> element",
                formula.describe()
            ),
            Some(formula),
        );
    }
}

/// A phrasing element with no element children, e.g. the `<a>` of a
/// definition source.
pub fn is_terminal_phrasing(node: &Node) -> bool {
    TERMINAL_PHRASING.contains(&node.tag.as_str()) && !node.has_element_children()
}
