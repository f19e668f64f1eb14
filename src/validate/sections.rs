use super::*;

pub const FOREWORD_ID: &str = "sec-foreword";
pub const INTRODUCTION_ID: &str = "sec-introduction";
pub const SCOPE_ID: &str = "sec-scope";
pub const CONFORMANCE_ID: &str = "sec-conformance";
pub const NORMATIVE_REFERENCES_ID: &str = "sec-normative-references";
pub const DEFINITIONS_ID: &str = "sec-terms-and-definitions";
pub const ELEMENTS_ID: &str = "sec-elements";
pub const BIBLIOGRAPHY_ID: &str = "sec-bibliography";
pub const FRONT_MATTER_ID: &str = "sec-front-matter";
pub const EXTERNAL_DEFINITIONS_ID: &str = "terms-ext-defs";
pub const INTERNAL_DEFINITIONS_ID: &str = "terms-int-defs";

/// Ids of the sections with a fixed place in the body; never clauses.
const RESERVED_SECTION_IDS: [&str; 8] = [
    FOREWORD_ID,
    INTRODUCTION_ID,
    SCOPE_ID,
    CONFORMANCE_ID,
    NORMATIVE_REFERENCES_ID,
    DEFINITIONS_ID,
    ELEMENTS_ID,
    BIBLIOGRAPHY_ID,
];

/// Heading level of a top-level clause or annex.
pub const TOP_LEVEL_HEADING: usize = 2;

pub fn is_section(node: &Node, id: &str) -> bool {
    node.is("section") && node.has_id(id)
}

fn is_reserved_section(node: &Node) -> bool {
    node.id
        .as_deref()
        .is_some_and(|id| RESERVED_SECTION_IDS.contains(&id))
}

// ---------------------------------------------------------------------------
// Clauses and annexes
// ---------------------------------------------------------------------------

pub fn is_clause(node: &Node) -> bool {
    node.is("section") && !node.has_class("annex") && !is_reserved_section(node)
}

pub fn is_annex(node: &Node) -> bool {
    node.is("section") && node.has_class("annex") && !is_reserved_section(node)
}

/// A clause opens with its heading, then holds either sub-clauses one level
/// down or flow content, never both.
pub fn check_clause_content(
    section: &Node,
    level: usize,
    model: ContentModel,
    diagnostics: &mut Diagnostics,
) {
    let mut cursor = Cursor::new(&section.children);
    let heading = format!("h{level}");

    match cursor.peek() {
        Some(first) if first.is(&heading) => {
            model.check_children(first, diagnostics, ContentModel::is_phrasing);
            cursor.advance();
        }
        _ => diagnostics.error(
            format!("Clause {} is missing a heading <{heading}>", section.label()),
            Some(section),
        ),
    }

    let next_level = level + 1;
    let sub_clause =
        GrammarRule::literal(format!("sub-clause <h{next_level}>"), |node| node.is("section"))
            .with_check(move |node, diagnostics| {
                check_clause_content(node, next_level, model, diagnostics)
            });
    let flow = GrammarRule::literal("flow content", is_flow_element).with_check(
        move |node, diagnostics| {
            model.is_flow(node, diagnostics);
        },
    );
    let alternatives = GrammarRule::one_of(vec![sub_clause, flow]);

    let mut has_sub_clauses = false;
    let mut has_text = false;

    while let Some(child) = cursor.peek() {
        let Some((choice, rule)) = alternatives.select(&cursor) else {
            diagnostics.error(
                format!(
                    "Unknown element {} in clause {}",
                    child.describe(),
                    section.label()
                ),
                Some(child),
            );
            cursor.advance();
            continue;
        };

        rule.evaluate(&mut cursor, diagnostics);
        if choice == 0 {
            has_sub_clauses = true;
        } else {
            has_text = true;
        }
    }

    if has_sub_clauses && has_text {
        diagnostics.error(
            format!("Clause {} combines sub-clauses and text", section.label()),
            Some(section),
        );
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

impl ContentModel {
    pub fn check_table(&self, table: &Node, diagnostics: &mut Diagnostics) {
        let model = *self;

        let caption = GrammarRule::literal("<caption>", |node| node.is("caption")).with_check(
            move |node, diagnostics| {
                model.check_children(node, diagnostics, ContentModel::is_phrasing)
            },
        );
        let bodies = match self.table_bodies {
            TableBodyRule::OneOrMore => GrammarRule::one_or_more(row_group("tbody", model))
                .or_missing("Table is missing a tbody element"),
            TableBodyRule::ZeroOrMore => GrammarRule::zero_or_more(row_group("tbody", model)),
        };

        let grammar = GrammarRule::sequence(
            "Table",
            vec![
                GrammarRule::exactly_one(caption).or_missing("Table is missing a caption"),
                GrammarRule::optional(row_group("thead", model)),
                bodies,
                GrammarRule::optional(row_group("tfoot", model)),
            ],
        );

        grammar.evaluate(&mut Cursor::new(&table.children), diagnostics);
    }
}

fn row_group(tag: &'static str, model: ContentModel) -> GrammarRule {
    GrammarRule::literal(format!("<{tag}>"), move |node| node.is(tag))
        .with_check(move |node, diagnostics| check_table_rows(node, model, diagnostics))
}

fn check_table_rows(group: &Node, model: ContentModel, diagnostics: &mut Diagnostics) {
    for row in &group.children {
        if !row.is("tr") {
            diagnostics.error(
                format!(
                    "{} is not permitted in {}; expected <tr>",
                    row.describe(),
                    group.describe()
                ),
                Some(row),
            );
            continue;
        }

        for cell in &row.children {
            if cell.is("th") || cell.is("td") {
                model.check_children(cell, diagnostics, ContentModel::is_flow);
            } else {
                diagnostics.error(
                    format!(
                        "{} is not permitted in <tr>; expected <th> or <td>",
                        cell.describe()
                    ),
                    Some(cell),
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Reference lists
// ---------------------------------------------------------------------------

pub fn check_normative_references(section: &Node, diagnostics: &mut Diagnostics) {
    check_reference_list(section, "Normative references", diagnostics);
}

pub fn check_bibliography(section: &Node, diagnostics: &mut Diagnostics) {
    check_reference_list(section, "Bibliography references", diagnostics);
}

/// Every entry is checked even after a bad one.
fn check_reference_list(section: &Node, prefix: &str, diagnostics: &mut Diagnostics) {
    let list = match section.children.as_slice() {
        [only] if only.is("ul") => only,
        _ => {
            diagnostics.error(
                format!("{prefix} section must contain a single <ul> element."),
                Some(section),
            );
            return;
        }
    };

    for item in &list.children {
        if !item.is("li") {
            diagnostics.error(
                format!("{prefix}: the <ul> element must contain only <li> elements."),
                Some(item),
            );
            continue;
        }

        let cites = item
            .descendants()
            .filter(|node| node.is("cite"))
            .collect::<Vec<&Node>>();
        match cites.as_slice() {
            [cite] if cite.non_empty_attr("id").is_none() => diagnostics.error(
                format!("{prefix}: each <cite> element must contain an id attribute."),
                Some(item),
            ),
            [_] => {}
            _ => diagnostics.error(
                format!("{prefix}: each <li> element must contain a single <cite> element."),
                Some(item),
            ),
        }

        let anchors = item.descendants().filter(|node| node.is("a")).count();
        if anchors > 1 {
            diagnostics.error(
                format!("{prefix}: each <li> element must contain at most one <a> element."),
                Some(item),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Terms and definitions
// ---------------------------------------------------------------------------

pub fn check_definitions(section: &Node, model: ContentModel, diagnostics: &mut Diagnostics) {
    let external = GrammarRule::literal("external definitions", |node| {
        node.is("ul") && node.has_id(EXTERNAL_DEFINITIONS_ID)
    })
    .with_check(check_external_definitions);
    let internal = GrammarRule::literal("internal definitions", |node| {
        node.is("dl") && node.has_id(INTERNAL_DEFINITIONS_ID)
    })
    .with_check(move |node, diagnostics| check_internal_definitions(node, model, diagnostics));

    let grammar = GrammarRule::sequence(
        "Terms and definitions clause",
        vec![GrammarRule::optional(external), GrammarRule::optional(internal)],
    );

    grammar.evaluate(&mut Cursor::new(&section.children), diagnostics);
}

fn check_external_definitions(node: &Node, diagnostics: &mut Diagnostics) {
    for item in &node.children {
        if !item.is("li") {
            diagnostics.error(
                "External definitions: the <ul> element must contain only <li> elements.",
                Some(item),
            );
            continue;
        }

        let single_anchor = item.children.len() == 1 && item.children[0].is("a");
        if !single_anchor {
            diagnostics.error(
                "External definitions: each <li> element must contain exactly one <a> element.",
                Some(item),
            );
        }
    }
}

fn check_internal_definitions(node: &Node, model: ContentModel, diagnostics: &mut Diagnostics) {
    let terms = GrammarRule::one_or_more(model.block_literal("dt")).or_missing(
        "Internal definitions: each definition must start with at least one <dt> element.",
    );
    let definition = GrammarRule::exactly_one(model.block_literal("dd"))
        .or_missing("Internal definitions: each definition must contain a <dd> element.");
    let source = GrammarRule::optional(
        GrammarRule::literal("definition source", |node| node.is("dd"))
            .with_check(check_definition_source),
    );

    check_definition_groups(node, diagnostics, &[terms, definition, source]);
}

/// The second `dd` of a definition names where the definition comes from.
fn check_definition_source(node: &Node, diagnostics: &mut Diagnostics) {
    let single_link = matches!(
        node.children.as_slice(),
        [only] if only.is("a") && is_terminal_phrasing(only)
    );
    if !single_link {
        diagnostics.error(
            "Internal definitions: a definition source <dd> must contain exactly one <a> element.",
            Some(node),
        );
    }
}

// ---------------------------------------------------------------------------
// Elements annex
// ---------------------------------------------------------------------------

pub fn check_elements_annex(node: &Node, diagnostics: &mut Diagnostics) {
    let list = match node.children.as_slice() {
        [only] if only.is("ol") => only,
        _ => {
            diagnostics.error(
                "The Elements Annex section must contain a single <ol> element.",
                Some(node),
            );
            return;
        }
    };

    for item in &list.children {
        if !item.is("li") {
            diagnostics.error(
                "The <ol> element of the Elements Annex must contain only <li> elements.",
                Some(item),
            );
            continue;
        }

        let well_formed = match item.children.as_slice() {
            [anchor] => {
                anchor.is("a")
                    && ["title", "id", "href"]
                        .iter()
                        .all(|name| anchor.non_empty_attr(name).is_some())
            }
            _ => false,
        };
        if !well_formed {
            diagnostics.error(
                "Each <li> element of the Elements Annex must contain a single <a> element with title, id and href attributes.",
                Some(item),
            );
        }
    }
}
