use super::*;

/// The macro-structure of a standards document body, front matter through
/// bibliography.
pub fn body_grammar(model: ContentModel) -> GrammarRule {
    let leading = |name: &'static str, id: &'static str| {
        GrammarRule::literal(name, move |node| is_section(node, id))
    };

    GrammarRule::sequence(
        "Body section",
        vec![
            GrammarRule::optional(leading("Foreword", FOREWORD_ID)),
            GrammarRule::optional(leading("Introduction", INTRODUCTION_ID)),
            GrammarRule::exactly_one(leading("Scope", SCOPE_ID))
                .or_missing("Mandatory Scope clause missing"),
            GrammarRule::optional(leading("Conformance", CONFORMANCE_ID)),
            GrammarRule::optional(
                leading("Normative references", NORMATIVE_REFERENCES_ID)
                    .with_check(check_normative_references),
            ),
            GrammarRule::optional(
                leading("Terms and definitions", DEFINITIONS_ID)
                    .with_check(move |node, diagnostics| check_definitions(node, model, diagnostics)),
            ),
            GrammarRule::zero_or_more(GrammarRule::literal("Clause", is_clause).with_check(
                move |node, diagnostics| {
                    check_clause_content(node, TOP_LEVEL_HEADING, model, diagnostics)
                },
            )),
            GrammarRule::zero_or_more(GrammarRule::literal("Annex", is_annex).with_check(
                move |node, diagnostics| {
                    check_clause_content(node, TOP_LEVEL_HEADING, model, diagnostics)
                },
            )),
            GrammarRule::optional(
                leading("Elements Annex", ELEMENTS_ID).with_check(check_elements_annex),
            ),
            GrammarRule::optional(
                leading("Bibliography", BIBLIOGRAPHY_ID).with_check(check_bibliography),
            ),
        ],
    )
}

/// Checks the body's children against [`body_grammar`]. Never aborts; every
/// finding goes to `diagnostics`.
pub fn validate_body(body: &Node, diagnostics: &mut Diagnostics, options: &ValidationOptions) {
    if !body.is("body") {
        diagnostics.error(
            format!("Expected a <body> element, found {}", body.describe()),
            Some(body),
        );
    }

    let grammar = body_grammar(ContentModel::new(options.table_bodies));
    grammar.evaluate(&mut Cursor::new(&body.children), diagnostics);

    debug!(
        sections = body.children.len(),
        errors = diagnostics.error_list().len(),
        "body grammar evaluated"
    );
}
