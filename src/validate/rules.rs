use super::*;

static CONFORMANCE_KEYWORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(shall|should|may)\b").expect("valid conformance keyword regex")
});
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+:").expect("valid url scheme regex"));
static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static ID_SEED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]\w*").expect("valid id seed regex"));

/// Sections never scanned for conformance keywords.
const NOTATION_EXEMPT_IDS: [&str; 3] = [FRONT_MATTER_ID, FOREWORD_ID, CONFORMANCE_ID];

/// Rules that depend on the publication type, plus definition and anchor
/// integrity. All findings are recoverable.
pub fn check_document_rules(
    document: &Document,
    metadata: &DocumentMetadata,
    diagnostics: &mut Diagnostics,
) {
    check_section_policy(&document.body, metadata.pub_type, diagnostics);
    if metadata.pub_type == PubType::Eg {
        check_conformance_notation(&document.body, diagnostics);
    }
    check_cross_references(document, diagnostics);
}

fn find_section<'a>(body: &'a Node, id: &str) -> Option<&'a Node> {
    body.descendants().find(|node| is_section(node, id))
}

fn has_author_content(section: &Node) -> bool {
    section.has_element_children() || !section.text_content().trim().is_empty()
}

fn check_section_policy(body: &Node, pub_type: PubType, diagnostics: &mut Diagnostics) {
    if !matches!(pub_type, PubType::St | PubType::Rp) {
        if let Some(conformance) = find_section(body, CONFORMANCE_ID) {
            diagnostics.error(
                format!(
                    "An {} document must not contain a conformance section",
                    pub_type.as_str()
                ),
                Some(conformance),
            );
        }
    }

    let Some(foreword) = find_section(body, FOREWORD_ID) else {
        return;
    };
    match pub_type {
        PubType::Om => diagnostics.error("OM must not contain a Foreword section.", Some(foreword)),
        PubType::Ag if has_author_content(foreword) => diagnostics.error(
            "AGs cannot contain author-specified Foreword prose.",
            Some(foreword),
        ),
        _ => {}
    }
}

fn check_conformance_notation(body: &Node, diagnostics: &mut Diagnostics) {
    let leaf_sections = body.descendants().filter(|node| {
        node.is("section")
            && !node.descendants().any(|child| child.is("section"))
            && !node
                .id
                .as_deref()
                .is_some_and(|id| NOTATION_EXEMPT_IDS.contains(&id))
    });

    for section in leaf_sections {
        let keyword = std::iter::once(section)
            .chain(section.descendants())
            .find_map(|node| CONFORMANCE_KEYWORD_REGEX.find(node.text_content()));

        if let Some(keyword) = keyword {
            diagnostics.error(
                format!(
                    "An EG must not contain the conformance notation {}",
                    keyword.as_str().to_lowercase()
                ),
                Some(section),
            );
        }
    }
}

pub fn normalize_term(term: &str) -> String {
    WHITESPACE_REGEX
        .replace_all(term.trim(), " ")
        .to_lowercase()
}

/// Every spelling under which a `dfn` can be referenced.
fn definition_terms(dfn: &Node, base: &str) -> Vec<String> {
    let mut terms = vec![base.to_string()];
    if !base.ends_with('s') {
        terms.push(format!("{base}s"));
    }
    if let Some(alternatives) = dfn.attr("data-lt") {
        terms.extend(
            alternatives
                .split('|')
                .map(normalize_term)
                .filter(|term| !term.is_empty()),
        );
    }
    terms
}

fn check_cross_references(document: &Document, diagnostics: &mut Diagnostics) {
    let mut definitions = BTreeSet::<String>::new();

    for dfn in document.body.descendants().filter(|node| node.is("dfn")) {
        let base = normalize_term(dfn.text_content());
        if base.is_empty() {
            diagnostics.error("Missing term in definition", Some(dfn));
            continue;
        }

        let terms = definition_terms(dfn, &base);
        if terms.iter().any(|term| definitions.contains(term)) {
            diagnostics.error("Duplicate definition", Some(dfn));
            continue;
        }

        if dfn.non_empty_attr("id").is_none() && !ID_SEED_REGEX.is_match(&base) {
            diagnostics.error("Cannot auto-generate id", Some(dfn));
            continue;
        }

        definitions.extend(terms);
    }

    let ids = document.ids();
    for anchor in document.body.descendants().filter(|node| node.is("a")) {
        let contents = anchor.text_content().trim();

        match anchor.non_empty_attr("href") {
            None if URL_REGEX.is_match(contents) => {}
            None if contents.is_empty() => diagnostics.error(
                "An anchor must either reference a definition (non-empty contents) or link to a resource (non-empty href attribute).",
                Some(anchor),
            ),
            None => {
                let term = normalize_term(contents);
                if !definitions.contains(&term) {
                    diagnostics.error(
                        format!("No definition for {term} was provided"),
                        Some(anchor),
                    );
                }
            }
            Some(href) => {
                if let Some(target) = href.strip_prefix('#') {
                    if !ids.contains(target) {
                        diagnostics.error("Anchor points to non-existent href", Some(anchor));
                    }
                }
            }
        }
    }
}
