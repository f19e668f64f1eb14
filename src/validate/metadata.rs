use super::*;

pub const HEAD_ITEMSCOPE: &str = "itemscope";
pub const HEAD_ITEMTYPE: &str = "http://smpte.org/standards/documents";

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid number regex"));
static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:-\d{2})?$").expect("valid version regex"));
static PARTIAL_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>\d{4})(?:-(?P<month>\d{2})(?:-(?P<day>\d{2})(?P<time>T.+)?)?)?$")
        .expect("valid partial date regex")
});

/// Reads and cross-checks the publication metadata carried by `head`.
///
/// Recoverable problems are logged and the offending field is nulled. A fatal
/// problem is logged as the last diagnostic and returned; nothing after it is
/// checked.
pub fn validate_head(
    head: &Node,
    title: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> Result<DocumentMetadata, FatalError> {
    let fatal = |diagnostics: &mut Diagnostics, error: FatalError| {
        diagnostics.error(error.to_string(), Some(head));
        error
    };

    if head.attr("itemscope") != Some(HEAD_ITEMSCOPE) {
        diagnostics.error("head@itemscope is invalid", Some(head));
    }
    if head.attr("itemtype") != Some(HEAD_ITEMTYPE) {
        diagnostics.error("head@itemtype is invalid", Some(head));
    }

    let Some(pub_title) = title.map(str::trim).filter(|value| !value.is_empty()) else {
        return Err(fatal(diagnostics, FatalError::MissingTitle));
    };

    let raw_type = head_field(head, "pubType", diagnostics);
    let Some(pub_type) = raw_type.and_then(PubType::parse) else {
        let value = raw_type.map(ToOwned::to_owned);
        return Err(fatal(diagnostics, FatalError::InvalidPubType { value }));
    };

    let raw_state = head_field(head, "pubState", diagnostics);
    let Some(pub_state) = raw_state.and_then(PubState::parse) else {
        let value = raw_state.map(ToOwned::to_owned);
        return Err(fatal(diagnostics, FatalError::InvalidPubState { value }));
    };
    let published = pub_state == PubState::Pub;

    let pub_number = formatted_field(head, "pubNumber", &NUMBER_REGEX, diagnostics);
    if pub_number.is_none() && published && pub_type != PubType::Om {
        diagnostics.error("pubNumber must be specified for published documents", Some(head));
    }

    let pub_suite_title = text_field(head, "pubSuiteTitle", diagnostics);

    let mut pub_part = formatted_field(head, "pubPart", &NUMBER_REGEX, diagnostics);
    if pub_part.is_some() {
        let mut orphaned = false;
        if pub_number.is_none() {
            diagnostics.error("pubNumber must be specified if pubPart is specified", Some(head));
            orphaned = true;
        }
        if pub_suite_title.is_none() {
            diagnostics.error(
                "pubSuiteTitle must be specified if pubPart is specified",
                Some(head),
            );
            orphaned = true;
        }
        if orphaned {
            pub_part = None;
        }
    }

    let mut pub_version = formatted_field(head, "pubVersion", &VERSION_REGEX, diagnostics);
    if pub_version.is_some() && pub_number.is_none() {
        diagnostics.error(
            "pubNumber must be specified if pubVersion is specified",
            Some(head),
        );
        pub_version = None;
    }

    let pub_date_time = date_field(head, "pubDateTime", diagnostics);
    if published && pub_date_time.is_none() {
        return Err(fatal(diagnostics, FatalError::MissingPubDateTime));
    }

    let effective_date_time = date_field(head, "effectiveDateTime", diagnostics);
    if pub_type == PubType::Om && published && effective_date_time.is_none() {
        return Err(fatal(diagnostics, FatalError::MissingEffectiveDateTime));
    }

    let mut pub_stage = None;
    let mut pub_tc = None;
    if pub_type.is_engineering_document() {
        let raw_stage = head_field(head, "pubStage", diagnostics);
        let Some(stage) = raw_stage.and_then(PubStage::parse) else {
            let value = raw_stage.map(ToOwned::to_owned);
            return Err(fatal(diagnostics, FatalError::InvalidPubStage { value }));
        };
        pub_stage = Some(stage);

        let Some(tc) = head_field(head, "pubTC", diagnostics).filter(|value| !value.is_empty())
        else {
            return Err(fatal(diagnostics, FatalError::InvalidPubTc));
        };
        pub_tc = Some(tc.to_string());

        if published && pub_version.is_none() {
            let pub_type = pub_type.as_str().to_string();
            return Err(fatal(diagnostics, FatalError::MissingPubVersion { pub_type }));
        }
    }

    let pub_confidential = match head_field(head, "pubConfidential", diagnostics) {
        None => None,
        Some("true") => Some(true),
        Some("false") => Some(false),
        Some(other) => {
            diagnostics.error(format!("pubConfidential invalid: {other}"), Some(head));
            None
        }
    };
    let disclosable_stage = matches!(pub_stage, Some(PubStage::Cd | PubStage::Pub));
    if pub_confidential == Some(false) && !disclosable_stage {
        let stage = pub_stage.map(|stage| stage.as_str().to_string());
        return Err(fatal(diagnostics, FatalError::ConfidentialityStage { stage }));
    }

    let pub_revision_of = text_field(head, "pubRevisionOf", diagnostics);

    Ok(DocumentMetadata {
        pub_title: pub_title.to_string(),
        pub_type,
        pub_state,
        pub_stage,
        pub_number,
        pub_part,
        pub_version,
        pub_suite_title,
        pub_tc,
        pub_confidential,
        pub_date_time,
        effective_date_time,
        pub_revision_of,
    })
}

/// `content` of the `meta[itemprop=name]` carrier, if any. A missing `content`
/// attribute reads as an empty value.
pub fn head_field<'a>(head: &'a Node, name: &str, diagnostics: &mut Diagnostics) -> Option<&'a str> {
    let mut carriers = head
        .descendants()
        .filter(|node| node.is("meta") && node.attr("itemprop") == Some(name));

    let first = carriers.next()?;
    if carriers.next().is_some() {
        diagnostics.error(format!("{name} is specified more than once"), Some(first));
    }

    Some(first.attr("content").unwrap_or_default())
}

fn formatted_field(
    head: &Node,
    name: &str,
    format: &Regex,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    let value = head_field(head, name, diagnostics)?;
    if !format.is_match(value) {
        diagnostics.error(format!("{name} invalid: {value}"), Some(head));
        return None;
    }
    Some(value.to_string())
}

fn text_field(head: &Node, name: &str, diagnostics: &mut Diagnostics) -> Option<String> {
    head_field(head, name, diagnostics)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

fn date_field(head: &Node, name: &str, diagnostics: &mut Diagnostics) -> Option<String> {
    let value = head_field(head, name, diagnostics)?;
    if !is_partial_iso_date(value) {
        diagnostics.error(format!("{name} invalid: {value}"), Some(head));
        return None;
    }
    Some(value.to_string())
}

/// `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, or a full date followed by a time.
pub fn is_partial_iso_date(value: &str) -> bool {
    let Some(captures) = PARTIAL_DATE_REGEX.captures(value) else {
        return false;
    };

    let number = |group: &str| {
        captures
            .name(group)
            .and_then(|value| value.as_str().parse::<u32>().ok())
    };

    let Some(year) = number("year").and_then(|year| i32::try_from(year).ok()) else {
        return false;
    };
    let month = number("month");
    let day = number("day");

    if captures.name("time").is_some() {
        return DateTime::parse_from_rfc3339(value).is_ok()
            || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").is_ok()
            || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").is_ok();
    }

    match (month, day) {
        (Some(month), Some(day)) => NaiveDate::from_ymd_opt(year, month, day).is_some(),
        (Some(month), None) => (1..=12).contains(&month),
        _ => true,
    }
}
