use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{Scholar, ScholarId};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing required field: {0}")]
    MissingField(String),
}

static RE_RECORD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"id\.php\?id=(\d+)").expect("invalid regex: record id"));

static SEL_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2").expect("invalid selector: name"));

static SEL_DEGREE_BLOCK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("#paddingWrapper > div").expect("invalid selector: degree block")
});

static SEL_SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span").expect("invalid selector: span"));

static SEL_COLORED_SPAN: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"span[style*="color:"]"#).expect("invalid selector: colored span")
});

static SEL_FLAG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"img[src$=".gif"]"#).expect("invalid selector: flag"));

static SEL_RECORD_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[href*="id.php?id="]"#).expect("invalid selector: record link")
});

const MISSING_RECORD_MARKER: &str = "does not exist in the database";

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn record_id_from_href(href: &str) -> Option<ScholarId> {
    RE_RECORD_ID
        .captures(href)
        .and_then(|caps| caps[1].parse::<ScholarId>().ok())
}

/// The site answers unknown IDs with a regular page carrying an error message.
pub fn is_missing_record(html: &str) -> bool {
    html.contains(MISSING_RECORD_MARKER)
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Degree {
    degree_type: String,
    university: String,
    year: String,
    nationality: String,
}

/// Only the first degree block on the page is read.
fn parse_degree(document: &Html) -> Degree {
    for block in document.select(&SEL_DEGREE_BLOCK) {
        let Some(main_span) = block.select(&SEL_SPAN).next() else {
            continue;
        };
        let Some(university_span) = main_span
            .select(&SEL_COLORED_SPAN)
            .find(|span| span.id() != main_span.id())
        else {
            continue;
        };

        let mut degree = Degree {
            university: normalize_whitespace(&elem_text(university_span)),
            ..Degree::default()
        };

        let full_text = elem_text(main_span);
        let university_raw = elem_text(university_span);
        let parts: Vec<&str> = full_text.trim().split(university_raw.trim()).collect();
        if parts.len() == 2 {
            degree.degree_type = normalize_whitespace(parts[0]);
            degree.year = normalize_whitespace(parts[1]);
        }

        degree.nationality = block
            .select(&SEL_FLAG)
            .next()
            .and_then(|img| img.value().attr("title"))
            .map(normalize_whitespace)
            .unwrap_or_default();

        return degree;
    }

    Degree::default()
}

/// Advisor IDs in page order. A record link counts as an advisor when the
/// text of its parent element mentions "Advisor".
pub fn parse_advisor_ids(document: &Html) -> Vec<ScholarId> {
    let mut seen = HashSet::new();

    document
        .select(&SEL_RECORD_LINK)
        .filter(|link| {
            link.parent()
                .and_then(ElementRef::wrap)
                .is_some_and(|parent| elem_text(parent).contains("Advisor"))
        })
        .filter_map(|link| link.value().attr("href").and_then(record_id_from_href))
        .filter(|id| seen.insert(*id))
        .collect()
}

pub fn parse_scholar(
    html: &str,
    id: ScholarId,
    level: u32,
    url: &str,
) -> Result<Scholar, ParseError> {
    let document = Html::parse_document(html);

    let name = document
        .select(&SEL_NAME)
        .next()
        .map(|e| normalize_whitespace(&elem_text(e)))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ParseError::MissingField(format!("name for record {}", id)))?;

    let degree = parse_degree(&document);
    let advisors = parse_advisor_ids(&document);

    Ok(Scholar {
        name,
        id,
        university: degree.university,
        year: degree.year,
        degree_type: degree.degree_type,
        nationality: degree.nationality,
        level,
        url: url.to_string(),
        advisors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://genealogy.math.ndsu.nodak.edu/id.php?id=18231";

    const GAUSS: &str = r#"
        <html><body>
        <div id="paddingWrapper">
            <h2 style="text-align: center; margin-bottom: 0.5ex; margin-top: 1ex">
                Carl Friedrich
                Gauß
            </h2>
            <p style="display: none">MathSciNet</p>
            <div style="text-align: center">
                <a href="http://www.ams.org/mathscinet/MRAuthorID/1">MathSciNet</a>
            </div>
            <div style="line-height: 30px; text-align: center; margin-bottom: 1ex">
                <span style="margin-right: 0.5em">Ph.D. <span style="color:
                #006633; margin-left: 0.5em">Universität   Helmstedt</span> 1799</span>
                <img src="img/flags/Germany.gif" alt="Germany" width="24" height="14" title="Germany" />
            </div>
            <div style="line-height: 2ex; margin-bottom: 1ex">
                <span style="color: #006633">Dissertation:</span>
                <span id="thesisTitle">Demonstratio nova theorematis</span>
            </div>
            <p style="text-align: center; line-height: 2.75ex">Advisor: <a href="id.php?id=18230">Johann Friedrich Pfaff</a></p>
            <p style="text-align: center">Students:</p>
            <table>
                <tr><td><a href="id.php?id=18603">Friedrich Bessel</a></td><td>Königsberg</td></tr>
                <tr><td><a href="id.php?id=18232">Christian Gerling</a></td><td>Göttingen</td></tr>
            </table>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_scholar_full_record() {
        let scholar = parse_scholar(GAUSS, 18231, 2, URL).expect("Failed to parse record");

        assert_eq!(scholar.name, "Carl Friedrich Gauß");
        assert_eq!(scholar.id, 18231);
        assert_eq!(scholar.university, "Universität Helmstedt");
        assert_eq!(scholar.degree_type, "Ph.D.");
        assert_eq!(scholar.year, "1799");
        assert_eq!(scholar.nationality, "Germany");
        assert_eq!(scholar.level, 2);
        assert_eq!(scholar.url, URL);
        assert_eq!(scholar.advisors, vec![18230]);
    }

    #[test]
    fn test_parse_scholar_uses_requested_id() {
        // The first record link on the page belongs to the advisor.
        let scholar = parse_scholar(GAUSS, 42, 1, URL).expect("Failed to parse record");
        assert_eq!(scholar.id, 42);
    }

    #[test]
    fn test_parse_advisors_multiple() {
        let html = r#"
            <div id="paddingWrapper">
                <h2>Someone</h2>
                <p>Advisor 1: <a href="id.php?id=100">First</a><br />Advisor 2: <a href="id.php?id=200">Second</a></p>
                <p>Advisor 1: <a href="id.php?id=100">First again</a></p>
                <table><tr><td><a href="id.php?id=300">Student</a></td></tr></table>
            </div>
        "#;
        let document = Html::parse_document(html);

        assert_eq!(parse_advisor_ids(&document), vec![100, 200]);
    }

    #[test]
    fn test_parse_advisors_none() {
        let html = r#"
            <div id="paddingWrapper">
                <h2>Founder</h2>
                <p>Advisor: Unknown</p>
                <table><tr><td><a href="id.php?id=300">Student</a></td></tr></table>
            </div>
        "#;
        let scholar = parse_scholar(html, 1, 1, URL).expect("Failed to parse record");

        assert!(scholar.advisors.is_empty());
        assert_eq!(scholar.descended_from(), "");
    }

    #[test]
    fn test_parse_scholar_without_degree_block() {
        let html = r#"
            <div id="paddingWrapper">
                <h2> Lonely   Name </h2>
                <div><span style="color: #006633">Dissertation:</span></div>
            </div>
        "#;
        let scholar = parse_scholar(html, 5, 3, URL).expect("Failed to parse record");

        assert_eq!(scholar.name, "Lonely Name");
        assert_eq!(scholar.university, "");
        assert_eq!(scholar.degree_type, "");
        assert_eq!(scholar.year, "");
        assert_eq!(scholar.nationality, "");
    }

    #[test]
    fn test_parse_degree_without_year_split() {
        // University text appears twice, so the split is ambiguous.
        let html = r#"
            <div id="paddingWrapper">
                <h2>Name</h2>
                <div><span>Ph.D. Paris <span style="color: #006633">Paris</span> 1900</span>
                <img src="img/flags/France.gif" /></div>
            </div>
        "#;
        let scholar = parse_scholar(html, 5, 1, URL).expect("Failed to parse record");

        assert_eq!(scholar.university, "Paris");
        assert_eq!(scholar.degree_type, "");
        assert_eq!(scholar.year, "");
        assert_eq!(scholar.nationality, "", "flag without a title is ignored");
    }

    #[test]
    fn test_parse_scholar_missing_name() {
        let html = r#"<div id="paddingWrapper"><p>Nothing here</p></div>"#;
        let err = parse_scholar(html, 9, 1, URL).unwrap_err();

        assert!(matches!(err, ParseError::MissingField(_)));
    }

    #[test]
    fn test_is_missing_record() {
        let html = "<p>You have specified an ID that does not exist in the database. Please back up and try again.</p>";
        assert!(is_missing_record(html));
        assert!(!is_missing_record(GAUSS));
    }

    #[test]
    fn test_record_id_from_href() {
        assert_eq!(record_id_from_href("id.php?id=18230"), Some(18230));
        assert_eq!(
            record_id_from_href("https://www.mathgenealogy.org/id.php?id=7&fChrono=1"),
            Some(7)
        );
        assert_eq!(record_id_from_href("id.php?id=abc"), None);
        assert_eq!(record_id_from_href("search.php"), None);
    }
}
