//! Problem page extraction.

use scraper::{ElementRef, Selector};
use sdamgia_core::{Error, Problem, ProblemPart, origin_str};
use std::sync::LazyLock;
use url::Url;

use super::{decode, images::normalize_image_src, rewrite_image_sources, selector, text_of};

static PROB_MAINDIV: LazyLock<Selector> = LazyLock::new(|| selector("div.prob_maindiv"));
static PROB_NUMS: LazyLock<Selector> = LazyLock::new(|| selector("span.prob_nums"));
static PBODY: LazyLock<Selector> = LazyLock::new(|| selector("div.pbody"));
static ANSWER: LazyLock<Selector> = LazyLock::new(|| selector("div.answer"));
static MINOR: LazyLock<Selector> = LazyLock::new(|| selector("div.minor"));
static DIV: LazyLock<Selector> = LazyLock::new(|| selector("div"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

const ANSWER_PREFIX: &str = "Ответ: ";
const ALL_ANALOGS_LINK: &str = "Все";

/// A parsed problem page.
#[derive(Debug, Clone)]
pub struct ProblemPage {
    /// Structured record.
    pub problem: Problem,
    /// Problem block prepared for rendering: analog and trailing info blocks
    /// removed, image sources absolute. Present only when requested.
    pub fragment: Option<String>,
}

/// Canonical URL of a problem.
pub fn problem_url(origin: &Url, id: &str) -> String {
    format!("{}/problem?id={}", origin_str(origin), id)
}

/// Parse a `/problem?id=` page.
///
/// Returns `Ok(None)` when the page has no problem block (deleted or unknown
/// id). The record is always built from the untouched block; `with_fragment`
/// additionally produces the render fragment.
pub fn parse_problem_page(
    html: &[u8], id: &str, origin: &Url, with_fragment: bool,
) -> Result<Option<ProblemPage>, Error> {
    let mut document = decode(html);

    let Some(block) = document.select(&PROB_MAINDIV).next() else {
        return Ok(None);
    };

    let problem = parse_block(block, id, origin)?;

    if !with_fragment {
        return Ok(Some(ProblemPage { problem, fragment: None }));
    }

    let block_id = block.id();
    let minor_ids: Vec<_> = block.select(&MINOR).map(|minor| minor.id()).collect();
    let last_div = block
        .select(&DIV)
        .filter(|div| {
            !minor_ids.contains(&div.id()) && !div.ancestors().any(|ancestor| minor_ids.contains(&ancestor.id()))
        })
        .last()
        .map(|div| div.id());

    for node_id in minor_ids.iter().copied().chain(last_div) {
        if let Some(mut node) = document.tree.get_mut(node_id) {
            node.detach();
        }
    }

    let fragment = document
        .tree
        .get(block_id)
        .and_then(ElementRef::wrap)
        .map(|block| rewrite_image_sources(&block.html(), origin));

    Ok(Some(ProblemPage { problem, fragment }))
}

fn parse_block(block: ElementRef<'_>, id: &str, origin: &Url) -> Result<Problem, Error> {
    let header = block
        .select(&PROB_NUMS)
        .next()
        .ok_or_else(|| Error::Structure(format!("problem {id}: missing span.prob_nums")))?;

    // "Тип 1 № 1001": drop the leading word and the trailing "№ <id>".
    let words: Vec<String> = text_of(header).split_whitespace().map(str::to_string).collect();
    let topic = if words.len() > 3 { words[1..words.len() - 2].join(" ") } else { String::new() };

    let bodies: Vec<ElementRef<'_>> = block.select(&PBODY).collect();
    let condition = bodies.first().map(|body| parse_part(*body, origin));
    let solution = bodies.get(1).map(|body| parse_part(*body, origin));

    let answer = block
        .select(&ANSWER)
        .next()
        .map(|answer| text_of(answer).replace(ANSWER_PREFIX, ""))
        .unwrap_or_default();

    let analogs = block
        .select(&MINOR)
        .next()
        .map(|minor| {
            let mut links: Vec<String> = minor.select(&LINK).map(text_of).collect();
            if let Some(pos) = links.iter().position(|text| text == ALL_ANALOGS_LINK) {
                links.remove(pos);
            }
            links
        })
        .unwrap_or_default();

    Ok(Problem {
        id: id.to_string(),
        topic,
        condition,
        solution,
        answer,
        analogs,
        url: problem_url(origin, id),
    })
}

fn parse_part(body: ElementRef<'_>, origin: &Url) -> ProblemPart {
    ProblemPart {
        text: text_of(body),
        images: body
            .select(&IMG)
            .map(|img| normalize_image_src(img.value().attr("src").unwrap_or_default(), origin))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBLEM_HTML: &str = r#"
        <html><body>
        <div class="prob_maindiv">
            <div class="prob_head"><span class="prob_nums">Тип 1 № 1001</span></div>
            <div class="pbody">Найдите площадь треугольника.<img src="/get_file?id=501"></div>
            <div class="solution">
                <div class="pbody">Решение: S = 6.<img src="https://ege.sdamgia.ru/formula/s.svg"></div>
            </div>
            <div class="answer">Ответ: 6</div>
            <div class="minor">Аналоги к заданию № 1001: <a href="/problem?id=1002">1002</a> <a href="/problem?id=1003">1003</a> <a href="/test?theme=1">Все</a></div>
            <div class="source">Источник: ЕГЭ</div>
        </div>
        </body></html>
    "#;

    fn origin() -> Url {
        Url::parse("https://math-ege.sdamgia.ru").unwrap()
    }

    #[test]
    fn test_parse_problem_full() {
        let page = parse_problem_page(PROBLEM_HTML.as_bytes(), "1001", &origin(), false)
            .unwrap()
            .unwrap();
        let problem = page.problem;

        assert_eq!(problem.id, "1001");
        assert_eq!(problem.topic, "1");
        assert_eq!(problem.url, "https://math-ege.sdamgia.ru/problem?id=1001");

        let condition = problem.condition.unwrap();
        assert_eq!(condition.text, "Найдите площадь треугольника.");
        assert_eq!(condition.images, vec!["https://math-ege.sdamgia.ru/get_file?id=501"]);

        let solution = problem.solution.unwrap();
        assert_eq!(solution.text, "Решение: S = 6.");
        assert_eq!(solution.images, vec!["https://ege.sdamgia.ru/formula/s.svg"]);

        assert_eq!(problem.answer, "6");
        assert_eq!(problem.analogs, vec!["1002", "1003"]);
        assert!(page.fragment.is_none());
    }

    #[test]
    fn test_id_equals_requested_id() {
        for id in ["1001", "000123", "abc"] {
            let page = parse_problem_page(PROBLEM_HTML.as_bytes(), id, &origin(), false)
                .unwrap()
                .unwrap();
            assert_eq!(page.problem.id, id);
        }
    }

    #[test]
    fn test_missing_block_is_none() {
        let html = "<html><body><p>Задание не найдено</p></body></html>";
        let result = parse_problem_page(html.as_bytes(), "1", &origin(), false).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_missing_header_is_structure_error() {
        let html = r#"<div class="prob_maindiv"><div class="pbody">x</div></div>"#;
        let result = parse_problem_page(html.as_bytes(), "1", &origin(), false);
        assert!(matches!(result, Err(Error::Structure(_))));
    }

    #[test]
    fn test_condition_only() {
        let html = r#"
            <div class="prob_maindiv">
                <span class="prob_nums">Тип 12 № 77</span>
                <div class="pbody">Только условие</div>
            </div>
        "#;
        let problem = parse_problem_page(html.as_bytes(), "77", &origin(), false)
            .unwrap()
            .unwrap()
            .problem;

        assert_eq!(problem.topic, "12");
        assert!(problem.condition.is_some());
        assert!(problem.solution.is_none());
        assert_eq!(problem.answer, "");
        assert!(problem.analogs.is_empty());
    }

    #[test]
    fn test_short_header_gives_empty_topic() {
        let html = r#"<div class="prob_maindiv"><span class="prob_nums">№ 5</span></div>"#;
        let problem = parse_problem_page(html.as_bytes(), "5", &origin(), false)
            .unwrap()
            .unwrap()
            .problem;
        assert_eq!(problem.topic, "");
        assert!(problem.condition.is_none());
    }

    #[test]
    fn test_fragment_strips_minor_and_last_div() {
        let page = parse_problem_page(PROBLEM_HTML.as_bytes(), "1001", &origin(), true)
            .unwrap()
            .unwrap();
        let fragment = page.fragment.unwrap();

        assert!(fragment.starts_with("<div class=\"prob_maindiv\">"));
        assert!(!fragment.contains("Аналоги"));
        assert!(!fragment.contains("Источник"));
        assert!(fragment.contains("Ответ: 6"));
        assert!(fragment.contains("src=\"https://math-ege.sdamgia.ru/get_file?id=501\""));

        // record is parsed before the block is trimmed
        assert_eq!(page.problem.analogs, vec!["1002", "1003"]);
    }
}
