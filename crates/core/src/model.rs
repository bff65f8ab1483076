//! Structured records parsed from problem-bank pages.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One text block of a problem page (condition or solution).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProblemPart {
    /// Raw text content of the block.
    pub text: String,
    /// Absolute image URLs in document order.
    pub images: Vec<String>,
}

/// A single problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Problem {
    /// Identifier the problem was requested with.
    pub id: String,
    /// Topic label from the problem header.
    pub topic: String,
    /// First `pbody` block.
    pub condition: Option<ProblemPart>,
    /// Second `pbody` block; `None` when no solution is published.
    pub solution: Option<ProblemPart>,
    /// Answer text, empty when absent.
    pub answer: String,
    /// Identifiers of analog problems.
    pub analogs: Vec<String>,
    /// Canonical problem URL.
    pub url: String,
}

/// A category inside a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Category {
    pub category_id: String,
    pub category_name: String,
}

/// A numbered topic with its categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Topic {
    pub topic_id: String,
    pub topic_name: String,
    pub categories: Vec<Category>,
}

/// Subject catalog in page order.
pub type Catalog = Vec<Topic>;

/// Find a topic by id.
pub fn find_topic<'a>(catalog: &'a [Topic], topic_id: &str) -> Option<&'a Topic> {
    catalog.iter().find(|topic| topic.topic_id == topic_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        vec![
            Topic {
                topic_id: "1".into(),
                topic_name: "Планиметрия".into(),
                categories: vec![Category { category_id: "11".into(), category_name: "Треугольники".into() }],
            },
            Topic { topic_id: "2".into(), topic_name: "Векторы".into(), categories: vec![] },
        ]
    }

    #[test]
    fn test_find_topic() {
        let catalog = sample_catalog();
        assert_eq!(find_topic(&catalog, "2").map(|t| t.topic_name.as_str()), Some("Векторы"));
        assert!(find_topic(&catalog, "3").is_none());
    }

    #[test]
    fn test_problem_serialization() {
        let problem = Problem {
            id: "1001".into(),
            topic: "1".into(),
            condition: Some(ProblemPart { text: "Condition".into(), images: vec![] }),
            solution: None,
            answer: "42".into(),
            analogs: vec!["1002".into()],
            url: "https://math-ege.sdamgia.ru/problem?id=1001".into(),
        };

        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["id"], "1001");
        assert!(json["solution"].is_null());
        assert_eq!(json["condition"]["text"], "Condition");

        let back: Problem = serde_json::from_value(json).unwrap();
        assert_eq!(back, problem);
    }
}
