//! Test generation requests.
//!
//! The site generates a test from `prob{N}=count` pairs and answers with a
//! redirect to `/test?id=<id>`. A printable PDF of a test is likewise reached
//! through a redirect whose target is the PDF itself.

use std::collections::BTreeMap;

/// Composition of a generated test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestPlan {
    /// `count` problems for every topic of the catalog.
    Full(u32),
    /// Problem count per topic number.
    PerTopic(BTreeMap<u32, u32>),
}

impl Default for TestPlan {
    fn default() -> Self {
        TestPlan::Full(1)
    }
}

impl TestPlan {
    /// Query pairs for `/test?a=generate`.
    ///
    /// `topic_count` is the number of catalog topics and is only used by
    /// [`TestPlan::Full`].
    pub fn to_query(&self, topic_count: usize) -> Vec<(String, String)> {
        let mut query = vec![("a".to_string(), "generate".to_string())];
        match self {
            TestPlan::Full(count) => {
                query.extend((1..=topic_count).map(|i| (format!("prob{i}"), count.to_string())));
            }
            TestPlan::PerTopic(counts) => {
                query.extend(counts.iter().map(|(topic, count)| (format!("prob{topic}"), count.to_string())));
            }
        }
        query
    }

    /// Whether building the query needs the live catalog.
    pub fn needs_catalog(&self) -> bool {
        matches!(self, TestPlan::Full(_))
    }
}

/// One printable-test option.
///
/// The site treats an empty value as "off"; any other value is passed
/// through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PdfFlag {
    /// Option not given.
    #[default]
    Absent,
    /// Option explicitly turned off.
    Disabled,
    /// Value sent as is.
    Literal(String),
}

impl PdfFlag {
    /// The `"true"` literal.
    pub fn enabled() -> Self {
        PdfFlag::Literal("true".to_string())
    }

    /// Query value.
    pub fn as_query_value(&self) -> &str {
        match self {
            PdfFlag::Absent | PdfFlag::Disabled => "",
            PdfFlag::Literal(value) => value,
        }
    }
}

impl From<bool> for PdfFlag {
    fn from(value: bool) -> Self {
        if value { PdfFlag::enabled() } else { PdfFlag::Disabled }
    }
}

impl From<&str> for PdfFlag {
    fn from(value: &str) -> Self {
        PdfFlag::Literal(value.to_string())
    }
}

impl From<String> for PdfFlag {
    fn from(value: String) -> Self {
        PdfFlag::Literal(value)
    }
}

/// Options of a printable test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfOptions {
    /// Include solutions.
    pub solution: PdfFlag,
    /// Show problem numbers.
    pub nums: PdfFlag,
    /// Include the answers section.
    pub answers: PdfFlag,
    /// Include the answer key.
    pub key: PdfFlag,
    /// Include grading criteria.
    pub crit: PdfFlag,
    /// Include the instruction text.
    pub instruction: PdfFlag,
    /// Footer text.
    pub col: PdfFlag,
    /// Layout mode, `"true"` by default.
    pub pdf: PdfFlag,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            solution: PdfFlag::Absent,
            nums: PdfFlag::Absent,
            answers: PdfFlag::Absent,
            key: PdfFlag::Absent,
            crit: PdfFlag::Absent,
            instruction: PdfFlag::Absent,
            col: PdfFlag::Absent,
            pdf: PdfFlag::enabled(),
        }
    }
}

impl PdfOptions {
    /// Query pairs for the printable version of test `testid`.
    pub fn to_query(&self, testid: &str) -> Vec<(&'static str, String)> {
        vec![
            ("id", testid.to_string()),
            ("print", "true".to_string()),
            ("pdf", self.pdf.as_query_value().to_string()),
            ("sol", self.solution.as_query_value().to_string()),
            ("num", self.nums.as_query_value().to_string()),
            ("ans", self.answers.as_query_value().to_string()),
            ("key", self.key.as_query_value().to_string()),
            ("crit", self.crit.as_query_value().to_string()),
            ("pre", self.instruction.as_query_value().to_string()),
            ("dcol", self.col.as_query_value().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(query: &[(String, String)]) -> Vec<(&str, &str)> {
        query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn test_full_plan_covers_every_topic() {
        let query = TestPlan::Full(2).to_query(3);
        assert_eq!(
            pairs(&query),
            vec![("a", "generate"), ("prob1", "2"), ("prob2", "2"), ("prob3", "2")]
        );
    }

    #[test]
    fn test_default_plan_is_one_per_topic() {
        assert_eq!(TestPlan::default(), TestPlan::Full(1));
        assert!(TestPlan::default().needs_catalog());
    }

    #[test]
    fn test_per_topic_plan() {
        let plan = TestPlan::PerTopic(BTreeMap::from([(12, 3), (1, 2)]));
        assert!(!plan.needs_catalog());
        assert_eq!(pairs(&plan.to_query(0)), vec![("a", "generate"), ("prob1", "2"), ("prob12", "3")]);
    }

    #[test]
    fn test_full_plan_without_topics() {
        assert_eq!(pairs(&TestPlan::Full(1).to_query(0)), vec![("a", "generate")]);
    }

    #[test]
    fn test_pdf_flag_values() {
        assert_eq!(PdfFlag::Absent.as_query_value(), "");
        assert_eq!(PdfFlag::Disabled.as_query_value(), "");
        assert_eq!(PdfFlag::enabled().as_query_value(), "true");
        assert_eq!(PdfFlag::from(false), PdfFlag::Disabled);
        assert_eq!(PdfFlag::from(true), PdfFlag::enabled());
        assert_eq!(PdfFlag::from("h").as_query_value(), "h");
    }

    #[test]
    fn test_default_pdf_query() {
        let query = PdfOptions::default().to_query("4217");
        assert_eq!(
            query,
            vec![
                ("id", "4217".to_string()),
                ("print", "true".to_string()),
                ("pdf", "true".to_string()),
                ("sol", String::new()),
                ("num", String::new()),
                ("ans", String::new()),
                ("key", String::new()),
                ("crit", String::new()),
                ("pre", String::new()),
                ("dcol", String::new()),
            ]
        );
    }

    #[test]
    fn test_pdf_query_with_flags() {
        let options = PdfOptions {
            solution: true.into(),
            answers: false.into(),
            col: "Вариант 1".into(),
            pdf: "z".into(),
            ..PdfOptions::default()
        };
        let query = options.to_query("1");

        let get = |name: &str| query.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str());
        assert_eq!(get("sol"), Some("true"));
        assert_eq!(get("ans"), Some(""));
        assert_eq!(get("dcol"), Some("Вариант 1"));
        assert_eq!(get("pdf"), Some("z"));
        assert_eq!(get("num"), Some(""));
    }
}
