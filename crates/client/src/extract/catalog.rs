//! Catalog page extraction.

use scraper::Selector;
use sdamgia_core::{Catalog, Category, Error, Topic};
use std::sync::LazyLock;

use super::{decode, selector, text_of};

static CAT_CATEGORY: LazyLock<Selector> = LazyLock::new(|| selector("div.cat_category"));
static TOPIC_NAME: LazyLock<Selector> = LazyLock::new(|| selector("b.cat_name"));
static CAT_CHILDREN: LazyLock<Selector> = LazyLock::new(|| selector("div.cat_children"));
static CATEGORY_NAME: LazyLock<Selector> = LazyLock::new(|| selector("a.cat_name"));

const TOPIC_PREFIX: &str = "Задания ";

/// Parse the `/prob_catalog` page.
///
/// Topic blocks are `div.cat_category` elements without `data-id`. The first
/// such block is the catalog-wide header and is skipped.
pub fn parse_catalog(html: &[u8]) -> Result<Catalog, Error> {
    let document = decode(html);
    let mut catalog = Vec::new();

    let topic_blocks = document
        .select(&CAT_CATEGORY)
        .filter(|block| block.value().attr("data-id").is_none())
        .skip(1);

    for block in topic_blocks {
        let header = block
            .select(&TOPIC_NAME)
            .next()
            .ok_or_else(|| Error::Structure("catalog topic without b.cat_name".into()))?;
        let header = text_of(header);

        let (raw_id, topic_name) = header
            .split_once(". ")
            .ok_or_else(|| Error::Structure(format!("catalog topic header without separator: {header:?}")))?;

        let raw_id = raw_id.trim_start();
        let topic_id = raw_id.strip_prefix(TOPIC_PREFIX).unwrap_or(raw_id);

        let mut categories = Vec::new();
        if let Some(children) = block.select(&CAT_CHILDREN).next() {
            for category in children.select(&CAT_CATEGORY) {
                let category_id = category
                    .value()
                    .attr("data-id")
                    .ok_or_else(|| Error::Structure(format!("category of topic {topic_id} without data-id")))?;
                let name = category
                    .select(&CATEGORY_NAME)
                    .next()
                    .ok_or_else(|| Error::Structure(format!("category {category_id} without a.cat_name")))?;

                categories.push(Category { category_id: category_id.to_string(), category_name: text_of(name) });
            }
        }

        catalog.push(Topic { topic_id: topic_id.to_string(), topic_name: topic_name.to_string(), categories });
    }

    Ok(catalog)
}
