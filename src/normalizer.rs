use crate::model::ShoppingItem;

const MARKUP: [&str; 2] = ["<b>", "</b>"];

pub fn normalize_all(items: &mut [ShoppingItem]) {
    for item in items.iter_mut() {
        normalize_item(item);
    }
}

fn normalize_item(item: &mut ShoppingItem) {
    item.title = clean_title(&item.title);
    if item.category.as_deref().is_some_and(|c| c.trim().is_empty()) {
        item.category = None;
    }
}

/// Strips the `<b>` / `</b>` highlight markers the search API wraps around matches.
pub fn clean_title(title: &str) -> String {
    let mut cleaned = title.to_string();
    // Removing one marker can splice another together, so repeat until none remain.
    while MARKUP.iter().any(|marker| cleaned.contains(marker)) {
        for marker in MARKUP {
            cleaned = cleaned.replace(marker, "");
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_highlight_markers() {
        assert_eq!(clean_title("Warm <b>winter</b> <b>coat</b>"), "Warm winter coat");
    }

    #[test]
    fn cleaning_is_idempotent() {
        for title in ["plain title", "<b>bold</b> start", "a<b></b>b", "<<b>b>x", ""] {
            let once = clean_title(title);
            assert_eq!(clean_title(&once), once);
        }
    }

    #[test]
    fn blank_category_becomes_none() {
        let mut items = vec![ShoppingItem {
            title: "<b>x</b>".into(),
            price: "10".into(),
            category: Some("  ".into()),
        }];
        normalize_all(&mut items);
        assert_eq!(items[0].title, "x");
        assert_eq!(items[0].category, None);
    }
}
