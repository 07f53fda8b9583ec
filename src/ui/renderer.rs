//! Plain-text rendering of a [`FeedViewModel`] for the terminal driver.
//!
//! Layout is deliberately minimal: a status header, the active filter chips,
//! then one line per item (newest page last). Only the tail of the feed is
//! printed so each page stays visible after an append.

use crate::ui::viewmodel::{FeedViewModel, FilterChip};

/// Prints the view model to stdout, showing at most `max_items` items.
pub fn render(vm: &FeedViewModel, max_items: usize) {
    for line in render_lines(vm, max_items) {
        println!("{line}");
    }
}

/// Formats the view model as lines of text.
///
/// # Example
///
/// ```
/// use pixfeed::app::FeedState;
/// use pixfeed::ui::render_lines;
///
/// let lines = render_lines(&FeedState::new().snapshot(), 10);
/// assert!(lines[0].starts_with("page 1"));
/// ```
#[must_use]
pub fn render_lines(vm: &FeedViewModel, max_items: usize) -> Vec<String> {
    let mut lines = vec![header(vm)];

    if !vm.chips.is_empty() {
        let chips: Vec<String> = vm.chips.iter().map(chip_label).collect();
        lines.push(format!("filters: {}", chips.join(" ")));
    }

    if vm.is_empty_result() {
        lines.push("no results".to_string());
        return lines;
    }

    let skipped = vm.items.len().saturating_sub(max_items);
    if skipped > 0 {
        lines.push(format!("... {skipped} earlier items"));
    }
    lines.extend(vm.items.iter().enumerate().skip(skipped).map(|(index, item)| {
        format!(
            "{:>4}  #{:<10} {:>5}x{:<5} {}",
            index + 1,
            item.id,
            item.width,
            item.height,
            item.tags.join(", ")
        )
    }));

    lines
}

fn header(vm: &FeedViewModel) -> String {
    let mut header = format!(
        "page {} | {} items | {} hits",
        vm.page,
        vm.items.len(),
        vm.total_hits
    );
    if let Some(term) = &vm.search_term {
        header.push_str(&format!(" | search \"{term}\""));
    }
    if vm.is_refreshing {
        header.push_str(" | refreshing");
    }
    if vm.is_loading_more {
        header.push_str(" | loading more");
    }
    header
}

fn chip_label(chip: &FilterChip) -> String {
    if chip.is_color {
        format!("[{}: ● {}]", chip.name, chip.value)
    } else {
        format!("[{}: {}]", chip.name, chip.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImageItem;

    fn viewmodel(items: usize) -> FeedViewModel {
        FeedViewModel {
            items: (0..items as u64).map(|id| ImageItem::new(id, 10, 10)).collect(),
            page: 2,
            search_term: Some("cat".into()),
            category: None,
            chips: vec![FilterChip {
                name: "colors".into(),
                value: "red".into(),
                is_color: true,
            }],
            is_refreshing: false,
            is_loading_more: true,
            end_reached: true,
            total_hits: 500,
        }
    }

    #[test]
    fn tail_of_feed_is_shown() {
        let lines = render_lines(&viewmodel(30), 5);
        assert_eq!(
            lines[0],
            "page 2 | 30 items | 500 hits | search \"cat\" | loading more"
        );
        assert_eq!(lines[1], "filters: [colors: ● red]");
        assert_eq!(lines[2], "... 25 earlier items");
        assert_eq!(lines.len(), 3 + 5);
        assert!(lines[3].trim_start().starts_with("26"));
    }

    #[test]
    fn empty_feed_says_so() {
        let mut vm = viewmodel(0);
        vm.is_loading_more = false;
        let lines = render_lines(&vm, 5);
        assert_eq!(lines.last().map(String::as_str), Some("no results"));
    }
}
