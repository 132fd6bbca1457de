//! Plain-text rendering of the item list state.

use itemsync_core::utils::truncate_string;
use itemsync_core::{Item, UiState};

/// Maximum description length shown per item
const DESCRIPTION_WIDTH: usize = 72;

/// Render a full screen for `state`.
///
/// Cached items stay listed while loading and alongside an error.
pub fn render(state: &UiState, last_synced: Option<&str>) -> String {
    let mut out = String::new();

    if state.is_loading {
        out.push_str("Loading...\n");
    } else if let Some(ref message) = state.error {
        let message = if message.is_empty() { "Unknown error" } else { message.as_str() };
        out.push_str(&format!("Error: {}\n", message));
    }

    if state.is_blank() {
        out.push_str("No items cached yet\n");
    } else if state.items.is_empty() {
        out.push_str("No items\n");
    } else {
        out.push_str(&format!("Items ({})\n", state.items.len()));
        for item in &state.items {
            out.push_str(&render_item(item));
        }
    }

    if let Some(age) = last_synced {
        out.push_str(&format!("Last synced {}\n", age));
    }
    out
}

fn render_item(item: &Item) -> String {
    let mut card = format!("  #{} {}\n", item.id, item.title);
    if !item.description.is_empty() {
        card.push_str(&format!(
            "      {}\n",
            truncate_string(&item.description, DESCRIPTION_WIDTH)
        ));
    }
    if item.has_image() {
        card.push_str(&format!("      {}\n", item.image_url));
    }
    card
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(items: Vec<Item>, is_loading: bool, error: Option<&str>) -> UiState {
        UiState {
            items,
            is_loading,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_render_items() {
        let out = render(
            &state(vec![Item::new(1, "A", "d", "https://img/a.png")], false, None),
            Some("5m ago"),
        );
        assert_eq!(
            out,
            "Items (1)\n  #1 A\n      d\n      https://img/a.png\nLast synced 5m ago\n"
        );
    }

    #[test]
    fn test_render_error_keeps_items() {
        let out = render(&state(vec![Item::new(1, "A", "d", "")], false, Some("offline")), None);
        assert!(out.starts_with("Error: offline\n"));
        assert!(out.contains("#1 A"));
    }

    #[test]
    fn test_render_loading_empty() {
        let out = render(&state(Vec::new(), true, None), None);
        assert_eq!(out, "Loading...\nNo items\n");
    }

    #[test]
    fn test_render_blank_state() {
        assert_eq!(render(&UiState::default(), None), "No items cached yet\n");
        assert_eq!(
            render(&state(Vec::new(), false, Some("offline")), None),
            "Error: offline\nNo items\n"
        );
    }

    #[test]
    fn test_render_truncates_description() {
        let long = "x".repeat(100);
        let out = render(&state(vec![Item::new(1, "A", long, "")], false, None), None);
        assert!(out.contains(&format!("{}...", "x".repeat(69))));
    }
}
