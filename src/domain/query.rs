//! Read-side helpers for rendering a board: filtering, search and selection
//! summaries. Nothing here mutates state.

use crate::domain::{
    board::{BoardState, ColumnId, Filter},
    task::Task,
};

/// Anything with text that search queries run against
pub trait Searchable {
    fn search_text(&self) -> &str;
}

impl Searchable for Task {
    fn search_text(&self) -> &str {
        &self.text
    }
}

/// Checks the task against the completion filter
pub fn matches_filter(task: &Task, filter: Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::Complete => task.completed,
        Filter::Incomplete => !task.completed,
    }
}

/// Lower-cased, whitespace-separated terms of a query
pub fn search_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// True when `text` contains every term as a case-insensitive substring
///
/// An empty term list matches everything.
pub fn matches_terms(text: &str, terms: &[String]) -> bool {
    let text = text.to_lowercase();
    terms.iter().all(|term| text.contains(term.as_str()))
}

/// Keeps the items whose text contains every term of `query`
///
/// # Examples
/// ```
/// use taskboard_core::domain::query::{filter_by_search, Searchable};
///
/// struct Item(&'static str);
/// impl Searchable for Item {
///     fn search_text(&self) -> &str {
///         self.0
///     }
/// }
///
/// let items = [Item("Fix login bug"), Item("Plan sprint backlog")];
/// let found = filter_by_search(&items, "PLAN sprint");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].0, "Plan sprint backlog");
/// ```
pub fn filter_by_search<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let terms = search_terms(query);
    items
        .iter()
        .filter(|item| matches_terms(item.search_text(), &terms))
        .collect()
}

/// Whether a non-default filter or a non-blank search is in effect
pub fn has_active_filtering(state: &BoardState) -> bool {
    state.filter != Filter::All || !state.search_query.trim().is_empty()
}

/// Tasks of a column that pass the active filter and search, in column order
pub fn visible_tasks<'a>(state: &'a BoardState, column_id: &ColumnId) -> Vec<&'a Task> {
    let Some(column) = state.columns.get(column_id) else {
        return Vec::new();
    };

    let terms = search_terms(&state.search_query);
    column
        .task_ids
        .iter()
        .filter_map(|id| state.tasks.get(id))
        .filter(|task| matches_filter(task, state.filter))
        .filter(|task| matches_terms(&task.text, &terms))
        .collect()
}

/// Column ids to render, in board order
///
/// Without active filtering every column is shown, including empty ones.
/// With filtering only columns that still have a visible task remain.
pub fn visible_column_ids(state: &BoardState) -> Vec<&ColumnId> {
    if !has_active_filtering(state) {
        return state.column_order.iter().collect();
    }

    state
        .column_order
        .iter()
        .filter(|id| !visible_tasks(state, id).is_empty())
        .collect()
}

/// Selection summary for a column header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSelection {
    pub selected: usize,
    pub total: usize,
}

impl ColumnSelection {
    pub fn all_selected(&self) -> bool {
        self.total > 0 && self.selected == self.total
    }
}

pub fn column_selection(state: &BoardState, column_id: &ColumnId) -> Option<ColumnSelection> {
    let column = state.columns.get(column_id)?;
    let selected = column
        .task_ids
        .iter()
        .filter(|id| state.selected_task_ids.contains(*id))
        .count();

    Some(ColumnSelection {
        selected,
        total: column.task_ids.len(),
    })
}

/// Destination choices for a bulk move, in board order
pub fn column_options(state: &BoardState) -> Vec<(&ColumnId, &str)> {
    state
        .ordered_columns()
        .map(|column| (&column.id, column.title.as_str()))
        .collect()
}

/// Text split around the first match of a search query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight<'a> {
    pub before: &'a str,
    pub matched: &'a str,
    pub after: &'a str,
}

/// Finds the first case-insensitive occurrence of the trimmed query
///
/// The whole query is matched as one phrase. Returns `None` for a blank query
/// or when the text does not contain it.
pub fn highlight_match<'a>(text: &'a str, query: &str) -> Option<Highlight<'a>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    text.char_indices().find_map(|(start, _)| {
        let end = lowercase_prefix_end(&text[start..], &needle)?;
        Some(Highlight {
            before: &text[..start],
            matched: &text[start..start + end],
            after: &text[start + end..],
        })
    })
}

// Byte length of the shortest prefix of `haystack` whose lowercase form equals
// `needle`. Works per char so slicing always lands on char boundaries.
fn lowercase_prefix_end(haystack: &str, needle: &str) -> Option<usize> {
    let mut folded = String::new();
    for (offset, ch) in haystack.char_indices() {
        folded.extend(ch.to_lowercase());
        if !needle.starts_with(folded.as_str()) {
            return None;
        }
        if folded.len() == needle.len() {
            return Some(offset + ch.len_utf8());
        }
    }
    None
}
