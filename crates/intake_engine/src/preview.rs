use crate::ParsedTable;

const TRUNCATED_MARKER: char = '…';
pub const MAX_PREVIEW_CELL_CHARS: usize = 64;
pub const PREVIEW_ROW_LIMIT: usize = 10;

/// First `limit` rows of `table` as display strings aligned to the headers.
pub fn preview_rows(table: &ParsedTable, limit: usize) -> Vec<Vec<String>> {
    (0..table.row_count().min(limit))
        .filter_map(|index| table.row_cells(index))
        .map(|cells| cells.iter().map(|cell| preview_cell(&cell.to_string())).collect())
        .collect()
}

pub fn preview_cell(text: &str) -> String {
    let flattened: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flattened.chars().count() <= MAX_PREVIEW_CELL_CHARS {
        flattened
    } else {
        let mut truncated: String = flattened.chars().take(MAX_PREVIEW_CELL_CHARS).collect();
        truncated.push(TRUNCATED_MARKER);
        truncated
    }
}
