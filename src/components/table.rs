//! Table component
//!
//! Draws one page of a `TableViewModel`: a checkbox column, the visible
//! columns with the sort indicator, placeholder rows while loading, the
//! empty state, and a details panel for expanded rows. Owns the row and
//! column cursors; table state itself stays in the engine.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use gridline::engine::{Align, Column, ExportFormat, PageRow, RowId, TableMode, TableViewModel};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row as TableRow, Table, TableState, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a column gets when it declares no width
const MAX_COLUMN_WIDTH: usize = 40;
const CHECKBOX_WIDTH: u16 = 5;
const PLACEHOLDER: &str = "░░░░░░";

pub struct TableComponent {
    /// Row cursor within the current page
    pub cursor_row: usize,
    /// Column cursor within the visible columns
    pub cursor_column: usize,
    page_len: usize,
    column_count: usize,
    table_state: TableState,
}

impl Default for TableComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl TableComponent {
    pub fn new() -> Self {
        Self {
            cursor_row: 0,
            cursor_column: 0,
            page_len: 0,
            column_count: 0,
            table_state: TableState::default(),
        }
    }

    /// Keep both cursors inside the current page and column set
    pub fn sync(&mut self, page_len: usize, column_count: usize) {
        self.page_len = page_len;
        self.column_count = column_count;
        self.cursor_row = self.cursor_row.min(page_len.saturating_sub(1));
        self.cursor_column = self.cursor_column.min(column_count.saturating_sub(1));
    }

    /// Id of the row under the cursor
    pub fn cursor_id(&self, view: &TableViewModel<'_>) -> Option<RowId> {
        view.page_rows.get(self.cursor_row).map(|r| r.id.clone())
    }

    /// Field of the column under the cursor
    pub fn cursor_field<'a>(&self, view: &TableViewModel<'a>) -> Option<&'a str> {
        view.visible_columns
            .get(self.cursor_column)
            .map(|&c| c.field.as_str())
    }

    pub fn draw_with_view(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        view: &TableViewModel<'_>,
    ) -> Result<()> {
        if view.mode == TableMode::Empty {
            draw_empty_state(frame, area, view);
            return Ok(());
        }

        let expanded: Vec<&PageRow<'_>> = view.page_rows.iter().filter(|r| r.expanded).collect();
        let (table_area, details_area) = if expanded.is_empty() {
            (area, None)
        } else {
            let details_height = (details_line_count(&expanded) as u16 + 2)
                .min(area.height / 2)
                .max(3);
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(details_height)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        };

        let widths = column_widths(view);
        let mut constraints = vec![Constraint::Length(CHECKBOX_WIDTH)];
        constraints.extend(widths.iter().map(|w| Constraint::Length(*w as u16)));

        let header = self.header_row(view);
        let rows: Vec<TableRow> = if view.mode == TableMode::Loading {
            (0..view.placeholder_rows)
                .map(|_| placeholder_row(view.visible_columns.len()))
                .collect()
        } else {
            view.page_rows
                .iter()
                .map(|row| body_row(row, &view.visible_columns, &widths))
                .collect()
        };

        let title = if view.mode == TableMode::Loading {
            " Loading… ".to_string()
        } else if view.total == 0 {
            " No matching rows ".to_string()
        } else {
            format!(" Page {}/{} ", view.page + 1, view.page_count)
        };

        let table = Table::new(rows, constraints)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
            .highlight_symbol("▶");

        if view.mode == TableMode::Loading || view.page_rows.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(self.cursor_row));
        }
        frame.render_stateful_widget(table, table_area, &mut self.table_state);

        if let Some(details_area) = details_area {
            draw_details(frame, details_area, &expanded, view);
        }

        Ok(())
    }

    fn header_row(&self, view: &TableViewModel<'_>) -> TableRow<'static> {
        let mut cells = vec![Cell::from(view.selection.page_state.symbol())];
        for (i, column) in view.visible_columns.iter().enumerate() {
            let mut label = column.label().to_string();
            if column.field == view.order_by {
                label.push(' ');
                label.push_str(view.order.indicator());
            }

            let mut style = Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
            if i == self.cursor_column {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if !column.sortable {
                style = style.fg(Color::Gray);
            }
            cells.push(Cell::from(aligned(label, column.align)).style(style));
        }
        TableRow::new(cells).bottom_margin(0)
    }
}

impl Component for TableComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextRow),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevRow),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstRow),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastRow),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => Some(Action::NextPage),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => Some(Action::PrevPage),
            KeyCode::Char(']') | KeyCode::Tab => Some(Action::NextColumn),
            KeyCode::Char('[') | KeyCode::BackTab => Some(Action::PrevColumn),
            KeyCode::Char('s') => Some(Action::SortByCursorColumn),
            KeyCode::Char(' ') => Some(Action::ToggleRowSelection),
            KeyCode::Char('a') => Some(Action::ToggleSelectAll),
            KeyCode::Esc => Some(Action::ClearSelection),
            KeyCode::Char('x') | KeyCode::Enter => Some(Action::ToggleRowExpansion),
            KeyCode::Char('n') => Some(Action::CycleRowsPerPage),
            KeyCode::Char('e') => Some(Action::Export(ExportFormat::Csv)),
            KeyCode::Char('E') => Some(Action::Export(ExportFormat::Json)),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextRow => {
                if self.cursor_row + 1 < self.page_len {
                    self.cursor_row += 1;
                }
            }
            Action::PrevRow => self.cursor_row = self.cursor_row.saturating_sub(1),
            Action::FirstRow => self.cursor_row = 0,
            Action::LastRow => self.cursor_row = self.page_len.saturating_sub(1),
            Action::NextColumn => {
                if self.cursor_column + 1 < self.column_count {
                    self.cursor_column += 1;
                }
            }
            Action::PrevColumn => self.cursor_column = self.cursor_column.saturating_sub(1),
            Action::NextPage | Action::PrevPage | Action::CycleRowsPerPage => self.cursor_row = 0,
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let paragraph = Paragraph::new("No data").block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
        Ok(())
    }
}

fn aligned(text: String, align: Align) -> Line<'static> {
    let line = Line::from(text);
    match align {
        Align::Left => line,
        Align::Center => line.alignment(Alignment::Center),
        Align::Right => line.alignment(Alignment::Right),
    }
}

fn body_row(row: &PageRow<'_>, columns: &[&Column], widths: &[usize]) -> TableRow<'static> {
    let marker = if row.expanded { "▾" } else { "▸" };
    let checkbox = if row.selected { "[x]" } else { "[ ]" };
    let mut cells = vec![Cell::from(format!("{}{}", marker, checkbox))];

    for (column, width) in columns.iter().zip(widths) {
        let text = cell_text(&column.cell_value(row.row).to_display_string());
        cells.push(Cell::from(aligned(truncate(&text, *width), column.align)));
    }

    let style = if row.selected {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };
    TableRow::new(cells).style(style)
}

fn placeholder_row(column_count: usize) -> TableRow<'static> {
    let cells = std::iter::once(Cell::from(" [ ]"))
        .chain((0..column_count).map(|_| Cell::from(PLACEHOLDER)))
        .collect::<Vec<_>>();
    TableRow::new(cells).style(Style::default().fg(Color::DarkGray))
}

/// Single-line rendition of a cell
fn cell_text(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

/// Cut `text` to `width` display columns, ending with an ellipsis when cut
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Declared width, else the widest of header and page cells, capped
fn column_widths(view: &TableViewModel<'_>) -> Vec<usize> {
    view.visible_columns
        .iter()
        .map(|column| {
            if let Some(width) = column.width {
                return width as usize;
            }
            let header = column.label().width() + 2;
            let widest_cell = view
                .page_rows
                .iter()
                .map(|r| cell_text(&column.cell_value(r.row).to_display_string()).width())
                .max()
                .unwrap_or(0);
            header.max(widest_cell).clamp(4, MAX_COLUMN_WIDTH)
        })
        .collect()
}

fn details_line_count(expanded: &[&PageRow<'_>]) -> usize {
    expanded
        .iter()
        .map(|r| r.row.fields().count() + 1)
        .sum()
}

/// Every field of each expanded row, hidden columns included
fn draw_details(
    frame: &mut Frame,
    area: Rect,
    expanded: &[&PageRow<'_>],
    view: &TableViewModel<'_>,
) {
    let mut lines = Vec::new();
    for row in expanded {
        lines.push(Line::from(Span::styled(
            format!("Row {}", row.id),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        for (field, value) in row.row.fields() {
            let label = view
                .visible_columns
                .iter()
                .find(|c| &c.field == field)
                .map(|c| c.label().to_string())
                .unwrap_or_else(|| field.clone());
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", label), Style::default().fg(Color::Cyan)),
                Span::raw(cell_text(&value.to_display_string())),
            ]));
        }
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Details ")
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(paragraph, area);
}

fn draw_empty_state(frame: &mut Frame, area: Rect, view: &TableViewModel<'_>) {
    let mut lines = vec![Line::from("")];
    if let Some(empty) = view.empty_state {
        lines.push(Line::from(Span::styled(
            empty.title.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        if !empty.description.is_empty() {
            lines.push(Line::from(Span::styled(
                empty.description.clone(),
                Style::default().fg(Color::DarkGray),
            )));
        }
        if let Some(label) = &empty.action_label {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("[ {} ]", label),
                Style::default().fg(Color::Cyan),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_truncate_by_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_cursor_stays_on_page() {
        let mut table = TableComponent::new();
        table.sync(3, 2);

        for _ in 0..5 {
            table.update(Action::NextRow).unwrap();
            table.update(Action::NextColumn).unwrap();
        }
        assert_eq!(table.cursor_row, 2);
        assert_eq!(table.cursor_column, 1);

        table.sync(1, 1);
        assert_eq!(table.cursor_row, 0);
        assert_eq!(table.cursor_column, 0);

        table.sync(3, 2);
        table.update(Action::LastRow).unwrap();
        table.update(Action::NextPage).unwrap();
        assert_eq!(table.cursor_row, 0);
    }

    #[test]
    fn test_key_mapping() {
        let mut table = TableComponent::new();
        let key = |c| KeyEvent::new(c, KeyModifiers::NONE);

        assert_eq!(
            table.handle_key_event(key(KeyCode::Char('s'))).unwrap(),
            Some(Action::SortByCursorColumn)
        );
        assert_eq!(
            table.handle_key_event(key(KeyCode::Char('E'))).unwrap(),
            Some(Action::Export(ExportFormat::Json))
        );
        assert_eq!(
            table.handle_key_event(key(KeyCode::Char(' '))).unwrap(),
            Some(Action::ToggleRowSelection)
        );
    }
}
