//! Column visibility dialog component

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use gridline::engine::column::declared_columns;
use gridline::engine::{Column, ColumnVisibility};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

#[derive(Debug, Clone, PartialEq)]
struct ColumnEntry {
    field: String,
    label: String,
    visible: bool,
}

pub struct ColumnsDialog {
    entries: Vec<ColumnEntry>,
    pub selected_index: usize,
    list_state: ListState,
}

impl Default for ColumnsDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnsDialog {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            entries: Vec::new(),
            selected_index: 0,
            list_state,
        }
    }

    pub fn set_columns(&mut self, columns: &[Column], visibility: &ColumnVisibility) {
        self.entries = declared_columns(columns)
            .into_iter()
            .map(|c| ColumnEntry {
                field: c.field.clone(),
                label: c.label().to_string(),
                visible: !visibility.is_hidden(&c.field),
            })
            .collect();

        if self.selected_index >= self.entries.len() {
            self.selected_index = self.entries.len().saturating_sub(1);
        }
        self.list_state.select(Some(self.selected_index));
    }

    fn visible_count(&self) -> usize {
        self.entries.iter().filter(|e| e.visible).count()
    }

    fn select_next(&mut self) {
        if self.selected_index + 1 < self.entries.len() {
            self.selected_index += 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }
}

impl Component for ColumnsDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Enter | KeyCode::Char(' ') => self
                .entries
                .get(self.selected_index)
                .map(|e| Action::ToggleColumn(e.field.clone())),
            KeyCode::Char('r') => Some(Action::ResetColumns),
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                Some(Action::ModalUp)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                Some(Action::ModalDown)
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_width = 44u16.min(area.width.saturating_sub(4));
        let popup_height = (self.entries.len() as u16 + 7)
            .min(area.height.saturating_sub(4))
            .max(9);
        let popup_area = centered_popup(area, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(popup_area);

        let last_visible = self.visible_count() == 1;
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let checkbox = if entry.visible { "[x] " } else { "[ ] " };
                let style = if entry.visible && last_visible {
                    Style::default().fg(Color::DarkGray)
                } else if entry.visible {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(checkbox, Style::default().fg(Color::Green)),
                    Span::styled(entry.label.clone(), style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(
                        " Columns ({}/{}) ",
                        self.visible_count(),
                        self.entries.len()
                    ))
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Space ", Style::default().fg(Color::Yellow)),
            Span::raw("Toggle  "),
            Span::styled(" r ", Style::default().fg(Color::Yellow)),
            Span::raw("Show all  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Close"),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);

        Ok(())
    }
}
