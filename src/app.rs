//! App - the root component
//!
//! Owns the engine's `TableView` plus the viewer's presentation state, maps
//! input to Actions and applies them. Every table command goes through the
//! engine; the notifications it returns are logged and turned into status
//! messages.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_main_layout, draw_footer, draw_help_bar, draw_status, draw_toolbar, ColumnsDialog,
    FilterDialog, HelpDialog, QuitDialog, TableComponent, ToolbarContext,
};
use crate::model::{InputMode, Modal, ModalStack, StatusMessage};
use crate::services::{write_artifact, LoadMessage, LoadRunner};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gridline::engine::{Column, ExportFormat, Notification, PageSelection, TableView};
use log::{debug, info, warn};
use ratatui::{layout::Rect, Frame};
use std::path::PathBuf;

pub struct App {
    pub should_quit: bool,
    pub table: TableView,
    data_path: PathBuf,
    export_dir: PathBuf,
    /// Columns follow the data file's headers on reload
    columns_from_headers: bool,
    loader: LoadRunner,

    pub modals: ModalStack,
    pub input_mode: InputMode,
    pub status: Option<StatusMessage>,

    pub table_component: TableComponent,
    filter_dialog: FilterDialog,
    columns_dialog: ColumnsDialog,
    help_dialog: HelpDialog,
    quit_dialog: QuitDialog,
}

impl App {
    pub fn new(
        table: TableView,
        data_path: PathBuf,
        export_dir: PathBuf,
        columns_from_headers: bool,
    ) -> App {
        let mut app = App {
            should_quit: false,
            table,
            data_path,
            export_dir,
            columns_from_headers,
            loader: LoadRunner::new(),
            modals: ModalStack::new(),
            input_mode: InputMode::Normal,
            status: None,
            table_component: TableComponent::new(),
            filter_dialog: FilterDialog::new(),
            columns_dialog: ColumnsDialog::new(),
            help_dialog: HelpDialog::default(),
            quit_dialog: QuitDialog::default(),
        };
        app.sync_cursor();
        app
    }

    fn sync_cursor(&mut self) {
        let page_len = self.table.page_ids().len();
        let column_count = self.table.visible_columns().len();
        self.table_component.sync(page_len, column_count);
    }

    fn info(&mut self, message: impl Into<String>) {
        self.status = Some(StatusMessage::Info(message.into()));
    }

    fn error(&mut self, message: impl Into<String>) {
        self.status = Some(StatusMessage::Error(message.into()));
    }

    fn handle_notifications(&mut self, notifications: Vec<Notification>) {
        for notification in notifications {
            debug!("Notification: {:?}", notification);
            match notification {
                Notification::SelectionChanged(ids) => {
                    self.info(format!("{} row(s) selected", ids.len()));
                }
                Notification::Search(_) => {}
                Notification::PageChange(page) => {
                    debug!("Caller-paged table asked for page {}", page);
                }
                Notification::RowsPerPageChange(size) => {
                    debug!("Caller-paged table asked for page size {}", size);
                }
            }
        }
    }

    fn start_reload(&mut self) {
        if self.loader.is_running() {
            return;
        }
        info!("Reloading {}", self.data_path.display());
        self.table.set_loading(true);
        self.loader.spawn(self.data_path.clone());
        self.info("Loading…");
    }

    fn poll_loader(&mut self) {
        let Some(message) = self.loader.poll() else {
            return;
        };
        self.table.set_loading(false);

        match message {
            LoadMessage::Loaded(data) => {
                if self.columns_from_headers {
                    let columns = data
                        .headers
                        .iter()
                        .map(|h| Column::new(h.as_str(), h.as_str()))
                        .collect();
                    self.table.set_columns(columns);
                }
                let count = data.rows.len();
                let notifications = self.table.set_rows(data.rows);
                self.info(format!("Loaded {} row(s)", count));
                self.handle_notifications(notifications);
            }
            LoadMessage::Failed(e) => {
                warn!("Reload failed: {}", e);
                self.error(format!("Reload failed: {}", e));
            }
        }
    }

    fn sort_by_cursor_column(&mut self) {
        let field = {
            let view = self.table.view();
            self.table_component.cursor_field(&view).map(str::to_string)
        };
        let Some(field) = field else {
            return;
        };
        if !self.table.request_sort(&field) {
            self.info(format!("'{}' is not sortable", field));
        }
    }

    fn toggle_cursor_selection(&mut self) {
        let id = self.table_component.cursor_id(&self.table.view());
        if let Some(id) = id {
            let notifications = self.table.toggle_selection(id);
            self.handle_notifications(notifications);
        }
    }

    fn toggle_page_selection(&mut self) {
        let page_state = self.table.view().selection.page_state;
        let notifications = self
            .table
            .toggle_select_all(page_state != PageSelection::All);
        self.handle_notifications(notifications);
    }

    fn toggle_cursor_expansion(&mut self) {
        let id = self.table_component.cursor_id(&self.table.view());
        if let Some(id) = id {
            self.table.toggle_expanded(id);
        }
    }

    fn export(&mut self, format: ExportFormat) {
        let Some(artifact) = self.table.export(format) else {
            self.info("Nothing to export");
            return;
        };
        match write_artifact(&artifact, &self.export_dir) {
            Ok(path) => self.info(format!(
                "Exported {} row(s) to {}",
                self.table.filtered_count(),
                path.display()
            )),
            Err(e) => {
                warn!("Export failed: {:#}", e);
                self.error(format!("Export failed: {}", e));
            }
        }
    }

    fn update_search(&mut self, edit: impl FnOnce(&mut String)) {
        let mut query = self.table.state().search_query.clone();
        edit(&mut query);
        let notifications = self.table.set_search(&query);
        self.handle_notifications(notifications);
    }

    fn refresh_dialogs(&mut self) {
        self.filter_dialog
            .set_facets(self.table.facets(), &self.table.state().active_filters);
        self.columns_dialog
            .set_columns(self.table.columns(), &self.table.state().visibility);
    }

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Filter => self.filter_dialog.handle_key_event(key),
            Modal::Columns => self.columns_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn handle_search_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::ExitSearchMode),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::ClearSearch)
            }
            KeyCode::Char(c) => Some(Action::SearchInput(c)),
            _ => None,
        };
        Ok(action)
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area),
            Modal::Filter => self.filter_dialog.draw(frame, area),
            Modal::Columns => self.columns_dialog.draw(frame, area),
            Modal::Help => self.help_dialog.draw(frame, area),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }
        if self.input_mode == InputMode::Search {
            return self.handle_search_key_event(key);
        }

        let action = match key.code {
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('/') => Some(Action::EnterSearchMode),
            KeyCode::Char('f') => Some(Action::OpenFilterDialog),
            KeyCode::Char('F') => Some(Action::ClearAllFilters),
            KeyCode::Char('c') => Some(Action::OpenColumnsDialog),
            KeyCode::Char('r') => Some(Action::ResetColumns),
            KeyCode::Char('R') => Some(Action::Reload),
            _ => return self.table_component.handle_key_event(key),
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action != Action::Tick {
            debug!("Action: {}", action);
        }

        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => self.poll_loader(),
            Action::Resize(_, _) => {}
            Action::ForceQuit => self.should_quit = true,
            Action::Reload => self.start_reload(),

            // ─────────────────────────────────────────────────────────────────
            // Cursor and pages
            // ─────────────────────────────────────────────────────────────────
            Action::NextRow
            | Action::PrevRow
            | Action::FirstRow
            | Action::LastRow
            | Action::NextColumn
            | Action::PrevColumn => {
                self.table_component.update(action)?;
            }
            Action::NextPage => {
                let notifications = self.table.next_page();
                self.handle_notifications(notifications);
                self.table_component.update(action)?;
            }
            Action::PrevPage => {
                let notifications = self.table.previous_page();
                self.handle_notifications(notifications);
                self.table_component.update(action)?;
            }
            Action::CycleRowsPerPage => {
                let notifications = self.table.cycle_rows_per_page();
                self.handle_notifications(notifications);
                self.table_component.update(action)?;
                self.info(format!(
                    "{} rows per page",
                    self.table.state().pagination.rows_per_page()
                ));
            }

            // ─────────────────────────────────────────────────────────────────
            // Table commands
            // ─────────────────────────────────────────────────────────────────
            Action::SortByCursorColumn => self.sort_by_cursor_column(),
            Action::ToggleRowSelection => self.toggle_cursor_selection(),
            Action::ToggleSelectAll => self.toggle_page_selection(),
            Action::ClearSelection => {
                if !self.table.selected_ids().is_empty() {
                    let notifications = self.table.clear_selection();
                    self.handle_notifications(notifications);
                }
            }
            Action::ToggleRowExpansion => self.toggle_cursor_expansion(),
            Action::Export(format) => self.export(format),

            // ─────────────────────────────────────────────────────────────────
            // Search
            // ─────────────────────────────────────────────────────────────────
            Action::EnterSearchMode => self.input_mode = InputMode::Search,
            Action::ExitSearchMode => self.input_mode = InputMode::Normal,
            Action::SearchInput(c) => self.update_search(|q| q.push(c)),
            Action::SearchBackspace => self.update_search(|q| {
                q.pop();
            }),
            Action::ClearSearch => self.update_search(|q| q.clear()),

            // ─────────────────────────────────────────────────────────────────
            // Filters and columns
            // ─────────────────────────────────────────────────────────────────
            Action::SetFilter(key, value) => {
                let notifications = self.table.set_filter(&key, value);
                self.handle_notifications(notifications);
            }
            Action::ClearFilter(key) => {
                let notifications = self.table.clear_filter(&key);
                self.handle_notifications(notifications);
            }
            Action::ClearAllFilters => {
                let notifications = self.table.clear_filters();
                self.handle_notifications(notifications);
            }
            Action::ToggleColumn(field) => {
                if !self.table.toggle_column(&field) {
                    self.info("At least one column must stay visible");
                }
            }
            Action::ResetColumns => {
                if self.table.reset_columns() {
                    self.info("All columns shown");
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.selected_count = self.table.selected_ids().len();
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenFilterDialog => self.modals.toggle(Modal::Filter),
            Action::OpenColumnsDialog => self.modals.toggle(Modal::Columns),
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.toggle(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ModalUp | Action::ModalDown => {}
        }

        self.refresh_dialogs();
        self.sync_cursor();
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_main_layout(area, self.status.is_some());
        let view = self.table.view();

        let ctx = ToolbarContext {
            title: &self.table.options().title,
            state: self.table.state(),
            facets: self.table.facets(),
            input_mode: self.input_mode,
        };
        draw_toolbar(frame, layout.toolbar, &ctx, &view);
        self.table_component
            .draw_with_view(frame, layout.table, &view)?;
        draw_footer(frame, layout.footer, &view);
        if let (Some(area), Some(status)) = (layout.status, &self.status) {
            draw_status(frame, area, status);
        }
        draw_help_bar(
            frame,
            layout.help,
            self.input_mode,
            view.selection.selected_count,
        );

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}
