// tui.rs

use crate::app::{Action, App, Field};
use crate::button::Button;
use crate::config::POLL_INTERVAL;
use crate::todo::Todo;
use chrono::Local;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
};
use std::io;
use tracing::warn;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowButton {
    Read,
    Update,
    Delete,
}

impl RowButton {
    const ALL: [RowButton; 3] = [RowButton::Read, RowButton::Update, RowButton::Delete];

    fn next(self) -> Self {
        match self {
            RowButton::Read => RowButton::Update,
            RowButton::Update => RowButton::Delete,
            RowButton::Delete => RowButton::Read,
        }
    }

    fn prev(self) -> Self {
        match self {
            RowButton::Read => RowButton::Delete,
            RowButton::Update => RowButton::Read,
            RowButton::Delete => RowButton::Update,
        }
    }
}

/// Keyboard focus on the main screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Create,
    Row { index: usize, button: RowButton },
}

/// Keyboard focus inside whichever modal is open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormFocus {
    Field(Field),
    Confirm,
    Cancel,
}

impl FormFocus {
    fn next(self) -> Self {
        match self {
            FormFocus::Field(Field::Name) => FormFocus::Field(Field::Status),
            FormFocus::Field(Field::Status) => FormFocus::Field(Field::CreationDate),
            FormFocus::Field(Field::CreationDate) => FormFocus::Confirm,
            FormFocus::Confirm => FormFocus::Cancel,
            FormFocus::Cancel => FormFocus::Field(Field::Name),
        }
    }

    fn prev(self) -> Self {
        match self {
            FormFocus::Field(Field::Name) => FormFocus::Cancel,
            FormFocus::Field(Field::Status) => FormFocus::Field(Field::Name),
            FormFocus::Field(Field::CreationDate) => FormFocus::Field(Field::Status),
            FormFocus::Confirm => FormFocus::Field(Field::CreationDate),
            FormFocus::Cancel => FormFocus::Confirm,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Modal {
    Create,
    Update,
}

impl Modal {
    fn title(self) -> &'static str {
        match self {
            Modal::Create => " Create Todo ",
            Modal::Update => " Update Todo ",
        }
    }
}

// Update is drawn over create if both flags happen to be set.
fn active_modal(app: &App) -> Option<Modal> {
    if app.update_modal_open {
        Some(Modal::Update)
    } else if app.create_modal_open {
        Some(Modal::Create)
    } else {
        None
    }
}

/// Presentation-only state; everything about todos lives in `App`.
#[derive(Debug)]
pub struct View {
    pub focus: Focus,
    pub form_focus: FormFocus,
    pub error_message: Option<String>,
}

impl Default for View {
    fn default() -> Self {
        Self {
            focus: Focus::Create,
            form_focus: FormFocus::Field(Field::Name),
            error_message: None,
        }
    }
}

impl View {
    fn clamp(&mut self, len: usize) {
        if let Focus::Row { index, button } = self.focus {
            if len == 0 {
                self.focus = Focus::Create;
            } else if index >= len {
                self.focus = Focus::Row {
                    index: len - 1,
                    button,
                };
            }
        }
    }

    fn focused_todo<'a>(&self, app: &'a App) -> Option<&'a Todo> {
        match self.focus {
            Focus::Row { index, .. } => app.todos.as_slice().get(index),
            Focus::Create => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Dispatch(Action),
    Continue,
}

fn create_button(focused: bool) -> Button<'static> {
    Button::new("Create")
        .focused(focused)
        .on_press(|| Action::OpenCreateModal)
}

fn row_button(todo: &Todo, which: RowButton, focused: bool) -> Button<'static> {
    let id = todo.id;
    let button = match which {
        // Read has no action attached.
        RowButton::Read => Button::new("Read"),
        RowButton::Update => Button::new("Update").on_press(move || Action::OpenUpdateModal(id)),
        RowButton::Delete => Button::new("Delete")
            .style(Style::default().fg(Color::White).bg(Color::Red))
            .on_press(move || Action::DeleteTodo(id)),
    };
    button.focused(focused)
}

fn confirm_button(modal: Modal, focused: bool) -> Button<'static> {
    let button = match modal {
        Modal::Create => Button::new("Create").on_press(|| Action::ConfirmCreate),
        Modal::Update => Button::new("Update").on_press(|| Action::ConfirmUpdate),
    };
    button.focused(focused)
}

fn cancel_button(modal: Modal, focused: bool) -> Button<'static> {
    Button::new("Cancel")
        .focused(focused)
        .on_press(move || cancel_action(modal))
}

fn cancel_action(modal: Modal) -> Action {
    match modal {
        Modal::Create => Action::CancelCreate,
        Modal::Update => Action::CancelUpdate,
    }
}

fn pressed(button: Button<'_>) -> Outcome {
    match button.press() {
        Some(action) => Outcome::Dispatch(action),
        None => Outcome::Continue,
    }
}

pub fn handle_key(app: &App, view: &mut View, key: KeyEvent) -> Outcome {
    match active_modal(app) {
        Some(modal) => handle_modal_key(app, view, modal, key),
        None => handle_main_key(app, view, key),
    }
}

fn handle_main_key(app: &App, view: &mut View, key: KeyEvent) -> Outcome {
    let len = app.todos.len();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Outcome::Quit,
        KeyCode::Up => {
            view.focus = match view.focus {
                Focus::Create | Focus::Row { index: 0, .. } => Focus::Create,
                Focus::Row { index, button } => Focus::Row {
                    index: index - 1,
                    button,
                },
            };
        }
        KeyCode::Down => {
            view.focus = match view.focus {
                Focus::Create if len > 0 => Focus::Row {
                    index: 0,
                    button: RowButton::Read,
                },
                Focus::Row { index, button } if index + 1 < len => Focus::Row {
                    index: index + 1,
                    button,
                },
                other => other,
            };
        }
        KeyCode::Left | KeyCode::Right => {
            if let Focus::Row { index, button } = view.focus {
                let button = if key.code == KeyCode::Left {
                    button.prev()
                } else {
                    button.next()
                };
                view.focus = Focus::Row { index, button };
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            return match view.focus {
                Focus::Create => pressed(create_button(true)),
                Focus::Row { index, button } => match app.todos.as_slice().get(index) {
                    Some(todo) => pressed(row_button(todo, button, true)),
                    None => Outcome::Continue,
                },
            };
        }
        KeyCode::Char('a') => return Outcome::Dispatch(Action::OpenCreateModal),
        KeyCode::Char('e') => {
            if let Some(todo) = view.focused_todo(app) {
                return Outcome::Dispatch(Action::OpenUpdateModal(todo.id));
            }
        }
        KeyCode::Char('x') => {
            if let Some(todo) = view.focused_todo(app) {
                return Outcome::Dispatch(Action::DeleteTodo(todo.id));
            }
        }
        _ => {}
    }
    Outcome::Continue
}

fn handle_modal_key(app: &App, view: &mut View, modal: Modal, key: KeyEvent) -> Outcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match (key.code, view.form_focus) {
        (KeyCode::Esc, _) => return Outcome::Dispatch(cancel_action(modal)),
        (KeyCode::Tab | KeyCode::Down, focus) => view.form_focus = focus.next(),
        (KeyCode::BackTab | KeyCode::Up, focus) => view.form_focus = focus.prev(),
        (KeyCode::Enter, FormFocus::Field(_)) => view.form_focus = view.form_focus.next(),
        (KeyCode::Enter | KeyCode::Char(' '), FormFocus::Confirm) => {
            return pressed(confirm_button(modal, true));
        }
        (KeyCode::Enter | KeyCode::Char(' '), FormFocus::Cancel) => {
            return pressed(cancel_button(modal, true));
        }
        (KeyCode::Char('t'), FormFocus::Field(Field::CreationDate)) if ctrl => {
            let today = Local::now().format("%Y-%m-%d").to_string();
            return Outcome::Dispatch(Action::SetField(Field::CreationDate, today));
        }
        (KeyCode::Char(c), FormFocus::Field(field)) if !ctrl => {
            let mut value = app.input.get(field).to_string();
            value.push(c);
            return Outcome::Dispatch(Action::SetField(field, value));
        }
        (KeyCode::Backspace, FormFocus::Field(field)) => {
            let mut value = app.input.get(field).to_string();
            if value.pop().is_some() {
                return Outcome::Dispatch(Action::SetField(field, value));
            }
        }
        _ => {}
    }
    Outcome::Continue
}

/// Runs one action through the app and folds the result into the view.
pub fn apply(app: &mut App, view: &mut View, action: Action) {
    let opens_modal = matches!(
        action,
        Action::OpenCreateModal | Action::OpenUpdateModal(_)
    );
    match app.dispatch(action) {
        Ok(()) => {
            view.error_message = None;
            if opens_modal {
                view.form_focus = FormFocus::Field(Field::Name);
            }
        }
        Err(e) => {
            warn!(error = %e, "action rejected");
            view.error_message = Some(e.to_string());
        }
    }
    view.clamp(app.todos.len());
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()>
where
    std::io::Error: From<<B as Backend>::Error>,
{
    let mut view = View::default();
    loop {
        terminal.draw(|f| ui(f, app, &view))?;

        if event::poll(POLL_INTERVAL)? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(app, &mut view, key) {
                    Outcome::Quit => return Ok(()),
                    Outcome::Dispatch(action) => apply(app, &mut view, action),
                    Outcome::Continue => {}
                }
            }
        }
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(rows[1])[1]
}

pub fn ui(f: &mut Frame<'_>, app: &App, view: &View) {
    let size = f.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(3), // create button
            Constraint::Min(3),    // table
            Constraint::Length(1), // message
            Constraint::Length(1), // help
        ])
        .split(size);

    let title = Paragraph::new(Span::styled(
        "ToDo List",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(title, rows[0]);

    let create = create_button(view.focus == Focus::Create);
    let create_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(12),
            Constraint::Min(0),
        ])
        .split(rows[1])[1];
    f.render_widget(&create, create_area);

    render_table(f, app, view, rows[2]);

    if let Some(ref msg) = view.error_message {
        let error = Paragraph::new(msg.as_str())
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(error, rows[3]);
    }

    let help = match active_modal(app) {
        Some(_) => "[Tab/↑/↓] Move  [Enter] Next/Press  [Ctrl+T] Today  [Esc] Cancel",
        None => "[↑/↓/←/→] Move  [Enter] Press  [a] Create  [e] Update  [x] Delete  [q] Quit",
    };
    f.render_widget(
        Paragraph::new(help)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        rows[4],
    );

    if let Some(modal) = active_modal(app) {
        render_modal(f, app, view, modal, size);
    }
}

fn render_table(f: &mut Frame<'_>, app: &App, view: &View, area: Rect) {
    let header = Row::new(["Name", "Status", "Creation Date", ""])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let body: Vec<Row> = app
        .todos
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, todo)| {
            let mut actions: Vec<Span> = Vec::new();
            for which in RowButton::ALL {
                let focused = view.focus == Focus::Row { index: i, button: which };
                actions.push(row_button(todo, which, focused).as_span());
                actions.push(Span::raw(" "));
            }
            Row::new(vec![
                Cell::from(todo.name.as_str()),
                Cell::from(todo.status.as_str()),
                Cell::from(todo.creation_date.as_str()),
                Cell::from(Line::from(actions)),
            ])
        })
        .collect();

    let table = Table::new(
        body,
        [
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(32),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL))
    .row_highlight_style(Style::default().bg(Color::DarkGray));

    if app.todos.is_empty() {
        let empty = Paragraph::new("No todos yet. Press [a] to create one.")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        let inner = Block::default().borders(Borders::ALL).inner(area);
        f.render_widget(table, area);
        if inner.height >= 2 {
            f.render_widget(empty, Rect { y: inner.y + 1, height: 1, ..inner });
        }
        return;
    }

    let mut state = TableState::default();
    if let Focus::Row { index, .. } = view.focus {
        state.select(Some(index));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_modal(f: &mut Frame<'_>, app: &App, view: &View, modal: Modal, size: Rect) {
    let area = centered_rect(60, 14, size);
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(modal.title())
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(inner);

    for (i, field) in Field::ALL.into_iter().enumerate() {
        let focused = view.form_focus == FormFocus::Field(field);
        let value = app.input.get(field);
        let (text, style) = if focused {
            (
                format!("{}_", value),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )
        } else {
            (value.to_string(), Style::default())
        };
        let widget = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(field.label()))
            .style(style);
        f.render_widget(widget, parts[i]);
    }

    let buttons = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(parts[3]);
    let confirm = confirm_button(modal, view.form_focus == FormFocus::Confirm);
    let cancel = cancel_button(modal, view.form_focus == FormFocus::Cancel);
    f.render_widget(&confirm, buttons[0]);
    f.render_widget(&cancel, buttons[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, view: &mut View, code: KeyCode) -> Outcome {
        press_event(app, view, key(code))
    }

    fn press_event(app: &mut App, view: &mut View, ev: KeyEvent) -> Outcome {
        match handle_key(app, view, ev) {
            Outcome::Dispatch(action) => {
                apply(app, view, action.clone());
                Outcome::Dispatch(action)
            }
            other => other,
        }
    }

    fn type_str(app: &mut App, view: &mut View, s: &str) {
        for c in s.chars() {
            press(app, view, KeyCode::Char(c));
        }
    }

    fn add_via_keys(app: &mut App, view: &mut View, name: &str, status: &str, date: &str) {
        press(app, view, KeyCode::Char('a'));
        type_str(app, view, name);
        press(app, view, KeyCode::Tab);
        type_str(app, view, status);
        press(app, view, KeyCode::Tab);
        type_str(app, view, date);
        press(app, view, KeyCode::Tab);
        assert_eq!(view.form_focus, FormFocus::Confirm);
        press(app, view, KeyCode::Enter);
    }

    fn screen(app: &App, view: &View) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| ui(f, app, view)).unwrap();
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn create_through_the_modal() {
        let mut app = App::new();
        let mut view = View::default();

        add_via_keys(&mut app, &mut view, "Buy milk", "open", "2024-01-01");

        assert!(!app.create_modal_open);
        let todo = &app.todos.as_slice()[0];
        assert_eq!(todo.name, "Buy milk");
        assert_eq!(todo.status, "open");
        assert_eq!(todo.creation_date, "2024-01-01");
    }

    #[test]
    fn q_quits_only_outside_modals() {
        let mut app = App::new();
        let mut view = View::default();
        assert_eq!(press(&mut app, &mut view, KeyCode::Char('q')), Outcome::Quit);

        press(&mut app, &mut view, KeyCode::Char('a'));
        press(&mut app, &mut view, KeyCode::Char('q'));
        assert_eq!(app.input.name, "q");
    }

    #[test]
    fn escape_cancels_create_and_clears_input() {
        let mut app = App::new();
        let mut view = View::default();
        press(&mut app, &mut view, KeyCode::Char('a'));
        type_str(&mut app, &mut view, "draft");
        press(&mut app, &mut view, KeyCode::Esc);

        assert!(!app.create_modal_open);
        assert!(app.input.name.is_empty());
        assert!(app.todos.is_empty());
    }

    #[test]
    fn update_button_opens_prefilled_modal() {
        let mut app = App::new();
        let mut view = View::default();
        add_via_keys(&mut app, &mut view, "A", "open", "d1");

        press(&mut app, &mut view, KeyCode::Down);
        press(&mut app, &mut view, KeyCode::Right);
        assert_eq!(
            view.focus,
            Focus::Row {
                index: 0,
                button: RowButton::Update
            }
        );
        press(&mut app, &mut view, KeyCode::Enter);

        assert!(app.update_modal_open);
        assert_eq!(app.input.name, "A");
        assert_eq!(view.form_focus, FormFocus::Field(Field::Name));

        press(&mut app, &mut view, KeyCode::Backspace);
        type_str(&mut app, &mut view, "B");
        press(&mut app, &mut view, KeyCode::BackTab);
        press(&mut app, &mut view, KeyCode::BackTab);
        assert_eq!(view.form_focus, FormFocus::Confirm);
        press(&mut app, &mut view, KeyCode::Enter);

        let todo = &app.todos.as_slice()[0];
        assert_eq!(todo.name, "B");
        assert_eq!(todo.status, "open");
        assert!(!app.update_modal_open);
        assert_eq!(app.selected, None);
    }

    #[test]
    fn read_button_does_nothing() {
        let mut app = App::new();
        let mut view = View::default();
        add_via_keys(&mut app, &mut view, "A", "open", "d1");
        press(&mut app, &mut view, KeyCode::Down);

        assert_eq!(press(&mut app, &mut view, KeyCode::Enter), Outcome::Continue);
        assert!(!app.update_modal_open);
        assert_eq!(app.todos.len(), 1);
    }

    #[test]
    fn delete_moves_focus_back_into_range() {
        let mut app = App::new();
        let mut view = View::default();
        add_via_keys(&mut app, &mut view, "A", "", "");
        add_via_keys(&mut app, &mut view, "B", "", "");
        press(&mut app, &mut view, KeyCode::Down);
        press(&mut app, &mut view, KeyCode::Down);

        press(&mut app, &mut view, KeyCode::Char('x'));
        assert_eq!(app.todos.len(), 1);
        assert!(matches!(view.focus, Focus::Row { index: 0, .. }));

        press(&mut app, &mut view, KeyCode::Char('x'));
        assert!(app.todos.is_empty());
        assert_eq!(view.focus, Focus::Create);
    }

    #[test]
    fn ctrl_t_fills_today_in_date_field_only() {
        let mut app = App::new();
        let mut view = View::default();
        press(&mut app, &mut view, KeyCode::Char('a'));
        let ctrl_t = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL);

        press_event(&mut app, &mut view, ctrl_t);
        assert!(app.input.name.is_empty());

        view.form_focus = FormFocus::Field(Field::CreationDate);
        press_event(&mut app, &mut view, ctrl_t);
        assert_eq!(
            app.input.creation_date,
            Local::now().format("%Y-%m-%d").to_string()
        );
    }

    #[test]
    fn rejected_action_shows_message() {
        let mut app = App::new();
        let mut view = View::default();
        apply(&mut app, &mut view, Action::ConfirmUpdate);
        assert_eq!(
            view.error_message.as_deref(),
            Some("no todo is selected for update")
        );

        apply(&mut app, &mut view, Action::OpenCreateModal);
        assert_eq!(view.error_message, None);
    }

    #[test]
    fn renders_table_and_modal() {
        let mut app = App::new();
        let mut view = View::default();
        add_via_keys(&mut app, &mut view, "Buy milk", "open", "2024-01-01");

        let main = screen(&app, &view);
        assert!(main.contains("ToDo List"));
        assert!(main.contains("Creation Date"));
        assert!(main.contains("Buy milk"));
        assert!(main.contains("[ Read ]"));
        assert!(main.contains("[ Delete ]"));
        assert!(!main.contains("Update Todo"));

        press(&mut app, &mut view, KeyCode::Down);
        press(&mut app, &mut view, KeyCode::Char('e'));
        let modal = screen(&app, &view);
        assert!(modal.contains("Update Todo"));
        assert!(modal.contains("Buy milk_"));
        assert!(modal.contains("Cancel"));
    }
}
