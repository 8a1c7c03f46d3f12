//! Application state and main UI controller

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use strum::{Display, EnumIter, IntoEnumIterator};

use gp_core::data::{DataError, Dataset};
use gp_core::growth::{self, GrowthBreakdown, GrowthQuery, Trait};
use gp_core::history::SessionHistory;
use gp_core::inheritance::Parents;
use gp_core::options::PlannerOptions;
use gp_core::projection::{self, Interval, Projection, ProjectionError, ProjectionPlan};
use gp_core::stats::Stat;

use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::widgets::{GrowthChartWidget, HistoryWidget, ProjectionWidget};

/// Picker entry that clears an optional field
pub const NONE_CHOICE: &str = "(none)";

/// Top-level views, cycled with Tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum View {
    Growth,
    Route,
    History,
}

impl View {
    fn index(self) -> usize {
        View::iter().position(|v| v == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        match self {
            View::Growth => View::Route,
            View::Route => View::History,
            View::History => View::Growth,
        }
    }

    fn prev(self) -> Self {
        match self {
            View::Growth => View::History,
            View::Route => View::Growth,
            View::History => View::Route,
        }
    }
}

/// Selectable fields of the growth view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Field {
    Category,
    Character,
    Class,
    Parent,
    #[strum(to_string = "2nd parent")]
    FixedParent,
    Boon,
    Bane,
}

impl Field {
    fn from_index(idx: usize) -> Self {
        Field::iter().nth(idx).unwrap_or(Field::Category)
    }

    /// Whether the picker offers "(none)"
    fn optional(self) -> bool {
        !matches!(self, Field::Character)
    }
}

/// Current selections of the growth view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrowthForm {
    pub category: Option<String>,
    pub character: Option<String>,
    pub class: Option<String>,
    pub parent: Option<String>,
    pub fixed_parent: Option<String>,
    pub boon: Option<Stat>,
    pub bane: Option<Stat>,
}

impl GrowthForm {
    fn value(&self, field: Field) -> Option<String> {
        match field {
            Field::Category => self.category.clone(),
            Field::Character => self.character.clone(),
            Field::Class => self.class.clone(),
            Field::Parent => self.parent.clone(),
            Field::FixedParent => self.fixed_parent.clone(),
            Field::Boon => self.boon.map(|s| s.short_name().to_string()),
            Field::Bane => self.bane.map(|s| s.short_name().to_string()),
        }
    }

    fn traits(&self) -> Trait {
        Trait::new(self.boon, self.bane)
    }
}

/// Which box of the interval editor has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftField {
    #[default]
    Start,
    End,
    Class,
}

impl DraftField {
    fn next(self) -> Self {
        match self {
            DraftField::Start => DraftField::End,
            DraftField::End => DraftField::Class,
            DraftField::Class => DraftField::Start,
        }
    }

    fn prev(self) -> Self {
        match self {
            DraftField::Start => DraftField::Class,
            DraftField::End => DraftField::Start,
            DraftField::Class => DraftField::End,
        }
    }
}

/// An interval being typed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalDraft {
    pub start: String,
    pub end: String,
    /// Index into the dataset's class list
    pub class: usize,
    pub focus: DraftField,
}

/// UI mode - what the app is currently displaying/waiting for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    /// Choosing a value for a growth field
    Picker {
        field: Field,
        choices: Vec<String>,
        cursor: usize,
    },
    /// Adding a route interval
    IntervalEditor(IntervalDraft),
    Help,
}

/// Application state
pub struct App {
    dataset: Dataset,
    options: PlannerOptions,
    history: SessionHistory,
    theme: Theme,

    view: View,
    mode: UiMode,
    should_quit: bool,

    form: GrowthForm,
    field_cursor: usize,

    intervals: Vec<Interval>,
    interval_cursor: usize,

    history_cursor: usize,

    /// One-line feedback shown in the footer
    status: Option<String>,
}

impl App {
    pub fn new(dataset: Dataset, options: PlannerOptions, theme: Theme) -> Self {
        let history = SessionHistory::with_limit(options.history_limit);
        Self {
            dataset,
            options,
            history,
            theme,
            view: View::Growth,
            mode: UiMode::Normal,
            should_quit: false,
            form: GrowthForm::default(),
            field_cursor: 0,
            intervals: Vec::new(),
            interval_cursor: 0,
            history_cursor: 0,
            status: None,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn mode(&self) -> &UiMode {
        &self.mode
    }

    pub fn form(&self) -> &GrowthForm {
        &self.form
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Handle an input event
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event
            && key.kind == KeyEventKind::Press
        {
            match &self.mode {
                UiMode::IntervalEditor(_) => self.handle_editor_input(key),
                UiMode::Picker { .. } => {
                    if let Some(action) = key_to_action(key) {
                        self.handle_picker_action(action);
                    }
                }
                UiMode::Help => {
                    if key_to_action(key).is_some() {
                        self.mode = UiMode::Normal;
                    }
                }
                UiMode::Normal => {
                    if let Some(action) = key_to_action(key) {
                        self.handle_action(action);
                    }
                }
            }
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::NextView => {
                self.view = self.view.next();
                self.status = None;
                return;
            }
            Action::PrevView => {
                self.view = self.view.prev();
                self.status = None;
                return;
            }
            Action::Help => {
                self.mode = UiMode::Help;
                return;
            }
            _ => {}
        }

        match self.view {
            View::Growth => self.handle_growth_action(action),
            View::Route => self.handle_route_action(action),
            View::History => self.handle_history_action(action),
        }
    }

    fn handle_growth_action(&mut self, action: Action) {
        let fields = Field::iter().count();
        match action {
            Action::Up => self.field_cursor = (self.field_cursor + fields - 1) % fields,
            Action::Down => self.field_cursor = (self.field_cursor + 1) % fields,
            Action::Select | Action::Right => {
                self.open_picker(Field::from_index(self.field_cursor));
            }
            _ => {}
        }
    }

    fn handle_route_action(&mut self, action: Action) {
        match action {
            Action::Up => self.interval_cursor = self.interval_cursor.saturating_sub(1),
            Action::Down => {
                if self.interval_cursor + 1 < self.intervals.len() {
                    self.interval_cursor += 1;
                }
            }
            Action::Add => self.open_editor(),
            Action::Remove => {
                if self.interval_cursor < self.intervals.len() {
                    self.intervals.remove(self.interval_cursor);
                    self.interval_cursor =
                        self.interval_cursor.min(self.intervals.len().saturating_sub(1));
                }
            }
            Action::Save => self.save_projection(),
            _ => {}
        }
    }

    fn handle_history_action(&mut self, action: Action) {
        match action {
            Action::Up => self.history_cursor = self.history_cursor.saturating_sub(1),
            Action::Down => {
                if self.history_cursor + 1 < self.history.len() {
                    self.history_cursor += 1;
                }
            }
            Action::Delete => {
                let id = self.history.entries().nth(self.history_cursor).map(|e| e.id);
                if let Some(id) = id {
                    self.history.remove(id);
                    self.history_cursor =
                        self.history_cursor.min(self.history.len().saturating_sub(1));
                    self.status = Some(format!("Deleted #{id}"));
                }
            }
            Action::Clear => {
                self.history.clear();
                self.history_cursor = 0;
                self.status = Some("History cleared".to_string());
            }
            _ => {}
        }
    }

    /// Choices offered for a field, "(none)" first where allowed
    pub fn choices(&self, field: Field) -> Vec<String> {
        let mut choices = Vec::new();
        if field.optional() {
            choices.push(NONE_CHOICE.to_string());
        }
        match field {
            Field::Category => choices.extend(self.dataset.categories().map(String::from)),
            Field::Character => {
                let names = self
                    .form
                    .category
                    .as_deref()
                    .and_then(|category| self.dataset.characters_in(category).ok());
                match names {
                    Some(names) => choices.extend(names.iter().cloned()),
                    None => choices.extend(self.dataset.character_names().map(String::from)),
                }
            }
            Field::Class => choices.extend(self.dataset.class_names().map(String::from)),
            Field::Parent | Field::FixedParent => choices.extend(
                self.dataset
                    .character_names()
                    .filter(|name| Some(*name) != self.form.character.as_deref())
                    .map(String::from),
            ),
            Field::Boon | Field::Bane => {
                choices.extend(Stat::ALL.iter().map(|s| s.short_name().to_string()));
            }
        }
        choices
    }

    fn open_picker(&mut self, field: Field) {
        let choices = self.choices(field);
        if choices.is_empty() {
            self.status = Some(format!("No {field} to choose from"));
            return;
        }
        let current = self.form.value(field).unwrap_or_else(|| NONE_CHOICE.to_string());
        let cursor = choices.iter().position(|c| *c == current).unwrap_or(0);
        self.mode = UiMode::Picker {
            field,
            choices,
            cursor,
        };
    }

    fn handle_picker_action(&mut self, action: Action) {
        let UiMode::Picker {
            field,
            choices,
            cursor,
        } = &mut self.mode
        else {
            return;
        };

        match action {
            Action::Up => *cursor = (*cursor + choices.len() - 1) % choices.len(),
            Action::Down => *cursor = (*cursor + 1) % choices.len(),
            Action::Select => {
                let field = *field;
                let choice = choices.get(*cursor).cloned();
                self.mode = UiMode::Normal;
                let value = choice.filter(|c| c != NONE_CHOICE);
                self.set_field(field, value);
            }
            Action::Back | Action::Quit => self.mode = UiMode::Normal,
            _ => {}
        }
    }

    /// Set one growth field; `None` clears it.
    ///
    /// Choosing a different category clears the character.
    pub fn set_field(&mut self, field: Field, value: Option<String>) {
        match field {
            Field::Category => {
                if self.form.category != value {
                    self.form.category = value;
                    self.form.character = None;
                }
            }
            Field::Character => self.form.character = value,
            Field::Class => self.form.class = value,
            Field::Parent => self.form.parent = value,
            Field::FixedParent => self.form.fixed_parent = value,
            Field::Boon => self.form.boon = value.as_deref().and_then(Stat::parse),
            Field::Bane => self.form.bane = value.as_deref().and_then(Stat::parse),
        }
        tracing::debug!(%field, "growth field changed");
        if matches!(field, Field::Boon | Field::Bane)
            && let Some(boon) = self.form.boon
            && self.form.bane == Some(boon)
        {
            tracing::warn!(stat = %boon, "boon and bane are the same stat, bane ignored");
        }
    }

    /// Growth breakdown for the current selections, once a character is chosen
    pub fn breakdown(&self) -> Option<Result<GrowthBreakdown, DataError>> {
        let character = self.form.character.as_ref()?;
        let mut query = GrowthQuery::new(character.as_str()).with_traits(self.form.traits());
        if let Some(class) = &self.form.class {
            query = query.with_class(class.as_str());
        }
        if let Some(parent) = &self.form.parent {
            query = query.with_parent(parent.as_str());
        }
        Some(growth::compose(&self.dataset, &query, &self.options))
    }

    /// Projection plan from the chosen character, parents, traits and route
    pub fn plan(&self) -> Option<ProjectionPlan> {
        let character = self.form.character.as_ref()?;
        let parents = Parents {
            variable: self.form.parent.clone(),
            fixed: self.form.fixed_parent.clone(),
        };
        let mut plan = ProjectionPlan::new(character.as_str())
            .with_parents(parents)
            .with_traits(self.form.traits());
        plan.intervals = self.intervals.clone();
        Some(plan)
    }

    pub fn projection(&self) -> Option<Result<Projection, ProjectionError>> {
        let plan = self.plan()?;
        Some(projection::project(&self.dataset, &plan, &self.options))
    }

    fn open_editor(&mut self) {
        let classes: Vec<&str> = self.dataset.class_names().collect();
        if classes.is_empty() {
            self.status = Some("No classes loaded".to_string());
            return;
        }

        let start_point = self
            .form
            .character
            .as_deref()
            .and_then(|name| self.dataset.base_stats(name));
        let (start, class_name) = match self.intervals.last() {
            Some(last) => (last.end_level, Some(last.class.as_str())),
            None => (
                start_point.map_or(1, |entry| entry.level),
                start_point.map(|entry| entry.class.as_str()),
            ),
        };
        let end = start.saturating_add(10).min(self.options.max_level).max(start);
        let class = class_name
            .and_then(|name| classes.iter().position(|c| *c == name))
            .unwrap_or(0);

        self.mode = UiMode::IntervalEditor(IntervalDraft {
            start: start.to_string(),
            end: end.to_string(),
            class,
            focus: DraftField::Start,
        });
    }

    fn handle_editor_input(&mut self, key: KeyEvent) {
        let class_count = self.dataset.classes().len();
        let UiMode::IntervalEditor(draft) = &mut self.mode else {
            return;
        };

        match key.code {
            KeyCode::Esc => self.mode = UiMode::Normal,
            KeyCode::Tab | KeyCode::Down => draft.focus = draft.focus.next(),
            KeyCode::BackTab | KeyCode::Up => draft.focus = draft.focus.prev(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let text = match draft.focus {
                    DraftField::Start => &mut draft.start,
                    DraftField::End => &mut draft.end,
                    DraftField::Class => return,
                };
                if text.len() < 3 {
                    text.push(c);
                }
            }
            KeyCode::Backspace => match draft.focus {
                DraftField::Start => {
                    draft.start.pop();
                }
                DraftField::End => {
                    draft.end.pop();
                }
                DraftField::Class => {}
            },
            KeyCode::Left if draft.focus == DraftField::Class && class_count > 0 => {
                draft.class = (draft.class + class_count - 1) % class_count;
            }
            KeyCode::Right if draft.focus == DraftField::Class && class_count > 0 => {
                draft.class = (draft.class + 1) % class_count;
            }
            KeyCode::Enter => {
                let draft = draft.clone();
                self.commit_interval(&draft);
            }
            _ => {}
        }
    }

    fn commit_interval(&mut self, draft: &IntervalDraft) {
        let max = self.options.max_level;
        let levels = draft.start.parse::<u32>().ok().zip(draft.end.parse::<u32>().ok());
        let (start, end) = match levels {
            Some((start, end)) if start >= 1 && start <= end && end <= max => (start, end),
            _ => {
                self.status = Some(format!("Levels must satisfy 1 <= start <= end <= {max}"));
                return;
            }
        };
        let Some(class) = self.dataset.classes().get(draft.class) else {
            return;
        };

        self.intervals.push(Interval::new(start, end, class.name.as_str()));
        self.interval_cursor = self.intervals.len() - 1;
        self.mode = UiMode::Normal;
        self.status = None;
    }

    fn save_projection(&mut self) {
        match self.projection() {
            Some(Ok(result)) => {
                let label = self
                    .intervals
                    .iter()
                    .map(|i| format!("{}-{}:{}", i.start_level, i.end_level, i.class))
                    .collect::<Vec<_>>()
                    .join(" ");
                let id = self.history.save(&result, &label);
                self.status = Some(format!("Saved #{id}"));
            }
            Some(Err(err)) => self.status = Some(err.to_string()),
            None => self.status = Some("Choose a character in the growth view first".to_string()),
        }
    }

    /// Render the UI
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(10),   // Active view
                Constraint::Length(1), // Footer
            ])
            .split(frame.area());

        self.render_tabs(frame, chunks[0]);
        match self.view {
            View::Growth => self.render_growth(frame, chunks[1]),
            View::Route => self.render_route(frame, chunks[1]),
            View::History => self.render_history(frame, chunks[1]),
        }
        self.render_footer(frame, chunks[2]);

        match &self.mode {
            UiMode::Normal => {}
            UiMode::Picker {
                field,
                choices,
                cursor,
            } => self.render_picker(frame, *field, choices, *cursor),
            UiMode::IntervalEditor(draft) => self.render_editor(frame, draft),
            UiMode::Help => self.render_help(frame),
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<String> = View::iter().map(|v| v.to_string()).collect();
        let tabs = Tabs::new(titles)
            .select(self.view.index())
            .block(
                Block::default()
                    .title(" growth-planner ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.border)),
            )
            .style(Style::default().fg(self.theme.text_dim))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn render_growth(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(20)])
            .split(area);

        let is_avatar = self
            .form
            .character
            .as_deref()
            .is_some_and(|name| self.options.is_avatar(name));
        let items: Vec<ListItem> = Field::iter()
            .enumerate()
            .map(|(i, field)| {
                let value = self.form.value(field).unwrap_or_else(|| NONE_CHOICE.to_string());
                let mut spans = vec![
                    Span::styled(format!("{field:<10}"), Style::default().fg(self.theme.header)),
                    Span::raw(value),
                ];
                if matches!(field, Field::Boon | Field::Bane)
                    && self.form.character.is_some()
                    && !is_avatar
                {
                    spans.push(Span::styled(
                        " (avatar only)",
                        Style::default().fg(self.theme.text_muted),
                    ));
                }
                let style = if i == self.field_cursor {
                    Style::default().fg(self.theme.cursor_fg).bg(self.theme.cursor_bg)
                } else {
                    Style::default().fg(self.theme.text)
                };
                ListItem::new(Line::from(spans)).style(style)
            })
            .collect();
        let list = List::new(items).block(
            Block::default()
                .title(" Unit ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border)),
        );
        frame.render_widget(list, chunks[0]);

        match self.breakdown() {
            Some(Ok(breakdown)) => {
                let name = self.form.character.as_deref().unwrap_or_default();
                frame.render_widget(
                    GrowthChartWidget::new(&breakdown, name, &self.theme),
                    chunks[1],
                );
            }
            Some(Err(err)) => self.render_message(frame, chunks[1], &err.to_string(), true),
            None => self.render_message(
                frame,
                chunks[1],
                "Choose a character to see its growth rates.",
                false,
            ),
        }
    }

    fn render_route(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(30)])
            .split(area);

        let start = self
            .form
            .character
            .as_deref()
            .and_then(|name| self.dataset.base_stats(name))
            .map(|entry| format!(" Start: {} Lv{} ", entry.class, entry.level))
            .unwrap_or_else(|| " Route ".to_string());

        let items: Vec<ListItem> = if self.intervals.is_empty() {
            vec![ListItem::new("No intervals. Press a to add one.")
                .style(Style::default().fg(self.theme.text_muted))]
        } else {
            self.intervals
                .iter()
                .enumerate()
                .map(|(i, interval)| {
                    let style = if i == self.interval_cursor {
                        Style::default().fg(self.theme.cursor_fg).bg(self.theme.cursor_bg)
                    } else {
                        Style::default().fg(self.theme.text)
                    };
                    ListItem::new(format!(
                        "Lv{:>2}-{:<2} {}",
                        interval.start_level, interval.end_level, interval.class
                    ))
                    .style(style)
                })
                .collect()
        };
        let list = List::new(items).block(
            Block::default()
                .title(start)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border)),
        );
        frame.render_widget(list, chunks[0]);

        match self.projection() {
            Some(Ok(result)) => {
                let mut widget = ProjectionWidget::new(&result, &self.theme);
                if let Ok(class) = self.dataset.class(&result.final_class) {
                    widget = widget.with_caps(class.cap);
                }
                frame.render_widget(widget, chunks[1]);
            }
            Some(Err(err)) => self.render_message(frame, chunks[1], &err.to_string(), true),
            None => self.render_message(
                frame,
                chunks[1],
                "Choose a character in the growth view first.",
                false,
            ),
        }
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        frame.render_widget(
            HistoryWidget::new(&self.history, self.history_cursor, &self.theme),
            chunks[0],
        );

        let Some(entry) = self.history.entries().nth(self.history_cursor) else {
            return;
        };
        let mut lines = vec![Line::from(Span::styled(
            format!("{} ({})", entry.character, entry.label),
            Style::default().fg(self.theme.accent),
        ))];
        for (stat, value) in entry.stats.iter() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<4}", stat.short_name()),
                    Style::default().fg(self.theme.header),
                ),
                Span::raw(format!("{value:>7.2}")),
            ]));
        }
        lines.push(Line::from(format!("Total {:.2}", entry.stats.sum())));
        let detail = Paragraph::new(lines).block(
            Block::default()
                .title(format!(" #{} ", entry.id))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border)),
        );
        frame.render_widget(detail, chunks[1]);
    }

    fn render_message(&self, frame: &mut Frame, area: Rect, text: &str, error: bool) {
        let color = if error {
            self.theme.bad
        } else {
            self.theme.text_muted
        };
        let paragraph = Paragraph::new(text.to_string())
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.border)),
            );
        frame.render_widget(paragraph, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let text = match (&self.status, self.view) {
            (Some(status), _) => status.clone(),
            (None, View::Growth) => "↑↓ field  Enter choose  Tab view  ? help  q quit".to_string(),
            (None, View::Route) => "a add  x remove  s save  Tab view  ? help  q quit".to_string(),
            (None, View::History) => "d delete  c clear  Tab view  ? help  q quit".to_string(),
        };
        let style = if self.status.is_some() {
            Style::default().fg(self.theme.header)
        } else {
            Style::default().fg(self.theme.text_dim)
        };
        frame.render_widget(Paragraph::new(text).style(style), area);
    }

    fn render_picker(&self, frame: &mut Frame, field: Field, choices: &[String], cursor: usize) {
        let area = centered_rect(40, 70, frame.area());
        frame.render_widget(Clear, area);

        let items: Vec<ListItem> = choices.iter().map(|c| ListItem::new(c.as_str())).collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" {field} "))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.border_action)),
            )
            .style(Style::default().fg(self.theme.text))
            .highlight_style(Style::default().fg(self.theme.cursor_fg).bg(self.theme.cursor_bg));
        let mut state = ListState::default().with_selected(Some(cursor));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_editor(&self, frame: &mut Frame, draft: &IntervalDraft) {
        let area = centered_rect(50, 40, frame.area());
        frame.render_widget(Clear, area);

        let class = self
            .dataset
            .classes()
            .get(draft.class)
            .map_or("?", |c| c.name.as_str());
        let row = |label: &str, value: String, focus: DraftField| {
            let style = if draft.focus == focus {
                Style::default().fg(self.theme.cursor_fg).bg(self.theme.cursor_bg)
            } else {
                Style::default().fg(self.theme.text)
            };
            Line::from(vec![
                Span::styled(format!("{label:<12}"), Style::default().fg(self.theme.header)),
                Span::styled(value, style),
            ])
        };
        let lines = vec![
            row("Start level", format!("[{:>3}]", draft.start), DraftField::Start),
            row("End level", format!("[{:>3}]", draft.end), DraftField::End),
            row("Class", format!("< {class} >"), DraftField::Class),
            Line::from(""),
            Line::from(Span::styled(
                "Tab next  ←→ class  Enter add  Esc cancel",
                Style::default().fg(self.theme.text_dim),
            )),
        ];
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(" Add interval ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border_action)),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_help(&self, frame: &mut Frame) {
        let area = centered_rect(60, 70, frame.area());
        frame.render_widget(Clear, area);

        let bindings = [
            ("Tab / S-Tab", "switch view"),
            ("↑↓ / j k", "move"),
            ("Enter", "choose a value"),
            ("Esc", "back out"),
            ("a", "add a route interval"),
            ("x", "remove the selected interval"),
            ("s", "save the projection to history"),
            ("d", "delete the selected history entry"),
            ("c", "clear history"),
            ("q", "quit"),
        ];
        let lines: Vec<Line> = bindings
            .iter()
            .map(|(key, what)| {
                Line::from(vec![
                    Span::styled(format!("{key:<14}"), Style::default().fg(self.theme.header)),
                    Span::raw(*what),
                ])
            })
            .collect();
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(" Keys ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border_accent)),
        );
        frame.render_widget(paragraph, area);
    }
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use gp_core::data::{CharacterBaseEntry, CharacterEntry, ClassEntry};
    use gp_core::stats::StatLine;

    fn dataset() -> Dataset {
        let mut data = Dataset::new();
        for (name, category) in [("Corrin", "Avatar"), ("Jakob", "Nohr"), ("Xander", "Nohr")] {
            data.add_character(CharacterEntry {
                name: name.to_string(),
                category: category.to_string(),
                growth: StatLine::splat(40),
            })
            .unwrap();
        }
        for name in ["Nohr Prince", "Butler"] {
            data.add_class(ClassEntry::with_growth(name, StatLine::splat(10)))
                .unwrap();
        }
        for (name, class, stats) in [
            ("Jakob", "Butler", 10),
            ("Corrin", "Nohr Prince", 20),
            ("Xander", "Butler", 30),
        ] {
            data.add_start(CharacterBaseEntry {
                name: name.to_string(),
                class: class.to_string(),
                level: 1,
                stats: StatLine::splat(stats),
            })
            .unwrap();
        }
        data
    }

    fn app() -> App {
        App::new(dataset(), PlannerOptions::default(), Theme::dark())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_tab_cycles_views() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view(), View::Route);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view(), View::History);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view(), View::Growth);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.view(), View::History);
    }

    #[test]
    fn test_picker_selects_category_then_character() {
        let mut app = app();
        // Category picker: (none), Avatar, Nohr
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form().category.as_deref(), Some("Avatar"));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        match app.mode() {
            UiMode::Picker { choices, .. } => assert_eq!(choices, &["Corrin"]),
            other => panic!("expected picker, got {other:?}"),
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form().character.as_deref(), Some("Corrin"));
        assert!(matches!(app.breakdown(), Some(Ok(_))));
    }

    #[test]
    fn test_changing_category_clears_character() {
        let mut app = app();
        app.set_field(Field::Category, Some("Avatar".to_string()));
        app.set_field(Field::Character, Some("Corrin".to_string()));
        app.set_field(Field::Category, Some("Avatar".to_string()));
        assert!(app.form().character.is_some());
        app.set_field(Field::Category, Some("Nohr".to_string()));
        assert!(app.form().character.is_none());
    }

    #[test]
    fn test_none_choice_clears_field() {
        let mut app = app();
        app.set_field(Field::Class, Some("Butler".to_string()));
        app.field_cursor = 2;
        press(&mut app, KeyCode::Enter);
        // cursor starts on the current value; move back to (none)
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.form().class, None);
    }

    #[test]
    fn test_esc_closes_picker_without_change() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode(), &UiMode::Normal);
        assert_eq!(app.form().category, None);
    }

    #[test]
    fn test_route_add_save_and_delete() {
        let mut app = app();
        app.set_field(Field::Character, Some("Jakob".to_string()));
        press(&mut app, KeyCode::Tab);

        press(&mut app, KeyCode::Char('a'));
        assert!(matches!(app.mode(), UiMode::IntervalEditor(_)));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.intervals(), [Interval::new(1, 11, "Butler")]);
        assert!(matches!(app.projection(), Some(Ok(_))));

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.history().len(), 1);
        assert_eq!(app.status(), Some("Saved #1"));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('d'));
        assert!(app.history().is_empty());
    }

    #[test]
    fn test_editor_rejects_bad_levels() {
        let mut app = app();
        app.set_field(Field::Character, Some("Jakob".to_string()));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('0'));
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode(), UiMode::IntervalEditor(_)));
        assert!(app.intervals().is_empty());
        assert!(app.status().is_some());
    }

    #[test]
    fn test_fixed_parent_raises_start() {
        let mut app = app();
        app.set_field(Field::Character, Some("Jakob".to_string()));
        app.set_field(Field::Parent, Some("Corrin".to_string()));
        let result = app.projection().unwrap().unwrap();
        assert_eq!(result.inherited, None);

        app.set_field(Field::FixedParent, Some("Xander".to_string()));
        let plan = app.plan().unwrap();
        assert_eq!(plan.parents, Parents::variable("Corrin").with_fixed("Xander"));
        let result = app.projection().unwrap().unwrap();
        // 10 + (20 + 30 - 20) / 4
        assert_eq!(result.start.stats, StatLine::splat(17));
        assert_eq!(result.inherited, Some(StatLine::splat(7)));
    }

    #[test]
    fn test_same_boon_and_bane_keeps_boon() {
        let mut app = app();
        app.set_field(Field::Character, Some("Corrin".to_string()));
        app.set_field(Field::Boon, Some("Spd".to_string()));
        app.set_field(Field::Bane, Some("Spd".to_string()));
        let breakdown = app.breakdown().unwrap().unwrap();
        // 40 personal + 15 boon
        assert_eq!(breakdown.total()[Stat::Speed], 55);
        assert_eq!(breakdown.traits.sum(), 15);
    }

    #[test]
    fn test_fixed_parent_choices_skip_character() {
        let mut app = app();
        app.set_field(Field::Character, Some("Jakob".to_string()));
        assert_eq!(app.choices(Field::FixedParent), [NONE_CHOICE, "Corrin", "Xander"]);
    }

    #[test]
    fn test_open_editor_near_level_limit() {
        let mut app = app();
        app.intervals = vec![Interval::new(1, u32::MAX, "Butler")];
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('a'));
        match app.mode() {
            UiMode::IntervalEditor(draft) => assert_eq!(draft.end, u32::MAX.to_string()),
            other => panic!("expected editor, got {other:?}"),
        }
    }

    #[test]
    fn test_save_without_character() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('s'));
        assert!(app.history().is_empty());
        assert!(app.status().is_some());
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }
}
