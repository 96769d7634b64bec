use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::widgets::ListState;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::application::todo_list_view::{Outcome, Request, TodoListView};
use crate::domain::{api::TodoApi, todo::TodoItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus { List, Form }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveField { Title, Description }

impl ActiveField {
    fn next(self) -> Self {
        match self { ActiveField::Title => ActiveField::Description, ActiveField::Description => ActiveField::Title }
    }
}

/// Terminal-side state wrapped around a `TodoListView`: which pane has the
/// keyboard and which row is selected.
///
/// Keys never wait on the network. Each request runs on its own task and its
/// outcome comes back through a channel that the event loop drains.
pub struct App<A: TodoApi> {
    pub view: TodoListView<A>,
    pub focus: Focus,
    pub field: ActiveField,
    pub selected: usize,
    pub list_state: ListState,
    pub api_url: String,
    pub should_quit: bool,
    in_flight: usize,
    outcomes_tx: UnboundedSender<Outcome>,
    outcomes_rx: UnboundedReceiver<Outcome>,
}

impl<A: TodoApi> App<A> {
    pub fn new(view: TodoListView<A>, api_url: impl Into<String>) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            view,
            focus: Focus::List,
            field: ActiveField::Title,
            selected: 0,
            list_state: ListState::default(),
            api_url: api_url.into(),
            should_quit: false,
            in_flight: 0,
            outcomes_tx,
            outcomes_rx,
        }
    }

    pub fn selected_item(&self) -> Option<&TodoItem> { self.view.items().get(self.selected) }

    /// Requests sent whose outcome has not been applied yet.
    pub fn in_flight(&self) -> usize { self.in_flight }

    /// Starts `request` on the runtime. Repeated triggers are not merged.
    pub fn dispatch(&mut self, request: Request) {
        tracing::debug!(?request, "dispatching");
        let api = self.view.api();
        let tx = self.outcomes_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let outcome = request.send(api.as_ref()).await;
            // The receiver lives as long as the app; a send error means it quit.
            let _ = tx.send(outcome);
        });
    }

    /// Applies every outcome that has already arrived, without waiting.
    pub fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            self.apply(outcome);
        }
    }

    /// Waits for the next outcome and applies it. Returns false when nothing is in flight.
    pub async fn apply_next(&mut self) -> bool {
        if self.in_flight == 0 { return false; }
        match self.outcomes_rx.recv().await {
            Some(outcome) => { self.apply(outcome); true }
            None => false,
        }
    }

    fn apply(&mut self, outcome: Outcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let created = matches!(outcome, Outcome::Created(Ok(_)));
        let submitted = created || matches!(outcome, Outcome::EditSaved { result: Ok(_), .. });
        let _ = self.view.apply(outcome);
        if submitted && self.focus == Focus::Form && !self.view.is_editing() {
            self.focus = Focus::List;
            self.field = ActiveField::Title;
            if created { self.selected = self.view.items().len().saturating_sub(1); }
        }
        self.clamp_selection();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Only presses; repeats and releases would duplicate input on some terminals
        if key.kind != KeyEventKind::Press { return; }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.focus {
            Focus::List => self.handle_list_key(key),
            Focus::Form => self.handle_form_key(key),
        }
        self.clamp_selection();
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.view.items().len() { self.selected += 1; }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(request) = self.selected_item().map(Request::toggle) {
                    self.dispatch(request);
                }
            }
            KeyCode::Char('e') => {
                if let Some(item) = self.selected_item().cloned() {
                    self.view.begin_edit(&item);
                    self.focus = Focus::Form;
                    self.field = ActiveField::Title;
                }
            }
            KeyCode::Char('n') | KeyCode::Char('i') => {
                self.focus = Focus::Form;
                self.field = ActiveField::Title;
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_item().map(|t| t.id.clone()) {
                    self.dispatch(Request::Remove(id));
                }
            }
            KeyCode::Char('r') => self.dispatch(Request::Load),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.view.is_editing() { self.view.cancel_edit(); }
                self.focus = Focus::List;
            }
            KeyCode::Enter => {
                let request = self.view.submit_request();
                self.dispatch(request);
            }
            KeyCode::Tab | KeyCode::BackTab => self.field = self.field.next(),
            KeyCode::Backspace => { self.active_draft().pop(); }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.active_draft().push(c),
            _ => {}
        }
    }

    fn active_draft(&mut self) -> &mut String {
        let draft = self.view.draft_mut();
        match self.field {
            ActiveField::Title => &mut draft.title,
            ActiveField::Description => &mut draft.description,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.view.items().len();
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            if self.selected >= len { self.selected = len - 1; }
            self.list_state.select(Some(self.selected));
        }
    }
}
