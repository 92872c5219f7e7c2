// TUI application state and event handling
use chrono::{DateTime, Utc};
use ratatui::widgets::TableState;
use std::time::{Duration, Instant};
use stockroom_core::{
    Dashboard, Inventory, Notice, Query, RecordDraft, RecordId, Severity, StatusFilter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,        // Navigating the table
    Searching,     // Typing in the search box
    Form,          // Filling in the add/edit dialog
    ConfirmDelete, // Waiting for y/n
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Add,
    Edit(RecordId),
}

pub const FORM_LABELS: [&str; 5] = [
    "Name",
    "Quantity",
    "Buy Price",
    "Sell Price",
    "Expiry (YYYY-MM-DD)",
];

/// The add/edit dialog
#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub draft: RecordDraft,
    pub cursor: usize,
}

impl Form {
    pub fn field(&self, index: usize) -> &str {
        match index {
            0 => &self.draft.name,
            1 => &self.draft.quantity,
            2 => &self.draft.buy_price,
            3 => &self.draft.sell_price,
            _ => &self.draft.expiry,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.cursor {
            0 => &mut self.draft.name,
            1 => &mut self.draft.quantity,
            2 => &mut self.draft.buy_price,
            3 => &mut self.draft.sell_price,
            _ => &mut self.draft.expiry,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Add => "Add Product",
            FormKind::Edit(_) => "Edit Product",
        }
    }
}

/// A message that disappears on its own
#[derive(Debug, Clone)]
pub struct Toast {
    pub severity: Severity,
    pub message: String,
    pub shown_at: Instant,
}

pub struct App {
    pub inventory: Inventory,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub search_input: String,
    pub status_filter: StatusFilter,
    pub table_state: TableState,
    pub form: Option<Form>,
    pub pending_delete: Option<RecordId>,
    pub toasts: Vec<Toast>,
    pub toast_lifetime: Duration,
    pub currency: String,
}

impl App {
    pub fn new(inventory: Inventory, currency: impl Into<String>, toast_lifetime: Duration) -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));

        Self {
            inventory,
            should_quit: false,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            status_filter: StatusFilter::All,
            table_state,
            form: None,
            pending_delete: None,
            toasts: Vec::new(),
            toast_lifetime,
            currency: currency.into(),
        }
    }

    pub fn query(&self) -> Query {
        Query::new()
            .text(self.search_input.clone())
            .status(self.status_filter)
    }

    /// Ids of the rows currently on screen, in display order
    pub fn visible_ids(&self, now: DateTime<Utc>) -> Vec<RecordId> {
        self.inventory
            .view(&self.query(), now)
            .iter()
            .map(|row| row.id)
            .collect()
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> Dashboard {
        self.inventory.dashboard(now)
    }

    pub fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    pub fn selected_id(&self, now: DateTime<Utc>) -> Option<RecordId> {
        self.visible_ids(now).get(self.selected_index()).copied()
    }

    pub fn next_row(&mut self, now: DateTime<Utc>) {
        let count = self.visible_ids(now).len();
        if count > 0 {
            let next = (self.selected_index() + 1).min(count - 1);
            self.table_state.select(Some(next));
        }
    }

    pub fn previous_row(&mut self) {
        let current = self.selected_index();
        self.table_state.select(Some(current.saturating_sub(1)));
    }

    /// Keep the cursor on a real row after the view shrank
    pub fn clamp_selection(&mut self, now: DateTime<Utc>) {
        let count = self.visible_ids(now).len();
        let index = self.selected_index().min(count.saturating_sub(1));
        self.table_state.select(Some(index));
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Searching;
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn push_search_char(&mut self, c: char, now: DateTime<Utc>) {
        self.search_input.push(c);
        self.clamp_selection(now);
    }

    pub fn pop_search_char(&mut self, now: DateTime<Utc>) {
        self.search_input.pop();
        self.clamp_selection(now);
    }

    pub fn cycle_filter(&mut self, now: DateTime<Utc>) {
        self.status_filter = self.status_filter.cycle();
        self.clamp_selection(now);
    }

    pub fn start_add(&mut self) {
        self.form = Some(Form {
            kind: FormKind::Add,
            draft: RecordDraft::default(),
            cursor: 0,
        });
        self.input_mode = InputMode::Form;
    }

    /// Open the edit dialog prefilled with the selected record
    pub fn start_edit(&mut self, now: DateTime<Utc>) {
        let Some(id) = self.selected_id(now) else {
            return;
        };
        let Some(record) = self.inventory.get(id) else {
            return;
        };

        self.form = Some(Form {
            kind: FormKind::Edit(id),
            draft: RecordDraft::from_record(record),
            cursor: 0,
        });
        self.input_mode = InputMode::Form;
    }

    pub fn form_next_field(&mut self) {
        if let Some(form) = &mut self.form {
            form.cursor = (form.cursor + 1) % FORM_LABELS.len();
        }
    }

    pub fn form_previous_field(&mut self) {
        if let Some(form) = &mut self.form {
            form.cursor = (form.cursor + FORM_LABELS.len() - 1) % FORM_LABELS.len();
        }
    }

    pub fn form_push_char(&mut self, c: char) {
        if let Some(form) = &mut self.form {
            form.field_mut().push(c);
        }
    }

    pub fn form_pop_char(&mut self) {
        if let Some(form) = &mut self.form {
            form.field_mut().pop();
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.enter_normal_mode();
    }

    /// Save the dialog. On bad input the dialog stays open with a warning.
    pub fn submit_form(&mut self, now: DateTime<Utc>) {
        let Some(form) = self.form.clone() else {
            return;
        };

        let outcome = match form.kind {
            FormKind::Add => self
                .inventory
                .add(&form.draft, now)
                .map(|(_, snapshot)| Some((snapshot, "✅ Product added successfully!"))),
            FormKind::Edit(id) => form.draft.to_record().and_then(|record| {
                self.inventory
                    .update(id, record, now)
                    .map(|applied| applied.map(|snapshot| (snapshot, "✅ Product updated")))
            }),
        };

        match outcome {
            Ok(applied) => {
                self.form = None;
                self.enter_normal_mode();
                if let Some((snapshot, message)) = applied {
                    self.push_toast(Severity::Info, message);
                    self.show_notices(snapshot.notices);
                }
                self.clamp_selection(now);
            }
            Err(e) => self.push_toast(Severity::Error, format!("⚠️ {}", e)),
        }
    }

    pub fn request_delete(&mut self, now: DateTime<Utc>) {
        if let Some(id) = self.selected_id(now) {
            self.pending_delete = Some(id);
            self.input_mode = InputMode::ConfirmDelete;
        }
    }

    /// Name of the record waiting for delete confirmation
    pub fn pending_delete_name(&self) -> Option<&str> {
        self.pending_delete
            .and_then(|id| self.inventory.get(id))
            .map(|r| r.name.as_str())
    }

    pub fn confirm_delete(&mut self, now: DateTime<Utc>) {
        if let Some(id) = self.pending_delete.take() {
            match self.inventory.delete(id, now) {
                Ok(Some(snapshot)) => self.show_notices(snapshot.notices),
                Ok(None) => {}
                Err(e) => self.push_toast(Severity::Error, format!("Delete failed: {}", e)),
            }
        }
        self.enter_normal_mode();
        self.clamp_selection(now);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.enter_normal_mode();
    }

    pub fn export(&mut self) {
        match self.inventory.export() {
            Ok(report) => {
                let files: Vec<_> = report
                    .files
                    .iter()
                    .filter_map(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .collect();
                self.push_toast(
                    Severity::Info,
                    format!("✅ Exported {} rows to {}", report.rows, files.join(", ")),
                );
            }
            Err(e) => self.push_toast(Severity::Error, format!("❌ {}", e)),
        }
    }

    pub fn seed_demo(&mut self, now: DateTime<Utc>) {
        match self.inventory.seed_demo(now) {
            Ok(snapshot) => {
                self.show_notices(snapshot.notices);
                self.push_toast(Severity::Info, "✅ Demo data generated and loaded!");
                self.table_state.select(Some(0));
            }
            Err(e) => self.push_toast(
                Severity::Error,
                format!("❌ Failed to generate demo data: {}", e),
            ),
        }
    }

    /// Rescan and show every warning, as on startup
    pub fn check_warnings(&mut self, now: DateTime<Utc>) {
        let notices = self.inventory.notices(now);
        self.show_notices(notices);
    }

    pub fn show_notices(&mut self, notices: Vec<Notice>) {
        for notice in notices {
            let text = format!("{} {}", notice.category.emoji(), notice.message);
            self.push_toast(notice.severity, text);
        }
    }

    pub fn push_toast(&mut self, severity: Severity, message: impl Into<String>) {
        self.toasts.push(Toast {
            severity,
            message: message.into(),
            shown_at: Instant::now(),
        });
    }

    /// Drop toasts that have been up long enough
    pub fn expire_toasts(&mut self, at: Instant) {
        let lifetime = self.toast_lifetime;
        self.toasts
            .retain(|t| at.saturating_duration_since(t.shown_at) < lifetime);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stockroom_core::{MemoryStorage, Status, Thresholds};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn app_with(json: &str) -> App {
        let inventory = Inventory::open(
            Box::new(MemoryStorage::with_contents(json)),
            Thresholds::default(),
        );
        App::new(inventory, "₱", Duration::from_secs(5))
    }

    fn sample_app() -> App {
        app_with(
            r#"[
              {"name":"Coke","quantity":0,"buyPrice":6,"sellPrice":9,"expiry":"2026-12-14"},
              {"name":"Pepsi","quantity":30,"buyPrice":7,"sellPrice":10,"expiry":""},
              {"name":"Sprite","quantity":2,"buyPrice":8,"sellPrice":11,"expiry":""}
            ]"#,
        )
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.form_push_char(c);
        }
    }

    #[test]
    fn test_add_through_form() {
        let mut app = app_with("[]");
        app.start_add();
        assert_eq!(app.input_mode, InputMode::Form);

        type_text(&mut app, "Royal");
        app.form_next_field();
        type_text(&mut app, "20");
        app.form_next_field();
        type_text(&mut app, "6");
        app.form_next_field();
        type_text(&mut app, "9");
        app.submit_form(now());

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.inventory.len(), 1);
        assert!(app
            .toasts
            .iter()
            .any(|t| t.message == "✅ Product added successfully!"));
    }

    #[test]
    fn test_invalid_add_keeps_form_open() {
        let mut app = app_with("[]");
        app.start_add();
        type_text(&mut app, "Royal");
        app.submit_form(now());

        assert_eq!(app.input_mode, InputMode::Form);
        assert!(app.inventory.is_empty());
        assert_eq!(app.toasts.last().map(|t| t.severity), Some(Severity::Error));
    }

    #[test]
    fn test_edit_targets_row_in_filtered_view() {
        let mut app = sample_app();
        app.search_input = "spr".to_string();
        app.start_edit(now());

        let form = app.form.as_ref().unwrap();
        assert_eq!(form.draft.name, "Sprite");

        app.form_next_field();
        app.form_pop_char();
        type_text(&mut app, "9");
        app.submit_form(now());

        let names: Vec<_> = app
            .inventory
            .collection()
            .records()
            .map(|r| (r.name.clone(), r.quantity))
            .collect();
        assert_eq!(names[2], ("Sprite".to_string(), 9));
        assert_eq!(names[0], ("Coke".to_string(), 0));
        assert!(app.toasts.iter().any(|t| t.message == "✅ Product updated"));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = sample_app();
        app.next_row(now());
        app.request_delete(now());
        assert_eq!(app.pending_delete_name(), Some("Pepsi"));

        app.cancel_delete();
        assert_eq!(app.inventory.len(), 3);

        app.request_delete(now());
        app.confirm_delete(now());
        assert_eq!(app.inventory.len(), 2);
        assert!(app.inventory.collection().records().all(|r| r.name != "Pepsi"));
    }

    #[test]
    fn test_filter_cycle_and_selection_clamp() {
        let mut app = sample_app();
        app.next_row(now());
        app.next_row(now());
        assert_eq!(app.selected_index(), 2);

        app.status_filter = StatusFilter::Only(Status::OutOfStock);
        app.clamp_selection(now());
        assert_eq!(app.selected_index(), 0);
        assert_eq!(app.visible_ids(now()).len(), 1);

        app.cycle_filter(now());
        assert_eq!(app.status_filter, StatusFilter::Only(Status::NearExpiry));
    }

    #[test]
    fn test_warnings_become_toasts_and_expire() {
        let mut app = sample_app();
        app.check_warnings(now());
        assert_eq!(app.toasts.len(), 2);
        assert!(app.toasts[0].message.contains("Low Stock: Sprite"));

        let later = Instant::now() + Duration::from_secs(6);
        app.expire_toasts(later);
        assert!(app.toasts.is_empty());
    }
}
