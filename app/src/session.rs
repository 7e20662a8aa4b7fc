//! UI state machine for the inventory session.
//!
//! # Design
//! The UI's busy flags collapse into a single [`Mode`] value so impossible
//! combinations (updating while deleting, two armed confirmations) cannot be
//! represented. The session never performs I/O: transitions emit [`Pending`]
//! requests that the host executes, feeding each response back through
//! [`Session::apply`]. Completing a mutation emits the follow-up list
//! reload, so the displayed list is always the server's last full answer and
//! never a locally patched one.

use inventory_core::{
    ApiError, HttpRequest, HttpResponse, NewProduct, Product, ProductClient, ProductPatch,
};
use tracing::debug;

/// UI mode: one tagged value instead of independent busy flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Adding,
    Updating,
    ConfirmingDelete(String),
    Deleting(String),
}

/// Which collection operation a pending request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Load,
    Create,
    Update,
    Delete,
}

/// A built-but-unexecuted request. The host runs it and hands the response
/// back to [`Session::apply`] together with the `op` tag.
#[derive(Debug, Clone)]
pub struct Pending {
    pub op: Op,
    pub request: HttpRequest,
}

/// The add form's draft: a name and a price, nothing else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub name: String,
    pub price: f64,
}

/// Controller state for one terminal session.
///
/// The form is shared between add and edit: while an edit buffer is loaded,
/// `input_*` calls mutate it instead of the draft, and `submit` saves it.
#[derive(Debug)]
pub struct Session {
    client: ProductClient,
    products: Vec<Product>,
    draft: Draft,
    editing: Option<Product>,
    mode: Mode,
    last_error: Option<String>,
}

impl Session {
    pub fn new(client: ProductClient) -> Self {
        Self {
            client,
            products: Vec::new(),
            draft: Draft::default(),
            editing: None,
            mode: Mode::Idle,
            last_error: None,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn editing(&self) -> Option<&Product> {
        self.editing.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Emit a full list reload. Invoked on startup (the on-mount fetch) and
    /// by the explicit refresh command.
    pub fn refresh(&mut self) -> Pending {
        self.last_error = None;
        self.reload()
    }

    /// Route a name keystroke to the edit buffer if one is loaded, otherwise
    /// to the add draft.
    pub fn input_name(&mut self, name: &str) {
        match &mut self.editing {
            Some(product) => product.name = name.to_string(),
            None => self.draft.name = name.to_string(),
        }
    }

    /// Route a price keystroke to the edit buffer if one is loaded, otherwise
    /// to the add draft.
    pub fn input_price(&mut self, price: f64) {
        match &mut self.editing {
            Some(product) => product.price = price,
            None => self.draft.price = price,
        }
    }

    /// Submit the form.
    ///
    /// With an edit buffer loaded this emits an update carrying only the
    /// buffer's `name` and `price`, with no validation. Otherwise it emits a
    /// create for the draft, but only when the trimmed name is non-empty and
    /// the price is positive; an invalid draft emits nothing. The draft is
    /// sent as typed, untrimmed.
    pub fn submit(&mut self) -> Result<Option<Pending>, ApiError> {
        if self.mode != Mode::Idle {
            return Ok(None);
        }
        self.last_error = None;

        if let Some(editing) = &self.editing {
            let patch = ProductPatch {
                name: Some(editing.name.clone()),
                price: Some(editing.price),
                ..ProductPatch::default()
            };
            let request = self.client.build_update_product(&editing.id, &patch)?;
            debug!(id = %editing.id, "submitting update");
            self.mode = Mode::Updating;
            return Ok(Some(Pending { op: Op::Update, request }));
        }

        if self.draft.name.trim().is_empty() || self.draft.price <= 0.0 {
            return Ok(None);
        }
        let input = NewProduct {
            name: self.draft.name.clone(),
            description: None,
            price: self.draft.price,
            stock: None,
        };
        let request = self.client.build_create_product(&input)?;
        debug!(name = %input.name, "submitting create");
        self.mode = Mode::Adding;
        Ok(Some(Pending { op: Op::Create, request }))
    }

    /// Load the listed product into the edit buffer, switching the form into
    /// edit mode. Returns false when the id is not in the displayed list.
    pub fn edit(&mut self, id: &str) -> bool {
        if self.mode != Mode::Idle {
            return false;
        }
        match self.products.iter().find(|p| p.id == id) {
            Some(product) => {
                debug!(id = %product.id, "editing product");
                self.editing = Some(product.clone());
                true
            }
            None => false,
        }
    }

    /// Arm the delete confirmation for a listed product. Returns false when
    /// the id is not in the displayed list or the session is not idle.
    pub fn request_delete(&mut self, id: &str) -> bool {
        if self.mode != Mode::Idle {
            return false;
        }
        if self.products.iter().any(|p| p.id == id) {
            debug!(id, "armed delete confirmation");
            self.mode = Mode::ConfirmingDelete(id.to_string());
            true
        } else {
            false
        }
    }

    /// Emit the delete for the armed id. Emits nothing unless a confirmation
    /// is armed, so a confirmed delete issues exactly one request.
    pub fn confirm_delete(&mut self) -> Option<Pending> {
        let Mode::ConfirmingDelete(id) = &self.mode else {
            return None;
        };
        let id = id.clone();
        self.last_error = None;
        let request = self.client.build_delete_product(&id);
        debug!(id = %id, "delete confirmed");
        self.mode = Mode::Deleting(id);
        Some(Pending { op: Op::Delete, request })
    }

    /// Dismiss the delete confirmation with no side effects.
    pub fn cancel_delete(&mut self) {
        if matches!(self.mode, Mode::ConfirmingDelete(_)) {
            self.mode = Mode::Idle;
        }
    }

    /// Consume the response for an executed request.
    ///
    /// Completing a create clears the draft; completing an update clears the
    /// edit buffer; any completed mutation returns to idle and emits the
    /// unconditional list reload. On failure the session returns to idle and
    /// records the error for the renderer, keeping form contents so the user
    /// can retry.
    pub fn apply(&mut self, op: Op, response: HttpResponse) -> Result<Option<Pending>, ApiError> {
        let result = self.dispatch(op, response);
        if let Err(err) = &result {
            self.mode = Mode::Idle;
            self.last_error = Some(err.to_string());
        }
        result
    }

    /// Host-reported transport failure: the request never produced a
    /// response. Resets busy state so the UI is not left stuck.
    pub fn interrupt(&mut self, message: impl Into<String>) {
        self.mode = Mode::Idle;
        self.last_error = Some(message.into());
    }

    fn dispatch(&mut self, op: Op, response: HttpResponse) -> Result<Option<Pending>, ApiError> {
        match op {
            Op::Load => {
                self.products = self.client.parse_list_products(response)?;
                Ok(None)
            }
            Op::Create => {
                self.client.parse_create_product(response)?;
                self.draft = Draft::default();
                self.mode = Mode::Idle;
                Ok(Some(self.reload()))
            }
            Op::Update => {
                self.client.parse_update_product(response)?;
                self.editing = None;
                self.mode = Mode::Idle;
                Ok(Some(self.reload()))
            }
            Op::Delete => {
                self.client.parse_delete_product(response)?;
                self.mode = Mode::Idle;
                Ok(Some(self.reload()))
            }
        }
    }

    fn reload(&self) -> Pending {
        Pending {
            op: Op::Load,
            request: self.client.build_list_products(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_core::HttpMethod;
    use serde_json::json;

    fn session() -> Session {
        Session::new(ProductClient::new("http://localhost:3000"))
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    /// Seed the displayed list through a load, the only way it ever fills.
    fn seeded(body: &str) -> Session {
        let mut s = session();
        s.apply(Op::Load, response(200, body)).unwrap();
        s
    }

    fn body_json(pending: &Pending) -> serde_json::Value {
        serde_json::from_str(pending.request.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn refresh_emits_list_request() {
        let mut s = session();
        let pending = s.refresh();
        assert_eq!(pending.op, Op::Load);
        assert_eq!(pending.request.method, HttpMethod::Get);
        assert_eq!(pending.request.path, "http://localhost:3000/products");
    }

    #[test]
    fn load_replaces_list_wholesale() {
        let mut s = seeded(r#"[{"id":"1","name":"Pen","price":2.0}]"#);
        assert_eq!(s.products().len(), 1);

        s.apply(Op::Load, response(200, r#"[{"id":"9","name":"Ruler","price":1.5}]"#)).unwrap();
        assert_eq!(s.products().len(), 1);
        assert_eq!(s.products()[0].id, "9");
    }

    #[test]
    fn blank_name_never_creates() {
        let mut s = session();
        s.input_name("   ");
        s.input_price(5.0);
        assert!(s.submit().unwrap().is_none());
        assert_eq!(*s.mode(), Mode::Idle);
    }

    #[test]
    fn nonpositive_price_never_creates() {
        let mut s = session();
        s.input_name("Pen");
        s.input_price(0.0);
        assert!(s.submit().unwrap().is_none());

        s.input_price(-3.0);
        assert!(s.submit().unwrap().is_none());
    }

    #[test]
    fn valid_add_emits_create_then_reload() {
        let mut s = session();
        s.input_name("Book");
        s.input_price(10.0);

        let pending = s.submit().unwrap().expect("create emitted");
        assert_eq!(pending.op, Op::Create);
        assert_eq!(pending.request.method, HttpMethod::Post);
        assert_eq!(body_json(&pending), json!({"name":"Book","price":10.0}));
        assert_eq!(*s.mode(), Mode::Adding);

        let follow_up = s
            .apply(Op::Create, response(201, r#"{"id":"2","name":"Book","price":10.0}"#))
            .unwrap()
            .expect("reload emitted");
        assert_eq!(follow_up.op, Op::Load);
        assert_eq!(*s.mode(), Mode::Idle);
        assert_eq!(*s.draft(), Draft::default());
    }

    #[test]
    fn draft_name_is_sent_as_typed() {
        // Trimming gates submission only; the body carries the raw field.
        let mut s = session();
        s.input_name(" Book ");
        s.input_price(10.0);
        let pending = s.submit().unwrap().unwrap();
        assert_eq!(body_json(&pending), json!({"name":" Book ","price":10.0}));
    }

    #[test]
    fn input_routes_to_edit_buffer_when_editing() {
        let mut s = seeded(r#"[{"id":"1","name":"Pen","price":2.0}]"#);
        s.input_name("draft name");
        assert!(s.edit("1"));
        s.input_name("Gel pen");
        s.input_price(3.5);

        assert_eq!(s.editing().unwrap().name, "Gel pen");
        assert_eq!(s.editing().unwrap().price, 3.5);
        // the add draft is untouched while editing
        assert_eq!(s.draft().name, "draft name");
    }

    #[test]
    fn edit_submits_only_name_and_price() {
        let mut s = seeded(r#"[{"id":"1","name":"Pen","description":"Ballpoint","price":2.0,"stock":40}]"#);
        assert!(s.edit("1"));
        s.input_price(5.0);

        let pending = s.submit().unwrap().expect("update emitted");
        assert_eq!(pending.op, Op::Update);
        assert_eq!(pending.request.method, HttpMethod::Put);
        assert_eq!(pending.request.path, "http://localhost:3000/products/1");
        assert_eq!(body_json(&pending), json!({"name":"Pen","price":5.0}));
        assert_eq!(*s.mode(), Mode::Updating);

        let follow_up = s
            .apply(Op::Update, response(200, r#"{"id":"1","name":"Pen","price":5.0}"#))
            .unwrap()
            .expect("reload emitted");
        assert_eq!(follow_up.op, Op::Load);
        assert!(s.editing().is_none());
        assert_eq!(*s.mode(), Mode::Idle);
    }

    #[test]
    fn update_applies_no_validation() {
        let mut s = seeded(r#"[{"id":"1","name":"Pen","price":2.0}]"#);
        assert!(s.edit("1"));
        s.input_name("");
        s.input_price(0.0);

        let pending = s.submit().unwrap().expect("update emitted despite empty fields");
        assert_eq!(body_json(&pending), json!({"name":"","price":0.0}));
    }

    #[test]
    fn edit_unknown_id_is_rejected() {
        let mut s = seeded(r#"[{"id":"1","name":"Pen","price":2.0}]"#);
        assert!(!s.edit("2"));
        assert!(s.editing().is_none());
    }

    #[test]
    fn cancel_clears_prompt_without_requests() {
        let mut s = seeded(r#"[{"id":"1","name":"Pen","price":2.0}]"#);
        assert!(s.request_delete("1"));
        assert_eq!(*s.mode(), Mode::ConfirmingDelete("1".to_string()));

        s.cancel_delete();
        assert_eq!(*s.mode(), Mode::Idle);
        assert!(s.confirm_delete().is_none());
    }

    #[test]
    fn confirm_emits_exactly_one_delete() {
        let mut s = seeded(r#"[{"id":"1","name":"Pen","price":2.0}]"#);
        assert!(s.request_delete("1"));

        let pending = s.confirm_delete().expect("delete emitted");
        assert_eq!(pending.op, Op::Delete);
        assert_eq!(pending.request.method, HttpMethod::Delete);
        assert_eq!(pending.request.path, "http://localhost:3000/products/1");
        assert_eq!(*s.mode(), Mode::Deleting("1".to_string()));

        // confirming again while the delete is in flight emits nothing
        assert!(s.confirm_delete().is_none());
    }

    #[test]
    fn delete_completion_reloads() {
        let mut s = seeded(r#"[{"id":"1","name":"Pen","price":2.0}]"#);
        s.request_delete("1");
        s.confirm_delete().unwrap();

        let follow_up = s.apply(Op::Delete, response(204, "")).unwrap().expect("reload emitted");
        assert_eq!(follow_up.op, Op::Load);
        assert_eq!(*s.mode(), Mode::Idle);
    }

    #[test]
    fn request_delete_unknown_id_is_rejected() {
        let mut s = seeded(r#"[{"id":"1","name":"Pen","price":2.0}]"#);
        assert!(!s.request_delete("2"));
        assert_eq!(*s.mode(), Mode::Idle);
    }

    #[test]
    fn failure_resets_mode_and_records_error() {
        let mut s = session();
        s.input_name("Book");
        s.input_price(10.0);
        s.submit().unwrap().unwrap();
        assert_eq!(*s.mode(), Mode::Adding);

        let err = s.apply(Op::Create, response(500, "boom")).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
        assert_eq!(*s.mode(), Mode::Idle);
        assert!(s.last_error().is_some());
        // the draft survives so the user can retry
        assert_eq!(s.draft().name, "Book");
    }

    #[test]
    fn interrupt_resets_mode_and_records_error() {
        let mut s = session();
        s.input_name("Book");
        s.input_price(10.0);
        s.submit().unwrap().unwrap();

        s.interrupt("connection refused");
        assert_eq!(*s.mode(), Mode::Idle);
        assert_eq!(s.last_error(), Some("connection refused"));
    }

    #[test]
    fn refresh_clears_previous_error() {
        let mut s = session();
        s.interrupt("connection refused");
        s.refresh();
        assert!(s.last_error().is_none());
    }
}
