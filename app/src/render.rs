//! Plain-text rendering of the session state.
//!
//! Pure functions from state to strings so the terminal loop stays a thin
//! shell and the output is testable.

use inventory_core::Product;

use crate::session::{Mode, Session};

/// Format the product table: id, name, price to two decimals.
pub fn table(products: &[Product]) -> String {
    if products.is_empty() {
        return "(no products)\n".to_string();
    }
    let mut out = format!("{:<36}  {:<24}  {:>10}\n", "ID", "NAME", "PRICE");
    for product in products {
        out.push_str(&format!(
            "{:<36}  {:<24}  {:>10}\n",
            product.id,
            product.name,
            format!("${:.2}", product.price)
        ));
    }
    out
}

/// Format the status area below the table: last error, then the form or the
/// confirmation prompt, depending on the mode.
pub fn prompt(session: &Session) -> String {
    let mut out = String::new();
    if let Some(err) = session.last_error() {
        out.push_str(&format!("error: {err}\n"));
    }
    match session.mode() {
        Mode::Idle => match session.editing() {
            Some(product) => out.push_str(&format!(
                "editing {}: name=\"{}\" price={:.2} (set `name`/`price`, then `submit`)\n",
                product.id, product.name, product.price
            )),
            None => {
                let draft = session.draft();
                out.push_str(&format!(
                    "new product: name=\"{}\" price={:.2} (set `name`/`price`, then `submit`)\n",
                    draft.name, draft.price
                ));
            }
        },
        Mode::Adding => out.push_str("Adding...\n"),
        Mode::Updating => out.push_str("Updating...\n"),
        Mode::ConfirmingDelete(id) => {
            let name = session
                .products()
                .iter()
                .find(|p| &p.id == id)
                .map_or(id.as_str(), |p| p.name.as_str());
            out.push_str(&format!(
                "Are you sure you want to delete \"{name}\"? (`confirm` / `cancel`)\n"
            ));
        }
        Mode::Deleting(_) => out.push_str("Deleting...\n"),
    }
    out
}
