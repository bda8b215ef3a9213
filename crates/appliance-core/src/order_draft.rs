//! # Order Drafts
//!
//! In-progress orders: the two-step creation wizard and the edit draft of
//! an existing order.
//!
//! ## Creation Wizard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Creation Wizard                              │
//! │                                                                         │
//! │  Step 1: SelectClient (employee flow only)                             │
//! │  ──────────────────────────────────────────                            │
//! │  select_client(id) ──► next() ──► Step 2                               │
//! │                                                                         │
//! │  Step 2: AddItems                                                      │
//! │  ────────────────                                                      │
//! │  picker: query ──► matching appliances ──► select ──► quantity         │
//! │  add_selected()                                                        │
//! │     ├── appliance already drafted: quantity += n, subtotal recomputed  │
//! │     └── new appliance: push line                                       │
//! │  set_quantity() / remove_line()                                        │
//! │                                                                         │
//! │  submit: to_request() ──► OrderRequest { clientId, orderRows[amount] } │
//! │  close:  reset()      ──► back to the initial step, no lines           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Amounts
//! Every line keeps `subtotal = quantity × unit price` in integer cents,
//! which is already rounded to two decimals. The rows sent to the backend
//! carry that subtotal as `amount`.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Appliance, Order, OrderRequest, OrderRowRequest};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Draft Lines
// =============================================================================

/// A line of an order being composed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    pub appliance_id: i64,
    pub name: String,
    pub model: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub subtotal: Money,
}

impl DraftLine {
    fn from_appliance(appliance: &Appliance, quantity: i64) -> Self {
        DraftLine {
            appliance_id: appliance.id,
            name: appliance.name.clone(),
            model: appliance.model.clone(),
            unit_price: appliance.price,
            quantity,
            subtotal: appliance.price.multiply_quantity(quantity),
        }
    }

    fn recompute(&mut self) {
        self.subtotal = self.unit_price.multiply_quantity(self.quantity);
    }
}

/// Ordered, duplicate-free set of draft lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftLines {
    lines: Vec<DraftLine>,
}

impl DraftLines {
    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Adds an appliance, merging with an existing line by summing quantity.
    pub fn add(&mut self, appliance: &Appliance, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            return Err(CoreError::InvalidQuantity(quantity));
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.appliance_id == appliance.id)
        {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            line.unit_price = appliance.price;
            line.recompute();
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        self.lines.push(DraftLine::from_appliance(appliance, quantity));
        Ok(())
    }

    /// Changes a line's quantity and recomputes its subtotal.
    ///
    /// Quantities below 1 are ignored; lines are removed explicitly with
    /// [`DraftLines::remove`].
    pub fn set_quantity(&mut self, appliance_id: i64, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            return Ok(());
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.appliance_id == appliance_id)
            .ok_or(CoreError::LineNotFound(appliance_id))?;
        line.quantity = quantity;
        line.recompute();
        Ok(())
    }

    pub fn remove(&mut self, appliance_id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.appliance_id != appliance_id);
        self.lines.len() != before
    }

    /// Σ subtotal.
    pub fn total(&self) -> Money {
        self.lines.iter().map(|l| l.subtotal).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn to_rows(&self) -> Vec<OrderRowRequest> {
        self.lines
            .iter()
            .map(|l| OrderRowRequest {
                appliance_id: l.appliance_id,
                quantity: l.quantity,
                amount: Some(l.subtotal),
            })
            .collect()
    }
}

// =============================================================================
// Line Picker
// =============================================================================

/// Search-and-select state used to add one line at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePicker {
    pub query: String,
    pub selected: Option<Appliance>,
    pub quantity: i64,
}

impl Default for LinePicker {
    fn default() -> Self {
        LinePicker {
            query: String::new(),
            selected: None,
            quantity: 1,
        }
    }
}

impl LinePicker {
    /// Appliances whose name or model contains the query, ignoring case.
    /// An empty query matches everything.
    pub fn matching<'a>(&self, appliances: &'a [Appliance]) -> Vec<&'a Appliance> {
        matching_appliances(appliances, &self.query)
    }
}

/// Case-insensitive name-or-model search.
pub fn matching_appliances<'a>(appliances: &'a [Appliance], query: &str) -> Vec<&'a Appliance> {
    let needle = query.trim().to_lowercase();
    appliances
        .iter()
        .filter(|a| {
            needle.is_empty()
                || a.name.to_lowercase().contains(&needle)
                || a.model.to_lowercase().contains(&needle)
        })
        .collect()
}

// =============================================================================
// Creation Wizard
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    SelectClient,
    AddItems,
}

/// The order creation wizard.
///
/// Employees start at [`WizardStep::SelectClient`]; clients order for
/// themselves and start at [`WizardStep::AddItems`] with their id fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderWizard {
    step: WizardStep,
    client_id: Option<i64>,
    client_fixed: bool,
    lines: DraftLines,
    pub picker: LinePicker,
}

impl OrderWizard {
    /// Wizard for an employee ordering on behalf of a client.
    pub fn for_employee() -> Self {
        OrderWizard {
            step: WizardStep::SelectClient,
            client_id: None,
            client_fixed: false,
            lines: DraftLines::default(),
            picker: LinePicker::default(),
        }
    }

    /// Wizard for a client ordering for themselves.
    pub fn for_client(client_id: i64) -> Self {
        OrderWizard {
            step: WizardStep::AddItems,
            client_id: Some(client_id),
            client_fixed: true,
            lines: DraftLines::default(),
            picker: LinePicker::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn client_id(&self) -> Option<i64> {
        self.client_id
    }

    pub fn lines(&self) -> &[DraftLine] {
        self.lines.lines()
    }

    pub fn select_client(&mut self, client_id: i64) {
        if !self.client_fixed {
            self.client_id = Some(client_id);
        }
    }

    /// Whether the primary button is enabled on the current step.
    pub fn can_proceed(&self) -> bool {
        match self.step {
            WizardStep::SelectClient => self.client_id.is_some(),
            WizardStep::AddItems => !self.lines.is_empty(),
        }
    }

    /// Moves from client selection to item entry.
    pub fn next(&mut self) -> CoreResult<()> {
        if self.step == WizardStep::SelectClient {
            if self.client_id.is_none() {
                return Err(CoreError::ClientNotSelected);
            }
            self.step = WizardStep::AddItems;
        }
        Ok(())
    }

    /// Returns to client selection. Clients have no earlier step.
    pub fn back(&mut self) {
        if !self.client_fixed {
            self.step = WizardStep::SelectClient;
        }
    }

    /// Adds an appliance directly (merging duplicates).
    pub fn add_line(&mut self, appliance: &Appliance, quantity: i64) -> CoreResult<()> {
        self.lines.add(appliance, quantity)
    }

    /// Adds the picker's selection and clears the picker.
    ///
    /// Does nothing when no appliance is selected.
    pub fn add_selected(&mut self) -> CoreResult<()> {
        let Some(appliance) = self.picker.selected.take() else {
            return Ok(());
        };
        let quantity = self.picker.quantity;
        let result = self.lines.add(&appliance, quantity);
        if result.is_err() {
            self.picker.selected = Some(appliance);
            return result;
        }
        self.picker = LinePicker::default();
        Ok(())
    }

    pub fn set_quantity(&mut self, appliance_id: i64, quantity: i64) -> CoreResult<()> {
        self.lines.set_quantity(appliance_id, quantity)
    }

    pub fn remove_line(&mut self, appliance_id: i64) -> bool {
        self.lines.remove(appliance_id)
    }

    pub fn total(&self) -> Money {
        self.lines.total()
    }

    /// Packages the lines into one order-creation request.
    pub fn to_request(&self) -> CoreResult<OrderRequest> {
        let client_id = self.client_id.ok_or(CoreError::ClientNotSelected)?;
        if self.lines.is_empty() {
            return Err(CoreError::EmptyOrder);
        }
        Ok(OrderRequest {
            client_id,
            order_rows: self.lines.to_rows(),
        })
    }

    /// Returns to the initial state, as when the dialog closes.
    pub fn reset(&mut self) {
        *self = if self.client_fixed {
            // client_fixed implies client_id was set at construction
            OrderWizard::for_client(self.client_id.unwrap_or_default())
        } else {
            OrderWizard::for_employee()
        };
    }
}

// =============================================================================
// Edit Draft
// =============================================================================

/// Editable copy of an existing, unapproved order.
#[derive(Debug, Clone, PartialEq)]
pub struct EditDraft {
    order_id: i64,
    client_id: i64,
    lines: DraftLines,
    pub picker: LinePicker,
}

impl EditDraft {
    /// Loads an order's rows. Row amounts become the initial subtotals.
    ///
    /// ## Errors
    /// - `OrderApproved` for approved orders
    /// - `ClientNotSelected` when the order carries no client reference
    pub fn from_order(order: &Order) -> CoreResult<Self> {
        if order.approved {
            return Err(CoreError::OrderApproved { order_id: order.id });
        }
        let client_id = order.client_id().ok_or(CoreError::ClientNotSelected)?;

        let mut lines = DraftLines::default();
        for row in &order.order_rows {
            let Some(appliance_id) = row.appliance_id() else {
                continue;
            };
            let quantity = row.quantity.max(1);
            let (name, model, unit_price) = match &row.appliance {
                Some(a) => (a.name.clone(), a.model.clone(), a.price),
                None => (
                    String::new(),
                    String::new(),
                    Money::from_cents(row.amount.cents() / quantity),
                ),
            };
            lines.lines.push(DraftLine {
                appliance_id,
                name,
                model,
                unit_price,
                quantity,
                subtotal: row.amount,
            });
        }

        Ok(EditDraft {
            order_id: order.id,
            client_id,
            lines,
            picker: LinePicker::default(),
        })
    }

    pub fn order_id(&self) -> i64 {
        self.order_id
    }

    pub fn lines(&self) -> &[DraftLine] {
        self.lines.lines()
    }

    pub fn add_line(&mut self, appliance: &Appliance, quantity: i64) -> CoreResult<()> {
        self.lines.add(appliance, quantity)
    }

    /// Adds the picker's selection and clears the picker.
    pub fn add_selected(&mut self) -> CoreResult<()> {
        let Some(appliance) = self.picker.selected.take() else {
            return Ok(());
        };
        let quantity = self.picker.quantity;
        let result = self.lines.add(&appliance, quantity);
        if result.is_err() {
            self.picker.selected = Some(appliance);
            return result;
        }
        self.picker = LinePicker::default();
        Ok(())
    }

    pub fn set_quantity(&mut self, appliance_id: i64, quantity: i64) -> CoreResult<()> {
        self.lines.set_quantity(appliance_id, quantity)
    }

    pub fn remove_line(&mut self, appliance_id: i64) -> bool {
        self.lines.remove(appliance_id)
    }

    pub fn total(&self) -> Money {
        self.lines.total()
    }

    /// Request body for `PUT /orders/{id}`.
    pub fn to_request(&self) -> CoreResult<OrderRequest> {
        if self.lines.is_empty() {
            return Err(CoreError::EmptyOrder);
        }
        Ok(OrderRequest {
            client_id: self.client_id,
            order_rows: self.lines.to_rows(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::tests::appliance;
    use crate::types::OrderRow;

    #[test]
    fn test_wizard_requires_client_before_items() {
        let mut wizard = OrderWizard::for_employee();
        assert_eq!(wizard.step(), WizardStep::SelectClient);
        assert!(!wizard.can_proceed());
        assert!(matches!(wizard.next(), Err(CoreError::ClientNotSelected)));

        wizard.select_client(5);
        wizard.next().unwrap();
        assert_eq!(wizard.step(), WizardStep::AddItems);
        assert!(!wizard.can_proceed());
    }

    #[test]
    fn test_wizard_merges_duplicate_appliances() {
        let mut wizard = OrderWizard::for_employee();
        wizard.select_client(5);
        wizard.next().unwrap();

        wizard.add_line(&appliance(1, 10_000), 2).unwrap();
        wizard.add_line(&appliance(1, 10_000), 1).unwrap();
        wizard.add_line(&appliance(2, 2_550), 2).unwrap();

        assert_eq!(wizard.lines().len(), 2);
        assert_eq!(wizard.lines()[0].quantity, 3);
        assert_eq!(wizard.lines()[0].subtotal.cents(), 30_000);
        assert_eq!(wizard.total().cents(), 35_100);

        let request = wizard.to_request().unwrap();
        assert_eq!(request.client_id, 5);
        assert_eq!(request.order_rows[0].amount, Some(Money::from_cents(30_000)));
    }

    #[test]
    fn test_picker_adds_selection_and_resets() {
        let catalog = vec![appliance(1, 100), appliance(2, 200)];
        let mut wizard = OrderWizard::for_client(9);
        assert_eq!(wizard.step(), WizardStep::AddItems);

        wizard.picker.query = "m-2".into();
        let hits = wizard.picker.matching(&catalog);
        assert_eq!(hits.len(), 1);
        wizard.picker.selected = Some(hits[0].clone());
        wizard.picker.quantity = 4;
        wizard.add_selected().unwrap();

        assert_eq!(wizard.lines()[0].quantity, 4);
        assert_eq!(wizard.picker, LinePicker::default());
    }

    #[test]
    fn test_quantity_change_recomputes_and_ignores_zero() {
        let mut wizard = OrderWizard::for_client(9);
        wizard.add_line(&appliance(1, 1_999), 1).unwrap();

        wizard.set_quantity(1, 3).unwrap();
        assert_eq!(wizard.lines()[0].subtotal.cents(), 5_997);

        wizard.set_quantity(1, 0).unwrap();
        assert_eq!(wizard.lines()[0].quantity, 3);

        assert!(wizard.remove_line(1));
        assert!(matches!(wizard.to_request(), Err(CoreError::EmptyOrder)));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut wizard = OrderWizard::for_employee();
        wizard.select_client(1);
        wizard.next().unwrap();
        wizard.add_line(&appliance(1, 100), 1).unwrap();

        wizard.reset();
        assert_eq!(wizard, OrderWizard::for_employee());

        let mut own = OrderWizard::for_client(3);
        own.add_line(&appliance(1, 100), 1).unwrap();
        own.reset();
        assert_eq!(own.client_id(), Some(3));
        assert!(own.lines().is_empty());
    }

    fn order(approved: bool) -> Order {
        Order {
            id: 11,
            client: None,
            client_id: Some(4),
            employee: None,
            employee_id: None,
            approved,
            order_rows: vec![OrderRow {
                id: 1,
                appliance: Some(appliance(1, 3_333)),
                appliance_id: None,
                quantity: 3,
                amount: Money::from_cents(9_999),
            }],
            total_amount: None,
        }
    }

    #[test]
    fn test_edit_draft_loads_rows_and_recomputes() {
        let mut draft = EditDraft::from_order(&order(false)).unwrap();
        assert_eq!(draft.lines()[0].subtotal.cents(), 9_999);

        draft.set_quantity(1, 2).unwrap();
        assert_eq!(draft.lines()[0].subtotal.cents(), 6_666);

        draft.add_line(&appliance(1, 3_333), 1).unwrap();
        assert_eq!(draft.lines()[0].quantity, 3);

        let request = draft.to_request().unwrap();
        assert_eq!(request.client_id, 4);
        assert_eq!(request.order_rows[0].amount, Some(Money::from_cents(9_999)));
    }

    #[test]
    fn test_edit_draft_rejects_approved_order() {
        assert!(matches!(
            EditDraft::from_order(&order(true)),
            Err(CoreError::OrderApproved { order_id: 11 })
        ));
    }
}
