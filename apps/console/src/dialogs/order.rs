//! # Order Dialogs
//!
//! Create and edit dialogs over [`OrderWizard`] and [`EditDraft`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CREATE (employee)                     CREATE (client)                  │
//! │  select client ──► next ──► add items  add items (own id fixed)         │
//! │                                                                         │
//! │  EDIT (unapproved only)                                                 │
//! │  order rows ──► draft lines ──► add / re-quantity / remove              │
//! │                                                                         │
//! │  submit: to_request ──► validate_order ──► POST or PUT ──► toast        │
//! │          (closing a dialog resets it)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use appliance_client::ClientResult;
use appliance_core::access::OrderPermissions;
use appliance_core::order_draft::{EditDraft, OrderWizard};
use appliance_core::validation::validate_order;
use appliance_core::{
    Appliance, Client, CoreResult, Order, OrderRequest, PageRequest, UserRole, LOOKUP_PAGE_SIZE,
};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::pages::{check_form, Context, FieldMap};

/// Appliance choices for the line picker.
async fn load_appliances(ctx: &Context) -> AppResult<Vec<Appliance>> {
    let lookup = PageRequest::new(0, LOOKUP_PAGE_SIZE);
    ctx.api
        .list_appliances(&lookup)
        .await
        .map(|page| page.content)
        .map_err(|e| ctx.report(e))
}

/// Picks the appliance with `appliance_id` into a picker slot.
fn pick(appliances: &[Appliance], appliance_id: i64) -> Option<Appliance> {
    appliances.iter().find(|a| a.id == appliance_id).cloned()
}

/// Packages a draft into a request and runs the order schema over it.
fn prepare(
    ctx: &Context,
    request: CoreResult<OrderRequest>,
    errors: &mut FieldMap,
) -> AppResult<OrderRequest> {
    let request = request.map_err(|e| ctx.report(e))?;
    check_form(validate_order(&request), errors)?;
    Ok(request)
}

fn finish(
    ctx: &Context,
    result: ClientResult<Order>,
    errors: &mut FieldMap,
    success: &str,
) -> AppResult<Order> {
    match result {
        Ok(order) => {
            ctx.notify.success(success);
            Ok(order)
        }
        Err(e) => {
            let err = AppError::from(e);
            errors.clone_from(&err.field_errors);
            Err(ctx.report(err))
        }
    }
}

// =============================================================================
// Create
// =============================================================================

#[derive(Debug)]
pub struct CreateOrderDialog {
    ctx: Context,
    pub wizard: OrderWizard,
    /// Empty for clients, who order for themselves.
    pub clients: Vec<Client>,
    pub appliances: Vec<Appliance>,
    pub errors: FieldMap,
}

impl CreateOrderDialog {
    /// Opens the wizard for the signed-in role and loads its choices.
    pub async fn open(ctx: Context) -> AppResult<Self> {
        let session = ctx.session()?;
        let (wizard, clients) = match session.role {
            UserRole::Employee => {
                let lookup = PageRequest::new(0, LOOKUP_PAGE_SIZE);
                let clients = ctx
                    .api
                    .list_clients(&lookup)
                    .await
                    .map_err(|e| ctx.report(e))?;
                (OrderWizard::for_employee(), clients.content)
            }
            UserRole::Client => (OrderWizard::for_client(session.user_id), Vec::new()),
        };
        let appliances = load_appliances(&ctx).await?;

        Ok(CreateOrderDialog {
            ctx,
            wizard,
            clients,
            appliances,
            errors: FieldMap::new(),
        })
    }

    /// Appliances matching the picker query.
    pub fn matching(&self) -> Vec<&Appliance> {
        self.wizard.picker.matching(&self.appliances)
    }

    /// Selects an appliance in the picker. Returns false for unknown ids.
    pub fn select(&mut self, appliance_id: i64) -> bool {
        self.wizard.picker.selected = pick(&self.appliances, appliance_id);
        self.wizard.picker.selected.is_some()
    }

    /// Adds the picked appliance as a line.
    pub fn add_selected(&mut self) -> AppResult<()> {
        self.wizard.add_selected().map_err(|e| self.ctx.report(e))
    }

    pub async fn submit(&mut self) -> AppResult<Order> {
        let request = prepare(&self.ctx, self.wizard.to_request(), &mut self.errors)?;
        let result = self.ctx.api.create_order(&request).await;
        let order = finish(
            &self.ctx,
            result,
            &mut self.errors,
            "Order created successfully",
        )?;
        info!(order_id = order.id, client_id = request.client_id, "Order created");
        self.wizard.reset();
        Ok(order)
    }

    pub fn close(&mut self) {
        self.wizard.reset();
        self.errors.clear();
    }
}

// =============================================================================
// Edit
// =============================================================================

#[derive(Debug)]
pub struct EditOrderDialog {
    ctx: Context,
    pub draft: EditDraft,
    pub appliances: Vec<Appliance>,
    pub errors: FieldMap,
}

impl EditOrderDialog {
    /// Opens an editable copy of `order`. Approved orders and other
    /// clients' orders are refused.
    pub async fn open(ctx: Context, order: &Order) -> AppResult<Self> {
        let session = ctx.session()?;
        let permissions = OrderPermissions::for_order(order, session.role, session.user_id);
        ctx.ensure(permissions.can_edit, "edit this order")?;

        let draft = EditDraft::from_order(order).map_err(|e| ctx.report(e))?;
        let appliances = load_appliances(&ctx).await?;

        Ok(EditOrderDialog {
            ctx,
            draft,
            appliances,
            errors: FieldMap::new(),
        })
    }

    pub fn matching(&self) -> Vec<&Appliance> {
        self.draft.picker.matching(&self.appliances)
    }

    pub fn select(&mut self, appliance_id: i64) -> bool {
        self.draft.picker.selected = pick(&self.appliances, appliance_id);
        self.draft.picker.selected.is_some()
    }

    pub fn add_selected(&mut self) -> AppResult<()> {
        self.draft.add_selected().map_err(|e| self.ctx.report(e))
    }

    pub async fn submit(&mut self) -> AppResult<Order> {
        let request = prepare(&self.ctx, self.draft.to_request(), &mut self.errors)?;
        let order_id = self.draft.order_id();
        let result = self.ctx.api.update_order(order_id, &request).await;
        let order = finish(
            &self.ctx,
            result,
            &mut self.errors,
            "Order updated successfully",
        )?;
        info!(order_id, "Order updated");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::pages::testing::context;
    use crate::state::{appliance, login_response, token_expiring_in};
    use appliance_core::order_draft::WizardStep;
    use appliance_core::{Money, OrderRow};

    fn signed_in(role: &str) -> Context {
        let ctx = context("http://127.0.0.1:9/api");
        ctx.auth
            .set_credentials(&login_response(token_expiring_in(3600), role))
            .unwrap();
        ctx
    }

    fn order(client_id: i64, approved: bool) -> Order {
        Order {
            id: 11,
            client: None,
            client_id: Some(client_id),
            employee: None,
            employee_id: None,
            approved,
            order_rows: vec![OrderRow {
                id: 1,
                appliance: Some(appliance(3, 2_500)),
                appliance_id: None,
                quantity: 2,
                amount: Money::from_cents(5_000),
            }],
            total_amount: None,
        }
    }

    #[test]
    fn test_client_wizard_merges_duplicate_picks() {
        let ctx = signed_in("CLIENT");
        let mut dialog = CreateOrderDialog {
            ctx,
            wizard: OrderWizard::for_client(7),
            clients: Vec::new(),
            appliances: vec![appliance(1, 10_000), appliance(2, 5_000)],
            errors: FieldMap::new(),
        };
        assert_eq!(dialog.wizard.step(), WizardStep::AddItems);

        assert!(dialog.select(1));
        dialog.add_selected().unwrap();
        assert!(dialog.select(1));
        dialog.wizard.picker.quantity = 2;
        dialog.add_selected().unwrap();

        assert_eq!(dialog.wizard.lines().len(), 1);
        assert_eq!(dialog.wizard.lines()[0].quantity, 3);
        assert_eq!(dialog.wizard.total(), Money::from_cents(30_000));
        assert!(!dialog.select(99));
    }

    #[tokio::test]
    async fn test_empty_wizard_is_refused_before_the_network() {
        let ctx = signed_in("EMPLOYEE");
        let mut dialog = CreateOrderDialog {
            ctx: ctx.clone(),
            wizard: OrderWizard::for_employee(),
            clients: Vec::new(),
            appliances: Vec::new(),
            errors: FieldMap::new(),
        };
        let err = dialog.submit().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(ctx.notify.len(), 1);
    }

    #[tokio::test]
    async fn test_approved_order_cannot_be_edited() {
        let ctx = signed_in("EMPLOYEE");
        let err = EditOrderDialog::open(ctx, &order(7, true)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_client_cannot_edit_someone_elses_order() {
        let ctx = signed_in("CLIENT");
        let err = EditOrderDialog::open(ctx, &order(8, false)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
