//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Seeded payment methods with attachment tracking
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::foundation::{CustomerId, PaymentMethodId};
use crate::ports::{
    CardDetails, CreateCustomerRequest, CreatePaymentIntentRequest, CreateSetupIntentRequest,
    Customer, PaymentError, PaymentErrorCode, PaymentIntent, PaymentIntentStatus, PaymentMethod,
    PaymentProvider, SetupIntent,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Seed a card the client collected
/// mock.add_card("pm_card_visa", "visa", "4242", 12, 2030);
///
/// // Inject errors
/// mock.set_method_error("create_payment_intent", PaymentError::card_declined("Test decline"));
///
/// // Use in tests
/// let intent = mock.create_payment_intent(request).await;
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Customers by ID.
    customers: HashMap<String, Customer>,

    /// Payment methods by ID.
    payment_methods: HashMap<String, PaymentMethod>,

    /// Status for the next payment intent.
    next_intent_status: Option<PaymentIntentStatus>,

    /// Counter used to mint object IDs.
    sequence: u64,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.sequence += 1;
        format!("{}_mock_{}", prefix, self.sequence)
    }
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    /// Create a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a customer to the "database".
    pub fn add_customer(&self, id: &str) {
        let customer = Customer {
            id: CustomerId::new(id).expect("mock customer id must not be empty"),
            email: None,
        };
        self.inner
            .lock()
            .unwrap()
            .customers
            .insert(id.to_string(), customer);
    }

    /// Add an unattached card payment method.
    pub fn add_card(&self, id: &str, brand: &str, last4: &str, exp_month: u32, exp_year: u32) {
        self.add_payment_method(PaymentMethod {
            id: PaymentMethodId::new(id).expect("mock payment method id must be a valid key"),
            customer: None,
            card: Some(CardDetails {
                brand: brand.to_string(),
                last4: last4.to_string(),
                exp_month,
                exp_year,
            }),
        });
    }

    /// Add a payment method as-is (e.g. one without card details).
    pub fn add_payment_method(&self, payment_method: PaymentMethod) {
        self.inner
            .lock()
            .unwrap()
            .payment_methods
            .insert(payment_method.id.to_string(), payment_method);
    }

    /// Mark a payment method as attached to a customer.
    pub fn attach_to(&self, payment_method_id: &str, customer_id: &str) {
        let mut state = self.inner.lock().unwrap();
        if let Some(pm) = state.payment_methods.get_mut(payment_method_id) {
            pm.customer = CustomerId::new(customer_id).ok();
        }
    }

    /// Set the status the next payment intent is created with.
    pub fn set_payment_intent_status(&self, status: PaymentIntentStatus) {
        self.inner.lock().unwrap().next_intent_status = Some(status);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Inspection
    // ════════════════════════════════════════════════════════════════════════════

    /// Look up a payment method without recording a call.
    pub fn payment_method(&self, id: &str) -> Option<PaymentMethod> {
        self.inner.lock().unwrap().payment_methods.get(id).cloned()
    }

    /// Whether a customer currently exists.
    pub fn has_customer(&self, id: &str) -> bool {
        self.inner.lock().unwrap().customers.contains_key(id)
    }

    /// Number of customers currently held.
    pub fn customer_count(&self) -> usize {
        self.inner.lock().unwrap().customers.len()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        match self.inner.lock().unwrap().method_errors.get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn no_such_payment_method(id: &PaymentMethodId) -> PaymentError {
    PaymentError::new(
        PaymentErrorCode::NotFound,
        format!("No such PaymentMethod: '{}'", id),
    )
    .with_provider_code("resource_missing")
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        self.record_call(
            "create_customer",
            vec![request.user_id.to_string(), request.email.clone()],
        );
        self.check_error("create_customer")?;

        let mut state = self.inner.lock().unwrap();
        let id = state.next_id("cus");
        let customer = Customer {
            id: CustomerId::new(id.clone())
                .map_err(|e| PaymentError::new(PaymentErrorCode::Unknown, e.to_string()))?,
            email: Some(request.email),
        };
        state.customers.insert(id, customer.clone());

        Ok(customer)
    }

    async fn delete_customer(&self, customer_id: &CustomerId) -> Result<(), PaymentError> {
        self.record_call("delete_customer", vec![customer_id.to_string()]);
        self.check_error("delete_customer")?;

        let mut state = self.inner.lock().unwrap();
        state
            .customers
            .remove(customer_id.as_str())
            .map(|_| ())
            .ok_or_else(|| PaymentError::not_found("Customer"))
    }

    async fn create_setup_intent(
        &self,
        request: CreateSetupIntentRequest,
    ) -> Result<SetupIntent, PaymentError> {
        self.record_call(
            "create_setup_intent",
            vec![
                request.customer_id.to_string(),
                request.usage.as_str().to_string(),
            ],
        );
        self.check_error("create_setup_intent")?;

        let mut state = self.inner.lock().unwrap();
        let id = state.next_id("seti");
        Ok(SetupIntent {
            client_secret: format!("{}_secret_mock", id),
            id,
            status: "requires_payment_method".to_string(),
        })
    }

    async fn get_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<PaymentMethod, PaymentError> {
        self.record_call("get_payment_method", vec![payment_method_id.to_string()]);
        self.check_error("get_payment_method")?;

        let state = self.inner.lock().unwrap();
        state
            .payment_methods
            .get(payment_method_id.as_str())
            .cloned()
            .ok_or_else(|| no_such_payment_method(payment_method_id))
    }

    async fn attach_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
        customer_id: &CustomerId,
    ) -> Result<PaymentMethod, PaymentError> {
        self.record_call(
            "attach_payment_method",
            vec![payment_method_id.to_string(), customer_id.to_string()],
        );
        self.check_error("attach_payment_method")?;

        let mut state = self.inner.lock().unwrap();
        let pm = state
            .payment_methods
            .get_mut(payment_method_id.as_str())
            .ok_or_else(|| no_such_payment_method(payment_method_id))?;

        match &pm.customer {
            Some(existing) if existing != customer_id => Err(PaymentError::new(
                PaymentErrorCode::InvalidRequest,
                "The payment method you provided has already been attached to a customer.",
            )),
            _ => {
                pm.customer = Some(customer_id.clone());
                Ok(pm.clone())
            }
        }
    }

    async fn detach_payment_method(
        &self,
        payment_method_id: &PaymentMethodId,
    ) -> Result<PaymentMethod, PaymentError> {
        self.record_call("detach_payment_method", vec![payment_method_id.to_string()]);
        self.check_error("detach_payment_method")?;

        let mut state = self.inner.lock().unwrap();
        let pm = state
            .payment_methods
            .get_mut(payment_method_id.as_str())
            .ok_or_else(|| no_such_payment_method(payment_method_id))?;

        if pm.customer.take().is_none() {
            return Err(PaymentError::new(
                PaymentErrorCode::InvalidRequest,
                "The payment method you provided is not attached to a customer so detachment is impossible.",
            ));
        }

        Ok(pm.clone())
    }

    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        self.record_call(
            "create_payment_intent",
            vec![
                request.amount.minor_units().to_string(),
                request.currency.to_string(),
                request.customer_id.to_string(),
                request.payment_method_id.to_string(),
            ],
        );
        self.check_error("create_payment_intent")?;

        let mut state = self.inner.lock().unwrap();
        let id = state.next_id("pi");
        let status = state
            .next_intent_status
            .take()
            .unwrap_or(PaymentIntentStatus::Succeeded);

        Ok(PaymentIntent {
            client_secret: Some(format!("{}_secret_mock", id)),
            id,
            status: status.as_str().to_string(),
        })
    }
}
